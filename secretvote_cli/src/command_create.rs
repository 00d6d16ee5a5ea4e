use crate::config::Config;
use crate::rest::RestLedger;
use content_inspector::ContentType;
use secretvote::{unix_now, CreateProposal, ProposalDraft};
use serde::Deserialize;

/// Draft file format: title and options required, times fall back to the
/// default schedule when absent.
#[derive(Deserialize, Debug, Clone)]
struct DraftFile {
    title: String,
    options: Vec<String>,
    start_time: Option<u64>,
    end_time: Option<u64>,
}

pub fn command_create(matches: &clap::ArgMatches, config: &Config) {
    let now = unix_now();
    let mut view = CreateProposal::new(now);

    if let Some(filename) = matches.value_of("INPUT") {
        apply_draft_file(&mut view.draft, filename);
    } else {
        apply_flags(&mut view.draft, matches);
    }

    let ledger = RestLedger::new(&config.uri);
    match view.submit(&ledger, config.wallet.as_ref()) {
        Ok(_) => {
            println!("> Proposal created successfully!");
            if let Some(hash) = view.tx_hash() {
                println!("  Transaction: {}", short_hash(hash));
            }
        }
        Err(e) => {
            // The hash is surfaced even when confirmation fails afterwards
            if let Some(hash) = view.tx_hash() {
                eprintln!("secretvote create: submitted {}", short_hash(hash));
            }
            eprintln!("secretvote create: {}", e);
            std::process::exit(1);
        }
    }
}

fn apply_draft_file(draft: &mut ProposalDraft, filename: &str) {
    let filename = crate::expand(filename);
    let file_bytes = match std::fs::read(&filename) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("secretvote create: unable to read {}: {}", filename, e);
            std::process::exit(1);
        }
    };

    let file: DraftFile = match content_inspector::inspect(&file_bytes) {
        ContentType::UTF_8 => serde_json::from_slice(&file_bytes).unwrap_or_else(|e| {
            eprintln!("secretvote create: unable to read {}: {}", filename, e);
            std::process::exit(1);
        }),
        ContentType::BINARY => serde_cbor::from_slice(&file_bytes).unwrap_or_else(|e| {
            eprintln!("secretvote create: unable to read {}: {}", filename, e);
            std::process::exit(1);
        }),
        _ => {
            eprintln!("secretvote create: invalid file format for {}", filename);
            std::process::exit(1);
        }
    };

    draft.title = file.title;
    draft.options = file.options;
    if file.start_time.is_some() {
        draft.start_time = file.start_time;
    }
    if file.end_time.is_some() {
        draft.end_time = file.end_time;
    }
}

fn apply_flags(draft: &mut ProposalDraft, matches: &clap::ArgMatches) {
    if let Some(title) = matches.value_of("title") {
        draft.title = title.to_string();
    }
    if let Some(options) = matches.values_of("option") {
        draft.options = options.map(str::to_string).collect();
    }
    if let Some(starts) = matches.value_of("starts") {
        draft.start_time = Some(crate::parse_index(starts, "start time"));
    }
    if let Some(ends) = matches.value_of("ends") {
        draft.end_time = Some(crate::parse_index(ends, "end time"));
    }
}

// Transaction hashes are long; show both ends, like a block explorer would
fn short_hash(hash: &str) -> String {
    if hash.len() <= 20 {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..10], &hash[hash.len() - 8..])
}
