use crate::config::Config;
use crate::relayer::RelayerEncryption;
use crate::rest::RestLedger;
use secretvote::{unix_now, EncryptionProvider, LedgerReader, ProposalDetail};

pub fn command_show(matches: &clap::ArgMatches, config: &Config) {
    let index = crate::parse_index(matches.value_of("INDEX").unwrap(), "proposal index");

    let ledger = RestLedger::new(&config.uri);
    let proposal = match ledger.proposal(index) {
        Ok(proposal) => proposal,
        Err(e) => {
            eprintln!("secretvote show: {}", e);
            std::process::exit(1);
        }
    };

    let mut detail = ProposalDetail::new(index, proposal);
    detail.refresh(&ledger);

    let now = unix_now();
    let proposal = detail.proposal();
    println!("{}  [{}]", proposal.title, proposal.status(now));
    println!(
        "  Start: {}  End: {}  Voters: {}",
        proposal.start_time,
        proposal.end_time,
        detail
            .voters()
            .map(|count| count.to_string())
            .unwrap_or_else(|| "...".to_string())
    );

    let encryption = RelayerEncryption::connect(&config.relayer_uri, &config.contract);
    if let Some(badge) = encryption.state().badge() {
        match badge.detail {
            Some(note) => println!("  {} ({})", badge.label, note),
            None => println!("  {}", badge.label),
        }
    }

    for (option_index, option) in proposal.options.iter().enumerate() {
        match detail.results() {
            Some(results) => println!(
                "  {:>3}. {}  ({} votes)",
                option_index,
                option,
                results.get(option_index).copied().unwrap_or(0)
            ),
            None => println!("  {:>3}. {}", option_index, option),
        }
    }

    if proposal.pending {
        println!("  Decryption pending…");
    }
    if detail.can_vote(now) {
        println!("  Voting is open: secretvote vote {} <OPTION>", index);
    }
    if detail.can_finalize(now) {
        println!("  Ready to finalize: secretvote finalize {}", index);
    }
}
