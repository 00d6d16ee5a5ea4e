use crate::config::Config;
use crate::relayer::RelayerEncryption;
use crate::rest::RestLedger;
use crate::Verbosity;
use secretvote::{unix_now, EncryptionProvider, LedgerReader, ProposalDetail};

pub fn command_vote(matches: &clap::ArgMatches, config: &Config, verbosity: Verbosity) {
    let index = crate::parse_index(matches.value_of("INDEX").unwrap(), "proposal index");
    let choice = crate::parse_index(matches.value_of("OPTION").unwrap(), "option index") as usize;

    let ledger = RestLedger::new(&config.uri);
    let proposal = match ledger.proposal(index) {
        Ok(proposal) => proposal,
        Err(e) => {
            eprintln!("secretvote vote: {}", e);
            std::process::exit(1);
        }
    };

    let encryption = RelayerEncryption::connect(&config.relayer_uri, &config.contract);
    if verbosity as u8 >= 3 {
        if let Some(badge) = encryption.state().badge() {
            println!("{}", badge.label);
        }
    }

    let mut detail = ProposalDetail::new(index, proposal);
    match detail.vote(
        &ledger,
        config.wallet.as_ref(),
        &encryption,
        choice,
        unix_now(),
    ) {
        Ok(tx) => {
            println!("> Voted ({})", tx);
            if let Some(voters) = detail.voters() {
                println!("  Voters: {}", voters);
            }
        }
        Err(e) => {
            eprintln!("secretvote vote: {}", e);
            std::process::exit(1);
        }
    }
}
