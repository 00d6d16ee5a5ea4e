use crate::config::Config;
use crate::rest::RestLedger;
use secretvote::{unix_now, LedgerReader, ProposalDetail};

pub fn command_finalize(matches: &clap::ArgMatches, config: &Config) {
    let index = crate::parse_index(matches.value_of("INDEX").unwrap(), "proposal index");

    let ledger = RestLedger::new(&config.uri);
    let proposal = match ledger.proposal(index) {
        Ok(proposal) => proposal,
        Err(e) => {
            eprintln!("secretvote finalize: {}", e);
            std::process::exit(1);
        }
    };

    let mut detail = ProposalDetail::new(index, proposal);
    match detail.finalize(&ledger, config.wallet.as_ref(), unix_now()) {
        Ok(tx) => {
            println!("> Finalize requested ({})", tx);
            println!("  Results appear after the decryption oracle calls back");
        }
        Err(e) => {
            eprintln!("secretvote finalize: {}", e);
            std::process::exit(1);
        }
    }
}
