use crate::config::Config;
use crate::rest::RestLedger;
use secretvote::{unix_now, CancelToken, ProposalList};

pub fn command_list(_matches: &clap::ArgMatches, config: &Config) {
    let ledger = RestLedger::new(&config.uri);

    let mut list = ProposalList::new();
    list.load(&ledger, &CancelToken::new());

    if list.is_empty() {
        println!("No proposals yet");
        return;
    }

    let now = unix_now();
    for (index, card) in list.iter() {
        println!(
            "{:>4}  [{}]  {}",
            index,
            card.proposal.status(now),
            card.proposal.title
        );
        println!(
            "      {} options, {} voters, ends at {}",
            card.proposal.options.len(),
            card.voters,
            card.proposal.end_time
        );
    }
}
