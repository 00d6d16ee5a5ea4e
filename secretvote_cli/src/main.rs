use clap::{App, Arg, SubCommand};
use num_enum::TryFromPrimitive;

mod command_create;
mod command_finalize;
mod command_keygen;
mod command_list;
mod command_show;
mod command_vote;
mod config;
mod relayer;
mod rest;

#[derive(TryFromPrimitive, PartialEq, Copy, Clone)]
#[repr(u8)]
pub enum Verbosity {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
}

fn main() {
    let matches = App::new("SecretVote CLI")
        .version("1.0")
        .about("Interacts with a SecretVote node")
        .arg(
            Arg::with_name("uri")
                .long("uri")
                .takes_value(true)
                .help("Set the node uri - can also be set with SECRETVOTE_URI")
                .required(false),
        )
        .arg(
            Arg::with_name("secret-key")
                .long("secret-key")
                .takes_value(true)
                .help("Wallet secret-key file - can also be set with SECRETVOTE_SECRET_KEY")
                .required(false),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .subcommand(SubCommand::with_name("list").about("List all proposals"))
        .subcommand(
            SubCommand::with_name("show")
                .about("Show one proposal, its status, and any results")
                .arg(
                    Arg::with_name("INDEX")
                        .index(1)
                        .required(true)
                        .help("Proposal index"),
                ),
        )
        .subcommand(
            SubCommand::with_name("vote")
                .about("Cast an encrypted vote")
                .arg(
                    Arg::with_name("INDEX")
                        .index(1)
                        .required(true)
                        .help("Proposal index"),
                )
                .arg(
                    Arg::with_name("OPTION")
                        .index(2)
                        .required(true)
                        .help("Option index to vote for"),
                ),
        )
        .subcommand(
            SubCommand::with_name("finalize")
                .about("Request finalization of a closed proposal")
                .arg(
                    Arg::with_name("INDEX")
                        .index(1)
                        .required(true)
                        .help("Proposal index"),
                ),
        )
        .subcommand(
            SubCommand::with_name("create")
                .about("Create a new proposal")
                .arg(
                    Arg::with_name("INPUT")
                        .index(1)
                        .required(false)
                        .help("Draft file in JSON or CBOR format"),
                )
                .arg(
                    Arg::with_name("title")
                        .long("title")
                        .takes_value(true)
                        .help("Proposal title"),
                )
                .arg(
                    Arg::with_name("option")
                        .long("option")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .help("An option label (pass at least twice)"),
                )
                .arg(
                    Arg::with_name("starts")
                        .long("starts")
                        .takes_value(true)
                        .help("Start time in unix seconds (default: now + 5 minutes)"),
                )
                .arg(
                    Arg::with_name("ends")
                        .long("ends")
                        .takes_value(true)
                        .help("End time in unix seconds (default: start + 1 hour)"),
                ),
        )
        .subcommand(SubCommand::with_name("keygen").about("Generate a new wallet secret-key"))
        .get_matches();

    let verbosity = match matches.occurrences_of("v") {
        0 => Verbosity::Warn,
        _ => Verbosity::Info,
    };

    let config = config::Config::from_env(&matches);
    if verbosity as u8 >= 3 {
        println!("URI: {}", config.uri);
    }

    // Subcommands
    if let Some(matches) = matches.subcommand_matches("list") {
        command_list::command_list(matches, &config);
    }
    if let Some(matches) = matches.subcommand_matches("show") {
        command_show::command_show(matches, &config);
    }
    if let Some(matches) = matches.subcommand_matches("vote") {
        command_vote::command_vote(matches, &config, verbosity);
    }
    if let Some(matches) = matches.subcommand_matches("finalize") {
        command_finalize::command_finalize(matches, &config);
    }
    if let Some(matches) = matches.subcommand_matches("create") {
        command_create::command_create(matches, &config);
    }
    if let Some(matches) = matches.subcommand_matches("keygen") {
        command_keygen::command_keygen(matches);
    }
}

/// Expand `~` and environment variables in a path-like argument.
pub fn expand(input: &str) -> String {
    match shellexpand::full(input) {
        Ok(expanded) => expanded.into_owned(),
        Err(_) => input.to_string(),
    }
}

/// Parse a numeric argument or exit with a message.
pub fn parse_index(value: &str, what: &str) -> u64 {
    value.parse().unwrap_or_else(|_| {
        eprintln!("secretvote: invalid {}: {}", what, value);
        std::process::exit(1);
    })
}
