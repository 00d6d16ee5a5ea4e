use secretvote::Wallet;

pub fn command_keygen(_matches: &clap::ArgMatches) {
    let wallet = Wallet::generate();

    println!("SECRETVOTE_SECRET_KEY={}", wallet.secret_hex());
    println!("Address: {}", wallet.address());
}
