use secretvote::Wallet;
use std::env::var;

pub struct Config {
    pub uri: String,
    pub relayer_uri: String,
    pub contract: String,
    pub wallet: Option<Wallet>,
}

impl Config {
    pub fn from_env(matches: &clap::ArgMatches) -> Self {
        let env_uri = var("SECRETVOTE_URI");
        let uri = match matches.value_of("uri") {
            Some(uri) => uri.to_string(),
            None => env_uri.unwrap_or_else(|_| "http://localhost:4692".to_string()),
        };

        let relayer_uri =
            var("SECRETVOTE_RELAYER_URI").unwrap_or_else(|_| "http://localhost:4693".to_string());

        let contract = var("SECRETVOTE_CONTRACT")
            .unwrap_or_else(|_| "0x33480e071e9cb1991406ed98986963104bf0fb91".to_string());

        let wallet = Self::load_wallet(matches);

        Config {
            uri,
            relayer_uri,
            contract,
            wallet,
        }
    }

    // A missing key is a read-only session; write commands fail their
    // signer precondition with a proper message.
    fn load_wallet(matches: &clap::ArgMatches) -> Option<Wallet> {
        let hex_key = match matches.value_of("secret-key") {
            Some(path) => {
                let path = crate::expand(path);
                match std::fs::read_to_string(&path) {
                    Ok(contents) => contents,
                    Err(e) => {
                        eprintln!("secretvote: unable to read {}: {}", path, e);
                        std::process::exit(1);
                    }
                }
            }
            None => match var("SECRETVOTE_SECRET_KEY") {
                Ok(val) => val,
                Err(_e) => return None,
            },
        };

        match Wallet::from_secret_hex(&hex_key) {
            Ok(wallet) => Some(wallet),
            Err(e) => {
                eprintln!("secretvote: invalid secret-key: {}", e);
                std::process::exit(1);
            }
        }
    }
}
