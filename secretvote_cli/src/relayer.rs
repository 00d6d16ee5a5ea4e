use secretvote::{
    EncryptedBallot, EncryptionProvider, EncryptionState, Error, PreconditionError,
};
use serde::{Deserialize, Serialize};

/// Encryption provider backed by a relayer gateway, bound to one contract
/// address for the session.
pub struct RelayerEncryption {
    base_uri: String,
    contract: String,
    client: reqwest::blocking::Client,
    state: EncryptionState,
}

#[derive(Serialize, Debug, Clone)]
struct EncryptReq<'a> {
    contract: &'a str,
    account: &'a str,
    value: u32,
}

#[derive(Deserialize, Debug, Clone)]
struct EncryptResp {
    handle: String,
    proof: String,
}

impl RelayerEncryption {
    /// Initialize a relayer session.
    ///
    /// A failed init is terminal: the provider stays in `Error` and every
    /// encrypt attempt fails its readiness precondition.
    pub fn connect(base_uri: &str, contract: &str) -> Self {
        let mut provider = RelayerEncryption {
            base_uri: base_uri.trim_end_matches('/').to_string(),
            contract: contract.to_string(),
            client: reqwest::blocking::Client::new(),
            state: EncryptionState::Initializing,
        };

        let full_uri = format!("{}/v1/status", provider.base_uri);
        provider.state = match provider
            .client
            .get(&full_uri)
            .send()
            .and_then(|res| res.error_for_status())
        {
            Ok(_) => EncryptionState::Ready,
            Err(e) => EncryptionState::Error(e.to_string()),
        };

        provider
    }
}

impl EncryptionProvider for RelayerEncryption {
    fn state(&self) -> EncryptionState {
        self.state.clone()
    }

    fn encrypt_choice(&self, account: &str, value: u32) -> Result<EncryptedBallot, Error> {
        if !self.state.is_ready() {
            return Err(PreconditionError::EncryptionNotReady.into());
        }

        let full_uri = format!("{}/v1/encrypt", self.base_uri);
        let res: EncryptResp = self
            .client
            .post(&full_uri)
            .json(&EncryptReq {
                contract: &self.contract,
                account,
                value,
            })
            .send()
            .map_err(encryption_err)?
            .error_for_status()
            .map_err(encryption_err)?
            .json()
            .map_err(encryption_err)?;

        Ok(EncryptedBallot {
            handle: hex::decode(res.handle.trim_start_matches("0x"))?,
            proof: hex::decode(res.proof.trim_start_matches("0x"))?,
        })
    }
}

fn encryption_err(e: reqwest::Error) -> Error {
    Error::Encryption(e.to_string())
}
