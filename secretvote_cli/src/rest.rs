use secretvote::{Error, LedgerReader, LedgerWriter, Proposal, SignedCall, TxHandle};
use serde::Deserialize;
use std::thread::sleep;
use std::time::Duration;

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Ledger access over a SecretVote node's REST API.
pub struct RestLedger {
    base_uri: String,
    client: reqwest::blocking::Client,
}

#[derive(Deserialize, Debug, Clone)]
struct SubmitResp {
    tx_hash: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "status", rename_all = "snake_case")]
enum TxStatusResp {
    Pending,
    Committed,
    Rejected { reason: String },
}

impl RestLedger {
    pub fn new(base_uri: &str) -> Self {
        RestLedger {
            base_uri: base_uri.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let full_uri = format!("{}{}", self.base_uri, path);
        let res = self
            .client
            .get(&full_uri)
            .send()
            .map_err(ledger_err)?
            .error_for_status()
            .map_err(ledger_err)?
            .json()
            .map_err(ledger_err)?;

        Ok(res)
    }
}

impl LedgerReader for RestLedger {
    fn proposal_count(&self) -> Result<u64, Error> {
        self.get_json("/api/secretvote/proposals/count")
    }

    fn proposal(&self, index: u64) -> Result<Proposal, Error> {
        self.get_json(&format!("/api/secretvote/proposals/{}", index))
    }

    fn voter_count(&self, index: u64) -> Result<u64, Error> {
        self.get_json(&format!("/api/secretvote/proposals/{}/voters", index))
    }

    fn results(&self, index: u64) -> Result<Vec<u64>, Error> {
        self.get_json(&format!("/api/secretvote/proposals/{}/results", index))
    }
}

impl LedgerWriter for RestLedger {
    fn submit(&self, call: SignedCall) -> Result<TxHandle, Error> {
        let full_uri = format!("{}/api/secretvote/transactions", self.base_uri);
        let res: SubmitResp = self
            .client
            .post(&full_uri)
            .json(&call)
            .send()
            .map_err(ledger_err)?
            .error_for_status()
            .map_err(ledger_err)?
            .json()
            .map_err(ledger_err)?;

        Ok(TxHandle { hash: res.tx_hash })
    }

    /// Poll the node until it reports the transaction committed.
    ///
    /// There is no overall timeout: a hung confirmation blocks the
    /// initiating command until the node resolves or rejects.
    fn confirm(&self, tx: &TxHandle) -> Result<(), Error> {
        loop {
            let status: TxStatusResp =
                self.get_json(&format!("/api/secretvote/transactions/{}", tx.hash))?;
            match status {
                TxStatusResp::Committed => return Ok(()),
                TxStatusResp::Rejected { reason } => {
                    return Err(Error::TransactionRejected(reason))
                }
                TxStatusResp::Pending => sleep(CONFIRM_POLL_INTERVAL),
            }
        }
    }
}

fn ledger_err(e: reqwest::Error) -> Error {
    Error::Ledger(e.to_string())
}
