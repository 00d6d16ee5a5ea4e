use crate::*;
use sha2::{Digest, Sha256};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::convert::TryInto;

/// Handle to a submitted transaction.
///
/// Must be confirmed before the write it carries is treated as durable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TxHandle {
    pub hash: String,
}

impl std::fmt::Display for TxHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Read-only queries against the voting contract
pub trait LedgerReader {
    fn proposal_count(&self) -> Result<u64, Error>;

    fn proposal(&self, index: u64) -> Result<Proposal, Error>;

    fn voter_count(&self, index: u64) -> Result<u64, Error>;

    /// Tallies per option, only readable once the proposal is finalized
    fn results(&self, index: u64) -> Result<Vec<u64>, Error>;
}

/// Mutating submissions against the voting contract
pub trait LedgerWriter {
    fn submit(&self, call: SignedCall) -> Result<TxHandle, Error>;

    /// Block until the transaction is committed. There is no timeout.
    fn confirm(&self, tx: &TxHandle) -> Result<(), Error>;
}

/// A simple in-memory ledger standing in for the deployed contract
///
/// Commits synchronously and enforces the contract's bookkeeping: signature
/// checks, window checks, one vote per account, results only after
/// finalization.
#[derive(Default)]
pub struct MemLedger {
    inner: RefCell<Inner>,
}

#[derive(Default)]
struct Inner {
    now: u64,
    sequence: u64,
    proposals: Vec<Record>,
    committed: BTreeSet<String>,
}

struct Record {
    proposal: Proposal,
    /// account address -> ballot, one vote per account
    ballots: BTreeMap<String, EncryptedBallot>,
    tallies: Option<Vec<u64>>,
}

impl MemLedger {
    pub fn new() -> Self {
        MemLedger::default()
    }

    /// Set the ledger clock (the contract's view of "now").
    pub fn set_now(&self, now: u64) {
        self.inner.borrow_mut().now = now;
    }

    /// Seed a proposal directly, bypassing the transaction path.
    pub fn seed(&self, proposal: Proposal) {
        self.inner.borrow_mut().proposals.push(Record {
            proposal,
            ballots: BTreeMap::new(),
            tallies: None,
        });
    }

    /// The decryption oracle's callback: tally the ballots and flip
    /// pending -> finalized.
    ///
    /// Ballots are expected in the MockEncryption layout, with the plaintext
    /// in the last 4 bytes of the handle.
    pub fn complete_finalize(&self, index: u64) -> Result<(), Error> {
        let mut inner = self.inner.borrow_mut();
        let record = inner
            .proposals
            .get_mut(index as usize)
            .ok_or(Error::ProposalNotFound(index))?;

        if !record.proposal.pending {
            return Err(Error::Ledger("no finalize request pending".to_string()));
        }

        let mut tallies = vec![0u64; record.proposal.options.len()];
        for ballot in record.ballots.values() {
            if ballot.handle.len() < 4 {
                continue;
            }
            let tail: [u8; 4] = ballot.handle[ballot.handle.len() - 4..].try_into().unwrap();
            if let Some(count) = tallies.get_mut(u32::from_le_bytes(tail) as usize) {
                *count += 1;
            }
        }

        record.tallies = Some(tallies);
        record.proposal.finalized = true;
        record.proposal.pending = false;
        Ok(())
    }
}

impl LedgerReader for MemLedger {
    fn proposal_count(&self) -> Result<u64, Error> {
        Ok(self.inner.borrow().proposals.len() as u64)
    }

    fn proposal(&self, index: u64) -> Result<Proposal, Error> {
        self.inner
            .borrow()
            .proposals
            .get(index as usize)
            .map(|record| record.proposal.clone())
            .ok_or(Error::ProposalNotFound(index))
    }

    fn voter_count(&self, index: u64) -> Result<u64, Error> {
        self.inner
            .borrow()
            .proposals
            .get(index as usize)
            .map(|record| record.ballots.len() as u64)
            .ok_or(Error::ProposalNotFound(index))
    }

    fn results(&self, index: u64) -> Result<Vec<u64>, Error> {
        let inner = self.inner.borrow();
        let record = inner
            .proposals
            .get(index as usize)
            .ok_or(Error::ProposalNotFound(index))?;
        record.tallies.clone().ok_or(Error::ResultsNotAvailable)
    }
}

impl LedgerWriter for MemLedger {
    fn submit(&self, call: SignedCall) -> Result<TxHandle, Error> {
        call.verify_signature()
            .map_err(|_| Error::TransactionRejected("bad signature".to_string()))?;
        let account = address_of(&call.public_key);

        let mut inner = self.inner.borrow_mut();
        inner.sequence += 1;

        let mut hasher = Sha256::new();
        hasher.update(&call.as_bytes());
        hasher.update(&inner.sequence.to_le_bytes());
        let hash = format!("0x{}", hex::encode(hasher.finalize()));

        let now = inner.now;
        match call.call {
            WriteCall::CreateProposal {
                title,
                options,
                start_time,
                end_time,
            } => {
                if options.len() < 2 {
                    return Err(Error::TransactionRejected(
                        "at least 2 options required".to_string(),
                    ));
                }
                if start_time >= end_time {
                    return Err(Error::TransactionRejected(
                        "end time must follow start time".to_string(),
                    ));
                }
                inner.proposals.push(Record {
                    proposal: Proposal {
                        title,
                        options,
                        start_time,
                        end_time,
                        finalized: false,
                        pending: false,
                    },
                    ballots: BTreeMap::new(),
                    tallies: None,
                });
            }
            WriteCall::Vote { proposal, ballot } => {
                let record = inner
                    .proposals
                    .get_mut(proposal as usize)
                    .ok_or_else(|| Error::TransactionRejected("no such proposal".to_string()))?;
                if record.proposal.finalized {
                    return Err(Error::TransactionRejected(
                        "proposal is finalized".to_string(),
                    ));
                }
                if now < record.proposal.start_time || now > record.proposal.end_time {
                    return Err(Error::TransactionRejected(
                        "voting window closed".to_string(),
                    ));
                }
                if record.ballots.contains_key(&account) {
                    return Err(Error::TransactionRejected(
                        "account already voted".to_string(),
                    ));
                }
                record.ballots.insert(account, ballot);
            }
            WriteCall::RequestFinalize { proposal } => {
                let record = inner
                    .proposals
                    .get_mut(proposal as usize)
                    .ok_or_else(|| Error::TransactionRejected("no such proposal".to_string()))?;
                if !record.proposal.can_finalize(now) {
                    return Err(Error::TransactionRejected(
                        "proposal is not ready to finalize".to_string(),
                    ));
                }
                record.proposal.pending = true;
            }
        }

        inner.committed.insert(hash.clone());
        Ok(TxHandle { hash })
    }

    fn confirm(&self, tx: &TxHandle) -> Result<(), Error> {
        if self.inner.borrow().committed.contains(&tx.hash) {
            Ok(())
        } else {
            Err(Error::Ledger(format!("unknown transaction {}", tx.hash)))
        }
    }
}
