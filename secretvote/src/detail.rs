use crate::*;

/// The proposal detail view.
///
/// Works over the metadata snapshot handed across from the list; the ledger
/// flips `finalized`/`pending` out of band, so a fresh snapshot (re-open or
/// re-query) is needed to observe those transitions.
pub struct ProposalDetail {
    index: u64,
    proposal: Proposal,
    voters: Option<u64>,
    results: Option<Vec<u64>>,
    sending: bool,
    error: Option<String>,
}

impl ProposalDetail {
    pub fn new(index: u64, snapshot: Proposal) -> Self {
        ProposalDetail {
            index,
            proposal: snapshot,
            voters: None,
            results: None,
            sending: false,
            error: None,
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn proposal(&self) -> &Proposal {
        &self.proposal
    }

    pub fn voters(&self) -> Option<u64> {
        self.voters
    }

    /// Clear tallies, one per option. Populated by `refresh` once the
    /// proposal is finalized.
    pub fn results(&self) -> Option<&[u64]> {
        self.results.as_deref()
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_vote(&self, now: u64) -> bool {
        self.proposal.can_vote(now)
    }

    pub fn can_finalize(&self, now: u64) -> bool {
        self.proposal.can_finalize(now)
    }

    /// Refresh the voter count and, for a finalized proposal, the clear
    /// results. Errors are swallowed: this is the background refresh path,
    /// which has no error surface.
    pub fn refresh<L: LedgerReader>(&mut self, ledger: &L) {
        if self.proposal.finalized {
            if let Ok(results) = ledger.results(self.index) {
                self.results = Some(results);
            }
        } else {
            self.results = None;
        }
        if let Ok(voters) = ledger.voter_count(self.index) {
            self.voters = Some(voters);
        }
    }

    /// Cast an encrypted vote for `choice`.
    ///
    /// Preconditions fail before any network call: a signer must be
    /// connected, the encryption provider ready, the choice in range, and
    /// the window open. On success the voter count is refreshed best-effort.
    pub fn vote<W, E>(
        &mut self,
        ledger: &W,
        wallet: Option<&Wallet>,
        encryption: &E,
        choice: usize,
        now: u64,
    ) -> Result<TxHandle, Error>
    where
        W: LedgerReader + LedgerWriter,
        E: EncryptionProvider,
    {
        self.error = None;
        let result = self.try_vote(ledger, wallet, encryption, choice, now);
        if let Err(ref e) = result {
            self.error = Some(e.to_string());
        }
        result
    }

    fn try_vote<W, E>(
        &mut self,
        ledger: &W,
        wallet: Option<&Wallet>,
        encryption: &E,
        choice: usize,
        now: u64,
    ) -> Result<TxHandle, Error>
    where
        W: LedgerReader + LedgerWriter,
        E: EncryptionProvider,
    {
        if self.sending {
            return Err(PreconditionError::SubmissionInFlight.into());
        }
        let wallet = wallet.ok_or(PreconditionError::NoSigner)?;
        if !encryption.state().is_ready() {
            return Err(PreconditionError::EncryptionNotReady.into());
        }
        if choice >= self.proposal.options.len() {
            return Err(PreconditionError::InvalidOption(choice).into());
        }
        if !self.can_vote(now) {
            return Err(PreconditionError::VotingClosed.into());
        }

        self.sending = true;
        let result: Result<TxHandle, Error> = (|| {
            let ballot = encryption.encrypt_choice(&wallet.address(), choice as u32)?;
            let tx = ledger.submit(wallet.sign(WriteCall::Vote {
                proposal: self.index,
                ballot,
            }))?;
            ledger.confirm(&tx)?;

            if let Ok(voters) = ledger.voter_count(self.index) {
                self.voters = Some(voters);
            }
            Ok(tx)
        })();
        self.sending = false;
        result
    }

    /// Request finalization of a closed proposal.
    ///
    /// Leaves the local snapshot untouched; the contract flips
    /// `finalized`/`pending` out of band.
    pub fn finalize<W: LedgerWriter>(
        &mut self,
        ledger: &W,
        wallet: Option<&Wallet>,
        now: u64,
    ) -> Result<TxHandle, Error> {
        self.error = None;
        let result = self.try_finalize(ledger, wallet, now);
        if let Err(ref e) = result {
            self.error = Some(e.to_string());
        }
        result
    }

    fn try_finalize<W: LedgerWriter>(
        &mut self,
        ledger: &W,
        wallet: Option<&Wallet>,
        now: u64,
    ) -> Result<TxHandle, Error> {
        if self.sending {
            return Err(PreconditionError::SubmissionInFlight.into());
        }
        let wallet = wallet.ok_or(PreconditionError::NoSigner)?;
        if !self.can_finalize(now) {
            return Err(PreconditionError::NotFinalizable.into());
        }

        self.sending = true;
        let result: Result<TxHandle, Error> = (|| {
            let tx = ledger.submit(wallet.sign(WriteCall::RequestFinalize {
                proposal: self.index,
            }))?;
            ledger.confirm(&tx)?;
            Ok(tx)
        })();
        self.sending = false;
        result
    }

    #[cfg(test)]
    fn force_sending(&mut self) {
        self.sending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_proposal() -> Proposal {
        Proposal {
            title: "Open".to_string(),
            options: vec!["Yes".to_string(), "No".to_string()],
            start_time: 100,
            end_time: 200,
            finalized: false,
            pending: false,
        }
    }

    fn ledger_with(proposal: Proposal, now: u64) -> MemLedger {
        let ledger = MemLedger::new();
        ledger.set_now(now);
        ledger.seed(proposal);
        ledger
    }

    #[test]
    fn vote_requires_signer() {
        let ledger = ledger_with(open_proposal(), 150);
        let encryption = MockEncryption::ready();
        let mut detail = ProposalDetail::new(0, open_proposal());

        let err = detail
            .vote(&ledger, None, &encryption, 0, 150)
            .unwrap_err();
        assert!(err.to_string().contains("connect a wallet"));
        assert_eq!(detail.last_error(), Some(err.to_string().as_str()));
        assert_eq!(ledger.voter_count(0).unwrap(), 0);
    }

    #[test]
    fn vote_requires_ready_encryption() {
        let ledger = ledger_with(open_proposal(), 150);
        let wallet = Wallet::generate();
        let mut detail = ProposalDetail::new(0, open_proposal());

        for state in [
            EncryptionState::Uninitialized,
            EncryptionState::Initializing,
            EncryptionState::Error("boom".to_string()),
        ]
        .iter()
        {
            let encryption = MockEncryption::with_state(state.clone());
            let err = detail
                .vote(&ledger, Some(&wallet), &encryption, 0, 150)
                .unwrap_err();
            assert!(err.to_string().contains("encryption not ready"));
        }

        // Nothing reached the ledger
        assert_eq!(ledger.voter_count(0).unwrap(), 0);
    }

    #[test]
    fn vote_requires_open_window() {
        let ledger = ledger_with(open_proposal(), 250);
        let wallet = Wallet::generate();
        let encryption = MockEncryption::ready();
        let mut detail = ProposalDetail::new(0, open_proposal());

        let err = detail
            .vote(&ledger, Some(&wallet), &encryption, 0, 250)
            .unwrap_err();
        assert!(err.to_string().contains("voting window is closed"));

        let err = detail
            .vote(&ledger, Some(&wallet), &encryption, 9, 150)
            .unwrap_err();
        assert!(err.to_string().contains("option 9 does not exist"));
    }

    #[test]
    fn vote_refreshes_voter_count() {
        let ledger = ledger_with(open_proposal(), 150);
        let wallet = Wallet::generate();
        let encryption = MockEncryption::ready();
        let mut detail = ProposalDetail::new(0, open_proposal());

        detail.refresh(&ledger);
        assert_eq!(detail.voters(), Some(0));

        detail
            .vote(&ledger, Some(&wallet), &encryption, 1, 150)
            .unwrap();
        assert_eq!(detail.voters(), Some(1));
        assert!(detail.last_error().is_none());
        assert!(!detail.is_sending());
    }

    #[test]
    fn reentrant_submission_is_refused() {
        let ledger = ledger_with(open_proposal(), 150);
        let wallet = Wallet::generate();
        let encryption = MockEncryption::ready();
        let mut detail = ProposalDetail::new(0, open_proposal());

        detail.force_sending();
        let err = detail
            .vote(&ledger, Some(&wallet), &encryption, 0, 150)
            .unwrap_err();
        assert!(err.to_string().contains("already in flight"));
        assert_eq!(ledger.voter_count(0).unwrap(), 0);
    }

    #[test]
    fn finalize_flow() {
        let proposal = open_proposal();
        let ledger = ledger_with(proposal.clone(), 250);
        let wallet = Wallet::generate();
        let mut detail = ProposalDetail::new(0, proposal);

        assert!(!detail.can_finalize(150));
        let err = detail.finalize(&ledger, Some(&wallet), 150).unwrap_err();
        assert!(err.to_string().contains("not ready to finalize"));

        detail.finalize(&ledger, Some(&wallet), 250).unwrap();

        // The local snapshot is untouched; the ledger now shows pending
        assert!(!detail.proposal().pending);
        assert!(ledger.proposal(0).unwrap().pending);
    }

    #[test]
    fn refresh_fetches_results_once_finalized() {
        let mut finalized = open_proposal();
        finalized.finalized = true;

        let ledger = MemLedger::new();
        ledger.set_now(250);
        ledger.seed(open_proposal());

        // Drive the ledger-side finalization
        let wallet = Wallet::generate();
        let tx = ledger
            .submit(wallet.sign(WriteCall::RequestFinalize { proposal: 0 }))
            .unwrap();
        ledger.confirm(&tx).unwrap();
        ledger.complete_finalize(0).unwrap();

        let mut detail = ProposalDetail::new(0, finalized);
        detail.refresh(&ledger);

        let results = detail.results().unwrap();
        assert_eq!(results.len(), detail.proposal().options.len());
    }
}
