use crate::*;

/// Default schedule offsets: start = now + 5 minutes, end = start + 1 hour.
pub const DEFAULT_START_DELAY: u64 = 5 * 60;
pub const DEFAULT_DURATION: u64 = 60 * 60;

/// An editable, not-yet-submitted proposal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProposalDraft {
    pub title: String,

    /// Editable option rows. Rows may be blank while editing; blanks are
    /// trimmed away at validation.
    pub options: Vec<String>,

    /// Unix seconds. Both must be set before submission.
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
}

impl ProposalDraft {
    /// Two empty option rows and the default schedule.
    pub fn new(now: u64) -> Self {
        let start = now + DEFAULT_START_DELAY;
        ProposalDraft {
            title: String::new(),
            options: vec![String::new(), String::new()],
            start_time: Some(start),
            end_time: Some(start + DEFAULT_DURATION),
        }
    }

    pub fn add_option(&mut self) {
        self.options.push(String::new());
    }

    pub fn set_option(&mut self, index: usize, value: &str) {
        if let Some(slot) = self.options.get_mut(index) {
            *slot = value.to_string();
        }
    }

    /// Remove an option row. Refused at the two-row floor.
    pub fn remove_option(&mut self, index: usize) -> bool {
        if self.options.len() <= 2 || index >= self.options.len() {
            return false;
        }
        self.options.remove(index);
        true
    }

    /// Validate the draft and build the wire call.
    ///
    /// Runs entirely before any network I/O. `start < end` is not checked
    /// here; the contract rejects an inverted window.
    pub fn validate(&self) -> Result<WriteCall, PreconditionError> {
        if self.title.trim().is_empty() {
            return Err(PreconditionError::TitleRequired);
        }

        let options: Vec<String> = self
            .options
            .iter()
            .map(|option| option.trim())
            .filter(|option| !option.is_empty())
            .map(str::to_string)
            .collect();
        if options.len() < 2 {
            return Err(PreconditionError::TooFewOptions);
        }

        let (start_time, end_time) = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(PreconditionError::MissingSchedule),
        };

        Ok(WriteCall::CreateProposal {
            title: self.title.trim().to_string(),
            options,
            start_time,
            end_time,
        })
    }
}

/// The create-proposal view: a draft plus submission state.
pub struct CreateProposal {
    pub draft: ProposalDraft,
    tx_hash: Option<String>,
    error: Option<String>,
    sending: bool,
}

impl CreateProposal {
    pub fn new(now: u64) -> Self {
        CreateProposal {
            draft: ProposalDraft::new(now),
            tx_hash: None,
            error: None,
            sending: false,
        }
    }

    /// Hash of the pending creation transaction, surfaced as soon as the
    /// submission is accepted and before confirmation completes.
    pub fn tx_hash(&self) -> Option<&str> {
        self.tx_hash.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Validate and submit the draft, then block for confirmation.
    pub fn submit<W: LedgerWriter>(
        &mut self,
        ledger: &W,
        wallet: Option<&Wallet>,
    ) -> Result<TxHandle, Error> {
        self.error = None;
        self.tx_hash = None;
        let result = self.try_submit(ledger, wallet);
        if let Err(ref e) = result {
            self.error = Some(e.to_string());
        }
        result
    }

    fn try_submit<W: LedgerWriter>(
        &mut self,
        ledger: &W,
        wallet: Option<&Wallet>,
    ) -> Result<TxHandle, Error> {
        if self.sending {
            return Err(PreconditionError::SubmissionInFlight.into());
        }
        let wallet = wallet.ok_or(PreconditionError::NoSigner)?;
        let call = self.draft.validate()?;

        self.sending = true;
        let result: Result<TxHandle, Error> = (|| {
            let tx = ledger.submit(wallet.sign(call))?;
            self.tx_hash = Some(tx.hash.clone());
            ledger.confirm(&tx)?;
            Ok(tx)
        })();
        self.sending = false;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule() {
        let draft = ProposalDraft::new(10_000);
        assert_eq!(draft.start_time, Some(10_000 + 5 * 60));
        assert_eq!(draft.end_time, Some(10_000 + 5 * 60 + 60 * 60));
        assert_eq!(draft.options.len(), 2);
    }

    #[test]
    fn option_rows() {
        let mut draft = ProposalDraft::new(0);
        draft.add_option();
        draft.set_option(0, "Pizza");
        draft.set_option(1, "Sushi");
        draft.set_option(2, "Tacos");

        assert!(draft.remove_option(2));
        assert_eq!(draft.options, vec!["Pizza", "Sushi"]);

        // The two-row floor holds
        assert!(!draft.remove_option(0));
        assert!(!draft.remove_option(5));
        assert_eq!(draft.options.len(), 2);
    }

    #[test]
    fn validation_preconditions() {
        let mut draft = ProposalDraft::new(1_000);
        assert!(matches!(
            draft.validate(),
            Err(PreconditionError::TitleRequired)
        ));

        draft.title = "  Lunch  ".to_string();
        assert!(matches!(
            draft.validate(),
            Err(PreconditionError::TooFewOptions)
        ));

        // Whitespace-only rows do not count
        draft.set_option(0, "Pizza");
        draft.set_option(1, "   ");
        assert!(matches!(
            draft.validate(),
            Err(PreconditionError::TooFewOptions)
        ));

        draft.set_option(1, " Sushi ");
        draft.end_time = None;
        assert!(matches!(
            draft.validate(),
            Err(PreconditionError::MissingSchedule)
        ));

        draft.end_time = Some(2_000);
        match draft.validate().unwrap() {
            WriteCall::CreateProposal {
                title,
                options,
                start_time,
                end_time,
            } => {
                assert_eq!(title, "Lunch");
                assert_eq!(options, vec!["Pizza", "Sushi"]);
                assert_eq!(start_time, 1_300);
                assert_eq!(end_time, 2_000);
            }
            _ => panic!("wrong call type"),
        }
    }

    #[test]
    fn inverted_window_is_left_to_the_contract() {
        let mut draft = ProposalDraft::new(1_000);
        draft.title = "Backwards".to_string();
        draft.set_option(0, "A");
        draft.set_option(1, "B");
        draft.start_time = Some(2_000);
        draft.end_time = Some(1_000);

        // Validation passes; the ledger rejects it
        let call = draft.validate().unwrap();
        let ledger = MemLedger::new();
        let wallet = Wallet::generate();
        assert!(ledger.submit(wallet.sign(call)).is_err());
    }

    #[test]
    fn submit_requires_signer() {
        let ledger = MemLedger::new();
        let mut view = CreateProposal::new(1_000);
        view.draft.title = "Lunch".to_string();
        view.draft.set_option(0, "Pizza");
        view.draft.set_option(1, "Sushi");

        let err = view.submit(&ledger, None).unwrap_err();
        assert!(err.to_string().contains("connect a wallet"));
        assert!(view.tx_hash().is_none());
        assert_eq!(ledger.proposal_count().unwrap(), 0);
    }

    #[test]
    fn submit_surfaces_tx_hash() {
        let ledger = MemLedger::new();
        let wallet = Wallet::generate();
        let mut view = CreateProposal::new(1_000);
        view.draft.title = "Lunch".to_string();
        view.draft.set_option(0, "Pizza");
        view.draft.set_option(1, "Sushi");

        let tx = view.submit(&ledger, Some(&wallet)).unwrap();
        assert_eq!(view.tx_hash(), Some(tx.hash.as_str()));
        assert!(view.last_error().is_none());
        assert!(!view.is_sending());
        assert_eq!(ledger.proposal_count().unwrap(), 1);
    }
}
