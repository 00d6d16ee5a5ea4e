use crate::*;
use indexmap::IndexMap;

/// The proposal list view.
///
/// One count query, then two sequential queries per index (metadata, voter
/// count), accumulated into a keyed cache. The cache is read-only after a
/// load and survives drilling into a detail view and back.
#[derive(Default)]
pub struct ProposalList {
    cards: IndexMap<u64, ProposalCard>,
    count: u64,
    loading: bool,
}

impl ProposalList {
    pub fn new() -> Self {
        ProposalList::default()
    }

    /// Load all proposals from the ledger.
    ///
    /// This is a background refresh with no error surface: total failure
    /// degrades to an empty list, and a failure partway leaves the fetched
    /// prefix cached. The token is checked between queries; cancelling stops
    /// the remaining fetches.
    pub fn load<L: LedgerReader>(&mut self, ledger: &L, cancel: &CancelToken) {
        self.loading = true;
        let _ = self.try_load(ledger, cancel);
        self.loading = false;
    }

    fn try_load<L: LedgerReader>(&mut self, ledger: &L, cancel: &CancelToken) -> Result<(), Error> {
        self.cards.clear();
        self.count = ledger.proposal_count()?;

        for index in 0..self.count {
            if cancel.is_cancelled() {
                break;
            }
            let proposal = ledger.proposal(index)?;
            let voters = ledger.voter_count(index)?;
            self.cards.insert(index, ProposalCard { proposal, voters });
        }
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Total on the ledger, which may exceed the cached cards after a
    /// cancelled or partially failed load.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<u64, ProposalCard> {
        self.cards.iter()
    }

    /// Cached metadata for one proposal.
    pub fn card(&self, index: u64) -> Option<&ProposalCard> {
        self.cards.get(&index)
    }

    /// Drill down into a detail view over the cached snapshot.
    ///
    /// The cache itself is untouched; returning from the detail view finds
    /// it as it was.
    pub fn select(&self, index: u64) -> Option<ProposalDetail> {
        self.cards
            .get(&index)
            .map(|card| ProposalDetail::new(index, card.proposal.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_ledger() -> MemLedger {
        let ledger = MemLedger::new();
        // now = 1000: one future, one active, one finalized
        ledger.set_now(1000);
        ledger.seed(Proposal {
            title: "Future".to_string(),
            options: vec!["A".to_string(), "B".to_string()],
            start_time: 2000,
            end_time: 3000,
            finalized: false,
            pending: false,
        });
        ledger.seed(Proposal {
            title: "Open".to_string(),
            options: vec!["A".to_string(), "B".to_string()],
            start_time: 500,
            end_time: 1500,
            finalized: false,
            pending: false,
        });
        ledger.seed(Proposal {
            title: "Done".to_string(),
            options: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            start_time: 100,
            end_time: 200,
            finalized: true,
            pending: false,
        });
        ledger
    }

    #[test]
    fn loads_all_cards_with_badges() {
        let ledger = seeded_ledger();
        let mut list = ProposalList::new();
        list.load(&ledger, &CancelToken::new());

        assert!(!list.is_loading());
        assert_eq!(list.count(), 3);

        let now = 1000;
        assert_eq!(
            list.card(0).unwrap().proposal.status(now),
            ProposalStatus::Pending
        );
        assert_eq!(
            list.card(1).unwrap().proposal.status(now),
            ProposalStatus::Active
        );
        assert_eq!(
            list.card(2).unwrap().proposal.status(now),
            ProposalStatus::Finalized
        );

        let detail = list.select(1).unwrap();
        assert_eq!(detail.proposal().title, "Open");
        // Selecting does not disturb the cache
        assert_eq!(list.card(1).unwrap().proposal.title, "Open");
        assert!(list.select(7).is_none());
    }

    struct FailingLedger;

    impl LedgerReader for FailingLedger {
        fn proposal_count(&self) -> Result<u64, Error> {
            Err(Error::Ledger("rpc unreachable".to_string()))
        }
        fn proposal(&self, index: u64) -> Result<Proposal, Error> {
            Err(Error::ProposalNotFound(index))
        }
        fn voter_count(&self, index: u64) -> Result<u64, Error> {
            Err(Error::ProposalNotFound(index))
        }
        fn results(&self, index: u64) -> Result<Vec<u64>, Error> {
            Err(Error::ProposalNotFound(index))
        }
    }

    #[test]
    fn total_failure_degrades_to_empty() {
        let mut list = ProposalList::new();
        list.load(&FailingLedger, &CancelToken::new());

        assert!(list.is_empty());
        assert_eq!(list.count(), 0);
        assert!(!list.is_loading());
    }

    /// Delegates reads but cancels the token on the first metadata fetch.
    struct CancelOnFirstFetch<'a> {
        inner: &'a MemLedger,
        token: &'a CancelToken,
    }

    impl LedgerReader for CancelOnFirstFetch<'_> {
        fn proposal_count(&self) -> Result<u64, Error> {
            self.inner.proposal_count()
        }
        fn proposal(&self, index: u64) -> Result<Proposal, Error> {
            self.token.cancel();
            self.inner.proposal(index)
        }
        fn voter_count(&self, index: u64) -> Result<u64, Error> {
            self.inner.voter_count(index)
        }
        fn results(&self, index: u64) -> Result<Vec<u64>, Error> {
            self.inner.results(index)
        }
    }

    #[test]
    fn cancelled_load_keeps_fetched_prefix() {
        let ledger = seeded_ledger();
        let token = CancelToken::new();
        let reader = CancelOnFirstFetch {
            inner: &ledger,
            token: &token,
        };

        let mut list = ProposalList::new();
        list.load(&reader, &token);

        // The in-flight index completed; the rest of the loop was abandoned
        assert_eq!(list.iter().count(), 1);
        assert!(list.card(0).is_some());
        assert!(list.card(1).is_none());
        assert_eq!(list.count(), 3);
    }
}
