use crate::*;

/// A proposal as recorded by the contract.
///
/// Created by a `create_proposal` call; mutated externally by `vote` and
/// `request_finalize` calls; never deleted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Proposal {
    pub title: String,

    /// Ordered option labels, length >= 2
    pub options: Vec<String>,

    /// Voting window, in whole seconds since the unix epoch
    pub start_time: u64,
    pub end_time: u64,

    pub finalized: bool,

    /// A finalize request has been submitted but its result has not come back
    pub pending: bool,
}

impl Proposal {
    /// Status badge as of `now` (unix seconds).
    ///
    /// `Finalized` wins regardless of where `now` falls in the window.
    pub fn status(&self, now: u64) -> ProposalStatus {
        if self.finalized {
            ProposalStatus::Finalized
        } else if now < self.start_time {
            ProposalStatus::Pending
        } else if now <= self.end_time {
            ProposalStatus::Active
        } else {
            ProposalStatus::Ended
        }
    }

    /// A vote may only be attempted inside the open window of an unfinalized proposal.
    pub fn can_vote(&self, now: u64) -> bool {
        now >= self.start_time && now <= self.end_time && !self.finalized
    }

    /// Finalization may only be requested once the window has closed, and only once.
    pub fn can_finalize(&self, now: u64) -> bool {
        now > self.end_time && !self.finalized && !self.pending
    }
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Active,
    Ended,
    Finalized,
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            ProposalStatus::Pending => "Pending",
            ProposalStatus::Active => "Active",
            ProposalStatus::Ended => "Ended",
            ProposalStatus::Finalized => "Finalized",
        };
        write!(f, "{}", name)
    }
}

/// List-cache entry: a proposal plus its voter count.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProposalCard {
    pub proposal: Proposal,

    /// Monotonically non-decreasing until finalization
    pub voters: u64,
}
