use thiserror::Error;

/// Precondition failures, raised before any network call is made.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("secretvote: connect a wallet before submitting")]
    NoSigner,

    #[error("secretvote: encryption not ready")]
    EncryptionNotReady,

    #[error("secretvote: title required")]
    TitleRequired,

    #[error("secretvote: at least 2 options required")]
    TooFewOptions,

    #[error("secretvote: start and end times required")]
    MissingSchedule,

    #[error("secretvote: voting window is closed")]
    VotingClosed,

    #[error("secretvote: proposal is not ready to finalize")]
    NotFinalizable,

    #[error("secretvote: option {0} does not exist")]
    InvalidOption(usize),

    #[error("secretvote: a submission is already in flight")]
    SubmissionInFlight,
}

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("secretvote: ledger error: {0}")]
    Ledger(String),

    #[error("secretvote: transaction rejected: {0}")]
    TransactionRejected(String),

    #[error("secretvote: encryption error: {0}")]
    Encryption(String),

    #[error("secretvote: proposal {0} not found")]
    ProposalNotFound(u64),

    #[error("secretvote: results not available until finalized")]
    ResultsNotAvailable,

    #[error("secretvote: signature error: {0}")]
    SignatureError(#[from] ed25519_dalek::SignatureError),

    #[error("secretvote: invalid hexadecimal: {0}")]
    BadHex(#[from] hex::FromHexError),

    #[error("secretvote: CBOR error deserializing call: {0}")]
    CBORDeserialization(#[from] serde_cbor::Error),

    #[error("secretvote: JSON error deserializing call: {0}")]
    JSONDeserialization(#[from] serde_json::Error),

    #[error("secretvote: error deserializing call: unknown format")]
    DeserializationUnknownFormat,
}
