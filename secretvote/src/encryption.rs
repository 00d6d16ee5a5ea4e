use crate::*;
use sha2::{Digest, Sha256};

/// Readiness of the external encryption provider, as observed by this client.
///
/// `uninitialized -> initializing -> {ready | error}`. `error` is terminal
/// for the session; `ready` persists until the provider is reset externally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptionState {
    Uninitialized,
    Initializing,
    Ready,
    Error(String),
}

impl EncryptionState {
    pub fn is_ready(&self) -> bool {
        *self == EncryptionState::Ready
    }

    /// Inline badge shown by the shell and the detail view.
    ///
    /// Nothing is rendered in the indeterminate state.
    pub fn badge(&self) -> Option<Badge> {
        match self {
            EncryptionState::Uninitialized => None,
            EncryptionState::Initializing => Some(Badge {
                label: "Encryption: Initializing…".to_string(),
                tone: Tone::Warning,
                detail: None,
            }),
            EncryptionState::Error(msg) => Some(Badge {
                label: "Encryption: Error".to_string(),
                tone: Tone::Error,
                detail: Some(msg.clone()),
            }),
            EncryptionState::Ready => Some(Badge {
                label: "Encryption: Ready".to_string(),
                tone: Tone::Success,
                detail: None,
            }),
        }
    }
}

/// A small styled badge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
    pub detail: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tone {
    Warning,
    Error,
    Success,
}

/// An encrypted option index plus its inclusion proof, as the contract expects it.
///
/// The plaintext never appears in any write payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncryptedBallot {
    #[serde(with = "hex_serde")]
    pub handle: Vec<u8>,

    #[serde(with = "hex_serde")]
    pub proof: Vec<u8>,
}

/// Client handle to the external encryption service.
///
/// Implementations are bound to one contract address at construction.
pub trait EncryptionProvider {
    fn state(&self) -> EncryptionState;

    /// Package a plaintext option index for the given account.
    ///
    /// Fails unless `state()` is `Ready`.
    fn encrypt_choice(&self, account: &str, value: u32) -> Result<EncryptedBallot, Error>;
}

/// An encryption provider for tests.
///
/// The "ciphertext" carries the plaintext in the last 4 bytes of the handle
/// so MemLedger's finalization oracle can tally it back out.
pub struct MockEncryption {
    state: EncryptionState,
}

impl MockEncryption {
    pub fn ready() -> Self {
        MockEncryption {
            state: EncryptionState::Ready,
        }
    }

    pub fn with_state(state: EncryptionState) -> Self {
        MockEncryption { state }
    }
}

impl EncryptionProvider for MockEncryption {
    fn state(&self) -> EncryptionState {
        self.state.clone()
    }

    fn encrypt_choice(&self, account: &str, value: u32) -> Result<EncryptedBallot, Error> {
        if !self.state.is_ready() {
            return Err(PreconditionError::EncryptionNotReady.into());
        }

        let mut handle = Sha256::digest(account.as_bytes())[..28].to_vec();
        handle.extend_from_slice(&value.to_le_bytes());
        let proof = Sha256::digest(&handle).to_vec();

        Ok(EncryptedBallot { handle, proof })
    }
}
