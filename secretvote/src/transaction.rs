use crate::*;
use content_inspector::ContentType;
use ed25519_dalek::ExpandedSecretKey;
use ed25519_dalek::Keypair;
use ed25519_dalek::PublicKey;
use ed25519_dalek::Signature;
use ed25519_dalek::Verifier;

/// An unsigned write call against the voting contract
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum WriteCall {
    CreateProposal {
        title: String,
        options: Vec<String>,
        start_time: u64,
        end_time: u64,
    },
    Vote {
        proposal: u64,
        ballot: EncryptedBallot,
    },
    RequestFinalize {
        proposal: u64,
    },
}

impl WriteCall {
    /// Get the call type
    pub fn call_type(&self) -> CallType {
        match self {
            WriteCall::CreateProposal { .. } => CallType::CreateProposal,
            WriteCall::Vote { .. } => CallType::Vote,
            WriteCall::RequestFinalize { .. } => CallType::RequestFinalize,
        }
    }

    /// Pack into bytes
    pub fn as_bytes(&self) -> Vec<u8> {
        serde_cbor::to_vec(self).expect("secretvote: Unexpected error packing call")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match content_inspector::inspect(&bytes) {
            ContentType::UTF_8 => Ok(serde_json::from_slice(&bytes)?),
            ContentType::BINARY => Ok(serde_cbor::from_slice(&bytes)?),
            _ => Err(Error::DeserializationUnknownFormat),
        }
    }
}

/// A write call sealed with the wallet's signature, ready for submission
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignedCall {
    pub call: WriteCall,

    #[serde(with = "EdPublicKeyHex")]
    pub public_key: PublicKey,

    #[serde(with = "EdSignatureHex")]
    pub sig: Signature,
}

impl SignedCall {
    /// Sign a write call, producing a SignedCall
    pub fn sign(keypair: &Keypair, call: WriteCall) -> Self {
        let serialized = call.as_bytes();

        let expanded: ExpandedSecretKey = (&keypair.secret).into();
        let sig = expanded.sign(&serialized, &keypair.public);

        SignedCall {
            call,
            public_key: keypair.public,
            sig,
        }
    }

    /// Verify the signature on a signed call
    pub fn verify_signature(&self) -> Result<(), Error> {
        let serialized = self.call.as_bytes();
        Ok(self.public_key.verify(&serialized, &self.sig)?)
    }

    /// Pack into bytes
    pub fn as_bytes(&self) -> Vec<u8> {
        serde_cbor::to_vec(self).expect("secretvote: Unexpected error packing call")
    }

    /// Unpack from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        // If it starts with `{` then it's JSON
        if bytes[0] == 123 {
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            Ok(serde_cbor::from_slice(&bytes)?)
        }
    }
}

/// A call type
#[derive(Serialize, Deserialize, Copy, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CallType {
    CreateProposal,
    Vote,
    RequestFinalize,
}

impl std::fmt::Display for CallType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            CallType::CreateProposal => "create_proposal",
            CallType::Vote => "vote",
            CallType::RequestFinalize => "request_finalize",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn sign_and_verify() {
        let wallet = Wallet::generate();

        let signed = wallet.sign(WriteCall::RequestFinalize { proposal: 3 });
        signed.verify_signature().unwrap();
        assert_eq!(signed.call.call_type(), CallType::RequestFinalize);

        // Tampering with the payload breaks the signature
        let mut tampered = signed.clone();
        tampered.call = WriteCall::RequestFinalize { proposal: 4 };
        assert!(tampered.verify_signature().is_err());
    }

    #[test]
    fn unsigned_call_formats() {
        let call = WriteCall::CreateProposal {
            title: "Lunch".to_string(),
            options: vec!["Pizza".to_string(), "Sushi".to_string()],
            start_time: 1_700_000_300,
            end_time: 1_700_003_900,
        };

        let from_json = WriteCall::from_bytes(&serde_json::to_vec(&call).unwrap()).unwrap();
        assert_eq!(from_json, call);

        let from_cbor = WriteCall::from_bytes(&call.as_bytes()).unwrap();
        assert_eq!(from_cbor, call);
    }

    #[test]
    fn round_trip_formats() {
        let wallet = Wallet::generate();
        let ballot = EncryptedBallot {
            handle: vec![1, 2, 3, 4],
            proof: vec![5, 6, 7, 8],
        };
        let signed = wallet.sign(WriteCall::Vote {
            proposal: 0,
            ballot,
        });

        let json = serde_json::to_vec(&signed).unwrap();
        let from_json = SignedCall::from_bytes(&json).unwrap();
        from_json.verify_signature().unwrap();
        assert_eq!(from_json.call, signed.call);

        let cbor = signed.as_bytes();
        let from_cbor = SignedCall::from_bytes(&cbor).unwrap();
        from_cbor.verify_signature().unwrap();
        assert_eq!(from_cbor.call, signed.call);
    }
}
