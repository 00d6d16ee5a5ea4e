use crate::*;
use ed25519_dalek::Keypair;
use ed25519_dalek::PublicKey;
use ed25519_dalek::SecretKey;
use sha2::{Digest, Sha256};

/// A connected signing account.
///
/// Passed explicitly into the views that need one; a disconnected session is
/// simply `None`.
pub struct Wallet {
    keypair: Keypair,
}

impl Wallet {
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng {};
        let keypair = Keypair::generate(&mut csprng);
        Wallet { keypair }
    }

    pub fn from_secret_hex(hex_key: &str) -> Result<Self, Error> {
        let bytes = hex::decode(hex_key.trim())?;
        let secret = SecretKey::from_bytes(&bytes)?;
        let public = PublicKey::from(&secret);
        Ok(Wallet {
            keypair: Keypair { secret, public },
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keypair.public
    }

    pub fn secret_hex(&self) -> String {
        hex::encode(self.keypair.secret.as_bytes())
    }

    /// The connected account's address.
    pub fn address(&self) -> String {
        address_of(&self.keypair.public)
    }

    /// Sign a write call with this wallet's key.
    pub fn sign(&self, call: WriteCall) -> SignedCall {
        SignedCall::sign(&self.keypair, call)
    }
}

/// Account address for a public key: `0x` plus the 20-byte tail of its sha256.
pub fn address_of(public: &PublicKey) -> String {
    let digest = Sha256::digest(public.as_bytes());
    format!("0x{}", hex::encode(&digest[12..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_secret_key() {
        let wallet = Wallet::generate();
        let restored = Wallet::from_secret_hex(&wallet.secret_hex()).unwrap();

        assert_eq!(wallet.public_key(), restored.public_key());
        assert_eq!(wallet.address(), restored.address());
    }

    #[test]
    fn address_shape() {
        let wallet = Wallet::generate();
        let address = wallet.address();

        assert!(address.starts_with("0x"));
        assert_eq!(address.len(), 2 + 40);
    }

    #[test]
    fn bad_secret_key() {
        assert!(Wallet::from_secret_hex("not-hex").is_err());
        assert!(Wallet::from_secret_hex("abcd").is_err());
    }
}
