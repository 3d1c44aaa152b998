use std::fmt;
use std::path::Path;
use std::str::FromStr;

use ed25519_dalek::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use ed25519_dalek::{Signer as _, Verifier as _};
use k256::pkcs8::LineEnding;
use log::debug;
use rand::RngCore;

use super::bytesrepr::ToBytes;
use super::error::KeyError;
use super::hash::blake2b256_parts;
use super::key::AccountHash;

const SEC1_PEM_LABEL: &str = "BEGIN EC PRIVATE KEY";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyAlgorithm {
    Ed25519,
    Secp256k1,
}

impl KeyAlgorithm {
    pub fn tag(&self) -> u8 {
        match self {
            KeyAlgorithm::Ed25519 => 1,
            KeyAlgorithm::Secp256k1 => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, KeyError> {
        match tag {
            1 => Ok(KeyAlgorithm::Ed25519),
            2 => Ok(KeyAlgorithm::Secp256k1),
            other => Err(KeyError::UnknownAlgorithm(format!("tag {other}"))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            KeyAlgorithm::Ed25519 => "ed25519",
            KeyAlgorithm::Secp256k1 => "secp256k1",
        }
    }

    fn public_key_len(&self) -> usize {
        match self {
            KeyAlgorithm::Ed25519 => 32,
            KeyAlgorithm::Secp256k1 => 33,
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyAlgorithm {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ed25519" => Ok(KeyAlgorithm::Ed25519),
            "secp256k1" => Ok(KeyAlgorithm::Secp256k1),
            other => Err(KeyError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Public key as the node sees it: algorithm tag plus raw key bytes
/// (32 bytes for Ed25519, 33 compressed SEC1 bytes for Secp256k1).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey {
    algorithm: KeyAlgorithm,
    raw: Vec<u8>,
}

impl PublicKey {
    pub fn new(algorithm: KeyAlgorithm, raw: Vec<u8>) -> Result<Self, KeyError> {
        if raw.len() != algorithm.public_key_len() {
            return Err(KeyError::PublicKey(format!(
                "{algorithm} public key must be {} bytes, got {}",
                algorithm.public_key_len(),
                raw.len()
            )));
        }
        let key = Self { algorithm, raw };
        key.validate()?;
        Ok(key)
    }

    /// Parses the tagged hex form, e.g. `01<64 hex>`.
    pub fn from_hex(input: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(input.trim())
            .map_err(|e| KeyError::PublicKey(format!("invalid hex: {e}")))?;
        let (tag, raw) = bytes
            .split_first()
            .ok_or_else(|| KeyError::PublicKey("empty public key".to_string()))?;
        Self::new(KeyAlgorithm::from_tag(*tag)?, raw.to_vec())
    }

    fn validate(&self) -> Result<(), KeyError> {
        match self.algorithm {
            KeyAlgorithm::Ed25519 => {
                let raw: [u8; 32] = self.raw.as_slice().try_into().map_err(|_| {
                    KeyError::PublicKey("ed25519 public key must be 32 bytes".to_string())
                })?;
                ed25519_dalek::VerifyingKey::from_bytes(&raw)
                    .map(|_| ())
                    .map_err(|e| KeyError::PublicKey(e.to_string()))
            }
            KeyAlgorithm::Secp256k1 => k256::ecdsa::VerifyingKey::from_sec1_bytes(&self.raw)
                .map(|_| ())
                .map_err(|e| KeyError::PublicKey(e.to_string())),
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn to_hex(&self) -> String {
        format!("{:02x}{}", self.algorithm.tag(), hex::encode(&self.raw))
    }

    /// `blake2b256(algorithm name || 0x00 || raw key)`.
    pub fn account_hash(&self) -> AccountHash {
        AccountHash::new(blake2b256_parts(&[
            self.algorithm.name().as_bytes(),
            &[0],
            &self.raw,
        ]))
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), KeyError> {
        if signature.algorithm != self.algorithm {
            return Err(KeyError::Signature(format!(
                "{} signature checked against {} key",
                signature.algorithm, self.algorithm
            )));
        }
        match self.algorithm {
            KeyAlgorithm::Ed25519 => {
                let raw: [u8; 32] = self.raw.as_slice().try_into().map_err(|_| {
                    KeyError::PublicKey("ed25519 public key must be 32 bytes".to_string())
                })?;
                let key = ed25519_dalek::VerifyingKey::from_bytes(&raw)
                    .map_err(|e| KeyError::PublicKey(e.to_string()))?;
                let sig = ed25519_dalek::Signature::from_bytes(&signature.raw);
                key.verify(message, &sig)
                    .map_err(|e| KeyError::Signature(e.to_string()))
            }
            KeyAlgorithm::Secp256k1 => {
                let key = k256::ecdsa::VerifyingKey::from_sec1_bytes(&self.raw)
                    .map_err(|e| KeyError::PublicKey(e.to_string()))?;
                let sig = k256::ecdsa::Signature::from_slice(&signature.raw)
                    .map_err(|e| KeyError::Signature(e.to_string()))?;
                key.verify(message, &sig)
                    .map_err(|e| KeyError::Signature(e.to_string()))
            }
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl ToBytes for PublicKey {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(self.algorithm.tag());
        out.extend_from_slice(&self.raw);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature {
    algorithm: KeyAlgorithm,
    raw: [u8; 64],
}

impl Signature {
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    pub fn to_hex(&self) -> String {
        format!("{:02x}{}", self.algorithm.tag(), hex::encode(self.raw))
    }
}

impl ToBytes for Signature {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(self.algorithm.tag());
        out.extend_from_slice(&self.raw);
    }
}

enum SecretKey {
    Ed25519(ed25519_dalek::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
}

/// A signing identity loaded once at the process boundary.
pub struct Identity {
    secret: SecretKey,
    public_key: PublicKey,
}

impl Identity {
    fn from_secret(secret: SecretKey) -> Self {
        let public_key = match &secret {
            SecretKey::Ed25519(key) => PublicKey {
                algorithm: KeyAlgorithm::Ed25519,
                raw: key.verifying_key().to_bytes().to_vec(),
            },
            SecretKey::Secp256k1(key) => PublicKey {
                algorithm: KeyAlgorithm::Secp256k1,
                raw: key.verifying_key().to_encoded_point(true).as_bytes().to_vec(),
            },
        };
        Self { secret, public_key }
    }

    /// Loads a PEM encoded secret key. Ed25519 keys are PKCS#8, Secp256k1
    /// keys are SEC1 (`EC PRIVATE KEY`) or PKCS#8. Without an explicit
    /// algorithm the scheme is detected from the PEM contents.
    pub fn from_pem(pem: &str, algorithm: Option<KeyAlgorithm>) -> Result<Self, KeyError> {
        let is_sec1 = pem.contains(SEC1_PEM_LABEL);
        let secret = match (algorithm, is_sec1) {
            (Some(KeyAlgorithm::Ed25519), true) => {
                return Err(KeyError::Pem(
                    "EC PRIVATE KEY cannot hold an ed25519 key".to_string(),
                ))
            }
            (_, true) => SecretKey::Secp256k1(secp256k1_from_sec1(pem)?),
            (Some(KeyAlgorithm::Ed25519), false) => SecretKey::Ed25519(ed25519_from_pkcs8(pem)?),
            (Some(KeyAlgorithm::Secp256k1), false) => {
                SecretKey::Secp256k1(secp256k1_from_pkcs8(pem)?)
            }
            (None, false) => match ed25519_from_pkcs8(pem) {
                Ok(key) => SecretKey::Ed25519(key),
                Err(ed_err) => SecretKey::Secp256k1(secp256k1_from_pkcs8(pem).map_err(|_| ed_err)?),
            },
        };
        let identity = Self::from_secret(secret);
        debug!(
            "Loaded {} key {}",
            identity.algorithm(),
            identity.public_key()
        );
        Ok(identity)
    }

    pub fn from_pem_file(
        path: impl AsRef<Path>,
        algorithm: Option<KeyAlgorithm>,
    ) -> Result<Self, KeyError> {
        let path = path.as_ref();
        let pem = std::fs::read_to_string(path).map_err(|source| KeyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_pem(&pem, algorithm)
    }

    pub fn generate(algorithm: KeyAlgorithm) -> Result<Self, KeyError> {
        let mut rng = rand::rng();
        let mut secret_bytes = [0u8; 32];
        rng.fill_bytes(&mut secret_bytes);
        Self::from_secret_bytes(algorithm, &secret_bytes)
    }

    pub fn from_secret_bytes(algorithm: KeyAlgorithm, bytes: &[u8; 32]) -> Result<Self, KeyError> {
        let secret = match algorithm {
            KeyAlgorithm::Ed25519 => SecretKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(bytes)),
            KeyAlgorithm::Secp256k1 => SecretKey::Secp256k1(
                k256::ecdsa::SigningKey::from_slice(bytes)
                    .map_err(|e| KeyError::Pem(format!("invalid secp256k1 scalar: {e}")))?,
            ),
        };
        Ok(Self::from_secret(secret))
    }

    /// PEM text in the same format `from_pem` reads.
    pub fn to_pem(&self) -> Result<String, KeyError> {
        match &self.secret {
            SecretKey::Ed25519(key) => key
                .to_pkcs8_pem(LineEnding::LF)
                .map(|pem| pem.to_string())
                .map_err(|e| KeyError::Pem(e.to_string())),
            SecretKey::Secp256k1(key) => k256::SecretKey::from(key)
                .to_sec1_pem(LineEnding::LF)
                .map(|pem| pem.to_string())
                .map_err(|e| KeyError::Pem(e.to_string())),
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        self.public_key.algorithm
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn account_hash(&self) -> AccountHash {
        self.public_key.account_hash()
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        match &self.secret {
            SecretKey::Ed25519(key) => Signature {
                algorithm: KeyAlgorithm::Ed25519,
                raw: key.sign(message).to_bytes(),
            },
            SecretKey::Secp256k1(key) => {
                let sig: k256::ecdsa::Signature = key.sign(message);
                let mut raw = [0u8; 64];
                raw.copy_from_slice(sig.to_bytes().as_slice());
                Signature {
                    algorithm: KeyAlgorithm::Secp256k1,
                    raw,
                }
            }
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("public_key", &self.public_key.to_hex())
            .finish_non_exhaustive()
    }
}

fn ed25519_from_pkcs8(pem: &str) -> Result<ed25519_dalek::SigningKey, KeyError> {
    ed25519_dalek::SigningKey::from_pkcs8_pem(pem)
        .map_err(|e| KeyError::Pem(format!("ed25519 PKCS#8: {e}")))
}

fn secp256k1_from_sec1(pem: &str) -> Result<k256::ecdsa::SigningKey, KeyError> {
    k256::SecretKey::from_sec1_pem(pem)
        .map(k256::ecdsa::SigningKey::from)
        .map_err(|e| KeyError::Pem(format!("secp256k1 SEC1: {e}")))
}

fn secp256k1_from_pkcs8(pem: &str) -> Result<k256::ecdsa::SigningKey, KeyError> {
    <k256::SecretKey as k256::pkcs8::DecodePrivateKey>::from_pkcs8_pem(pem)
        .map(k256::ecdsa::SigningKey::from)
        .map_err(|e| KeyError::Pem(format!("secp256k1 PKCS#8: {e}")))
}
