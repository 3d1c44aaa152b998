//! Deploy envelope: header, payment and session items, approvals.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use super::args::RuntimeArgs;
use super::bytesrepr::{self, ToBytes};
use super::error::{DeployError, KeyError};
use super::hash::{blake2b256, blake2b256_parts};
use super::key::HashAddr;
use super::wallet::{PublicKey, Signature};

pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_GAS_PRICE: u64 = 1;

const TAG_MODULE_BYTES: u8 = 0;
const TAG_STORED_CONTRACT_BY_HASH: u8 = 1;
const TAG_STORED_VERSIONED_CONTRACT_BY_HASH: u8 = 3;

/// Milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis().max(0) as u64)
    }

    pub fn millis(&self) -> u64 {
        self.0
    }

    /// RFC 3339 with millisecond precision, as the node expects in JSON.
    pub fn to_rfc3339(&self) -> String {
        DateTime::<Utc>::from_timestamp_millis(self.0 as i64)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Human readable ttl such as `30m` or `1h`.
pub fn format_ttl(ttl: Duration) -> String {
    let millis = ttl.as_millis();
    if millis == 0 {
        return "0ms".to_string();
    }
    const UNITS: [(u128, &str); 4] = [(86_400_000, "day"), (3_600_000, "h"), (60_000, "m"), (1_000, "s")];
    for (unit, suffix) in UNITS {
        if millis % unit == 0 {
            return format!("{}{}", millis / unit, suffix);
        }
    }
    format!("{millis}ms")
}

/// Parses the `format_ttl` notation: a whole number followed by `ms`, `s`,
/// `m`, `h` or `day`.
pub fn parse_ttl(input: &str) -> Result<Duration, DeployError> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(split);
    let value: u64 = number
        .parse()
        .map_err(|_| DeployError::encoding(format!("invalid ttl '{trimmed}'")))?;
    let unit_millis: u64 = match suffix {
        "ms" => 1,
        "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "day" | "d" => 86_400_000,
        _ => return Err(DeployError::encoding(format!("invalid ttl unit in '{trimmed}'"))),
    };
    let millis = value
        .checked_mul(unit_millis)
        .ok_or_else(|| DeployError::encoding(format!("ttl '{trimmed}' is too large")))?;
    if millis == 0 {
        return Err(DeployError::encoding("ttl must be greater than zero"));
    }
    Ok(Duration::from_millis(millis))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(input: &str) -> Result<Self, DeployError> {
        super::key::decode_hash_hex(input.trim()).map(Self)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl ToBytes for Digest {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

pub type DeployHash = Digest;

/// Payment or session code of a deploy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutableDeployItem {
    ModuleBytes {
        module_bytes: Vec<u8>,
        args: RuntimeArgs,
    },
    StoredContractByHash {
        hash: HashAddr,
        entry_point: String,
        args: RuntimeArgs,
    },
    StoredVersionedContractByHash {
        hash: HashAddr,
        version: Option<u32>,
        entry_point: String,
        args: RuntimeArgs,
    },
}

impl ExecutableDeployItem {
    /// Standard payment: empty module bytes with `{amount: U512}`.
    pub fn standard_payment(amount: u64) -> Self {
        ExecutableDeployItem::ModuleBytes {
            module_bytes: Vec::new(),
            args: RuntimeArgs::standard_payment(amount),
        }
    }

    pub fn args(&self) -> &RuntimeArgs {
        match self {
            ExecutableDeployItem::ModuleBytes { args, .. }
            | ExecutableDeployItem::StoredContractByHash { args, .. }
            | ExecutableDeployItem::StoredVersionedContractByHash { args, .. } => args,
        }
    }

    pub fn entry_point(&self) -> Option<&str> {
        match self {
            ExecutableDeployItem::ModuleBytes { .. } => None,
            ExecutableDeployItem::StoredContractByHash { entry_point, .. }
            | ExecutableDeployItem::StoredVersionedContractByHash { entry_point, .. } => {
                Some(entry_point)
            }
        }
    }

    pub fn is_install(&self) -> bool {
        matches!(self, ExecutableDeployItem::ModuleBytes { module_bytes, .. } if !module_bytes.is_empty())
    }

    pub fn to_json(&self) -> Value {
        match self {
            ExecutableDeployItem::ModuleBytes { module_bytes, args } => json!({
                "ModuleBytes": {
                    "module_bytes": hex::encode(module_bytes),
                    "args": args.to_json(),
                }
            }),
            ExecutableDeployItem::StoredContractByHash {
                hash,
                entry_point,
                args,
            } => json!({
                "StoredContractByHash": {
                    "hash": hash.to_hex(),
                    "entry_point": entry_point,
                    "args": args.to_json(),
                }
            }),
            ExecutableDeployItem::StoredVersionedContractByHash {
                hash,
                version,
                entry_point,
                args,
            } => json!({
                "StoredVersionedContractByHash": {
                    "hash": hash.to_hex(),
                    "version": version,
                    "entry_point": entry_point,
                    "args": args.to_json(),
                }
            }),
        }
    }
}

impl ToBytes for ExecutableDeployItem {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        match self {
            ExecutableDeployItem::ModuleBytes { module_bytes, args } => {
                out.push(TAG_MODULE_BYTES);
                bytesrepr::write_byte_vec(module_bytes, out);
                args.write_bytes(out);
            }
            ExecutableDeployItem::StoredContractByHash {
                hash,
                entry_point,
                args,
            } => {
                out.push(TAG_STORED_CONTRACT_BY_HASH);
                hash.write_bytes(out);
                entry_point.write_bytes(out);
                args.write_bytes(out);
            }
            ExecutableDeployItem::StoredVersionedContractByHash {
                hash,
                version,
                entry_point,
                args,
            } => {
                out.push(TAG_STORED_VERSIONED_CONTRACT_BY_HASH);
                hash.write_bytes(out);
                version.write_bytes(out);
                entry_point.write_bytes(out);
                args.write_bytes(out);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployHeader {
    pub account: PublicKey,
    pub timestamp: Timestamp,
    pub ttl: Duration,
    pub gas_price: u64,
    pub body_hash: Digest,
    pub dependencies: Vec<DeployHash>,
    pub chain_name: String,
}

impl DeployHeader {
    pub fn to_json(&self) -> Value {
        json!({
            "account": self.account.to_hex(),
            "timestamp": self.timestamp.to_rfc3339(),
            "ttl": format_ttl(self.ttl),
            "gas_price": self.gas_price,
            "body_hash": self.body_hash.to_hex(),
            "dependencies": self.dependencies.iter().map(Digest::to_hex).collect::<Vec<_>>(),
            "chain_name": self.chain_name,
        })
    }
}

impl ToBytes for DeployHeader {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.account.write_bytes(out);
        self.timestamp.0.write_bytes(out);
        (self.ttl.as_millis() as u64).write_bytes(out);
        self.gas_price.write_bytes(out);
        self.body_hash.write_bytes(out);
        bytesrepr::write_len(self.dependencies.len(), out);
        for dependency in &self.dependencies {
            dependency.write_bytes(out);
        }
        self.chain_name.write_bytes(out);
    }
}

pub fn body_hash(payment: &ExecutableDeployItem, session: &ExecutableDeployItem) -> Digest {
    Digest(blake2b256_parts(&[&payment.to_bytes(), &session.to_bytes()]))
}

/// A fully assembled deploy that has not been signed yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedDeploy {
    hash: DeployHash,
    header: DeployHeader,
    payment: ExecutableDeployItem,
    session: ExecutableDeployItem,
}

impl UnsignedDeploy {
    /// Computes the body hash and deploy hash from the parts.
    pub fn new(
        account: PublicKey,
        timestamp: Timestamp,
        ttl: Duration,
        gas_price: u64,
        chain_name: String,
        payment: ExecutableDeployItem,
        session: ExecutableDeployItem,
    ) -> Self {
        let header = DeployHeader {
            account,
            timestamp,
            ttl,
            gas_price,
            body_hash: body_hash(&payment, &session),
            dependencies: Vec::new(),
            chain_name,
        };
        let hash = Digest(blake2b256(&header.to_bytes()));
        Self {
            hash,
            header,
            payment,
            session,
        }
    }

    pub fn hash(&self) -> &DeployHash {
        &self.hash
    }

    pub fn header(&self) -> &DeployHeader {
        &self.header
    }

    pub fn payment(&self) -> &ExecutableDeployItem {
        &self.payment
    }

    pub fn session(&self) -> &ExecutableDeployItem {
        &self.session
    }

    pub(crate) fn into_signed(self, approvals: Vec<Approval>) -> Deploy {
        Deploy {
            inner: self,
            approvals,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Approval {
    pub signer: PublicKey,
    pub signature: Signature,
}

impl Approval {
    pub fn to_json(&self) -> Value {
        json!({
            "signer": self.signer.to_hex(),
            "signature": self.signature.to_hex(),
        })
    }
}

impl ToBytes for Approval {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.signer.write_bytes(out);
        self.signature.write_bytes(out);
    }
}

/// A signed deploy, ready for submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deploy {
    inner: UnsignedDeploy,
    approvals: Vec<Approval>,
}

impl Deploy {
    pub fn hash(&self) -> &DeployHash {
        &self.inner.hash
    }

    pub fn header(&self) -> &DeployHeader {
        &self.inner.header
    }

    pub fn payment(&self) -> &ExecutableDeployItem {
        &self.inner.payment
    }

    pub fn session(&self) -> &ExecutableDeployItem {
        &self.inner.session
    }

    pub fn approvals(&self) -> &[Approval] {
        &self.approvals
    }

    /// Checks the hashes and every approval signature.
    pub fn verify(&self) -> Result<(), DeployError> {
        let expected_body = body_hash(&self.inner.payment, &self.inner.session);
        if expected_body != self.inner.header.body_hash {
            return Err(DeployError::encoding("body hash does not match payment and session"));
        }
        let expected_hash = Digest(blake2b256(&self.inner.header.to_bytes()));
        if expected_hash != self.inner.hash {
            return Err(DeployError::encoding("deploy hash does not match header"));
        }
        if self.approvals.is_empty() {
            return Err(DeployError::Key(KeyError::Signature(
                "deploy carries no approvals".to_string(),
            )));
        }
        for approval in &self.approvals {
            approval
                .signer
                .verify(self.inner.hash.as_bytes(), &approval.signature)?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Value {
        json!({
            "hash": self.inner.hash.to_hex(),
            "header": self.inner.header.to_json(),
            "payment": self.inner.payment.to_json(),
            "session": self.inner.session.to_json(),
            "approvals": self.approvals.iter().map(Approval::to_json).collect::<Vec<_>>(),
        })
    }
}

impl ToBytes for Deploy {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.inner.header.write_bytes(out);
        self.inner.hash.write_bytes(out);
        self.inner.payment.write_bytes(out);
        self.inner.session.write_bytes(out);
        self.approvals.write_bytes(out);
    }
}
