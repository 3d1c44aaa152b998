use std::path::Path;
use std::time::Duration;

use log::debug;

use crate::casper::args::RuntimeArgs;
use crate::casper::bytesrepr::{self, ToBytes};
use crate::casper::deploy::{
    ExecutableDeployItem, Timestamp, UnsignedDeploy, DEFAULT_GAS_PRICE, DEFAULT_TTL,
};
use crate::casper::error::DeployError;
use crate::casper::key::HashAddr;
use crate::casper::wallet::PublicKey;

/// What the session code of a deploy runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Install {
        module_bytes: Vec<u8>,
    },
    Contract {
        hash: HashAddr,
        entry_point: String,
    },
    /// Call through a contract package, latest version when `version` is `None`.
    Package {
        hash: HashAddr,
        version: Option<u32>,
        entry_point: String,
    },
}

impl Target {
    /// Parses a contract hash, with or without the `hash-` prefix.
    pub fn contract(hash: &str, entry_point: impl Into<String>) -> Result<Self, DeployError> {
        Ok(Target::Contract {
            hash: parse_target_hash(hash)?,
            entry_point: entry_point.into(),
        })
    }

    pub fn package(
        hash: &str,
        version: Option<u32>,
        entry_point: impl Into<String>,
    ) -> Result<Self, DeployError> {
        Ok(Target::Package {
            hash: parse_target_hash(hash)?,
            version,
            entry_point: entry_point.into(),
        })
    }

    fn into_session(self, args: RuntimeArgs) -> Result<ExecutableDeployItem, DeployError> {
        match self {
            Target::Install { module_bytes } => {
                if module_bytes.is_empty() {
                    return Err(DeployError::invalid_target("contract module is empty"));
                }
                bytesrepr::encoded_len(module_bytes.len())?;
                Ok(ExecutableDeployItem::ModuleBytes { module_bytes, args })
            }
            Target::Contract { hash, entry_point } => {
                check_entry_point(&entry_point)?;
                Ok(ExecutableDeployItem::StoredContractByHash {
                    hash,
                    entry_point,
                    args,
                })
            }
            Target::Package {
                hash,
                version,
                entry_point,
            } => {
                check_entry_point(&entry_point)?;
                Ok(ExecutableDeployItem::StoredVersionedContractByHash {
                    hash,
                    version,
                    entry_point,
                    args,
                })
            }
        }
    }
}

fn parse_target_hash(hash: &str) -> Result<HashAddr, DeployError> {
    HashAddr::parse(hash).map_err(|e| DeployError::invalid_target(format!("'{hash}': {e}")))
}

fn check_entry_point(entry_point: &str) -> Result<(), DeployError> {
    if entry_point.trim().is_empty() {
        return Err(DeployError::invalid_target("entry point must not be empty"));
    }
    Ok(())
}

/// Assembles unsigned deploys for one sender on one chain.
///
/// Building has no side effects: the same sender, chain, timestamp, target,
/// arguments and payment always produce byte-identical deploys. The
/// timestamp defaults to the current time when not pinned with
/// [`with_timestamp`](Self::with_timestamp).
#[derive(Clone, Debug)]
pub struct InvocationBuilder {
    sender: PublicKey,
    chain_name: String,
    timestamp: Option<Timestamp>,
    ttl: Duration,
    gas_price: u64,
}

impl InvocationBuilder {
    pub fn new(sender: PublicKey, chain_name: impl Into<String>) -> Self {
        Self {
            sender,
            chain_name: chain_name.into(),
            timestamp: None,
            ttl: DEFAULT_TTL,
            gas_price: DEFAULT_GAS_PRICE,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_gas_price(mut self, gas_price: u64) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn sender(&self) -> &PublicKey {
        &self.sender
    }

    pub fn chain_name(&self) -> &str {
        &self.chain_name
    }

    pub fn install(
        &self,
        module_bytes: Vec<u8>,
        args: RuntimeArgs,
        payment: u64,
    ) -> Result<UnsignedDeploy, DeployError> {
        self.build(Target::Install { module_bytes }, args, payment)
    }

    /// Reads the contract module from disk and builds an install deploy.
    pub fn install_from_file(
        &self,
        wasm_path: &Path,
        args: RuntimeArgs,
        payment: u64,
    ) -> Result<UnsignedDeploy, DeployError> {
        let module_bytes = std::fs::read(wasm_path).map_err(|e| {
            DeployError::invalid_target(format!("cannot read {}: {e}", wasm_path.display()))
        })?;
        self.install(module_bytes, args, payment)
    }

    pub fn call(
        &self,
        contract_hash: &str,
        entry_point: &str,
        args: RuntimeArgs,
        payment: u64,
    ) -> Result<UnsignedDeploy, DeployError> {
        self.build(Target::contract(contract_hash, entry_point)?, args, payment)
    }

    pub fn build(
        &self,
        target: Target,
        args: RuntimeArgs,
        payment: u64,
    ) -> Result<UnsignedDeploy, DeployError> {
        if payment == 0 {
            return Err(DeployError::InvalidPayment(
                "payment must be greater than zero".to_string(),
            ));
        }
        if self.chain_name.trim().is_empty() {
            return Err(DeployError::invalid_target("chain name must not be empty"));
        }

        let session = target.into_session(args)?;
        let payment_item = ExecutableDeployItem::standard_payment(payment);
        let deploy = UnsignedDeploy::new(
            self.sender.clone(),
            self.timestamp.unwrap_or_else(Timestamp::now),
            self.ttl,
            self.gas_price,
            self.chain_name.clone(),
            payment_item,
            session,
        );
        debug!(
            "Built deploy {} ({} session bytes, payment {} motes)",
            deploy.hash(),
            deploy.session().to_bytes().len(),
            payment
        );
        Ok(deploy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casper::args::{encode_args, ArgKind, ArgValue, DomainValue};
    use crate::casper::wallet::{Identity, KeyAlgorithm};
    use alloy::primitives::U256;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TS: Timestamp = Timestamp::from_millis(1_705_084_529_000);

    fn builder() -> InvocationBuilder {
        let identity = Identity::from_secret_bytes(KeyAlgorithm::Ed25519, &[9u8; 32]).unwrap();
        InvocationBuilder::new(identity.public_key().clone(), "casper-test").with_timestamp(TS)
    }

    fn stake_args() -> RuntimeArgs {
        encode_args([("amount", DomainValue::from(1_000_000_000u64), ArgKind::U256)]).unwrap()
    }

    #[test]
    fn test_install_with_three_args() {
        let args = encode_args([
            ("min_stake", DomainValue::from("100000000"), ArgKind::U256),
            ("max_stake", DomainValue::from("5000000000"), ArgKind::U256),
            ("max_cap", DomainValue::from("10000000000"), ArgKind::U256),
        ])
        .unwrap();
        let deploy = builder()
            .install(vec![0x00, 0x61, 0x73, 0x6d], args, 60_000_000_000)
            .unwrap();

        match deploy.session() {
            ExecutableDeployItem::ModuleBytes { module_bytes, args } => {
                assert_eq!(module_bytes, &vec![0x00, 0x61, 0x73, 0x6d]);
                let names: Vec<_> = args.names().collect();
                assert_eq!(names, vec!["max_cap", "max_stake", "min_stake"]);
                let decoded = args.decode().unwrap();
                assert_eq!(
                    decoded["min_stake"],
                    ArgValue::U256(U256::from(100_000_000u64))
                );
            }
            other => panic!("expected module bytes, got {other:?}"),
        }
        let payment = deploy.payment().args().decode().unwrap();
        assert_eq!(
            payment["amount"],
            ArgValue::U512(U256::from(60_000_000_000u64))
        );
    }

    #[test]
    fn test_call_normalizes_prefixed_hash() {
        let target = format!("hash-{}", "11".repeat(32));
        let deploy = builder()
            .call(&target, "stake", stake_args(), 1_000_000_000)
            .unwrap();

        match deploy.session() {
            ExecutableDeployItem::StoredContractByHash {
                hash, entry_point, ..
            } => {
                assert_eq!(hash.as_bytes(), &[0x11u8; 32]);
                assert_eq!(entry_point, "stake");
            }
            other => panic!("expected stored contract call, got {other:?}"),
        }

        let bare = builder()
            .call(&"11".repeat(32), "stake", stake_args(), 1_000_000_000)
            .unwrap();
        assert_eq!(bare, deploy);
    }

    #[test]
    fn test_build_is_deterministic() {
        let target = "11".repeat(32);
        let a = builder()
            .call(&target, "stake", stake_args(), 1_000_000_000)
            .unwrap();
        let b = builder()
            .call(&target, "stake", stake_args(), 1_000_000_000)
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.header().to_bytes(), b.header().to_bytes());

        let later = builder()
            .with_timestamp(Timestamp::from_millis(TS.millis() + 1))
            .call(&target, "stake", stake_args(), 1_000_000_000)
            .unwrap();
        assert_ne!(later.hash(), a.hash());
        assert_eq!(later.header().body_hash, a.header().body_hash);
    }

    #[test]
    fn test_package_target() {
        let target = Target::package(&"22".repeat(32), Some(3), "claim").unwrap();
        let deploy = builder()
            .build(target, RuntimeArgs::new(), 1_000_000_000)
            .unwrap();
        assert!(matches!(
            deploy.session(),
            ExecutableDeployItem::StoredVersionedContractByHash {
                version: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_target() {
        let b = builder();
        assert!(matches!(
            b.call("hash-zz", "stake", stake_args(), 1),
            Err(DeployError::InvalidTarget(_))
        ));
        assert!(matches!(
            b.call(&"11".repeat(31), "stake", stake_args(), 1),
            Err(DeployError::InvalidTarget(_))
        ));
        assert!(matches!(
            b.call(&"11".repeat(32), "", stake_args(), 1),
            Err(DeployError::InvalidTarget(_))
        ));
        assert!(matches!(
            b.install(Vec::new(), RuntimeArgs::new(), 1),
            Err(DeployError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_zero_payment() {
        assert!(matches!(
            builder().call(&"11".repeat(32), "claim", RuntimeArgs::new(), 0),
            Err(DeployError::InvalidPayment(_))
        ));
    }

    #[test]
    fn test_install_from_file() {
        let mut wasm = NamedTempFile::new().unwrap();
        wasm.write_all(b"\0asm\x01\0\0\0").unwrap();
        let deploy = builder()
            .install_from_file(wasm.path(), RuntimeArgs::new(), 80_000_000_000)
            .unwrap();
        assert!(deploy.session().is_install());

        let missing = builder().install_from_file(
            Path::new("/nonexistent/contract.wasm"),
            RuntimeArgs::new(),
            1,
        );
        assert!(matches!(missing, Err(DeployError::InvalidTarget(_))));
    }
}
