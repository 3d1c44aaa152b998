use std::collections::BTreeSet;

use log::debug;

use super::deploy::{Approval, Deploy, UnsignedDeploy};
use super::error::{DeployError, KeyError};
use super::wallet::Identity;

/// Signs `deploy` with every identity, in order. Each identity signs the
/// deploy hash independently, so the order only affects the order of the
/// approvals, not their validity. A public key appearing twice is rejected.
pub fn sign_deploy(deploy: UnsignedDeploy, signers: &[&Identity]) -> Result<Deploy, DeployError> {
    if signers.is_empty() {
        return Err(DeployError::Key(KeyError::Signature(
            "at least one signer is required".to_string(),
        )));
    }

    let mut seen = BTreeSet::new();
    let mut approvals = Vec::with_capacity(signers.len());
    for identity in signers {
        let signer = identity.public_key().clone();
        if !seen.insert(signer.clone()) {
            return Err(DeployError::DuplicateSigner(signer.to_hex()));
        }
        let signature = identity.sign(deploy.hash().as_bytes());
        debug!("Deploy {} signed by {}", deploy.hash(), signer);
        approvals.push(Approval { signer, signature });
    }

    Ok(deploy.into_signed(approvals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casper::args::RuntimeArgs;
    use crate::casper::deploy::{ExecutableDeployItem, Timestamp, DEFAULT_GAS_PRICE, DEFAULT_TTL};
    use crate::casper::key::HashAddr;
    use crate::casper::wallet::KeyAlgorithm;

    fn unsigned(identity: &Identity) -> UnsignedDeploy {
        UnsignedDeploy::new(
            identity.public_key().clone(),
            Timestamp::from_millis(1_700_000_000_000),
            DEFAULT_TTL,
            DEFAULT_GAS_PRICE,
            "casper-test".to_string(),
            ExecutableDeployItem::standard_payment(1_000_000_000),
            ExecutableDeployItem::StoredContractByHash {
                hash: HashAddr::new([0x11; 32]),
                entry_point: "claim".to_string(),
                args: RuntimeArgs::new(),
            },
        )
    }

    #[test]
    fn test_single_signer() {
        let owner = Identity::from_secret_bytes(KeyAlgorithm::Ed25519, &[1u8; 32]).unwrap();
        let deploy = sign_deploy(unsigned(&owner), &[&owner]).unwrap();
        assert_eq!(deploy.approvals().len(), 1);
        assert_eq!(&deploy.approvals()[0].signer, owner.public_key());
        deploy.verify().unwrap();
    }

    #[test]
    fn test_co_signers_of_mixed_schemes() {
        let owner = Identity::from_secret_bytes(KeyAlgorithm::Ed25519, &[1u8; 32]).unwrap();
        let user = Identity::from_secret_bytes(KeyAlgorithm::Secp256k1, &[2u8; 32]).unwrap();

        let a = sign_deploy(unsigned(&owner), &[&owner, &user]).unwrap();
        let b = sign_deploy(unsigned(&owner), &[&user, &owner]).unwrap();
        a.verify().unwrap();
        b.verify().unwrap();
        assert_eq!(a.hash(), b.hash());

        let signers_a: BTreeSet<_> = a.approvals().iter().map(|ap| ap.signer.clone()).collect();
        let signers_b: BTreeSet<_> = b.approvals().iter().map(|ap| ap.signer.clone()).collect();
        assert_eq!(signers_a, signers_b);
    }

    #[test]
    fn test_duplicate_signer_rejected() {
        let owner = Identity::from_secret_bytes(KeyAlgorithm::Ed25519, &[1u8; 32]).unwrap();
        let result = sign_deploy(unsigned(&owner), &[&owner, &owner]);
        assert!(matches!(result, Err(DeployError::DuplicateSigner(_))));
    }

    #[test]
    fn test_no_signers_rejected() {
        let owner = Identity::from_secret_bytes(KeyAlgorithm::Ed25519, &[1u8; 32]).unwrap();
        assert!(sign_deploy(unsigned(&owner), &[]).is_err());
    }
}
