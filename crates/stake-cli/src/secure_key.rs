use eyre::Result;
use shared::casper::contracts::core::descriptor::SignerRole;
use shared::casper::error::KeyError;
use shared::casper::wallet::Identity;
use std::env;

use crate::config::Config;

/// Where a PEM secret key comes from. Secret material is never accepted
/// on the command line itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum KeySource {
    /// PEM text held in an environment variable.
    Environment(String),
    File(String),
}

impl KeySource {
    /// `env:VAR_NAME`, `file:/path/to/key.pem`, or a bare path.
    pub(crate) fn from_arg(key_arg: &str) -> Self {
        if let Some(var_name) = key_arg.strip_prefix("env:") {
            Self::Environment(var_name.to_string())
        } else if let Some(path) = key_arg.strip_prefix("file:") {
            Self::File(path.to_string())
        } else {
            Self::File(key_arg.to_string())
        }
    }

    pub(crate) fn resolve(&self) -> Result<Identity, KeyError> {
        match self {
            Self::Environment(var_name) => {
                let pem = env::var(var_name).map_err(|_| {
                    KeyError::Unavailable(format!("environment variable {var_name} is not set"))
                })?;
                Identity::from_pem(&pem, None)
            }
            Self::File(path) => Identity::from_pem_file(path, None),
        }
    }
}

/// Loads the signing key from `--key`, falling back to the configured key
/// of `role`.
pub(crate) fn load_identity(key_arg: Option<&str>, role: SignerRole, config: &Config) -> Result<Identity> {
    let key_arg = match key_arg {
        Some(key) => key.to_string(),
        None => config.get_default_key(role).cloned().ok_or_else(|| {
            KeyError::Unavailable(format!(
                "no --key given and no {} key configured",
                role.as_str()
            ))
        })?,
    };
    let identity = KeySource::from_arg(&key_arg).resolve()?;
    log::debug!(
        "Using {} key {} ({})",
        role.as_str(),
        identity.public_key(),
        identity.account_hash()
    );
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::casper::wallet::KeyAlgorithm;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pem_file(identity: &Identity) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(identity.to_pem().unwrap().as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_arg() {
        assert_eq!(
            KeySource::from_arg("env:OWNER_PEM"),
            KeySource::Environment("OWNER_PEM".to_string())
        );
        assert_eq!(
            KeySource::from_arg("file:/keys/owner.pem"),
            KeySource::File("/keys/owner.pem".to_string())
        );
        assert_eq!(
            KeySource::from_arg("keys/user.pem"),
            KeySource::File("keys/user.pem".to_string())
        );
    }

    #[test]
    fn test_resolve_file() {
        let identity = Identity::from_secret_bytes(KeyAlgorithm::Ed25519, &[7u8; 32]).unwrap();
        let file = pem_file(&identity);
        let source = KeySource::from_arg(&format!("file:{}", file.path().display()));
        assert_eq!(source.resolve().unwrap().public_key(), identity.public_key());
    }

    #[test]
    fn test_resolve_env() {
        let identity = Identity::from_secret_bytes(KeyAlgorithm::Secp256k1, &[8u8; 32]).unwrap();
        env::set_var("STAKE_CLI_TEST_RESOLVE_ENV_PEM", identity.to_pem().unwrap());
        let resolved = KeySource::from_arg("env:STAKE_CLI_TEST_RESOLVE_ENV_PEM")
            .resolve()
            .unwrap();
        assert_eq!(resolved.public_key(), identity.public_key());
    }

    #[test]
    fn test_missing_sources_are_key_errors() {
        assert!(matches!(
            KeySource::from_arg("env:STAKE_CLI_TEST_UNSET_VARIABLE").resolve(),
            Err(KeyError::Unavailable(_))
        ));
        assert!(matches!(
            KeySource::from_arg("/nonexistent/owner.pem").resolve(),
            Err(KeyError::Io { .. })
        ));
    }

    #[test]
    fn test_load_identity_falls_back_to_role() {
        let identity = Identity::from_secret_bytes(KeyAlgorithm::Ed25519, &[9u8; 32]).unwrap();
        let file = pem_file(&identity);
        let mut config = Config::default();
        config.default_keys.insert(
            "owner".to_string(),
            file.path().to_str().unwrap().to_string(),
        );

        let loaded = load_identity(None, SignerRole::Owner, &config).unwrap();
        assert_eq!(loaded.public_key(), identity.public_key());

        let err = load_identity(None, SignerRole::User, &config).unwrap_err();
        assert!(err.downcast_ref::<KeyError>().is_some());
    }
}
