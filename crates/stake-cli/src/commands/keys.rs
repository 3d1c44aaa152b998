use clap::Subcommand;
use eyre::{Context, Result};
use shared::casper::wallet::{Identity, KeyAlgorithm};
use std::path::{Path, PathBuf};

use crate::secure_key::KeySource;

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum KeysCommands {
    /// Generate a new secret key and write it as PEM
    Generate {
        /// ed25519 or secp256k1
        #[arg(short = 'a', long, default_value = "ed25519")]
        algorithm: KeyAlgorithm,

        /// Output PEM file
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Show the public key and account hash of a secret key
    Info {
        /// Key source (env:VAR_NAME, file:/path, or a PEM path)
        #[arg(short = 'k', long)]
        key: String,
    },
}

pub(crate) fn handle_command(command: KeysCommands) -> Result<()> {
    match command {
        KeysCommands::Generate {
            algorithm,
            output,
            force,
        } => generate_key(algorithm, &output, force),
        KeysCommands::Info { key } => key_info(&key),
    }
}

fn generate_key(algorithm: KeyAlgorithm, output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        eyre::bail!(
            "{} already exists; pass --force to overwrite",
            output.display()
        );
    }
    let identity = Identity::generate(algorithm)?;
    std::fs::write(output, identity.to_pem()?)
        .with_context(|| format!("Failed to write key to {}", output.display()))?;

    println!("Generated {algorithm} key: {}", output.display());
    print_identity(&identity);
    Ok(())
}

fn key_info(key: &str) -> Result<()> {
    let identity = KeySource::from_arg(key).resolve()?;
    print_identity(&identity);
    Ok(())
}

fn print_identity(identity: &Identity) {
    println!("  Algorithm: {}", identity.algorithm());
    println!("  Public key: {}", identity.public_key());
    println!("  Account hash: {}", identity.account_hash());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_generate_writes_loadable_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("secp.pem");
        generate_key(KeyAlgorithm::Secp256k1, &path, false).unwrap();

        let loaded = Identity::from_pem_file(&path, None).unwrap();
        assert_eq!(loaded.algorithm(), KeyAlgorithm::Secp256k1);
        key_info(path.to_str().unwrap()).unwrap();
    }

    #[test]
    fn test_handle_command_generate_then_info() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("user.pem");
        handle_command(KeysCommands::Generate {
            algorithm: KeyAlgorithm::Ed25519,
            output: path.clone(),
            force: false,
        })
        .unwrap();
        handle_command(KeysCommands::Info {
            key: format!("file:{}", path.display()),
        })
        .unwrap();
    }

    #[test]
    fn test_generate_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("owner.pem");
        generate_key(KeyAlgorithm::Ed25519, &path, false).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();

        assert!(generate_key(KeyAlgorithm::Ed25519, &path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), first);

        generate_key(KeyAlgorithm::Ed25519, &path, true).unwrap();
        assert_ne!(std::fs::read_to_string(&path).unwrap(), first);
    }
}
