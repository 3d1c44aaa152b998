use alloy::primitives::U256;
use clap::Args;
use eyre::{Context, Result};
use shared::casper::args::parse_decimal;
use shared::casper::client::{DeploySubmitter, RpcClient};
use shared::casper::contracts::core::builder::InvocationBuilder;
use shared::casper::contracts::core::descriptor::SignerRole;
use shared::casper::deploy::{format_ttl, parse_ttl, Deploy, DeployHash, UnsignedDeploy};
use shared::casper::error::DeployError;
use shared::casper::key::HashAddr;
use shared::casper::signer::sign_deploy;
use shared::casper::wallet::Identity;
use std::time::Duration;

use crate::config::Config;
use crate::secure_key::load_identity;

/// Signing and payment flags shared by every deploy-producing command.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct SignerArgs {
    /// Signing key source (env:VAR_NAME, file:/path, or a PEM path)
    #[arg(short = 'k', long)]
    pub(crate) key: Option<String>,

    /// Additional co-signing key sources
    #[arg(long = "cosigner")]
    pub(crate) cosigners: Vec<String>,

    /// Payment in motes (defaults per operation)
    #[arg(long)]
    pub(crate) payment: Option<u64>,

    /// Deploy time to live, e.g. 30m or 2h (defaults to 30m)
    #[arg(long, value_parser = parse_ttl)]
    pub(crate) ttl: Option<Duration>,

    /// Gas price multiplier (defaults to 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) gas_price: Option<u64>,
}

/// Flags for commands that move a token amount.
#[derive(Args, Debug, Clone)]
pub(crate) struct AmountArgs {
    /// Token amount, decimal (e.g. 12.5); scaled by the token decimals
    #[arg(short = 'm', long)]
    pub(crate) amount: String,

    /// Treat --amount as smallest token units
    #[arg(long)]
    pub(crate) raw_amount: bool,
}

impl AmountArgs {
    pub(crate) fn resolve(&self, config: &Config) -> Result<U256> {
        Ok(parse_token_amount(
            &self.amount,
            config.get_token_decimals(),
            self.raw_amount,
        )?)
    }
}

/// Global switches that affect how a deploy leaves the process.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunOptions {
    pub(crate) dry_run: bool,
}

/// Identities signing one deploy: the sender first, then co-signers.
pub(crate) struct Signers {
    pub(crate) sender: Identity,
    pub(crate) cosigners: Vec<Identity>,
}

impl Signers {
    pub(crate) fn load(args: &SignerArgs, role: SignerRole, config: &Config) -> Result<Self> {
        let sender = load_identity(args.key.as_deref(), role, config)?;
        let cosigners = args
            .cosigners
            .iter()
            .map(|source| load_identity(Some(source), role, config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { sender, cosigners })
    }

    pub(crate) fn all(&self) -> Vec<&Identity> {
        std::iter::once(&self.sender)
            .chain(self.cosigners.iter())
            .collect()
    }

    pub(crate) fn builder(&self, args: &SignerArgs, config: &Config) -> InvocationBuilder {
        let builder =
            InvocationBuilder::new(self.sender.public_key().clone(), config.get_chain_name());
        let builder = match args.ttl {
            Some(ttl) => builder.with_ttl(ttl),
            None => builder,
        };
        match args.gas_price {
            Some(gas_price) => builder.with_gas_price(gas_price),
            None => builder,
        }
    }
}

/// Parses a decimal token amount into smallest units, exactly.
pub(crate) fn parse_token_amount(amount: &str, decimals: u8, raw: bool) -> Result<U256, DeployError> {
    let amount = amount.trim();
    if raw {
        return parse_decimal(amount);
    }

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(DeployError::encoding(format!("'{amount}' is not an amount")));
    }
    if fraction.len() > usize::from(decimals) {
        return Err(DeployError::encoding(format!(
            "'{amount}' has more than {decimals} decimal places"
        )));
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DeployError::encoding(format!("'{amount}' is not an amount")));
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let scaled = format!("{whole}{fraction:0<width$}", width = usize::from(decimals));
    parse_decimal(&scaled)
}

/// Resolves a contract hash from a flag or the named config entry.
pub(crate) fn resolve_contract(flag: Option<&str>, name: &str, config: &Config) -> Result<HashAddr> {
    let hash = match flag {
        Some(hash) => hash.to_string(),
        None => config.get_contract_hash(name).cloned().ok_or_else(|| {
            eyre::eyre!("No {name} contract hash given; pass it as a flag or configure it")
        })?,
    };
    HashAddr::parse(&hash)
        .map_err(|e| DeployError::invalid_target(format!("{name} contract '{hash}': {e}")).into())
}

pub(crate) fn explorer_link(explorer_url: &str, hash: &DeployHash) -> String {
    format!("{}/{}", explorer_url.trim_end_matches('/'), hash)
}

/// Sends one signed deploy and reports the outcome.
pub(crate) async fn submit(
    submitter: &dyn DeploySubmitter,
    deploy: &Deploy,
    explorer_url: &str,
) -> Result<DeployHash> {
    let hash = submitter.put_deploy(deploy).await?;
    println!("Deploy hash: {hash}");
    println!("Explorer: {}", explorer_link(explorer_url, &hash));
    Ok(hash)
}

/// Signs the deploy and either prints it (dry run) or submits it to the
/// configured node.
pub(crate) async fn sign_and_submit(
    unsigned: UnsignedDeploy,
    signers: &Signers,
    config: &Config,
    options: RunOptions,
) -> Result<()> {
    let deploy = sign_deploy(unsigned, &signers.all())?;
    println!(
        "Signed deploy {} ({} approval(s), ttl {}, chain {})",
        deploy.hash(),
        deploy.approvals().len(),
        format_ttl(deploy.header().ttl),
        deploy.header().chain_name
    );

    if options.dry_run {
        println!("{}", serde_json::to_string_pretty(&deploy.to_json())?);
        return Ok(());
    }

    let rpc_url = config.get_rpc_url()?;
    let client = RpcClient::new(rpc_url.clone(), config.get_request_timeout())
        .map_err(DeployError::from)
        .with_context(|| format!("Failed to create RPC client for {rpc_url}"))?;
    submit(&client, &deploy, config.get_explorer_url()).await?;
    Ok(())
}
