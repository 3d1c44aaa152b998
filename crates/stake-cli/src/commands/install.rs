use clap::Args;
use eyre::Result;
use log::info;
use shared::casper::args::NamedArgInput;
use shared::casper::contracts::implementations::stake_contract::{self, StakeInstallArgs};
use shared::casper::deploy::UnsignedDeploy;
use shared::casper::key::Key;
use std::path::PathBuf;

use super::common::{sign_and_submit, RunOptions, SignerArgs, Signers};
use crate::config::{Config, STAKE_TOKEN};

#[derive(Args, Debug, Clone)]
pub(crate) struct InstallArgs {
    /// Contract Wasm (defaults to STAKE_WASM_PATH)
    #[arg(short = 'w', long)]
    pub(crate) wasm: Option<PathBuf>,

    /// Token contract to stake (defaults to STAKE_TOKEN_HASH)
    #[arg(long)]
    pub(crate) staked_token: Option<String>,

    /// Reward period in seconds
    #[arg(long)]
    pub(crate) duration: Option<u64>,

    /// End of the first reward period, ms since epoch
    #[arg(long)]
    pub(crate) finish_at: Option<u64>,

    #[arg(long)]
    pub(crate) reward_rate: Option<u8>,

    /// Extra constructor argument as name:kind=value (repeatable)
    #[arg(long = "arg")]
    pub(crate) args: Vec<NamedArgInput>,

    #[command(flatten)]
    pub(crate) signer: SignerArgs,
}

pub(crate) async fn handle_command(args: InstallArgs, config: &Config, options: RunOptions) -> Result<()> {
    let signers = Signers::load(&args.signer, stake_contract::INSTALL.signer, config)?;
    let unsigned = build(&args, &signers, config)?;
    info!(
        "Installing stake contract as {}",
        signers.sender.account_hash()
    );
    sign_and_submit(unsigned, &signers, config, options).await
}

fn build(args: &InstallArgs, signers: &Signers, config: &Config) -> Result<UnsignedDeploy> {
    let wasm_path = args
        .wasm
        .clone()
        .or_else(|| config.wasm_path.as_ref().map(PathBuf::from))
        .ok_or_else(|| eyre::eyre!("No contract Wasm given; use --wasm or set STAKE_WASM_PATH"))?;

    let staked_token = args
        .staked_token
        .as_deref()
        .or_else(|| config.get_contract_hash(STAKE_TOKEN).map(String::as_str))
        .map(Key::parse)
        .transpose()?;

    let typed = StakeInstallArgs {
        staked_token,
        duration: args.duration,
        finish_at: args.finish_at,
        reward_rate: args.reward_rate,
    };
    let extra = args
        .args
        .iter()
        .cloned()
        .map(NamedArgInput::into_entry)
        .collect();

    Ok(stake_contract::install_from_file(
        &signers.builder(&args.signer, config),
        &wasm_path,
        typed,
        extra,
        args.signer.payment,
    )?)
}
