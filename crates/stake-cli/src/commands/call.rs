use clap::{ArgGroup, Args};
use eyre::Result;
use log::info;
use shared::casper::args::{encode_args, NamedArgInput};
use shared::casper::contracts::constants::defaults::CALL_PAYMENT;
use shared::casper::contracts::core::builder::Target;
use shared::casper::contracts::core::descriptor::SignerRole;
use shared::casper::deploy::UnsignedDeploy;

use super::common::{sign_and_submit, RunOptions, SignerArgs, Signers};
use crate::config::Config;

/// Calls any entrypoint with free-form arguments.
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("target").required(true).args(["contract", "package"])))]
pub(crate) struct CallArgs {
    /// Contract hash
    #[arg(short = 'c', long)]
    pub(crate) contract: Option<String>,

    /// Contract package hash
    #[arg(long)]
    pub(crate) package: Option<String>,

    /// Package version (latest when omitted)
    #[arg(long, requires = "package")]
    pub(crate) version: Option<u32>,

    #[arg(short = 'e', long)]
    pub(crate) entry_point: String,

    /// Argument as name:kind=value (repeatable)
    #[arg(long = "arg")]
    pub(crate) args: Vec<NamedArgInput>,

    /// Configured key role to sign with when --key is absent
    #[arg(long, value_enum, default_value_t = SignerRole::User)]
    pub(crate) role: SignerRole,

    #[command(flatten)]
    pub(crate) signer: SignerArgs,
}

pub(crate) async fn handle_command(args: CallArgs, config: &Config, options: RunOptions) -> Result<()> {
    let signers = Signers::load(&args.signer, args.role, config)?;
    let unsigned = build(&args, &signers, config)?;
    info!(
        "Calling {} as {}",
        args.entry_point,
        signers.sender.account_hash()
    );
    sign_and_submit(unsigned, &signers, config, options).await
}

fn build(args: &CallArgs, signers: &Signers, config: &Config) -> Result<UnsignedDeploy> {
    let target = match (&args.contract, &args.package) {
        (Some(contract), _) => Target::contract(contract, args.entry_point.as_str())?,
        (None, Some(package)) => Target::package(package, args.version, args.entry_point.as_str())?,
        (None, None) => eyre::bail!("Either --contract or --package is required"),
    };
    let runtime_args = encode_args(args.args.iter().cloned().map(NamedArgInput::into_entry))?;
    let payment = args.signer.payment.unwrap_or(CALL_PAYMENT);
    Ok(signers
        .builder(&args.signer, config)
        .build(target, runtime_args, payment)?)
}
