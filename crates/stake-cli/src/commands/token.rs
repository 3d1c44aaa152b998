use clap::{Args, Subcommand};
use eyre::Result;
use log::info;
use shared::casper::contracts::core::descriptor::EntryPointDescriptor;
use shared::casper::contracts::implementations::cep18_token::{
    Cep18Token, APPROVE, DECREASE_ALLOWANCE, INCREASE_ALLOWANCE, TRANSFER, TRANSFER_FROM,
};
use shared::casper::deploy::UnsignedDeploy;
use shared::casper::key::Key;

use super::common::{resolve_contract, sign_and_submit, AmountArgs, RunOptions, SignerArgs, Signers};
use crate::config::{Config, STAKE_CONTRACT, STAKE_TOKEN};

#[derive(Args, Debug, Clone)]
pub(crate) struct TokenTarget {
    /// Token contract hash (defaults to STAKE_TOKEN_HASH)
    #[arg(short = 't', long)]
    pub(crate) token: Option<String>,

    #[command(flatten)]
    pub(crate) amount: AmountArgs,

    #[command(flatten)]
    pub(crate) signer: SignerArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum TokenCommands {
    /// Approve a spender (defaults to the stake contract)
    Approve {
        /// account-hash-…, hash-… or bare contract hash
        #[arg(short = 's', long)]
        spender: Option<String>,
        #[command(flatten)]
        target: TokenTarget,
    },
    /// Raise an existing allowance
    IncreaseAllowance {
        #[arg(short = 's', long)]
        spender: Option<String>,
        #[command(flatten)]
        target: TokenTarget,
    },
    /// Lower an existing allowance
    DecreaseAllowance {
        #[arg(short = 's', long)]
        spender: Option<String>,
        #[command(flatten)]
        target: TokenTarget,
    },
    /// Transfer tokens from the signer
    Transfer {
        #[arg(short = 'r', long)]
        recipient: String,
        #[command(flatten)]
        target: TokenTarget,
    },
    /// Transfer tokens out of an approved owner's balance
    TransferFrom {
        #[arg(short = 'o', long)]
        owner: String,
        #[arg(short = 'r', long)]
        recipient: String,
        #[command(flatten)]
        target: TokenTarget,
    },
}

impl TokenCommands {
    fn descriptor(&self) -> &'static EntryPointDescriptor {
        match self {
            TokenCommands::Approve { .. } => &APPROVE,
            TokenCommands::IncreaseAllowance { .. } => &INCREASE_ALLOWANCE,
            TokenCommands::DecreaseAllowance { .. } => &DECREASE_ALLOWANCE,
            TokenCommands::Transfer { .. } => &TRANSFER,
            TokenCommands::TransferFrom { .. } => &TRANSFER_FROM,
        }
    }

    fn target(&self) -> &TokenTarget {
        match self {
            TokenCommands::Approve { target, .. }
            | TokenCommands::IncreaseAllowance { target, .. }
            | TokenCommands::DecreaseAllowance { target, .. }
            | TokenCommands::Transfer { target, .. }
            | TokenCommands::TransferFrom { target, .. } => target,
        }
    }
}

pub(crate) async fn handle_command(
    command: TokenCommands,
    config: &Config,
    options: RunOptions,
) -> Result<()> {
    let descriptor = command.descriptor();
    let signers = Signers::load(&command.target().signer, descriptor.signer, config)?;
    let unsigned = build(&command, &signers, config)?;
    info!(
        "Calling {} on token contract as {}",
        descriptor.operation,
        signers.sender.account_hash()
    );
    sign_and_submit(unsigned, &signers, config, options).await
}

/// The stake contract is the spender the console exists to approve.
fn resolve_spender(spender: Option<&str>, config: &Config) -> Result<Key> {
    match spender {
        Some(spender) => Ok(Key::parse(spender)?),
        None => Ok(Key::Hash(resolve_contract(None, STAKE_CONTRACT, config)?)),
    }
}

fn build(command: &TokenCommands, signers: &Signers, config: &Config) -> Result<UnsignedDeploy> {
    let target = command.target();
    let token = Cep18Token::new(resolve_contract(target.token.as_deref(), STAKE_TOKEN, config)?);
    let builder = signers.builder(&target.signer, config);
    let amount = target.amount.resolve(config)?;
    let payment = target.signer.payment;

    let deploy = match command {
        TokenCommands::Approve { spender, .. } => {
            token.approve(&builder, resolve_spender(spender.as_deref(), config)?, amount, payment)?
        }
        TokenCommands::IncreaseAllowance { spender, .. } => token.increase_allowance(
            &builder,
            resolve_spender(spender.as_deref(), config)?,
            amount,
            payment,
        )?,
        TokenCommands::DecreaseAllowance { spender, .. } => token.decrease_allowance(
            &builder,
            resolve_spender(spender.as_deref(), config)?,
            amount,
            payment,
        )?,
        TokenCommands::Transfer { recipient, .. } => {
            token.transfer(&builder, Key::parse(recipient)?, amount, payment)?
        }
        TokenCommands::TransferFrom {
            owner, recipient, ..
        } => token.transfer_from(
            &builder,
            Key::parse(owner)?,
            Key::parse(recipient)?,
            amount,
            payment,
        )?,
    };
    Ok(deploy)
}
