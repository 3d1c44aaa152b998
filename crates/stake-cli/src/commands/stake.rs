use clap::{Args, Subcommand};
use eyre::Result;
use log::info;
use shared::casper::contracts::core::descriptor::EntryPointDescriptor;
use shared::casper::contracts::implementations::stake_contract::{
    StakeContract, CLAIM, NOTIFY_REWARD_AMOUNT, SET_REWARDS_DURATION, STAKE, UNSTAKE,
};
use shared::casper::deploy::UnsignedDeploy;

use super::common::{resolve_contract, sign_and_submit, AmountArgs, RunOptions, SignerArgs, Signers};
use crate::config::{Config, STAKE_CONTRACT};

#[derive(Args, Debug, Clone)]
pub(crate) struct StakeTarget {
    /// Stake contract hash (defaults to STAKE_CONTRACT_HASH)
    #[arg(short = 'c', long)]
    pub(crate) contract: Option<String>,

    #[command(flatten)]
    pub(crate) signer: SignerArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum StakeCommands {
    /// Stake tokens (the contract must be approved as spender first)
    Stake {
        #[command(flatten)]
        amount: AmountArgs,
        #[command(flatten)]
        target: StakeTarget,
    },
    /// Withdraw staked tokens
    Unstake {
        #[command(flatten)]
        amount: AmountArgs,
        #[command(flatten)]
        target: StakeTarget,
    },
    /// Claim accrued rewards
    Claim {
        #[command(flatten)]
        target: StakeTarget,
    },
    /// Fund a reward period (owner)
    NotifyRewardAmount {
        #[command(flatten)]
        amount: AmountArgs,
        #[command(flatten)]
        target: StakeTarget,
    },
    /// Set the reward period length in seconds (owner)
    SetRewardsDuration {
        #[arg(short = 'd', long)]
        duration: u64,
        #[command(flatten)]
        target: StakeTarget,
    },
}

impl StakeCommands {
    fn descriptor(&self) -> &'static EntryPointDescriptor {
        match self {
            StakeCommands::Stake { .. } => &STAKE,
            StakeCommands::Unstake { .. } => &UNSTAKE,
            StakeCommands::Claim { .. } => &CLAIM,
            StakeCommands::NotifyRewardAmount { .. } => &NOTIFY_REWARD_AMOUNT,
            StakeCommands::SetRewardsDuration { .. } => &SET_REWARDS_DURATION,
        }
    }

    fn target(&self) -> &StakeTarget {
        match self {
            StakeCommands::Stake { target, .. }
            | StakeCommands::Unstake { target, .. }
            | StakeCommands::Claim { target }
            | StakeCommands::NotifyRewardAmount { target, .. }
            | StakeCommands::SetRewardsDuration { target, .. } => target,
        }
    }
}

pub(crate) async fn handle_command(
    command: StakeCommands,
    config: &Config,
    options: RunOptions,
) -> Result<()> {
    let descriptor = command.descriptor();
    let signers = Signers::load(&command.target().signer, descriptor.signer, config)?;
    let unsigned = build(&command, &signers, config)?;
    info!(
        "Calling {} on stake contract as {}",
        descriptor.operation,
        signers.sender.account_hash()
    );
    sign_and_submit(unsigned, &signers, config, options).await
}

fn build(command: &StakeCommands, signers: &Signers, config: &Config) -> Result<UnsignedDeploy> {
    let target = command.target();
    let contract = StakeContract::new(resolve_contract(
        target.contract.as_deref(),
        STAKE_CONTRACT,
        config,
    )?);
    let builder = signers.builder(&target.signer, config);
    let payment = target.signer.payment;

    let deploy = match command {
        StakeCommands::Stake { amount, .. } => {
            contract.stake(&builder, amount.resolve(config)?, payment)?
        }
        StakeCommands::Unstake { amount, .. } => {
            contract.unstake(&builder, amount.resolve(config)?, payment)?
        }
        StakeCommands::Claim { .. } => contract.claim(&builder, payment)?,
        StakeCommands::NotifyRewardAmount { amount, .. } => {
            contract.notify_reward_amount(&builder, amount.resolve(config)?, payment)?
        }
        StakeCommands::SetRewardsDuration { duration, .. } => {
            contract.set_rewards_duration(&builder, *duration, payment)?
        }
    };
    Ok(deploy)
}
