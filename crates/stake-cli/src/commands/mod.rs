use crate::config::Config;
use eyre::Result;

pub(crate) mod call;
pub(crate) mod common;
pub(crate) mod install;
pub(crate) mod keys;
pub(crate) mod stake;
pub(crate) mod token;

pub(crate) use call::CallArgs;
pub(crate) use common::RunOptions;
pub(crate) use install::InstallArgs;
pub(crate) use keys::KeysCommands;
pub(crate) use stake::StakeCommands;
pub(crate) use token::TokenCommands;

pub(crate) async fn handle_install_command(
    args: InstallArgs,
    config: &Config,
    options: RunOptions,
) -> Result<()> {
    install::handle_command(args, config, options).await
}

pub(crate) async fn handle_stake_command(
    command: StakeCommands,
    config: &Config,
    options: RunOptions,
) -> Result<()> {
    stake::handle_command(command, config, options).await
}

pub(crate) async fn handle_token_command(
    command: TokenCommands,
    config: &Config,
    options: RunOptions,
) -> Result<()> {
    token::handle_command(command, config, options).await
}

pub(crate) async fn handle_call_command(args: CallArgs, config: &Config, options: RunOptions) -> Result<()> {
    call::handle_command(args, config, options).await
}

pub(crate) fn handle_keys_command(command: KeysCommands) -> Result<()> {
    keys::handle_command(command)
}
