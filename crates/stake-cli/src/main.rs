use clap::{Parser, Subcommand};
use eyre::Result;
use log::LevelFilter;
use shared::casper::error::{DeployError, KeyError, SubmissionError};
use std::process::ExitCode;

mod commands;
mod config;
mod secure_key;

use commands::*;
use config::Config;

#[derive(Parser)]
#[command(name = "stake-cli")]
#[command(about = "Casper staking contract operator console")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<String>,

    /// RPC URL (overrides config)
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Chain name (overrides config)
    #[arg(long, global = true)]
    chain_name: Option<String>,

    /// Environment file path
    #[arg(long, global = true, default_value = ".env")]
    env_file: String,

    /// error, warn, info, debug or trace
    #[arg(short = 'l', long, global = true, default_value = "info")]
    log_level: LevelFilter,

    /// Sign and print the deploy without submitting it
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the stake contract (owner)
    Install(InstallArgs),
    #[command(flatten)]
    Stake(StakeCommands),
    /// CEP-18 token operations
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
    /// Call any entrypoint with free-form arguments
    Call(CallArgs),
    /// Key management
    Keys {
        #[command(subcommand)]
        command: KeysCommands,
    },
}

const EXIT_FAILURE: u8 = 1;
const EXIT_ENCODING: u8 = 3;
const EXIT_INVALID_TARGET: u8 = 4;
const EXIT_INVALID_PAYMENT: u8 = 5;
const EXIT_DUPLICATE_SIGNER: u8 = 6;
const EXIT_SUBMISSION: u8 = 7;
const EXIT_KEY: u8 = 8;

/// Maps the first typed failure in the error chain to the process exit code.
fn exit_code(err: &eyre::Report) -> u8 {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<DeployError>() {
            return match err {
                DeployError::Encoding(_) => EXIT_ENCODING,
                DeployError::InvalidTarget(_) => EXIT_INVALID_TARGET,
                DeployError::InvalidPayment(_) => EXIT_INVALID_PAYMENT,
                DeployError::DuplicateSigner(_) => EXIT_DUPLICATE_SIGNER,
                DeployError::Submission(_) => EXIT_SUBMISSION,
                DeployError::Key(_) => EXIT_KEY,
            };
        }
        if cause.is::<SubmissionError>() {
            return EXIT_SUBMISSION;
        }
        if cause.is::<KeyError>() {
            return EXIT_KEY;
        }
    }
    EXIT_FAILURE
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config, &cli.env_file)?;
    let config = if let Some(rpc_url) = cli.rpc_url {
        config.with_rpc_url(rpc_url)
    } else {
        config
    };
    let config = if let Some(chain_name) = cli.chain_name {
        config.with_chain_name(chain_name)
    } else {
        config
    };
    let options = RunOptions {
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Install(args) => handle_install_command(args, &config, options).await,
        Commands::Stake(command) => handle_stake_command(command, &config, options).await,
        Commands::Token { command } => handle_token_command(command, &config, options).await,
        Commands::Call(args) => handle_call_command(args, &config, options).await,
        Commands::Keys { command } => handle_keys_command(command),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .format_timestamp(None)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(exit_code(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use shared::casper::contracts::core::descriptor::SignerRole;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exit_codes() {
        let cases = [
            (DeployError::encoding("bad hex"), EXIT_ENCODING),
            (DeployError::invalid_target("bad hash"), EXIT_INVALID_TARGET),
            (DeployError::InvalidPayment("zero".to_string()), EXIT_INVALID_PAYMENT),
            (DeployError::DuplicateSigner("01ab".to_string()), EXIT_DUPLICATE_SIGNER),
            (
                DeployError::Submission(SubmissionError::InvalidResponse("x".to_string())),
                EXIT_SUBMISSION,
            ),
            (
                DeployError::Key(KeyError::Pem("x".to_string())),
                EXIT_KEY,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(exit_code(&eyre::Report::new(err)), code);
        }
    }

    #[test]
    fn test_exit_code_through_context() {
        use eyre::WrapErr;
        let result: Result<()> = Err::<(), _>(DeployError::encoding("bad"))
            .wrap_err("while building stake deploy");
        assert_eq!(exit_code(&result.unwrap_err()), EXIT_ENCODING);

        let key: Result<()> = Err(KeyError::Unavailable("no key".to_string()).into());
        assert_eq!(exit_code(&key.unwrap_err()), EXIT_KEY);

        assert_eq!(exit_code(&eyre::eyre!("config missing")), EXIT_FAILURE);
    }

    #[test]
    fn test_parse_stake_command() {
        let cli = Cli::try_parse_from([
            "stake-cli",
            "--dry-run",
            "stake",
            "--amount",
            "1.5",
            "--key",
            "file:user.pem",
        ])
        .unwrap();
        assert!(cli.dry_run);
        assert!(matches!(
            cli.command,
            Commands::Stake(StakeCommands::Stake { .. })
        ));
    }

    #[test]
    fn test_parse_install_args() {
        let cli = Cli::try_parse_from([
            "stake-cli",
            "install",
            "--wasm",
            "stake.wasm",
            "--arg",
            "min_stake:u256=100000000",
            "--payment",
            "60000000000",
        ])
        .unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.args.len(), 1);
                assert_eq!(args.signer.payment, Some(60_000_000_000));
            }
            _ => panic!("expected install"),
        }
    }

    #[test]
    fn test_parse_ttl_and_gas_price() {
        let cli = Cli::try_parse_from([
            "stake-cli", "claim", "--ttl", "2h", "--gas-price", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Stake(StakeCommands::Claim { target }) => {
                assert_eq!(target.signer.ttl, Some(std::time::Duration::from_secs(7200)));
                assert_eq!(target.signer.gas_price, Some(2));
            }
            _ => panic!("expected claim"),
        }

        let err = Cli::try_parse_from(["stake-cli", "claim", "--ttl", "soon"])
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);
        let err = Cli::try_parse_from(["stake-cli", "claim", "--gas-price", "0"])
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_parse_call_role() {
        let hash = "11".repeat(32);
        let parse = |role: &str| {
            Cli::try_parse_from([
                "stake-cli", "call", "-c", &hash, "-e", "claim", "--role", role,
            ])
        };
        match parse("owner").unwrap().command {
            Commands::Call(args) => assert_eq!(args.role, SignerRole::Owner),
            _ => panic!("expected call"),
        }
        let default = Cli::try_parse_from(["stake-cli", "call", "-c", &hash, "-e", "claim"]).unwrap();
        match default.command {
            Commands::Call(args) => assert_eq!(args.role, SignerRole::User),
            _ => panic!("expected call"),
        }
        assert_eq!(parse("admin").err().unwrap().exit_code(), 2);
    }

    #[test]
    fn test_call_requires_target() {
        let err = Cli::try_parse_from(["stake-cli", "call", "--entry-point", "claim"])
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);
    }
}
