use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::casper::contracts::constants::defaults::{
    DEFAULT_CHAIN_NAME, DEFAULT_EXPLORER_URL, DEFAULT_RPC_URL, DEFAULT_TOKEN_DECIMALS,
};
use shared::casper::contracts::core::descriptor::SignerRole;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub(crate) const STAKE_CONTRACT: &str = "stake";
pub(crate) const STAKE_TOKEN: &str = "token";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) rpc_url: Option<String>,
    pub(crate) chain_name: Option<String>,
    pub(crate) explorer_url: Option<String>,
    /// Key sources by signer role (`owner`, `user`).
    pub(crate) default_keys: HashMap<String, String>,
    /// Contract hashes by name (`stake`, `token`).
    pub(crate) contract_hashes: HashMap<String, String>,
    pub(crate) wasm_path: Option<String>,
    pub(crate) token_decimals: Option<u8>,
    pub(crate) request_timeout_secs: Option<u64>,
}

impl Config {
    pub(crate) fn load(config_path: &Option<String>, env_file: &str) -> Result<Self> {
        dotenv::from_filename(env_file).ok();

        let mut config = if let Some(path) = config_path {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };

        config.load_from_env()?;
        Ok(config)
    }

    pub(crate) fn load_from_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path}"))?;

        Ok(config)
    }

    pub(crate) fn load_from_env(&mut self) -> Result<()> {
        self.apply_env(|name| std::env::var(name).ok())
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rpc_url) = lookup("RPC_URL") {
            self.rpc_url = Some(rpc_url);
        }
        if let Some(chain_name) = lookup("CHAIN_NAME") {
            self.chain_name = Some(chain_name);
        }
        if let Some(explorer_url) = lookup("EXPLORER_URL") {
            self.explorer_url = Some(explorer_url);
        }
        if let Some(wasm_path) = lookup("STAKE_WASM_PATH") {
            self.wasm_path = Some(wasm_path);
        }

        let key_vars = [
            ("OWNER_SECRET_KEY", SignerRole::Owner),
            ("USER_SECRET_KEY", SignerRole::User),
        ];
        for (env_var, role) in key_vars {
            if let Some(key) = lookup(env_var) {
                self.default_keys.insert(role.as_str().to_string(), key);
            }
        }

        let contract_vars = [
            ("STAKE_CONTRACT_HASH", STAKE_CONTRACT),
            ("STAKE_TOKEN_HASH", STAKE_TOKEN),
        ];
        for (env_var, contract_name) in contract_vars {
            if let Some(hash) = lookup(env_var) {
                self.contract_hashes.insert(contract_name.to_string(), hash);
            }
        }

        if let Some(decimals) = lookup("TOKEN_DECIMALS") {
            self.token_decimals = Some(
                decimals
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid TOKEN_DECIMALS: {decimals}"))?,
            );
        }
        if let Some(timeout) = lookup("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = Some(
                timeout
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid REQUEST_TIMEOUT_SECS: {timeout}"))?,
            );
        }

        Ok(())
    }

    pub(crate) fn with_rpc_url(mut self, rpc_url: String) -> Self {
        self.rpc_url = Some(rpc_url);
        self
    }

    pub(crate) fn with_chain_name(mut self, chain_name: String) -> Self {
        self.chain_name = Some(chain_name);
        self
    }

    pub(crate) fn get_rpc_url(&self) -> Result<Url> {
        let rpc_url = self.rpc_url.as_deref().unwrap_or(DEFAULT_RPC_URL);
        Url::parse(rpc_url).with_context(|| format!("Invalid RPC URL: {rpc_url}"))
    }

    pub(crate) fn get_chain_name(&self) -> &str {
        self.chain_name.as_deref().unwrap_or(DEFAULT_CHAIN_NAME)
    }

    pub(crate) fn get_explorer_url(&self) -> &str {
        self.explorer_url.as_deref().unwrap_or(DEFAULT_EXPLORER_URL)
    }

    pub(crate) fn get_default_key(&self, role: SignerRole) -> Option<&String> {
        self.default_keys.get(role.as_str())
    }

    pub(crate) fn get_contract_hash(&self, name: &str) -> Option<&String> {
        self.contract_hashes.get(name)
    }

    pub(crate) fn get_token_decimals(&self) -> u8 {
        self.token_decimals.unwrap_or(DEFAULT_TOKEN_DECIMALS)
    }

    pub(crate) fn get_request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
