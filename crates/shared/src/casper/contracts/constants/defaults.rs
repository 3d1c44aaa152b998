#[cfg(not(feature = "mainnet"))]
pub mod network {
    pub const DEFAULT_RPC_URL: &str = "https://rpc.testnet.casperlabs.io/rpc";
    pub const DEFAULT_CHAIN_NAME: &str = "casper-test";
    pub const DEFAULT_EXPLORER_URL: &str = "https://testnet.cspr.live/deploy";
}

#[cfg(feature = "mainnet")]
pub mod network {
    pub const DEFAULT_RPC_URL: &str = "https://rpc.mainnet.casperlabs.io/rpc";
    pub const DEFAULT_CHAIN_NAME: &str = "casper";
    pub const DEFAULT_EXPLORER_URL: &str = "https://cspr.live/deploy";
}

pub use network::*;

/// Decimals of the staked CEP-18 token.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 8;

/// One CSPR in motes.
pub const MOTES_PER_CSPR: u64 = 1_000_000_000;

pub const INSTALL_PAYMENT: u64 = 80 * MOTES_PER_CSPR;
pub const CALL_PAYMENT: u64 = MOTES_PER_CSPR;
pub const NOTIFY_PAYMENT: u64 = 10 * MOTES_PER_CSPR;
pub const TOKEN_PAYMENT: u64 = 10 * MOTES_PER_CSPR;
