use std::path::Path;

use alloy::primitives::U256;

use crate::casper::args::{ArgKind, DomainValue};
use crate::casper::contracts::constants::defaults::{CALL_PAYMENT, INSTALL_PAYMENT, NOTIFY_PAYMENT};
use crate::casper::contracts::core::builder::InvocationBuilder;
use crate::casper::contracts::core::descriptor::{EntryPointDescriptor, ParamSpec, SignerRole};
use crate::casper::deploy::UnsignedDeploy;
use crate::casper::error::DeployError;
use crate::casper::key::{HashAddr, Key};

/// Constructor arguments are all optional: contract builds differ in what
/// they read at install time, and extra `name:kind=value` args are allowed.
pub const INSTALL: EntryPointDescriptor = EntryPointDescriptor {
    operation: "install",
    entry_point: None,
    params: &[
        ParamSpec::optional("staked_token", ArgKind::Key),
        ParamSpec::optional("duration", ArgKind::U64),
        ParamSpec::optional("finish_at", ArgKind::U64),
        ParamSpec::optional("reward_rate", ArgKind::U8),
    ],
    allow_extra: true,
    payment: INSTALL_PAYMENT,
    signer: SignerRole::Owner,
};

pub const STAKE: EntryPointDescriptor = EntryPointDescriptor {
    operation: "stake",
    entry_point: Some("stake"),
    params: &[ParamSpec::required("amount", ArgKind::U256)],
    allow_extra: false,
    payment: CALL_PAYMENT,
    signer: SignerRole::User,
};

pub const UNSTAKE: EntryPointDescriptor = EntryPointDescriptor {
    operation: "unstake",
    entry_point: Some("unstake"),
    params: &[ParamSpec::required("amount", ArgKind::U256)],
    allow_extra: false,
    payment: CALL_PAYMENT,
    signer: SignerRole::User,
};

pub const CLAIM: EntryPointDescriptor = EntryPointDescriptor {
    operation: "claim",
    entry_point: Some("claim"),
    params: &[],
    allow_extra: false,
    payment: CALL_PAYMENT,
    signer: SignerRole::User,
};

pub const NOTIFY_REWARD_AMOUNT: EntryPointDescriptor = EntryPointDescriptor {
    operation: "notify-reward-amount",
    entry_point: Some("notify_reward_amount"),
    params: &[ParamSpec::required("reward", ArgKind::U256)],
    allow_extra: false,
    payment: NOTIFY_PAYMENT,
    signer: SignerRole::Owner,
};

pub const SET_REWARDS_DURATION: EntryPointDescriptor = EntryPointDescriptor {
    operation: "set-rewards-duration",
    entry_point: Some("set_rewards_duration"),
    params: &[ParamSpec::required("duration", ArgKind::U64)],
    allow_extra: false,
    payment: CALL_PAYMENT,
    signer: SignerRole::Owner,
};

pub const DESCRIPTORS: &[EntryPointDescriptor] = &[
    INSTALL,
    STAKE,
    UNSTAKE,
    CLAIM,
    NOTIFY_REWARD_AMOUNT,
    SET_REWARDS_DURATION,
];

/// Typed constructor arguments of the staking contract.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StakeInstallArgs {
    pub staked_token: Option<Key>,
    /// Reward period in seconds.
    pub duration: Option<u64>,
    /// End of the first reward period, ms since epoch.
    pub finish_at: Option<u64>,
    pub reward_rate: Option<u8>,
}

impl StakeInstallArgs {
    fn into_values(self) -> Vec<(&'static str, DomainValue)> {
        let mut values = Vec::new();
        if let Some(token) = self.staked_token {
            values.push(("staked_token", DomainValue::Key(token)));
        }
        if let Some(duration) = self.duration {
            values.push(("duration", DomainValue::from(duration)));
        }
        if let Some(finish_at) = self.finish_at {
            values.push(("finish_at", DomainValue::from(finish_at)));
        }
        if let Some(rate) = self.reward_rate {
            values.push(("reward_rate", DomainValue::from(u64::from(rate))));
        }
        values
    }
}

/// Builds the deploy that installs the staking contract.
pub fn install(
    builder: &InvocationBuilder,
    module_bytes: Vec<u8>,
    args: StakeInstallArgs,
    extra: Vec<(String, DomainValue, ArgKind)>,
    payment: Option<u64>,
) -> Result<UnsignedDeploy, DeployError> {
    let args = INSTALL.encode_args_with_extra(args.into_values(), extra)?;
    builder.install(module_bytes, args, payment.unwrap_or(INSTALL.payment))
}

/// Same as [`install`], reading the module from `wasm_path`.
pub fn install_from_file(
    builder: &InvocationBuilder,
    wasm_path: &Path,
    args: StakeInstallArgs,
    extra: Vec<(String, DomainValue, ArgKind)>,
    payment: Option<u64>,
) -> Result<UnsignedDeploy, DeployError> {
    let args = INSTALL.encode_args_with_extra(args.into_values(), extra)?;
    builder.install_from_file(wasm_path, args, payment.unwrap_or(INSTALL.payment))
}

/// An installed staking contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeContract {
    hash: HashAddr,
}

impl StakeContract {
    pub fn new(hash: HashAddr) -> Self {
        Self { hash }
    }

    pub fn hash(&self) -> &HashAddr {
        &self.hash
    }

    pub fn stake(
        &self,
        builder: &InvocationBuilder,
        amount: U256,
        payment: Option<u64>,
    ) -> Result<UnsignedDeploy, DeployError> {
        STAKE.invoke(builder, &self.hash, [("amount", DomainValue::from(amount))], payment)
    }

    pub fn unstake(
        &self,
        builder: &InvocationBuilder,
        amount: U256,
        payment: Option<u64>,
    ) -> Result<UnsignedDeploy, DeployError> {
        UNSTAKE.invoke(builder, &self.hash, [("amount", DomainValue::from(amount))], payment)
    }

    /// Pays out the caller's accrued rewards.
    pub fn claim(
        &self,
        builder: &InvocationBuilder,
        payment: Option<u64>,
    ) -> Result<UnsignedDeploy, DeployError> {
        CLAIM.invoke(builder, &self.hash, Vec::<(&str, DomainValue)>::new(), payment)
    }

    /// Starts or extends a reward period funded with `reward` tokens.
    pub fn notify_reward_amount(
        &self,
        builder: &InvocationBuilder,
        reward: U256,
        payment: Option<u64>,
    ) -> Result<UnsignedDeploy, DeployError> {
        NOTIFY_REWARD_AMOUNT.invoke(
            builder,
            &self.hash,
            [("reward", DomainValue::from(reward))],
            payment,
        )
    }

    pub fn set_rewards_duration(
        &self,
        builder: &InvocationBuilder,
        duration_secs: u64,
        payment: Option<u64>,
    ) -> Result<UnsignedDeploy, DeployError> {
        SET_REWARDS_DURATION.invoke(
            builder,
            &self.hash,
            [("duration", DomainValue::from(duration_secs))],
            payment,
        )
    }
}
