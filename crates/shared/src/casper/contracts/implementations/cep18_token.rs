use alloy::primitives::U256;

use crate::casper::args::{ArgKind, DomainValue};
use crate::casper::contracts::constants::defaults::TOKEN_PAYMENT;
use crate::casper::contracts::core::builder::InvocationBuilder;
use crate::casper::contracts::core::descriptor::{EntryPointDescriptor, ParamSpec, SignerRole};
use crate::casper::deploy::UnsignedDeploy;
use crate::casper::error::DeployError;
use crate::casper::key::{HashAddr, Key};

const SPENDER_AMOUNT: &[ParamSpec] = &[
    ParamSpec::required("spender", ArgKind::Key),
    ParamSpec::required("amount", ArgKind::U256),
];

pub const APPROVE: EntryPointDescriptor = EntryPointDescriptor {
    operation: "approve",
    entry_point: Some("approve"),
    params: SPENDER_AMOUNT,
    allow_extra: false,
    payment: TOKEN_PAYMENT,
    signer: SignerRole::User,
};

pub const INCREASE_ALLOWANCE: EntryPointDescriptor = EntryPointDescriptor {
    operation: "increase-allowance",
    entry_point: Some("increase_allowance"),
    params: SPENDER_AMOUNT,
    allow_extra: false,
    payment: TOKEN_PAYMENT,
    signer: SignerRole::User,
};

pub const DECREASE_ALLOWANCE: EntryPointDescriptor = EntryPointDescriptor {
    operation: "decrease-allowance",
    entry_point: Some("decrease_allowance"),
    params: SPENDER_AMOUNT,
    allow_extra: false,
    payment: TOKEN_PAYMENT,
    signer: SignerRole::User,
};

pub const TRANSFER: EntryPointDescriptor = EntryPointDescriptor {
    operation: "transfer",
    entry_point: Some("transfer"),
    params: &[
        ParamSpec::required("recipient", ArgKind::Key),
        ParamSpec::required("amount", ArgKind::U256),
    ],
    allow_extra: false,
    payment: TOKEN_PAYMENT,
    signer: SignerRole::User,
};

pub const TRANSFER_FROM: EntryPointDescriptor = EntryPointDescriptor {
    operation: "transfer-from",
    entry_point: Some("transfer_from"),
    params: &[
        ParamSpec::required("owner", ArgKind::Key),
        ParamSpec::required("recipient", ArgKind::Key),
        ParamSpec::required("amount", ArgKind::U256),
    ],
    allow_extra: false,
    payment: TOKEN_PAYMENT,
    signer: SignerRole::User,
};

pub const DESCRIPTORS: &[EntryPointDescriptor] = &[
    APPROVE,
    INCREASE_ALLOWANCE,
    DECREASE_ALLOWANCE,
    TRANSFER,
    TRANSFER_FROM,
];

/// A CEP-18 fungible token contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cep18Token {
    hash: HashAddr,
}

impl Cep18Token {
    pub fn new(hash: HashAddr) -> Self {
        Self { hash }
    }

    pub fn hash(&self) -> &HashAddr {
        &self.hash
    }

    /// Lets `spender` move up to `amount` of the signer's tokens. The stake
    /// contract must be approved before `stake` can pull tokens.
    pub fn approve(
        &self,
        builder: &InvocationBuilder,
        spender: Key,
        amount: U256,
        payment: Option<u64>,
    ) -> Result<UnsignedDeploy, DeployError> {
        self.allowance_call(&APPROVE, builder, spender, amount, payment)
    }

    pub fn increase_allowance(
        &self,
        builder: &InvocationBuilder,
        spender: Key,
        amount: U256,
        payment: Option<u64>,
    ) -> Result<UnsignedDeploy, DeployError> {
        self.allowance_call(&INCREASE_ALLOWANCE, builder, spender, amount, payment)
    }

    pub fn decrease_allowance(
        &self,
        builder: &InvocationBuilder,
        spender: Key,
        amount: U256,
        payment: Option<u64>,
    ) -> Result<UnsignedDeploy, DeployError> {
        self.allowance_call(&DECREASE_ALLOWANCE, builder, spender, amount, payment)
    }

    pub fn transfer(
        &self,
        builder: &InvocationBuilder,
        recipient: Key,
        amount: U256,
        payment: Option<u64>,
    ) -> Result<UnsignedDeploy, DeployError> {
        TRANSFER.invoke(
            builder,
            &self.hash,
            [
                ("recipient", DomainValue::Key(recipient)),
                ("amount", DomainValue::from(amount)),
            ],
            payment,
        )
    }

    pub fn transfer_from(
        &self,
        builder: &InvocationBuilder,
        owner: Key,
        recipient: Key,
        amount: U256,
        payment: Option<u64>,
    ) -> Result<UnsignedDeploy, DeployError> {
        TRANSFER_FROM.invoke(
            builder,
            &self.hash,
            [
                ("owner", DomainValue::Key(owner)),
                ("recipient", DomainValue::Key(recipient)),
                ("amount", DomainValue::from(amount)),
            ],
            payment,
        )
    }

    fn allowance_call(
        &self,
        descriptor: &EntryPointDescriptor,
        builder: &InvocationBuilder,
        spender: Key,
        amount: U256,
        payment: Option<u64>,
    ) -> Result<UnsignedDeploy, DeployError> {
        descriptor.invoke(
            builder,
            &self.hash,
            [
                ("spender", DomainValue::Key(spender)),
                ("amount", DomainValue::from(amount)),
            ],
            payment,
        )
    }
}
