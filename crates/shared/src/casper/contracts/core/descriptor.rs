use std::collections::BTreeSet;

use super::builder::{InvocationBuilder, Target};
use crate::casper::args::{encode_args, ArgKind, DomainValue, RuntimeArgs};
use crate::casper::deploy::UnsignedDeploy;
use crate::casper::error::DeployError;
use crate::casper::key::HashAddr;

/// One declared parameter of an entrypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub required: bool,
}

impl ParamSpec {
    pub const fn required(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Which configured key signs an operation by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SignerRole {
    /// The account that installed the contract and administers it.
    Owner,
    /// A staker / token holder.
    User,
}

impl SignerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignerRole::Owner => "owner",
            SignerRole::User => "user",
        }
    }
}

/// Static description of one contract operation: which entrypoint it calls
/// (`None` for installation), the accepted arguments, the default payment
/// in motes and the default signer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryPointDescriptor {
    pub operation: &'static str,
    pub entry_point: Option<&'static str>,
    pub params: &'static [ParamSpec],
    /// Accept arguments beyond `params`, typed by the caller.
    pub allow_extra: bool,
    pub payment: u64,
    pub signer: SignerRole,
}

impl EntryPointDescriptor {
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|param| param.name == name)
    }

    /// Encodes values for the declared parameters. Unknown names are
    /// rejected unless `allow_extra` is set, and every required parameter
    /// must be present.
    pub fn encode_args<I, S>(&self, values: I) -> Result<RuntimeArgs, DeployError>
    where
        I: IntoIterator<Item = (S, DomainValue)>,
        S: Into<String>,
    {
        self.encode_args_with_extra(values, std::iter::empty::<(String, DomainValue, ArgKind)>())
    }

    /// Like [`encode_args`](Self::encode_args), with extra caller typed
    /// arguments for descriptors that allow them.
    pub fn encode_args_with_extra<I, S, E, T>(
        &self,
        values: I,
        extra: E,
    ) -> Result<RuntimeArgs, DeployError>
    where
        I: IntoIterator<Item = (S, DomainValue)>,
        S: Into<String>,
        E: IntoIterator<Item = (T, DomainValue, ArgKind)>,
        T: Into<String>,
    {
        let mut entries = Vec::new();
        for (name, value) in values {
            let name = name.into();
            let param = self.param(&name).ok_or_else(|| self.unexpected(&name))?;
            entries.push((name, value, param.kind));
        }
        for (name, value, kind) in extra {
            let name = name.into();
            match self.param(&name) {
                Some(param) if param.kind != kind => {
                    return Err(DeployError::encoding(format!(
                        "argument '{name}' of {} is {}, not {kind}",
                        self.operation, param.kind
                    )))
                }
                Some(_) => {}
                None if !self.allow_extra => return Err(self.unexpected(&name)),
                None => {}
            }
            entries.push((name, value, kind));
        }

        let present: BTreeSet<&str> = entries.iter().map(|(name, _, _)| name.as_str()).collect();
        if let Some(missing) = self
            .params
            .iter()
            .find(|param| param.required && !present.contains(param.name))
        {
            return Err(DeployError::encoding(format!(
                "missing argument '{}' for {}",
                missing.name, self.operation
            )));
        }

        encode_args(entries)
    }

    /// Builds a call of this entrypoint on `contract`. `payment` falls back
    /// to the descriptor default.
    pub fn invoke<I, S>(
        &self,
        builder: &InvocationBuilder,
        contract: &HashAddr,
        values: I,
        payment: Option<u64>,
    ) -> Result<UnsignedDeploy, DeployError>
    where
        I: IntoIterator<Item = (S, DomainValue)>,
        S: Into<String>,
    {
        let entry_point = self.entry_point.ok_or_else(|| {
            DeployError::invalid_target(format!("{} has no entry point to call", self.operation))
        })?;
        let args = self.encode_args(values)?;
        builder.build(
            Target::Contract {
                hash: *contract,
                entry_point: entry_point.to_string(),
            },
            args,
            payment.unwrap_or(self.payment),
        )
    }

    fn unexpected(&self, name: &str) -> DeployError {
        DeployError::encoding(format!(
            "{} does not accept argument '{name}' (accepted: {})",
            self.operation,
            self.params
                .iter()
                .map(|param| param.name)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAKE: EntryPointDescriptor = EntryPointDescriptor {
        operation: "stake",
        entry_point: Some("stake"),
        params: &[ParamSpec::required("amount", ArgKind::U256)],
        allow_extra: false,
        payment: 1_000_000_000,
        signer: SignerRole::User,
    };

    #[test]
    fn test_rejects_stale_argument() {
        let result = STAKE.encode_args([
            ("amount", DomainValue::from(1_000_000_000u64)),
            ("staked_token", DomainValue::Text("aa".repeat(32))),
        ]);
        assert!(matches!(result, Err(DeployError::Encoding(msg)) if msg.contains("staked_token")));
    }

    #[test]
    fn test_rejects_missing_argument() {
        let result = STAKE.encode_args(Vec::<(&str, DomainValue)>::new());
        assert!(matches!(result, Err(DeployError::Encoding(msg)) if msg.contains("amount")));
    }

    #[test]
    fn test_extra_kind_must_match_declared_param() {
        let result = STAKE.encode_args_with_extra(
            Vec::<(&str, DomainValue)>::new(),
            [("amount", DomainValue::from(5u64), ArgKind::U64)],
        );
        assert!(matches!(result, Err(DeployError::Encoding(_))));
    }

    #[test]
    fn test_encodes_declared_kind() {
        let args = STAKE
            .encode_args([("amount", DomainValue::from(1_000_000_000u64))])
            .unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args.get("amount").unwrap().kind(), ArgKind::U256);
    }
}
