//! Typed runtime arguments and the encoder turning domain values into them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;
use serde_json::{json, Value};

use super::bytesrepr::{self, Reader, ToBytes};
use super::error::DeployError;
use super::key::{HashAddr, Key, HASH_LENGTH, HASH_PREFIX};

/// Declared CL type of a runtime argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Bool,
    U8,
    U32,
    U64,
    U256,
    /// Limited to values representable in 256 bits.
    U512,
    String,
    Key,
    ByteArray(u32),
}

impl ArgKind {
    const TAG_BOOL: u8 = 0;
    const TAG_U8: u8 = 3;
    const TAG_U32: u8 = 4;
    const TAG_U64: u8 = 5;
    const TAG_U256: u8 = 7;
    const TAG_U512: u8 = 8;
    const TAG_STRING: u8 = 10;
    const TAG_KEY: u8 = 11;
    const TAG_BYTE_ARRAY: u8 = 15;

    /// Hash-like byte array (contract, package and account hashes).
    pub const HASH: ArgKind = ArgKind::ByteArray(HASH_LENGTH as u32);

    fn max_uint(&self) -> Option<U256> {
        match self {
            ArgKind::U8 => Some(U256::from(u8::MAX)),
            ArgKind::U32 => Some(U256::from(u32::MAX)),
            ArgKind::U64 => Some(U256::from(u64::MAX)),
            ArgKind::U256 | ArgKind::U512 => Some(U256::MAX),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ArgKind::ByteArray(len) => json!({ "ByteArray": len }),
            other => Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKind::Bool => write!(f, "Bool"),
            ArgKind::U8 => write!(f, "U8"),
            ArgKind::U32 => write!(f, "U32"),
            ArgKind::U64 => write!(f, "U64"),
            ArgKind::U256 => write!(f, "U256"),
            ArgKind::U512 => write!(f, "U512"),
            ArgKind::String => write!(f, "String"),
            ArgKind::Key => write!(f, "Key"),
            ArgKind::ByteArray(len) => write!(f, "ByteArray({len})"),
        }
    }
}

impl FromStr for ArgKind {
    type Err = DeployError;

    /// Accepts the lowercase names used on the command line: `bool`, `u8`,
    /// `u32`, `u64`, `u256`, `u512`, `string`, `key` and `bytes<N>`
    /// (`hash` is shorthand for `bytes32`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let kind = match lower.as_str() {
            "bool" => ArgKind::Bool,
            "u8" => ArgKind::U8,
            "u32" => ArgKind::U32,
            "u64" => ArgKind::U64,
            "u256" => ArgKind::U256,
            "u512" => ArgKind::U512,
            "string" => ArgKind::String,
            "key" => ArgKind::Key,
            "hash" => ArgKind::HASH,
            other => match other.strip_prefix("bytes") {
                Some(len) => ArgKind::ByteArray(len.parse().map_err(|_| {
                    DeployError::encoding(format!("invalid byte array length in '{s}'"))
                })?),
                None => return Err(DeployError::encoding(format!("unknown argument kind '{s}'"))),
            },
        };
        Ok(kind)
    }
}

impl ToBytes for ArgKind {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        match self {
            ArgKind::Bool => out.push(Self::TAG_BOOL),
            ArgKind::U8 => out.push(Self::TAG_U8),
            ArgKind::U32 => out.push(Self::TAG_U32),
            ArgKind::U64 => out.push(Self::TAG_U64),
            ArgKind::U256 => out.push(Self::TAG_U256),
            ArgKind::U512 => out.push(Self::TAG_U512),
            ArgKind::String => out.push(Self::TAG_STRING),
            ArgKind::Key => out.push(Self::TAG_KEY),
            ArgKind::ByteArray(len) => {
                out.push(Self::TAG_BYTE_ARRAY);
                len.write_bytes(out);
            }
        }
    }
}

/// A value before it has been checked against its declared kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomainValue {
    Int(i128),
    BigUint(U256),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    Key(Key),
}

impl From<u64> for DomainValue {
    fn from(value: u64) -> Self {
        DomainValue::Int(i128::from(value))
    }
}

impl From<U256> for DomainValue {
    fn from(value: U256) -> Self {
        DomainValue::BigUint(value)
    }
}

impl From<Key> for DomainValue {
    fn from(value: Key) -> Self {
        DomainValue::Key(value)
    }
}

impl From<&str> for DomainValue {
    fn from(value: &str) -> Self {
        DomainValue::Text(value.to_string())
    }
}

/// A value whose shape matches its kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgValue {
    Bool(bool),
    U8(u8),
    U32(u32),
    U64(u64),
    U256(U256),
    U512(U256),
    String(String),
    Key(Key),
    ByteArray(Vec<u8>),
}

impl ArgValue {
    pub fn kind(&self) -> ArgKind {
        match self {
            ArgValue::Bool(_) => ArgKind::Bool,
            ArgValue::U8(_) => ArgKind::U8,
            ArgValue::U32(_) => ArgKind::U32,
            ArgValue::U64(_) => ArgKind::U64,
            ArgValue::U256(_) => ArgKind::U256,
            ArgValue::U512(_) => ArgKind::U512,
            ArgValue::String(_) => ArgKind::String,
            ArgValue::Key(_) => ArgKind::Key,
            ArgValue::ByteArray(bytes) => ArgKind::ByteArray(bytes.len() as u32),
        }
    }

    /// Checks `value` against `kind` and converts it.
    pub fn encode(kind: ArgKind, value: DomainValue) -> Result<Self, DeployError> {
        match kind {
            ArgKind::Bool => match value {
                DomainValue::Bool(b) => Ok(ArgValue::Bool(b)),
                DomainValue::Text(text) => match text.trim() {
                    "true" => Ok(ArgValue::Bool(true)),
                    "false" => Ok(ArgValue::Bool(false)),
                    other => Err(DeployError::encoding(format!("'{other}' is not a bool"))),
                },
                other => Err(mismatch(kind, &other)),
            },
            ArgKind::U8 | ArgKind::U32 | ArgKind::U64 | ArgKind::U256 | ArgKind::U512 => {
                let n = to_uint(kind, value)?;
                let low = n.as_limbs()[0];
                Ok(match kind {
                    ArgKind::U8 => ArgValue::U8(low as u8),
                    ArgKind::U32 => ArgValue::U32(low as u32),
                    ArgKind::U64 => ArgValue::U64(low),
                    ArgKind::U256 => ArgValue::U256(n),
                    _ => ArgValue::U512(n),
                })
            }
            ArgKind::String => match value {
                DomainValue::Text(text) => {
                    bytesrepr::encoded_len(text.len())?;
                    Ok(ArgValue::String(text))
                }
                other => Err(mismatch(kind, &other)),
            },
            ArgKind::Key => match value {
                DomainValue::Key(key) => Ok(ArgValue::Key(key)),
                DomainValue::Text(text) => Key::parse(&text).map(ArgValue::Key),
                // Raw 32 bytes are read as a contract hash.
                DomainValue::Bytes(bytes) => {
                    let hash: [u8; HASH_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
                        DeployError::encoding(format!(
                            "key bytes must be {HASH_LENGTH} long, got {}",
                            bytes.len()
                        ))
                    })?;
                    Ok(ArgValue::Key(Key::Hash(HashAddr::new(hash))))
                }
                other => Err(mismatch(kind, &other)),
            },
            ArgKind::ByteArray(len) => {
                let bytes = match value {
                    DomainValue::Bytes(bytes) => bytes,
                    DomainValue::Text(text) => {
                        let trimmed = text.trim();
                        let hex_part = trimmed.strip_prefix(HASH_PREFIX).unwrap_or(trimmed);
                        hex::decode(hex_part).map_err(|e| {
                            DeployError::encoding(format!("invalid hex '{trimmed}': {e}"))
                        })?
                    }
                    other => return Err(mismatch(kind, &other)),
                };
                if bytes.len() != len as usize {
                    return Err(DeployError::encoding(format!(
                        "expected {len} bytes, got {}",
                        bytes.len()
                    )));
                }
                Ok(ArgValue::ByteArray(bytes))
            }
        }
    }

    /// Parses command line text for `kind`.
    pub fn parse(kind: ArgKind, text: &str) -> Result<Self, DeployError> {
        Self::encode(kind, DomainValue::Text(text.to_string()))
    }

    fn write_value(&self, out: &mut Vec<u8>) {
        match self {
            ArgValue::Bool(b) => b.write_bytes(out),
            ArgValue::U8(n) => n.write_bytes(out),
            ArgValue::U32(n) => n.write_bytes(out),
            ArgValue::U64(n) => n.write_bytes(out),
            ArgValue::U256(n) | ArgValue::U512(n) => bytesrepr::write_big_uint(n, out),
            ArgValue::String(s) => s.write_bytes(out),
            ArgValue::Key(key) => key.write_bytes(out),
            ArgValue::ByteArray(bytes) => out.extend_from_slice(bytes),
        }
    }

    fn parsed_json(&self) -> Value {
        match self {
            ArgValue::Bool(b) => json!(b),
            ArgValue::U8(n) => json!(n),
            ArgValue::U32(n) => json!(n),
            ArgValue::U64(n) => json!(n),
            ArgValue::U256(n) | ArgValue::U512(n) => json!(n.to_string()),
            ArgValue::String(s) => json!(s),
            ArgValue::Key(key) => json!(key.to_string()),
            ArgValue::ByteArray(bytes) => json!(hex::encode(bytes)),
        }
    }
}

fn mismatch(kind: ArgKind, value: &DomainValue) -> DeployError {
    DeployError::encoding(format!("value {value:?} does not match kind {kind}"))
}

fn to_uint(kind: ArgKind, value: DomainValue) -> Result<U256, DeployError> {
    let n = match value {
        DomainValue::Int(i) if i < 0 => {
            return Err(DeployError::encoding(format!("{kind} cannot hold negative value {i}")))
        }
        DomainValue::Int(i) => U256::from(i as u128),
        DomainValue::BigUint(n) => n,
        DomainValue::Text(text) => parse_decimal(&text)?,
        other => return Err(mismatch(kind, &other)),
    };
    match kind.max_uint() {
        Some(max) if n > max => Err(DeployError::encoding(format!(
            "{n} exceeds the range of {kind}"
        ))),
        _ => Ok(n),
    }
}

/// Parses an unsigned decimal integer of up to 256 bits.
pub fn parse_decimal(text: &str) -> Result<U256, DeployError> {
    let trimmed = text.trim();
    if trimmed.starts_with('-') {
        return Err(DeployError::encoding(format!("negative value '{trimmed}'")));
    }
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DeployError::encoding(format!("'{trimmed}' is not a decimal integer")));
    }
    U256::from_str_radix(trimmed, 10)
        .map_err(|e| DeployError::encoding(format!("'{trimmed}' does not fit in 256 bits: {e}")))
}

/// Serialized value together with its CL type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CLValue {
    kind: ArgKind,
    bytes: Vec<u8>,
}

impl CLValue {
    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    pub fn inner_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decodes the serialized bytes back into a typed value.
    pub fn to_arg_value(&self) -> Result<ArgValue, DeployError> {
        let mut reader = Reader::new(&self.bytes);
        let value = match self.kind {
            ArgKind::Bool => match reader.u8()? {
                0 => ArgValue::Bool(false),
                1 => ArgValue::Bool(true),
                other => return Err(DeployError::encoding(format!("invalid bool byte {other}"))),
            },
            ArgKind::U8 => ArgValue::U8(reader.u8()?),
            ArgKind::U32 => ArgValue::U32(reader.u32()?),
            ArgKind::U64 => ArgValue::U64(reader.u64()?),
            ArgKind::U256 => ArgValue::U256(reader.big_uint(32)?),
            ArgKind::U512 => ArgValue::U512(reader.big_uint(32)?),
            ArgKind::String => ArgValue::String(reader.string()?),
            ArgKind::Key => ArgValue::Key(Key::read(&mut reader)?),
            ArgKind::ByteArray(len) => ArgValue::ByteArray(reader.take(len as usize)?.to_vec()),
        };
        reader.finish()?;
        Ok(value)
    }

    pub fn to_json(&self) -> Value {
        let parsed = self
            .to_arg_value()
            .map(|value| value.parsed_json())
            .unwrap_or(Value::Null);
        json!({
            "cl_type": self.kind.to_json(),
            "bytes": hex::encode(&self.bytes),
            "parsed": parsed,
        })
    }
}

impl From<&ArgValue> for CLValue {
    fn from(value: &ArgValue) -> Self {
        let mut bytes = Vec::new();
        value.write_value(&mut bytes);
        Self {
            kind: value.kind(),
            bytes,
        }
    }
}

impl ToBytes for CLValue {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        bytesrepr::write_byte_vec(&self.bytes, out);
        self.kind.write_bytes(out);
    }
}

/// Named arguments of one invocation, keyed and serialized by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeArgs(BTreeMap<String, CLValue>);

impl RuntimeArgs {
    pub const PAYMENT_AMOUNT: &'static str = "amount";

    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments of the standard payment: `{amount: U512}`.
    pub fn standard_payment(amount: u64) -> Self {
        let mut args = Self::new();
        args.0.insert(
            Self::PAYMENT_AMOUNT.to_string(),
            CLValue::from(&ArgValue::U512(U256::from(amount))),
        );
        args
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) -> Result<(), DeployError> {
        let name = name.into();
        if name.is_empty() {
            return Err(DeployError::encoding("argument name must not be empty"));
        }
        if self.0.contains_key(&name) {
            return Err(DeployError::encoding(format!("duplicate argument '{name}'")));
        }
        self.0.insert(name, CLValue::from(&value));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CLValue> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CLValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes every argument back to its typed value.
    pub fn decode(&self) -> Result<BTreeMap<String, ArgValue>, DeployError> {
        self.0
            .iter()
            .map(|(name, value)| Ok((name.clone(), value.to_arg_value()?)))
            .collect()
    }

    pub fn to_json(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|(name, value)| json!([name, value.to_json()]))
                .collect(),
        )
    }
}

impl ToBytes for RuntimeArgs {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        bytesrepr::write_len(self.0.len(), out);
        for (name, value) in &self.0 {
            name.write_bytes(out);
            value.write_bytes(out);
        }
    }
}

/// Encodes `{name → (value, kind)}` into runtime arguments. Fails on the
/// first invalid entry without returning anything partial.
pub fn encode_args<I, S>(entries: I) -> Result<RuntimeArgs, DeployError>
where
    I: IntoIterator<Item = (S, DomainValue, ArgKind)>,
    S: Into<String>,
{
    let mut args = RuntimeArgs::new();
    for (name, value, kind) in entries {
        let name = name.into();
        let encoded = ArgValue::encode(kind, value)
            .map_err(|e| DeployError::encoding(format!("argument '{name}': {e}")))?;
        args.insert(name, encoded)?;
    }
    Ok(args)
}

/// Command line form of one argument: `name:kind=value`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedArgInput {
    pub name: String,
    pub kind: ArgKind,
    pub value: String,
}

impl FromStr for NamedArgInput {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, value) = s
            .split_once('=')
            .ok_or_else(|| DeployError::encoding(format!("'{s}' is not name:kind=value")))?;
        let (name, kind) = head
            .split_once(':')
            .ok_or_else(|| DeployError::encoding(format!("'{s}' is missing the :kind part")))?;
        Ok(Self {
            name: name.trim().to_string(),
            kind: kind.parse()?,
            value: value.to_string(),
        })
    }
}

impl NamedArgInput {
    pub fn into_entry(self) -> (String, DomainValue, ArgKind) {
        (self.name, DomainValue::Text(self.value), self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_encoding() {
        let value = CLValue::from(&ArgValue::U64(100_000_000));
        assert_eq!(value.inner_bytes(), &100_000_000u64.to_le_bytes());
        assert_eq!(value.to_bytes().last(), Some(&5));
    }

    #[test]
    fn test_out_of_range_values_fail() {
        let cases = [
            (ArgKind::U8, DomainValue::Int(256)),
            (ArgKind::U8, DomainValue::Int(-1)),
            (ArgKind::U64, DomainValue::Text("18446744073709551616".into())),
            (ArgKind::U256, DomainValue::Text("-5".into())),
            (ArgKind::U256, DomainValue::Text("1".repeat(80))),
            (ArgKind::HASH, DomainValue::Text("hash-abc".into())),
            (ArgKind::HASH, DomainValue::Bytes(vec![0u8; 31])),
            (ArgKind::Key, DomainValue::Text("nothex".into())),
            (ArgKind::Bool, DomainValue::Int(1)),
        ];
        for (kind, value) in cases {
            let result = ArgValue::encode(kind, value.clone());
            assert!(
                matches!(result, Err(DeployError::Encoding(_))),
                "{kind} accepted {value:?}"
            );
        }
    }

    #[test]
    fn test_encode_args_is_all_or_nothing() {
        let result = encode_args([
            ("amount", DomainValue::from(5u64), ArgKind::U256),
            ("rate", DomainValue::Int(300), ArgKind::U8),
        ]);
        assert!(matches!(result, Err(DeployError::Encoding(msg)) if msg.contains("rate")));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = encode_args([
            ("amount", DomainValue::from(5u64), ArgKind::U256),
            ("amount", DomainValue::from(6u64), ArgKind::U256),
        ]);
        assert!(matches!(result, Err(DeployError::Encoding(_))));
    }

    #[test]
    fn test_order_independent_encoding() {
        let a = encode_args([
            ("min_stake", DomainValue::from(1u64), ArgKind::U64),
            ("max_stake", DomainValue::from(2u64), ArgKind::U64),
        ])
        .unwrap();
        let b = encode_args([
            ("max_stake", DomainValue::from(2u64), ArgKind::U64),
            ("min_stake", DomainValue::from(1u64), ArgKind::U64),
        ])
        .unwrap();
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_args_round_trip() {
        let token = HashAddr::new([0xba; 32]);
        let args = encode_args([
            ("staked_token", DomainValue::Key(Key::Hash(token)), ArgKind::Key),
            ("duration", DomainValue::from(60_400_000u64), ArgKind::U64),
            ("reward_rate", DomainValue::Int(10), ArgKind::U8),
            ("amount", DomainValue::Text("10000000000".into()), ArgKind::U256),
            ("note", DomainValue::Text("weekly".into()), ArgKind::String),
            ("package", DomainValue::Text(format!("hash-{}", "cd".repeat(32))), ArgKind::HASH),
        ])
        .unwrap();

        let decoded = args.decode().unwrap();
        assert_eq!(decoded["staked_token"], ArgValue::Key(Key::Hash(token)));
        assert_eq!(decoded["duration"], ArgValue::U64(60_400_000));
        assert_eq!(decoded["reward_rate"], ArgValue::U8(10));
        assert_eq!(decoded["amount"], ArgValue::U256(U256::from(10_000_000_000u64)));
        assert_eq!(decoded["note"], ArgValue::String("weekly".into()));
        assert_eq!(decoded["package"], ArgValue::ByteArray(vec![0xcd; 32]));
    }

    #[test]
    fn test_args_round_trip_remaining_kinds() {
        use crate::casper::key::{AccessRights, AccountHash, URef};

        let account = Key::Account(AccountHash::new([0x02; 32]));
        let uref = Key::URef(URef::new([0x07; 32], AccessRights::READ_ADD_WRITE));
        let args = encode_args([
            ("owner", DomainValue::Key(account), ArgKind::Key),
            ("purse", DomainValue::Key(uref), ArgKind::Key),
            ("paused", DomainValue::Bool(true), ArgKind::Bool),
            ("enabled", DomainValue::Text("false".into()), ArgKind::Bool),
            ("version", DomainValue::Int(4_000_000_000), ArgKind::U32),
            ("salt", DomainValue::Bytes(vec![0x5a; 4]), ArgKind::ByteArray(4)),
            ("empty", DomainValue::Bytes(Vec::new()), ArgKind::ByteArray(0)),
        ])
        .unwrap();

        let decoded = args.decode().unwrap();
        assert_eq!(decoded["owner"], ArgValue::Key(account));
        assert_eq!(decoded["purse"], ArgValue::Key(uref));
        assert_eq!(decoded["paused"], ArgValue::Bool(true));
        assert_eq!(decoded["enabled"], ArgValue::Bool(false));
        assert_eq!(decoded["version"], ArgValue::U32(4_000_000_000));
        assert_eq!(decoded["salt"], ArgValue::ByteArray(vec![0x5a; 4]));
        assert_eq!(decoded["empty"], ArgValue::ByteArray(Vec::new()));

        match &decoded["purse"] {
            ArgValue::Key(Key::URef(read)) => {
                assert_eq!(read.rights(), AccessRights::READ_ADD_WRITE)
            }
            other => panic!("expected a uref, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_malformed_bytes() {
        let mut uref = vec![2u8];
        uref.extend_from_slice(&[0x07; 32]);
        uref.push(0x08);
        let cases = [
            CLValue { kind: ArgKind::Key, bytes: uref },
            CLValue { kind: ArgKind::Key, bytes: vec![9u8; 33] },
            CLValue { kind: ArgKind::Bool, bytes: vec![2] },
            CLValue { kind: ArgKind::U32, bytes: vec![1, 2, 3] },
            CLValue { kind: ArgKind::ByteArray(4), bytes: vec![1, 2, 3, 4, 5] },
        ];
        for value in cases {
            assert!(
                matches!(value.to_arg_value(), Err(DeployError::Encoding(_))),
                "{} decoded {:?}",
                value.kind(),
                value.inner_bytes()
            );
        }
    }

    #[test]
    fn test_byte_array_cl_type_carries_length() {
        let value = CLValue::from(&ArgValue::ByteArray(vec![1; 32]));
        let bytes = value.to_bytes();
        // u32 length + 32 bytes + tag + u32 array length
        assert_eq!(bytes.len(), 4 + 32 + 1 + 4);
        assert_eq!(bytes[36], 15);
        assert_eq!(&bytes[37..], &32u32.to_le_bytes());
    }

    #[test]
    fn test_named_arg_input() {
        let input: NamedArgInput = "max_cap:u64=10000000000".parse().unwrap();
        assert_eq!(input.name, "max_cap");
        assert_eq!(input.kind, ArgKind::U64);
        assert_eq!(input.value, "10000000000");

        let hash: NamedArgInput = "token:bytes32=hash-00".parse().unwrap();
        assert_eq!(hash.kind, ArgKind::HASH);

        assert!("nokind=1".parse::<NamedArgInput>().is_err());
        assert!("x:float=1".parse::<NamedArgInput>().is_err());
    }

    #[test]
    fn test_cl_value_json() {
        let json = CLValue::from(&ArgValue::U256(U256::from(1_000_000_000u64))).to_json();
        assert_eq!(json["cl_type"], "U256");
        assert_eq!(json["bytes"], "0400ca9a3b");
        assert_eq!(json["parsed"], "1000000000");

        let json = CLValue::from(&ArgValue::ByteArray(vec![0; 32])).to_json();
        assert_eq!(json["cl_type"]["ByteArray"], 32);
    }
}
