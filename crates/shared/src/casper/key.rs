use std::fmt;
use std::str::FromStr;

use super::bytesrepr::{Reader, ToBytes};
use super::error::DeployError;

pub const HASH_LENGTH: usize = 32;

pub const HASH_PREFIX: &str = "hash-";
pub const ACCOUNT_HASH_PREFIX: &str = "account-hash-";
pub const UREF_PREFIX: &str = "uref-";

const KEY_TAG_ACCOUNT: u8 = 0;
const KEY_TAG_HASH: u8 = 1;
const KEY_TAG_UREF: u8 = 2;

/// Decodes exactly 32 bytes of hex text.
pub fn decode_hash_hex(hex_str: &str) -> Result<[u8; HASH_LENGTH], DeployError> {
    let bytes = hex::decode(hex_str)
        .map_err(|e| DeployError::encoding(format!("invalid hex '{hex_str}': {e}")))?;
    bytes.as_slice().try_into().map_err(|_| {
        DeployError::encoding(format!(
            "expected {HASH_LENGTH} bytes, got {} in '{hex_str}'",
            bytes.len()
        ))
    })
}

/// 32-byte content hash of a contract or contract package.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashAddr([u8; HASH_LENGTH]);

impl HashAddr {
    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Parses `hash-<64 hex>` or bare `<64 hex>`.
    pub fn parse(input: &str) -> Result<Self, DeployError> {
        let trimmed = input.trim();
        let hex_part = trimmed.strip_prefix(HASH_PREFIX).unwrap_or(trimmed);
        decode_hash_hex(hex_part).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for HashAddr {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HashAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", HASH_PREFIX, self.to_hex())
    }
}

impl ToBytes for HashAddr {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountHash([u8; HASH_LENGTH]);

impl AccountHash {
    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn parse(input: &str) -> Result<Self, DeployError> {
        let hex_part = input
            .trim()
            .strip_prefix(ACCOUNT_HASH_PREFIX)
            .ok_or_else(|| {
                DeployError::encoding(format!("'{input}' is missing the account-hash- prefix"))
            })?;
        decode_hash_hex(hex_part).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }
}

impl fmt::Display for AccountHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ACCOUNT_HASH_PREFIX, hex::encode(self.0))
    }
}

/// Access rights bit flags carried by a URef.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccessRights(u8);

impl AccessRights {
    pub const NONE: AccessRights = AccessRights(0);
    pub const READ: AccessRights = AccessRights(0b001);
    pub const WRITE: AccessRights = AccessRights(0b010);
    pub const ADD: AccessRights = AccessRights(0b100);
    pub const READ_ADD_WRITE: AccessRights = AccessRights(0b111);

    pub fn from_bits(bits: u8) -> Result<Self, DeployError> {
        if bits > Self::READ_ADD_WRITE.0 {
            return Err(DeployError::encoding(format!(
                "invalid access rights bits {bits:#05b}"
            )));
        }
        Ok(Self(bits))
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct URef {
    addr: [u8; HASH_LENGTH],
    rights: AccessRights,
}

impl URef {
    pub const fn new(addr: [u8; HASH_LENGTH], rights: AccessRights) -> Self {
        Self { addr, rights }
    }

    /// Parses the formatted form `uref-<64 hex>-<3 octal digits>`.
    pub fn parse(input: &str) -> Result<Self, DeployError> {
        let body = input
            .trim()
            .strip_prefix(UREF_PREFIX)
            .ok_or_else(|| DeployError::encoding(format!("'{input}' is missing the uref- prefix")))?;
        let (addr_hex, rights) = body.rsplit_once('-').ok_or_else(|| {
            DeployError::encoding(format!("'{input}' is missing the access rights suffix"))
        })?;
        let bits = u8::from_str_radix(rights, 8)
            .map_err(|e| DeployError::encoding(format!("invalid access rights '{rights}': {e}")))?;
        Ok(Self {
            addr: decode_hash_hex(addr_hex)?,
            rights: AccessRights::from_bits(bits)?,
        })
    }

    pub fn addr(&self) -> &[u8; HASH_LENGTH] {
        &self.addr
    }

    pub fn rights(&self) -> AccessRights {
        self.rights
    }
}

impl fmt::Display for URef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}-{:03o}", UREF_PREFIX, hex::encode(self.addr), self.rights.0)
    }
}

impl ToBytes for URef {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.addr);
        out.push(self.rights.0);
    }
}

/// Global state key as passed to contract entrypoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Account(AccountHash),
    Hash(HashAddr),
    URef(URef),
}

impl Key {
    /// Accepts `account-hash-<hex>`, `uref-<hex>-<rights>`, `hash-<hex>` or
    /// bare hex, the latter being read as a contract hash.
    pub fn parse(input: &str) -> Result<Self, DeployError> {
        let trimmed = input.trim();
        if trimmed.starts_with(ACCOUNT_HASH_PREFIX) {
            AccountHash::parse(trimmed).map(Key::Account)
        } else if trimmed.starts_with(UREF_PREFIX) {
            URef::parse(trimmed).map(Key::URef)
        } else {
            HashAddr::parse(trimmed).map(Key::Hash)
        }
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Self, DeployError> {
        match reader.u8()? {
            KEY_TAG_ACCOUNT => Ok(Key::Account(AccountHash(reader.array()?))),
            KEY_TAG_HASH => Ok(Key::Hash(HashAddr(reader.array()?))),
            KEY_TAG_UREF => {
                let addr = reader.array()?;
                let rights = AccessRights::from_bits(reader.u8()?)?;
                Ok(Key::URef(URef::new(addr, rights)))
            }
            tag => Err(DeployError::encoding(format!("unsupported key tag {tag}"))),
        }
    }
}

impl FromStr for Key {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Account(account) => write!(f, "{account}"),
            Key::Hash(hash) => write!(f, "{hash}"),
            Key::URef(uref) => write!(f, "{uref}"),
        }
    }
}

impl ToBytes for Key {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        match self {
            Key::Account(account) => {
                out.push(KEY_TAG_ACCOUNT);
                out.extend_from_slice(&account.0);
            }
            Key::Hash(hash) => {
                out.push(KEY_TAG_HASH);
                hash.write_bytes(out);
            }
            Key::URef(uref) => {
                out.push(KEY_TAG_UREF);
                uref.write_bytes(out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX_11: &str = "1111111111111111111111111111111111111111111111111111111111111111";

    #[test]
    fn test_hash_prefix_is_optional() {
        let with_prefix = HashAddr::parse(&format!("hash-{HEX_11}")).unwrap();
        let without_prefix = HashAddr::parse(HEX_11).unwrap();
        assert_eq!(with_prefix, without_prefix);
        assert_eq!(with_prefix.as_bytes(), &[0x11; 32]);
    }

    #[test]
    fn test_hash_rejects_bad_hex() {
        assert!(matches!(
            HashAddr::parse("hash-abc"),
            Err(DeployError::Encoding(_))
        ));
        assert!(matches!(
            HashAddr::parse(&"zz".repeat(32)),
            Err(DeployError::Encoding(_))
        ));
        // 31 bytes
        assert!(matches!(
            HashAddr::parse(&"aa".repeat(31)),
            Err(DeployError::Encoding(_))
        ));
    }

    #[test]
    fn test_hash_display_round_trip() {
        let hash = HashAddr::new([0xab; 32]);
        assert_eq!(HashAddr::parse(&hash.to_string()).unwrap(), hash);
        assert!(hash.to_string().starts_with("hash-"));
    }

    #[test]
    fn test_key_parse_variants() {
        let account = Key::parse(&format!("account-hash-{HEX_11}")).unwrap();
        assert!(matches!(account, Key::Account(_)));

        let bare = Key::parse(HEX_11).unwrap();
        assert_eq!(bare, Key::Hash(HashAddr::new([0x11; 32])));

        let uref = Key::parse(&format!("uref-{HEX_11}-007")).unwrap();
        match uref {
            Key::URef(uref) => assert_eq!(uref.rights(), AccessRights::READ_ADD_WRITE),
            other => panic!("unexpected key {other:?}"),
        }
    }

    #[test]
    fn test_key_bytes() {
        let key = Key::Hash(HashAddr::new([0x22; 32]));
        let bytes = key.to_bytes();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 1);

        let uref = Key::URef(URef::new([0x01; 32], AccessRights::READ));
        let bytes = uref.to_bytes();
        assert_eq!(bytes.len(), 34);
        assert_eq!(bytes[0], 2);
        assert_eq!(bytes[33], 1);
    }

    #[test]
    fn test_uref_rejects_bad_rights() {
        assert!(URef::parse(&format!("uref-{HEX_11}-010")).is_err());
        assert!(URef::parse(&format!("uref-{HEX_11}")).is_err());
    }
}
