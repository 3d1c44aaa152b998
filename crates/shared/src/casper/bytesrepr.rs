//! Binary encoding used by the node for deploy hashing and CL values.
//!
//! Integers are little endian with fixed width, big unsigned integers carry a
//! one byte length followed by their significant little endian bytes, and
//! variable sized collections are prefixed with a `u32` length.

use alloy::primitives::U256;

use super::error::DeployError;

pub trait ToBytes {
    fn write_bytes(&self, out: &mut Vec<u8>);

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_bytes(&mut out);
        out
    }
}

impl ToBytes for u8 {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(*self);
    }
}

impl ToBytes for bool {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }
}

impl ToBytes for u32 {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl ToBytes for u64 {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl ToBytes for str {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        write_len(self.len(), out);
        out.extend_from_slice(self.as_bytes());
    }
}

impl ToBytes for String {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        self.as_str().write_bytes(out);
    }
}

impl<T: ToBytes> ToBytes for Option<T> {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        match self {
            None => out.push(0),
            Some(value) => {
                out.push(1);
                value.write_bytes(out);
            }
        }
    }
}

impl<T: ToBytes> ToBytes for Vec<T> {
    fn write_bytes(&self, out: &mut Vec<u8>) {
        write_len(self.len(), out);
        for item in self {
            item.write_bytes(out);
        }
    }
}

/// Checks that a collection fits the `u32` length prefix.
pub fn encoded_len(len: usize) -> Result<u32, DeployError> {
    u32::try_from(len).map_err(|_| {
        DeployError::encoding(format!("length {len} exceeds the u32 length prefix"))
    })
}

/// Writes a length prefix. Module bytes and argument values are checked with
/// [`encoded_len`] when they enter the builder, so this never saturates.
pub fn write_len(len: usize, out: &mut Vec<u8>) {
    u32::try_from(len).unwrap_or(u32::MAX).write_bytes(out);
}

/// Length-prefixed opaque bytes (`Bytes` on the node side).
pub fn write_byte_vec(bytes: &[u8], out: &mut Vec<u8>) {
    write_len(bytes.len(), out);
    out.extend_from_slice(bytes);
}

/// Variable length encoding shared by `U128`, `U256` and `U512`.
pub fn write_big_uint(value: &U256, out: &mut Vec<u8>) {
    let le: [u8; 32] = value.to_le_bytes();
    let significant = le.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
    out.push(significant as u8);
    out.extend_from_slice(&le[..significant]);
}

/// Cursor over an encoded buffer.
pub struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DeployError> {
        if self.bytes.len() < n {
            return Err(DeployError::encoding(format!(
                "unexpected end of input: wanted {} bytes, {} left",
                n,
                self.bytes.len()
            )));
        }
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        Ok(head)
    }

    pub fn u8(&mut self) -> Result<u8, DeployError> {
        Ok(self.take(1)?[0])
    }

    pub fn u32(&mut self) -> Result<u32, DeployError> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4)?);
        Ok(u32::from_le_bytes(buf))
    }

    pub fn u64(&mut self) -> Result<u64, DeployError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(buf))
    }

    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], DeployError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    pub fn byte_vec(&mut self) -> Result<Vec<u8>, DeployError> {
        let len = self.u32()? as usize;
        Ok(self.take(len)?.to_vec())
    }

    pub fn string(&mut self) -> Result<String, DeployError> {
        let bytes = self.byte_vec()?;
        String::from_utf8(bytes).map_err(|e| DeployError::encoding(format!("invalid utf-8: {e}")))
    }

    /// Reads a big unsigned integer of at most `max_bytes` significant bytes.
    pub fn big_uint(&mut self, max_bytes: usize) -> Result<U256, DeployError> {
        let len = self.u8()? as usize;
        if len > max_bytes || len > 32 {
            return Err(DeployError::encoding(format!(
                "big integer of {len} bytes exceeds {max_bytes}"
            )));
        }
        let mut le = [0u8; 32];
        le[..len].copy_from_slice(self.take(len)?);
        Ok(U256::from_le_bytes(le))
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn finish(self) -> Result<(), DeployError> {
        if self.bytes.is_empty() {
            Ok(())
        } else {
            Err(DeployError::encoding(format!(
                "{} trailing bytes after value",
                self.bytes.len()
            )))
        }
    }
}
