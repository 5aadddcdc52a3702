//! Memory address wrapper type with pointer decoding

use super::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An address inside the target process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub usize);

impl Address {
    /// Creates a new address from a usize value
    pub const fn new(value: usize) -> Self {
        Address(value)
    }

    /// Creates a null address (0x0)
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks if the address is null
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Adds a signed offset, wrapping in the machine word
    pub const fn offset(&self, offset: i64) -> Self {
        Address(self.0.wrapping_add(offset as isize as usize))
    }

    /// Returns the raw usize value
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    /// Decodes a little-endian pointer of up to eight bytes, zero-extended
    pub fn from_le_bytes(bytes: &[u8]) -> MemoryResult<Self> {
        if bytes.is_empty() || bytes.len() > 8 {
            return Err(MemoryError::InvalidPointerWidth(bytes.len()));
        }

        let mut raw = [0u8; 8];
        raw[..bytes.len()].copy_from_slice(bytes);
        Ok(Address(u64::from_le_bytes(raw) as usize))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Address::new(value)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address::new(value as usize)
    }
}

impl From<Address> for usize {
    fn from(address: Address) -> Self {
        address.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_offset() {
        let addr = Address::new(0x1000);
        assert_eq!(addr.offset(0x10), Address::new(0x1010));
        assert_eq!(addr.offset(-0x10), Address::new(0x0FF0));
        assert_eq!(Address::null().offset(-1), Address::new(usize::MAX));
    }

    #[test]
    fn test_pointer_decoding() {
        assert_eq!(
            Address::from_le_bytes(&[0x78, 0x56, 0x34, 0x12]).unwrap(),
            Address::new(0x12345678)
        );
        assert_eq!(Address::from_le_bytes(&[0xFF]).unwrap(), Address::new(0xFF));
        assert!(Address::from_le_bytes(&[]).is_err());
        assert!(Address::from_le_bytes(&[0; 9]).is_err());
    }

    #[test]
    fn test_address_display() {
        let addr = Address::new(0xDEADBEEF);
        assert_eq!(format!("{}", addr), "0xDEADBEEF");
        assert_eq!(format!("{:x}", addr), "deadbeef");
        assert_eq!(format!("{:#010X}", addr), "0xDEADBEEF");
    }
}
