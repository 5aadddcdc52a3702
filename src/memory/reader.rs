//! Typed memory reading over any [`MemoryAccess`] backend

use super::MemoryAccess;
use crate::core::types::{Address, MemoryError, MemoryResult, MemoryValue, ValueKind};
use tracing::{debug, warn};

/// Number of bytes read for a string when no window is configured
pub const DEFAULT_STRING_WINDOW: usize = 10;

/// Reader borrowing a memory backend for the duration of its calls
pub struct MemoryReader<'a, M: MemoryAccess + ?Sized> {
    source: &'a M,
    string_window: usize,
}

impl<'a, M: MemoryAccess + ?Sized> MemoryReader<'a, M> {
    /// Create a new memory reader
    pub fn new(source: &'a M) -> Self {
        MemoryReader {
            source,
            string_window: DEFAULT_STRING_WINDOW,
        }
    }

    /// Sets the fixed number of bytes read for strings
    pub fn with_string_window(mut self, window: usize) -> Self {
        self.string_window = window;
        self
    }

    pub fn string_window(&self) -> usize {
        self.string_window
    }

    /// Read raw bytes from memory
    pub fn read_raw(&self, address: Address, len: usize) -> MemoryResult<Vec<u8>> {
        let bytes = self.source.read_bytes(address, len)?;
        if bytes.len() != len {
            return Err(MemoryError::read_failed(
                address,
                format!("partial read: expected {} bytes, got {}", len, bytes.len()),
            ));
        }
        Ok(bytes)
    }

    /// Read a value of the given kind. Failures are always reported.
    pub fn read_value(&self, address: Address, kind: ValueKind) -> MemoryResult<MemoryValue> {
        let value = match kind.size() {
            Some(size) => MemoryValue::decode(kind, &self.read_raw(address, size)?)?,
            None => MemoryValue::Text(self.read_string_strict(address)?),
        };
        debug!(%address, %value, "read value");
        Ok(value)
    }

    /// Read a string from the fixed window, reporting failures
    pub fn read_string_strict(&self, address: Address) -> MemoryResult<String> {
        let bytes = self.read_raw(address, self.string_window)?;
        Ok(decode_window(&bytes))
    }

    /// Read a string from the fixed window.
    ///
    /// Always returns a string: a failed read yields `""`. Longer strings are
    /// truncated to the window.
    pub fn read_string(&self, address: Address) -> String {
        self.read_string_strict(address).unwrap_or_else(|e| {
            warn!(%address, error = %e, "string read failed, returning empty string");
            String::new()
        })
    }

    /// Read a little-endian pointer of `width` bytes
    pub fn read_pointer(&self, address: Address, width: usize) -> MemoryResult<Address> {
        if width == 0 || width > 8 {
            return Err(MemoryError::InvalidPointerWidth(width));
        }
        Address::from_le_bytes(&self.read_raw(address, width)?)
    }
}

/// Decodes a string window as UTF-8 and trims trailing NUL characters
pub fn decode_window(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches('\0')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryImage;

    fn image() -> MemoryImage {
        let image = MemoryImage::new();
        image.map(Address::new(0x1000), b"HI\0\0\0\0\0\0\0\0".to_vec());
        image.map(Address::new(0x2000), (-42i32).to_le_bytes().to_vec());
        image.map(Address::new(0x3000), b"ABCDEFGHIJKLMNOP".to_vec());
        image
    }

    #[test]
    fn test_string_window_trims_trailing_nuls() {
        let image = image();
        let reader = MemoryReader::new(&image);
        assert_eq!(reader.read_string(Address::new(0x1000)), "HI");
    }

    #[test]
    fn test_string_is_truncated_to_window() {
        let image = image();
        let reader = MemoryReader::new(&image);
        assert_eq!(reader.read_string(Address::new(0x3000)), "ABCDEFGHIJ");

        let reader = MemoryReader::new(&image).with_string_window(4);
        assert_eq!(reader.read_string(Address::new(0x3000)), "ABCD");
    }

    #[test]
    fn test_string_read_failure_is_empty() {
        let image = image();
        let reader = MemoryReader::new(&image);
        assert_eq!(reader.read_string(Address::new(0xDEAD)), "");
        assert!(reader.read_string_strict(Address::new(0xDEAD)).is_err());
    }

    #[test]
    fn test_typed_read_failure_is_reported() {
        let image = image();
        let reader = MemoryReader::new(&image);
        let err = reader
            .read_value(Address::new(0xDEAD), ValueKind::Int)
            .unwrap_err();
        assert!(matches!(err, MemoryError::ReadFailed { .. }));
    }

    #[test]
    fn test_read_typed_values() {
        let image = image();
        let reader = MemoryReader::new(&image);
        assert_eq!(
            reader.read_value(Address::new(0x2000), ValueKind::Int).unwrap(),
            MemoryValue::Int(-42)
        );
        assert_eq!(
            reader.read_value(Address::new(0x3000), ValueKind::Byte).unwrap(),
            MemoryValue::Byte(b'A')
        );
        assert_eq!(
            reader
                .read_value(Address::new(0x1000), ValueKind::String)
                .unwrap(),
            MemoryValue::Text("HI".to_string())
        );
    }

    #[test]
    fn test_read_pointer() {
        let image = image();
        let reader = MemoryReader::new(&image);
        assert_eq!(
            reader.read_pointer(Address::new(0x2000), 4).unwrap(),
            Address::new(0xFFFF_FFD6)
        );
        assert!(matches!(
            reader.read_pointer(Address::new(0x2000), 0),
            Err(MemoryError::InvalidPointerWidth(0))
        ));
    }

    #[test]
    fn test_decode_window_keeps_interior_nul() {
        assert_eq!(decode_window(b"A\0B\0\0"), "A\0B");
        assert_eq!(decode_window(b"\0\0"), "");
    }
}
