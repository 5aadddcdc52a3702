//! Memory writing over any [`MemoryAccess`] backend
//!
//! OS write failures are reported as `false` rather than an error; callers
//! must check the returned flag. The `_strict` variants return the error.

use super::MemoryAccess;
use crate::core::types::{Address, MemoryResult, MemoryValue, ValueKind};
use tracing::{debug, warn};

/// Writer borrowing a memory backend for the duration of its calls
pub struct MemoryWriter<'a, M: MemoryAccess + ?Sized> {
    target: &'a M,
}

impl<'a, M: MemoryAccess + ?Sized> MemoryWriter<'a, M> {
    /// Create a new memory writer
    pub fn new(target: &'a M) -> Self {
        MemoryWriter { target }
    }

    /// Write raw bytes, returning the error on failure
    pub fn write_bytes_strict(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        self.target.write_bytes(address, data)?;
        debug!(%address, len = data.len(), "wrote bytes");
        Ok(())
    }

    /// Write raw bytes. Returns `false` when the write did not happen.
    pub fn write_bytes(&self, address: Address, data: &[u8]) -> bool {
        match self.write_bytes_strict(address, data) {
            Ok(()) => true,
            Err(e) => {
                warn!(%address, error = %e, "write failed");
                false
            }
        }
    }

    /// Write an encoded value. Text is written without a terminator.
    pub fn write_value(&self, address: Address, value: &MemoryValue) -> bool {
        self.write_bytes(address, &value.encode())
    }

    pub fn write_value_strict(&self, address: Address, value: &MemoryValue) -> MemoryResult<()> {
        self.write_bytes_strict(address, &value.encode())
    }

    /// Write a value given as a type tag and text, e.g. `("int", "100")`.
    ///
    /// The tag and the text are validated before any bytes are written, so an
    /// unknown tag or unparsable text returns an error with memory untouched.
    /// The flag reports whether the OS write succeeded.
    pub fn write_text(&self, address: Address, tag: &str, text: &str) -> MemoryResult<bool> {
        let kind: ValueKind = tag.parse()?;
        let value = MemoryValue::parse(kind, text)?;
        Ok(self.write_value(address, &value))
    }
}
