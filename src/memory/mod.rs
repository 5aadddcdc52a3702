//! Memory access for resolved addresses
//!
//! This module provides:
//! - The [`MemoryAccess`] trait implemented by live processes and memory images
//! - Typed and string reads with explicit or permissive failure handling
//! - Raw and typed writes reporting success as a boolean
//! - An in-memory address space for tests and offline use

pub mod image;
pub mod reader;
pub mod writer;

pub use image::MemoryImage;
pub use reader::{decode_window, MemoryReader, DEFAULT_STRING_WINDOW};
pub use writer::MemoryWriter;

use crate::core::types::{Address, MemoryResult};

/// Raw byte access to an address space.
///
/// Implementations perform exactly one OS call (or equivalent) per method and
/// never retry. Both methods take `&self`; the target's memory is external
/// state, not owned by the implementor.
pub trait MemoryAccess {
    /// Reads exactly `len` bytes starting at `address`
    fn read_bytes(&self, address: Address, len: usize) -> MemoryResult<Vec<u8>>;

    /// Writes all of `data` starting at `address`
    fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<()>;

    /// Releases OS resources held by the backend. Accesses afterwards fail.
    fn release(&mut self) -> MemoryResult<()> {
        Ok(())
    }
}

impl<M: MemoryAccess + ?Sized> MemoryAccess for &M {
    fn read_bytes(&self, address: Address, len: usize) -> MemoryResult<Vec<u8>> {
        (**self).read_bytes(address, len)
    }

    fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        (**self).write_bytes(address, data)
    }
}

impl<M: MemoryAccess + ?Sized> MemoryAccess for Box<M> {
    fn read_bytes(&self, address: Address, len: usize) -> MemoryResult<Vec<u8>> {
        (**self).read_bytes(address, len)
    }

    fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        (**self).write_bytes(address, data)
    }

    fn release(&mut self) -> MemoryResult<()> {
        (**self).release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_through_references() {
        let image = MemoryImage::new();
        image.map(Address::new(0x1000), vec![1, 2, 3, 4]);

        let by_ref: &dyn MemoryAccess = &image;
        assert_eq!(
            by_ref.read_bytes(Address::new(0x1001), 2).unwrap(),
            vec![2, 3]
        );

        let boxed: Box<dyn MemoryAccess> = Box::new(image);
        assert!(boxed.write_bytes(Address::new(0x1000), &[9]).is_ok());
        assert_eq!(boxed.read_bytes(Address::new(0x1000), 1).unwrap(), vec![9]);
    }
}
