//! In-memory address space implementing [`MemoryAccess`]
//!
//! Regions are mapped at fixed addresses; accesses outside a single mapped
//! region fail the same way an OS read of an unmapped page does.

use super::MemoryAccess;
use crate::core::types::{Address, MemoryError, MemoryResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Region {
    data: Vec<u8>,
    writable: bool,
}

/// Sparse simulated memory
#[derive(Debug, Default)]
pub struct MemoryImage {
    regions: RefCell<BTreeMap<usize, Region>>,
    reads: Cell<usize>,
    writes: Cell<usize>,
}

impl MemoryImage {
    /// Creates an empty image
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a writable region, replacing any region starting at the same address
    pub fn map(&self, address: Address, data: Vec<u8>) {
        self.insert(address, data, true);
    }

    /// Maps a region that rejects writes
    pub fn map_readonly(&self, address: Address, data: Vec<u8>) {
        self.insert(address, data, false);
    }

    /// Maps a little-endian pointer of `width` bytes (at most eight) at `address`
    pub fn map_pointer(&self, address: Address, target: Address, width: usize) {
        let bytes = (target.as_usize() as u64).to_le_bytes();
        self.map(address, bytes[..width.min(8)].to_vec());
    }

    /// Removes the region starting at `address`
    pub fn unmap(&self, address: Address) -> bool {
        self.regions.borrow_mut().remove(&address.as_usize()).is_some()
    }

    /// Number of `read_bytes` calls served so far, successful or not
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Number of `write_bytes` calls served so far, successful or not
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    fn insert(&self, address: Address, data: Vec<u8>, writable: bool) {
        self.regions
            .borrow_mut()
            .insert(address.as_usize(), Region { data, writable });
    }

    /// Finds the region holding `[address, address + len)` and returns its
    /// start and the offset of `address` inside it
    fn locate(&self, address: Address, len: usize) -> Option<(usize, usize)> {
        let addr = address.as_usize();
        let end = addr.checked_add(len)?;
        let regions = self.regions.borrow();
        let (&start, region) = regions.range(..=addr).next_back()?;
        (end <= start + region.data.len()).then_some((start, addr - start))
    }
}

impl MemoryAccess for MemoryImage {
    fn read_bytes(&self, address: Address, len: usize) -> MemoryResult<Vec<u8>> {
        self.reads.set(self.reads.get() + 1);

        let (start, offset) = self
            .locate(address, len)
            .ok_or_else(|| MemoryError::read_failed(address, "address is not mapped"))?;

        let regions = self.regions.borrow();
        Ok(regions[&start].data[offset..offset + len].to_vec())
    }

    fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        self.writes.set(self.writes.get() + 1);

        let (start, offset) = self
            .locate(address, data.len())
            .ok_or_else(|| MemoryError::write_failed(address, "address is not mapped"))?;

        let mut regions = self.regions.borrow_mut();
        let region = regions
            .get_mut(&start)
            .ok_or_else(|| MemoryError::write_failed(address, "address is not mapped"))?;
        if !region.writable {
            return Err(MemoryError::write_failed(address, "region is read-only"));
        }

        region.data[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn release(&mut self) -> MemoryResult<()> {
        self.regions.get_mut().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_within_region() {
        let image = MemoryImage::new();
        image.map(Address::new(0x1000), vec![0, 1, 2, 3, 4, 5]);

        assert_eq!(
            image.read_bytes(Address::new(0x1002), 3).unwrap(),
            vec![2, 3, 4]
        );
        assert_eq!(image.reads(), 1);
    }

    #[test]
    fn test_read_outside_region_fails() {
        let image = MemoryImage::new();
        image.map(Address::new(0x1000), vec![0; 4]);

        assert!(image.read_bytes(Address::new(0x0FFF), 1).is_err());
        assert!(image.read_bytes(Address::new(0x1002), 4).is_err());
        assert!(image.read_bytes(Address::new(usize::MAX), 2).is_err());
        assert_eq!(image.reads(), 3);
    }

    #[test]
    fn test_write_and_read_back() {
        let image = MemoryImage::new();
        image.map(Address::new(0x2000), vec![0; 8]);

        image.write_bytes(Address::new(0x2004), &[0xAA, 0xBB]).unwrap();
        assert_eq!(
            image.read_bytes(Address::new(0x2000), 8).unwrap(),
            vec![0, 0, 0, 0, 0xAA, 0xBB, 0, 0]
        );
    }

    #[test]
    fn test_readonly_region_rejects_writes() {
        let image = MemoryImage::new();
        image.map_readonly(Address::new(0x3000), vec![7; 4]);

        let err = image.write_bytes(Address::new(0x3000), &[1]).unwrap_err();
        assert!(matches!(err, MemoryError::WriteFailed { .. }));
        assert_eq!(image.read_bytes(Address::new(0x3000), 1).unwrap(), vec![7]);
    }

    #[test]
    fn test_map_pointer_and_unmap() {
        let image = MemoryImage::new();
        image.map_pointer(Address::new(0x10), Address::new(0x12345678), 4);
        assert_eq!(
            image.read_bytes(Address::new(0x10), 4).unwrap(),
            vec![0x78, 0x56, 0x34, 0x12]
        );

        assert!(image.unmap(Address::new(0x10)));
        assert!(image.read_bytes(Address::new(0x10), 4).is_err());
    }

    #[test]
    fn test_release_unmaps_everything() {
        let mut image = MemoryImage::new();
        image.map(Address::new(0x1000), vec![1; 4]);

        image.release().unwrap();
        assert!(image.read_bytes(Address::new(0x1000), 1).is_err());
    }
}
