//! Pointer-path resolution and typed memory access for external processes
//!
//! A *code* such as `game.exe+1A2B` or `base+00A1B2C4,10,4` names a location
//! inside another process. This crate parses codes ([`code`]), resolves them
//! against the target's module table by following pointer chains
//! ([`resolver`]) and reads or writes typed values there ([`memory`]).
//! [`process::Session`] ties these together over any
//! [`memory::MemoryAccess`] backend; on Windows the backend is a live process
//! handle.

pub mod code;
pub mod config;
pub mod core;
pub mod memory;
pub mod process;
pub mod resolver;
#[cfg(windows)]
pub mod windows;

pub use crate::code::{load_code, AddressSpec, BaseSelector, CodeBook};
pub use crate::core::types::{
    Address, ErrorKind, MemoryError, MemoryResult, MemoryValue, ModuleInfo, ModuleTable, Offset,
    ProcessId, ValueKind,
};
pub use crate::core::{AUTHORS, VERSION};
pub use crate::memory::{MemoryAccess, MemoryImage, MemoryReader, MemoryWriter};
pub use crate::process::{AccessOptions, Session};
pub use crate::resolver::{resolve, resolve_strict, ResolveOptions};

#[cfg(windows)]
pub use crate::process::{find_process_id, ProcessHandle, ProcessSession};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(AUTHORS, env!("CARGO_PKG_AUTHORS"));
    }

    #[test]
    fn test_parse_resolve_read_from_root() {
        let image = MemoryImage::new();
        image.map(Address::new(0x401000), 1.5f32.to_le_bytes().to_vec());

        let modules: ModuleTable = [("game.exe", Address::new(0x400000))].into_iter().collect();
        let spec = code::parse("game.exe+1000", &modules).unwrap();
        let address = resolve(
            &spec,
            &modules,
            Address::new(0x400000),
            &image,
            ResolveOptions::default(),
        );

        let value = MemoryReader::new(&image)
            .read_value(address, ValueKind::Float)
            .unwrap();
        assert_eq!(value, MemoryValue::Float(1.5));
    }

    #[test]
    fn test_error_kind_reexport() {
        let err = MemoryError::UnsupportedType("double".to_string());
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    }
}
