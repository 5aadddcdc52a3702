//! Core module containing fundamental types
//!
//! This module provides the foundational building blocks used throughout
//! the crate: address handling, typed values, the module table and errors.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, ErrorKind, MemoryError, MemoryResult, MemoryValue, ModuleInfo, ModuleTable,
    ValueKind,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("process-memory-utils requires a 32-bit or 64-bit target");
