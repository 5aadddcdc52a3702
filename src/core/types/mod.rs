//! Core type definitions
//!
//! Address wrappers, typed memory values, the module table snapshot and the
//! error type shared by every component.

mod address;
mod error;
mod module_table;
mod value;

// Re-export all public types
pub use address::Address;
pub use error::{ErrorKind, MemoryError, MemoryResult};
pub use module_table::{ModuleInfo, ModuleTable};
pub use value::{MemoryValue, ValueKind};

// Common type aliases
pub type ProcessId = u32;
pub type Offset = i64;
