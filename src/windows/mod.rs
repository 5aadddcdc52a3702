//! Windows API layer
//!
//! All unsafe FFI calls are contained within this module. Everything above
//! it talks to a process through [`crate::memory::MemoryAccess`].

pub mod bindings;
pub mod types;
pub mod utils;

pub use bindings::{kernel32, psapi, ProcessEntry, ProcessSnapshot};
pub use types::Handle;
pub use utils::ErrorCode;
