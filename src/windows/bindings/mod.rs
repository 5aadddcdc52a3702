//! Windows API bindings
//!
//! Low-level FFI bindings to Windows system libraries.

pub mod kernel32;
pub mod psapi;
pub mod toolhelp;
pub mod user32;

pub use toolhelp::{ProcessEntry, ProcessSnapshot};
