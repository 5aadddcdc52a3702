//! Process sessions
//!
//! [`Session`] works over any [`crate::memory::MemoryAccess`] backend. On
//! Windows this module also provides the live backend: a process handle,
//! module enumeration and lookup of processes by name.

pub mod session;

#[cfg(windows)]
pub mod finder;
#[cfg(windows)]
pub mod handle;
#[cfg(windows)]
pub mod modules;

pub use session::{AccessOptions, Session, MAX_READ_LENGTH, MAX_STRING_WINDOW};

#[cfg(windows)]
pub use finder::find_process_id;
#[cfg(windows)]
pub use handle::{ProcessAccess, ProcessHandle};
#[cfg(windows)]
pub use modules::{ModuleEnumerator, ModuleSnapshot};
#[cfg(windows)]
pub use session::ProcessSession;
