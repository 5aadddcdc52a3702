//! Owned kernel handle closed on drop

use crate::core::types::MemoryResult;
use crate::windows::bindings::kernel32;
use std::ptr;
use tracing::warn;
use winapi::um::winnt::HANDLE;

/// Owned Windows `HANDLE`. Closing happens exactly once, in `Drop`.
#[derive(Debug)]
pub struct Handle {
    raw: HANDLE,
}

impl Handle {
    /// Takes ownership of `raw`
    pub fn new(raw: HANDLE) -> Self {
        Handle { raw }
    }

    pub fn null() -> Self {
        Handle {
            raw: ptr::null_mut(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    /// Borrows the raw handle; it stays owned by `self`
    pub fn raw(&self) -> HANDLE {
        self.raw
    }

    /// Closes the handle now, reporting a failed close. Later closes and
    /// the eventual drop are no-ops.
    pub fn close(&mut self) -> MemoryResult<()> {
        let raw = std::mem::replace(&mut self.raw, ptr::null_mut());
        unsafe { kernel32::close_handle(raw) }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "failed to close handle");
        }
    }
}

// A process handle is a kernel object reference valid from any thread
unsafe impl Send for Handle {}
unsafe impl Sync for Handle {}
