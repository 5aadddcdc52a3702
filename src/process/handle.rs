//! Live process handle implementing [`MemoryAccess`]

use crate::core::types::{Address, MemoryError, MemoryResult, ProcessId};
use crate::memory::MemoryAccess;
use crate::windows::bindings::{kernel32, user32};
use crate::windows::types::Handle;
use std::fmt;
use tracing::debug;

/// Access rights for process handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessAccess {
    value: u32,
}

impl ProcessAccess {
    pub const QUERY_INFORMATION: Self = Self { value: 0x0400 };
    pub const VM_READ: Self = Self { value: 0x0010 };
    pub const VM_WRITE: Self = Self { value: 0x0020 };
    pub const VM_OPERATION: Self = Self { value: 0x0008 };

    /// Rights needed to enumerate modules and read and write memory
    pub const READ_WRITE: Self = Self {
        value: Self::QUERY_INFORMATION.value
            | Self::VM_READ.value
            | Self::VM_WRITE.value
            | Self::VM_OPERATION.value,
    };

    pub fn value(&self) -> u32 {
        self.value
    }
}

/// Open handle to another process. The handle is closed when dropped.
pub struct ProcessHandle {
    handle: Handle,
    pid: ProcessId,
    access: ProcessAccess,
}

impl ProcessHandle {
    /// Open a process with specified access rights
    pub fn open(pid: ProcessId, access: ProcessAccess) -> MemoryResult<Self> {
        if pid == 0 {
            return Err(MemoryError::attach_failed(pid, "process id 0 is not attachable"));
        }

        let raw = kernel32::open_process(pid, access.value())?;
        debug!(pid, access = access.value(), "opened process");
        Ok(ProcessHandle {
            handle: Handle::new(raw),
            pid,
            access,
        })
    }

    /// Open a process for module enumeration and memory reads and writes
    pub fn open_for_read_write(pid: ProcessId) -> MemoryResult<Self> {
        Self::open(pid, ProcessAccess::READ_WRITE)
    }

    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    pub fn access(&self) -> ProcessAccess {
        self.access
    }

    /// Borrow the raw handle
    ///
    /// # Safety
    /// The returned handle is only valid as long as this ProcessHandle exists
    pub unsafe fn raw(&self) -> winapi::um::winnt::HANDLE {
        self.handle.raw()
    }

    pub fn is_valid(&self) -> bool {
        !self.handle.is_null()
    }

    /// Whether the process has not exited yet
    pub fn is_running(&self) -> MemoryResult<bool> {
        self.ensure_valid()?;
        let code = unsafe { kernel32::get_exit_code_process(self.handle.raw())? };
        Ok(code == kernel32::STILL_ACTIVE)
    }

    /// Whether the process's main window answers messages
    pub fn is_responding(&self) -> bool {
        user32::is_process_responding(self.pid)
    }

    /// Closes the handle. Memory access afterwards fails with `InvalidHandle`.
    pub fn close(&mut self) -> MemoryResult<()> {
        debug!(pid = self.pid, "closing process handle");
        self.handle.close()
    }

    fn ensure_valid(&self) -> MemoryResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(MemoryError::InvalidHandle(format!(
                "handle for process {} is closed",
                self.pid
            )))
        }
    }
}

impl MemoryAccess for ProcessHandle {
    fn read_bytes(&self, address: Address, len: usize) -> MemoryResult<Vec<u8>> {
        self.ensure_valid()?;
        let mut buffer = vec![0u8; len];
        let read = unsafe { kernel32::read_process_memory(self.handle.raw(), address, &mut buffer)? };
        buffer.truncate(read);
        Ok(buffer)
    }

    fn write_bytes(&self, address: Address, data: &[u8]) -> MemoryResult<()> {
        self.ensure_valid()?;
        let written = unsafe { kernel32::write_process_memory(self.handle.raw(), address, data)? };
        if written != data.len() {
            return Err(MemoryError::write_failed(
                address,
                format!("partial write: {} of {} bytes", written, data.len()),
            ));
        }
        Ok(())
    }

    fn release(&mut self) -> MemoryResult<()> {
        self.close()
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("valid", &self.is_valid())
            .field("access", &format!("0x{:X}", self.access.value()))
            .finish()
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcessHandle(pid={}, valid={})", self.pid, self.is_valid())
    }
}
