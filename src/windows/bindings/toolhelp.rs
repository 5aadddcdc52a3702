//! ToolHelp32 process snapshot bindings

use crate::core::types::{MemoryError, MemoryResult, ProcessId};
use crate::windows::types::Handle;
use crate::windows::utils::wide_to_string;
use std::mem;
use winapi::shared::minwindef::FALSE;
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::tlhelp32::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
    TH32CS_SNAPPROCESS,
};

/// One row of a process snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    pub pid: ProcessId,
    pub name: String,
}

/// Iterator over a ToolHelp32 process snapshot
pub struct ProcessSnapshot {
    snapshot: Handle,
    first_called: bool,
}

impl ProcessSnapshot {
    /// Takes a snapshot of all running processes
    pub fn new() -> MemoryResult<Self> {
        let raw = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
        if raw.is_null() || raw == INVALID_HANDLE_VALUE {
            return Err(MemoryError::last_os_error());
        }
        Ok(ProcessSnapshot {
            snapshot: Handle::new(raw),
            first_called: false,
        })
    }
}

impl Iterator for ProcessSnapshot {
    type Item = ProcessEntry;

    fn next(&mut self) -> Option<Self::Item> {
        unsafe {
            let mut entry: PROCESSENTRY32W = mem::zeroed();
            entry.dwSize = mem::size_of::<PROCESSENTRY32W>() as u32;

            let success = if self.first_called {
                Process32NextW(self.snapshot.raw(), &mut entry)
            } else {
                self.first_called = true;
                Process32FirstW(self.snapshot.raw(), &mut entry)
            };

            if success == FALSE {
                return None;
            }

            Some(ProcessEntry {
                pid: entry.th32ProcessID,
                name: wide_to_string(&entry.szExeFile),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_snapshot_contains_current_process() {
        let current = std::process::id();
        let found = ProcessSnapshot::new()
            .unwrap()
            .any(|entry| entry.pid == current);
        assert!(found);
    }
}
