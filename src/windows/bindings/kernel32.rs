//! Kernel32.dll bindings for process and memory operations

use crate::core::types::{Address, MemoryError, MemoryResult};
use crate::windows::utils::ErrorCode;
use winapi::shared::minwindef::{DWORD, FALSE, LPCVOID, LPVOID};
use winapi::um::handleapi::CloseHandle;
use winapi::um::memoryapi::{ReadProcessMemory, WriteProcessMemory};
use winapi::um::processthreadsapi::{GetExitCodeProcess, OpenProcess};
use winapi::um::winnt::HANDLE;

/// Exit code reported by `GetExitCodeProcess` while a process is running
pub const STILL_ACTIVE: u32 = 259;

/// Safe wrapper for OpenProcess
pub fn open_process(pid: u32, desired_access: u32) -> MemoryResult<HANDLE> {
    let handle = unsafe { OpenProcess(desired_access, FALSE, pid) };
    if !handle.is_null() {
        return Ok(handle);
    }

    match ErrorCode::last_error() {
        ErrorCode::AccessDenied => Err(MemoryError::access_denied(pid, "OpenProcess refused")),
        ErrorCode::InvalidParameter => Err(MemoryError::ProcessNotFound(format!("PID: {}", pid))),
        code => Err(MemoryError::attach_failed(
            pid,
            format!("OpenProcess failed: {}", code),
        )),
    }
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle that is not closed elsewhere
pub unsafe fn close_handle(handle: HANDLE) -> MemoryResult<()> {
    if handle.is_null() {
        return Ok(());
    }

    if CloseHandle(handle) == FALSE {
        Err(MemoryError::WindowsApi(format!(
            "CloseHandle failed: {}",
            ErrorCode::last_error()
        )))
    } else {
        Ok(())
    }
}

/// Safe wrapper for ReadProcessMemory. Returns the number of bytes read.
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_VM_READ`
pub unsafe fn read_process_memory(
    handle: HANDLE,
    address: Address,
    buffer: &mut [u8],
) -> MemoryResult<usize> {
    let mut bytes_read = 0;

    let result = ReadProcessMemory(
        handle,
        address.as_usize() as LPCVOID,
        buffer.as_mut_ptr() as LPVOID,
        buffer.len(),
        &mut bytes_read,
    );

    if result == FALSE {
        Err(MemoryError::read_failed(
            address,
            format!("ReadProcessMemory failed: {}", ErrorCode::last_error()),
        ))
    } else {
        Ok(bytes_read)
    }
}

/// Safe wrapper for WriteProcessMemory. Returns the number of bytes written.
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_VM_WRITE` and
/// `PROCESS_VM_OPERATION`
pub unsafe fn write_process_memory(
    handle: HANDLE,
    address: Address,
    data: &[u8],
) -> MemoryResult<usize> {
    let mut bytes_written = 0;

    let result = WriteProcessMemory(
        handle,
        address.as_usize() as LPVOID,
        data.as_ptr() as LPCVOID,
        data.len(),
        &mut bytes_written,
    );

    if result == FALSE {
        Err(MemoryError::write_failed(
            address,
            format!("WriteProcessMemory failed: {}", ErrorCode::last_error()),
        ))
    } else {
        Ok(bytes_written)
    }
}

/// Safe wrapper for GetExitCodeProcess
///
/// # Safety
/// The handle must be a valid process handle with query access
pub unsafe fn get_exit_code_process(handle: HANDLE) -> MemoryResult<u32> {
    let mut code: DWORD = 0;
    if GetExitCodeProcess(handle, &mut code) == FALSE {
        return Err(MemoryError::WindowsApi(format!(
            "GetExitCodeProcess failed: {}",
            ErrorCode::last_error()
        )));
    }
    Ok(code)
}
