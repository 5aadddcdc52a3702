//! PSAPI.dll bindings for module enumeration

use crate::core::types::{MemoryError, MemoryResult};
use crate::windows::utils::{wide_to_string, ErrorCode};
use std::{mem, ptr};
use winapi::shared::minwindef::{DWORD, FALSE, HMODULE, MAX_PATH};
use winapi::um::psapi::{EnumProcessModules, GetModuleBaseNameW, GetModuleInformation, MODULEINFO};
use winapi::um::winnt::HANDLE;

/// Safe wrapper for EnumProcessModules. The first entry is the executable.
///
/// # Safety
/// The handle must be a valid process handle with query and read access
pub unsafe fn enum_process_modules(handle: HANDLE) -> MemoryResult<Vec<HMODULE>> {
    let mut modules: Vec<HMODULE> = vec![ptr::null_mut(); 1024];

    loop {
        let mut bytes_needed: DWORD = 0;
        let result = EnumProcessModules(
            handle,
            modules.as_mut_ptr(),
            (modules.len() * mem::size_of::<HMODULE>()) as DWORD,
            &mut bytes_needed,
        );

        if result == FALSE {
            return Err(MemoryError::WindowsApi(format!(
                "EnumProcessModules failed: {}",
                ErrorCode::last_error()
            )));
        }

        let count = bytes_needed as usize / mem::size_of::<HMODULE>();
        if count <= modules.len() {
            modules.truncate(count);
            return Ok(modules);
        }
        modules.resize(count, ptr::null_mut());
    }
}

/// Safe wrapper for GetModuleInformation
///
/// # Safety
/// The handle must be a valid process handle and module must be loaded in it
pub unsafe fn get_module_information(handle: HANDLE, module: HMODULE) -> MemoryResult<MODULEINFO> {
    let mut info: MODULEINFO = mem::zeroed();

    let result = GetModuleInformation(
        handle,
        module,
        &mut info,
        mem::size_of::<MODULEINFO>() as DWORD,
    );

    if result == FALSE {
        return Err(MemoryError::WindowsApi(format!(
            "GetModuleInformation failed: {}",
            ErrorCode::last_error()
        )));
    }

    Ok(info)
}

/// Safe wrapper for GetModuleBaseNameW
///
/// # Safety
/// The handle must be a valid process handle and module must be loaded in it
pub unsafe fn get_module_base_name(handle: HANDLE, module: HMODULE) -> MemoryResult<String> {
    let mut buffer = [0u16; MAX_PATH];

    let length = GetModuleBaseNameW(handle, module, buffer.as_mut_ptr(), MAX_PATH as DWORD);
    if length == 0 {
        return Err(MemoryError::WindowsApi(format!(
            "GetModuleBaseNameW failed: {}",
            ErrorCode::last_error()
        )));
    }

    Ok(wide_to_string(&buffer[..length as usize]))
}
