//! Module enumeration for an open process

use crate::core::types::{Address, MemoryError, MemoryResult, ModuleInfo, ModuleTable};
use crate::process::ProcessHandle;
use crate::windows::bindings::psapi;
use tracing::{debug, warn};

/// Modules of a process together with the main module's base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSnapshot {
    pub table: ModuleTable,
    pub main_base: Address,
    pub main_name: String,
}

/// Enumerates modules loaded in a process
pub struct ModuleEnumerator<'a> {
    handle: &'a ProcessHandle,
}

impl<'a> ModuleEnumerator<'a> {
    pub fn new(handle: &'a ProcessHandle) -> Self {
        ModuleEnumerator { handle }
    }

    /// Lists modules in the order the OS reports them; the executable comes
    /// first. Modules whose name or information cannot be read are skipped.
    pub fn enumerate(&self) -> MemoryResult<Vec<ModuleInfo>> {
        let raw = unsafe { self.handle.raw() };
        let modules = unsafe { psapi::enum_process_modules(raw)? };

        let mut infos = Vec::with_capacity(modules.len());
        for module in modules {
            let info = unsafe {
                psapi::get_module_base_name(raw, module).and_then(|name| {
                    psapi::get_module_information(raw, module).map(|mi| {
                        ModuleInfo::new(
                            name,
                            Address::new(mi.lpBaseOfDll as usize),
                            mi.SizeOfImage as usize,
                        )
                    })
                })
            };
            match info {
                Ok(info) => infos.push(info),
                Err(e) => warn!(pid = self.handle.pid(), error = %e, "skipping unreadable module"),
            }
        }

        Ok(infos)
    }

    /// Builds the module table and locates the main module
    pub fn snapshot(&self) -> MemoryResult<ModuleSnapshot> {
        let modules = self.enumerate()?;
        let main = modules.first().cloned().ok_or_else(|| {
            MemoryError::attach_failed(self.handle.pid(), "process reports no modules")
        })?;

        let table: ModuleTable = modules.into_iter().collect();
        debug!(
            pid = self.handle.pid(),
            modules = table.len(),
            main = %main.name,
            main_base = %main.base_address,
            "loaded module table"
        );

        Ok(ModuleSnapshot {
            table,
            main_base: main.base_address,
            main_name: main.name,
        })
    }
}
