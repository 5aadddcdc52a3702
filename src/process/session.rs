//! Attached-process session tying codes, modules and memory together
//!
//! A [`Session`] owns a memory backend plus the module table captured when it
//! was created. Every operation takes a code name, looks it up in the
//! optional code book, parses it, resolves it against the module table and
//! then touches memory. Nothing is cached between calls.

use crate::code::{self, load_code, AddressSpec, CodeBook};
use crate::core::types::{
    Address, MemoryError, MemoryResult, MemoryValue, ModuleTable, ValueKind,
};
use crate::memory::{MemoryAccess, MemoryReader, MemoryWriter, DEFAULT_STRING_WINDOW};
use crate::resolver::{self, ResolveOptions, DEFAULT_POINTER_WIDTH};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Upper bound for the string window
pub const MAX_STRING_WINDOW: usize = 4096;

/// Upper bound for a single raw read
pub const MAX_READ_LENGTH: usize = 0x10000;

/// Tunables applied to every access made through a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessOptions {
    /// Width in bytes of pointers followed in a chain
    pub pointer_width: usize,
    /// Bytes read for a string value
    pub string_window: usize,
    /// Fail on an unreadable chain link instead of continuing with null
    pub strict: bool,
}

impl Default for AccessOptions {
    fn default() -> Self {
        AccessOptions {
            pointer_width: DEFAULT_POINTER_WIDTH,
            string_window: DEFAULT_STRING_WINDOW,
            strict: false,
        }
    }
}

impl AccessOptions {
    pub fn validate(&self) -> MemoryResult<()> {
        self.resolve_options()?;
        if self.string_window == 0 || self.string_window > MAX_STRING_WINDOW {
            return Err(MemoryError::invalid_length(
                "string window",
                self.string_window,
                MAX_STRING_WINDOW,
            ));
        }
        Ok(())
    }

    pub fn resolve_options(&self) -> MemoryResult<ResolveOptions> {
        ResolveOptions::new(self.pointer_width)
    }
}

/// Session over any memory backend
pub struct Session<M: MemoryAccess> {
    memory: M,
    modules: ModuleTable,
    main_base: Address,
    codes: Option<CodeBook>,
    options: AccessOptions,
    resolve: ResolveOptions,
}

impl<M: MemoryAccess> Session<M> {
    /// Builds a session from an already prepared backend and module table
    pub fn from_parts(memory: M, modules: ModuleTable, main_base: Address) -> Self {
        Session {
            memory,
            modules,
            main_base,
            codes: None,
            options: AccessOptions::default(),
            resolve: ResolveOptions::default(),
        }
    }

    /// Routes code names through `codes` instead of treating them literally
    pub fn with_codes(mut self, codes: CodeBook) -> Self {
        self.codes = Some(codes);
        self
    }

    pub fn with_options(mut self, options: AccessOptions) -> MemoryResult<Self> {
        options.validate()?;
        self.resolve = options.resolve_options()?;
        self.options = options;
        Ok(self)
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn modules(&self) -> &ModuleTable {
        &self.modules
    }

    pub fn main_base(&self) -> Address {
        self.main_base
    }

    pub fn codes(&self) -> Option<&CodeBook> {
        self.codes.as_ref()
    }

    pub fn options(&self) -> AccessOptions {
        self.options
    }

    /// Replaces the module table and main base, e.g. after the target loaded
    /// another module
    pub fn set_modules(&mut self, modules: ModuleTable, main_base: Address) {
        self.modules = modules;
        self.main_base = main_base;
    }

    /// Pointer path stored under `name`, or `name` itself without a book
    pub fn load_code<'a>(&'a self, name: &'a str) -> &'a str {
        load_code(name, self.codes.as_ref())
    }

    /// Looks up and parses the code named `name`
    pub fn parse_code(&self, name: &str) -> MemoryResult<AddressSpec> {
        code::parse(self.load_code(name), &self.modules)
    }

    /// Resolves `name` using the session's strictness setting
    pub fn address_of(&self, name: &str) -> MemoryResult<Address> {
        if self.options.strict {
            return self.address_of_strict(name);
        }
        let spec = self.parse_code(name)?;
        Ok(resolver::resolve(
            &spec,
            &self.modules,
            self.main_base,
            &self.memory,
            self.resolve,
        ))
    }

    /// Resolves `name`, failing on the first unreadable chain link
    pub fn address_of_strict(&self, name: &str) -> MemoryResult<Address> {
        let spec = self.parse_code(name)?;
        resolver::resolve_strict(
            &spec,
            &self.modules,
            self.main_base,
            &self.memory,
            self.resolve,
        )
    }

    /// Reads a typed value at the address named by `name`
    pub fn read_value(&self, name: &str, kind: ValueKind) -> MemoryResult<MemoryValue> {
        let address = self.address_of(name)?;
        self.reader().read_value(address, kind)
    }

    /// Reads a string at the address named by `name`.
    ///
    /// Never fails: a malformed code, a broken chain or an unreadable window
    /// all produce `""`.
    pub fn read_string(&self, name: &str) -> String {
        match self.address_of(name) {
            Ok(address) => self.reader().read_string(address),
            Err(e) => {
                warn!(code = name, error = %e, "cannot resolve string code, returning empty string");
                String::new()
            }
        }
    }

    pub fn read_string_strict(&self, name: &str) -> MemoryResult<String> {
        let address = self.address_of(name)?;
        self.reader().read_string_strict(address)
    }

    /// Reads `len` raw bytes at the address named by `name`
    pub fn read_bytes(&self, name: &str, len: usize) -> MemoryResult<Vec<u8>> {
        if len == 0 || len > MAX_READ_LENGTH {
            return Err(MemoryError::invalid_length("read length", len, MAX_READ_LENGTH));
        }
        let address = self.address_of(name)?;
        self.reader().read_raw(address, len)
    }

    /// Writes `value` parsed as `tag` at the address named by `name`.
    ///
    /// The tag is checked before the code is resolved, so an unsupported type
    /// never touches memory. `Ok(false)` means the OS write failed.
    pub fn write(&self, name: &str, tag: &str, value: &str) -> MemoryResult<bool> {
        let kind: ValueKind = tag.parse()?;
        let address = self.address_of(name)?;
        debug!(code = name, %address, %kind, value, "writing");
        MemoryWriter::new(&self.memory).write_text(address, kind.as_str(), value)
    }

    /// Writes an already typed value at the address named by `name`
    pub fn write_value(&self, name: &str, value: &MemoryValue) -> MemoryResult<bool> {
        let address = self.address_of(name)?;
        Ok(MemoryWriter::new(&self.memory).write_value(address, value))
    }

    /// Releases the backend and drops the module table
    pub fn detach(mut self) -> MemoryResult<()> {
        self.modules = ModuleTable::new();
        self.memory.release()?;
        info!(main_base = %self.main_base, "detached");
        Ok(())
    }

    fn reader(&self) -> MemoryReader<'_, M> {
        MemoryReader::new(&self.memory).with_string_window(self.options.string_window)
    }
}

#[cfg(windows)]
mod live {
    use super::*;
    use crate::core::types::ProcessId;
    use crate::process::{find_process_id, ModuleEnumerator, ModuleSnapshot, ProcessHandle};

    /// Session attached to a live process
    pub type ProcessSession = Session<ProcessHandle>;

    impl Session<ProcessHandle> {
        /// Opens `pid` for reading and writing and captures its module table.
        ///
        /// Fails for pid 0, when the process cannot be opened, when it has
        /// already exited and when its main window is not responding. Nothing
        /// is kept open on failure.
        pub fn attach(pid: ProcessId) -> MemoryResult<Self> {
            let handle = ProcessHandle::open_for_read_write(pid)?;
            check_attachable(pid, handle.is_running()?, handle.is_responding())?;

            let ModuleSnapshot {
                table,
                main_base,
                main_name,
            } = ModuleEnumerator::new(&handle).snapshot()?;

            info!(pid, main = %main_name, %main_base, modules = table.len(), "attached");
            Ok(Session::from_parts(handle, table, main_base))
        }

        /// Attaches to the first process whose executable matches `name`
        pub fn attach_by_name(name: &str) -> MemoryResult<Self> {
            Self::attach(find_process_id(name)?)
        }

        pub fn pid(&self) -> ProcessId {
            self.memory.pid()
        }

        /// Whether the target is still running
        pub fn is_running(&self) -> bool {
            self.memory.is_running().unwrap_or(false)
        }

        /// Re-enumerates the target's modules
        pub fn refresh_modules(&mut self) -> MemoryResult<()> {
            let snapshot = ModuleEnumerator::new(&self.memory).snapshot()?;
            debug!(pid = self.pid(), modules = snapshot.table.len(), "refreshed modules");
            self.set_modules(snapshot.table, snapshot.main_base);
            Ok(())
        }
    }

    fn check_attachable(
        pid: ProcessId,
        running: bool,
        responding: bool,
    ) -> MemoryResult<()> {
        if !running {
            return Err(MemoryError::attach_failed(pid, "process has exited"));
        }
        if !responding {
            return Err(MemoryError::attach_failed(pid, "process is not responding"));
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_exited_or_hung_targets_are_rejected() {
            assert!(check_attachable(42, true, true).is_ok());

            let err = check_attachable(42, false, true).unwrap_err();
            assert!(err.to_string().contains("exited"));

            let err = check_attachable(42, true, false).unwrap_err();
            assert!(matches!(err, MemoryError::AttachFailed { pid: 42, .. }));
            assert!(err.to_string().contains("not responding"));
        }
    }
}

#[cfg(windows)]
pub use live::ProcessSession;
