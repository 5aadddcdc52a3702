//! Process lookup by executable name

use crate::core::types::{MemoryError, MemoryResult, ProcessId};
use crate::windows::bindings::ProcessSnapshot;
use crate::windows::utils::module_stem;
use tracing::debug;

/// Finds the first running process whose executable matches `name`.
///
/// The comparison ignores case and an optional `.exe` suffix on either side,
/// so `"game"`, `"Game.exe"` and `"GAME.EXE"` all match `game.exe`.
pub fn find_process_id(name: &str) -> MemoryResult<ProcessId> {
    let wanted = module_stem(name.trim());
    if wanted.is_empty() {
        return Err(MemoryError::ProcessNotFound(name.to_string()));
    }

    let entry = ProcessSnapshot::new()?
        .find(|entry| entry.pid != 0 && module_stem(&entry.name) == wanted)
        .ok_or_else(|| MemoryError::ProcessNotFound(name.to_string()))?;

    debug!(name, pid = entry.pid, "found process");
    Ok(entry.pid)
}
