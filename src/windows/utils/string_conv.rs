//! UTF-16 conversions for Windows API strings

use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;

/// Converts a UTF-16 buffer to a `String`, stopping at the first NUL
pub fn wide_to_string(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    OsString::from_wide(&wide[..len])
        .to_string_lossy()
        .into_owned()
}

/// Executable name without its `.exe` extension, compared case-insensitively
pub fn module_stem(name: &str) -> String {
    let lower = name.to_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}
