//! Error types for process memory operations

use std::fmt;
use thiserror::Error;

/// Main error type for attach, parse, resolve and access operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Failed to attach to process {pid}: {reason}")]
    AttachFailed { pid: u32, reason: String },

    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Access denied to process {pid}: {reason}")]
    AccessDenied { pid: u32, reason: String },

    #[error("Malformed code '{code}': {reason}")]
    MalformedCode { code: String, reason: String },

    #[error("Failed to read memory at {address}: {reason}")]
    ReadFailed { address: String, reason: String },

    #[error("Failed to write memory at {address}: {reason}")]
    WriteFailed { address: String, reason: String },

    #[error("Pointer chain broken at level {level}: {reason}")]
    PointerChainBroken { level: usize, reason: String },

    #[error("Unsupported value type: {0}")]
    UnsupportedType(String),

    #[error("Invalid {kind} value '{value}': {reason}")]
    InvalidValue {
        kind: String,
        value: String,
        reason: String,
    },

    #[error("Invalid pointer width {0}: must be between 1 and 8 bytes")]
    InvalidPointerWidth(usize),

    #[error("Invalid {what} {length}: must be between 1 and {max} bytes")]
    InvalidLength {
        what: String,
        length: usize,
        max: usize,
    },

    #[error("Buffer too small: expected {expected}, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApiError(#[from] ::windows::core::Error),

    #[error("Windows API: {0}")]
    WindowsApi(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Coarse classification of a [`MemoryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The session could not be established
    Attach,
    /// A code string could not be parsed
    MalformedCode,
    /// The OS refused a read or write, or a chain link could not be followed
    MemoryAccess,
    /// A value type tag was not recognised
    UnsupportedType,
    /// Anything else (bad value text, I/O, configuration of the accessor)
    Other,
}

impl MemoryError {
    /// Creates a new Windows API error with the last error code
    #[cfg(windows)]
    pub fn last_os_error() -> Self {
        MemoryError::WindowsApiError(::windows::core::Error::from_win32())
    }

    /// Creates an attach failure for a process
    pub fn attach_failed(pid: u32, reason: impl Into<String>) -> Self {
        MemoryError::AttachFailed {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates an access denied error for a process
    pub fn access_denied(pid: u32, reason: impl Into<String>) -> Self {
        MemoryError::AccessDenied {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates a malformed code error
    pub fn malformed_code(code: impl Into<String>, reason: impl Into<String>) -> Self {
        MemoryError::MalformedCode {
            code: code.into(),
            reason: reason.into(),
        }
    }

    /// Creates a read failed error
    pub fn read_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        MemoryError::ReadFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a write failed error
    pub fn write_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        MemoryError::WriteFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a pointer chain broken error
    pub fn pointer_chain_broken(level: usize, reason: impl Into<String>) -> Self {
        MemoryError::PointerChainBroken {
            level,
            reason: reason.into(),
        }
    }

    /// Creates an invalid value error
    pub fn invalid_value(
        kind: impl fmt::Display,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        MemoryError::InvalidValue {
            kind: kind.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an out-of-range length error for a read size or window
    pub fn invalid_length(what: impl Into<String>, length: usize, max: usize) -> Self {
        MemoryError::InvalidLength {
            what: what.into(),
            length,
            max,
        }
    }

    /// Creates a buffer too small error
    pub fn buffer_too_small(expected: usize, actual: usize) -> Self {
        MemoryError::BufferTooSmall { expected, actual }
    }

    /// Maps the error onto the attach / code / access / type taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            MemoryError::AttachFailed { .. }
            | MemoryError::ProcessNotFound(_)
            | MemoryError::AccessDenied { .. } => ErrorKind::Attach,
            MemoryError::MalformedCode { .. } => ErrorKind::MalformedCode,
            MemoryError::ReadFailed { .. }
            | MemoryError::WriteFailed { .. }
            | MemoryError::PointerChainBroken { .. }
            | MemoryError::InvalidHandle(_)
            | MemoryError::BufferTooSmall { .. } => ErrorKind::MemoryAccess,
            MemoryError::UnsupportedType(_) => ErrorKind::UnsupportedType,
            _ => ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MemoryError::malformed_code("base+XYZ", "'XYZ' is not a hex offset");
        assert_eq!(
            err.to_string(),
            "Malformed code 'base+XYZ': 'XYZ' is not a hex offset"
        );

        let err = MemoryError::attach_failed(1234, "process has exited");
        assert_eq!(
            err.to_string(),
            "Failed to attach to process 1234: process has exited"
        );
    }

    #[test]
    fn test_all_error_variants() {
        let errors: Vec<(MemoryError, &str)> = vec![
            (
                MemoryError::ProcessNotFound("game".to_string()),
                "Process not found: game",
            ),
            (
                MemoryError::access_denied(999, "denied"),
                "Access denied to process 999: denied",
            ),
            (
                MemoryError::read_failed("0x1000", "page fault"),
                "Failed to read memory at 0x1000: page fault",
            ),
            (
                MemoryError::write_failed("0x2000", "write protected"),
                "Failed to write memory at 0x2000: write protected",
            ),
            (
                MemoryError::pointer_chain_broken(3, "null pointer"),
                "Pointer chain broken at level 3: null pointer",
            ),
            (
                MemoryError::UnsupportedType("double".to_string()),
                "Unsupported value type: double",
            ),
            (
                MemoryError::invalid_value("int", "abc", "invalid digit"),
                "Invalid int value 'abc': invalid digit",
            ),
            (
                MemoryError::InvalidPointerWidth(16),
                "Invalid pointer width 16: must be between 1 and 8 bytes",
            ),
            (
                MemoryError::invalid_length("string window", 0, 4096),
                "Invalid string window 0: must be between 1 and 4096 bytes",
            ),
            (
                MemoryError::buffer_too_small(4, 2),
                "Buffer too small: expected 4, got 2",
            ),
        ];

        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            MemoryError::attach_failed(1, "x").kind(),
            ErrorKind::Attach
        );
        assert_eq!(
            MemoryError::ProcessNotFound("x".into()).kind(),
            ErrorKind::Attach
        );
        assert_eq!(
            MemoryError::malformed_code("", "empty").kind(),
            ErrorKind::MalformedCode
        );
        assert_eq!(
            MemoryError::read_failed("0x0", "x").kind(),
            ErrorKind::MemoryAccess
        );
        assert_eq!(
            MemoryError::pointer_chain_broken(1, "x").kind(),
            ErrorKind::MemoryAccess
        );
        assert_eq!(
            MemoryError::UnsupportedType("x".into()).kind(),
            ErrorKind::UnsupportedType
        );
        assert_eq!(
            MemoryError::InvalidPointerWidth(0).kind(),
            ErrorKind::Other
        );
    }

    #[test]
    fn test_helper_methods() {
        let err = MemoryError::read_failed("0xABCD", "invalid page");
        match err {
            MemoryError::ReadFailed { address, reason } => {
                assert_eq!(address, "0xABCD");
                assert_eq!(reason, "invalid page");
            }
            _ => panic!("Wrong error type"),
        }

        let err = MemoryError::pointer_chain_broken(5, "dereferenced null");
        match err {
            MemoryError::PointerChainBroken { level, reason } => {
                assert_eq!(level, 5);
                assert_eq!(reason, "dereferenced null");
            }
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_from_io_error() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "codes.ini");
        let mem_err: MemoryError = io_err.into();
        assert!(matches!(mem_err, MemoryError::IoError(_)));
        assert_eq!(mem_err.kind(), ErrorKind::Other);
    }
}
