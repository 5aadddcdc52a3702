//! Windows error code classification

use std::fmt;
use winapi::um::errhandlingapi::GetLastError;

/// Error codes the process layer distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    AccessDenied,
    InvalidParameter,
    Unknown(u32),
}

impl From<u32> for ErrorCode {
    fn from(code: u32) -> Self {
        match code {
            5 => ErrorCode::AccessDenied,
            87 => ErrorCode::InvalidParameter,
            _ => ErrorCode::Unknown(code),
        }
    }
}

impl ErrorCode {
    /// Reads the calling thread's last error
    pub fn last_error() -> Self {
        unsafe { ErrorCode::from(GetLastError()) }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::AccessDenied => write!(f, "access denied (5)"),
            ErrorCode::InvalidParameter => write!(f, "invalid parameter (87)"),
            ErrorCode::Unknown(code) => write!(f, "error {}", code),
        }
    }
}
