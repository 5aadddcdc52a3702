//! Parser for textual pointer paths such as `game.exe+1A` or `base+10,4,8`

use crate::core::types::{MemoryError, MemoryResult, ModuleTable, Offset};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Substrings that force main-module-relative resolution anywhere in a code
const MAIN_MARKERS: [&str; 2] = ["base", "main"];

/// Token separators; `,` is accepted as an alternate offset separator
const SEPARATORS: [char; 2] = ['+', ','];

/// Where the first offset of a code is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseSelector {
    /// Base address of the target's main executable module
    MainModule,
    /// Base address of a named module from the module table
    Module(String),
    /// No module; the first offset is an absolute address
    Absolute,
}

/// A parsed code: base selector plus a non-empty, ordered offset chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSpec {
    base: BaseSelector,
    offsets: Vec<Offset>,
}

impl AddressSpec {
    /// Builds a spec directly. Fails when `offsets` is empty.
    pub fn new(base: BaseSelector, offsets: Vec<Offset>) -> MemoryResult<Self> {
        if offsets.is_empty() {
            return Err(MemoryError::malformed_code(
                base.to_string(),
                "no offsets",
            ));
        }
        Ok(AddressSpec { base, offsets })
    }

    pub fn base(&self) -> &BaseSelector {
        &self.base
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    /// True when resolving this spec dereferences at least one pointer
    pub fn is_chain(&self) -> bool {
        self.offsets.len() > 1
    }
}

impl fmt::Display for BaseSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseSelector::MainModule => write!(f, "base"),
            BaseSelector::Module(name) => write!(f, "{}", name),
            BaseSelector::Absolute => Ok(()),
        }
    }
}

impl fmt::Display for AddressSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offsets: Vec<String> = self.offsets.iter().map(|o| format_offset(*o)).collect();
        match self.base {
            BaseSelector::Absolute => write!(f, "{}", offsets.join(",")),
            _ => write!(f, "{}+{}", self.base, offsets.join(",")),
        }
    }
}

fn format_offset(offset: Offset) -> String {
    if offset < 0 {
        format!("-{:X}", offset.unsigned_abs())
    } else {
        format!("{:X}", offset)
    }
}

/// Parses a code string against the modules known for the current session.
///
/// The base selector is decided in this order: a `base`/`main` substring
/// anywhere in the code, then an exact module name as the first token, then a
/// hex first token (absolute, offsets start at that token). Any other first
/// token is an unknown module name and falls back to absolute addressing.
pub fn parse(code: &str, modules: &ModuleTable) -> MemoryResult<AddressSpec> {
    let tokens: Vec<&str> = code
        .split(&SEPARATORS[..])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    let Some(first) = tokens.first().copied() else {
        return Err(MemoryError::malformed_code(code, "empty code"));
    };

    let (base, rest) = if MAIN_MARKERS.iter().any(|m| code.contains(m)) {
        (BaseSelector::MainModule, &tokens[1..])
    } else if modules.contains(first) {
        (BaseSelector::Module(first.to_string()), &tokens[1..])
    } else if is_hex_token(first) {
        (BaseSelector::Absolute, &tokens[..])
    } else {
        debug!(code, module = first, "unknown module, using absolute addressing");
        (BaseSelector::Absolute, &tokens[1..])
    };

    let offsets = rest
        .iter()
        .map(|token| {
            parse_offset(token).map_err(|reason| MemoryError::malformed_code(code, reason))
        })
        .collect::<MemoryResult<Vec<_>>>()?;

    if offsets.is_empty() {
        return Err(MemoryError::malformed_code(code, "no offsets"));
    }

    Ok(AddressSpec { base, offsets })
}

/// Longest token read as a 32-bit two's-complement value
const SHORT_OFFSET_DIGITS: usize = 8;

fn split_sign_and_prefix(token: &str) -> (bool, &str) {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    (negative, digits)
}

fn is_hex_token(token: &str) -> bool {
    let (_, digits) = split_sign_and_prefix(token);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Strict hexadecimal offset: optional `-`, optional `0x`, then hex digits only.
///
/// Up to eight digits are a 32-bit two's-complement value, so `FFFFFFF8` is
/// -8. Longer tokens are read as a 64-bit signed value.
pub fn parse_offset(token: &str) -> Result<Offset, String> {
    if !is_hex_token(token) {
        return Err(format!("'{}' is not a hex offset", token));
    }
    let (negative, digits) = split_sign_and_prefix(token);

    let out_of_range = || format!("'{}' is out of range for an offset", token);
    let significant = digits.trim_start_matches('0');
    let value = if significant.is_empty() {
        0
    } else if digits.len() <= SHORT_OFFSET_DIGITS {
        u32::from_str_radix(significant, 16).map_err(|_| out_of_range())? as i32 as i64
    } else {
        i64::from_str_radix(significant, 16).map_err(|_| out_of_range())?
    };

    Ok(if negative { -value } else { value })
}
