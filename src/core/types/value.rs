//! Typed values that can be read from or written to target memory

use super::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A value stored in target memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum MemoryValue {
    Float(f32),
    Int(i32),
    Byte(u8),
    Text(String),
}

impl MemoryValue {
    /// Returns the encoded size in bytes of the value
    pub fn size(&self) -> usize {
        match self {
            MemoryValue::Float(_) | MemoryValue::Int(_) => 4,
            MemoryValue::Byte(_) => 1,
            MemoryValue::Text(s) => s.len(),
        }
    }

    /// Encodes the value; numbers are little-endian, text is UTF-8 without a terminator
    pub fn encode(&self) -> Vec<u8> {
        match self {
            MemoryValue::Float(v) => v.to_le_bytes().to_vec(),
            MemoryValue::Int(v) => v.to_le_bytes().to_vec(),
            MemoryValue::Byte(v) => vec![*v],
            MemoryValue::Text(s) => s.as_bytes().to_vec(),
        }
    }

    /// Decodes a value of the given kind from the start of `bytes`
    pub fn decode(kind: ValueKind, bytes: &[u8]) -> MemoryResult<Self> {
        match kind {
            ValueKind::Float => Ok(MemoryValue::Float(f32::from_le_bytes(fixed(bytes)?))),
            ValueKind::Int => Ok(MemoryValue::Int(i32::from_le_bytes(fixed(bytes)?))),
            ValueKind::Byte => bytes
                .first()
                .map(|&b| MemoryValue::Byte(b))
                .ok_or_else(|| MemoryError::buffer_too_small(1, 0)),
            ValueKind::String => Ok(MemoryValue::Text(
                String::from_utf8_lossy(bytes).into_owned(),
            )),
        }
    }

    /// Parses user supplied text as a value of the given kind
    pub fn parse(kind: ValueKind, text: &str) -> MemoryResult<Self> {
        let trimmed = text.trim();
        match kind {
            ValueKind::Float => trimmed
                .parse::<f32>()
                .map(MemoryValue::Float)
                .map_err(|e| MemoryError::invalid_value(kind, text, e.to_string())),
            ValueKind::Int => trimmed
                .parse::<i32>()
                .map(MemoryValue::Int)
                .map_err(|e| MemoryError::invalid_value(kind, text, e.to_string())),
            ValueKind::Byte => trimmed
                .parse::<u8>()
                .map(MemoryValue::Byte)
                .map_err(|e| MemoryError::invalid_value(kind, text, e.to_string())),
            // text is written as given, including surrounding whitespace
            ValueKind::String => Ok(MemoryValue::Text(text.to_string())),
        }
    }

    /// Gets the kind tag for this value
    pub fn kind(&self) -> ValueKind {
        match self {
            MemoryValue::Float(_) => ValueKind::Float,
            MemoryValue::Int(_) => ValueKind::Int,
            MemoryValue::Byte(_) => ValueKind::Byte,
            MemoryValue::Text(_) => ValueKind::String,
        }
    }
}

fn fixed(bytes: &[u8]) -> MemoryResult<[u8; 4]> {
    bytes
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| MemoryError::buffer_too_small(4, bytes.len()))
}

impl fmt::Display for MemoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryValue::Float(v) => write!(f, "{}", v),
            MemoryValue::Int(v) => write!(f, "{}", v),
            MemoryValue::Byte(v) => write!(f, "{}", v),
            MemoryValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// Type tag of a [`MemoryValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Float,
    Int,
    Byte,
    String,
}

impl ValueKind {
    /// Returns the fixed size in bytes, or `None` for text
    pub fn size(&self) -> Option<usize> {
        match self {
            ValueKind::Float | ValueKind::Int => Some(4),
            ValueKind::Byte => Some(1),
            ValueKind::String => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Float => "float",
            ValueKind::Int => "int",
            ValueKind::Byte => "byte",
            ValueKind::String => "string",
        }
    }
}

impl FromStr for ValueKind {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "float" | "f32" => Ok(ValueKind::Float),
            "int" | "i32" => Ok(ValueKind::Int),
            "byte" | "u8" => Ok(ValueKind::Byte),
            "string" | "text" => Ok(ValueKind::String),
            _ => Err(MemoryError::UnsupportedType(s.to_string())),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
