//! Code strings: parsing pointer paths and resolving code aliases
//!
//! A code is text such as `game.exe+1A` or `base+10,4,8`. The parser turns it
//! into an [`AddressSpec`]; a [`CodeBook`] optionally maps friendly names to
//! codes first.

pub mod book;
pub mod parser;

pub use book::{load_code, CodeBook, CODES_SECTION};
pub use parser::{parse, parse_offset, AddressSpec, BaseSelector};
