//! Address resolution for parsed codes
//!
//! A single offset is added to the base without touching memory. A chain
//! follows `[[base + o0] + o1] ... + oN`: every intermediate address is
//! dereferenced as a little-endian pointer of `pointer_width` bytes, and the
//! last offset is added but not dereferenced.
//!
//! [`resolve`] is permissive: a link that cannot be read counts as a null
//! pointer and the walk carries on, so a polling caller always gets an
//! address back. [`resolve_strict`] stops at the first unreadable link.

use crate::code::{AddressSpec, BaseSelector};
use crate::core::types::{Address, MemoryError, MemoryResult, ModuleTable};
use crate::memory::{MemoryAccess, MemoryReader};
use tracing::{debug, warn};

/// Width of intermediate pointers when none is configured
pub const DEFAULT_POINTER_WIDTH: usize = 4;

/// Parameters of a chain walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    pointer_width: usize,
}

impl ResolveOptions {
    /// Creates options with the given pointer width (1 to 8 bytes)
    pub fn new(pointer_width: usize) -> MemoryResult<Self> {
        if pointer_width == 0 || pointer_width > 8 {
            return Err(MemoryError::InvalidPointerWidth(pointer_width));
        }
        Ok(ResolveOptions { pointer_width })
    }

    pub fn pointer_width(&self) -> usize {
        self.pointer_width
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            pointer_width: DEFAULT_POINTER_WIDTH,
        }
    }
}

/// Base address selected by `spec`. A named module missing from the table
/// resolves to 0.
pub fn base_address(spec: &AddressSpec, modules: &ModuleTable, main_base: Address) -> Address {
    match spec.base() {
        BaseSelector::MainModule => main_base,
        BaseSelector::Module(name) => modules.base_of(name).unwrap_or_else(|| {
            warn!(module = %name, "module is no longer in the table, using base 0");
            Address::null()
        }),
        BaseSelector::Absolute => Address::null(),
    }
}

/// Resolves `spec`, treating unreadable chain links as null pointers
pub fn resolve<M: MemoryAccess + ?Sized>(
    spec: &AddressSpec,
    modules: &ModuleTable,
    main_base: Address,
    memory: &M,
    options: ResolveOptions,
) -> Address {
    walk(spec, modules, main_base, memory, options, |level, address, error| {
        warn!(
            level,
            %address,
            error = %error,
            "pointer read failed, continuing with null"
        );
        Ok(Address::null())
    })
    .unwrap_or_else(|_| Address::null())
}

/// Resolves `spec`, failing with `PointerChainBroken` at the first
/// unreadable link
pub fn resolve_strict<M: MemoryAccess + ?Sized>(
    spec: &AddressSpec,
    modules: &ModuleTable,
    main_base: Address,
    memory: &M,
    options: ResolveOptions,
) -> MemoryResult<Address> {
    walk(spec, modules, main_base, memory, options, |level, _, error| {
        Err(MemoryError::pointer_chain_broken(level, error.to_string()))
    })
}

/// A literal first token is an address, not a displacement. Short literals
/// parse as 32-bit signed, so a negative one is read back as its unsigned
/// 32-bit address.
fn absolute_start(literal: i64) -> Address {
    if (i32::MIN as i64..0).contains(&literal) {
        Address::new(literal as i32 as u32 as usize)
    } else {
        Address::null().offset(literal)
    }
}

/// Walks the chain; `on_failure` decides what a failed dereference becomes.
/// Levels are numbered from 1 for the first dereference.
fn walk<M, F>(
    spec: &AddressSpec,
    modules: &ModuleTable,
    main_base: Address,
    memory: &M,
    options: ResolveOptions,
    mut on_failure: F,
) -> MemoryResult<Address>
where
    M: MemoryAccess + ?Sized,
    F: FnMut(usize, Address, MemoryError) -> MemoryResult<Address>,
{
    let reader = MemoryReader::new(memory);
    let offsets = spec.offsets();

    let mut address = match spec.base() {
        BaseSelector::Absolute => absolute_start(offsets[0]),
        _ => base_address(spec, modules, main_base).offset(offsets[0]),
    };
    debug!(%spec, start = %address, "resolving");

    for (level, &offset) in offsets.iter().enumerate().skip(1) {
        let pointer = match reader.read_pointer(address, options.pointer_width) {
            Ok(pointer) => pointer,
            Err(e) => on_failure(level, address, e)?,
        };
        address = pointer.offset(offset);
        debug!(level, %pointer, next = %address, "followed pointer");
    }

    Ok(address)
}
