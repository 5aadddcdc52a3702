//! Module name to base address snapshot for an attached process

use super::Address;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// Information about a loaded module in a process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub name: String,
    pub base_address: Address,
    pub size: usize,
}

impl ModuleInfo {
    /// Creates a new ModuleInfo
    pub fn new(name: String, base_address: Address, size: usize) -> Self {
        ModuleInfo {
            name,
            base_address,
            size,
        }
    }
}

/// Mapping of module name to base address, built once per attach.
///
/// Names are case-sensitive. When the same name is inserted twice the first
/// base address is kept, matching the order in which the OS reports modules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleTable {
    modules: BTreeMap<String, Address>,
}

impl ModuleTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a module unless the name is empty or already present.
    /// Returns `true` when the entry was added.
    pub fn insert(&mut self, name: impl Into<String>, base: Address) -> bool {
        let name = name.into();
        if name.is_empty() {
            return false;
        }
        match self.modules.entry(name) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(base);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Looks up the base address of a module
    pub fn base_of(&self, name: &str) -> Option<Address> {
        self.modules.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates modules in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> {
        self.modules.iter().map(|(name, base)| (name.as_str(), *base))
    }
}

impl FromIterator<ModuleInfo> for ModuleTable {
    fn from_iter<I: IntoIterator<Item = ModuleInfo>>(iter: I) -> Self {
        let mut table = ModuleTable::new();
        for module in iter {
            table.insert(module.name, module.base_address);
        }
        table
    }
}

impl<S: Into<String>> FromIterator<(S, Address)> for ModuleTable {
    fn from_iter<I: IntoIterator<Item = (S, Address)>>(iter: I) -> Self {
        let mut table = ModuleTable::new();
        for (name, base) in iter {
            table.insert(name, base);
        }
        table
    }
}
