//! Function registry: entry points and call sites per function name.
//!
//! Entries are kept in registration order (first mention wins), which is the
//! order both header sections are written in.

use cmm_quads::Address;
use indexmap::IndexMap;
use log::debug;

use super::EmitError;

/// Reachable states of a [`FunctionEntry`].
///
/// Only [`FunctionState::Defined`] matters for the header; the others are
/// informational.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionState {
    /// Mentioned, neither called nor defined.
    Declared,
    /// At least one call site recorded, no label yet.
    Called,
    /// Label emitted. Further calls keep this state.
    Defined,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionEntry {
    pub name: String,
    /// Address of the function's label. Set exactly when the function is
    /// defined in this module.
    pub entry: Option<Address>,
    /// Every address a call to this function was emitted at, in call order.
    pub call_sites: Vec<Address>,
    /// Whether a prototype was seen.
    pub declared: bool,
}

impl FunctionEntry {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entry: None,
            call_sites: Vec::new(),
            declared: false,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.entry.is_some()
    }

    pub fn state(&self) -> FunctionState {
        if self.is_defined() {
            FunctionState::Defined
        } else if !self.call_sites.is_empty() {
            FunctionState::Called
        } else {
            FunctionState::Declared
        }
    }
}

#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, FunctionEntry>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prototype of `name`.
    pub fn declare(&mut self, name: &str) -> &FunctionEntry {
        let entry = self.entry_mut(name);
        entry.declared = true;
        entry
    }

    /// Append a call site of `name`.
    pub fn record_call(&mut self, name: &str, address: Address) {
        debug!("call to `{name}` at {address}");
        self.entry_mut(name).call_sites.push(address);
    }

    /// Bind `name` to its entry address.
    pub fn mark_defined(&mut self, name: &str, address: Address) -> Result<(), EmitError> {
        let entry = self.entry_mut(name);
        if let Some(first) = entry.entry {
            return Err(EmitError::DuplicateDefinition {
                name: name.to_string(),
                first,
            });
        }
        debug!("`{name}` defined at {address}");
        entry.entry = Some(address);
        Ok(())
    }

    /// Every recorded call site, defined functions included.
    ///
    /// Functions in registration order, call sites in call order.
    pub fn unresolved_call_sites(&self) -> impl Iterator<Item = (&str, Address)> {
        self.functions.values().flat_map(|entry| {
            entry
                .call_sites
                .iter()
                .map(move |&address| (entry.name.as_str(), address))
        })
    }

    /// Entry address of every defined function, in registration order.
    pub fn defined_entries(&self) -> impl Iterator<Item = (&str, Address)> {
        self.functions
            .values()
            .filter_map(|entry| Some((entry.name.as_str(), entry.entry?)))
    }

    pub fn get(&self, name: &str) -> Option<&FunctionEntry> {
        self.functions.get(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionEntry> {
        self.functions.values()
    }

    fn entry_mut(&mut self, name: &str) -> &mut FunctionEntry {
        self.functions
            .entry(name.to_string())
            .or_insert_with(|| FunctionEntry::new(name))
    }
}
