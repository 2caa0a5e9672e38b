//! Module header construction.

use std::collections::HashSet;

use cmm_quads::{Addressing, LinkEntry, ModuleHeader};

use super::{CallSiteRepair, EmitError, FunctionRegistry, InstructionBuffer};

/// Builds the linking header from a registry and a finalized buffer.
///
/// Every call site is checked against the frozen quads (with bounded forward
/// repair) and every entry point must hold its function's label. Call sites
/// and placeholder calls must match one to one. Addresses are written in the
/// configured [`Addressing`].
pub struct ModuleHeaderBuilder<'a> {
    registry: &'a FunctionRegistry,
    buffer: &'a InstructionBuffer,
    addressing: Addressing,
    repair: CallSiteRepair,
}

impl<'a> ModuleHeaderBuilder<'a> {
    pub fn new(
        registry: &'a FunctionRegistry,
        buffer: &'a InstructionBuffer,
        addressing: Addressing,
    ) -> Self {
        Self {
            registry,
            buffer,
            addressing,
            repair: CallSiteRepair::default(),
        }
    }

    pub fn with_repair(mut self, repair: CallSiteRepair) -> Self {
        self.repair = repair;
        self
    }

    pub fn build(&self) -> Result<ModuleHeader, EmitError> {
        if !self.buffer.is_finalized() {
            return Err(EmitError::NotFinalized);
        }
        let quads = self.buffer.quads();

        let mut header = ModuleHeader::new();
        let mut covered = HashSet::new();

        for (name, recorded) in self.registry.unresolved_call_sites() {
            let outcome = self.repair.resolve(quads, name, recorded)?;
            if !covered.insert(outcome.address()) {
                return Err(EmitError::AddressConsistencyFault {
                    name: name.to_string(),
                    recorded,
                });
            }
            let address = self.addressing.to_header(outcome.address());
            header.unimplemented.push(LinkEntry::new(name, address));
        }

        for (name, entry) in self.registry.defined_entries() {
            let holds_label = self
                .buffer
                .get(entry)
                .and_then(|quad| quad.label_name())
                .is_some_and(|label| label == name);
            if !holds_label {
                return Err(EmitError::EntryMismatch {
                    name: name.to_string(),
                    entry,
                });
            }
            let address = self.addressing.to_header(entry);
            header.implemented.push(LinkEntry::new(name, address));
        }

        let unrecorded = self.buffer.iter().find_map(|(address, quad)| {
            let target = quad.placeholder_target()?;
            (!covered.contains(&address)).then_some((address, target))
        });
        if let Some((address, target)) = unrecorded {
            return Err(EmitError::UnrecordedCall {
                target: target.to_string(),
                address,
            });
        }

        Ok(header)
    }
}
