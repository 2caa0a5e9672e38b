//! Bounded forward repair of recorded call-site addresses.
//!
//! A call site is expected to hold a placeholder call to its function. When
//! the recorded address is early by at most `max_forward` quads the address is
//! corrected and a warning is logged; anything else is a fault.

use cmm_quads::{Address, Quad};
use log::warn;

use super::EmitError;

/// Forward distance repaired by default.
pub const DEFAULT_MAX_FORWARD: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepairOutcome {
    /// The recorded address holds the call.
    Exact(Address),
    /// The call was found `actual - recorded` quads later.
    Shifted { recorded: Address, actual: Address },
}

impl RepairOutcome {
    /// Address to write to the header.
    pub fn address(self) -> Address {
        match self {
            RepairOutcome::Exact(address) => address,
            RepairOutcome::Shifted { actual, .. } => actual,
        }
    }

    pub fn is_shifted(self) -> bool {
        matches!(self, RepairOutcome::Shifted { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallSiteRepair {
    max_forward: u32,
}

impl Default for CallSiteRepair {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FORWARD)
    }
}

impl CallSiteRepair {
    pub fn new(max_forward: u32) -> Self {
        Self { max_forward }
    }

    /// Repair that only accepts exact addresses.
    pub fn strict() -> Self {
        Self::new(0)
    }

    /// Locate the placeholder call to `name` recorded at `recorded`.
    pub fn resolve(
        self,
        quads: &[Quad],
        name: &str,
        recorded: Address,
    ) -> Result<RepairOutcome, EmitError> {
        let holds_call = |address: Address| {
            quads
                .get(address.index())
                .is_some_and(|quad| quad.is_placeholder_for(name))
        };

        if holds_call(recorded) {
            return Ok(RepairOutcome::Exact(recorded));
        }

        for distance in 1..=self.max_forward {
            let actual = recorded.forward(distance);
            if holds_call(actual) {
                warn!("call site of `{name}` recorded at {recorded}, found at {actual}");
                return Ok(RepairOutcome::Shifted { recorded, actual });
            }
        }

        Err(EmitError::AddressConsistencyFault {
            name: name.to_string(),
            recorded,
        })
    }
}
