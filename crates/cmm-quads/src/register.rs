//! Integer registers of the target machine.

use std::fmt;

/// An integer register, printed as `I<n>`.
///
/// The low registers have fixed roles in the calling convention; everything
/// from [`Register::FIRST_TEMP`] upwards is free for temporaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register(u32);

impl Register {
    /// Written by `JLINK`, read by `RETRN`.
    pub const RETURN_ADDRESS: Register = Register(0);
    pub const FRAME: Register = Register(1);
    pub const STACK: Register = Register(2);
    /// Holds a function's return value across `RETRN`.
    pub const RESULT: Register = Register(3);
    pub const FIRST_TEMP: Register = Register(4);

    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I{}", self.0)
    }
}
