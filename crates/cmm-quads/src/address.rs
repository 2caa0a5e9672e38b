//! Stream addresses and the header-offset convention.
//!
//! A module is written as a four-line header followed by the instruction
//! stream. The numbers in the header can either count stream lines only, or
//! count lines of the whole file. Both the writer and the reader of a module
//! must agree on the [`Addressing`] in use; the header itself does not say.

use std::fmt;
use std::str::FromStr;

/// Number of lines the module header occupies: `<header>`, the two
/// section lines, and `</header>`.
pub const HEADER_LINES: u32 = 4;

/// 1-based position of a quad in the instruction stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(u32);

impl Address {
    /// Address of the first emitted quad.
    pub const FIRST: Address = Address(1);

    /// Returns `None` for zero, which is never a valid address.
    pub fn new(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    /// Address of the quad stored at the given zero-based index.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based index into a quad list.
    #[inline]
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }

    #[inline]
    pub fn forward(self, distance: u32) -> Self {
        Self(self.0 + distance)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How addresses are numbered in a module header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Addressing {
    /// Raw stream positions; the header lines are not counted.
    Stream,
    /// Line numbers within the whole artifact file (stream position + [`HEADER_LINES`]).
    #[default]
    File,
}

impl Addressing {
    /// Value added to a stream address when it is written to the header.
    pub fn offset(self) -> u32 {
        match self {
            Addressing::Stream => 0,
            Addressing::File => HEADER_LINES,
        }
    }

    /// Number written to the header for a stream address.
    pub fn to_header(self, address: Address) -> u32 {
        address.get() + self.offset()
    }

    /// Stream address for a header number.
    ///
    /// Returns `None` when the number falls inside the header itself.
    pub fn from_header(self, value: u32) -> Option<Address> {
        value.checked_sub(self.offset()).and_then(Address::new)
    }

    pub fn name(self) -> &'static str {
        match self {
            Addressing::Stream => "stream",
            Addressing::File => "file",
        }
    }
}

impl fmt::Display for Addressing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Addressing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stream" => Ok(Addressing::Stream),
            "file" => Ok(Addressing::File),
            other => Err(format!(
                "unknown addressing `{other}` (expected `stream` or `file`)"
            )),
        }
    }
}
