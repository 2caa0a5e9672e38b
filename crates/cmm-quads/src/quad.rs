//! Quad instructions.
//!
//! The compiler works with [`Quad`] values and turns them into text only when
//! the stream is finalized. Linker-side code that only has the text uses
//! [`StreamLine`] to classify lines.

use std::fmt;

/// Operand of a `JLINK` whose target is not known in this module.
pub const UNRESOLVED_TARGET: &str = "-1";

/// Mnemonic of the pseudo-instruction marking a function entry.
pub const LABEL_MNEMONIC: &str = "LABEL";

/// Machine operations emitted by the compiler.
///
/// Arithmetic operands are registers or integer immediates; memory operands
/// are a base register plus an immediate offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `COPYI dst src`
    CopyI,
    /// `ADD2I dst lhs rhs`
    Add2I,
    /// `SUBTI dst lhs rhs`
    SubtI,
    /// `MULTI dst lhs rhs`
    MultI,
    /// `DIVDI dst lhs rhs`
    DivdI,
    /// `LOADI dst base offset`
    LoadI,
    /// `STORI src base offset`
    StorI,
    /// `PRNTI src`
    PrntI,
    /// `READI dst`
    ReadI,
    /// `JLINK target` - jump and store the return address in `I0`.
    JLink,
    /// `RETRN` - jump to the address in `I0`.
    Retrn,
}

impl Opcode {
    pub const ALL: [Opcode; 11] = [
        Opcode::CopyI,
        Opcode::Add2I,
        Opcode::SubtI,
        Opcode::MultI,
        Opcode::DivdI,
        Opcode::LoadI,
        Opcode::StorI,
        Opcode::PrntI,
        Opcode::ReadI,
        Opcode::JLink,
        Opcode::Retrn,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::CopyI => "COPYI",
            Opcode::Add2I => "ADD2I",
            Opcode::SubtI => "SUBTI",
            Opcode::MultI => "MULTI",
            Opcode::DivdI => "DIVDI",
            Opcode::LoadI => "LOADI",
            Opcode::StorI => "STORI",
            Opcode::PrntI => "PRNTI",
            Opcode::ReadI => "READI",
            Opcode::JLink => "JLINK",
            Opcode::Retrn => "RETRN",
        }
    }

    pub fn from_mnemonic(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.mnemonic() == text)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// One entry of the instruction stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quad {
    /// Entry point of a function defined in this module.
    Label { name: String },
    /// Call whose target address is filled in by the linker.
    PlaceholderCall { target: String },
    /// Any other instruction, kept as opaque text.
    Plain(String),
}

impl Quad {
    pub fn label(name: impl Into<String>) -> Self {
        Self::Label { name: name.into() }
    }

    pub fn placeholder_call(target: impl Into<String>) -> Self {
        Self::PlaceholderCall {
            target: target.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::PlaceholderCall { .. })
    }

    /// True for a placeholder call to exactly `name`.
    pub fn is_placeholder_for(&self, name: &str) -> bool {
        matches!(self, Self::PlaceholderCall { target } if target == name)
    }

    /// Callee of a placeholder call.
    pub fn placeholder_target(&self) -> Option<&str> {
        match self {
            Self::PlaceholderCall { target } => Some(target),
            _ => None,
        }
    }

    pub fn label_name(&self) -> Option<&str> {
        match self {
            Self::Label { name } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quad::Label { name } => write!(f, "{LABEL_MNEMONIC} {name}"),
            Quad::PlaceholderCall { .. } => write!(f, "{} {UNRESOLVED_TARGET}", Opcode::JLink),
            Quad::Plain(text) => f.write_str(text),
        }
    }
}

/// A serialized stream line, classified by its mnemonic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamLine<'a> {
    Label(&'a str),
    Call { target: &'a str },
    Other(&'a str),
}

impl<'a> StreamLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim_end();
        let mut parts = line.split_whitespace();
        let (Some(head), Some(operand), None) = (parts.next(), parts.next(), parts.next()) else {
            return StreamLine::Other(line);
        };

        if head == LABEL_MNEMONIC {
            StreamLine::Label(operand)
        } else if head == Opcode::JLink.mnemonic() {
            StreamLine::Call { target: operand }
        } else {
            StreamLine::Other(line)
        }
    }

    /// True for a `JLINK` that still carries the unresolved marker.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, StreamLine::Call { target } if *target == UNRESOLVED_TARGET)
    }
}
