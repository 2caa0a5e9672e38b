//! Errors raised while reading or patching a module artifact.

/// Error reading a module artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactError {
    /// A header line is missing or does not start with the expected tag.
    #[error("line {line}: expected `{expected}`")]
    MissingSection { line: usize, expected: &'static str },

    /// A header entry is not of the form `name,address`.
    #[error("line {line}: malformed link entry `{entry}`")]
    MalformedEntry { line: usize, entry: String },

    /// A header address does not point into the instruction stream.
    #[error("address {address} of `{name}` is outside the instruction stream")]
    AddressOutOfRange { name: String, address: u32 },

    /// A call site does not hold an unresolved `JLINK`.
    #[error("address {address} of `{name}` is not an unresolved call")]
    NotAPlaceholder { name: String, address: u32 },

    /// An entry point does not hold the function's label.
    #[error("address {address} of `{name}` is not the label of `{name}`")]
    NotALabel { name: String, address: u32 },
}
