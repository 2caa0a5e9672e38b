//! Error types for quad emission.

use cmm_quads::Address;

/// Error raised by the instruction buffer, the function registry or the
/// header builder.
///
/// All of these are fatal to the module being compiled.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EmitError {
    /// A function was defined twice in one module.
    #[error("function `{name}` is already defined at address {first}")]
    DuplicateDefinition { name: String, first: Address },

    /// A recorded call site does not hold a call to its function, even after
    /// forward repair.
    #[error("call site of `{name}` recorded at address {recorded} does not hold a call to it")]
    AddressConsistencyFault { name: String, recorded: Address },

    /// A placeholder call that no call site accounts for.
    #[error("call to `{target}` at address {address} was never recorded")]
    UnrecordedCall { target: String, address: Address },

    /// An instruction whose text would take more than one stream line.
    #[error("instruction {text:?} spans more than one line")]
    MultilineInstruction { text: String },

    /// A function's entry address does not hold its label.
    #[error("entry address {entry} of `{name}` does not hold its label")]
    EntryMismatch { name: String, entry: Address },

    /// Emission was attempted after the stream was frozen.
    #[error("instruction buffer is already finalized")]
    Finalized,

    /// The header was requested before the stream was frozen.
    #[error("instruction buffer is not finalized")]
    NotFinalized,
}
