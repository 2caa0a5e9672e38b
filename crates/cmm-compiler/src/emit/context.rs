//! Per-compilation emission state.

use std::fmt;

use cmm_quads::{Address, Addressing, ModuleHeader};

use super::{CallSiteRepair, EmitError, FunctionRegistry, InstructionBuffer, ModuleHeaderBuilder};

/// Everything one compilation unit emits into.
///
/// Owns the instruction buffer and the function registry, so the pairing of a
/// placeholder call with its recorded call site happens inside a single
/// `&mut self` call and nothing can be emitted in between.
#[derive(Debug, Default)]
pub struct CompilationContext {
    buffer: InstructionBuffer,
    registry: FunctionRegistry,
    addressing: Addressing,
    repair: CallSiteRepair,
}

impl CompilationContext {
    pub fn new(addressing: Addressing) -> Self {
        Self {
            addressing,
            ..Self::default()
        }
    }

    pub fn with_repair(mut self, repair: CallSiteRepair) -> Self {
        self.repair = repair;
        self
    }

    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    pub fn buffer(&self) -> &InstructionBuffer {
        &self.buffer
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn emit(&mut self, text: impl Into<String>) -> Result<Address, EmitError> {
        self.buffer.emit(text)
    }

    /// Emit a placeholder call to `name` and record its call site.
    pub fn emit_call(&mut self, name: &str) -> Result<Address, EmitError> {
        let address = self.buffer.emit_placeholder_call(name)?;
        self.registry.record_call(name, address);
        Ok(address)
    }

    /// Emit the label of `name` and mark it defined.
    pub fn define_function(&mut self, name: &str) -> Result<Address, EmitError> {
        let address = self.buffer.define_label(name)?;
        self.registry.mark_defined(name, address)?;
        Ok(address)
    }

    pub fn declare(&mut self, name: &str) {
        self.registry.declare(name);
    }

    /// Freeze the stream and build the artifact.
    ///
    /// May be called repeatedly; every call yields the same artifact.
    pub fn assemble(&mut self) -> Result<ModuleArtifact, EmitError> {
        let stream = self.buffer.finalize().to_string();
        let header = ModuleHeaderBuilder::new(&self.registry, &self.buffer, self.addressing)
            .with_repair(self.repair)
            .build()?;
        Ok(ModuleArtifact {
            header,
            stream,
            addressing: self.addressing,
        })
    }
}

/// A compiled module: linking header plus instruction stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleArtifact {
    pub header: ModuleHeader,
    /// Stream text, one quad per line.
    pub stream: String,
    /// Numbering used by the header addresses.
    pub addressing: Addressing,
}

impl fmt::Display for ModuleArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.header, self.stream)
    }
}
