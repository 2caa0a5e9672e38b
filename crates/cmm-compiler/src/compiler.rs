//! Compiler entry point: source text in, module artifact out.

use cmm_quads::Addressing;
use log::debug;

use crate::diagnostics::Diagnostics;
use crate::emit::{CallSiteRepair, CompilationContext, ModuleArtifact};
use crate::parser::{Abort, Translator};
use crate::{Error, Result};

/// Maximum nesting of blocks and expressions.
pub const DEFAULT_RECURSION_FUEL: u32 = 256;

/// Compiles one C-- source text into one module.
///
/// Each call to [`compile`](Self::compile) starts from a fresh
/// [`CompilationContext`]; nothing is shared between compilations.
#[derive(Clone, Debug)]
pub struct Compiler<'src> {
    source: &'src str,
    addressing: Addressing,
    recursion_fuel: u32,
    repair: CallSiteRepair,
}

/// A successfully compiled module and the warnings reported on the way.
#[derive(Clone, Debug)]
pub struct Compiled {
    pub artifact: ModuleArtifact,
    pub diagnostics: Diagnostics,
}

impl<'src> Compiler<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            addressing: Addressing::default(),
            recursion_fuel: DEFAULT_RECURSION_FUEL,
            repair: CallSiteRepair::default(),
        }
    }

    pub fn with_addressing(mut self, addressing: Addressing) -> Self {
        self.addressing = addressing;
        self
    }

    pub fn with_recursion_fuel(mut self, fuel: u32) -> Self {
        self.recursion_fuel = fuel;
        self
    }

    pub fn with_repair(mut self, repair: CallSiteRepair) -> Self {
        self.repair = repair;
        self
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn compile(&self) -> Result<Compiled> {
        let mut ctx = CompilationContext::new(self.addressing).with_repair(self.repair);

        let (result, diagnostics) =
            Translator::new(self.source, &mut ctx, self.recursion_fuel).translate();
        match result {
            Ok(()) => {}
            Err(Abort::Syntax) => return Err(Error::ParseFailed(diagnostics)),
            Err(Abort::RecursionLimit) => return Err(Error::RecursionLimitExceeded),
            Err(Abort::Emit(err)) => return Err(Error::Emit(err)),
        }
        if diagnostics.has_errors() {
            return Err(Error::AnalysisFailed(diagnostics));
        }

        let artifact = ctx.assemble()?;
        debug!(
            "assembled {} quads, {} call sites, {} entry points ({} addressing)",
            ctx.buffer().len(),
            artifact.header.unimplemented.len(),
            artifact.header.implemented.len(),
            artifact.addressing,
        );
        Ok(Compiled {
            artifact,
            diagnostics,
        })
    }
}
