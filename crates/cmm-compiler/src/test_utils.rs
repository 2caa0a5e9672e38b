//! Test helpers.

use cmm_quads::{Addressing, Artifact};

use crate::{Compiled, Compiler};

/// Compile a program that is expected to be valid.
pub fn compile(source: &str) -> Compiled {
    match Compiler::new(source).compile() {
        Ok(compiled) => compiled,
        Err(err) => {
            let rendered = err
                .diagnostics()
                .map(|d| d.printer().source(source).render())
                .unwrap_or_default();
            panic!("expected valid program, got {err}\n{rendered}");
        }
    }
}

/// Instruction stream of a valid program.
pub fn stream_of(source: &str) -> String {
    compile(source).artifact.stream
}

/// Diagnostics of an invalid program in plain format.
pub fn errors_of(source: &str) -> String {
    let Err(err) = Compiler::new(source).compile() else {
        panic!("expected compile error for:\n{source}");
    };
    let Some(diagnostics) = err.diagnostics() else {
        panic!("expected source diagnostics, got {err}");
    };
    diagnostics.printer().render()
}

/// Minimal linker: patch every call whose callee is implemented in the same
/// module, leaving calls to other modules untouched.
pub fn link_locally(text: &str, addressing: Addressing) -> Artifact {
    let mut artifact = Artifact::parse(text, addressing).unwrap();
    let header = artifact.header().clone();
    for site in &header.unimplemented {
        if let Some(target) = header.implemented_address(&site.name) {
            artifact.patch_call(site, target).unwrap();
        }
    }
    artifact
}
