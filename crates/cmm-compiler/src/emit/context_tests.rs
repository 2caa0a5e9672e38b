use cmm_quads::{Addressing, Artifact, Quad};

use super::{CompilationContext, EmitError, FunctionState};

#[test]
fn emit_call_records_the_placeholder_address() {
    let mut ctx = CompilationContext::default();
    ctx.define_function("main").unwrap();
    ctx.emit("COPYI I4 1").unwrap();

    let site = ctx.emit_call("f").unwrap();

    assert_eq!(site.get(), 3);
    assert_eq!(ctx.buffer().get(site), Some(&Quad::placeholder_call("f")));
    assert_eq!(ctx.registry().get("f").unwrap().call_sites, vec![site]);
}

#[test]
fn define_function_labels_and_marks() {
    let mut ctx = CompilationContext::default();

    let entry = ctx.define_function("f").unwrap();

    assert_eq!(ctx.buffer().label_of("f"), Some(entry));
    let function = ctx.registry().get("f").unwrap();
    assert_eq!(function.entry, Some(entry));
    assert_eq!(function.state(), FunctionState::Defined);
}

#[test]
fn duplicate_definition_is_fatal() {
    let mut ctx = CompilationContext::default();
    ctx.define_function("f").unwrap();
    ctx.emit("RETRN").unwrap();

    let err = ctx.define_function("f").unwrap_err();

    assert!(matches!(err, EmitError::DuplicateDefinition { ref name, .. } if name == "f"));
}

#[test]
fn declare_does_not_emit() {
    let mut ctx = CompilationContext::default();

    ctx.declare("ext");

    assert!(ctx.buffer().is_empty());
    assert_eq!(
        ctx.registry().get("ext").unwrap().state(),
        FunctionState::Declared
    );
}

#[test]
fn assemble_is_idempotent() {
    let mut ctx = CompilationContext::new(Addressing::File);
    ctx.define_function("main").unwrap();
    ctx.emit_call("main").unwrap();
    ctx.emit("RETRN").unwrap();

    let first = ctx.assemble().unwrap();
    let second = ctx.assemble().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn emission_after_assemble_fails() {
    let mut ctx = CompilationContext::default();
    ctx.define_function("main").unwrap();
    ctx.assemble().unwrap();

    assert_eq!(ctx.emit("RETRN"), Err(EmitError::Finalized));
    assert_eq!(ctx.emit_call("f"), Err(EmitError::Finalized));
    assert!(ctx.registry().get("f").is_none());
}

#[test]
fn assembled_artifact_reads_back_under_both_conventions() {
    for addressing in [Addressing::Stream, Addressing::File] {
        let mut ctx = CompilationContext::new(addressing);
        ctx.define_function("main").unwrap();
        ctx.emit_call("helper").unwrap();
        ctx.emit("RETRN").unwrap();
        ctx.define_function("helper").unwrap();
        ctx.emit_call("ext").unwrap();
        ctx.emit("RETRN").unwrap();

        let text = ctx.assemble().unwrap().to_string();
        let artifact = Artifact::parse(&text, addressing).unwrap();

        artifact.validate().unwrap();
        assert_eq!(artifact.placeholder_count(), 2);
        let helper = artifact.header().implemented_address("helper").unwrap();
        assert_eq!(artifact.line_at(helper), Some("LABEL helper"));
    }
}
