use cmm_quads::{Address, Quad};

use super::{EmitError, InstructionBuffer};

fn addr(raw: u32) -> Address {
    Address::new(raw).unwrap()
}

#[test]
fn addresses_are_dense_from_one() {
    let mut buffer = InstructionBuffer::new();

    assert_eq!(buffer.next_address(), Address::FIRST);
    assert_eq!(buffer.define_label("main").unwrap(), addr(1));
    assert_eq!(buffer.emit("COPYI I4 1").unwrap(), addr(2));
    assert_eq!(buffer.emit_placeholder_call("f").unwrap(), addr(3));
    assert_eq!(buffer.emit("RETRN").unwrap(), addr(4));

    assert_eq!(buffer.len(), 4);
    assert_eq!(buffer.next_address(), addr(5));
}

#[test]
fn quads_keep_their_kind() {
    let mut buffer = InstructionBuffer::new();
    buffer.define_label("main").unwrap();
    buffer.emit_placeholder_call("f").unwrap();

    assert_eq!(buffer.get(addr(1)), Some(&Quad::label("main")));
    assert_eq!(buffer.get(addr(2)), Some(&Quad::placeholder_call("f")));
    assert_eq!(buffer.get(addr(3)), None);
    assert_eq!(buffer.label_of("main"), Some(addr(1)));
    assert_eq!(buffer.label_of("f"), None);
}

#[test]
fn second_label_for_same_name_is_rejected() {
    let mut buffer = InstructionBuffer::new();
    buffer.define_label("f").unwrap();
    buffer.emit("RETRN").unwrap();

    let err = buffer.define_label("f").unwrap_err();

    assert_eq!(
        err,
        EmitError::DuplicateDefinition {
            name: "f".to_string(),
            first: addr(1),
        }
    );
    assert_eq!(buffer.len(), 2);
}

#[test]
fn finalize_renders_one_line_per_quad() {
    let mut buffer = InstructionBuffer::new();
    buffer.define_label("main").unwrap();
    buffer.emit_placeholder_call("f").unwrap();
    buffer.emit("RETRN").unwrap();

    insta::assert_snapshot!(buffer.finalize(), @r"
    LABEL main
    JLINK -1
    RETRN
    ");
    assert_eq!(buffer.text(), Some("LABEL main\nJLINK -1\nRETRN\n"));
}

#[test]
fn finalize_is_idempotent() {
    let mut buffer = InstructionBuffer::new();
    buffer.define_label("main").unwrap();
    buffer.emit("RETRN").unwrap();

    let first = buffer.finalize().to_string();
    let second = buffer.finalize().to_string();

    assert_eq!(first, second);
}

#[test]
fn empty_buffer_finalizes_to_empty_text() {
    let mut buffer = InstructionBuffer::new();

    assert!(buffer.is_empty());
    assert_eq!(buffer.finalize(), "");
    assert!(buffer.is_finalized());
}

#[test]
fn emission_after_finalize_fails() {
    let mut buffer = InstructionBuffer::new();
    buffer.emit("RETRN").unwrap();
    buffer.finalize();

    assert_eq!(buffer.emit("RETRN"), Err(EmitError::Finalized));
    assert_eq!(buffer.emit_placeholder_call("f"), Err(EmitError::Finalized));
    assert_eq!(buffer.define_label("g"), Err(EmitError::Finalized));
    assert_eq!(buffer.finalize(), "RETRN\n");
}

#[test]
fn iter_pairs_quads_with_addresses() {
    let mut buffer = InstructionBuffer::new();
    buffer.define_label("f").unwrap();
    buffer.emit("RETRN").unwrap();

    let addresses: Vec<_> = buffer.iter().map(|(address, _)| address.get()).collect();

    assert_eq!(addresses, vec![1, 2]);
}

#[test]
fn instruction_text_must_fit_on_one_line() {
    let mut buffer = InstructionBuffer::new();
    buffer.emit("COPYI I4 1").unwrap();

    assert_eq!(
        buffer.emit("COPYI I4 1\nCOPYI I5 2"),
        Err(EmitError::MultilineInstruction {
            text: "COPYI I4 1\nCOPYI I5 2".to_string()
        })
    );
    assert!(buffer.emit("RETRN\r").is_err());
    assert!(buffer.define_label("f\ng").is_err());

    // Rejected text takes no address.
    assert_eq!(buffer.emit_placeholder_call("f").unwrap(), addr(2));
    assert_eq!(buffer.finalize(), "COPYI I4 1\nJLINK -1\n");
}
