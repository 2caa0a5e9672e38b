use crate::{Opcode, Quad, StreamLine};

#[test]
fn quads_render_as_stream_lines() {
    assert_eq!(Quad::label("main").to_string(), "LABEL main");
    assert_eq!(Quad::placeholder_call("f").to_string(), "JLINK -1");
    assert_eq!(Quad::plain("COPYI I4 7").to_string(), "COPYI I4 7");
}

#[test]
fn placeholder_matches_only_its_target() {
    let call = Quad::placeholder_call("f");

    assert!(call.is_placeholder());
    assert!(call.is_placeholder_for("f"));
    assert!(!call.is_placeholder_for("g"));
    assert!(!Quad::label("f").is_placeholder_for("f"));
    assert!(!Quad::plain("JLINK -1").is_placeholder());
    assert_eq!(call.placeholder_target(), Some("f"));
    assert_eq!(Quad::label("f").placeholder_target(), None);
}

#[test]
fn label_name_is_exposed_for_labels_only() {
    assert_eq!(Quad::label("g").label_name(), Some("g"));
    assert_eq!(Quad::placeholder_call("g").label_name(), None);
    assert_eq!(Quad::plain("RETRN").label_name(), None);
}

#[test]
fn mnemonics_round_trip() {
    for op in Opcode::ALL {
        assert_eq!(Opcode::from_mnemonic(op.mnemonic()), Some(op));
    }
    assert_eq!(Opcode::from_mnemonic("LABEL"), None);
    assert_eq!(Opcode::JLink.to_string(), "JLINK");
}

#[test]
fn stream_line_classifies_labels_and_calls() {
    assert_eq!(StreamLine::parse("LABEL main"), StreamLine::Label("main"));
    assert_eq!(
        StreamLine::parse("JLINK -1"),
        StreamLine::Call { target: "-1" }
    );
    assert_eq!(
        StreamLine::parse("JLINK 12\r"),
        StreamLine::Call { target: "12" }
    );
    assert_eq!(
        StreamLine::parse("ADD2I I4 I5 I6"),
        StreamLine::Other("ADD2I I4 I5 I6")
    );
    assert_eq!(StreamLine::parse("RETRN"), StreamLine::Other("RETRN"));
    assert_eq!(
        StreamLine::parse("LABEL a b"),
        StreamLine::Other("LABEL a b")
    );
}

#[test]
fn only_unresolved_calls_are_placeholders() {
    assert!(StreamLine::parse("JLINK -1").is_placeholder());
    assert!(!StreamLine::parse("JLINK 5").is_placeholder());
    assert!(!StreamLine::parse("LABEL -1").is_placeholder());
}
