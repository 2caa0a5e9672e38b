use super::*;

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::ExpectedExpression, 0..3)
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    assert_eq!(
        diagnostics.iter().next().unwrap().message,
        "expected an expression"
    );
}

#[test]
fn report_with_detail_fills_template() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UndeclaredVariable, 4..5)
        .message("x")
        .emit();
    diagnostics
        .report(DiagnosticKind::ArityMismatch, 0..1)
        .message("`f` takes 2 arguments, 1 given")
        .emit();

    let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "variable `x` is not declared",
            "wrong number of arguments: `f` takes 2 arguments, 1 given",
        ]
    );
}

#[test]
fn warnings_are_not_errors() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.report(DiagnosticKind::UnreachableCode, 0..1).emit();

    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(diagnostics.error_count(), 0);
}

#[test]
fn syntax_kinds_precede_semantic_kinds() {
    assert!(DiagnosticKind::UnexpectedCharacter.is_syntax_error());
    assert!(DiagnosticKind::ExpectedStatement.is_syntax_error());
    assert!(!DiagnosticKind::DuplicateDefinition.is_syntax_error());
    assert!(!DiagnosticKind::UnreachableCode.is_syntax_error());
}

#[test]
fn plain_format_without_source() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::DuplicateDefinition, 20..21)
        .message("f")
        .related_to("first defined here", 4..5)
        .emit();

    insta::assert_snapshot!(
        diagnostics.printer().render(),
        @"error at 20..21: `f` is already defined (related: first defined here at 4..5)"
    );
}

#[test]
fn render_with_related_span() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, 0..5)
        .message("`;`")
        .related_to("related info", 6..10)
        .emit();

    let result = diagnostics.printer().source("hello world!").render();
    insta::assert_snapshot!(result, @r"
    error: expected `;`
      |
    1 | hello world!
      | ^^^^^ ---- related info
    ");
}

#[test]
fn extend_keeps_order() {
    let mut first = Diagnostics::new();
    first.report(DiagnosticKind::UndeclaredFunction, 0..1).emit();
    let mut second = Diagnostics::new();
    second.report(DiagnosticKind::VoidValue, 2..3).emit();

    first.extend(second);

    assert_eq!(
        first.kinds(),
        vec![DiagnosticKind::UndeclaredFunction, DiagnosticKind::VoidValue]
    );
}
