use std::fmt;

use super::Span;

/// Diagnostic kinds, lexical and syntactic first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Lexical
    UnexpectedCharacter,
    UnclosedComment,
    IntegerOutOfRange,

    // Syntax
    UnexpectedToken,
    ExpectedExpression,
    ExpectedIdentifier,
    ExpectedType,
    ExpectedStatement,

    // Semantic
    DuplicateDefinition,
    SignatureMismatch,
    UndeclaredFunction,
    ArityMismatch,
    VoidValue,
    ReturnMismatch,
    UndeclaredVariable,
    DuplicateVariable,

    // Lints
    UnreachableCode,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnreachableCode => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Lexical and syntax errors stop the parse.
    pub fn is_syntax_error(&self) -> bool {
        *self < Self::DuplicateDefinition
    }

    /// Base message for this kind, used when no detail is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnexpectedCharacter => "unexpected character",
            Self::UnclosedComment => "unclosed block comment",
            Self::IntegerOutOfRange => "integer literal out of range",

            Self::UnexpectedToken => "unexpected token",
            Self::ExpectedExpression => "expected an expression",
            Self::ExpectedIdentifier => "expected an identifier",
            Self::ExpectedType => "expected `int` or `void`",
            Self::ExpectedStatement => "expected a statement",

            Self::DuplicateDefinition => "duplicate definition",
            Self::SignatureMismatch => "conflicting declaration",
            Self::UndeclaredFunction => "undeclared function",
            Self::ArityMismatch => "wrong number of arguments",
            Self::VoidValue => "void value used in expression",
            Self::ReturnMismatch => "return does not match function type",
            Self::UndeclaredVariable => "undeclared variable",
            Self::DuplicateVariable => "variable already declared",

            Self::UnreachableCode => "unreachable statement",
        }
    }

    /// Template for detailed messages; `{}` is replaced by the detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::DuplicateDefinition => "`{}` is already defined".to_string(),
            Self::SignatureMismatch => "conflicting declaration of `{}`".to_string(),
            Self::UndeclaredFunction => "function `{}` is not declared".to_string(),
            Self::UndeclaredVariable => "variable `{}` is not declared".to_string(),
            Self::DuplicateVariable => "variable `{}` is already declared".to_string(),
            Self::VoidValue => "`{}` does not return a value".to_string(),
            Self::UnexpectedToken => "expected {}".to_string(),
            Self::ExpectedExpression
            | Self::ExpectedIdentifier
            | Self::ExpectedType
            | Self::ExpectedStatement => format!("{}, found {{}}", self.fallback_message()),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// `None` gives the fallback message, `Some(detail)` fills the template.
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub span: Span,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub kind: DiagnosticKind,
    /// Underlined in rendered output.
    pub span: Span,
    pub message: String,
    pub related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind, span: Span) -> Self {
        Self {
            kind,
            span,
            message: kind.fallback_message().to_string(),
            related: Vec::new(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            self.span.start,
            self.span.end,
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message, related.span.start, related.span.end
            )?;
        }
        Ok(())
    }
}
