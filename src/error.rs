use std::cell::RefCell;

use crate::source::Span;
use crate::style::Style;

/// Every way a compilation can fail. The set is closed: user-facing errors
/// outside this list are a bug in the front-end, not in the user's program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidLiteralInt32,
    InvalidLiteralFloat,
    UnexpectedCharacter,
    UnterminatedComment,
    UnexpectedToken,
    SurpriseToken,
    SymbolAlreadyDefinedInScope,
    VariableNotDefined,
    VariableUsedBeforeDefinition,
    TypeNotDefined,
    SymbolIsNotAType,
    InvalidImplicitCastInBinaryExpr,
    InvalidImplicitCastInIfCondition,
    InvalidImplicitCastInIfBodies,
    InvalidImplicitCastInInWhileCondition,
    InvalidExplicitCast,
    CannotAssignToLValue,
    OperatorCannotBeUsedWithType,
    LeftOfDotNotClass,
    ClassMemberNotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    /// Renders the diagnostic with an excerpt of the offending line and a
    /// caret underline. `source` must be the text the span was produced from.
    pub fn display_with_source(&self, source: &str) -> String {
        let line_num = self.span.start.line as usize;
        let line_content = source
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .nth(line_num.saturating_sub(1))
            .unwrap_or("");

        let col = (self.span.start.column as usize).saturating_sub(1);
        let len = if self.span.end.line == self.span.start.line {
            (self.span.end.column.saturating_sub(self.span.start.column)) as usize
        } else {
            line_content.chars().count().saturating_sub(col)
        }
        .max(1);
        let underline = format!("{}{}", " ".repeat(col), "^".repeat(len));

        let error_label = Style::bold_red("error");
        let line_num_str = Style::blue(&format!("{:4}", line_num));
        let pipe = Style::blue("|");
        let underline_colored = Style::red(&underline);

        format!(
            "{}: {}\n\n{} {} {}\n     {} {}",
            error_label, self.message, line_num_str, pipe, line_content, pipe, underline_colored
        )
    }
}

/// Append-only diagnostic accumulator shared by the lexer, the parser and
/// every semantic pass of one compilation. Interior mutability because the
/// parser and the lexer it drives both report into the same stream; the
/// front-end is single-threaded throughout.
#[derive(Debug, Default)]
pub struct ErrorStream {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl ErrorStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self, kind: ErrorKind, span: Span, message: impl Into<String>) {
        self.diagnostics.borrow_mut().push(Diagnostic {
            kind,
            span,
            message: message.into(),
        });
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics.into_inner()
    }
}
