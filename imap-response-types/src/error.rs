//! Error-related types.

use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::fetch::FetchField;

/// Outcome of a decoder call.
///
/// `Ok` carries the decoded record, `Err` the reason why decoding failed.
pub type ParseResult<T> = Result<T, ParseError>;

/// A parse error.
///
/// The message is always present. Position, line, and column are only known when the failing
/// match attempt could be located in the input. An unknown location is `None` and must not be
/// treated as offset zero.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub struct ParseError {
    kind: ParseErrorKind,
    message: String,
    position: Option<usize>,
    line: Option<usize>,
    column: Option<usize>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
            line: None,
            column: None,
        }
    }

    pub fn unknown_rule(rule: impl Into<String>) -> Self {
        let rule = rule.into();
        let message = format!("Unknown rule: {rule}");

        Self::new(ParseErrorKind::UnknownRule { rule }, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ParseErrorKind::Internal, message)
    }

    /// Attach the byte offset of the failure in `input` and derive line and column from it.
    ///
    /// Lines and columns are 1-based. Offsets past the end of `input` are clamped.
    pub fn located(mut self, input: &[u8], offset: usize) -> Self {
        let offset = offset.min(input.len());
        let before = &input[..offset];

        let line = before.iter().filter(|&&byte| byte == b'\n').count() + 1;
        let column = match before.iter().rposition(|&byte| byte == b'\n') {
            Some(newline) => offset - newline,
            None => offset + 1,
        };

        self.position = Some(offset);
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset (0-based) into the caller's input.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Line (1-based).
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Column (1-based).
    pub fn column(&self) -> Option<usize> {
        self.column
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match (self.position, self.line, self.column) {
            (Some(position), Some(line), Some(column)) => write!(
                f,
                "{} (line {line}, column {column}, offset {position})",
                self.message
            ),
            (Some(position), _, _) => write!(f, "{} (offset {position})", self.message),
            _ => f.write_str(&self.message),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// No alternative matched, or input was left over after the rule matched.
    #[error("Grammar mismatch")]
    GrammarMismatch,
    /// The caller asked for a rule that does not exist.
    #[error("Unknown rule `{rule}`")]
    UnknownRule { rule: String },
    /// A field was recognized by the grammar, but its value could not be decoded.
    ///
    /// Only reported as a diagnostic next to an otherwise successful record, or when the
    /// caller asked for that field's rule directly.
    #[error("Could not decode {field}")]
    PartialFieldDecodeFailure { field: FetchField },
    /// A literal announced more octets than the response unit contains.
    ///
    /// The transport must hand over complete literals. Seeing this error means that the
    /// upstream buffering split a response unit.
    #[error("Literal announced {declared} octets, but only {available} are available")]
    TruncatedLiteral { declared: u32, available: usize },
    /// Nesting (e.g., of a body structure) is deeper than the configured limit.
    #[error("Recursion limit exceeded")]
    RecursionLimitExceeded,
    /// An unexpected fault inside the decoder.
    #[error("Internal error")]
    Internal,
}
