use std::{
    num::{ParseIntError, TryFromIntError},
    str::Utf8Error,
};

use nom::{
    error::{ErrorKind, FromExternalError, ParseError},
    InputLength, Offset,
};

/// An extended version of [`nom::IResult`].
pub(crate) type IMAPResult<I, O> = Result<(I, O), nom::Err<IMAPParseError<I>>>;

/// An extended version of [`nom::error::Error`].
///
/// When alternatives fail, the error that got furthest into the input is kept. `input` is the
/// remaining input at the point of failure, so `original.offset(input)` is the best-effort
/// position of the mismatch.
#[derive(Debug)]
pub(crate) struct IMAPParseError<I> {
    pub input: I,
    pub kind: IMAPErrorKind,
}

/// An extended version of [`nom::error::ErrorKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IMAPErrorKind {
    /// `{declared}` CRLF was followed by fewer octets.
    LiteralTruncated { declared: u32, available: usize },
    BadNumber,
    BadBase64,
    BadUtf8,
    RecursionLimitExceeded,
    Nom(ErrorKind),
}

impl<'a> IMAPParseError<&'a [u8]> {
    pub(crate) fn failure(input: &'a [u8], kind: IMAPErrorKind) -> nom::Err<Self> {
        nom::Err::Failure(Self { input, kind })
    }

    /// Byte offset of this error in `original`.
    pub(crate) fn offset_in(&self, original: &[u8]) -> usize {
        original.offset(self.input)
    }
}

impl IMAPErrorKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::LiteralTruncated {
                declared,
                available,
            } => format!(
                "Literal announced {declared} octets, but only {available} are available"
            ),
            Self::BadNumber => "Number out of range".into(),
            Self::BadBase64 => "Invalid base64".into(),
            Self::BadUtf8 => "Invalid UTF-8 in quoted string".into(),
            Self::RecursionLimitExceeded => "Recursion limit exceeded".into(),
            Self::Nom(kind) => format!("Grammar mismatch ({})", kind.description()),
        }
    }
}

impl<I: InputLength> ParseError<I> for IMAPParseError<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::Nom(kind),
        }
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        // The inner error is deeper than the combinator reporting it.
        other
    }

    fn or(self, other: Self) -> Self {
        // Less remaining input means the match got further.
        if other.input.input_len() < self.input.input_len() {
            other
        } else {
            self
        }
    }
}

impl<I> FromExternalError<I, ParseIntError> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: ParseIntError) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::BadNumber,
        }
    }
}

impl<I> FromExternalError<I, TryFromIntError> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: TryFromIntError) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::BadNumber,
        }
    }
}

impl<I> FromExternalError<I, Utf8Error> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: Utf8Error) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::BadUtf8,
        }
    }
}

impl<I> FromExternalError<I, base64::DecodeError> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: base64::DecodeError) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::BadBase64,
        }
    }
}
