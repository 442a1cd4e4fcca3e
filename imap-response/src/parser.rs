use std::panic::{self, AssertUnwindSafe};

use imap_response_types::{
    envelope::Envelope,
    error::{ParseError, ParseErrorKind, ParseResult},
    fetch::FetchResponse,
    response::Response,
};
use nom::combinator::all_consuming;

use crate::{
    body::body,
    decode::{IMAPErrorKind, IMAPParseError, IMAPResult},
    envelope::{address, envelope},
    fetch::fetch_response,
    flag::flag_list,
    response::{continue_req, response, response_tagged, response_untagged},
    rule::{Parsed, Rule},
    transform::{flag_set, Transformer},
};

/// How many nested lists a `BODYSTRUCTURE` may contain by default.
///
/// Parameter and disposition lists count as nesting, too.
pub const DEFAULT_MAX_BODY_DEPTH: usize = 16;

/// Decoder for complete IMAP4rev2 server response units.
///
/// A unit is one response line including all literals it announces, e.g.,
/// `* 1 FETCH (BODY[] {5}\r\nHello)`. Surrounding whitespace (SP, HTAB, CR, LF) is ignored, so the
/// terminating CRLF may be present or not.
///
/// The parser holds configuration only. It can be shared freely between threads, and every call
/// returns freshly allocated records.
///
/// # Example
///
/// ```rust
/// use imap_response::{
///     imap_response_types::flag::Flag,
///     ResponseParser,
/// };
///
/// let parser = ResponseParser::new().with_max_body_depth(32);
///
/// let fetch = parser
///     .parse_fetch_response(r#"* 4 FETCH (UID 99 FLAGS (\Seen $Junk))"#)
///     .unwrap();
///
/// assert_eq!(fetch.message_number.get(), 4);
/// assert_eq!(fetch.uid.map(|uid| uid.get()), Some(99));
/// assert!(fetch.flags.unwrap().contains(&Flag::Seen));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseParser {
    max_body_depth: usize,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseParser {
    pub const fn new() -> Self {
        Self {
            max_body_depth: DEFAULT_MAX_BODY_DEPTH,
        }
    }

    /// Limit how many lists may be nested in a `BODYSTRUCTURE`.
    ///
    /// Deeper structures fail with [`ParseErrorKind::RecursionLimitExceeded`].
    pub const fn with_max_body_depth(mut self, max_body_depth: usize) -> Self {
        self.max_body_depth = max_body_depth;
        self
    }

    pub const fn max_body_depth(&self) -> usize {
        self.max_body_depth
    }

    /// Decode `input` as the rule named `rule`, or as any [`Response`] if `rule` is `None`.
    ///
    /// Rule names are listed in [`Rule::name`].
    pub fn parse(&self, input: impl AsRef<[u8]>, rule: Option<&str>) -> ParseResult<Parsed> {
        let rule = match rule {
            Some(name) => name.parse::<Rule>()?,
            None => Rule::Response,
        };

        self.parse_rule(input, rule)
    }

    /// Decode `input` as `rule`. The rule must match the whole (trimmed) input.
    pub fn parse_rule(&self, input: impl AsRef<[u8]>, rule: Rule) -> ParseResult<Parsed> {
        let input = input.as_ref();

        match rule {
            Rule::Response => self.parse_response(input).map(Parsed::Response),
            Rule::FetchResponse => self
                .parse_fetch_response(input)
                .map(|fetch| Parsed::Response(Response::Fetch(fetch))),
            Rule::ResponseTagged => self.decode(rule, input, response_tagged, |_, _, tagged| {
                Ok(Parsed::Response(Response::Tagged(tagged)))
            }),
            Rule::ResponseUntagged => {
                self.decode(rule, input, response_untagged, |_, _, untagged| {
                    Ok(Parsed::Response(Response::Untagged(untagged)))
                })
            }
            Rule::ResponseContinuation => {
                self.decode(rule, input, continue_req, |_, _, continuation| {
                    Ok(Parsed::Response(Response::Continuation(continuation)))
                })
            }
            Rule::Envelope => self.parse_envelope(input).map(Parsed::Envelope),
            Rule::Address => self.decode(rule, input, address, |transformer, _, address| {
                Ok(Parsed::Address(transformer.address(address)))
            }),
            Rule::FlagList => self.decode(rule, input, flag_list, |_, _, flags| {
                Ok(Parsed::Flags(flag_set(&flags)))
            }),
            Rule::BodyStructure => self.decode(
                rule,
                input,
                body(self.max_body_depth),
                |transformer, span, value| {
                    transformer
                        .body_structure(span, &value)
                        .map(Parsed::BodyStructure)
                },
            ),
        }
    }

    /// Decode any response.
    ///
    /// Shapes are tried in order: FETCH data, tagged status, untagged data, and continuation
    /// request. The first one that matches the whole input wins.
    pub fn parse_response(&self, input: impl AsRef<[u8]>) -> ParseResult<Response> {
        self.decode(
            Rule::Response,
            input.as_ref(),
            response(self.max_body_depth),
            |transformer, _, response| Ok(transformer.response(response)),
        )
    }

    /// Decode `* <n> FETCH (...)`.
    ///
    /// A field that matched the grammar but could not be decoded, e.g., an impossible
    /// `INTERNALDATE`, does not fail the call. It is left unset and reported in
    /// [`FetchResponse::diagnostics`].
    pub fn parse_fetch_response(&self, input: impl AsRef<[u8]>) -> ParseResult<FetchResponse> {
        self.decode(
            Rule::FetchResponse,
            input.as_ref(),
            fetch_response(self.max_body_depth),
            |transformer, _, fetch| Ok(transformer.fetch(fetch)),
        )
    }

    /// Decode a parenthesized envelope, e.g., the value of an `ENVELOPE` data item.
    pub fn parse_envelope(&self, input: impl AsRef<[u8]>) -> ParseResult<Envelope> {
        self.decode(
            Rule::Envelope,
            input.as_ref(),
            envelope,
            |transformer, _, envelope| Ok(transformer.envelope(envelope)),
        )
    }

    /// Trim, match `parser` against all of the remaining input, and `build` the record.
    ///
    /// `build` receives the trimmed input as the span of the whole match.
    fn decode<'a, O, R, P, B>(
        &self,
        rule: Rule,
        input: &'a [u8],
        parser: P,
        build: B,
    ) -> ParseResult<R>
    where
        P: FnMut(&'a [u8]) -> IMAPResult<&'a [u8], O>,
        B: FnOnce(Transformer<'a>, &'a [u8], O) -> ParseResult<R>,
    {
        log::trace!("Decoding `{rule}` ({} octets)", input.len());

        let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
            let trimmed = trim(input);

            match all_consuming(parser)(trimmed) {
                Ok((_, parsed)) => build(Transformer::new(input), trimmed, parsed),
                Err(nom::Err::Error(error) | nom::Err::Failure(error)) => {
                    Err(locate(rule, input, error))
                }
                Err(nom::Err::Incomplete(_)) => Err(ParseError::new(
                    ParseErrorKind::GrammarMismatch,
                    format!("Could not parse `{rule}`: incomplete input"),
                )),
            }
        }));

        match outcome {
            Ok(result) => result,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());

                log::warn!("Decoder panicked on `{rule}`: {reason}");

                Err(ParseError::internal(format!(
                    "Internal error while parsing `{rule}`: {reason}"
                )))
            }
        }
    }
}

/// Strip SP, HTAB, CR, and LF from both ends.
fn trim(input: &[u8]) -> &[u8] {
    let is_blank = |byte: &u8| matches!(byte, b' ' | b'\t' | b'\r' | b'\n');

    let start = input
        .iter()
        .position(|byte| !is_blank(byte))
        .unwrap_or(input.len());
    let end = input
        .iter()
        .rposition(|byte| !is_blank(byte))
        .map_or(start, |last| last + 1);

    &input[start..end]
}

/// Turn the deepest failure into a [`ParseError`], positioned in the caller's `input`.
fn locate(rule: Rule, input: &[u8], error: IMAPParseError<&[u8]>) -> ParseError {
    let kind = match error.kind {
        IMAPErrorKind::LiteralTruncated {
            declared,
            available,
        } => ParseErrorKind::TruncatedLiteral {
            declared,
            available,
        },
        IMAPErrorKind::RecursionLimitExceeded => ParseErrorKind::RecursionLimitExceeded,
        _ => ParseErrorKind::GrammarMismatch,
    };

    let offset = error.offset_in(input);
    let message = format!("Could not parse `{rule}`: {}", error.kind.describe());

    log::debug!("{message} (offset {offset})");

    ParseError::new(kind, message).located(input, offset)
}
