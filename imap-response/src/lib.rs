//! # IMAP4rev2 response decoder
//!
//! imap-response turns complete server response units into the owned records of
//! [imap-response-types]: FETCH data, envelopes, flags, body structures, and status responses.
//! It is a grammar-based decoder using [nom].
//!
//! A response unit is a single line together with every literal it announces. The transport is
//! responsible for collecting all octets of a literal before handing the unit over. A unit that
//! ends inside a literal fails with
//! [`TruncatedLiteral`](imap_response_types::error::ParseErrorKind::TruncatedLiteral).
//!
//! Decoding never panics on network input. Every call returns a
//! [`ParseResult`](imap_response_types::error::ParseResult).
//!
//! ## Example
//!
//! ```rust
//! use imap_response::{
//!     imap_response_types::{chrono::DateTime, flag::Flag, response::Response},
//!     parse_response,
//! };
//!
//! let response =
//!     parse_response(r#"* 1 FETCH (UID 123 FLAGS (\Seen) INTERNALDATE "16-Aug-2025 14:06:39 +0000")"#)
//!         .unwrap();
//!
//! let Response::Fetch(fetch) = response else {
//!     unreachable!()
//! };
//!
//! assert_eq!(fetch.message_number.get(), 1);
//! assert_eq!(fetch.uid.map(|uid| uid.get()), Some(123));
//! assert_eq!(fetch.flags, Some([Flag::Seen].into_iter().collect()));
//! assert_eq!(
//!     fetch.internal_date,
//!     Some(DateTime::parse_from_rfc3339("2025-08-16T14:06:39+00:00").unwrap())
//! );
//! ```
//!
//! ## Rules
//!
//! When the expected shape is known, a single [`Rule`] can be decoded, either by name through
//! [`parse`] or directly through [`parse_rule`]. The rule must match all of the input.
//!
//! ```rust
//! use imap_response::{parse, Parsed};
//!
//! let parsed = parse(r#"("Alice" NIL "alice" "example.org")"#, Some("address")).unwrap();
//!
//! let Parsed::Address(address) = parsed else {
//!     unreachable!()
//! };
//! assert_eq!(address.email().as_deref(), Some("alice@example.org"));
//! ```
//!
//! ## Features
//!
//! imap-response forwards the `serde` feature to imap-response-types.
//!
//! In addition, imap-response defines the following features:
//!
//! | Feature                        | Description                                      | Enabled by default |
//! |--------------------------------|--------------------------------------------------|--------------------|
//! | quirk_missing_text             | Rectify missing `text` element.                  | Yes (via `quirk`)  |
//! | quirk_spaces_between_addresses | Accept SP between addresses in an envelope.      | Yes (via `quirk`)  |
//! | quirk_empty_continue_req       | Accept a bare `+` as continuation request.       | Yes (via `quirk`)  |
//! | quirk_rectify_numbers          | Rectify negative body sizes to 0.                | Yes (via `quirk`)  |
//!
//! ## Quirks
//!
//! Features starting with `quirk_` are used to cope with existing interoperability issues.
//! Every rectification is logged at the `warn` level through the [log] facade.
//!
//! [imap-response-types]: imap_response_types
//! [log]: https://docs.rs/log

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod body;
mod core;
mod datetime;
mod decode;
mod envelope;
mod fetch;
mod flag;
mod parser;
mod response;
mod rule;
mod syntax;
#[cfg(test)]
mod testing;
mod transform;

use imap_response_types::{
    envelope::Envelope, error::ParseResult, fetch::FetchResponse, response::Response,
};
pub use parser::{ResponseParser, DEFAULT_MAX_BODY_DEPTH};
pub use rule::{Parsed, Rule};

// Re-export.
pub use imap_response_types;

/// The parser behind the free functions.
static DEFAULT_PARSER: ResponseParser = ResponseParser::new();

/// See [`ResponseParser::parse`].
pub fn parse(input: impl AsRef<[u8]>, rule: Option<&str>) -> ParseResult<Parsed> {
    DEFAULT_PARSER.parse(input, rule)
}

/// See [`ResponseParser::parse_rule`].
pub fn parse_rule(input: impl AsRef<[u8]>, rule: Rule) -> ParseResult<Parsed> {
    DEFAULT_PARSER.parse_rule(input, rule)
}

/// See [`ResponseParser::parse_response`].
pub fn parse_response(input: impl AsRef<[u8]>) -> ParseResult<Response> {
    DEFAULT_PARSER.parse_response(input)
}

/// See [`ResponseParser::parse_fetch_response`].
pub fn parse_fetch_response(input: impl AsRef<[u8]>) -> ParseResult<FetchResponse> {
    DEFAULT_PARSER.parse_fetch_response(input)
}

/// See [`ResponseParser::parse_envelope`].
pub fn parse_envelope(input: impl AsRef<[u8]>) -> ParseResult<Envelope> {
    DEFAULT_PARSER.parse_envelope(input)
}
