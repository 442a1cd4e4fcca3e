//! Turn the borrowed syntax tree into owned records.
//!
//! The transformer only walks nodes the grammar produced. It never looks at the input text again,
//! except to locate diagnostics.

use std::{collections::BTreeSet, fmt::Display};

use imap_response_types::{
    body::{BodyStructure, ContentType, EncapsulatedMessage},
    envelope::{Address, Envelope},
    error::{ParseError, ParseErrorKind},
    fetch::{BodySection, FetchField, FetchResponse},
    flag::Flag,
    response::Response,
};
use nom::Offset;

use crate::{
    datetime::decode_date_time,
    syntax::{self, IString, MsgAtt, NString, Spanned, Value},
};

/// Builds records for one decoder call.
///
/// `input` is the caller's input. Every span handed to the transformer must point into it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Transformer<'i> {
    input: &'i [u8],
}

impl<'i> Transformer<'i> {
    pub(crate) fn new(input: &'i [u8]) -> Self {
        Self { input }
    }

    pub(crate) fn response(&self, response: syntax::Response<'_>) -> Response {
        match response {
            syntax::Response::Fetch(fetch) => Response::Fetch(self.fetch(fetch)),
            syntax::Response::Tagged(tagged) => Response::Tagged(tagged),
            syntax::Response::Untagged(untagged) => Response::Untagged(untagged),
            syntax::Response::Continuation(continuation) => Response::Continuation(continuation),
        }
    }

    /// Fields are decoded independently. A field that cannot be decoded is recorded in
    /// [`FetchResponse::diagnostics`] and keeps the last value that could be decoded, if any.
    pub(crate) fn fetch(&self, fetch: syntax::Fetch<'_>) -> FetchResponse {
        let mut record = FetchResponse::new(fetch.message_number);

        for Spanned { span, node } in fetch.attributes {
            match node {
                MsgAtt::Uid(uid) => {
                    replaced(FetchField::Uid, record.uid.replace(uid));
                }
                MsgAtt::Flags(flags) => {
                    replaced(FetchField::Flags, record.flags.replace(flag_set(&flags)));
                }
                MsgAtt::InternalDate(value) => match decode_date_time(&value) {
                    Some(internal_date) => {
                        replaced(
                            FetchField::InternalDate,
                            record.internal_date.replace(internal_date),
                        );
                    }
                    None => {
                        record.diagnostics.push(self.field_failure(
                            FetchField::InternalDate,
                            span,
                            format!("Could not decode INTERNALDATE \"{value}\""),
                        ));
                    }
                },
                MsgAtt::Envelope(envelope) => {
                    replaced(
                        FetchField::Envelope,
                        record.envelope.replace(self.envelope(envelope)),
                    );
                }
                MsgAtt::BodyStructure(value) => match body_structure(&value) {
                    Ok(body_structure) => {
                        replaced(
                            FetchField::BodyStructure,
                            record.body_structure.replace(body_structure),
                        );
                    }
                    Err(error) => {
                        record.diagnostics.push(self.field_failure(
                            FetchField::BodyStructure,
                            span,
                            format!("Could not decode BODYSTRUCTURE: {error}"),
                        ));
                    }
                },
                MsgAtt::Rfc822Size(size) => {
                    replaced(FetchField::Rfc822Size, record.rfc822_size.replace(size));
                }
                MsgAtt::BodySection {
                    section,
                    origin,
                    data,
                } => {
                    record.body_sections.push(BodySection {
                        section: section.to_owned(),
                        origin,
                        data: data.map(|data| data.as_bytes().to_vec()),
                    });
                }
            }
        }

        record
    }

    pub(crate) fn envelope(&self, envelope: syntax::Envelope<'_>) -> Envelope {
        Envelope {
            date: nstring(envelope.date),
            subject: nstring(envelope.subject),
            from: address_list(envelope.from),
            sender: address_list(envelope.sender),
            reply_to: address_list(envelope.reply_to),
            to: address_list(envelope.to),
            cc: address_list(envelope.cc),
            bcc: address_list(envelope.bcc),
            in_reply_to: nstring(envelope.in_reply_to),
            message_id: nstring(envelope.message_id),
        }
    }

    pub(crate) fn address(&self, address: syntax::Address<'_>) -> Address {
        to_address(address)
    }

    /// Decode a body structure requested through its own rule.
    ///
    /// An unexpected shape is an error here, as there is no record to attach it to.
    pub(crate) fn body_structure(
        &self,
        span: &[u8],
        value: &Value<'_>,
    ) -> Result<BodyStructure, ParseError> {
        body_structure(value).map_err(|error| {
            self.field_failure(
                FetchField::BodyStructure,
                span,
                format!("Could not decode BODYSTRUCTURE: {error}"),
            )
        })
    }

    fn field_failure(&self, field: FetchField, span: &[u8], message: String) -> ParseError {
        log::warn!("{message}");

        ParseError::new(ParseErrorKind::PartialFieldDecodeFailure { field }, message)
            .located(self.input, self.input.offset(span))
    }
}

fn replaced<T>(field: FetchField, previous: Option<T>) {
    if previous.is_some() {
        log::debug!("{field} sent more than once, keeping the last one");
    }
}

/// Flags are compared as a set. The server gives no guarantee about their order.
pub(crate) fn flag_set(flags: &[&str]) -> BTreeSet<Flag> {
    flags.iter().copied().map(Flag::from).collect()
}

fn nstring(value: NString<'_>) -> Option<String> {
    value.as_ref().map(IString::to_string_lossy)
}

fn address_list(addresses: Option<Vec<syntax::Address<'_>>>) -> Option<Vec<Address>> {
    addresses.map(|addresses| addresses.into_iter().map(to_address).collect())
}

fn to_address(address: syntax::Address<'_>) -> Address {
    Address {
        name: nstring(address.name),
        source_route: nstring(address.adl),
        mailbox: nstring(address.mailbox),
        host: nstring(address.host),
    }
}

// ----- body structure -----

/// Why a generic list is not a body structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UnexpectedShape {
    /// Path of list indices from the outermost list.
    path: Vec<usize>,
    expected: &'static str,
}

impl UnexpectedShape {
    fn new(index: usize, expected: &'static str) -> Self {
        Self {
            path: vec![index],
            expected,
        }
    }

    fn here(expected: &'static str) -> Self {
        Self {
            path: Vec::new(),
            expected,
        }
    }

    fn within(mut self, index: usize) -> Self {
        self.path.insert(0, index);
        self
    }

    fn relative(mut self, offset: usize) -> Self {
        if let Some(last) = self.path.last_mut() {
            *last += offset;
        }
        self
    }
}

impl Display for UnexpectedShape {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let path = self
            .path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");

        if path.is_empty() {
            write!(f, "expected {}", self.expected)
        } else {
            write!(f, "expected {} at item {path}", self.expected)
        }
    }
}

/// ```abnf
/// body           = "(" (body-type-1part / body-type-mpart) ")"
///
/// body-type-mpart = 1*body SP media-subtype [SP body-ext-mpart]
///
/// body-type-1part = (body-type-basic / body-type-msg / body-type-text) [SP body-ext-1part]
/// body-type-basic = media-basic SP body-fields
/// body-type-msg   = media-message SP body-fields SP envelope SP body SP body-fld-lines
/// body-type-text  = media-text SP body-fields SP body-fld-lines
///
/// body-fields     = body-fld-param SP body-fld-id SP body-fld-desc SP body-fld-enc SP
///                   body-fld-octets
/// ```
///
/// Extension data is skipped.
pub(crate) fn body_structure(value: &Value<'_>) -> Result<BodyStructure, UnexpectedShape> {
    let Value::List(items) = value else {
        return Err(UnexpectedShape::here("list"));
    };

    match items.first() {
        Some(Value::List(_)) => multipart(items),
        _ => single(items),
    }
}

fn multipart(items: &[Value<'_>]) -> Result<BodyStructure, UnexpectedShape> {
    let count = items
        .iter()
        .take_while(|item| matches!(item, Value::List(_)))
        .count();

    let parts = items[..count]
        .iter()
        .enumerate()
        .map(|(index, part)| body_structure(part).map_err(|error| error.within(index)))
        .collect::<Result<Vec<_>, _>>()?;

    let subtype = required_string(items, count, "media-subtype")?;
    let params = match items.get(count + 1) {
        Some(value) => params(value, count + 1)?,
        None => Vec::new(),
    };

    Ok(BodyStructure::Multipart {
        subtype,
        params,
        parts,
    })
}

fn single(items: &[Value<'_>]) -> Result<BodyStructure, UnexpectedShape> {
    let content_type = ContentType {
        media_type: required_string(items, 0, "media-type")?,
        subtype: required_string(items, 1, "media-subtype")?,
        params: match items.get(2) {
            Some(value) => params(value, 2)?,
            None => return Err(UnexpectedShape::new(2, "body-fld-param")),
        },
    };
    let id = optional_string(items, 3, "body-fld-id")?;
    let description = optional_string(items, 4, "body-fld-desc")?;
    let encoding = required_string(items, 5, "body-fld-enc")?;
    let size = body_fld_octets(items, 6)?;

    let (lines, message) = if content_type.media_type.eq_ignore_ascii_case("MESSAGE")
        && (content_type.subtype.eq_ignore_ascii_case("RFC822")
            || content_type.subtype.eq_ignore_ascii_case("GLOBAL"))
    {
        let envelope = match items.get(7) {
            Some(Value::List(fields)) => {
                envelope_from_values(fields).map_err(|error| error.within(7))?
            }
            _ => return Err(UnexpectedShape::new(7, "envelope")),
        };
        let body_structure = match items.get(8) {
            Some(value @ Value::List(_)) => {
                body_structure(value).map_err(|error| error.within(8))?
            }
            _ => return Err(UnexpectedShape::new(8, "body")),
        };
        let lines = required_number(items, 9, "body-fld-lines")?;

        (
            Some(lines),
            Some(Box::new(EncapsulatedMessage {
                envelope,
                body_structure,
            })),
        )
    } else if content_type.media_type.eq_ignore_ascii_case("TEXT") {
        (Some(required_number(items, 7, "body-fld-lines")?), None)
    } else {
        (None, None)
    };

    Ok(BodyStructure::Single {
        content_type,
        id,
        description,
        encoding,
        size,
        lines,
        message,
    })
}

/// `body-fld-param = "(" string SP string *(SP string SP string) ")" / nil`
///
/// # Quirks
///
/// An empty list `()` is accepted and treated like `NIL` (observed in go-imap).
fn params(value: &Value<'_>, index: usize) -> Result<Vec<(String, String)>, UnexpectedShape> {
    match value {
        Value::Nil => Ok(Vec::new()),
        Value::List(items) if items.len() % 2 == 0 => items
            .chunks(2)
            .enumerate()
            .map(|(pair, chunk)| {
                Ok((
                    required_string(chunk, 0, "parameter name")
                        .map_err(|error| error.relative(pair * 2))?,
                    required_string(chunk, 1, "parameter value")
                        .map_err(|error| error.relative(pair * 2))?,
                ))
            })
            .collect::<Result<Vec<_>, UnexpectedShape>>()
            .map_err(|error| error.within(index)),
        _ => Err(UnexpectedShape::new(index, "body-fld-param")),
    }
}

/// Some servers send atoms where strings are expected, e.g., `7BIT`.
fn as_string(value: &Value<'_>) -> Option<String> {
    match value {
        Value::String(string) => Some(string.to_string_lossy()),
        Value::Atom(atom) => Some((*atom).to_owned()),
        _ => None,
    }
}

fn required_string(
    items: &[Value<'_>],
    index: usize,
    expected: &'static str,
) -> Result<String, UnexpectedShape> {
    items
        .get(index)
        .and_then(as_string)
        .ok_or_else(|| UnexpectedShape::new(index, expected))
}

fn optional_string(
    items: &[Value<'_>],
    index: usize,
    expected: &'static str,
) -> Result<Option<String>, UnexpectedShape> {
    match items.get(index) {
        Some(Value::Nil) => Ok(None),
        Some(Value::String(string)) => Ok(Some(string.to_string_lossy())),
        _ => Err(UnexpectedShape::new(index, expected)),
    }
}

fn required_number(
    items: &[Value<'_>],
    index: usize,
    expected: &'static str,
) -> Result<u32, UnexpectedShape> {
    match items.get(index) {
        Some(Value::Number(number)) => Ok(*number),
        _ => Err(UnexpectedShape::new(index, expected)),
    }
}

/// `body-fld-octets = number`
///
/// # Quirks
///
/// A negative number, specifically `-1`, was observed in Dovecot.
fn body_fld_octets(items: &[Value<'_>], index: usize) -> Result<u32, UnexpectedShape> {
    #[cfg(feature = "quirk_rectify_numbers")]
    if let Some(Value::Atom(atom)) = items.get(index) {
        if let Some(digits) = atom.strip_prefix('-') {
            if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()) {
                log::warn!("Rectified negative number to 0");
                return Ok(0);
            }
        }
    }

    required_number(items, index, "body-fld-octets")
}

/// An envelope nested in a `message/rfc822` body structure, read from generic list items.
fn envelope_from_values(fields: &[Value<'_>]) -> Result<Envelope, UnexpectedShape> {
    if fields.len() != 10 {
        return Err(UnexpectedShape::here("10 envelope fields"));
    }

    Ok(Envelope {
        date: optional_string(fields, 0, "env-date")?,
        subject: optional_string(fields, 1, "env-subject")?,
        from: address_list_from_values(fields, 2)?,
        sender: address_list_from_values(fields, 3)?,
        reply_to: address_list_from_values(fields, 4)?,
        to: address_list_from_values(fields, 5)?,
        cc: address_list_from_values(fields, 6)?,
        bcc: address_list_from_values(fields, 7)?,
        in_reply_to: optional_string(fields, 8, "env-in-reply-to")?,
        message_id: optional_string(fields, 9, "env-message-id")?,
    })
}

fn address_list_from_values(
    fields: &[Value<'_>],
    index: usize,
) -> Result<Option<Vec<Address>>, UnexpectedShape> {
    match fields.get(index) {
        Some(Value::Nil) => Ok(None),
        Some(Value::List(addresses)) if !addresses.is_empty() => addresses
            .iter()
            .enumerate()
            .map(|(position, address)| {
                address_from_values(address).map_err(|error| error.within(position))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
            .map_err(|error| error.within(index)),
        _ => Err(UnexpectedShape::new(index, "address list")),
    }
}

fn address_from_values(value: &Value<'_>) -> Result<Address, UnexpectedShape> {
    match value {
        Value::List(parts) if parts.len() == 4 => Ok(Address {
            name: optional_string(parts, 0, "addr-name")?,
            source_route: optional_string(parts, 1, "addr-adl")?,
            mailbox: optional_string(parts, 2, "addr-mailbox")?,
            host: optional_string(parts, 3, "addr-host")?,
        }),
        _ => Err(UnexpectedShape::here("address")),
    }
}
