//! Syntax tree produced by the grammar.
//!
//! Nodes borrow from the input. [`crate::transform`] turns them into owned records.

use std::{borrow::Cow, num::NonZeroU32};

/// `string = quoted / literal`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IString<'a> {
    /// Unescaped content.
    Quoted(Cow<'a, str>),
    /// Opaque octets, taken by length.
    Literal(&'a [u8]),
}

impl<'a> IString<'a> {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Quoted(quoted) => quoted.as_bytes(),
            Self::Literal(literal) => literal,
        }
    }

    /// Literals are not guaranteed to be UTF-8 and are decoded lossily.
    pub(crate) fn to_string_lossy(&self) -> String {
        match self {
            Self::Quoted(quoted) => quoted.to_string(),
            Self::Literal(literal) => String::from_utf8_lossy(literal).into_owned(),
        }
    }
}

/// `nstring = string / nil`
pub(crate) type NString<'a> = Option<IString<'a>>;

/// Generic item of a parenthesized list, as found in `BODYSTRUCTURE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Value<'a> {
    Nil,
    Number(u32),
    String(IString<'a>),
    Atom(&'a str),
    List(Vec<Value<'a>>),
}

/// `address = "(" addr-name SP addr-adl SP addr-mailbox SP addr-host ")"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Address<'a> {
    pub name: NString<'a>,
    pub adl: NString<'a>,
    pub mailbox: NString<'a>,
    pub host: NString<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Envelope<'a> {
    pub date: NString<'a>,
    pub subject: NString<'a>,
    pub from: Option<Vec<Address<'a>>>,
    pub sender: Option<Vec<Address<'a>>>,
    pub reply_to: Option<Vec<Address<'a>>>,
    pub to: Option<Vec<Address<'a>>>,
    pub cc: Option<Vec<Address<'a>>>,
    pub bcc: Option<Vec<Address<'a>>>,
    pub in_reply_to: NString<'a>,
    pub message_id: NString<'a>,
}

/// A single FETCH data item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MsgAtt<'a> {
    Uid(NonZeroU32),
    /// Flag tokens, including their sigil.
    Flags(Vec<&'a str>),
    /// Content of the quoted string. Decoded as a date-time by the transformer.
    InternalDate(Cow<'a, str>),
    Envelope(Envelope<'a>),
    /// `BODYSTRUCTURE` and the non-extensible `BODY`.
    BodyStructure(Value<'a>),
    Rfc822Size(u32),
    BodySection {
        section: &'a str,
        origin: Option<u32>,
        data: NString<'a>,
    },
}

/// A FETCH data item and the input it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Spanned<'a, T> {
    pub span: &'a [u8],
    pub node: T,
}

/// `"*" SP nz-number SP "FETCH" SP msg-att`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fetch<'a> {
    pub message_number: NonZeroU32,
    pub attributes: Vec<Spanned<'a, MsgAtt<'a>>>,
}

/// `response = fetch-response / response-tagged / response-untagged / continue-req`
///
/// Status shapes carry no borrowed data and are built by the grammar directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Response<'a> {
    Fetch(Fetch<'a>),
    Tagged(imap_response_types::response::TaggedResponse),
    Untagged(imap_response_types::response::UntaggedResponse),
    Continuation(imap_response_types::response::ContinuationRequest),
}
