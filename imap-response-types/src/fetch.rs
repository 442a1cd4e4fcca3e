//! Fetch-related types.

use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter},
    num::NonZeroU32,
};

use chrono::{DateTime, FixedOffset};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{body::BodyStructure, envelope::Envelope, error::ParseError, flag::Flag};

/// The message data of a single `* <n> FETCH (...)` response.
///
/// Absent data items are `None`. A data item that was recognized by the grammar, but whose value
/// could not be decoded, is also `None`, unless an earlier occurrence of the same item was decoded.
/// In both cases, [`FetchResponse::diagnostics`] holds an entry naming the field.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// Message sequence number.
    pub message_number: NonZeroU32,
    pub uid: Option<NonZeroU32>,
    /// `Some` with an empty set for `FLAGS ()`.
    pub flags: Option<BTreeSet<Flag>>,
    pub internal_date: Option<DateTime<FixedOffset>>,
    pub envelope: Option<Envelope>,
    pub body_structure: Option<BodyStructure>,
    /// `RFC822.SIZE`
    pub rfc822_size: Option<u32>,
    /// `BODY[<section>]<<origin>>`, `RFC822`, `RFC822.HEADER`, and `RFC822.TEXT`, in the order
    /// they were received.
    pub body_sections: Vec<BodySection>,
    /// Per-field decode failures.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub diagnostics: Vec<ParseError>,
}

impl FetchResponse {
    /// An empty response for the message `message_number`.
    pub fn new(message_number: NonZeroU32) -> Self {
        Self {
            message_number,
            uid: None,
            flags: None,
            internal_date: None,
            envelope: None,
            body_structure: None,
            rfc822_size: None,
            body_sections: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Find the body section named `section`, e.g., `HEADER` or `1.2.TEXT`.
    ///
    /// `RFC822` is found as the empty section, `RFC822.HEADER` as `HEADER`, and `RFC822.TEXT` as
    /// `TEXT`.
    pub fn body_section(&self, section: &str) -> Option<&BodySection> {
        self.body_sections
            .iter()
            .rev()
            .find(|body_section| body_section.section.eq_ignore_ascii_case(section))
    }

    /// Did any field fail to decode?
    pub fn is_partial(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// One `BODY[<section>]<<origin>> nstring` data item.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BodySection {
    /// Section specifier as sent, without brackets. Empty for the whole message.
    pub section: String,
    /// Octet offset of a partial fetch.
    pub origin: Option<u32>,
    /// `None` when the server sent NIL.
    pub data: Option<Vec<u8>>,
}

/// Names a field of a fetch response that is decoded on its own.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchField {
    Uid,
    Flags,
    InternalDate,
    Envelope,
    BodyStructure,
    Rfc822Size,
    BodySection,
}

impl Display for FetchField {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Self::Uid => "UID",
            Self::Flags => "FLAGS",
            Self::InternalDate => "INTERNALDATE",
            Self::Envelope => "ENVELOPE",
            Self::BodyStructure => "BODYSTRUCTURE",
            Self::Rfc822Size => "RFC822.SIZE",
            Self::BodySection => "BODY[]",
        })
    }
}
