//! Body structure types.
//!
//! Only structural metadata is modeled. The content of a body part is never decoded.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;

/// The MIME structure of a message, as returned in a `BODYSTRUCTURE` (or `BODY`) data item.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BodyStructure {
    /// A non-multipart body part.
    Single {
        content_type: ContentType,
        /// `body-fld-id`
        id: Option<String>,
        /// `body-fld-desc`
        description: Option<String>,
        /// `body-fld-enc`, e.g., "7BIT" or "BASE64"
        encoding: String,
        /// Size of the body in octets, in its transfer encoding.
        size: u32,
        /// Size of the body in text lines.
        ///
        /// Only present for `text/*` and `message/rfc822`.
        lines: Option<u32>,
        /// Envelope and body structure of an encapsulated `message/rfc822`.
        message: Option<Box<EncapsulatedMessage>>,
    },
    /// A multipart body part, holding at least one nested part.
    Multipart {
        /// E.g., "MIXED" or "ALTERNATIVE"
        subtype: String,
        params: Vec<(String, String)>,
        parts: Vec<BodyStructure>,
    },
}

/// What a `message/rfc822` part carries in addition to a basic part.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncapsulatedMessage {
    pub envelope: Envelope,
    pub body_structure: BodyStructure,
}

/// `media-type "/" media-subtype` plus the body parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType {
    pub media_type: String,
    pub subtype: String,
    pub params: Vec<(String, String)>,
}

impl ContentType {
    /// Does this match `media_type/subtype`, ignoring case?
    pub fn is(&self, media_type: &str, subtype: &str) -> bool {
        self.media_type.eq_ignore_ascii_case(media_type)
            && self.subtype.eq_ignore_ascii_case(subtype)
    }

    /// Value of the parameter `name`, ignoring case, e.g., `charset`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl BodyStructure {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart { .. })
    }

    /// `type/subtype` in lowercase, e.g., `text/plain` or `multipart/mixed`.
    pub fn mime_type(&self) -> String {
        match self {
            Self::Single { content_type, .. } => format!(
                "{}/{}",
                content_type.media_type.to_ascii_lowercase(),
                content_type.subtype.to_ascii_lowercase()
            ),
            Self::Multipart { subtype, .. } => {
                format!("multipart/{}", subtype.to_ascii_lowercase())
            }
        }
    }

    /// Nested parts of a multipart. Empty for a single part.
    pub fn parts(&self) -> &[BodyStructure] {
        match self {
            Self::Single { .. } => &[],
            Self::Multipart { parts, .. } => parts,
        }
    }
}
