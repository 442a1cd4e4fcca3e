//! Top-level response shapes.

use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fetch::FetchResponse;

/// A single response unit sent by the server.
///
/// Shapes are distinguished in this order: FETCH data, tagged status, any other untagged data,
/// and command continuation requests.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `* <n> FETCH (...)`
    Fetch(FetchResponse),
    /// Tagged status responses indicate the completion result (OK, NO, or BAD status) of a
    /// client command, and have a tag matching the command.
    Tagged(TaggedResponse),
    /// Every other response starting with "*".
    Untagged(UntaggedResponse),
    /// `+ ...`
    Continuation(ContinuationRequest),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedResponse {
    pub tag: String,
    pub status: StatusKind,
    /// Response code without brackets, e.g., `UIDNEXT 4392`.
    pub code: Option<String>,
    /// Human-readable text that MAY be displayed to the user.
    pub text: String,
}

/// Untagged status or server data.
///
/// `status` is set for `OK`, `NO`, `BAD`, `PREAUTH`, and `BYE`. For server data, e.g.,
/// `* 23 EXISTS`, `status` and `code` are `None` and `text` holds everything behind "* ".
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UntaggedResponse {
    pub status: Option<StatusKind>,
    pub code: Option<String>,
    pub text: String,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[doc(alias = "Continue")]
pub enum ContinuationRequest {
    Basic { code: Option<String>, text: String },
    /// Decoded challenge, e.g., during `AUTHENTICATE`.
    ///
    /// The grammar can't tell a challenge from human-readable text that happens to be valid
    /// base64, e.g., `+ idle`. Such text is decoded as a challenge. Callers that don't expect
    /// a challenge should treat the request as a plain go-ahead.
    Base64(Vec<u8>),
}

/// Status kind.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Indicates an information from the server.
    ///
    /// * In a tagged response, it indicates successful completion of the associated command.
    /// * In an untagged response, it indicates an information-only message.
    Ok,
    /// Indicates an operational error from the server.
    No,
    /// Indicates a protocol-level error from the server.
    Bad,
    /// Only untagged. The connection has already been authenticated.
    PreAuth,
    /// Only untagged. The server is about to close the connection.
    Bye,
}

impl StatusKind {
    /// Can this kind complete a command?
    pub fn is_completion(&self) -> bool {
        matches!(self, Self::Ok | Self::No | Self::Bad)
    }
}

impl Display for StatusKind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Self::Ok => "OK",
            Self::No => "NO",
            Self::Bad => "BAD",
            Self::PreAuth => "PREAUTH",
            Self::Bye => "BYE",
        })
    }
}

impl Response {
    /// The fetch data, if this is a FETCH response.
    pub fn as_fetch(&self) -> Option<&FetchResponse> {
        match self {
            Self::Fetch(fetch) => Some(fetch),
            _ => None,
        }
    }

    pub fn into_fetch(self) -> Option<FetchResponse> {
        match self {
            Self::Fetch(fetch) => Some(fetch),
            _ => None,
        }
    }
}
