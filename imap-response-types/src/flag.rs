//! Flag-related types.

use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A message flag as returned in a `FLAGS` data item.
///
/// There are three shapes of flags on the wire:
///
/// * System flags start with "\\". The ones pre-defined by IMAP are matched case-insensitively
///   and get their own variant. Other "\\"-prefixed flags are [`Flag::Extension`]s. Clients MUST
///   accept them.
/// * Keywords start with "$" by convention, e.g., `$Forwarded` or `$MDNSent`.
/// * Everything else is a bare atom, defined by the server or other clients.
///
/// [`Display`] reproduces the wire token, including its leading sigil.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Flag {
    /// Message has been answered (`\Answered`).
    Answered,
    /// Message is "deleted" for removal by later EXPUNGE (`\Deleted`).
    Deleted,
    /// Message has not completed composition (marked as a draft) (`\Draft`).
    Draft,
    /// Message is "flagged" for urgent/special attention (`\Flagged`).
    Flagged,
    /// Message has been read (`\Seen`).
    Seen,
    /// Message is "recently" arrived in this mailbox (`\Recent`).
    ///
    /// Obsolete in IMAP4rev2, but still sent by IMAP4rev1 servers.
    Recent,
    /// A future expansion of a system flag. Holds the name without "\\".
    Extension(String),
    /// A "$"-prefixed keyword. Holds the full token, including "$".
    Keyword(String),
    /// Any other atom.
    Atom(String),
}

impl Flag {
    /// Build a flag from the atom following "\\".
    pub fn system(name: &str) -> Self {
        match name.to_ascii_lowercase().as_ref() {
            "answered" => Self::Answered,
            "deleted" => Self::Deleted,
            "draft" => Self::Draft,
            "flagged" => Self::Flagged,
            "seen" => Self::Seen,
            "recent" => Self::Recent,
            _ => Self::Extension(name.to_owned()),
        }
    }

    /// Build a flag from an atom without "\\".
    pub fn keyword(atom: &str) -> Self {
        if atom.starts_with('$') {
            Self::Keyword(atom.to_owned())
        } else {
            Self::Atom(atom.to_owned())
        }
    }

    /// Is this a "\\"-prefixed flag?
    pub fn is_system(&self) -> bool {
        !matches!(self, Self::Keyword(_) | Self::Atom(_))
    }
}

/// Classify a single token, e.g., `\Seen`, `$Junk`, or `NonJunk`.
///
/// Note: This does not validate the token. Use the decoder for data received from the network.
impl From<&str> for Flag {
    fn from(token: &str) -> Self {
        match token.strip_prefix('\\') {
            Some(name) => Self::system(name),
            None => Self::keyword(token),
        }
    }
}

impl Display for Flag {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Flag::Answered => f.write_str("\\Answered"),
            Flag::Deleted => f.write_str("\\Deleted"),
            Flag::Draft => f.write_str("\\Draft"),
            Flag::Flagged => f.write_str("\\Flagged"),
            Flag::Seen => f.write_str("\\Seen"),
            Flag::Recent => f.write_str("\\Recent"),
            Flag::Extension(name) => write!(f, "\\{}", name),
            Flag::Keyword(keyword) => f.write_str(keyword),
            Flag::Atom(atom) => f.write_str(atom),
        }
    }
}
