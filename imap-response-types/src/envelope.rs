//! Envelope-related types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The fixed ten-field summary of a message's header, in RFC order.
///
/// Every field is `None` when the server sent NIL. An address list is never empty: it is either
/// `None` or holds at least one [`Address`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Envelope {
    pub date: Option<String>,
    pub subject: Option<String>,
    pub from: Option<Vec<Address>>,
    pub sender: Option<Vec<Address>>,
    pub reply_to: Option<Vec<Address>>,
    pub to: Option<Vec<Address>>,
    pub cc: Option<Vec<Address>>,
    pub bcc: Option<Vec<Address>>,
    pub in_reply_to: Option<String>,
    pub message_id: Option<String>,
}

/// An address structure describes an electronic mail address.
///
/// `mailbox` and `host` together form the address. RFC 5322 group syntax is encoded with a
/// NIL `host`: a non-NIL `mailbox` starts the group (and holds its name), a NIL `mailbox` ends it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Address {
    /// Personal name
    pub name: Option<String>,
    /// At-domain-list (source route)
    pub source_route: Option<String>,
    /// Mailbox name
    pub mailbox: Option<String>,
    /// Host name
    pub host: Option<String>,
}

impl Address {
    /// `mailbox@host`, if both parts are present.
    pub fn email(&self) -> Option<String> {
        match (&self.mailbox, &self.host) {
            (Some(mailbox), Some(host)) => Some(format!("{mailbox}@{host}")),
            _ => None,
        }
    }

    pub fn is_group_start(&self) -> bool {
        self.host.is_none() && self.mailbox.is_some()
    }

    pub fn is_group_end(&self) -> bool {
        self.host.is_none() && self.mailbox.is_none()
    }
}
