//! # Decoded IMAP4rev2 responses
//!
//! imap-response-types holds the records produced by the `imap-response` decoder:
//! [`FetchResponse`](fetch::FetchResponse), [`Envelope`](envelope::Envelope),
//! [`Address`](envelope::Address), [`Flag`](flag::Flag), [`BodyStructure`](body::BodyStructure),
//! and the top-level [`Response`](response::Response) shapes.
//!
//! Every record is owned. A decoder call produces fresh values that borrow nothing from the
//! input buffer, so they can be moved across tasks and threads freely.
//!
//! Decoding never panics on network input. Instead, it yields a [`ParseResult`](error::ParseResult),
//! i.e., either the record or a [`ParseError`](error::ParseError) describing what went wrong and,
//! when known, where.
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeSet;
//!
//! use imap_response_types::flag::Flag;
//!
//! let flags: BTreeSet<Flag> = ["\\Seen", "$Forwarded", "\\seen"]
//!     .into_iter()
//!     .map(Flag::from)
//!     .collect();
//!
//! // System flags are case-insensitive.
//! assert_eq!(flags.len(), 2);
//! assert!(flags.contains(&Flag::Seen));
//! ```
//!
//! # Features
//!
//! | Feature | Description                                                    | Enabled by default |
//! |---------|----------------------------------------------------------------|--------------------|
//! | serde   | Derive `serde`s `Serialize` and `Deserialize` implementations. | No                 |

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod body;
pub mod envelope;
pub mod error;
pub mod fetch;
pub mod flag;
pub mod response;
pub mod utils;

pub use chrono;
