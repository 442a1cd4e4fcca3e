//! Named entry points into the grammar.

use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter},
    str::FromStr,
};

use imap_response_types::{
    body::BodyStructure,
    envelope::{Address, Envelope},
    error::ParseError,
    flag::Flag,
    response::Response,
};

/// A grammar rule that can be decoded on its own.
///
/// Use this when the expected shape is already known, e.g., to decode an envelope that was
/// stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Any response, see [`Response`].
    Response,
    /// `* <n> FETCH (...)`
    FetchResponse,
    /// `<tag> OK/NO/BAD ...`
    ResponseTagged,
    /// `* ...`
    ResponseUntagged,
    /// `+ ...`
    ResponseContinuation,
    Envelope,
    Address,
    /// `(<flag> ...)`
    FlagList,
    /// A parenthesized `BODYSTRUCTURE` (or `BODY`) value.
    BodyStructure,
}

impl Rule {
    pub const ALL: [Rule; 9] = [
        Rule::Response,
        Rule::FetchResponse,
        Rule::ResponseTagged,
        Rule::ResponseUntagged,
        Rule::ResponseContinuation,
        Rule::Envelope,
        Rule::Address,
        Rule::FlagList,
        Rule::BodyStructure,
    ];

    /// The name accepted by [`ResponseParser::parse`](crate::ResponseParser::parse).
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Response => "response",
            Rule::FetchResponse => "fetch_response",
            Rule::ResponseTagged => "response_tagged",
            Rule::ResponseUntagged => "response_untagged",
            Rule::ResponseContinuation => "response_continuation",
            Rule::Envelope => "envelope",
            Rule::Address => "address",
            Rule::FlagList => "flag_list",
            Rule::BodyStructure => "body_structure",
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Rule names are matched exactly. The ABNF spelling with "-" is accepted as well, e.g.,
/// `fetch-response`.
impl FromStr for Rule {
    type Err = ParseError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.replace('-', "_");

        Rule::ALL
            .into_iter()
            .find(|rule| rule.name() == normalized)
            .ok_or_else(|| ParseError::unknown_rule(name))
    }
}

/// What a rule decodes to.
///
/// All response rules, including [`Rule::FetchResponse`], yield a [`Response`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Response(Response),
    Envelope(Envelope),
    Address(Address),
    Flags(BTreeSet<Flag>),
    BodyStructure(BodyStructure),
}

impl Parsed {
    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Response(response) => Some(response),
            _ => None,
        }
    }
}
