use std::str::from_utf8;

use abnf_core::complete::sp;
use imap_response_types::utils::indicators::is_text_char;
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    combinator::{consumed, map, map_res, opt, value},
    sequence::{delimited, preceded, tuple},
};

use crate::{
    body::body,
    core::{nstring, number, nz_number, paren_list0, quoted},
    decode::IMAPResult,
    envelope::envelope,
    flag::flag_list,
    syntax::{Fetch, MsgAtt, Spanned},
};

/// `fetch-response = "*" SP nz-number SP "FETCH" SP msg-att`
pub(crate) fn fetch_response<'a>(
    max_body_depth: usize,
) -> impl Fn(&'a [u8]) -> IMAPResult<&'a [u8], Fetch<'a>> {
    move |input: &'a [u8]| {
        let mut parser = tuple((
            tag(b"*"),
            sp,
            nz_number,
            sp,
            tag_no_case(b"FETCH"),
            sp,
            msg_att(max_body_depth),
        ));

        let (remaining, (_, _, message_number, _, _, _, attributes)) = parser(input)?;

        Ok((
            remaining,
            Fetch {
                message_number,
                attributes,
            },
        ))
    }
}

/// ```abnf
/// msg-att = "("
///             (msg-att-dynamic / msg-att-static) *(SP (msg-att-dynamic / msg-att-static))
///           ")"
/// ```
///
/// An empty list is accepted.
pub(crate) fn msg_att<'a>(
    max_body_depth: usize,
) -> impl Fn(&'a [u8]) -> IMAPResult<&'a [u8], Vec<Spanned<'a, MsgAtt<'a>>>> {
    paren_list0(move |input: &'a [u8]| {
        map(consumed(msg_att_item(max_body_depth)), |(span, node)| {
            Spanned { span, node }
        })(input)
    })
}

/// ```abnf
/// msg-att-dynamic = "FLAGS" SP "(" [flag-fetch *(SP flag-fetch)] ")"
///
/// msg-att-static  = "ENVELOPE" SP envelope /
///                   "INTERNALDATE" SP date-time /
///                   "RFC822" [".HEADER" / ".TEXT"] SP nstring /
///                   "RFC822.SIZE" SP number /
///                   "BODY" ["STRUCTURE"] SP body /
///                   "BODY" section ["<" number ">"] SP nstring /
///                   "UID" SP uniqueid
/// ```
///
/// `date-time` is taken as any quoted string here and decoded later, so that a malformed date
/// does not reject the whole response.
pub(crate) fn msg_att_item<'a>(
    max_body_depth: usize,
) -> impl Fn(&'a [u8]) -> IMAPResult<&'a [u8], MsgAtt<'a>> {
    move |input: &'a [u8]| {
        alt((
            map(
                preceded(tuple((tag_no_case(b"UID"), sp)), nz_number),
                MsgAtt::Uid,
            ),
            map(
                preceded(tuple((tag_no_case(b"FLAGS"), sp)), flag_list),
                MsgAtt::Flags,
            ),
            map(
                preceded(tuple((tag_no_case(b"INTERNALDATE"), sp)), quoted),
                MsgAtt::InternalDate,
            ),
            map(
                preceded(tuple((tag_no_case(b"ENVELOPE"), sp)), envelope),
                MsgAtt::Envelope,
            ),
            map(
                preceded(
                    tuple((tag_no_case(b"BODYSTRUCTURE"), sp)),
                    body(max_body_depth),
                ),
                MsgAtt::BodyStructure,
            ),
            map(
                preceded(tuple((tag_no_case(b"RFC822.SIZE"), sp)), number),
                MsgAtt::Rfc822Size,
            ),
            map(
                tuple((
                    alt((
                        value("HEADER", tag_no_case(b"RFC822.HEADER")),
                        value("TEXT", tag_no_case(b"RFC822.TEXT")),
                        value("", tag_no_case(b"RFC822")),
                    )),
                    sp,
                    nstring,
                )),
                |(section, _, data)| MsgAtt::BodySection {
                    section,
                    origin: None,
                    data,
                },
            ),
            map(
                tuple((
                    tag_no_case(b"BODY"),
                    section,
                    opt(delimited(tag(b"<"), number, tag(b">"))),
                    sp,
                    nstring,
                )),
                |(_, section, origin, _, data)| MsgAtt::BodySection {
                    section,
                    origin,
                    data,
                },
            ),
            map(
                preceded(tuple((tag_no_case(b"BODY"), sp)), body(max_body_depth)),
                MsgAtt::BodyStructure,
            ),
        ))(input)
    }
}

/// `section = "[" [section-spec] "]"`
///
/// The section specifier is kept as sent, e.g., `1.2.HEADER.FIELDS (SUBJECT)`.
pub(crate) fn section(input: &[u8]) -> IMAPResult<&[u8], &str> {
    delimited(
        tag(b"["),
        map_res(
            take_while(|byte| is_text_char(byte) && byte != b']'),
            from_utf8,
        ),
        tag(b"]"),
    )(input)
}
