use std::{borrow::Cow, num::NonZeroU32, str::from_utf8};

use abnf_core::complete::{crlf, dquote, sp};
use base64::{engine::general_purpose::STANDARD as _base64, Engine};
use imap_response_types::utils::{
    indicators::{
        is_astring_char, is_atom_char, is_base64_char, is_quoted_specials, is_text_char,
        is_utf8_non_ascii,
    },
    unescape_quoted,
};
use nom::{
    branch::alt,
    bytes::complete::{escaped, tag, tag_no_case, take, take_while, take_while1},
    character::complete::{digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    error::ParseError,
    sequence::{delimited, terminated, tuple},
};

use crate::{
    decode::{IMAPErrorKind, IMAPParseError, IMAPResult},
    syntax::{IString, NString},
};

// ----- number -----

/// `number = 1*DIGIT`
///
/// Unsigned 32-bit integer (0 <= n < 4,294,967,296)
pub(crate) fn number(input: &[u8]) -> IMAPResult<&[u8], u32> {
    map_res(map_res(digit1, from_utf8), str::parse::<u32>)(input)
}

/// `nz-number = digit-nz *DIGIT`
///
/// Non-zero unsigned 32-bit integer (0 < n < 4,294,967,296)
pub(crate) fn nz_number(input: &[u8]) -> IMAPResult<&[u8], NonZeroU32> {
    map_res(number, NonZeroU32::try_from)(input)
}

// ----- string -----

/// `string = quoted / literal`
pub(crate) fn string(input: &[u8]) -> IMAPResult<&[u8], IString> {
    alt((map(quoted, IString::Quoted), map(literal, IString::Literal)))(input)
}

/// `quoted = DQUOTE *QUOTED-CHAR DQUOTE`
///
/// `QUOTED-CHAR` is extended by RFC 9051 to `UTF8-2 / UTF8-3 / UTF8-4`. The content must be
/// valid UTF-8.
///
/// This function only allocates a new String, when needed, i.e. when
/// quoted chars need to be replaced.
pub(crate) fn quoted(input: &[u8]) -> IMAPResult<&[u8], Cow<str>> {
    let mut parser = tuple((
        dquote,
        map_res(
            recognize(opt(escaped(
                take_while1(is_quoted_char),
                '\\',
                one_of("\\\""),
            ))),
            from_utf8,
        ),
        dquote,
    ));

    let (remaining, (_, quoted, _)) = parser(input)?;

    Ok((remaining, unescape_quoted(quoted)))
}

/// `<any TEXT-CHAR except quoted-specials> / UTF8-2 / UTF8-3 / UTF8-4`
pub(crate) fn is_quoted_char(byte: u8) -> bool {
    (is_text_char(byte) && !is_quoted_specials(byte)) || is_utf8_non_ascii(byte)
}

/// `literal = "{" number "}" CRLF *CHAR8`
///
/// Number represents the number of CHAR8s.
///
/// The octets are taken by count and never inspected, so they may contain CR, LF, and NUL. A
/// response unit must contain the whole literal. If fewer octets are available, this fails
/// immediately with [`IMAPErrorKind::LiteralTruncated`].
pub(crate) fn literal(input: &[u8]) -> IMAPResult<&[u8], &[u8]> {
    let (remaining, length) =
        terminated(delimited(tag(b"{"), number, tag(b"}")), crlf)(input)?;

    if remaining.len() < length as usize {
        log::debug!(
            "Literal announced {length} octets, but only {} are available",
            remaining.len()
        );

        return Err(IMAPParseError::failure(
            input,
            IMAPErrorKind::LiteralTruncated {
                declared: length,
                available: remaining.len(),
            },
        ));
    }

    take(length)(remaining)
}

// ----- atom -----

/// `atom = 1*ATOM-CHAR`
pub(crate) fn atom(input: &[u8]) -> IMAPResult<&[u8], &str> {
    map_res(take_while1(is_atom_char), from_utf8)(input)
}

// ----- nstring ----- nil or string

/// `nstring = string / nil`
pub(crate) fn nstring(input: &[u8]) -> IMAPResult<&[u8], NString> {
    alt((map(string, Some), map(nil, |_| None)))(input)
}

#[inline]
/// `nil = "NIL"`
pub(crate) fn nil(input: &[u8]) -> IMAPResult<&[u8], &[u8]> {
    tag_no_case(b"NIL")(input)
}

// ----- text -----

/// `text = 1*(TEXT-CHAR / UTF8-2 / UTF8-3 / UTF8-4)`
///
/// Human-readable text is decoded lossily.
pub(crate) fn text(input: &[u8]) -> IMAPResult<&[u8], Cow<str>> {
    map(
        take_while1(|byte| is_text_char(byte) || is_utf8_non_ascii(byte)),
        String::from_utf8_lossy,
    )(input)
}

// ----- base64 -----

/// `base64 = *(4base64-char) [base64-terminal]`
pub(crate) fn base64(input: &[u8]) -> IMAPResult<&[u8], Vec<u8>> {
    map_res(
        recognize(tuple((
            take_while(is_base64_char),
            opt(alt((tag("=="), tag("=")))),
        ))),
        |input| _base64.decode(input),
    )(input)
}

// ----- list -----

/// `"(" [item *(SP item)] ")"`
///
/// Unlike `delimited(tag("("), separated_list0(sp, item), tag(")"))`, a list that does not close
/// reports the deeper of the two failures: the item that could not be parsed, or the missing ")".
pub(crate) fn paren_list0<'a, O, F>(item: F) -> impl Fn(&'a [u8]) -> IMAPResult<&'a [u8], Vec<O>>
where
    F: Fn(&'a [u8]) -> IMAPResult<&'a [u8], O>,
{
    move |input: &'a [u8]| {
        let (mut input, _) = tag::<_, _, IMAPParseError<&'a [u8]>>(b"(")(input)?;

        let mut items = Vec::new();

        let stopped = loop {
            let next = if items.is_empty() {
                Ok(input)
            } else {
                sp(input).map(|(remaining, _)| remaining)
            };

            match next.and_then(&item) {
                Ok((remaining, parsed)) => {
                    items.push(parsed);
                    input = remaining;
                }
                Err(nom::Err::Error(error)) => break error,
                Err(error) => return Err(error),
            }
        };

        match tag::<_, _, IMAPParseError<&'a [u8]>>(b")")(input) {
            Ok((remaining, _)) => Ok((remaining, items)),
            Err(nom::Err::Error(error)) => Err(nom::Err::Error(stopped.or(error))),
            Err(error) => Err(error),
        }
    }
}

// ----- tag -----

/// `tag = 1*<any ASTRING-CHAR except "+">`
pub(crate) fn tag_imap(input: &[u8]) -> IMAPResult<&[u8], &str> {
    map_res(
        take_while1(|b| is_astring_char(b) && b != b'+'),
        from_utf8,
    )(input)
}
