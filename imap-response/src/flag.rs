use std::str::from_utf8;

use nom::{
    character::complete::char,
    combinator::{map_res, opt, recognize},
    sequence::pair,
};

use crate::{
    core::{atom, paren_list0},
    decode::IMAPResult,
};

/// ```abnf
/// flag-fetch = flag / obsolete-flag-recent
///
/// flag = "\Answered" / "\Flagged" / "\Deleted" / "\Seen" / "\Draft" /
///        flag-keyword / flag-extension
///
/// flag-keyword = "$MDNSent" / "$Forwarded" / "$Junk" / "$NotJunk" / "$Phishing" / atom
///
/// flag-extension = "\" atom
/// ```
///
/// Yields the token as sent, including the leading "\\". Classification is left to
/// [`Flag::from`](imap_response_types::flag::Flag).
pub(crate) fn flag_fetch(input: &[u8]) -> IMAPResult<&[u8], &str> {
    map_res(recognize(pair(opt(char('\\')), atom)), from_utf8)(input)
}

/// `flag-list = "(" [flag *(SP flag)] ")"`
pub(crate) fn flag_list(input: &[u8]) -> IMAPResult<&[u8], Vec<&str>> {
    paren_list0(flag_fetch)(input)
}
