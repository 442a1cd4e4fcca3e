use abnf_core::complete::sp;
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::map,
    multi::many1,
    sequence::{delimited, tuple},
};
#[cfg(feature = "quirk_spaces_between_addresses")]
use nom::{combinator::opt, sequence::preceded};

use crate::{
    core::{nil, nstring},
    decode::IMAPResult,
    syntax::{Address, Envelope},
};

/// ```abnf
/// envelope = "("
///              env-date SP
///              env-subject SP
///              env-from SP
///              env-sender SP
///              env-reply-to SP
///              env-to SP
///              env-cc SP
///              env-bcc SP
///              env-in-reply-to SP
///              env-message-id
///            ")"
/// ```
///
/// `env-date`, `env-subject`, `env-in-reply-to`, and `env-message-id` are `nstring`s. The
/// remaining six fields are address lists.
pub(crate) fn envelope(input: &[u8]) -> IMAPResult<&[u8], Envelope> {
    let mut parser = delimited(
        tag(b"("),
        tuple((
            nstring,
            sp,
            nstring,
            sp,
            address_list,
            sp,
            address_list,
            sp,
            address_list,
            sp,
            address_list,
            sp,
            address_list,
            sp,
            address_list,
            sp,
            nstring,
            sp,
            nstring,
        )),
        tag(b")"),
    );

    let (
        remaining,
        (
            date,
            _,
            subject,
            _,
            from,
            _,
            sender,
            _,
            reply_to,
            _,
            to,
            _,
            cc,
            _,
            bcc,
            _,
            in_reply_to,
            _,
            message_id,
        ),
    ) = parser(input)?;

    Ok((
        remaining,
        Envelope {
            date,
            subject,
            from,
            sender,
            reply_to,
            to,
            cc,
            bcc,
            in_reply_to,
            message_id,
        },
    ))
}

/// `env-from = "(" 1*address ")" / nil` (and friends)
pub(crate) fn address_list(input: &[u8]) -> IMAPResult<&[u8], Option<Vec<Address>>> {
    alt((
        #[cfg(not(feature = "quirk_spaces_between_addresses"))]
        map(delimited(tag(b"("), many1(address), tag(b")")), Some),
        #[cfg(feature = "quirk_spaces_between_addresses")]
        map(
            delimited(
                tag(b"("),
                many1(preceded(
                    map(opt(sp), |maybe_sp| {
                        if maybe_sp.is_some() {
                            log::warn!("Rectified space between addresses");
                        }
                    }),
                    address,
                )),
                tag(b")"),
            ),
            Some,
        ),
        map(nil, |_| None),
    ))(input)
}

/// `address = "(" addr-name SP addr-adl SP addr-mailbox SP addr-host ")"`
pub(crate) fn address(input: &[u8]) -> IMAPResult<&[u8], Address> {
    let mut parser = delimited(
        tag(b"("),
        tuple((nstring, sp, nstring, sp, nstring, sp, nstring)),
        tag(b")"),
    );

    let (remaining, (name, _, adl, _, mailbox, _, host)) = parser(input)?;

    Ok((
        remaining,
        Address {
            name,
            adl,
            mailbox,
            host,
        },
    ))
}
