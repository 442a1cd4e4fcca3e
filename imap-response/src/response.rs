use abnf_core::complete::sp;
use imap_response_types::{
    response::{ContinuationRequest, StatusKind, TaggedResponse, UntaggedResponse},
    utils::indicators::is_text_char,
};
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    combinator::{all_consuming, eof, map, value},
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::{
    core::{base64, tag_imap, text},
    decode::IMAPResult,
    fetch::fetch_response,
    syntax::Response,
};

// ----- response -----

/// `response = fetch-response / response-tagged / response-untagged / continue-req`
///
/// Alternatives are tried in this order and must consume the whole unit. The first match wins,
/// so `* 1 FETCH (...)` is never reported as untagged data unless the FETCH grammar rejects it.
pub(crate) fn response<'a>(
    max_body_depth: usize,
) -> impl Fn(&'a [u8]) -> IMAPResult<&'a [u8], Response<'a>> {
    move |input: &'a [u8]| {
        alt((
            map(
                all_consuming(fetch_response(max_body_depth)),
                Response::Fetch,
            ),
            map(all_consuming(response_tagged), Response::Tagged),
            map(all_consuming(response_untagged), Response::Untagged),
            map(all_consuming(continue_req), Response::Continuation),
        ))(input)
    }
}

/// `response-tagged = tag SP resp-cond-state`
pub(crate) fn response_tagged(input: &[u8]) -> IMAPResult<&[u8], TaggedResponse> {
    let mut parser = tuple((tag_imap, sp, resp_cond_state));

    let (remaining, (tag, _, (status, code, text))) = parser(input)?;

    Ok((
        remaining,
        TaggedResponse {
            tag: tag.to_owned(),
            status,
            code,
            text,
        },
    ))
}

/// ```abnf
/// response-untagged = "*" SP (resp-cond-untagged / text)
///
/// resp-cond-untagged = ("OK" / "NO" / "BAD" / "PREAUTH" / "BYE") SP resp-text
/// ```
///
/// Server data that is not modeled, e.g., `* 23 EXISTS`, is kept as text.
pub(crate) fn response_untagged(input: &[u8]) -> IMAPResult<&[u8], UntaggedResponse> {
    preceded(
        tuple((tag(b"*"), sp)),
        alt((
            map(all_consuming(resp_cond_untagged), |(status, code, text)| {
                UntaggedResponse {
                    status: Some(status),
                    code,
                    text,
                }
            }),
            map(text, |text| UntaggedResponse {
                status: None,
                code: None,
                text: text.into_owned(),
            }),
        )),
    )(input)
}

/// `resp-cond-state = ("OK" / "NO" / "BAD") SP resp-text`
///
/// Status condition
pub(crate) fn resp_cond_state(
    input: &[u8],
) -> IMAPResult<&[u8], (StatusKind, Option<String>, String)> {
    let mut parser = tuple((
        alt((
            value(StatusKind::Ok, tag_no_case(b"OK")),
            value(StatusKind::No, tag_no_case(b"NO")),
            value(StatusKind::Bad, tag_no_case(b"BAD")),
        )),
        status_text,
    ));

    let (remaining, (status, (code, text))) = parser(input)?;

    Ok((remaining, (status, code, text)))
}

fn resp_cond_untagged(input: &[u8]) -> IMAPResult<&[u8], (StatusKind, Option<String>, String)> {
    let mut parser = tuple((
        alt((
            value(StatusKind::Ok, tag_no_case(b"OK")),
            value(StatusKind::No, tag_no_case(b"NO")),
            value(StatusKind::Bad, tag_no_case(b"BAD")),
            value(StatusKind::PreAuth, tag_no_case(b"PREAUTH")),
            value(StatusKind::Bye, tag_no_case(b"BYE")),
        )),
        status_text,
    ));

    let (remaining, (status, (code, text))) = parser(input)?;

    Ok((remaining, (status, code, text)))
}

/// `SP resp-text` behind a status keyword.
#[cfg(not(feature = "quirk_missing_text"))]
fn status_text(input: &[u8]) -> IMAPResult<&[u8], (Option<String>, String)> {
    preceded(sp, resp_text)(input)
}

/// `SP resp-text` behind a status keyword.
///
/// Some servers send `A1 OK` without any text.
#[cfg(feature = "quirk_missing_text")]
fn status_text(input: &[u8]) -> IMAPResult<&[u8], (Option<String>, String)> {
    alt((
        preceded(sp, resp_text),
        map(eof, |_| {
            log::warn!("Rectified missing `text` to \"\"");

            (None, String::new())
        }),
    ))(input)
}

/// `resp-text = ["[" resp-text-code "]" SP] text`
pub(crate) fn resp_text(input: &[u8]) -> IMAPResult<&[u8], (Option<String>, String)> {
    // When the text starts with "[", we insist on parsing a code.
    // Otherwise, a broken code could be interpreted as text.
    if input.first() == Some(&b'[') {
        tuple((
            map(
                delimited(tag(b"["), resp_text_code, tag(b"]")),
                Some,
            ),
            #[cfg(not(feature = "quirk_missing_text"))]
            preceded(sp, map(text, |text| text.into_owned())),
            #[cfg(feature = "quirk_missing_text")]
            alt((
                preceded(sp, map(text, |text| text.into_owned())),
                map(eof, |_| {
                    log::warn!("Rectified missing `text` to \"\"");

                    String::new()
                }),
            )),
        ))(input)
    } else {
        map(text, |text| (None, text.into_owned()))(input)
    }
}

/// `resp-text-code = atom [SP 1*<any TEXT-CHAR except "]">]`
///
/// Codes are not interpreted and kept as sent, e.g., `UIDNEXT 4392`.
pub(crate) fn resp_text_code(input: &[u8]) -> IMAPResult<&[u8], String> {
    map(
        take_while1(|byte| is_text_char(byte) && byte != b']'),
        |code: &[u8]| String::from_utf8_lossy(code).into_owned(),
    )(input)
}

// ----- continuation -----

/// `continue-req = "+" SP (resp-text / base64)`
///
/// A text that happens to be valid base64 is read as a challenge.
#[cfg(not(feature = "quirk_empty_continue_req"))]
pub(crate) fn continue_req(input: &[u8]) -> IMAPResult<&[u8], ContinuationRequest> {
    preceded(tuple((tag(b"+"), sp)), continue_req_content)(input)
}

/// `continue-req = "+" SP (resp-text / base64)`
///
/// A text that happens to be valid base64 is read as a challenge. Some servers send a bare "+".
#[cfg(feature = "quirk_empty_continue_req")]
pub(crate) fn continue_req(input: &[u8]) -> IMAPResult<&[u8], ContinuationRequest> {
    preceded(
        tag(b"+"),
        alt((
            preceded(sp, continue_req_content),
            map(eof, |_| {
                log::warn!("Rectified empty continuation request");

                ContinuationRequest::Basic {
                    code: None,
                    text: String::new(),
                }
            }),
        )),
    )(input)
}

fn continue_req_content(input: &[u8]) -> IMAPResult<&[u8], ContinuationRequest> {
    alt((
        map(
            terminated(base64, eof),
            ContinuationRequest::Base64,
        ),
        map(resp_text, |(code, text)| ContinuationRequest::Basic {
            code,
            text,
        }),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::known_mismatch_test_parse;

    #[test]
    fn test_parse_response_tagged() {
        let tests = [
            (
                b"A1 OK done".as_ref(),
                TaggedResponse {
                    tag: "A1".into(),
                    status: StatusKind::Ok,
                    code: None,
                    text: "done".into(),
                },
            ),
            (
                b"a002 no [TRYCREATE] No such mailbox",
                TaggedResponse {
                    tag: "a002".into(),
                    status: StatusKind::No,
                    code: Some("TRYCREATE".into()),
                    text: "No such mailbox".into(),
                },
            ),
            (
                b"A3 BAD [BADCHARSET (UTF-8)] unsupported",
                TaggedResponse {
                    tag: "A3".into(),
                    status: StatusKind::Bad,
                    code: Some("BADCHARSET (UTF-8)".into()),
                    text: "unsupported".into(),
                },
            ),
        ];

        for (test, expected) in tests {
            let (rem, got) = response_tagged(test).unwrap();
            assert!(rem.is_empty());
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_parse_response_tagged_mismatch() {
        known_mismatch_test_parse(b"A1  OK done", response_tagged);
        known_mismatch_test_parse(b"+ OK done", response_tagged);
        known_mismatch_test_parse(b"A1 MAYBE done", response_tagged);
        known_mismatch_test_parse(b"A1 OK [UIDNEXT 1", response_tagged);
    }

    #[test]
    fn test_parse_response_untagged() {
        let tests = [
            (
                b"* OK [UIDVALIDITY 3857529045] UIDs valid".as_ref(),
                UntaggedResponse {
                    status: Some(StatusKind::Ok),
                    code: Some("UIDVALIDITY 3857529045".into()),
                    text: "UIDs valid".into(),
                },
            ),
            (
                b"* PREAUTH IMAP4rev2 server logged in as Smith",
                UntaggedResponse {
                    status: Some(StatusKind::PreAuth),
                    code: None,
                    text: "IMAP4rev2 server logged in as Smith".into(),
                },
            ),
            (
                b"* BYE Autologout; idle for too long",
                UntaggedResponse {
                    status: Some(StatusKind::Bye),
                    code: None,
                    text: "Autologout; idle for too long".into(),
                },
            ),
            (
                b"* 23 EXISTS",
                UntaggedResponse {
                    status: None,
                    code: None,
                    text: "23 EXISTS".into(),
                },
            ),
            // Not a status keyword.
            (
                b"* OKAY then",
                UntaggedResponse {
                    status: None,
                    code: None,
                    text: "OKAY then".into(),
                },
            ),
        ];

        for (test, expected) in tests {
            let (rem, got) = response_untagged(test).unwrap();
            assert!(rem.is_empty());
            assert_eq!(got, expected);
        }

        known_mismatch_test_parse(b"*OK done", response_untagged);
        known_mismatch_test_parse(b"* ", response_untagged);
    }

    #[test]
    fn test_parse_resp_text_quirk() {
        #[cfg(not(feature = "quirk_missing_text"))]
        {
            assert!(resp_text(b"[IMAP4rev1]").is_err());
            assert!(resp_text(b"[IMAP4rev1] ").is_err());
            assert!(response_tagged(b"A1 OK").is_err());
        }

        #[cfg(feature = "quirk_missing_text")]
        {
            let (_, (code, text)) = resp_text(b"[IMAP4rev1]").unwrap();
            assert_eq!(code.as_deref(), Some("IMAP4rev1"));
            assert_eq!(text, "");
            assert!(resp_text(b"[IMAP4rev1] ").is_err());

            let (_, got) = response_tagged(b"A1 OK").unwrap();
            assert_eq!(got.text, "");
        }
    }

    #[test]
    fn test_parse_continue_req() {
        let tests = [
            (
                b"+ idling".as_ref(),
                ContinuationRequest::Basic {
                    code: None,
                    text: "idling".into(),
                },
            ),
            (
                b"+ Ready for additional command text",
                ContinuationRequest::Basic {
                    code: None,
                    text: "Ready for additional command text".into(),
                },
            ),
            (
                b"+ [ALERT] Go ahead",
                ContinuationRequest::Basic {
                    code: Some("ALERT".into()),
                    text: "Go ahead".into(),
                },
            ),
            (
                b"+ YWxpY2U=",
                ContinuationRequest::Base64(b"alice".to_vec()),
            ),
            // Text that is valid base64 is taken as a challenge.
            (b"+ idle", ContinuationRequest::Base64(vec![0x89, 0xd9, 0x5e])),
        ];

        for (test, expected) in tests {
            let (rem, got) = continue_req(test).unwrap();
            assert!(rem.is_empty());
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_parse_continue_req_quirk() {
        #[cfg(not(feature = "quirk_empty_continue_req"))]
        {
            known_mismatch_test_parse(b"+", continue_req);
        }

        #[cfg(feature = "quirk_empty_continue_req")]
        {
            let (rem, got) = continue_req(b"+").unwrap();
            assert!(rem.is_empty());
            assert_eq!(
                got,
                ContinuationRequest::Basic {
                    code: None,
                    text: String::new(),
                }
            );
        }

        // `base64` may be empty.
        let (_, got) = continue_req(b"+ ").unwrap();
        assert_eq!(got, ContinuationRequest::Base64(vec![]));
    }

    #[test]
    fn test_parse_response_order() {
        let tests: [(&[u8], fn(&Response) -> bool); 5] = [
            (b"* 1 FETCH (UID 1)", |got| matches!(got, Response::Fetch(_))),
            (b"A1 OK done", |got| matches!(got, Response::Tagged(_))),
            (b"* OK done", |got| matches!(got, Response::Untagged(_))),
            // The FETCH grammar rejects it, untagged text does not.
            (b"* 1 FETCH (UID abc)", |got| {
                matches!(got, Response::Untagged(UntaggedResponse { status: None, .. }))
            }),
            (b"+ go", |got| matches!(got, Response::Continuation(_))),
        ];

        for (test, check) in tests {
            let (rem, got) = response(8)(test).unwrap();
            assert!(rem.is_empty());
            assert!(check(&got), "unexpected {got:?}");
        }

        known_mismatch_test_parse(b"", response(8));
        known_mismatch_test_parse(b"A1", response(8));
    }
}
