use std::num::NonZeroU32;

use imap_response::{
    imap_response_types::{
        flag::Flag,
        response::{ContinuationRequest, Response, StatusKind, TaggedResponse, UntaggedResponse},
    },
    parse_response,
};

/// Server units of a trace. Lines are prefixed with "S: " or "C: ", and client lines are skipped.
///
/// A unit continues on the next line while an announced literal is not complete.
struct ServerUnits<'a> {
    trace: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for ServerUnits<'a> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut unit = Vec::new();
        // Octets of a literal that are still to be read.
        let mut literal = 0;

        loop {
            let input = &self.trace[self.offset..];
            let pos = input.iter().position(|b| *b == b'\n')?;

            let (who, line) = (&input[..3], &input[3..pos]);
            self.offset += pos + 1;

            match who {
                b"C: " if unit.is_empty() => continue,
                b"S: " => {}
                _ => panic!("Line must begin with \"C: \" or \"S: \"."),
            }

            unit.extend_from_slice(line);
            unit.extend_from_slice(b"\r\n");

            // The whole line, including its line break, belongs to the literal.
            if literal >= line.len() + 2 {
                literal -= line.len() + 2;
                continue;
            }

            match announced_literal(line) {
                Some(length) => literal = length,
                None => return Some(unit),
            }
        }
    }
}

fn announced_literal(line: &[u8]) -> Option<usize> {
    let line = line.strip_suffix(b"}")?;
    let start = line.iter().rposition(|b| *b == b'{')?;

    std::str::from_utf8(&line[start + 1..]).ok()?.parse().ok()
}

fn test_units_of_trace(trace: &[u8]) -> Vec<Response> {
    ServerUnits { trace, offset: 0 }
        .map(|unit| {
            println!("S:      {}", String::from_utf8_lossy(&unit).trim());
            let parsed = parse_response(&unit).unwrap();
            println!("Parsed: {:?}", parsed);
            println!();
            parsed
        })
        .collect()
}

#[test]
fn test_from_select() {
    let trace = br#"C: A142 SELECT INBOX
S: * 172 EXISTS
S: * 1 RECENT
S: * OK [UNSEEN 12] Message 12 is first unseen
S: * OK [UIDVALIDITY 3857529045] UIDs valid
S: * OK [UIDNEXT 4392] Predicted next UID
S: * FLAGS (\Answered \Flagged \Deleted \Seen \Draft)
S: * OK [PERMANENTFLAGS (\Deleted \Seen \*)] Limited
S: A142 OK [READ-WRITE] SELECT completed
"#;

    let responses = test_units_of_trace(trace);

    assert_eq!(responses.len(), 8);
    assert_eq!(
        responses[0],
        Response::Untagged(UntaggedResponse {
            status: None,
            code: None,
            text: "172 EXISTS".into(),
        })
    );
    assert_eq!(
        responses[6],
        Response::Untagged(UntaggedResponse {
            status: Some(StatusKind::Ok),
            code: Some(r"PERMANENTFLAGS (\Deleted \Seen \*)".into()),
            text: "Limited".into(),
        })
    );
    assert_eq!(
        responses[7],
        Response::Tagged(TaggedResponse {
            tag: "A142".into(),
            status: StatusKind::Ok,
            code: Some("READ-WRITE".into()),
            text: "SELECT completed".into(),
        })
    );
}

#[test]
fn test_from_fetch() {
    let trace = concat!(
        "C: A654 FETCH 2:4 (FLAGS BODY[HEADER.FIELDS (DATE FROM)])\n",
        "S: * 2 FETCH (FLAGS (\\Deleted \\Seen) BODY[HEADER.FIELDS (DATE FROM)] {46}\n",
        "S: Date: Mon, 7 Feb 1994 21:52:25 -0800 (PST)\n",
        "S: \n",
        "S: )\n",
        "S: * 3 FETCH (FLAGS (\\Deleted) BODY[HEADER.FIELDS (DATE FROM)] NIL)\n",
        "S: * 4 FETCH (FLAGS ($Junk) BODY[HEADER.FIELDS (DATE FROM)] \"\")\n",
        "S: A654 OK FETCH completed\n",
    )
    .as_bytes();

    let responses = test_units_of_trace(trace);
    assert_eq!(responses.len(), 4);

    let fetch = responses[0].as_fetch().unwrap();
    assert_eq!(fetch.message_number, NonZeroU32::new(2).unwrap());
    assert_eq!(
        fetch.flags,
        Some([Flag::Deleted, Flag::Seen].into_iter().collect())
    );
    assert_eq!(
        fetch
            .body_section("HEADER.FIELDS (DATE FROM)")
            .and_then(|section| section.data.as_deref()),
        Some(b"Date: Mon, 7 Feb 1994 21:52:25 -0800 (PST)\r\n\r\n".as_ref())
    );

    let fetch = responses[1].as_fetch().unwrap();
    assert_eq!(
        fetch.body_section("header.fields (date from)").unwrap().data,
        None
    );

    let fetch = responses[2].as_fetch().unwrap();
    assert_eq!(
        fetch.flags,
        Some([Flag::Keyword("$Junk".into())].into_iter().collect())
    );
    assert_eq!(
        fetch.body_section("HEADER.FIELDS (DATE FROM)").unwrap().data,
        Some(vec![])
    );
}

#[test]
fn test_from_authenticate() {
    let trace = br#"C: A001 AUTHENTICATE GSSAPI
S: + YGgGCSqGSIb3EgECAgIBAAD/////6jcyG4GE3KkTzBeBiVHeceP2CWY0SR0fAQAgAAQEBAQ=
C: YDMGCSqGSIb3EgECAgIBAAD/////3LQBHXTpFfZgrejpLlLImPwkhbfa2QteAQAgAG1yYwE=
S: A001 OK GSSAPI authentication successful
"#;

    let responses = test_units_of_trace(trace);
    assert_eq!(responses.len(), 2);
    assert!(matches!(
        &responses[0],
        Response::Continuation(ContinuationRequest::Base64(data)) if data.len() == 53
    ));
}

#[test]
fn test_from_append() {
    let trace = br#"C: A003 APPEND saved-messages (\Seen) {326}
S: + Ready for literal data
S: A003 OK APPEND completed
"#;

    let responses = test_units_of_trace(trace);
    assert_eq!(
        responses[0],
        Response::Continuation(ContinuationRequest::Basic {
            code: None,
            text: "Ready for literal data".into(),
        })
    );
}

#[test]
fn test_from_logout() {
    let trace = br#"C: A023 LOGOUT
S: * BYE IMAP4rev2 Server logging out
S: A023 OK LOGOUT completed
"#;

    let responses = test_units_of_trace(trace);
    assert_eq!(
        responses[0],
        Response::Untagged(UntaggedResponse {
            status: Some(StatusKind::Bye),
            code: None,
            text: "IMAP4rev2 Server logging out".into(),
        })
    );
}
