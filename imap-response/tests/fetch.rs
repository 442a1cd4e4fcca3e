use std::{collections::BTreeSet, num::NonZeroU32};

use imap_response::{
    imap_response_types::{
        chrono::DateTime,
        error::ParseErrorKind,
        fetch::FetchField,
        flag::Flag,
        response::Response,
    },
    parse, parse_envelope, parse_fetch_response, parse_response, Parsed,
};

#[test]
fn test_end_to_end() {
    let input =
        r#"* 1 FETCH (UID 123 FLAGS (\Seen) INTERNALDATE "16-Aug-2025 14:06:39 +0000")"#;

    let fetch = parse_fetch_response(input).unwrap();

    assert_eq!(fetch.message_number.get(), 1);
    assert_eq!(fetch.uid, NonZeroU32::new(123));
    assert_eq!(fetch.flags, Some(BTreeSet::from([Flag::Seen])));
    assert_eq!(
        fetch.internal_date,
        Some(DateTime::parse_from_rfc3339("2025-08-16T14:06:39+00:00").unwrap())
    );
    assert!(fetch.diagnostics.is_empty());
}

#[test]
fn test_message_number() {
    for message_number in [1u32, 7, 42, 65_535, u32::MAX] {
        let input = format!("* {message_number} FETCH (FLAGS ())");

        let fetch = parse_fetch_response(&input).unwrap();
        assert_eq!(fetch.message_number.get(), message_number);
    }
}

#[test]
fn test_uid_and_flags_round_trip() {
    let tests: [(u32, &[&str]); 4] = [
        (1, &[]),
        (4827313, &["\\Seen"]),
        (17, &["\\Answered", "\\Flagged", "$Forwarded", "NonJunk"]),
        (u32::MAX, &["\\Draft", "\\Deleted", "\\Recent", "\\X-Custom"]),
    ];

    for (uid, flags) in tests {
        let input = format!("* 3 FETCH (UID {uid} FLAGS ({}))", flags.join(" "));

        let fetch = parse_fetch_response(&input).unwrap();

        let expected: BTreeSet<Flag> = flags.iter().copied().map(Flag::from).collect();
        assert_eq!(fetch.uid.map(NonZeroU32::get), Some(uid));
        assert_eq!(fetch.flags, Some(expected));

        // The order of flags is not significant.
        let reversed: Vec<&str> = flags.iter().rev().copied().collect();
        let input = format!("* 3 FETCH (FLAGS ({}) UID {uid})", reversed.join(" "));
        assert_eq!(parse_fetch_response(&input).unwrap(), fetch);
    }
}

#[test]
fn test_flags_keep_their_sigil() {
    let fetch = parse_fetch_response(r#"* 1 FETCH (FLAGS (\Seen $Seen Seen))"#).unwrap();

    let flags = fetch.flags.unwrap();
    assert_eq!(flags.len(), 3);
    assert!(flags.contains(&Flag::Seen));
    assert!(flags.contains(&Flag::Keyword("$Seen".into())));
    assert!(flags.contains(&Flag::Atom("Seen".into())));
}

#[test]
fn test_idempotence() {
    let input = b"* 12 FETCH (UID 7 FLAGS (\\Seen) RFC822.SIZE 44 BODY[] {5}\r\nAB\r\nC ENVELOPE (NIL \"Hi\" NIL NIL NIL NIL NIL NIL NIL NIL))";

    let first = parse_response(input);
    let second = parse_response(input);

    assert!(first.is_ok());
    assert_eq!(first, second);
}

#[test]
fn test_empty_flags_are_not_absent() {
    let fetch = parse_fetch_response("* 1 FETCH (FLAGS ())").unwrap();
    assert_eq!(fetch.flags, Some(BTreeSet::new()));

    let fetch = parse_fetch_response("* 1 FETCH (UID 5)").unwrap();
    assert_eq!(fetch.flags, None);
}

#[test]
fn test_literal_is_opaque() {
    // The literal holds an embedded CRLF and would be invalid syntax if it was not skipped by
    // length.
    let input = b"* 2 FETCH (BODY[HEADER] {5}\r\nAB\r\nC UID 9)";

    let fetch = parse_fetch_response(input).unwrap();

    assert_eq!(fetch.uid, NonZeroU32::new(9));
    assert_eq!(
        fetch
            .body_section("HEADER")
            .and_then(|section| section.data.as_deref()),
        Some(b"AB\r\nC".as_ref())
    );

    let input = b"* 2 FETCH (BODY[] {7}\r\n) UID 1 UID 3)";

    let fetch = parse_fetch_response(input).unwrap();
    assert_eq!(fetch.uid, NonZeroU32::new(3));
    assert_eq!(
        fetch.body_section("").unwrap().data.as_deref(),
        Some(b") UID 1".as_ref())
    );
}

#[test]
fn test_literal_in_envelope() {
    let envelope =
        parse_envelope(b"(NIL {11}\r\nHello\r\n\"you NIL NIL NIL NIL NIL NIL NIL NIL)").unwrap();

    assert_eq!(envelope.date, None);
    assert_eq!(envelope.subject.as_deref(), Some("Hello\r\n\"you"));
    assert_eq!(envelope.from, None);
}

#[test]
fn test_truncated_literal() {
    let error = parse_fetch_response(b"* 2 FETCH (BODY[] {10}\r\nAB\r\nC)").unwrap_err();

    assert_eq!(
        error.kind(),
        &ParseErrorKind::TruncatedLiteral {
            declared: 10,
            available: 6
        }
    );
    assert!(error.position().is_some());
}

#[test]
fn test_malformed_uid() {
    for input in ["* FETCH (UID abc)", "* 1 FETCH (UID abc)", "* 1 FETCH (UID 0)"] {
        let error = parse_fetch_response(input).unwrap_err();

        assert_eq!(error.kind(), &ParseErrorKind::GrammarMismatch, "{input}");
        assert!(error.position().is_some());
        assert!(!error.message().is_empty());
    }
}

#[test]
fn test_whitespace_is_significant() {
    let tests = [
        "* 1  FETCH (UID 1)",
        "* 1 FETCH ( UID 1)",
        "* 1 FETCH (UID 1 )",
        "* 1 FETCH (UID  1)",
        "* 1 FETCH (UID 1  FLAGS ())",
        "* 1 FETCH(UID 1)",
    ];

    for input in tests {
        assert!(parse_fetch_response(input).is_err(), "{input}");
    }

    // Surrounding whitespace is not.
    assert!(parse_fetch_response("\r\n * 1 FETCH (UID 1)\t\r\n").is_ok());
}

#[test]
fn test_impossible_internal_date_is_a_diagnostic() {
    let tests = [
        r#"* 1 FETCH (UID 1 INTERNALDATE "31-Feb-2025 14:06:39 +0000")"#,
        r#"* 1 FETCH (UID 1 INTERNALDATE "16-Aug-2025 25:06:39 +0000")"#,
        r#"* 1 FETCH (UID 1 INTERNALDATE "2025-08-16T14:06:39Z")"#,
        r#"* 1 FETCH (UID 1 INTERNALDATE "")"#,
    ];

    for input in tests {
        let fetch = parse_fetch_response(input).unwrap();

        assert_eq!(fetch.uid, NonZeroU32::new(1));
        assert_eq!(fetch.internal_date, None);
        assert_eq!(fetch.diagnostics.len(), 1, "{input}");
        assert_eq!(
            fetch.diagnostics[0].kind(),
            &ParseErrorKind::PartialFieldDecodeFailure {
                field: FetchField::InternalDate
            }
        );
        assert_eq!(fetch.diagnostics[0].position(), Some(17));
    }
}

#[test]
fn test_space_padded_day() {
    let fetch =
        parse_fetch_response(r#"* 1 FETCH (INTERNALDATE " 6-Aug-2025 04:06:39 -0700")"#).unwrap();

    assert_eq!(
        fetch.internal_date,
        Some(DateTime::parse_from_rfc3339("2025-08-06T04:06:39-07:00").unwrap())
    );
}

#[test]
fn test_envelope_and_body_structure() {
    let input = br#"* 12 FETCH (FLAGS (\Seen) INTERNALDATE "17-Jul-1996 02:44:25 -0700" RFC822.SIZE 4286 ENVELOPE ("Wed, 17 Jul 1996 02:23:25 -0700 (PDT)" "IMAP4rev1 WG mtg summary and minutes" (("Terry Gray" NIL "gray" "cac.washington.edu")) (("Terry Gray" NIL "gray" "cac.washington.edu")) (("Terry Gray" NIL "gray" "cac.washington.edu")) ((NIL NIL "imap" "cac.washington.edu")) ((NIL NIL "minutes" "CNRI.Reston.VA.US")("John Klensin" NIL "KLENSIN" "MIT.EDU")) NIL NIL "<B27397-0100000@cac.washington.edu>") BODY ("TEXT" "PLAIN" ("CHARSET" "US-ASCII") NIL NIL "7BIT" 3028 92))"#;

    let fetch = parse_fetch_response(input).unwrap();

    assert_eq!(fetch.rfc822_size, Some(4286));

    let envelope = fetch.envelope.unwrap();
    assert_eq!(
        envelope.subject.as_deref(),
        Some("IMAP4rev1 WG mtg summary and minutes")
    );
    let cc = envelope.cc.unwrap();
    assert_eq!(cc.len(), 2);
    assert_eq!(cc[1].name.as_deref(), Some("John Klensin"));
    assert_eq!(cc[1].email().as_deref(), Some("KLENSIN@MIT.EDU"));
    assert_eq!(envelope.bcc, None);
    assert_eq!(
        envelope.message_id.as_deref(),
        Some("<B27397-0100000@cac.washington.edu>")
    );

    let body_structure = fetch.body_structure.unwrap();
    assert!(!body_structure.is_multipart());
    assert_eq!(body_structure.mime_type(), "text/plain");
}

#[test]
fn test_multipart_body_structure() {
    let input = br#"* 5 FETCH (BODYSTRUCTURE (("TEXT" "PLAIN" ("CHARSET" "UTF-8") NIL NIL "7BIT" 1152 23)("APPLICATION" "PDF" ("NAME" "report.pdf") "<960723163407.20117h@cac.washington.edu>" "Compiled report" "BASE64" 4554 NIL ("ATTACHMENT" ("FILENAME" "report.pdf")) NIL NIL) "MIXED" ("BOUNDARY" "----=_Part_0") NIL NIL NIL))"#;

    let fetch = parse_fetch_response(input).unwrap();
    let body_structure = fetch.body_structure.unwrap();

    assert!(body_structure.is_multipart());
    assert_eq!(body_structure.mime_type(), "multipart/mixed");
    assert_eq!(
        body_structure
            .parts()
            .iter()
            .map(|part| part.mime_type())
            .collect::<Vec<_>>(),
        ["text/plain", "application/pdf"]
    );
}

#[test]
fn test_body_structure_with_empty_params() {
    let fetch =
        parse_fetch_response(r#"* 1 FETCH (BODYSTRUCTURE ("TEXT" "PLAIN" () NIL NIL "7BIT" 10 1))"#)
            .unwrap();

    assert!(!fetch.is_partial());
    assert_eq!(fetch.body_structure.unwrap().mime_type(), "text/plain");
}

#[cfg(feature = "quirk_rectify_numbers")]
#[test]
fn test_body_structure_with_negative_size() {
    let fetch = parse_fetch_response(
        r#"* 1 FETCH (BODYSTRUCTURE ("TEXT" "PLAIN" ("CHARSET" "UTF-8") NIL NIL "7BIT" -1 1))"#,
    )
    .unwrap();

    assert!(!fetch.is_partial());
    assert_eq!(fetch.body_structure.unwrap().mime_type(), "text/plain");
}

#[test]
fn test_response_dispatch() {
    let tests = [
        ("* 1 FETCH (UID 1)", "fetch"),
        ("A142 OK [READ-WRITE] SELECT completed", "tagged"),
        ("* OK [UNSEEN 12] Message 12 is first unseen", "untagged"),
        ("* 172 EXISTS", "untagged"),
        ("+ Ready for literal data", "continuation"),
    ];

    for (input, expected) in tests {
        let got = match parse_response(input).unwrap() {
            Response::Fetch(_) => "fetch",
            Response::Tagged(_) => "tagged",
            Response::Untagged(_) => "untagged",
            Response::Continuation(_) => "continuation",
        };

        assert_eq!(got, expected, "{input}");
    }
}

#[test]
fn test_parse_by_rule_name() {
    let parsed = parse("* 9 FETCH (UID 90)", Some("fetch_response")).unwrap();
    let fetch = parsed.into_response().and_then(Response::into_fetch).unwrap();
    assert_eq!(fetch.uid, NonZeroU32::new(90));

    // A tagged response is not a FETCH response.
    let error = parse("A1 OK done", Some("fetch_response")).unwrap_err();
    assert_eq!(error.kind(), &ParseErrorKind::GrammarMismatch);

    let parsed = parse(r#"(\Seen)"#, Some("flag_list")).unwrap();
    assert_eq!(parsed, Parsed::Flags(BTreeSet::from([Flag::Seen])));

    let error = parse("* 1 FETCH (UID 1)", Some("fetch_responses")).unwrap_err();
    assert_eq!(
        error.kind(),
        &ParseErrorKind::UnknownRule {
            rule: "fetch_responses".into()
        }
    );
    assert_eq!(error.position(), None);
    assert_eq!(error.line(), None);
    assert_eq!(error.column(), None);
}

#[test]
fn test_adversarial_input_does_not_panic() {
    let tests: [&[u8]; 8] = [
        b"",
        b"\xff\xfe\xfd",
        b"* 1 FETCH (",
        b"* 1 FETCH (BODY[] {4294967295}\r\n",
        b"* 1 FETCH (BODY[] {99999999999999999999}\r\n",
        b"* 1 FETCH (UID 1 FLAGS (\\Seen",
        b"* 4294967296 FETCH (UID 1)",
        b"* 1 FETCH (INTERNALDATE \"\xc3\")",
    ];

    for input in tests {
        assert!(parse_fetch_response(input).is_err());
        // Never an internal error.
        if let Err(error) = parse_response(input) {
            assert_ne!(error.kind(), &ParseErrorKind::Internal);
        }
    }

    let deep = format!("* 1 FETCH (BODYSTRUCTURE {})", "(".repeat(100_000));
    let error = parse_fetch_response(deep).unwrap_err();
    assert_eq!(error.kind(), &ParseErrorKind::RecursionLimitExceeded);
}
