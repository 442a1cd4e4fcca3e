use std::num::NonZeroU32;

use imap_response_types::{
    envelope::{Address, Envelope},
    fetch::FetchResponse,
    flag::Flag,
    response::{Response, StatusKind, TaggedResponse},
};

fn main() {
    let mut fetch = FetchResponse::new(NonZeroU32::new(1).unwrap());
    fetch.uid = NonZeroU32::new(123);
    fetch.flags = Some([Flag::Seen, Flag::from("$Forwarded")].into_iter().collect());
    fetch.envelope = Some(Envelope {
        subject: Some("Hello".into()),
        from: Some(vec![Address {
            name: Some("Alice".into()),
            source_route: None,
            mailbox: Some("alice".into()),
            host: Some("example.org".into()),
        }]),
        ..Envelope::default()
    });

    let rsp = Response::Fetch(fetch);
    println!("{:?}\n{}", rsp, serde_json::to_string_pretty(&rsp).unwrap());

    let rsp = Response::Tagged(TaggedResponse {
        tag: "A1".into(),
        status: StatusKind::Ok,
        code: None,
        text: "FETCH completed".into(),
    });
    println!("{:?}\n{}", rsp, serde_json::to_string_pretty(&rsp).unwrap());
}
