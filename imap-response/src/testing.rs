use std::fmt::Debug;

use imap_response_types::utils::escape_byte_string;

use crate::decode::IMAPResult;

pub(crate) fn known_answer_test_parse<'a, O, P>(
    (test, expected_remainder, expected_object): (&'a [u8], &[u8], O),
    parser: P,
) where
    O: Debug + Eq + 'a,
    P: Fn(&'a [u8]) -> IMAPResult<&'a [u8], O>,
{
    let (got_remainder, got_object) = match parser(test) {
        Ok(got) => got,
        Err(error) => panic!(
            "Could not parse <<<{}>>>: {error:?}",
            escape_byte_string(test)
        ),
    };
    assert_eq!(expected_remainder, got_remainder);
    assert_eq!(expected_object, got_object);
}

/// Assert that `parser` rejects `test` with a recoverable error.
pub(crate) fn known_mismatch_test_parse<'a, O, P>(test: &'a [u8], parser: P)
where
    O: Debug + 'a,
    P: Fn(&'a [u8]) -> IMAPResult<&'a [u8], O>,
{
    match parser(test) {
        Err(nom::Err::Error(_)) => {}
        other => panic!(
            "Expected mismatch for <<<{}>>>, got {other:?}",
            escape_byte_string(test)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::number;

    #[test]
    #[should_panic]
    fn test_known_answer_test_parse() {
        known_answer_test_parse((b"123 ".as_ref(), b"".as_ref(), 123), number);
    }

    #[test]
    #[should_panic]
    fn test_known_mismatch_test_parse() {
        known_mismatch_test_parse(b"123", number);
    }
}
