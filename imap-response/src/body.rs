use abnf_core::complete::sp;
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, opt},
    error::ParseError,
};

use crate::{
    core::{atom, string},
    decode::{IMAPErrorKind, IMAPParseError, IMAPResult},
    syntax::Value,
};

/// `body = "(" (body-type-1part / body-type-mpart) ")"`
///
/// Parsed as a generic parenthesized list of `string / nil / number / atom / list` items. The
/// shape of the body structure is interpreted later.
///
/// Note: This parser is recursively defined. Thus, in order to not overflow the stack,
/// it is needed to limit how many nested lists are allowed.
pub(crate) fn body<'a>(
    remaining_recursions: usize,
) -> impl Fn(&'a [u8]) -> IMAPResult<&'a [u8], Value<'a>> {
    move |input: &'a [u8]| {
        let (remaining, items) = list_limited(input, remaining_recursions)?;

        Ok((remaining, Value::List(items)))
    }
}

fn list_limited<'a>(
    input: &'a [u8],
    remaining_recursions: usize,
) -> IMAPResult<&'a [u8], Vec<Value<'a>>> {
    let (input, _) = tag::<_, _, IMAPParseError<&'a [u8]>>(b"(")(input)?;

    if remaining_recursions == 0 {
        return Err(IMAPParseError::failure(
            input,
            IMAPErrorKind::RecursionLimitExceeded,
        ));
    }
    let (input, items, stopped) = list_items(input, remaining_recursions - 1)?;

    match tag::<_, _, IMAPParseError<&'a [u8]>>(b")")(input) {
        Ok((remaining, _)) => Ok((remaining, items)),
        Err(nom::Err::Error(error)) => Err(nom::Err::Error(match stopped {
            Some(stopped) => stopped.or(error),
            None => error,
        })),
        Err(error) => Err(error),
    }
}

/// Items are separated by SP. After a nested list, the SP is optional, because the parts of a
/// `body-type-mpart` are juxtaposed, e.g., `((...)(...) "MIXED")`.
///
/// Also returns why the next item could not be parsed.
#[allow(clippy::type_complexity)]
fn list_items<'a>(
    mut input: &'a [u8],
    remaining_recursions: usize,
) -> Result<
    (&'a [u8], Vec<Value<'a>>, Option<IMAPParseError<&'a [u8]>>),
    nom::Err<IMAPParseError<&'a [u8]>>,
> {
    let mut items: Vec<Value<'a>> = Vec::new();

    loop {
        let next = match items.last() {
            None => Ok(input),
            Some(Value::List(_)) => opt(sp)(input).map(|(remaining, _)| remaining),
            Some(_) => sp(input).map(|(remaining, _)| remaining),
        };

        match next.and_then(|input| value_limited(input, remaining_recursions)) {
            Ok((remaining, value)) => {
                items.push(value);
                input = remaining;
            }
            Err(nom::Err::Error(error)) => return Ok((input, items, Some(error))),
            Err(error) => return Err(error),
        }
    }
}

fn value_limited<'a>(
    input: &'a [u8],
    remaining_recursions: usize,
) -> IMAPResult<&'a [u8], Value<'a>> {
    alt((
        map(
            move |input: &'a [u8]| list_limited(input, remaining_recursions),
            Value::List,
        ),
        map(string, Value::String),
        map(atom, classify_atom),
    ))(input)
}

/// `NIL` and numbers are atoms lexically.
fn classify_atom(atom: &str) -> Value {
    if atom.eq_ignore_ascii_case("NIL") {
        return Value::Nil;
    }

    if atom.bytes().all(|byte| byte.is_ascii_digit()) {
        if let Ok(number) = atom.parse::<u32>() {
            return Value::Number(number);
        }
    }

    Value::Atom(atom)
}
