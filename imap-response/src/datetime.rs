use abnf_core::{complete::sp, is_digit};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while_m_n},
    character::complete::char,
    combinator::{all_consuming, map, map_res, value},
    sequence::{preceded, tuple},
};

use crate::decode::IMAPResult;

/// Decode the content of an `INTERNALDATE` quoted string, e.g., `16-Aug-2025 14:06:39 +0000`.
///
/// Returns `None` when the value does not follow the layout or names an impossible date.
pub(crate) fn decode_date_time(value: &str) -> Option<DateTime<FixedOffset>> {
    all_consuming(date_time_text)(value.as_bytes())
        .ok()
        .and_then(|(_, datetime)| datetime)
}

/// `date-time` without the surrounding DQUOTEs.
///
/// ```abnf
/// date-time = DQUOTE
///              date-day-fixed "-" date-month "-" date-year SP
///              time SP
///              zone
///             DQUOTE
/// ```
pub(crate) fn date_time_text(input: &[u8]) -> IMAPResult<&[u8], Option<DateTime<FixedOffset>>> {
    let mut parser = tuple((
        date_day_fixed,
        tag(b"-"),
        date_month,
        tag(b"-"),
        date_year,
        sp,
        time,
        sp,
        zone,
    ));

    let (remaining, (d, _, m, _, y, _, time, _, zone)) = parser(input)?;

    let date = NaiveDate::from_ymd_opt(y.into(), m.into(), d.into());

    let datetime = match (date, time, zone) {
        (Some(date), Some(time), Some(zone)) => zone
            .from_local_datetime(&NaiveDateTime::new(date, time))
            .single(),
        _ => None,
    };

    Ok((remaining, datetime))
}

/// Fixed-format version of date-day.
///
/// ```abnf
/// date-day-fixed = (SP DIGIT) / 2DIGIT
/// ```
///
/// A single digit without padding is accepted, too.
pub(crate) fn date_day_fixed(input: &[u8]) -> IMAPResult<&[u8], u8> {
    alt((
        map(
            preceded(sp, take_while_m_n(1, 1, is_digit)),
            |bytes: &[u8]| bytes[0] - b'0',
        ),
        digit_1_2,
    ))(input)
}

/// ```abnf
/// date-month = "Jan" / "Feb" / "Mar" / "Apr" /
///              "May" / "Jun" / "Jul" / "Aug" /
///              "Sep" / "Oct" / "Nov" / "Dec"
/// ```
pub(crate) fn date_month(input: &[u8]) -> IMAPResult<&[u8], u8> {
    alt((
        value(1, tag_no_case(b"Jan")),
        value(2, tag_no_case(b"Feb")),
        value(3, tag_no_case(b"Mar")),
        value(4, tag_no_case(b"Apr")),
        value(5, tag_no_case(b"May")),
        value(6, tag_no_case(b"Jun")),
        value(7, tag_no_case(b"Jul")),
        value(8, tag_no_case(b"Aug")),
        value(9, tag_no_case(b"Sep")),
        value(10, tag_no_case(b"Oct")),
        value(11, tag_no_case(b"Nov")),
        value(12, tag_no_case(b"Dec")),
    ))(input)
}

/// ```abnf
/// date-year = 4DIGIT
/// ```
pub(crate) fn date_year(input: &[u8]) -> IMAPResult<&[u8], u16> {
    map_res(
        map_res(take_while_m_n(4, 4, is_digit), std::str::from_utf8),
        str::parse::<u16>,
    )(input)
}

/// Hours minutes seconds.
///
/// ```abnf
/// time = 2DIGIT ":" 2DIGIT ":" 2DIGIT
/// ```
pub(crate) fn time(input: &[u8]) -> IMAPResult<&[u8], Option<NaiveTime>> {
    let mut parser = tuple((digit_2, tag(b":"), digit_2, tag(b":"), digit_2));

    let (remaining, (h, _, m, _, s)) = parser(input)?;

    Ok((
        remaining,
        NaiveTime::from_hms_opt(h.into(), m.into(), s.into()),
    ))
}

/// Signed four-digit value of hhmm representing hours and minutes east of Greenwich.
///
/// ```abnf
/// zone = ("+" / "-") 4DIGIT
/// ```
pub(crate) fn zone(input: &[u8]) -> IMAPResult<&[u8], Option<FixedOffset>> {
    let mut parser = tuple((alt((char('+'), char('-'))), digit_2, digit_2));

    let (remaining, (sign, hh, mm)) = parser(input)?;

    let offset = 3600 * (hh as i32) + 60 * (mm as i32);

    let zone = if sign == '+' {
        FixedOffset::east_opt(offset)
    } else {
        FixedOffset::west_opt(offset)
    };

    Ok((remaining, zone))
}

fn digit_1_2(input: &[u8]) -> IMAPResult<&[u8], u8> {
    map_res(
        map_res(take_while_m_n(1, 2, is_digit), std::str::from_utf8),
        str::parse::<u8>,
    )(input)
}

fn digit_2(input: &[u8]) -> IMAPResult<&[u8], u8> {
    map_res(
        map_res(take_while_m_n(2, 2, is_digit), std::str::from_utf8),
        str::parse::<u8>,
    )(input)
}
