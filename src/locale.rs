//! French statement conventions for dates and money amounts.
//!
//! A [`Locale`] is a plain value handed to each parser, so the same input
//! always parses the same way whatever the host's locale settings are.

use std::str::FromStr;

use chrono::NaiveDate;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while_m_n};
use nom::character::complete::{char, digit0, digit1, one_of};
use nom::combinator::{map_res, opt, recognize, verify};
use nom::error::ErrorKind;
use nom::multi::many0;
use nom::sequence::{preceded, tuple};
use nom::IResult;
use rust_decimal::Decimal;
use serde::Deserialize;

// Two-digit years from this value on belong to the 1900s.
const SHORT_YEAR_PIVOT: i32 = 69;

#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct Locale {
    pub decimal_separator: char,
    pub group_separator: char,
    pub date_separator: char,
}

impl Default for Locale {
    fn default() -> Self {
        Locale {
            decimal_separator: ',',
            group_separator: ' ',
            date_separator: '.',
        }
    }
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn digits<'a>(min: usize, max: usize) -> impl Fn(&'a str) -> IResult<&'a str, &'a str> {
    take_while_m_n(min, max, is_digit)
}

fn number<'a>(min: usize, max: usize) -> impl Fn(&'a str) -> IResult<&'a str, u32> {
    map_res(digits(min, max), |s: &'a str| s.parse::<u32>())
}

fn day_month_year<'a>(
    separator: char,
    year_digits: usize,
) -> impl Fn(&'a str) -> IResult<&'a str, (u32, u32, i32)> {
    move |input: &'a str| {
        let (remaining, (day, _, month, _, year)) = tuple((
            number(1, 2),
            char(separator),
            number(1, 2),
            char(separator),
            number(year_digits, year_digits),
        ))(input)?;
        Ok((remaining, (day, month, year as i32)))
    }
}

fn calendar_date(input: &str, (day, month, year): (u32, u32, i32)) -> IResult<&str, NaiveDate> {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => Ok((input, date)),
        None => Err(nom::Err::Error((input, ErrorKind::Verify))),
    }
}

/// Long statement date, e.g. `30.12.2018`.
pub fn long_date<'a>(locale: Locale) -> impl Fn(&'a str) -> IResult<&'a str, NaiveDate> {
    move |input: &'a str| {
        let (remaining, parts) = day_month_year(locale.date_separator, 4)(input)?;
        calendar_date(remaining, parts)
    }
}

/// Day, month and full year of a short date such as `30.12.18`, not yet
/// checked against the calendar.
pub fn short_date_parts<'a>(
    locale: Locale,
) -> impl Fn(&'a str) -> IResult<&'a str, (u32, u32, i32)> {
    move |input: &'a str| {
        let (remaining, (day, month, year)) = day_month_year(locale.date_separator, 2)(input)?;
        let year = if year < SHORT_YEAR_PIVOT {
            2000 + year
        } else {
            1900 + year
        };
        Ok((remaining, (day, month, year)))
    }
}

/// Short transaction date, e.g. `30.12.18`.
pub fn short_date<'a>(locale: Locale) -> impl Fn(&'a str) -> IResult<&'a str, NaiveDate> {
    move |input: &'a str| {
        let (remaining, parts) = short_date_parts(locale)(input)?;
        calendar_date(remaining, parts)
    }
}

/// Money amount such as `4 321,42`: digit groups optionally split by the
/// group separator, and an optional fractional part after the decimal separator.
pub fn amount<'a>(locale: Locale) -> impl Fn(&'a str) -> IResult<&'a str, Decimal> {
    move |input: &'a str| {
        let group = preceded(
            char(locale.group_separator),
            verify(digit1, |s: &str| s.len() % 3 == 0),
        );
        let integer_part = alt((
            tag("0"),
            recognize(tuple((one_of("123456789"), digit0, many0(group)))),
        ));
        let fraction_part = preceded(char(locale.decimal_separator), digit1);

        let parsed: IResult<&'a str, (&'a str, Option<&'a str>)> =
            tuple((integer_part, opt(fraction_part)))(input);
        let (remaining, (integer, fraction)) = parsed?;

        let mut figure: String = integer
            .chars()
            .filter(|c| *c != locale.group_separator)
            .collect();
        if let Some(fraction) = fraction {
            figure.push('.');
            figure.push_str(fraction);
        }

        match Decimal::from_str(&figure) {
            Ok(value) => Ok((remaining, value)),
            Err(_) => Err(nom::Err::Error((input, ErrorKind::MapRes))),
        }
    }
}
