use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use nom::bytes::complete::{tag, take_while1, take_while_m_n};
use nom::character::complete::{char, digit1};
use nom::combinator::recognize;
use nom::sequence::tuple;
use nom::IResult;

use crate::error::{Error, Result};
use crate::extract::{Query, TextExtractor};
use crate::locale::{long_date, Locale};
use crate::transaction::Transaction;

/// One imported file.
#[derive(Clone, Debug)]
pub struct Statement {
    pub file: PathBuf,
    pub account: String,
    pub period: Period,
    pub transactions: Vec<Transaction>,
}

/// Dates covered by a statement, both ends included.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AccountSelection {
    AutoDetect,
    Named(String),
}

fn date_pattern(locale: Locale, year_digits: usize) -> String {
    let sep = regex::escape(&locale.date_separator.to_string());
    format!(
        "[0-9]{{1,2}}{sep}[0-9]{{1,2}}{sep}[0-9]{{{year}}}",
        sep = sep,
        year = year_digits
    )
}

pub(crate) fn short_date_pattern(locale: Locale) -> String {
    date_pattern(locale, 2)
}

pub fn period_query(locale: Locale) -> Query {
    let date = date_pattern(locale, 4);
    Query::new(format!("du {} au {}", date, date))
        .first_only()
        .only_matching()
}

pub fn account_query() -> Query {
    Query::new("Compte : [0-9]+ [a-zA-Z]").first_only()
}

fn is_blank(c: char) -> bool {
    c.is_whitespace()
}

fn period<'a>(locale: Locale) -> impl Fn(&'a str) -> IResult<&'a str, Period> {
    move |input: &'a str| {
        let (remaining, (_, start, _, end)) =
            tuple((tag("du "), long_date(locale), tag(" au "), long_date(locale)))(input)?;
        Ok((remaining, Period { start, end }))
    }
}

fn account_number(input: &str) -> IResult<&str, &str> {
    let parsed: IResult<&str, (&str, char, &str, &str)> = tuple((
        take_while1(is_blank),
        char(':'),
        take_while1(is_blank),
        recognize(tuple((
            digit1,
            take_while_m_n(1, 1, is_blank),
            take_while_m_n(1, 1, |c: char| c.is_alphanumeric() || c == '_'),
        ))),
    ))(input);
    let (remaining, (_, _, _, number)) = parsed?;
    Ok((remaining, number))
}

/// Finds `du <date> au <date>` anywhere in `line`.
pub fn parse_period(line: &str, locale: Locale) -> Option<Period> {
    line.match_indices("du ")
        .find_map(|(at, _)| period(locale)(&line[at..]).ok())
        .map(|(_, found)| found)
}

/// Finds `Compte : <digits> <letter>` in `line` and returns the account
/// identifier, e.g. `0123456 X`. The last such mention on the line wins.
pub fn parse_account(line: &str) -> Option<String> {
    line.rmatch_indices("Compte")
        .find_map(|(at, word)| account_number(&line[at + word.len()..]).ok())
        .map(|(_, number)| number.to_string())
}

pub fn detect_period(extractor: &dyn TextExtractor, file: &Path, locale: Locale) -> Result<Period> {
    extractor
        .search(file, &period_query(locale))
        .iter()
        .find_map(|line| parse_period(line, locale))
        .ok_or_else(|| Error::MissingPeriod {
            file: file.to_path_buf(),
        })
}

pub fn detect_account(
    extractor: &dyn TextExtractor,
    file: &Path,
    selection: &AccountSelection,
) -> Result<String> {
    match selection {
        AccountSelection::Named(name) => Ok(name.clone()),
        AccountSelection::AutoDetect => extractor
            .search(file, &account_query())
            .iter()
            .find_map(|line| parse_account(line))
            .ok_or_else(|| Error::AccountDetection {
                file: file.to_path_buf(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PlainText;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_period_line() {
        let found = parse_period("du 01.04.2018 au 30.04.2018", Locale::default()).unwrap();
        assert_eq!(found.start, date(2018, 4, 1));
        assert_eq!(found.end, date(2018, 4, 30));
    }

    #[test]
    fn finds_period_inside_longer_line() {
        let found = parse_period(
            "  RELEVE DE COMPTE COURANT du 1.3.2019 au 31.3.2019   page 1",
            Locale::default(),
        )
        .unwrap();
        assert_eq!(found.start, date(2019, 3, 1));
        assert!(found.contains(date(2019, 3, 31)));
        assert!(!found.contains(date(2019, 4, 1)));
    }

    #[test]
    fn rejects_short_dates_in_period() {
        assert!(parse_period("du 01.04.18 au 30.04.18", Locale::default()).is_none());
    }

    #[test]
    fn parses_account_line() {
        assert_eq!(
            parse_account("Indicatif : 30002   Compte : 0123456 X   RIB : 12"),
            Some("0123456 X".to_string())
        );
        assert_eq!(parse_account("Compte  :  42 b"), Some("42 b".to_string()));
        assert_eq!(parse_account("Compte : X 0123456"), None);
    }

    #[test]
    fn last_account_on_a_line_wins() {
        assert_eq!(
            parse_account("Compte : 111 A   Compte : 222 B"),
            Some("222 B".to_string())
        );
        assert_eq!(
            parse_account("Compte : 111 A   Compte joint"),
            Some("111 A".to_string())
        );
    }

    #[test]
    fn builds_search_patterns_from_locale() {
        assert_eq!(
            period_query(Locale::default()).pattern,
            r"du [0-9]{1,2}\.[0-9]{1,2}\.[0-9]{4} au [0-9]{1,2}\.[0-9]{1,2}\.[0-9]{4}"
        );
        assert_eq!(
            short_date_pattern(Locale::default()),
            r"[0-9]{1,2}\.[0-9]{1,2}\.[0-9]{2}"
        );
    }

    #[test]
    fn missing_period_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "nothing to see here\n").unwrap();

        match detect_period(&PlainText, &path, Locale::default()) {
            Err(Error::MissingPeriod { file }) => assert_eq!(file, path),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            detect_account(&PlainText, &path, &AccountSelection::AutoDetect),
            Err(Error::AccountDetection { .. })
        ));
    }

    #[test]
    fn explicit_account_is_used_verbatim() {
        let account = detect_account(
            &PlainText,
            Path::new("/nonexistent.txt"),
            &AccountSelection::Named("joint".to_string()),
        )
        .unwrap();
        assert_eq!(account, "joint");
    }

    #[test]
    fn detects_from_text_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avril.txt");
        std::fs::write(
            &path,
            "LCL\nCompte : 0123456 X\nRELEVE du 01.04.2018 au 30.04.2018\nCompte : 999 Z\n",
        )
        .unwrap();

        let found = detect_period(&PlainText, &path, Locale::default()).unwrap();
        assert_eq!(found.end, date(2018, 4, 30));
        let account = detect_account(&PlainText, &path, &AccountSelection::AutoDetect).unwrap();
        assert_eq!(account, "0123456 X");
    }
}
