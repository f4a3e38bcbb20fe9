use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info, warn};
use nom::bytes::complete::{take_while, take_while1};
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, opt, recognize};
use nom::error::ErrorKind;
use nom::sequence::tuple;
use nom::IResult;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::extract::{Query, TextExtractor};
use crate::layout::Layout;
use crate::locale::{amount, short_date_parts, Locale};
use crate::statement::{self, AccountSelection, Statement};
use crate::transaction::{Side, Transaction};

/// Tells debits from credits by how far the amount sits from the date
/// column in flattened text: debits are printed in the nearer column.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct SpacingPolicy {
	/// Gaps strictly shorter than this are debits.
	pub debit_below: usize,
	/// Gaps strictly longer than this are credits.
	pub credit_above: usize,
}

impl Default for SpacingPolicy {
	fn default() -> Self {
		SpacingPolicy {
			debit_below: 20,
			credit_above: 30,
		}
	}
}

impl SpacingPolicy {
	/// `None` when the gap falls between the two columns.
	pub fn classify(&self, spacing: usize) -> Option<Side> {
		if spacing < self.debit_below {
			Some(Side::Debit)
		} else if spacing > self.credit_above {
			Some(Side::Credit)
		} else {
			None
		}
	}
}

/// Fields of a transaction row before classification.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TransactionLine<'a> {
	pub reference: &'a str,
	pub label: &'a str,
	pub date: NaiveDate,
	pub spacing: &'a str,
	pub amount: Decimal,
}

fn is_blank(c: char) -> bool {
	c.is_whitespace()
}

fn is_spacing(c: char) -> bool {
	c.is_whitespace() || c == '.'
}

fn reference(input: &str) -> IResult<&str, &str> {
	recognize(tuple((digit1, char('.'), digit1)))(input)
}

// Labels are words separated by single blanks; a wider gap ends the label.
fn is_label(label: &str) -> bool {
	!label.is_empty() && label.split(is_blank).all(|word| !word.is_empty())
}

// Everything after the label: `  01.04.18.......1 234,56 .`
// A tail that matches but names an impossible date is a `Failure`.
fn date_and_amount<'a>(
	locale: Locale,
) -> impl Fn(&'a str) -> IResult<&'a str, (NaiveDate, &'a str, Decimal)> {
	move |input: &'a str| {
		let (remaining, (_, (day, month, year), spacing, value, _, _)) = all_consuming(tuple((
			take_while1(is_blank),
			short_date_parts(locale),
			take_while1(is_spacing),
			amount(locale),
			take_while(is_blank),
			opt(char('.')),
		)))(input)?;
		match NaiveDate::from_ymd_opt(year, month, day) {
			Some(date) => Ok((remaining, (date, spacing, value))),
			None => Err(nom::Err::Failure((input, ErrorKind::Verify))),
		}
	}
}

pub(crate) fn transaction_line<'a>(
	locale: Locale,
) -> impl Fn(&'a str) -> IResult<&'a str, TransactionLine<'a>> {
	move |input: &'a str| {
		let (body, (_, number, _)) =
			tuple((take_while1(is_blank), reference, take_while1(is_blank)))(input)?;

		// The label takes as many words as the rest of the line allows
		let gaps = body
			.char_indices()
			.rev()
			.filter(|&(at, c)| at > 0 && is_blank(c));
		for (at, _) in gaps {
			let label = &body[..at];
			if !is_label(label) {
				continue;
			}
			match date_and_amount(locale)(&body[at..]) {
				Ok((remaining, (date, spacing, amount))) => {
					return Ok((
						remaining,
						TransactionLine {
							reference: number,
							label,
							date,
							spacing,
							amount,
						},
					))
				}
				Err(nom::Err::Failure(e)) => return Err(nom::Err::Failure(e)),
				Err(_) => {}
			}
		}

		Err(nom::Err::Error((input, ErrorKind::Verify)))
	}
}

pub fn transaction_query(locale: Locale) -> Query {
	Query::new(format!("  {}", statement::short_date_pattern(locale)))
}

pub struct Parser {
	layout: Layout,
}

impl Parser {
	pub fn new(layout: Layout) -> Parser {
		Parser { layout }
	}

	/// `Ok(None)` for lines that are not transactions (headers, page
	/// footers, carried-forward balances).
	pub fn parse_line(&self, line: &str) -> Result<Option<Transaction>> {
		let fields = match transaction_line(self.layout.locale)(line) {
			Ok((_, fields)) => fields,
			Err(nom::Err::Failure(_)) => {
				return Err(Error::InvalidDate {
					line: line.to_string(),
				})
			}
			Err(_) => return Ok(None),
		};

		let spacing = fields.spacing.chars().count();
		match self.layout.spacing.classify(spacing) {
			Some(side) => {
				debug!(
					"operation {}: {:?} after {} spacing characters",
					fields.reference, side, spacing
				);
				Ok(Some(Transaction::new(
					fields.date,
					side,
					fields.amount,
					fields.label,
				)))
			}
			None => Err(Error::AmbiguousSpacing {
				line: line.to_string(),
				spacing,
			}),
		}
	}

	pub fn parse_lines<I, S>(&self, lines: I) -> Result<Vec<Transaction>>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut transactions = Vec::new();
		for line in lines {
			let line = line.as_ref();
			match self.parse_line(line)? {
				Some(transaction) => transactions.push(transaction),
				None => debug!("skipping {:?}", line),
			}
		}
		Ok(transactions)
	}

	/// Reads one statement file.
	pub fn parse(
		&self,
		file: &Path,
		extractor: &dyn TextExtractor,
		selection: &AccountSelection,
	) -> Result<Statement> {
		info!("Importing '{}'", file.display());

		let account = statement::detect_account(extractor, file, selection)?;
		info!("Account: {}", account);

		let locale = self.layout.locale;
		let period = statement::detect_period(extractor, file, locale)?;
		info!("Statement covers {} to {}", period.start, period.end);

		let transactions = self.parse_lines(extractor.search(file, &transaction_query(locale)))?;
		for transaction in transactions.iter().filter(|t| !period.contains(t.date())) {
			warn!(
				"{} on {} is outside the statement period",
				transaction.description(),
				transaction.date()
			);
		}
		info!(
			"{} transactions read from '{}'",
			transactions.len(),
			file.display()
		);

		Ok(Statement {
			file: file.to_path_buf(),
			account,
			period,
			transactions,
		})
	}
}
