use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Debit,
    Credit,
}

/// One statement line. Exactly one of debit or credit is set.
#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    date: NaiveDate,
    debit: Option<Decimal>,
    credit: Option<Decimal>,
    description: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, side: Side, amount: Decimal, description: &str) -> Transaction {
        let (debit, credit) = match side {
            Side::Debit => (Some(amount), None),
            Side::Credit => (None, Some(amount)),
        };
        Transaction {
            date,
            debit,
            credit,
            description: description.to_string(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn debit(&self) -> Option<Decimal> {
        self.debit
    }

    pub fn credit(&self) -> Option<Decimal> {
        self.credit
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn side(&self) -> Side {
        if self.debit.is_some() {
            Side::Debit
        } else {
            Side::Credit
        }
    }

    pub fn debit_value(&self) -> Decimal {
        self.debit.unwrap_or_default()
    }

    pub fn credit_value(&self) -> Decimal {
        self.credit.unwrap_or_default()
    }

    pub fn balance(&self) -> Decimal {
        self.credit_value() - self.debit_value()
    }
}
