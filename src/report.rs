use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::{info, warn};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::account::Account;
use crate::error::Result;

pub const TOTAL_LABEL: &str = "Total";

#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct Row<'a> {
    date: String,
    debit: Option<Decimal>,
    credit: Option<Decimal>,
    balance: Decimal,
    description: &'a str,
}

/// Writes one spreadsheet row per transaction, then the totals row.
pub fn write_report<W: Write>(account: &Account, output: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(output);

    for transaction in account.transactions() {
        writer.serialize(Row {
            date: transaction.date().format("%Y-%m-%d").to_string(),
            debit: transaction.debit(),
            credit: transaction.credit(),
            balance: transaction.balance(),
            description: transaction.description(),
        })?;
    }

    if !account.validate() {
        warn!(
            "total balance {} differs from credits minus debits {}",
            account.total_balance(),
            account.total_credits() - account.total_debits()
        );
    }
    writer.serialize(Row {
        date: TOTAL_LABEL.to_string(),
        debit: Some(account.total_debits()),
        credit: Some(account.total_credits()),
        balance: account.total_balance(),
        description: "",
    })?;

    writer.flush()?;
    Ok(())
}

/// Replaces `path` with the report for `account`.
pub fn save_to_file(account: &Account, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_report(account, file)?;
    info!(
        "Wrote {} transactions to '{}'",
        account.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{Side, Transaction};
    use chrono::NaiveDate;

    fn april(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 4, day).unwrap()
    }

    fn render(account: &Account) -> String {
        let mut out = Vec::new();
        write_report(account, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_account_has_header_and_zero_totals() {
        assert_eq!(
            render(&Account::detected()),
            "Date,Debit,Credit,Balance,Description\r\nTotal,0.00,0.00,0.00,\r\n"
        );
    }

    #[test]
    fn renders_rows_in_order_with_blank_sides() {
        let mut account = Account::named("joint");
        account.push(Transaction::new(april(1), Side::Debit, Decimal::new(123456, 2), "SALAIRE AVRIL"));
        account.push(Transaction::new(april(2), Side::Credit, Decimal::new(4200, 2), "VIR, RECU"));

        let lines: Vec<String> = render(&account).lines().map(String::from).collect();
        assert_eq!(
            lines,
            vec![
                "Date,Debit,Credit,Balance,Description",
                "2018-04-01,1234.56,,-1234.56,SALAIRE AVRIL",
                "2018-04-02,,42.00,42.00,\"VIR, RECU\"",
                "Total,1234.56,42.00,-1192.56,",
            ]
        );
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("releve.csv");
        std::fs::write(&path, "stale content that is longer than the report\n".repeat(10)).unwrap();

        save_to_file(&Account::detected(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["Date", "Debit", "Credit", "Balance", "Description"]
        );
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], TOTAL_LABEL);
    }
}
