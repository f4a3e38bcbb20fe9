//! Turns LCL bank statements into a spreadsheet of debits and credits.

pub mod account;
pub mod error;
pub mod extract;
pub mod layout;
pub mod locale;
pub mod parser;
pub mod report;
pub mod statement;
pub mod transaction;

pub use account::Account;
pub use error::{Error, Result};
pub use extract::{Extractors, Pdfgrep, PlainText, Query, TextExtractor};
pub use layout::Layout;
pub use locale::Locale;
pub use parser::{Parser, SpacingPolicy};
pub use statement::{AccountSelection, Period, Statement};
pub use transaction::{Side, Transaction};
