use docopt::Docopt;
use env_logger::Env;
use log::error;
use serde::Deserialize;
use std::path::Path;
use std::process;

use libreleve::account::Account;
use libreleve::extract::{Extractors, Pdfgrep};
use libreleve::layout::Layout;
use libreleve::parser::Parser;
use libreleve::report;
use libreleve::statement::AccountSelection;

const USAGE: &str = "
LCL Statement Converter

Statements are filed under one account: either the account number read
from each statement (--auto-detect-account) or the given --account name.

Usage:
  releve (--auto-detect-account | --account=<name>) [options] [<files>...]
  releve (-h | --help)
  releve --version

Options:
  -h --help                 Show this screen.
  --version                 Show version.
  --output=<file>           Spreadsheet to write [default: releve.csv].
  --layout=<file>           JSON file overriding number formats and column spacing.
  --extractor=<program>     PDF search utility [default: pdfgrep].
";

#[derive(Debug, Deserialize)]
struct Args {
    flag_auto_detect_account: bool,
    flag_account: String,
    flag_output: String,
    flag_layout: String,
    flag_extractor: String,
    arg_files: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Args = Docopt::new(USAGE)
        .and_then(|d| {
            d.version(Some(env!("CARGO_PKG_VERSION").to_string()))
                .deserialize()
        })
        .unwrap_or_else(|e| e.exit());

    if let Err(e) = convert(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn account_selection(args: &Args) -> Result<AccountSelection, Box<dyn std::error::Error>> {
    match (args.flag_auto_detect_account, args.flag_account.is_empty()) {
        (true, true) => Ok(AccountSelection::AutoDetect),
        (false, false) => Ok(AccountSelection::Named(args.flag_account.clone())),
        (true, false) => Err("--auto-detect-account and --account cannot be used together".into()),
        (false, true) => {
            Err("Please either use --auto-detect-account or select account via --account".into())
        }
    }
}

fn convert(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let selection = account_selection(args)?;

    let layout = if args.flag_layout.is_empty() {
        Layout::default()
    } else {
        Layout::from_file(Path::new(&args.flag_layout))?
    };

    let extractors = Extractors::new(Pdfgrep::new(args.flag_extractor.as_str()));
    let parser = Parser::new(layout);
    let mut account = match &selection {
        AccountSelection::Named(name) => Account::named(name),
        AccountSelection::AutoDetect => Account::detected(),
    };

    for file in &args.arg_files {
        let file = Path::new(file);
        let statement = parser.parse(file, extractors.for_file(file), &selection)?;
        account.record(statement)?;
    }

    report::save_to_file(&account, Path::new(&args.flag_output))?;
    Ok(())
}
