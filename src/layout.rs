use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::parser::SpacingPolicy;

/// How a bank lays out its statements: number conventions and the column
/// spacing that tells debits from credits. Every field is optional in the
/// JSON file; the defaults describe LCL statements.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Layout {
    pub locale: Locale,
    pub spacing: SpacingPolicy,
}

impl Layout {
    pub fn from_file(path: &Path) -> Result<Layout> {
        let file = File::open(path)?;
        let layout: Layout = serde_json::from_reader(file)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<()> {
        let SpacingPolicy {
            debit_below,
            credit_above,
        } = self.spacing;
        if debit_below.saturating_sub(1) > credit_above {
            return Err(Error::Layout(format!(
                "debit_below ({}) overlaps credit_above ({})",
                debit_below, credit_above
            )));
        }

        let Locale {
            decimal_separator,
            group_separator,
            ..
        } = self.locale;
        if decimal_separator == group_separator || decimal_separator.is_ascii_digit() {
            return Err(Error::Layout(format!(
                "decimal separator {:?} cannot be told apart from digit groups",
                decimal_separator
            )));
        }
        Ok(())
    }
}
