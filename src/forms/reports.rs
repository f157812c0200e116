use chrono::NaiveDate;
use serde::Deserialize;

use crate::forms::{FormError, parse_optional_date};

/// Date range for the cashflow report.
#[derive(Debug, Default, Deserialize)]
pub struct CashflowForm {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl CashflowForm {
    /// Both bounds are required and must be ordered.
    pub fn range(&self) -> Result<(NaiveDate, NaiveDate), FormError> {
        let from = parse_optional_date(self.from.as_deref())?;
        let to = parse_optional_date(self.to.as_deref())?;
        match (from, to) {
            (Some(from), Some(to)) if from <= to => Ok((from, to)),
            (Some(_), Some(_)) => Err(FormError::InvalidDateRange),
            _ => Err(FormError::MissingDateRange),
        }
    }
}
