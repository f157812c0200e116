//! Forms for registering and voiding payments.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::payment::{NewPayment, PaymentDuration, PaymentMethod};
use crate::domain::types::ClientId;
use crate::forms::{FormError, non_blank};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    pub client_id: i64,
    pub amount: f64,
    pub method: PaymentMethod,
    /// Defaults to today.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    pub duration_days: u32,
}

impl PaymentForm {
    pub fn into_new_payment(self, today: NaiveDate) -> Result<NewPayment, FormError> {
        let client_id = ClientId::new(self.client_id).map_err(|_| FormError::InvalidClientId)?;
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(FormError::InvalidAmount);
        }
        let duration = PaymentDuration::from_days(self.duration_days)
            .ok_or(FormError::InvalidDuration(self.duration_days))?;

        Ok(NewPayment::new(
            client_id,
            self.amount,
            self.method,
            self.payment_date.unwrap_or(today),
            duration,
        ))
    }
}

/// Decision taken in the void confirmation dialog.
#[derive(Debug, Default, Deserialize)]
pub struct VoidForm {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
}

impl VoidForm {
    pub fn reason(&self) -> Option<String> {
        non_blank(self.reason.as_deref())
    }
}
