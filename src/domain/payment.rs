use std::cmp::Reverse;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, PaymentId};

/// Lifecycle state reported by the backend for a payment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    Pending,
    UpToDate,
    Expired,
    Voided,
}

impl PaymentState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendiente",
            Self::UpToDate => "Al día",
            Self::Expired => "Vencido",
            Self::Voided => "Anulado",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Debit,
    Credit,
    Transfer,
    Other,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Cash => "Efectivo",
            Self::Debit => "Débito",
            Self::Credit => "Crédito",
            Self::Transfer => "Transferencia",
            Self::Other => "Otro",
        };
        f.write_str(label)
    }
}

/// Billing period bought by a payment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentDuration {
    #[serde(alias = "QUINCE_DIAS")]
    FifteenDays,
    #[serde(alias = "UN_MES")]
    OneMonth,
}

impl PaymentDuration {
    pub const fn days(self) -> u32 {
        match self {
            Self::FifteenDays => 15,
            Self::OneMonth => 30,
        }
    }

    /// Maps a day count picked in the UI back to a supported period.
    pub const fn from_days(days: u32) -> Option<Self> {
        match days {
            15 => Some(Self::FifteenDays),
            30 => Some(Self::OneMonth),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_email: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub voided: bool,
    #[serde(default, alias = "paymentState")]
    pub state: Option<PaymentState>,
    #[serde(default)]
    pub void_reason: Option<String>,
}

impl Payment {
    /// Voided either by flag or by state; the backend is not always consistent.
    pub fn is_voided(&self) -> bool {
        self.voided || self.state == Some(PaymentState::Voided)
    }
}

/// Orders payments newest activity first.
///
/// Primary key is `payment_date` descending with a missing date treated as the
/// Unix epoch; ties fall back to the id, higher first.
pub fn sort_newest_first(payments: &mut [Payment]) {
    let epoch = NaiveDate::default();
    payments.sort_by_key(|p| Reverse((p.payment_date.unwrap_or(epoch), p.id)));
}

/// Payload sent to register a payment for a member.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub client_id: ClientId,
    pub amount: f64,
    pub method: PaymentMethod,
    pub payment_date: NaiveDate,
    pub duration: PaymentDuration,
    pub duration_days: u32,
}

impl NewPayment {
    #[must_use]
    pub fn new(
        client_id: ClientId,
        amount: f64,
        method: PaymentMethod,
        payment_date: NaiveDate,
        duration: PaymentDuration,
    ) -> Self {
        Self {
            client_id,
            amount,
            method,
            payment_date,
            duration,
            duration_days: duration.days(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::client::tests::date;

    pub(crate) fn payment(id: i64, client: i64, paid_on: Option<NaiveDate>) -> Payment {
        Payment {
            id: PaymentId::new(id).unwrap(),
            client_id: Some(ClientId::new(client).unwrap()),
            client_name: None,
            client_email: None,
            amount: 1500.0,
            method: Some(PaymentMethod::Cash),
            payment_date: paid_on,
            expiration_date: None,
            duration_days: Some(30),
            voided: false,
            state: Some(PaymentState::UpToDate),
            void_reason: None,
        }
    }

    fn ids(payments: &[Payment]) -> Vec<i64> {
        payments.iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn sorts_by_date_then_id_descending() {
        let mut list = vec![
            payment(1, 1, Some(date(2024, 1, 5))),
            payment(4, 1, Some(date(2024, 2, 1))),
            payment(2, 2, Some(date(2024, 2, 1))),
            payment(3, 2, Some(date(2023, 12, 31))),
        ];

        sort_newest_first(&mut list);

        assert_eq!(ids(&list), vec![4, 2, 1, 3]);
    }

    #[test]
    fn missing_date_sorts_last() {
        let mut list = vec![
            payment(9, 1, None),
            payment(1, 1, Some(date(2020, 6, 1))),
            payment(5, 1, None),
        ];

        sort_newest_first(&mut list);

        assert_eq!(ids(&list), vec![1, 9, 5]);
    }

    #[test]
    fn deserializes_either_state_spelling() {
        let json = r#"{"id": 10, "clientId": 2, "amount": 800.5,
            "paymentDate": "2024-04-01", "paymentState": "EXPIRED"}"#;
        let p: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(p.state, Some(PaymentState::Expired));
        assert!(!p.is_voided());

        let json = r#"{"id": 11, "amount": 0, "state": "VOIDED"}"#;
        let p: Payment = serde_json::from_str(json).unwrap();
        assert!(p.is_voided());
        assert!(p.payment_date.is_none());
    }

    #[test]
    fn duration_round_trips_through_days() {
        assert_eq!(PaymentDuration::from_days(15), Some(PaymentDuration::FifteenDays));
        assert_eq!(PaymentDuration::OneMonth.days(), 30);
        assert_eq!(PaymentDuration::from_days(20), None);
    }
}
