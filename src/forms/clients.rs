//! Forms for registering, editing and pausing members.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::client::{NewClient, PauseWindow, UpdateClient};
use crate::domain::types::ClientEmail;
use crate::forms::{FormError, non_blank, parse_date};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Member data entered in the registration and edit modals.
pub struct ClientForm {
    #[validate(length(min = 2, max = 50))]
    pub first_name: String,
    #[validate(length(min = 2, max = 50))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: String,
    /// Defaults to today on registration.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_digit() || c == ' ' || c == '-' || c == '+';
    if phone.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

impl ClientForm {
    /// Trims the text fields so length rules see what gets stored.
    fn trimmed(self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            notes: self.notes.trim().to_string(),
            start_date: self.start_date,
        }
    }

    fn email(&self) -> Result<ClientEmail, FormError> {
        Ok(ClientEmail::new(self.email.as_str())?)
    }

    fn notes(&self) -> Option<String> {
        non_blank(Some(self.notes.as_str())).map(|notes| ammonia::clean(&notes))
    }

    pub fn into_new_client(self, today: NaiveDate) -> Result<NewClient, FormError> {
        let form = self.trimmed();
        form.validate()?;
        Ok(NewClient::new(
            &form.first_name,
            &form.last_name,
            form.email()?,
            non_blank(Some(form.phone.as_str())),
            form.notes(),
            form.start_date.unwrap_or(today),
        ))
    }

    pub fn into_update_client(self) -> Result<UpdateClient, FormError> {
        let form = self.trimmed();
        form.validate()?;
        Ok(UpdateClient::new(
            &form.first_name,
            &form.last_name,
            form.email()?,
            non_blank(Some(form.phone.as_str())),
            form.notes(),
        ))
    }
}

#[derive(Debug, Deserialize)]
/// Pause window picked in the pause modal.
pub struct PauseForm {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub reason: Option<String>,
}

impl PauseForm {
    /// Parses both dates and rejects a window ending before it starts.
    pub fn window(&self) -> Result<PauseWindow, FormError> {
        let from = parse_date(&self.from)?;
        let to = parse_date(&self.to)?;
        PauseWindow::new(from, to).map_err(|_| FormError::InvalidDateRange)
    }

    pub fn reason(&self) -> Option<String> {
        non_blank(self.reason.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::tests::date;

    fn form() -> ClientForm {
        ClientForm {
            first_name: " Ana ".into(),
            last_name: "Pérez".into(),
            email: "Ana@Mail.com".into(),
            phone: "+54 11-5555".into(),
            notes: "<script>x</script>Prefiere la mañana".into(),
            start_date: None,
        }
    }

    #[test]
    fn registration_defaults_start_date_and_sanitizes_notes() {
        let new_client = form().into_new_client(date(2024, 5, 2)).unwrap();
        assert_eq!(new_client.first_name, "Ana");
        assert_eq!(new_client.email.as_str(), "ana@mail.com");
        assert_eq!(new_client.start_date, date(2024, 5, 2));
        assert_eq!(new_client.notes.as_deref(), Some("Prefiere la mañana"));
        assert!(new_client.active);
    }

    #[test]
    fn short_names_and_bad_phones_are_rejected() {
        let short = ClientForm {
            first_name: "A".into(),
            ..form()
        };
        assert!(matches!(
            short.into_update_client(),
            Err(FormError::Validation(_))
        ));

        let padded = ClientForm {
            first_name: " A ".into(),
            ..form()
        };
        assert!(matches!(
            padded.into_new_client(date(2024, 5, 2)),
            Err(FormError::Validation(_))
        ));

        let phone = ClientForm {
            phone: "555-CALL".into(),
            ..form()
        };
        assert!(phone.validate().is_err());
    }

    #[test]
    fn blank_phone_is_allowed_and_dropped() {
        let update = ClientForm {
            phone: "   ".into(),
            ..form()
        }
        .into_update_client()
        .unwrap();
        assert_eq!(update.phone, None);
    }

    #[test]
    fn pause_window_counts_days_inclusively() {
        let pause = PauseForm {
            from: "2024-03-01".into(),
            to: "2024-03-07".into(),
            reason: Some("  ".into()),
        };
        assert_eq!(pause.window().unwrap().duration_days(), 7);
        assert_eq!(pause.reason(), None);
    }

    #[test]
    fn inverted_pause_window_is_rejected() {
        let pause = PauseForm {
            from: "2024-01-10".into(),
            to: "2024-01-09".into(),
            reason: None,
        };
        assert!(matches!(pause.window(), Err(FormError::InvalidDateRange)));
    }
}
