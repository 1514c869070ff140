//! Consultation booking, contact, and newsletter form handling. Nothing is sent or
//! stored; each submission is validated and turned into a confirmation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::render::{detail_line, unordered_list};

pub const CONTACT_ACKNOWLEDGEMENT: &str =
    "Thank you for your message! We will get back to you within 24 hours.";
pub const NEWSLETTER_ACKNOWLEDGEMENT: &str = "Thank you for subscribing to our newsletter!";

pub const NEXT_STEPS: [&str; 4] = [
    "You will receive a confirmation email shortly",
    "Our team will contact you 24 hours before the session",
    "Please prepare any relevant documents",
    "Join the session via the link in your email",
];

const MISSING: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please choose a valid consultation date.")]
    InvalidDate(String),
    #[error("Consultation date must be today or later.")]
    DateInPast(NaiveDate),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub consultation_type: Option<String>,
}

impl BookingData {
    /// Validates the optional fields that were filled in; blanks count as missing.
    pub fn validate(&self, today: NaiveDate) -> Result<(), FormError> {
        if let Some(email) = provided(&self.email) {
            validate_email(email)?;
        }

        if let Some(raw) = provided(&self.date) {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| FormError::InvalidDate(raw.to_string()))?;
            if date < today {
                return Err(FormError::DateInPast(date));
            }
        }

        Ok(())
    }
}

/// Confirmation view rendered in place of the booking form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingConfirmation {
    pub name: String,
    pub email: String,
    pub date: String,
    pub time: String,
    pub consultation_type: String,
    pub next_steps: Vec<&'static str>,
}

impl BookingConfirmation {
    pub fn render_html(&self) -> String {
        let mut html = String::from("<div class=\"booking-confirmation\">");
        html.push_str("<h4>Consultation Booked Successfully!</h4><div class=\"booking-details\">");
        for (label, value) in [
            ("Name", &self.name),
            ("Email", &self.email),
            ("Date", &self.date),
            ("Time", &self.time),
            ("Type", &self.consultation_type),
        ] {
            html.push_str(&detail_line(label, value));
        }
        html.push_str("</div><div class=\"next-steps\"><h5>Next Steps:</h5>");
        html.push_str(&unordered_list(&self.next_steps));
        html.push_str("</div></div>");
        html
    }
}

pub fn book_consultation(
    data: &BookingData,
    today: NaiveDate,
) -> Result<BookingConfirmation, FormError> {
    data.validate(today)?;

    let display = |field: &Option<String>| provided(field).unwrap_or(MISSING).to_string();
    Ok(BookingConfirmation {
        name: display(&data.name),
        email: display(&data.email),
        date: display(&data.date),
        time: display(&data.time),
        consultation_type: display(&data.consultation_type),
        next_steps: NEXT_STEPS.to_vec(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

pub fn submit_contact(submission: &ContactSubmission) -> Result<&'static str, FormError> {
    if let Some(email) = provided(&submission.email) {
        validate_email(email)?;
    }
    Ok(CONTACT_ACKNOWLEDGEMENT)
}

pub fn subscribe_newsletter(email: &str) -> Result<&'static str, FormError> {
    validate_email(email.trim())?;
    Ok(NEWSLETTER_ACKNOWLEDGEMENT)
}

fn validate_email(email: &str) -> Result<(), FormError> {
    if email.is_empty() || !email.contains('@') {
        return Err(FormError::InvalidEmail);
    }
    Ok(())
}

fn provided(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
    }

    fn booking() -> BookingData {
        BookingData {
            name: Some("Asha Rao".to_string()),
            email: Some("asha@example.com".to_string()),
            date: Some("2025-03-20".to_string()),
            time: Some("10:30".to_string()),
            consultation_type: Some("contract-review".to_string()),
        }
    }

    #[test]
    fn confirmation_fills_missing_fields_with_placeholder() {
        let data = BookingData {
            name: Some("Asha".to_string()),
            time: Some("   ".to_string()),
            ..BookingData::default()
        };

        let confirmation = book_consultation(&data, today()).expect("booking accepted");

        assert_eq!(confirmation.name, "Asha");
        assert_eq!(confirmation.email, "N/A");
        assert_eq!(confirmation.time, "N/A");
        assert_eq!(confirmation.next_steps.len(), 4);
    }

    #[test]
    fn rejects_email_without_at_sign() {
        let mut data = booking();
        data.email = Some("asha.example.com".to_string());
        assert_eq!(book_consultation(&data, today()), Err(FormError::InvalidEmail));
    }

    #[test]
    fn rejects_dates_before_today() {
        let mut data = booking();
        data.date = Some("2025-03-13".to_string());
        assert!(matches!(
            book_consultation(&data, today()),
            Err(FormError::DateInPast(_))
        ));

        data.date = Some("2025-03-14".to_string());
        assert!(book_consultation(&data, today()).is_ok());
    }

    #[test]
    fn rejects_unparseable_dates() {
        let mut data = booking();
        data.date = Some("next tuesday".to_string());
        assert_eq!(
            book_consultation(&data, today()),
            Err(FormError::InvalidDate("next tuesday".to_string()))
        );
    }

    #[test]
    fn confirmation_markup_escapes_visitor_fields() {
        let mut data = booking();
        data.name = Some("<img src=x onerror=alert(1)>".to_string());

        let html = book_consultation(&data, today())
            .expect("booking accepted")
            .render_html();

        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(!html.contains("<img"));
        assert!(html.contains("<p><strong>Email:</strong> asha@example.com</p>"));
    }

    #[test]
    fn contact_and_newsletter_acknowledge() {
        assert_eq!(
            submit_contact(&ContactSubmission::default()),
            Ok(CONTACT_ACKNOWLEDGEMENT)
        );
        assert_eq!(
            subscribe_newsletter(" reader@example.com "),
            Ok(NEWSLETTER_ACKNOWLEDGEMENT)
        );
        assert_eq!(subscribe_newsletter(""), Err(FormError::InvalidEmail));
    }
}
