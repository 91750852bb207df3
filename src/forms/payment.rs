use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::domain::payment::{Payment, PaymentFields};
use crate::domain::types::JobId;
use crate::forms::{FormError, trim_in_place};

/// Date format used by the date input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Validate)]
/// Form data for adding or editing a payment. Amounts and the date are kept as
/// typed until submission.
pub struct PaymentForm {
    #[validate(length(min = 1))]
    pub modification_date: String,
    #[validate(length(min = 1))]
    pub amount_due: String,
    #[validate(length(min = 1))]
    pub amount_paid: String,
    #[validate(length(min = 1))]
    pub reason: String,
}

impl PaymentForm {
    /// Blank form dated `today`.
    pub fn dated(today: NaiveDate) -> Self {
        Self {
            modification_date: today.format(DATE_FORMAT).to_string(),
            ..Self::default()
        }
    }

    /// Converts the form into fields recorded against `job_id`.
    pub fn to_fields(&self, job_id: &JobId) -> Result<PaymentFields, FormError> {
        let mut form = self.clone();
        trim_in_place(&mut form.modification_date);
        trim_in_place(&mut form.amount_due);
        trim_in_place(&mut form.amount_paid);
        trim_in_place(&mut form.reason);
        form.validate()?;

        let modification_date = NaiveDate::parse_from_str(&form.modification_date, DATE_FORMAT)
            .map_err(|_| FormError::InvalidDate(form.modification_date.clone()))?;

        Ok(PaymentFields {
            job_id: job_id.clone(),
            modification_date,
            amount_due: parse_amount(&form.amount_due)?,
            amount_paid: parse_amount(&form.amount_paid)?,
            reason: form.reason,
        })
    }
}

impl From<&Payment> for PaymentForm {
    fn from(payment: &Payment) -> Self {
        Self {
            modification_date: payment.modification_date.format(DATE_FORMAT).to_string(),
            amount_due: payment.amount_due.to_string(),
            amount_paid: payment.amount_paid.to_string(),
            reason: payment.reason.clone(),
        }
    }
}

/// Parses an amount typed with either a decimal point or a decimal comma.
fn parse_amount(raw: &str) -> Result<Decimal, FormError> {
    let normalized = raw.replace(',', ".");
    Decimal::from_str(&normalized).map_err(|_| FormError::InvalidAmount(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobId {
        JobId::new("1").unwrap()
    }

    #[test]
    fn blank_form_is_dated_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let form = PaymentForm::dated(today);

        assert_eq!(form.modification_date, "2024-03-09");
        assert!(form.amount_due.is_empty());
    }

    #[test]
    fn amounts_accept_decimal_comma() {
        let form = PaymentForm {
            modification_date: "2024-01-20".to_string(),
            amount_due: "8000".to_string(),
            amount_paid: "4000,50".to_string(),
            reason: "Prima rata impianto".to_string(),
        };

        let fields = form.to_fields(&job()).unwrap();

        assert_eq!(fields.amount_paid.to_string(), "4000.50");
        assert_eq!(fields.job_id, job());
    }

    #[test]
    fn malformed_input_is_rejected() {
        let mut form = PaymentForm {
            modification_date: "20/01/2024".to_string(),
            amount_due: "8000".to_string(),
            amount_paid: "0".to_string(),
            reason: "Prima rata impianto".to_string(),
        };
        assert!(matches!(
            form.to_fields(&job()),
            Err(FormError::InvalidDate(_))
        ));

        form.modification_date = "2024-01-20".to_string();
        form.amount_due = "ottomila".to_string();
        assert!(matches!(
            form.to_fields(&job()),
            Err(FormError::InvalidAmount(_))
        ));

        form.amount_due = String::new();
        assert!(matches!(
            form.to_fields(&job()),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn edit_form_round_trips_the_record() {
        let form = PaymentForm {
            modification_date: "2024-02-01".to_string(),
            amount_due: "3000".to_string(),
            amount_paid: "3000".to_string(),
            reason: "Saldo finale lavori".to_string(),
        };
        let fields = form.to_fields(&job()).unwrap();
        let payment = Payment {
            id: crate::domain::types::PaymentId::new("2").unwrap(),
            job_id: Some(fields.job_id),
            modification_date: fields.modification_date,
            amount_due: fields.amount_due,
            amount_paid: fields.amount_paid,
            reason: fields.reason,
        };

        assert_eq!(PaymentForm::from(&payment), form);
    }
}
