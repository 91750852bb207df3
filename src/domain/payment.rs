use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::Resource;
use crate::domain::types::{JobId, PaymentId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Payment {
    pub id: PaymentId,
    /// Job the payment is recorded against. Some list endpoints omit it.
    #[serde(rename = "lavoroId", default)]
    pub job_id: Option<JobId>,
    #[serde(rename = "dataModifica")]
    pub modification_date: NaiveDate,
    #[serde(
        rename = "importoDovuto",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount_due: Decimal,
    #[serde(
        rename = "importoPagato",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount_paid: Decimal,
    #[serde(rename = "causale", default)]
    pub reason: String,
}

impl Payment {
    /// Amount still to be collected. Overpayment yields a negative value; a
    /// difference that overflows reads as zero.
    pub fn outstanding(&self) -> Decimal {
        self.amount_due
            .checked_sub(self.amount_paid)
            .unwrap_or(Decimal::ZERO)
    }

    /// A payment is settled once nothing remains outstanding.
    pub fn is_settled(&self) -> bool {
        self.outstanding() <= Decimal::ZERO
    }
}

/// Fields submitted when creating or updating a payment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentFields {
    #[serde(rename = "lavoroId")]
    pub job_id: JobId,
    #[serde(rename = "dataModifica")]
    pub modification_date: NaiveDate,
    #[serde(
        rename = "importoDovuto",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount_due: Decimal,
    #[serde(
        rename = "importoPagato",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount_paid: Decimal,
    #[serde(rename = "causale")]
    pub reason: String,
}

impl Resource for Payment {
    type Id = PaymentId;
    type Scope = JobId;
    type Fields = PaymentFields;

    fn id(&self) -> &PaymentId {
        &self.id
    }

    fn assemble(id: PaymentId, fields: PaymentFields) -> Self {
        Self {
            id,
            job_id: Some(fields.job_id),
            modification_date: fields.modification_date,
            amount_due: fields.amount_due,
            amount_paid: fields.amount_paid,
            reason: fields.reason,
        }
    }

    fn belongs_to(&self, scope: &JobId) -> bool {
        self.job_id.as_ref().is_none_or(|job| job == scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn payment(due: Decimal, paid: Decimal) -> Payment {
        Payment {
            id: PaymentId::new("1").unwrap(),
            job_id: Some(JobId::new("1").unwrap()),
            modification_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            amount_due: due,
            amount_paid: paid,
            reason: "Acconto materiali".to_string(),
        }
    }

    #[test]
    fn outstanding_is_due_minus_paid() {
        let partial = payment(money("100.00"), money("40.00"));
        assert_eq!(partial.outstanding(), money("60.00"));
        assert!(!partial.is_settled());
    }

    #[test]
    fn exact_payment_is_settled() {
        let exact = payment(money("100.00"), money("100.00"));
        assert_eq!(exact.outstanding(), money("0.00"));
        assert!(exact.is_settled());
    }

    #[test]
    fn overpayment_is_negative_and_settled() {
        let over = payment(money("100.00"), money("150.00"));
        assert_eq!(over.outstanding(), money("-50.00"));
        assert!(over.is_settled());
    }

    #[test]
    fn payment_reads_numbers_and_strings() {
        let parsed: Payment = serde_json::from_str(
            r#"{"id": 2, "lavoroId": 1, "dataModifica": "2024-02-01", "importoDovuto": 3000, "importoPagato": "2999.50", "causale": "Saldo finale lavori"}"#,
        )
        .unwrap();

        assert_eq!(parsed.amount_due, money("3000"));
        assert_eq!(parsed.outstanding(), money("0.50"));

        let written = serde_json::to_value(&parsed).unwrap();
        assert_eq!(written["importoDovuto"], serde_json::json!(3000.0));
        assert_eq!(written["dataModifica"], "2024-02-01");
    }
}
