//! Payment rows and totals shaped for the payments table.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::payment::Payment;

/// Sums over the payments of one job.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PaymentTotals {
    pub amount_due: Decimal,
    pub amount_paid: Decimal,
    pub amount_outstanding: Decimal,
}

impl PaymentTotals {
    /// Totals over `payments`. Sums that overflow a `Decimal` are all reported
    /// as zero.
    pub fn from_payments<'a>(payments: impl IntoIterator<Item = &'a Payment>) -> Self {
        let sums = payments
            .into_iter()
            .try_fold((Decimal::ZERO, Decimal::ZERO), |(due, paid), payment| {
                Some((
                    due.checked_add(payment.amount_due)?,
                    paid.checked_add(payment.amount_paid)?,
                ))
            })
            .and_then(|(due, paid)| Some((due, paid, due.checked_sub(paid)?)));

        match sums {
            Some((amount_due, amount_paid, amount_outstanding)) => Self {
                amount_due,
                amount_paid,
                amount_outstanding,
            },
            None => {
                log::warn!("Payment totals overflow");
                Self::default()
            }
        }
    }
}

/// One payment with the figures the table shows next to it.
#[derive(Clone, Debug, Serialize)]
pub struct PaymentRow {
    pub payment: Payment,
    /// Modification date as `dd/mm/yyyy`.
    pub date: String,
    pub outstanding: Decimal,
    pub settled: bool,
}

impl From<&Payment> for PaymentRow {
    fn from(payment: &Payment) -> Self {
        Self {
            payment: payment.clone(),
            date: format_date(payment.modification_date),
            outstanding: payment.outstanding(),
            settled: payment.is_settled(),
        }
    }
}

/// Formats an amount the Italian way: `1.234,56 €`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}{grouped},{fraction} €", if negative { "-" } else { "" })
}

/// Formats a date as `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn payment(due: Decimal, paid: Decimal) -> Payment {
        Payment {
            id: crate::domain::types::PaymentId::new("1").unwrap(),
            job_id: None,
            modification_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            amount_due: due,
            amount_paid: paid,
            reason: "Saldo".to_string(),
        }
    }

    #[test]
    fn overflowing_totals_are_zero() {
        let payments = [
            payment(Decimal::MAX, Decimal::ZERO),
            payment(Decimal::MAX, Decimal::ZERO),
        ];
        assert_eq!(
            PaymentTotals::from_payments(&payments),
            PaymentTotals::default()
        );

        let payments = [payment(Decimal::MAX, -Decimal::MAX)];
        assert_eq!(
            PaymentTotals::from_payments(&payments),
            PaymentTotals::default()
        );
        assert_eq!(payments[0].outstanding(), Decimal::ZERO);
    }

    #[test]
    fn currency_uses_italian_separators() {
        assert_eq!(format_currency(money("1234.5")), "1.234,50 €");
        assert_eq!(format_currency(money("1234567")), "1.234.567,00 €");
        assert_eq!(format_currency(money("0")), "0,00 €");
        assert_eq!(format_currency(money("-50")), "-50,00 €");
    }

    #[test]
    fn date_is_day_first() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_date(date), "05/01/2024");
    }
}
