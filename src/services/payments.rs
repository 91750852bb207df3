//! Payments screen, scoped to one job.

use chrono::Local;

use crate::context::AppContext;
use crate::domain::payment::{Payment, PaymentFields};
use crate::domain::types::JobId;
use crate::dto::payments::{PaymentRow, PaymentTotals};
use crate::forms::FormError;
use crate::forms::payment::PaymentForm;
use crate::services::screen::{Screen, ScreenController};

pub type PaymentsScreen = ScreenController<Payment>;

impl Screen for Payment {
    type Form = PaymentForm;

    const LABEL: &'static str = "Pagamento";
    const PLURAL: &'static str = "pagamenti";
    const SEARCHABLE: bool = false;
    const MISSING_SCOPE: &'static str = "Nessun lavoro selezionato";

    fn blank_form() -> PaymentForm {
        PaymentForm::dated(Local::now().date_naive())
    }

    fn edit_form(&self) -> PaymentForm {
        PaymentForm::from(self)
    }

    fn payload(form: &PaymentForm, scope: &JobId) -> Result<PaymentFields, FormError> {
        form.to_fields(scope)
    }

    fn search_haystack(&self) -> Vec<String> {
        Vec::new()
    }

    fn resolve_scope(ctx: &AppContext, explicit: Option<JobId>) -> Option<JobId> {
        explicit.or_else(|| ctx.handoff.active_job())
    }
}

impl ScreenController<Payment> {
    /// Totals over every payment on screen.
    pub fn totals(&self) -> PaymentTotals {
        PaymentTotals::from_payments(self.items())
    }

    pub fn rows(&self) -> Vec<PaymentRow> {
        self.items().iter().map(PaymentRow::from).collect()
    }
}
