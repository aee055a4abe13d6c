use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{backend::Backend, layout::Constraint, Frame};

use super::components::format_amount;
use super::components::listing::{render_table, ListEvent, ListView, TableLayout};
use super::read_key;
use crate::models::{DownPaymentDetails, PaymentStatus};

pub enum DownPaymentAction {
    Back,
    NewDownPayment,
    EditDownPayment(i32),
    DeleteDownPayment(i32),
    MarkPaid(i32),
}

pub struct DownPaymentsState {
    view: ListView<DownPaymentDetails>,
    can_delete: bool,
}

impl DownPaymentsState {
    pub fn new(payments: Vec<DownPaymentDetails>, can_delete: bool) -> Self {
        Self {
            view: ListView::new(payments),
            can_delete,
        }
    }

    pub fn with_filter(mut self, filter: &str) -> Self {
        self.view = self.view.with_filter(filter);
        self
    }

    pub fn filter(&self) -> &str {
        self.view.filter()
    }

    /// Contract of the selected row, used to preselect it for a new payment.
    pub fn selected_contract(&self) -> Option<i32> {
        self.view.selected().map(|d| d.payment.contract_id)
    }

    fn selected_id(&self) -> Option<i32> {
        self.view.selected().map(|d| d.payment.id)
    }

    fn visible_total(&self) -> f64 {
        self.view
            .visible()
            .filter(|d| d.payment.status == PaymentStatus::Paid)
            .map(|d| d.payment.amount)
            .sum()
    }
}

pub fn render_down_payments<B: Backend>(frame: &mut Frame<B>, state: &mut DownPaymentsState) {
    let help = if state.can_delete {
        "<N> New | <E> Edit | <M> Mark paid | <D> Delete | </> Filter | <C> Clear | <Esc> Back"
    } else {
        "<N> New | <E> Edit | <M> Mark paid | </> Filter | <C> Clear | <Esc> Back"
    };
    let layout = TableLayout {
        title: format!("Down payments - paid {}", format_amount(state.visible_total())),
        headers: &["Contract", "Customer", "Date", "Amount", "Status", "Contract amount"],
        widths: &[
            Constraint::Percentage(16),
            Constraint::Percentage(24),
            Constraint::Percentage(12),
            Constraint::Percentage(16),
            Constraint::Percentage(12),
            Constraint::Percentage(20),
        ],
        help: help.to_string(),
        delete_warning: None,
    };

    render_table(frame, &mut state.view, layout, |d| {
        vec![
            d.contract_number.clone(),
            d.customer_name.clone(),
            d.payment.payment_date.format("%Y-%m-%d").to_string(),
            format_amount(d.payment.amount),
            d.payment.status.to_string(),
            format_amount(d.contract_amount),
        ]
    });
}

pub fn handle_key(state: &mut DownPaymentsState, key: KeyCode) -> Option<DownPaymentAction> {
    if key == KeyCode::Char('d') && !state.can_delete && !state.view.is_filtering() {
        return state.selected_id().map(DownPaymentAction::DeleteDownPayment);
    }

    match state.view.handle_key(key)? {
        ListEvent::Back => Some(DownPaymentAction::Back),
        ListEvent::New => Some(DownPaymentAction::NewDownPayment),
        ListEvent::Edit | ListEvent::Open => state.selected_id().map(DownPaymentAction::EditDownPayment),
        ListEvent::Delete => state.selected_id().map(DownPaymentAction::DeleteDownPayment),
        ListEvent::Key('m') => state
            .view
            .selected()
            .filter(|d| d.payment.status == PaymentStatus::Pending)
            .map(|d| DownPaymentAction::MarkPaid(d.payment.id)),
        ListEvent::Key(_) => None,
    }
}

pub fn handle_input(state: &mut DownPaymentsState) -> Result<Option<DownPaymentAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::{date, payment};

    fn details(id: i32, status: PaymentStatus, amount: f64) -> DownPaymentDetails {
        DownPaymentDetails {
            payment: payment(id, 10 + id, amount, status, date(2024, 4, id as u32)),
            contract_number: format!("CTR-2024-{id:04}"),
            customer_name: "Ana Haddad".to_string(),
            contract_amount: 50_000.0,
        }
    }

    fn state() -> DownPaymentsState {
        DownPaymentsState::new(
            vec![
                details(1, PaymentStatus::Paid, 1000.0),
                details(2, PaymentStatus::Pending, 2000.0),
                details(3, PaymentStatus::Paid, 500.0),
            ],
            true,
        )
    }

    #[test]
    fn title_total_counts_visible_paid_rows() {
        let state = state();
        assert_eq!(state.visible_total(), 1500.0);
        let state = state.with_filter("status:paid max:800");
        assert_eq!(state.visible_total(), 500.0);
    }

    #[test]
    fn only_pending_payments_can_be_marked_paid() {
        let mut state = state();
        assert!(handle_key(&mut state, KeyCode::Char('m')).is_none());
        handle_key(&mut state, KeyCode::Down);
        assert!(matches!(
            handle_key(&mut state, KeyCode::Char('m')),
            Some(DownPaymentAction::MarkPaid(2))
        ));
        assert_eq!(state.selected_contract(), Some(12));
    }
}
