use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::KeyCode;
use tui::{backend::Backend, Frame};

use super::components::form::{render_form, Choice, FormEvent, FormField, FormState};
use super::read_key;
use crate::domain::validation::{optional, parse_amount, validate_down_payment, ValidationError};
use crate::models::{ContractDetails, DownPayment, PaymentStatus};

const CONTRACT: usize = 0;
const AMOUNT: usize = 1;
const PAYMENT_DATE: usize = 2;
const STATUS: usize = 3;
const NOTES: usize = 4;

pub enum DownPaymentWizardAction {
    Cancel,
    Save(DownPayment),
}

pub struct DownPaymentWizardState {
    id: i32,
    form: FormState,
}

impl DownPaymentWizardState {
    pub fn new(contracts: &[ContractDetails], contract_id: Option<i32>, today: NaiveDate) -> Self {
        Self::from_existing(
            DownPayment {
                id: 0,
                contract_id: contract_id.unwrap_or(0),
                amount: 0.0,
                payment_date: today,
                status: PaymentStatus::Pending,
                notes: None,
            },
            contracts,
        )
    }

    pub fn from_existing(payment: DownPayment, contracts: &[ContractDetails]) -> Self {
        let title = if payment.id == 0 { "New Down Payment" } else { "Edit Down Payment" };
        let options = std::iter::once(Choice::none())
            .chain(contracts.iter().map(|d| {
                Choice::new(
                    d.contract.id,
                    format!("{} - {}", d.contract.contract_number, d.customer_name),
                )
            }))
            .collect();
        let amount = if payment.amount > 0.0 {
            payment.amount.to_string()
        } else {
            String::new()
        };

        let fields = vec![
            FormField::choice("Contract", options, Some(payment.contract_id)),
            FormField::text("Amount", amount),
            FormField::date("Payment date", payment.payment_date),
            FormField::variant("Status", PaymentStatus::ALL, payment.status),
            FormField::text("Notes", payment.notes.unwrap_or_default()),
        ];
        Self {
            id: payment.id,
            form: FormState::new(title, fields),
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.form.set_error(message);
    }

    pub fn build(&self) -> Result<DownPayment, ValidationError> {
        let form = &self.form;
        let payment = DownPayment {
            id: self.id,
            contract_id: form
                .choice(CONTRACT)
                .ok_or(ValidationError::NotSelected("Contract"))?,
            amount: parse_amount("Amount", form.text(AMOUNT))?,
            payment_date: form
                .date(PAYMENT_DATE)
                .ok_or(ValidationError::Required("Payment date"))?,
            status: form
                .variant(STATUS, PaymentStatus::ALL)
                .ok_or(ValidationError::NotSelected("Status"))?,
            notes: optional(form.text(NOTES)),
        };
        validate_down_payment(&payment)?;
        Ok(payment)
    }
}

pub fn render_down_payment_wizard<B: Backend>(frame: &mut Frame<B>, state: &DownPaymentWizardState) {
    render_form(frame, &state.form);
}

pub fn handle_key(state: &mut DownPaymentWizardState, key: KeyCode) -> Option<DownPaymentWizardAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(DownPaymentWizardAction::Cancel),
        FormEvent::Submit => match state.build() {
            Ok(payment) => Some(DownPaymentWizardAction::Save(payment)),
            Err(err) => {
                state.form.set_error(err.to_string());
                None
            }
        },
    }
}

pub fn handle_input(state: &mut DownPaymentWizardState) -> Result<Option<DownPaymentWizardAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::{contract, date, payment};

    fn contracts() -> Vec<ContractDetails> {
        vec![ContractDetails {
            contract: contract(4, None, 20_000.0, date(2024, 1, 5)),
            customer_name: "Ana Haddad".to_string(),
            property_code: "PRP-0001".to_string(),
            employee_name: None,
        }]
    }

    #[test]
    fn contract_is_required() {
        let mut state = DownPaymentWizardState::new(&contracts(), None, date(2024, 2, 1));
        state.form.set_text(AMOUNT, "100");
        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.form.error(), Some("Contract must be selected"));
    }

    #[test]
    fn preselected_contract_saves_as_pending() {
        let mut state = DownPaymentWizardState::new(&contracts(), Some(4), date(2024, 2, 1));
        state.form.set_text(AMOUNT, "2,500");
        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(DownPaymentWizardAction::Save(p)) => {
                assert_eq!(p.contract_id, 4);
                assert_eq!(p.amount, 2500.0);
                assert_eq!(p.status, PaymentStatus::Pending);
                assert_eq!(p.payment_date, date(2024, 2, 1));
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn zero_amount_is_rejected() {
        let existing = payment(9, 4, 300.0, PaymentStatus::Paid, date(2024, 2, 2));
        let mut state = DownPaymentWizardState::from_existing(existing, &contracts());
        state.form.set_text(AMOUNT, "0");
        assert_eq!(state.build().unwrap_err(), ValidationError::NotPositive("Amount"));
    }
}
