use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{backend::Backend, Frame};

use super::components::form::{render_form, FormEvent, FormField, FormState};
use super::read_key;
use crate::domain::validation::{optional, required, validate_customer, ValidationError};
use crate::models::Customer;

const FULL_NAME: usize = 0;
const PHONE: usize = 1;
const EMAIL: usize = 2;
const NATIONAL_ID: usize = 3;
const ADDRESS: usize = 4;
const NOTES: usize = 5;

pub enum CustomerWizardAction {
    Cancel,
    Save(Customer),
}

pub struct CustomerWizardState {
    id: i32,
    form: FormState,
}

impl CustomerWizardState {
    pub fn new() -> Self {
        Self::from_existing(Customer {
            id: 0,
            full_name: String::new(),
            phone: String::new(),
            email: None,
            national_id: None,
            address: None,
            notes: None,
        })
    }

    pub fn from_existing(customer: Customer) -> Self {
        let title = if customer.id == 0 { "New Customer" } else { "Edit Customer" };
        let fields = vec![
            FormField::text("Full name", customer.full_name),
            FormField::text("Phone", customer.phone),
            FormField::text("Email", customer.email.unwrap_or_default()),
            FormField::text("National ID", customer.national_id.unwrap_or_default()),
            FormField::text("Address", customer.address.unwrap_or_default()),
            FormField::text("Notes", customer.notes.unwrap_or_default()),
        ];
        Self {
            id: customer.id,
            form: FormState::new(title, fields),
        }
    }

    pub fn build(&self) -> Result<Customer, ValidationError> {
        let form = &self.form;
        let customer = Customer {
            id: self.id,
            full_name: required("Full name", form.text(FULL_NAME))?,
            phone: required("Phone", form.text(PHONE))?,
            email: optional(form.text(EMAIL)),
            national_id: optional(form.text(NATIONAL_ID)),
            address: optional(form.text(ADDRESS)),
            notes: optional(form.text(NOTES)),
        };
        validate_customer(&customer)?;
        Ok(customer)
    }
}

pub fn render_customer_wizard<B: Backend>(frame: &mut Frame<B>, state: &CustomerWizardState) {
    render_form(frame, &state.form);
}

pub fn handle_key(state: &mut CustomerWizardState, key: KeyCode) -> Option<CustomerWizardAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(CustomerWizardAction::Cancel),
        FormEvent::Submit => match state.build() {
            Ok(customer) => Some(CustomerWizardAction::Save(customer)),
            Err(err) => {
                state.form.set_error(err.to_string());
                None
            }
        },
    }
}

pub fn handle_input(state: &mut CustomerWizardState) -> Result<Option<CustomerWizardAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::customer;

    #[test]
    fn empty_full_name_is_rejected() {
        let mut state = CustomerWizardState::new();
        state.form.set_text(PHONE, "555-0101");
        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.form.error(), Some("Full name is required"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut state = CustomerWizardState::from_existing(customer(3, "Ana Haddad"));
        state.form.set_text(EMAIL, "ana.example.com");
        assert_eq!(
            state.build().unwrap_err(),
            ValidationError::InvalidEmail("ana.example.com".to_string())
        );
    }

    #[test]
    fn blank_optionals_become_none() {
        let mut state = CustomerWizardState::new();
        state.form.set_text(FULL_NAME, " Ben Saleh ");
        state.form.set_text(PHONE, "555-0102");
        state.form.set_text(NOTES, "   ");
        state.form.set_text(EMAIL, "ben@example.com");

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(CustomerWizardAction::Save(c)) => {
                assert_eq!(c.id, 0);
                assert_eq!(c.full_name, "Ben Saleh");
                assert_eq!(c.email.as_deref(), Some("ben@example.com"));
                assert_eq!(c.notes, None);
            }
            _ => panic!("expected save"),
        }
    }
}
