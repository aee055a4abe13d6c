use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;
use tui::{backend::Backend, Frame};

use super::components::employee_choices;
use super::components::form::{render_form, Choice, FormEvent, FormField, FormState};
use super::read_key;
use crate::domain::numbering::next_contract_number;
use crate::domain::validation::{
    optional, parse_amount, required, validate_contract, ValidationError,
};
use crate::models::{Contract, ContractKind, Customer, Employee, Property};

const NUMBER: usize = 0;
const KIND: usize = 1;
const CUSTOMER: usize = 2;
const PROPERTY: usize = 3;
const AGENT: usize = 4;
const AMOUNT: usize = 5;
const SIGN_DATE: usize = 6;
const NOTES: usize = 7;

pub enum ContractWizardAction {
    Cancel,
    Save(Contract),
}

/// Lookup lists the contract form picks from.
pub struct ContractChoices<'a> {
    pub customers: &'a [Customer],
    pub properties: &'a [Property],
    pub employees: &'a [Employee],
}

pub struct ContractWizardState {
    id: i32,
    form: FormState,
}

impl ContractWizardState {
    pub fn new<'a>(
        existing_numbers: impl IntoIterator<Item = &'a str>,
        choices: &ContractChoices<'_>,
        today: NaiveDate,
    ) -> Self {
        let contract = Contract {
            id: 0,
            contract_number: next_contract_number(existing_numbers, today.year()),
            kind: ContractKind::Sale,
            customer_id: 0,
            property_id: 0,
            employee_id: None,
            amount: 0.0,
            sign_date: today,
            notes: None,
        };
        Self::from_existing(contract, choices)
    }

    pub fn from_existing(contract: Contract, choices: &ContractChoices<'_>) -> Self {
        let title = if contract.id == 0 { "New Contract" } else { "Edit Contract" };
        let customers = std::iter::once(Choice::none())
            .chain(choices.customers.iter().map(|c| Choice::new(c.id, c.full_name.clone())))
            .collect();
        let properties = std::iter::once(Choice::none())
            .chain(choices.properties.iter().map(|p| {
                Choice::new(p.id, format!("{} - {} ({})", p.listing_code, p.title, p.status))
            }))
            .collect();
        let amount = if contract.amount > 0.0 {
            contract.amount.to_string()
        } else {
            String::new()
        };

        let fields = vec![
            FormField::text("Contract number", contract.contract_number),
            FormField::variant("Kind", ContractKind::ALL, contract.kind),
            FormField::choice("Customer", customers, Some(contract.customer_id)),
            FormField::choice("Property", properties, Some(contract.property_id)),
            FormField::choice("Agent", employee_choices(choices.employees), contract.employee_id),
            FormField::text("Amount", amount),
            FormField::date("Sign date", contract.sign_date),
            FormField::text("Notes", contract.notes.unwrap_or_default()),
        ];
        Self {
            id: contract.id,
            form: FormState::new(title, fields),
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.form.set_error(message);
    }

    pub fn build(&self) -> Result<Contract, ValidationError> {
        let form = &self.form;
        let contract = Contract {
            id: self.id,
            contract_number: required("Contract number", form.text(NUMBER))?,
            kind: form
                .variant(KIND, ContractKind::ALL)
                .ok_or(ValidationError::NotSelected("Kind"))?,
            customer_id: form
                .choice(CUSTOMER)
                .ok_or(ValidationError::NotSelected("Customer"))?,
            property_id: form
                .choice(PROPERTY)
                .ok_or(ValidationError::NotSelected("Property"))?,
            employee_id: form.choice(AGENT),
            amount: parse_amount("Amount", form.text(AMOUNT))?,
            sign_date: form
                .date(SIGN_DATE)
                .ok_or(ValidationError::Required("Sign date"))?,
            notes: optional(form.text(NOTES)),
        };
        validate_contract(&contract)?;
        Ok(contract)
    }
}

pub fn render_contract_wizard<B: Backend>(frame: &mut Frame<B>, state: &ContractWizardState) {
    render_form(frame, &state.form);
}

pub fn handle_key(state: &mut ContractWizardState, key: KeyCode) -> Option<ContractWizardAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(ContractWizardAction::Cancel),
        FormEvent::Submit => match state.build() {
            Ok(contract) => Some(ContractWizardAction::Save(contract)),
            Err(err) => {
                state.form.set_error(err.to_string());
                None
            }
        },
    }
}

pub fn handle_input(state: &mut ContractWizardState) -> Result<Option<ContractWizardAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::{contract, customer, date, employee, property};
    use crate::models::PropertyStatus;

    struct Lookups {
        customers: Vec<Customer>,
        properties: Vec<Property>,
        employees: Vec<Employee>,
    }

    impl Lookups {
        fn new() -> Self {
            Self {
                customers: vec![customer(1, "Ana Haddad"), customer(2, "Ben Saleh")],
                properties: vec![property(1, "PRP-0001", PropertyStatus::Available, 90_000.0)],
                employees: vec![employee(1, "Rami")],
            }
        }

        fn choices(&self) -> ContractChoices<'_> {
            ContractChoices {
                customers: &self.customers,
                properties: &self.properties,
                employees: &self.employees,
            }
        }
    }

    #[test]
    fn new_contract_is_numbered_for_current_year() {
        let lookups = Lookups::new();
        let state = ContractWizardState::new(
            ["CTR-2024-0003", "CTR-2023-0010"],
            &lookups.choices(),
            date(2024, 8, 1),
        );
        assert_eq!(state.form.text(NUMBER), "CTR-2024-0004");
    }

    #[test]
    fn customer_must_be_selected() {
        let lookups = Lookups::new();
        let mut state = ContractWizardState::new(Vec::<&str>::new(), &lookups.choices(), date(2024, 8, 1));
        state.form.set_text(AMOUNT, "1000");
        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.form.error(), Some("Customer must be selected"));
    }

    #[test]
    fn complete_form_saves() {
        let lookups = Lookups::new();
        let mut state = ContractWizardState::new(Vec::<&str>::new(), &lookups.choices(), date(2024, 8, 1));
        state.form.select_choice(CUSTOMER, Some(2));
        state.form.select_choice(PROPERTY, Some(1));
        state.form.set_text(AMOUNT, "85,000");

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(ContractWizardAction::Save(c)) => {
                assert_eq!(c.contract_number, "CTR-2024-0001");
                assert_eq!(c.customer_id, 2);
                assert_eq!(c.property_id, 1);
                assert_eq!(c.employee_id, None);
                assert_eq!(c.amount, 85_000.0);
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn editing_preselects_existing_links() {
        let lookups = Lookups::new();
        let existing = contract(7, Some(1), 12_000.0, date(2024, 2, 2));
        let state = ContractWizardState::from_existing(existing, &lookups.choices());
        let rebuilt = state.build().unwrap();
        assert_eq!(rebuilt.id, 7);
        assert_eq!(rebuilt.customer_id, 1);
        assert_eq!(rebuilt.employee_id, Some(1));
        assert_eq!(rebuilt.amount, 12_000.0);
    }

    #[test]
    fn lowered_amount_below_payments_is_reported_in_form() {
        use crate::domain::validation::{check_contract_amount, fixtures::payment};
        use crate::models::PaymentStatus;

        let lookups = Lookups::new();
        let on = date(2024, 2, 2);
        let mut state =
            ContractWizardState::from_existing(contract(7, Some(1), 100_000.0, on), &lookups.choices());
        state.form.set_text(AMOUNT, "50,000");

        let edited = match handle_key(&mut state, KeyCode::Char('s')) {
            Some(ContractWizardAction::Save(c)) => c,
            _ => panic!("expected save"),
        };
        let payments = [payment(1, 7, 90_000.0, PaymentStatus::Pending, on)];
        let err = check_contract_amount(&edited, &payments).unwrap_err();
        state.set_error(err.to_string());

        assert_eq!(
            state.form.error(),
            Some("down payments would total 90000.00, above the contract amount of 50000.00")
        );
    }
}
