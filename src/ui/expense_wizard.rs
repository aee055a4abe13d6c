use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::KeyCode;
use tui::{backend::Backend, Frame};

use super::components::employee_choices;
use super::components::form::{render_form, Choice, FormEvent, FormField, FormState};
use super::read_key;
use crate::domain::validation::{parse_amount, required, validate_expense, ValidationError};
use crate::models::{Employee, Expense, ExpenseCategory, Property};

const CATEGORY: usize = 0;
const AMOUNT: usize = 1;
const EXPENSE_DATE: usize = 2;
const DESCRIPTION: usize = 3;
const EMPLOYEE: usize = 4;
const PROPERTY: usize = 5;

pub enum ExpenseWizardAction {
    Cancel,
    Save(Expense),
}

pub struct ExpenseWizardState {
    id: i32,
    form: FormState,
}

impl ExpenseWizardState {
    pub fn new(employees: &[Employee], properties: &[Property], today: NaiveDate) -> Self {
        Self::from_existing(
            Expense {
                id: 0,
                category: ExpenseCategory::Other,
                amount: 0.0,
                expense_date: today,
                description: String::new(),
                employee_id: None,
                property_id: None,
            },
            employees,
            properties,
        )
    }

    pub fn from_existing(expense: Expense, employees: &[Employee], properties: &[Property]) -> Self {
        let title = if expense.id == 0 { "New Expense" } else { "Edit Expense" };
        let listings = std::iter::once(Choice::none())
            .chain(
                properties
                    .iter()
                    .map(|p| Choice::new(p.id, format!("{} - {}", p.listing_code, p.title))),
            )
            .collect();
        let amount = if expense.amount > 0.0 {
            expense.amount.to_string()
        } else {
            String::new()
        };

        let fields = vec![
            FormField::variant("Category", ExpenseCategory::ALL, expense.category),
            FormField::text("Amount", amount),
            FormField::date("Date", expense.expense_date),
            FormField::text("Description", expense.description),
            FormField::choice("Employee", employee_choices(employees), expense.employee_id),
            FormField::choice("Property", listings, expense.property_id),
        ];
        Self {
            id: expense.id,
            form: FormState::new(title, fields),
        }
    }

    pub fn build(&self) -> Result<Expense, ValidationError> {
        let form = &self.form;
        let expense = Expense {
            id: self.id,
            category: form
                .variant(CATEGORY, ExpenseCategory::ALL)
                .ok_or(ValidationError::NotSelected("Category"))?,
            amount: parse_amount("Amount", form.text(AMOUNT))?,
            expense_date: form
                .date(EXPENSE_DATE)
                .ok_or(ValidationError::Required("Date"))?,
            description: required("Description", form.text(DESCRIPTION))?,
            employee_id: form.choice(EMPLOYEE),
            property_id: form.choice(PROPERTY),
        };
        validate_expense(&expense)?;
        Ok(expense)
    }
}

pub fn render_expense_wizard<B: Backend>(frame: &mut Frame<B>, state: &ExpenseWizardState) {
    render_form(frame, &state.form);
}

pub fn handle_key(state: &mut ExpenseWizardState, key: KeyCode) -> Option<ExpenseWizardAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(ExpenseWizardAction::Cancel),
        FormEvent::Submit => match state.build() {
            Ok(expense) => Some(ExpenseWizardAction::Save(expense)),
            Err(err) => {
                state.form.set_error(err.to_string());
                None
            }
        },
    }
}

pub fn handle_input(state: &mut ExpenseWizardState) -> Result<Option<ExpenseWizardAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::{date, employee, expense};

    #[test]
    fn description_is_required() {
        let mut state = ExpenseWizardState::new(&[], &[], date(2024, 3, 1));
        state.form.set_text(AMOUNT, "120");
        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.form.error(), Some("Description is required"));
    }

    #[test]
    fn salary_expense_links_employee() {
        let mut state = ExpenseWizardState::new(&[employee(5, "Joud")], &[], date(2024, 3, 1));
        state.form.handle_key(KeyCode::Left);
        state.form.set_text(AMOUNT, "3,200");
        state.form.set_text(DESCRIPTION, "March salary");
        state.form.select_choice(EMPLOYEE, Some(5));

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(ExpenseWizardAction::Save(e)) => {
                assert_eq!(e.category, ExpenseCategory::Office);
                assert_eq!(e.amount, 3200.0);
                assert_eq!(e.employee_id, Some(5));
                assert_eq!(e.property_id, None);
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn edit_round_trips_existing_values() {
        let existing = expense(3, ExpenseCategory::Utilities, 75.5, date(2024, 1, 9));
        let state = ExpenseWizardState::from_existing(existing, &[], &[]);
        let rebuilt = state.build().unwrap();
        assert_eq!(rebuilt.id, 3);
        assert_eq!(rebuilt.category, ExpenseCategory::Utilities);
        assert_eq!(rebuilt.description, "utilities expense");
    }
}
