use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::KeyCode;
use tui::{backend::Backend, Frame};

use super::components::form::{render_form, Choice, FormEvent, FormField, FormState};
use super::read_key;
use crate::domain::validation::{
    optional, parse_amount, required, validate_employee, ValidationError,
};
use crate::models::{Employee, User};

const FULL_NAME: usize = 0;
const POSITION: usize = 1;
const PHONE: usize = 2;
const EMAIL: usize = 3;
const SALARY: usize = 4;
const HIRE_DATE: usize = 5;
const LOGIN: usize = 6;

pub enum EmployeeWizardAction {
    Cancel,
    Save(Employee),
}

pub struct EmployeeWizardState {
    id: i32,
    form: FormState,
}

impl EmployeeWizardState {
    pub fn new(users: &[User], today: NaiveDate) -> Self {
        Self::from_existing(
            Employee {
                id: 0,
                full_name: String::new(),
                position: String::new(),
                phone: String::new(),
                email: None,
                salary: 0.0,
                hire_date: today,
                user_id: None,
            },
            users,
        )
    }

    pub fn from_existing(employee: Employee, users: &[User]) -> Self {
        let title = if employee.id == 0 { "New Employee" } else { "Edit Employee" };
        let logins = std::iter::once(Choice::none())
            .chain(
                users
                    .iter()
                    .map(|u| Choice::new(u.id, format!("{} ({})", u.username, u.full_name))),
            )
            .collect();
        let fields = vec![
            FormField::text("Full name", employee.full_name),
            FormField::text("Position", employee.position),
            FormField::text("Phone", employee.phone),
            FormField::text("Email", employee.email.unwrap_or_default()),
            FormField::text("Salary", employee.salary.to_string()),
            FormField::date("Hire date", employee.hire_date),
            FormField::choice("Login", logins, employee.user_id),
        ];
        Self {
            id: employee.id,
            form: FormState::new(title, fields),
        }
    }

    pub fn build(&self) -> Result<Employee, ValidationError> {
        let form = &self.form;
        let employee = Employee {
            id: self.id,
            full_name: required("Full name", form.text(FULL_NAME))?,
            position: required("Position", form.text(POSITION))?,
            phone: required("Phone", form.text(PHONE))?,
            email: optional(form.text(EMAIL)),
            salary: parse_amount("Salary", form.text(SALARY))?,
            hire_date: form
                .date(HIRE_DATE)
                .ok_or(ValidationError::Required("Hire date"))?,
            user_id: form.choice(LOGIN),
        };
        validate_employee(&employee)?;
        Ok(employee)
    }
}

pub fn render_employee_wizard<B: Backend>(frame: &mut Frame<B>, state: &EmployeeWizardState) {
    render_form(frame, &state.form);
}

pub fn handle_key(state: &mut EmployeeWizardState, key: KeyCode) -> Option<EmployeeWizardAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(EmployeeWizardAction::Cancel),
        FormEvent::Submit => match state.build() {
            Ok(employee) => Some(EmployeeWizardAction::Save(employee)),
            Err(err) => {
                state.form.set_error(err.to_string());
                None
            }
        },
    }
}

pub fn handle_input(state: &mut EmployeeWizardState) -> Result<Option<EmployeeWizardAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}
