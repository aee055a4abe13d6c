use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{backend::Backend, layout::Constraint, Frame};

use super::components::format_amount;
use super::components::listing::{render_table, ListEvent, ListView, TableLayout};
use super::read_key;
use crate::models::Employee;

pub enum EmployeeAction {
    Back,
    NewEmployee,
    EditEmployee(i32),
    DeleteEmployee(i32),
}

pub struct EmployeesState {
    view: ListView<Employee>,
    can_delete: bool,
}

impl EmployeesState {
    pub fn new(employees: Vec<Employee>, can_delete: bool) -> Self {
        Self {
            view: ListView::new(employees),
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

    fn selected_id(&self) -> Option<i32> {
        self.view.selected().map(|e| e.id)
    }
}

pub fn render_employees<B: Backend>(frame: &mut Frame<B>, state: &mut EmployeesState) {
    let help = if state.can_delete {
        "<N> New | <E> Edit | <D> Delete | </> Filter | <C> Clear | <Esc> Back"
    } else {
        "<N> New | <E> Edit | </> Filter | <C> Clear | <Esc> Back"
    };
    let layout = TableLayout {
        title: "Employees".to_string(),
        headers: &["Name", "Position", "Phone", "Email", "Salary", "Hired"],
        widths: &[
            Constraint::Percentage(22),
            Constraint::Percentage(16),
            Constraint::Percentage(14),
            Constraint::Percentage(20),
            Constraint::Percentage(14),
            Constraint::Percentage(14),
        ],
        help: help.to_string(),
        delete_warning: Some("Listings, contracts and expenses keep their history without the link."),
    };

    render_table(frame, &mut state.view, layout, |e| {
        vec![
            e.full_name.clone(),
            e.position.clone(),
            e.phone.clone(),
            e.email.clone().unwrap_or_default(),
            format_amount(e.salary),
            e.hire_date.format("%Y-%m-%d").to_string(),
        ]
    });
}

pub fn handle_key(state: &mut EmployeesState, key: KeyCode) -> Option<EmployeeAction> {
    if key == KeyCode::Char('d') && !state.can_delete && !state.view.is_filtering() {
        return state.selected_id().map(EmployeeAction::DeleteEmployee);
    }

    match state.view.handle_key(key)? {
        ListEvent::Back => Some(EmployeeAction::Back),
        ListEvent::New => Some(EmployeeAction::NewEmployee),
        ListEvent::Edit | ListEvent::Open => state.selected_id().map(EmployeeAction::EditEmployee),
        ListEvent::Delete => state.selected_id().map(EmployeeAction::DeleteEmployee),
        ListEvent::Key(_) => None,
    }
}

pub fn handle_input(state: &mut EmployeesState) -> Result<Option<EmployeeAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::employee;

    #[test]
    fn edit_targets_selected_employee() {
        let mut state = EmployeesState::new(vec![employee(1, "Rami"), employee(2, "Joud")], true);
        handle_key(&mut state, KeyCode::Up);
        assert!(matches!(
            handle_key(&mut state, KeyCode::Char('e')),
            Some(EmployeeAction::EditEmployee(2))
        ));
        assert!(matches!(handle_key(&mut state, KeyCode::Char('q')), Some(EmployeeAction::Back)));
    }
}
