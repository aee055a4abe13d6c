use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{backend::Backend, layout::Constraint, Frame};

use super::components::listing::{render_table, ListEvent, ListView, TableLayout};
use super::read_key;
use crate::models::Customer;

pub enum CustomerAction {
    Back,
    NewCustomer,
    EditCustomer(i32),
    DeleteCustomer(i32),
}

pub struct CustomersState {
    view: ListView<Customer>,
    can_delete: bool,
}

impl CustomersState {
    pub fn new(customers: Vec<Customer>, can_delete: bool) -> Self {
        Self {
            view: ListView::new(customers),
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
        self.view.selected().map(|c| c.id)
    }
}

pub fn render_customers<B: Backend>(frame: &mut Frame<B>, state: &mut CustomersState) {
    let help = if state.can_delete {
        "<N> New | <E> Edit | <D> Delete | </> Filter | <C> Clear | <Esc> Back"
    } else {
        "<N> New | <E> Edit | </> Filter | <C> Clear | <Esc> Back"
    };
    let layout = TableLayout {
        title: "Customers".to_string(),
        headers: &["Name", "Phone", "Email", "National ID", "Address"],
        widths: &[
            Constraint::Percentage(24),
            Constraint::Percentage(16),
            Constraint::Percentage(22),
            Constraint::Percentage(14),
            Constraint::Percentage(24),
        ],
        help: help.to_string(),
        delete_warning: None,
    };

    render_table(frame, &mut state.view, layout, |c| {
        vec![
            c.full_name.clone(),
            c.phone.clone(),
            c.email.clone().unwrap_or_default(),
            c.national_id.clone().unwrap_or_default(),
            c.address.clone().unwrap_or_default(),
        ]
    });
}

pub fn handle_key(state: &mut CustomersState, key: KeyCode) -> Option<CustomerAction> {
    if key == KeyCode::Char('d') && !state.can_delete && !state.view.is_filtering() {
        return state.selected_id().map(CustomerAction::DeleteCustomer);
    }

    match state.view.handle_key(key)? {
        ListEvent::Back => Some(CustomerAction::Back),
        ListEvent::New => Some(CustomerAction::NewCustomer),
        ListEvent::Edit | ListEvent::Open => state.selected_id().map(CustomerAction::EditCustomer),
        ListEvent::Delete => state.selected_id().map(CustomerAction::DeleteCustomer),
        ListEvent::Key(_) => None,
    }
}

pub fn handle_input(state: &mut CustomersState) -> Result<Option<CustomerAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::customer;

    #[test]
    fn enter_opens_filtered_selection_for_editing() {
        let mut state = CustomersState::new(
            vec![customer(1, "Ana Haddad"), customer(2, "Ben Saleh")],
            true,
        )
        .with_filter("saleh");
        assert!(matches!(
            handle_key(&mut state, KeyCode::Enter),
            Some(CustomerAction::EditCustomer(2))
        ));
        assert_eq!(state.filter(), "saleh");
    }

    #[test]
    fn new_works_on_empty_list() {
        let mut state = CustomersState::new(Vec::new(), false);
        assert!(matches!(
            handle_key(&mut state, KeyCode::Char('n')),
            Some(CustomerAction::NewCustomer)
        ));
        assert!(handle_key(&mut state, KeyCode::Char('d')).is_none());
    }
}
