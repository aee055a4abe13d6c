use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{backend::Backend, layout::Constraint, Frame};

use super::components::format_amount;
use super::components::listing::{render_table, ListEvent, ListView, TableLayout};
use super::read_key;
use crate::models::Expense;

pub enum ExpenseAction {
    Back,
    NewExpense,
    EditExpense(i32),
    DeleteExpense(i32),
}

pub struct ExpensesState {
    view: ListView<Expense>,
    can_delete: bool,
}

impl ExpensesState {
    pub fn new(expenses: Vec<Expense>, can_delete: bool) -> Self {
        Self {
            view: ListView::new(expenses),
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

pub fn render_expenses<B: Backend>(frame: &mut Frame<B>, state: &mut ExpensesState) {
    let help = if state.can_delete {
        "<N> New | <E> Edit | <D> Delete | </> Filter | <C> Clear | <Esc> Back"
    } else {
        "<N> New | <E> Edit | </> Filter | <C> Clear | <Esc> Back"
    };
    let total: f64 = state.view.visible().map(|e| e.amount).sum();
    let layout = TableLayout {
        title: format!("Expenses - total {}", format_amount(total)),
        headers: &["Date", "Category", "Description", "Amount"],
        widths: &[
            Constraint::Percentage(14),
            Constraint::Percentage(16),
            Constraint::Percentage(50),
            Constraint::Percentage(20),
        ],
        help: help.to_string(),
        delete_warning: None,
    };

    render_table(frame, &mut state.view, layout, |e| {
        vec![
            e.expense_date.format("%Y-%m-%d").to_string(),
            e.category.to_string(),
            e.description.clone(),
            format_amount(e.amount),
        ]
    });
}

pub fn handle_key(state: &mut ExpensesState, key: KeyCode) -> Option<ExpenseAction> {
    if key == KeyCode::Char('d') && !state.can_delete && !state.view.is_filtering() {
        return state.selected_id().map(ExpenseAction::DeleteExpense);
    }

    match state.view.handle_key(key)? {
        ListEvent::Back => Some(ExpenseAction::Back),
        ListEvent::New => Some(ExpenseAction::NewExpense),
        ListEvent::Edit | ListEvent::Open => state.selected_id().map(ExpenseAction::EditExpense),
        ListEvent::Delete => state.selected_id().map(ExpenseAction::DeleteExpense),
        ListEvent::Key(_) => None,
    }
}

pub fn handle_input(state: &mut ExpensesState) -> Result<Option<ExpenseAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::{date, expense};
    use crate::models::ExpenseCategory;

    #[test]
    fn category_filter_then_delete_with_confirmation() {
        let mut state = ExpensesState::new(
            vec![
                expense(1, ExpenseCategory::Salary, 3000.0, date(2024, 1, 31)),
                expense(2, ExpenseCategory::Marketing, 400.0, date(2024, 2, 3)),
            ],
            true,
        )
        .with_filter("type:marketing");

        assert!(handle_key(&mut state, KeyCode::Char('d')).is_none());
        assert!(matches!(
            handle_key(&mut state, KeyCode::Char('y')),
            Some(ExpenseAction::DeleteExpense(2))
        ));
    }
}
