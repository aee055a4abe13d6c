use std::collections::HashMap;

use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{backend::Backend, layout::Constraint, Frame};

use super::components::format_amount;
use super::components::listing::{render_table, ListEvent, ListView, TableLayout};
use super::read_key;
use crate::domain::reports::{contract_balance, ContractBalance};
use crate::models::{ContractDetails, DownPayment};

pub enum ContractAction {
    Back,
    NewContract,
    EditContract(i32),
    DeleteContract(i32),
    /// Show the down payments of the contract with this number
    ShowPayments(String),
}

pub struct ContractsState {
    view: ListView<ContractDetails>,
    balances: HashMap<i32, ContractBalance>,
    can_delete: bool,
}

impl ContractsState {
    pub fn new(contracts: Vec<ContractDetails>, payments: &[DownPayment], can_delete: bool) -> Self {
        let balances = contracts
            .iter()
            .map(|d| {
                let c = &d.contract;
                (c.id, contract_balance(c.id, c.amount, payments))
            })
            .collect();
        Self {
            view: ListView::new(contracts),
            balances,
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

    pub fn contract_numbers(&self) -> Vec<&str> {
        self.view
            .items()
            .iter()
            .map(|d| d.contract.contract_number.as_str())
            .collect()
    }

    fn selected_id(&self) -> Option<i32> {
        self.view.selected().map(|d| d.contract.id)
    }
}

pub fn render_contracts<B: Backend>(frame: &mut Frame<B>, state: &mut ContractsState) {
    let help = if state.can_delete {
        "<N> New | <E> Edit | <D> Delete | <P> Payments | </> Filter | <C> Clear | <Esc> Back"
    } else {
        "<N> New | <E> Edit | <P> Payments | </> Filter | <C> Clear | <Esc> Back"
    };
    let layout = TableLayout {
        title: "Contracts".to_string(),
        headers: &[
            "Number", "Kind", "Customer", "Property", "Agent", "Signed", "Amount", "Paid", "Pending",
            "Remaining",
        ],
        widths: &[
            Constraint::Percentage(12),
            Constraint::Percentage(6),
            Constraint::Percentage(13),
            Constraint::Percentage(8),
            Constraint::Percentage(12),
            Constraint::Percentage(10),
            Constraint::Percentage(11),
            Constraint::Percentage(10),
            Constraint::Percentage(9),
            Constraint::Percentage(9),
        ],
        help: help.to_string(),
        delete_warning: Some("All down payments recorded on it are deleted too."),
    };

    let balances = &state.balances;
    render_table(frame, &mut state.view, layout, |d| {
        let c = &d.contract;
        let balance = balances.get(&c.id);
        vec![
            c.contract_number.clone(),
            c.kind.to_string(),
            d.customer_name.clone(),
            d.property_code.clone(),
            d.employee_name.clone().unwrap_or_else(|| "-".to_string()),
            c.sign_date.format("%Y-%m-%d").to_string(),
            format_amount(c.amount),
            balance.map(|b| format_amount(b.paid)).unwrap_or_default(),
            balance.map(|b| format_amount(b.pending)).unwrap_or_default(),
            balance.map(|b| format_amount(b.remaining)).unwrap_or_default(),
        ]
    });
}

pub fn handle_key(state: &mut ContractsState, key: KeyCode) -> Option<ContractAction> {
    if key == KeyCode::Char('d') && !state.can_delete && !state.view.is_filtering() {
        return state.selected_id().map(ContractAction::DeleteContract);
    }

    match state.view.handle_key(key)? {
        ListEvent::Back => Some(ContractAction::Back),
        ListEvent::New => Some(ContractAction::NewContract),
        ListEvent::Edit | ListEvent::Open => state.selected_id().map(ContractAction::EditContract),
        ListEvent::Delete => state.selected_id().map(ContractAction::DeleteContract),
        ListEvent::Key('p') => state
            .view
            .selected()
            .map(|d| ContractAction::ShowPayments(d.contract.contract_number.clone())),
        ListEvent::Key(_) => None,
    }
}

pub fn handle_input(state: &mut ContractsState) -> Result<Option<ContractAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::{contract, date, payment};
    use crate::models::PaymentStatus;

    fn details(id: i32, amount: f64) -> ContractDetails {
        ContractDetails {
            contract: contract(id, Some(1), amount, date(2024, 3, id as u32)),
            customer_name: format!("Customer {id}"),
            property_code: format!("PRP-{id:04}"),
            employee_name: Some("Rami".to_string()),
        }
    }

    #[test]
    fn balances_are_computed_per_contract() {
        let payments = [
            payment(1, 1, 4000.0, PaymentStatus::Paid, date(2024, 3, 2)),
            payment(2, 1, 1000.0, PaymentStatus::Pending, date(2024, 3, 3)),
        ];
        let state = ContractsState::new(vec![details(1, 10_000.0), details(2, 500.0)], &payments, true);
        assert_eq!(state.balances[&1].remaining, 6000.0);
        assert_eq!(state.balances[&1].pending, 1000.0);
        assert_eq!(state.balances[&2].paid, 0.0);
        assert_eq!(state.contract_numbers(), vec!["CTR-2024-0001", "CTR-2024-0002"]);
    }

    #[test]
    fn p_opens_payments_of_selected_contract() {
        let mut state = ContractsState::new(vec![details(1, 1.0), details(2, 1.0)], &[], true);
        handle_key(&mut state, KeyCode::Down);
        match handle_key(&mut state, KeyCode::Char('p')) {
            Some(ContractAction::ShowPayments(number)) => assert_eq!(number, "CTR-2024-0002"),
            _ => panic!("expected payments"),
        }
    }
}
