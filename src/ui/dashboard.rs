use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::components::format_amount;
use super::read_key;
use crate::domain::reports::DashboardSummary;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuItem {
    Properties,
    Customers,
    Employees,
    Contracts,
    DownPayments,
    Expenses,
    Reports,
    Logout,
}

impl MenuItem {
    const ALL: [MenuItem; 8] = [
        MenuItem::Properties,
        MenuItem::Customers,
        MenuItem::Employees,
        MenuItem::Contracts,
        MenuItem::DownPayments,
        MenuItem::Expenses,
        MenuItem::Reports,
        MenuItem::Logout,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuItem::Properties => "Properties",
            MenuItem::Customers => "Customers",
            MenuItem::Employees => "Employees",
            MenuItem::Contracts => "Contracts",
            MenuItem::DownPayments => "Down payments",
            MenuItem::Expenses => "Expenses",
            MenuItem::Reports => "Reports",
            MenuItem::Logout => "Log out",
        }
    }
}

pub enum DashboardAction {
    Open(MenuItem),
    Quit,
}

pub struct DashboardState {
    user_name: String,
    is_admin: bool,
    summary: DashboardSummary,
    list_state: ListState,
}

impl DashboardState {
    pub fn new(user_name: String, is_admin: bool, summary: DashboardSummary) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            user_name,
            is_admin,
            summary,
            list_state,
        }
    }

    fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.list_state.selected().unwrap_or(0)]
    }

    fn step(&mut self, forward: bool) {
        let len = MenuItem::ALL.len();
        let current = self.list_state.selected().unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.list_state.select(Some(next));
    }
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, state: &mut DashboardState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(3)].as_ref())
        .split(frame.size());

    let role = if state.is_admin { "administrator" } else { "staff" };
    let header = Paragraph::new(format!("Welcome, {} ({role})", state.user_name))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title("Realty Manager"));
    frame.render_widget(header, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(rows[1]);

    let items: Vec<ListItem> = MenuItem::ALL
        .iter()
        .enumerate()
        .map(|(i, item)| ListItem::new(format!("{}. {}", i + 1, item.label())))
        .collect();
    let menu = List::new(items)
        .block(Block::default().title("Menu").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_stateful_widget(menu, columns[0], &mut state.list_state);

    let summary = &state.summary;
    let mut lines = vec![Spans::from(Span::styled(
        format!("Properties: {}", summary.property_count()),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (status, count) in &summary.properties_by_status {
        lines.push(Spans::from(format!("  {status:<10} {count}")));
    }
    lines.extend([
        Spans::from(""),
        Spans::from(format!("Customers: {}", summary.customer_count)),
        Spans::from(format!("Employees: {}", summary.employee_count)),
        Spans::from(""),
        Spans::from(Span::styled(
            "This month",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(format!(
            "  Contracts signed:   {} ({})",
            summary.contracts_this_month,
            format_amount(summary.contract_value_this_month)
        )),
        Spans::from(format!(
            "  Down payments paid: {}",
            format_amount(summary.payments_this_month)
        )),
        Spans::from(format!(
            "  Expenses:           {}",
            format_amount(summary.expenses_this_month)
        )),
    ]);
    let net = summary.net_this_month();
    let net_color = if net < 0.0 { Color::Red } else { Color::Green };
    lines.push(Spans::from(Span::styled(
        format!("  Net:                {}", format_amount(net)),
        Style::default().fg(net_color),
    )));

    let overview = Paragraph::new(lines).block(Block::default().title("Overview").borders(Borders::ALL));
    frame.render_widget(overview, columns[1]);

    let help = Paragraph::new("Up/Down - Select | Enter or 1-8 - Open | Q - Quit")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, rows[2]);
}

pub fn handle_key(state: &mut DashboardState, key: KeyCode) -> Option<DashboardAction> {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => Some(DashboardAction::Quit),
        KeyCode::Down => {
            state.step(true);
            None
        }
        KeyCode::Up => {
            state.step(false);
            None
        }
        KeyCode::Enter => Some(DashboardAction::Open(state.selected())),
        KeyCode::Char(c) => {
            let index = c.to_digit(10)? as usize;
            let item = *MenuItem::ALL.get(index.checked_sub(1)?)?;
            state.list_state.select(Some(index - 1));
            Some(DashboardAction::Open(item))
        }
        _ => None,
    }
}

pub fn handle_input(state: &mut DashboardState) -> Result<Option<DashboardAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}
