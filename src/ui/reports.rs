use anyhow::Result;
use chrono::{Month, NaiveDate};
use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::components::format_amount;
use super::read_key;
use crate::domain::reports::{
    expenses_by_category, top_performers, year_statement, MonthStatement, Performer,
};
use crate::domain::DateRange;
use crate::models::{Contract, DownPayment, Employee, Expense, ExpenseCategory};

const TOP_PERFORMERS: usize = 5;

pub enum ReportAction {
    Back,
}

/// Rows loaded once when the screen opens; figures are recomputed per year.
pub struct ReportData {
    pub contracts: Vec<Contract>,
    pub employees: Vec<Employee>,
    pub payments: Vec<DownPayment>,
    pub expenses: Vec<Expense>,
}

pub struct ReportsState {
    data: ReportData,
    year: i32,
    statement: Vec<MonthStatement>,
    performers: Vec<Performer>,
    categories: Vec<(ExpenseCategory, f64)>,
}

impl ReportsState {
    pub fn new(data: ReportData, year: i32) -> Self {
        let mut state = Self {
            data,
            year,
            statement: Vec::new(),
            performers: Vec::new(),
            categories: Vec::new(),
        };
        state.recompute();
        state
    }

    fn set_year(&mut self, year: i32) {
        if NaiveDate::from_ymd_opt(year, 1, 1).is_some() {
            self.year = year;
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        let range = DateRange::year(self.year);
        self.statement = year_statement(self.year, &self.data.payments, &self.data.expenses);
        self.performers =
            top_performers(&self.data.contracts, &self.data.employees, range, TOP_PERFORMERS);
        self.categories = expenses_by_category(&self.data.expenses, range);
    }

    fn totals(&self) -> (f64, f64) {
        self.statement
            .iter()
            .fold((0.0, 0.0), |(income, spent), m| (income + m.income, spent + m.expenses))
    }
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("?")
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    Row::new(
        titles
            .iter()
            .map(|t| Cell::from(*t).style(Style::default().fg(Color::Yellow))),
    )
    .bottom_margin(1)
}

pub fn render_reports<B: Backend>(frame: &mut Frame<B>, state: &ReportsState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(3)].as_ref())
        .split(frame.size());

    let (income, spent) = state.totals();
    let title = Paragraph::new(format!(
        "Year {}   income {}   expenses {}   net {}",
        state.year,
        format_amount(income),
        format_amount(spent),
        format_amount(income - spent)
    ))
    .style(Style::default().fg(Color::Cyan))
    .block(Block::default().borders(Borders::ALL).title("Reports"));
    frame.render_widget(title, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(rows[1]);

    let months: Vec<Row> = state
        .statement
        .iter()
        .map(|m| {
            let net_style = if m.net() < 0.0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(month_name(m.month)),
                Cell::from(format_amount(m.income)),
                Cell::from(format_amount(m.expenses)),
                Cell::from(format_amount(m.net())).style(net_style),
            ])
        })
        .collect();
    let statement = Table::new(months)
        .header(header_row(&["Month", "Income (paid)", "Expenses", "Net"]))
        .block(Block::default().title("Monthly statement").borders(Borders::ALL))
        .widths(&[
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ]);
    frame.render_widget(statement, columns[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(columns[1]);

    let performers: Vec<Row> = state
        .performers
        .iter()
        .enumerate()
        .map(|(rank, p)| {
            Row::new(vec![
                Cell::from((rank + 1).to_string()),
                Cell::from(p.full_name.clone()),
                Cell::from(p.contract_count.to_string()),
                Cell::from(format_amount(p.total_amount)),
            ])
        })
        .collect();
    let performers = Table::new(performers)
        .header(header_row(&["#", "Employee", "Deals", "Total"]))
        .block(Block::default().title("Top performers").borders(Borders::ALL))
        .widths(&[
            Constraint::Length(3),
            Constraint::Percentage(45),
            Constraint::Percentage(15),
            Constraint::Percentage(35),
        ]);
    frame.render_widget(performers, side[0]);

    let categories: Vec<Row> = state
        .categories
        .iter()
        .map(|(category, total)| {
            Row::new(vec![
                Cell::from(category.to_string()),
                Cell::from(format_amount(*total)),
            ])
        })
        .collect();
    let categories = Table::new(categories)
        .header(header_row(&["Category", "Spent"]))
        .block(Block::default().title("Expenses by category").borders(Borders::ALL))
        .widths(&[Constraint::Percentage(50), Constraint::Percentage(50)]);
    frame.render_widget(categories, side[1]);

    let help = Paragraph::new("Left/Right - Change year | Esc - Back")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, rows[2]);
}

pub fn handle_key(state: &mut ReportsState, key: KeyCode) -> Option<ReportAction> {
    match key {
        KeyCode::Esc | KeyCode::Char('q') => Some(ReportAction::Back),
        KeyCode::Left => {
            state.set_year(state.year - 1);
            None
        }
        KeyCode::Right => {
            state.set_year(state.year + 1);
            None
        }
        _ => None,
    }
}

pub fn handle_input(state: &mut ReportsState) -> Result<Option<ReportAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}
