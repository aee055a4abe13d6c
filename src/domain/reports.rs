//! Aggregations shown on the dashboard and the reports screen.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use super::DateRange;
use crate::models::{
    Contract, Customer, DownPayment, Employee, Expense, ExpenseCategory, PaymentStatus,
    Property, PropertyStatus,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub total: f64,
    pub count: usize,
}

impl MonthlyTotal {
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Groups `(date, amount)` pairs by calendar month, oldest first.
pub fn monthly_totals<I>(entries: I) -> Vec<MonthlyTotal>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut months: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for (date, amount) in entries {
        let slot = months.entry((date.year(), date.month())).or_insert((0.0, 0));
        slot.0 += amount;
        slot.1 += 1;
    }

    months
        .into_iter()
        .map(|((year, month), (total, count))| MonthlyTotal {
            year,
            month,
            total,
            count,
        })
        .collect()
}

/// Income from down payments; only paid ones count.
pub fn payments_by_month(payments: &[DownPayment], range: DateRange) -> Vec<MonthlyTotal> {
    monthly_totals(
        payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Paid && range.contains(p.payment_date))
            .map(|p| (p.payment_date, p.amount)),
    )
}

pub fn expenses_by_month(expenses: &[Expense], range: DateRange) -> Vec<MonthlyTotal> {
    monthly_totals(
        expenses
            .iter()
            .filter(|e| range.contains(e.expense_date))
            .map(|e| (e.expense_date, e.amount)),
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthStatement {
    pub month: u32,
    pub income: f64,
    pub expenses: f64,
}

impl MonthStatement {
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Twelve rows, January to December, zero-filled.
pub fn year_statement(year: i32, payments: &[DownPayment], expenses: &[Expense]) -> Vec<MonthStatement> {
    let range = DateRange::year(year);
    let mut rows: Vec<MonthStatement> = (1..=12)
        .map(|month| MonthStatement {
            month,
            income: 0.0,
            expenses: 0.0,
        })
        .collect();

    for total in payments_by_month(payments, range) {
        rows[total.month as usize - 1].income = total.total;
    }
    for total in expenses_by_month(expenses, range) {
        rows[total.month as usize - 1].expenses = total.total;
    }

    rows
}

#[derive(Debug, Clone, PartialEq)]
pub struct Performer {
    pub employee_id: i32,
    pub full_name: String,
    pub contract_count: usize,
    pub total_amount: f64,
}

/// Employees ranked by the summed amount of contracts signed in `range`.
///
/// Contracts without an employee, or whose employee is unknown, are skipped.
pub fn top_performers(
    contracts: &[Contract],
    employees: &[Employee],
    range: DateRange,
    limit: usize,
) -> Vec<Performer> {
    let names: HashMap<i32, &str> = employees
        .iter()
        .map(|e| (e.id, e.full_name.as_str()))
        .collect();

    let mut totals: HashMap<i32, (usize, f64)> = HashMap::new();
    for contract in contracts.iter().filter(|c| range.contains(c.sign_date)) {
        let Some(employee_id) = contract.employee_id else {
            continue;
        };
        if !names.contains_key(&employee_id) {
            continue;
        }
        let slot = totals.entry(employee_id).or_insert((0, 0.0));
        slot.0 += 1;
        slot.1 += contract.amount;
    }

    let mut ranked: Vec<Performer> = totals
        .into_iter()
        .map(|(employee_id, (contract_count, total_amount))| Performer {
            employee_id,
            full_name: names[&employee_id].to_string(),
            contract_count,
            total_amount,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.contract_count.cmp(&a.contract_count))
            .then_with(|| a.full_name.cmp(&b.full_name))
    });
    ranked.truncate(limit);
    ranked
}

/// Spending per category in `range`, largest first.
pub fn expenses_by_category(expenses: &[Expense], range: DateRange) -> Vec<(ExpenseCategory, f64)> {
    let mut totals: BTreeMap<ExpenseCategory, f64> = BTreeMap::new();
    for expense in expenses.iter().filter(|e| range.contains(e.expense_date)) {
        *totals.entry(expense.category).or_insert(0.0) += expense.amount;
    }

    let mut rows: Vec<(ExpenseCategory, f64)> = totals.into_iter().collect();
    rows.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    rows
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractBalance {
    pub paid: f64,
    pub pending: f64,
    pub remaining: f64,
}

pub fn contract_balance(contract_id: i32, amount: f64, payments: &[DownPayment]) -> ContractBalance {
    let mut paid = 0.0;
    let mut pending = 0.0;
    for payment in payments.iter().filter(|p| p.contract_id == contract_id) {
        match payment.status {
            PaymentStatus::Paid => paid += payment.amount,
            PaymentStatus::Pending => pending += payment.amount,
            PaymentStatus::Cancelled => {}
        }
    }
    ContractBalance {
        paid,
        pending,
        remaining: (amount - paid).max(0.0),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// One entry per status, in declaration order
    pub properties_by_status: Vec<(PropertyStatus, usize)>,
    pub customer_count: usize,
    pub employee_count: usize,
    pub contracts_this_month: usize,
    pub contract_value_this_month: f64,
    pub payments_this_month: f64,
    pub expenses_this_month: f64,
}

impl DashboardSummary {
    pub fn net_this_month(&self) -> f64 {
        self.payments_this_month - self.expenses_this_month
    }

    pub fn property_count(&self) -> usize {
        self.properties_by_status.iter().map(|(_, count)| count).sum()
    }
}

/// Records a dashboard needs to summarize.
pub struct DashboardData<'a> {
    pub properties: &'a [Property],
    pub customers: &'a [Customer],
    pub employees: &'a [Employee],
    pub contracts: &'a [Contract],
    pub payments: &'a [DownPayment],
    pub expenses: &'a [Expense],
}

pub fn dashboard_summary(data: &DashboardData<'_>, today: NaiveDate) -> DashboardSummary {
    let month = DateRange::month_of(today);

    let properties_by_status = PropertyStatus::ALL
        .iter()
        .map(|status| {
            let count = data
                .properties
                .iter()
                .filter(|p| p.status == *status)
                .count();
            (*status, count)
        })
        .collect();

    let signed: Vec<&Contract> = data
        .contracts
        .iter()
        .filter(|c| month.contains(c.sign_date))
        .collect();

    DashboardSummary {
        properties_by_status,
        customer_count: data.customers.len(),
        employee_count: data.employees.len(),
        contracts_this_month: signed.len(),
        contract_value_this_month: signed.iter().map(|c| c.amount).sum(),
        payments_this_month: payments_by_month(data.payments, month)
            .iter()
            .map(|t| t.total)
            .sum(),
        expenses_this_month: expenses_by_month(data.expenses, month)
            .iter()
            .map(|t| t.total)
            .sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::*;

    #[test]
    fn groups_by_month_in_chronological_order() {
        let totals = monthly_totals(vec![
            (date(2024, 3, 5), 100.0),
            (date(2023, 12, 31), 50.0),
            (date(2024, 3, 28), 25.0),
            (date(2024, 1, 1), 10.0),
        ]);

        let labels: Vec<String> = totals.iter().map(MonthlyTotal::label).collect();
        assert_eq!(labels, vec!["2023-12", "2024-01", "2024-03"]);
        assert_eq!(totals[2].total, 125.0);
        assert_eq!(totals[2].count, 2);
    }

    #[test]
    fn only_paid_down_payments_count_as_income() {
        let payments = vec![
            payment(1, 1, 1000.0, PaymentStatus::Paid, date(2024, 2, 1)),
            payment(2, 1, 500.0, PaymentStatus::Pending, date(2024, 2, 2)),
            payment(3, 1, 250.0, PaymentStatus::Cancelled, date(2024, 2, 3)),
        ];

        let totals = payments_by_month(&payments, DateRange::all());
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total, 1000.0);
        assert_eq!(totals[0].count, 1);
    }

    #[test]
    fn year_statement_is_zero_filled() {
        let payments = vec![
            payment(1, 1, 2000.0, PaymentStatus::Paid, date(2024, 5, 10)),
            payment(2, 1, 9000.0, PaymentStatus::Paid, date(2023, 5, 10)),
        ];
        let expenses = vec![
            expense(1, ExpenseCategory::Office, 300.0, date(2024, 5, 12)),
            expense(2, ExpenseCategory::Salary, 1500.0, date(2024, 11, 30)),
        ];

        let rows = year_statement(2024, &payments, &expenses);
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[4].income, 2000.0);
        assert_eq!(rows[4].net(), 1700.0);
        assert_eq!(rows[10].net(), -1500.0);
        assert_eq!(rows[0], MonthStatement { month: 1, income: 0.0, expenses: 0.0 });
    }

    #[test]
    fn top_performers_rank_by_total_then_count_then_name() {
        let employees = vec![
            employee(1, "Zeina"),
            employee(2, "Adam"),
            employee(3, "Basel"),
            employee(4, "Carla"),
        ];
        let contracts = vec![
            contract(1, Some(1), 300.0, date(2024, 1, 5)),
            contract(2, Some(2), 200.0, date(2024, 1, 6)),
            contract(3, Some(2), 100.0, date(2024, 1, 7)),
            contract(4, Some(3), 300.0, date(2024, 1, 8)),
            contract(5, Some(4), 900.0, date(2023, 6, 1)),
            contract(6, None, 5000.0, date(2024, 1, 9)),
            contract(7, Some(99), 7000.0, date(2024, 1, 9)),
        ];

        let ranked = top_performers(&contracts, &employees, DateRange::year(2024), 10);
        let names: Vec<&str> = ranked.iter().map(|p| p.full_name.as_str()).collect();
        assert_eq!(names, vec!["Adam", "Basel", "Zeina"]);
        assert_eq!(ranked[0].contract_count, 2);
        assert_eq!(ranked[0].total_amount, 300.0);

        let top_one = top_performers(&contracts, &employees, DateRange::all(), 1);
        assert_eq!(top_one.len(), 1);
        assert_eq!(top_one[0].full_name, "Carla");
    }

    #[test]
    fn expense_breakdown_is_sorted_descending() {
        let expenses = vec![
            expense(1, ExpenseCategory::Marketing, 100.0, date(2024, 1, 1)),
            expense(2, ExpenseCategory::Salary, 900.0, date(2024, 1, 2)),
            expense(3, ExpenseCategory::Marketing, 250.0, date(2024, 1, 3)),
            expense(4, ExpenseCategory::Utilities, 5000.0, date(2025, 1, 3)),
        ];

        let rows = expenses_by_category(&expenses, DateRange::year(2024));
        assert_eq!(
            rows,
            vec![(ExpenseCategory::Salary, 900.0), (ExpenseCategory::Marketing, 350.0)]
        );
    }

    #[test]
    fn contract_balance_ignores_cancelled_payments() {
        let on = date(2024, 2, 1);
        let payments = vec![
            payment(1, 5, 10_000.0, PaymentStatus::Paid, on),
            payment(2, 5, 4_000.0, PaymentStatus::Pending, on),
            payment(3, 5, 8_000.0, PaymentStatus::Cancelled, on),
            payment(4, 6, 1_000.0, PaymentStatus::Paid, on),
        ];

        let balance = contract_balance(5, 50_000.0, &payments);
        assert_eq!(
            balance,
            ContractBalance {
                paid: 10_000.0,
                pending: 4_000.0,
                remaining: 40_000.0
            }
        );
    }

    #[test]
    fn dashboard_counts_the_current_month() {
        let properties = vec![
            property(1, "PRP-0001", PropertyStatus::Available, 1.0),
            property(2, "PRP-0002", PropertyStatus::Available, 1.0),
            property(3, "PRP-0003", PropertyStatus::Sold, 1.0),
        ];
        let customers = vec![customer(1, "Ana"), customer(2, "Ben")];
        let employees = vec![employee(1, "Zeina")];
        let contracts = vec![
            contract(1, Some(1), 120_000.0, date(2024, 6, 3)),
            contract(2, Some(1), 80_000.0, date(2024, 5, 30)),
        ];
        let payments = vec![
            payment(1, 1, 12_000.0, PaymentStatus::Paid, date(2024, 6, 4)),
            payment(2, 1, 3_000.0, PaymentStatus::Pending, date(2024, 6, 5)),
        ];
        let expenses = vec![
            expense(1, ExpenseCategory::Office, 2_000.0, date(2024, 6, 10)),
            expense(2, ExpenseCategory::Office, 700.0, date(2024, 7, 1)),
        ];

        let data = DashboardData {
            properties: &properties,
            customers: &customers,
            employees: &employees,
            contracts: &contracts,
            payments: &payments,
            expenses: &expenses,
        };
        let summary = dashboard_summary(&data, date(2024, 6, 15));

        assert_eq!(summary.property_count(), 3);
        assert_eq!(summary.properties_by_status[0], (PropertyStatus::Available, 2));
        assert_eq!(summary.properties_by_status[2], (PropertyStatus::Sold, 1));
        assert_eq!(summary.customer_count, 2);
        assert_eq!(summary.employee_count, 1);
        assert_eq!(summary.contracts_this_month, 1);
        assert_eq!(summary.contract_value_this_month, 120_000.0);
        assert_eq!(summary.payments_this_month, 12_000.0);
        assert_eq!(summary.expenses_this_month, 2_000.0);
        assert_eq!(summary.net_this_month(), 10_000.0);
    }
}
