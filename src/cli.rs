//! Administrative commands and plain-text reports for the command line.

use anyhow::{bail, Result};
use chrono::NaiveDate;

use crate::auth::hash_password;
use crate::db::Database;
use crate::domain::reports::{
    dashboard_summary, expenses_by_month, payments_by_month, top_performers, year_statement,
    DashboardData, DashboardSummary, MonthlyTotal, Performer,
};
use crate::domain::validation::required;
use crate::domain::DateRange;
use crate::models::{DownPayment, Expense, User};
use crate::ui::components::format_amount;

pub async fn add_user(
    db: &Database,
    username: &str,
    full_name: &str,
    password: &str,
    is_admin: bool,
) -> Result<i32> {
    let username = required("Username", username)?;
    let full_name = required("Full name", full_name)?;
    if password.is_empty() {
        bail!("Password is required");
    }

    let user = User {
        id: 0,
        username,
        password_hash: hash_password(password)?,
        full_name,
        is_admin,
    };
    let id = db.create_user(&user).await?;
    tracing::info!(user_id = id, user = %user.username, admin = is_admin, "user created");

    Ok(id)
}

pub fn users_table(users: &[User]) -> String {
    if users.is_empty() {
        return "No users yet".to_string();
    }

    let mut lines = vec![format!("{:<5} {:<20} {:<30} {}", "ID", "Username", "Full name", "Role")];
    for user in users {
        let role = if user.is_admin { "admin" } else { "staff" };
        lines.push(format!(
            "{:<5} {:<20} {:<30} {}",
            user.id, user.username, user.full_name, role
        ));
    }
    lines.join("\n")
}

fn month_lines(title: &str, totals: &[MonthlyTotal]) -> Vec<String> {
    let mut lines = vec![String::new(), title.to_string()];
    if totals.is_empty() {
        lines.push("  none".to_string());
    }
    for total in totals {
        lines.push(format!(
            "  {}  {:>4} rows  {:>16}",
            total.label(),
            total.count,
            format_amount(total.total)
        ));
    }
    lines
}

/// Paid down payments and expenses per month of `year`, then the net statement.
pub fn monthly_report(year: i32, payments: &[DownPayment], expenses: &[Expense]) -> String {
    let range = DateRange::year(year);
    let mut lines = vec![format!("Monthly report {year}")];
    lines.extend(month_lines(
        "Down payments received",
        &payments_by_month(payments, range),
    ));
    lines.extend(month_lines("Expenses", &expenses_by_month(expenses, range)));

    lines.push(String::new());
    lines.push(format!(
        "  {:<7} {:>16} {:>16} {:>16}",
        "Month", "Income", "Expenses", "Net"
    ));
    let (mut income, mut spent) = (0.0, 0.0);
    for month in year_statement(year, payments, expenses) {
        income += month.income;
        spent += month.expenses;
        lines.push(format!(
            "  {year}-{:02} {:>16} {:>16} {:>16}",
            month.month,
            format_amount(month.income),
            format_amount(month.expenses),
            format_amount(month.net())
        ));
    }
    lines.push(format!(
        "  {:<7} {:>16} {:>16} {:>16}",
        "Total",
        format_amount(income),
        format_amount(spent),
        format_amount(income - spent)
    ));
    lines.join("\n")
}

fn describe_range(range: &DateRange) -> String {
    let bound = |date: Option<NaiveDate>| {
        date.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "...".to_string())
    };
    if range.is_unbounded() {
        "all time".to_string()
    } else {
        format!("{} to {}", bound(range.from), bound(range.to))
    }
}

pub fn top_report(performers: &[Performer], range: &DateRange) -> String {
    let mut lines = vec![format!("Top performers ({})", describe_range(range))];
    if performers.is_empty() {
        lines.push("  no contracts with an assigned employee".to_string());
    }
    for (rank, performer) in performers.iter().enumerate() {
        lines.push(format!(
            "  {:>2}. #{:<4} {:<30} {:>4} contracts {:>16}",
            rank + 1,
            performer.employee_id,
            performer.full_name,
            performer.contract_count,
            format_amount(performer.total_amount)
        ));
    }
    lines.join("\n")
}

pub fn dashboard_report(summary: &DashboardSummary, today: NaiveDate) -> String {
    let mut lines = vec![
        format!("Dashboard for {}", today.format("%B %Y")),
        format!("Properties: {}", summary.property_count()),
    ];
    for (status, count) in &summary.properties_by_status {
        lines.push(format!("  {status:<10} {count}"));
    }
    lines.extend([
        format!("Customers: {}", summary.customer_count),
        format!("Employees: {}", summary.employee_count),
        format!(
            "Contracts this month: {} ({})",
            summary.contracts_this_month,
            format_amount(summary.contract_value_this_month)
        ),
        format!("Down payments paid: {}", format_amount(summary.payments_this_month)),
        format!("Expenses: {}", format_amount(summary.expenses_this_month)),
        format!("Net: {}", format_amount(summary.net_this_month())),
    ]);
    lines.join("\n")
}

pub async fn print_monthly(db: &Database, year: i32) -> Result<()> {
    let payments = db.load_down_payments().await?;
    let expenses = db.load_expenses().await?;
    println!("{}", monthly_report(year, &payments, &expenses));
    Ok(())
}

pub async fn print_top(db: &Database, range: DateRange, limit: usize) -> Result<()> {
    let contracts = db.load_contracts().await?;
    let employees = db.load_employees().await?;
    let performers = top_performers(&contracts, &employees, range, limit);
    println!("{}", top_report(&performers, &range));
    Ok(())
}

pub async fn print_dashboard(db: &Database, today: NaiveDate) -> Result<()> {
    let properties = db.load_properties().await?;
    let customers = db.load_customers().await?;
    let employees = db.load_employees().await?;
    let contracts = db.load_contracts().await?;
    let payments = db.load_down_payments().await?;
    let expenses = db.load_expenses().await?;

    let summary = dashboard_summary(
        &DashboardData {
            properties: &properties,
            customers: &customers,
            employees: &employees,
            contracts: &contracts,
            payments: &payments,
            expenses: &expenses,
        },
        today,
    );
    println!("{}", dashboard_report(&summary, today));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::{date, expense, payment, property};
    use crate::models::{ExpenseCategory, PaymentStatus, PropertyStatus};

    #[test]
    fn monthly_report_lists_only_paid_income() {
        let payments = [
            payment(1, 1, 1000.0, PaymentStatus::Paid, date(2024, 3, 4)),
            payment(2, 1, 700.0, PaymentStatus::Pending, date(2024, 3, 9)),
        ];
        let expenses = [expense(1, ExpenseCategory::Office, 250.0, date(2024, 3, 1))];

        let report = monthly_report(2024, &payments, &expenses);
        assert!(report.contains("2024-03     1 rows"));
        assert!(report.contains("1,000.00"));
        assert!(!report.contains("700.00"));
        assert!(report.lines().last().unwrap().contains("750.00"));
    }

    #[test]
    fn top_report_handles_empty_ranking() {
        let range = DateRange::between(date(2024, 1, 1), date(2024, 3, 31));
        let report = top_report(&[], &range);
        assert!(report.starts_with("Top performers (2024-01-01 to 2024-03-31)"));
        assert!(report.contains("no contracts"));
        assert!(top_report(&[], &DateRange::all()).contains("all time"));
    }

    #[test]
    fn dashboard_report_shows_counts_per_status() {
        let properties = [
            property(1, "PRP-0001", PropertyStatus::Sold, 1.0),
            property(2, "PRP-0002", PropertyStatus::Sold, 1.0),
        ];
        let summary = dashboard_summary(
            &DashboardData {
                properties: &properties,
                customers: &[],
                employees: &[],
                contracts: &[],
                payments: &[],
                expenses: &[],
            },
            date(2024, 6, 15),
        );
        let report = dashboard_report(&summary, date(2024, 6, 15));
        assert!(report.starts_with("Dashboard for June 2024"));
        assert!(report.contains("Properties: 2"));
        assert!(report.contains("  sold       2"));
    }

    #[test]
    fn users_table_marks_roles() {
        let users = [User {
            id: 1,
            username: "admin".to_string(),
            password_hash: String::new(),
            full_name: "Office Admin".to_string(),
            is_admin: true,
        }];
        let table = users_table(&users);
        assert!(table.lines().nth(1).unwrap().ends_with("admin"));
        assert_eq!(users_table(&[]), "No users yet");
    }
}
