pub mod date_input;
pub mod form;
pub mod listing;
pub mod popup;

use crate::models::Employee;
use form::Choice;

/// Employee picker entries, led by "(none)".
pub fn employee_choices(employees: &[Employee]) -> Vec<Choice> {
    std::iter::once(Choice::none())
        .chain(employees.iter().map(|e| Choice::new(e.id, e.full_name.clone())))
        .collect()
}

/// Money with thousands separators and two decimals.
pub fn format_amount(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}
