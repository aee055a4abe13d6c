//! Required-field and range checks run before any insert or update.

use thiserror::Error;

use crate::models::{
    Contract, Customer, DownPayment, Employee, Expense, PaymentStatus, Property,
};

/// Amounts are compared with a tolerance of half a cent.
const CENT_TOLERANCE: f64 = 0.005;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("{0} cannot be negative")]
    Negative(&'static str),
    #[error("{field} is not a valid number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),
    #[error("{0} must be selected")]
    NotSelected(&'static str),
    #[error("down payments would total {total:.2}, above the contract amount of {limit:.2}")]
    ExceedsContract { total: f64, limit: f64 },
}

/// Trimmed value of a mandatory text field.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(value.to_string())
}

/// Trimmed value of an optional text field; blank becomes `None`.
pub fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub fn parse_amount(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(ValidationError::Required(field));
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| ValidationError::InvalidNumber {
            field,
            value: value.trim().to_string(),
        })
}

pub fn parse_count(field: &'static str, value: &str) -> Result<i32, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value.parse::<i32>().map_err(|_| ValidationError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn ensure_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value <= 0.0 {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(())
}

fn ensure_present(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

fn ensure_email(email: Option<&str>) -> Result<(), ValidationError> {
    let Some(email) = email else {
        return Ok(());
    };
    if is_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

/// Loose `local@domain.tld` shape check.
pub fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !value.contains(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

pub fn validate_property(property: &Property) -> Result<(), ValidationError> {
    ensure_present("Listing code", &property.listing_code)?;
    ensure_present("Title", &property.title)?;
    ensure_present("Address", &property.address)?;
    ensure_positive("Price", property.price)?;
    ensure_positive("Area", property.area)?;
    if property.bedrooms < 0 {
        return Err(ValidationError::Negative("Bedrooms"));
    }
    Ok(())
}

pub fn validate_customer(customer: &Customer) -> Result<(), ValidationError> {
    ensure_present("Full name", &customer.full_name)?;
    ensure_present("Phone", &customer.phone)?;
    ensure_email(customer.email.as_deref())
}

pub fn validate_employee(employee: &Employee) -> Result<(), ValidationError> {
    ensure_present("Full name", &employee.full_name)?;
    ensure_present("Position", &employee.position)?;
    ensure_present("Phone", &employee.phone)?;
    if employee.salary < 0.0 {
        return Err(ValidationError::Negative("Salary"));
    }
    ensure_email(employee.email.as_deref())
}

pub fn validate_contract(contract: &Contract) -> Result<(), ValidationError> {
    ensure_present("Contract number", &contract.contract_number)?;
    if contract.customer_id <= 0 {
        return Err(ValidationError::NotSelected("Customer"));
    }
    if contract.property_id <= 0 {
        return Err(ValidationError::NotSelected("Property"));
    }
    ensure_positive("Amount", contract.amount)
}

pub fn validate_down_payment(payment: &DownPayment) -> Result<(), ValidationError> {
    if payment.contract_id <= 0 {
        return Err(ValidationError::NotSelected("Contract"));
    }
    ensure_positive("Amount", payment.amount)
}

pub fn validate_expense(expense: &Expense) -> Result<(), ValidationError> {
    ensure_present("Description", &expense.description)?;
    ensure_positive("Amount", expense.amount)
}

/// Rejects `candidate` when the contract's live down payments would exceed
/// its amount. `existing` may contain the candidate's previous version.
pub fn check_down_payment_total(
    contract_amount: f64,
    existing: &[DownPayment],
    candidate: &DownPayment,
) -> Result<(), ValidationError> {
    let others: f64 = existing
        .iter()
        .filter(|p| p.contract_id == candidate.contract_id)
        .filter(|p| candidate.id == 0 || p.id != candidate.id)
        .filter(|p| p.status != PaymentStatus::Cancelled)
        .map(|p| p.amount)
        .sum();

    let total = if candidate.status == PaymentStatus::Cancelled {
        others
    } else {
        others + candidate.amount
    };

    if total > contract_amount + CENT_TOLERANCE {
        return Err(ValidationError::ExceedsContract {
            total,
            limit: contract_amount,
        });
    }
    Ok(())
}

/// Rejects a contract amount below what its live down payments already total.
pub fn check_contract_amount(contract: &Contract, payments: &[DownPayment]) -> Result<(), ValidationError> {
    let total: f64 = payments
        .iter()
        .filter(|p| p.contract_id == contract.id)
        .filter(|p| p.status != PaymentStatus::Cancelled)
        .map(|p| p.amount)
        .sum();

    if total > contract.amount + CENT_TOLERANCE {
        return Err(ValidationError::ExceedsContract {
            total,
            limit: contract.amount,
        });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::models::PropertyStatus;

    #[test]
    fn empty_full_name_is_rejected() {
        let mut customer = customer(0, "   ");
        assert_eq!(
            validate_customer(&customer),
            Err(ValidationError::Required("Full name"))
        );

        customer.full_name = "Maya Haddad".to_string();
        assert_eq!(validate_customer(&customer), Ok(()));
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let zero = property(0, "PRP-0001", PropertyStatus::Available, 0.0);
        assert_eq!(
            validate_property(&zero),
            Err(ValidationError::NotPositive("Price"))
        );

        let negative = property(0, "PRP-0001", PropertyStatus::Available, -10.0);
        assert!(validate_property(&negative).is_err());
    }

    #[test]
    fn property_area_and_bedrooms_are_checked() {
        let mut listing = property(0, "PRP-0001", PropertyStatus::Available, 120_000.0);
        listing.area = 0.0;
        assert_eq!(
            validate_property(&listing),
            Err(ValidationError::NotPositive("Area"))
        );

        listing.area = 60.0;
        listing.bedrooms = -1;
        assert_eq!(
            validate_property(&listing),
            Err(ValidationError::Negative("Bedrooms"))
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut customer = customer(0, "Omar Said");
        customer.email = Some("omar.example.com".to_string());
        assert!(matches!(
            validate_customer(&customer),
            Err(ValidationError::InvalidEmail(_))
        ));

        customer.email = Some("omar@example.com".to_string());
        assert!(validate_customer(&customer).is_ok());
    }

    #[test]
    fn email_shape_check() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.co"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email("a@@c.com"));
    }

    #[test]
    fn employee_salary_cannot_be_negative() {
        let mut staff = employee(0, "Lina Farah");
        staff.salary = -1.0;
        assert_eq!(
            validate_employee(&staff),
            Err(ValidationError::Negative("Salary"))
        );
    }

    #[test]
    fn contract_requires_parties_and_amount() {
        let mut deal = contract(0, None, 100_000.0, date(2024, 2, 1));
        deal.customer_id = 0;
        assert_eq!(
            validate_contract(&deal),
            Err(ValidationError::NotSelected("Customer"))
        );

        deal.customer_id = 4;
        deal.amount = 0.0;
        assert_eq!(
            validate_contract(&deal),
            Err(ValidationError::NotPositive("Amount"))
        );
    }

    #[test]
    fn expense_requires_description() {
        let mut cost = expense(0, crate::models::ExpenseCategory::Office, 40.0, date(2024, 1, 1));
        cost.description = String::new();
        assert_eq!(
            validate_expense(&cost),
            Err(ValidationError::Required("Description"))
        );
    }

    #[test]
    fn amount_parsing_accepts_thousands_separators() {
        assert_eq!(parse_amount("Price", "250,000.50"), Ok(250_000.5));
        assert_eq!(
            parse_amount("Price", "abc"),
            Err(ValidationError::InvalidNumber {
                field: "Price",
                value: "abc".to_string()
            })
        );
        assert_eq!(parse_amount("Price", "  "), Err(ValidationError::Required("Price")));
        assert!(parse_amount("Price", "inf").is_err());
    }

    #[test]
    fn blank_optional_text_becomes_none() {
        assert_eq!(optional("   "), None);
        assert_eq!(optional(" note "), Some("note".to_string()));
        assert_eq!(required("Title", "  Villa "), Ok("Villa".to_string()));
    }

    #[test]
    fn down_payments_cannot_exceed_contract_amount() {
        let on = date(2024, 3, 1);
        let existing = vec![
            payment(1, 7, 40_000.0, PaymentStatus::Paid, on),
            payment(2, 7, 30_000.0, PaymentStatus::Pending, on),
            payment(3, 7, 50_000.0, PaymentStatus::Cancelled, on),
            payment(4, 8, 90_000.0, PaymentStatus::Paid, on),
        ];

        let fits = payment(0, 7, 30_000.0, PaymentStatus::Pending, on);
        assert!(check_down_payment_total(100_000.0, &existing, &fits).is_ok());

        let too_much = payment(0, 7, 30_000.01, PaymentStatus::Pending, on);
        assert!(matches!(
            check_down_payment_total(100_000.0, &existing, &too_much),
            Err(ValidationError::ExceedsContract { .. })
        ));
    }

    #[test]
    fn contract_amount_cannot_drop_below_recorded_payments() {
        let on = date(2024, 3, 1);
        let payments = vec![
            payment(1, 7, 60_000.0, PaymentStatus::Paid, on),
            payment(2, 7, 30_000.0, PaymentStatus::Pending, on),
            payment(3, 7, 40_000.0, PaymentStatus::Cancelled, on),
        ];

        let mut edited = contract(7, None, 90_000.0, on);
        assert!(check_contract_amount(&edited, &payments).is_ok());

        edited.amount = 50_000.0;
        assert_eq!(
            check_contract_amount(&edited, &payments),
            Err(ValidationError::ExceedsContract {
                total: 90_000.0,
                limit: 50_000.0
            })
        );
    }

    #[test]
    fn editing_a_payment_replaces_its_previous_amount() {
        let on = date(2024, 3, 1);
        let existing = vec![
            payment(1, 7, 60_000.0, PaymentStatus::Paid, on),
            payment(2, 7, 40_000.0, PaymentStatus::Paid, on),
        ];

        let edited = payment(2, 7, 35_000.0, PaymentStatus::Paid, on);
        assert!(check_down_payment_total(100_000.0, &existing, &edited).is_ok());

        let cancelled = payment(0, 7, 500_000.0, PaymentStatus::Cancelled, on);
        assert!(check_down_payment_total(100_000.0, &existing, &cancelled).is_ok());
    }
}
