//! In-memory filtering behind every list screen's search bar.
//!
//! A query mixes free words with `key:value` tokens:
//! `villa status:available min:100000 from:2024-01-01`.

use chrono::NaiveDate;

use super::DateRange;
use crate::models::{
    ContractDetails, Customer, DownPaymentDetails, Employee, Expense, Property,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Lower-cased free words; each must match somewhere.
    pub terms: Vec<String>,
    pub dates: DateRange,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl Query {
    pub fn parse(input: &str) -> Self {
        let mut query = Query::default();

        for token in input.split_whitespace() {
            if !query.apply_token(token) {
                query.terms.push(token.to_lowercase());
            }
        }

        query
    }

    fn apply_token(&mut self, token: &str) -> bool {
        let Some((key, value)) = token.split_once(':') else {
            return false;
        };
        if value.is_empty() {
            return false;
        }

        match key.to_ascii_lowercase().as_str() {
            "from" => match parse_date(value) {
                Some(date) => self.dates.from = Some(date),
                None => return false,
            },
            "to" => match parse_date(value) {
                Some(date) => self.dates.to = Some(date),
                None => return false,
            },
            "min" => match value.parse::<f64>() {
                Ok(amount) => self.min_amount = Some(amount),
                Err(_) => return false,
            },
            "max" => match value.parse::<f64>() {
                Ok(amount) => self.max_amount = Some(amount),
                Err(_) => return false,
            },
            "status" => self.status = Some(value.to_lowercase()),
            "type" => self.kind = Some(value.to_lowercase()),
            _ => return false,
        }

        true
    }

    pub fn is_empty(&self) -> bool {
        self == &Query::default()
    }

    fn matches_text(&self, fields: &[&str]) -> bool {
        self.terms.iter().all(|term| {
            fields
                .iter()
                .any(|field| field.to_lowercase().contains(term.as_str()))
        })
    }

    fn matches_date(&self, date: Option<NaiveDate>) -> bool {
        match date {
            Some(date) => self.dates.contains(date),
            None => self.dates.is_unbounded(),
        }
    }

    fn matches_amount(&self, amount: Option<f64>) -> bool {
        if self.min_amount.is_none() && self.max_amount.is_none() {
            return true;
        }
        let Some(amount) = amount else {
            return false;
        };
        self.min_amount.map_or(true, |min| amount >= min)
            && self.max_amount.map_or(true, |max| amount <= max)
    }

    fn matches_label(expected: &Option<String>, actual: Option<&str>) -> bool {
        match (expected, actual) {
            (None, _) => true,
            (Some(expected), Some(actual)) => expected.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// What a record exposes to the search bar.
pub struct SearchFields<'a> {
    pub text: Vec<&'a str>,
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub status: Option<&'a str>,
    pub kind: Option<&'a str>,
}

pub trait Searchable {
    fn search_fields(&self) -> SearchFields<'_>;

    fn matches(&self, query: &Query) -> bool {
        let fields = self.search_fields();
        query.matches_text(&fields.text)
            && query.matches_date(fields.date)
            && query.matches_amount(fields.amount)
            && Query::matches_label(&query.status, fields.status)
            && Query::matches_label(&query.kind, fields.kind)
    }
}

/// Indices of the items matching `query`, in their original order.
pub fn apply<T: Searchable>(items: &[T], query: &Query) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.matches(query))
        .map(|(index, _)| index)
        .collect()
}

impl Searchable for Property {
    fn search_fields(&self) -> SearchFields<'_> {
        let mut text = vec![
            self.listing_code.as_str(),
            self.title.as_str(),
            self.address.as_str(),
        ];
        if let Some(description) = &self.description {
            text.push(description);
        }
        SearchFields {
            text,
            date: Some(self.listed_on),
            amount: Some(self.price),
            status: Some(self.status.as_str()),
            kind: Some(self.property_type.as_str()),
        }
    }
}

impl Searchable for Customer {
    fn search_fields(&self) -> SearchFields<'_> {
        let mut text = vec![self.full_name.as_str(), self.phone.as_str()];
        text.extend(
            [&self.email, &self.national_id, &self.address]
                .into_iter()
                .filter_map(|value| value.as_deref()),
        );
        SearchFields {
            text,
            date: None,
            amount: None,
            status: None,
            kind: None,
        }
    }
}

impl Searchable for Employee {
    fn search_fields(&self) -> SearchFields<'_> {
        let mut text = vec![
            self.full_name.as_str(),
            self.position.as_str(),
            self.phone.as_str(),
        ];
        if let Some(email) = &self.email {
            text.push(email);
        }
        SearchFields {
            text,
            date: Some(self.hire_date),
            amount: Some(self.salary),
            status: None,
            kind: None,
        }
    }
}

impl Searchable for ContractDetails {
    fn search_fields(&self) -> SearchFields<'_> {
        let mut text = vec![
            self.contract.contract_number.as_str(),
            self.customer_name.as_str(),
            self.property_code.as_str(),
        ];
        text.extend(self.employee_name.as_deref());
        text.extend(self.contract.notes.as_deref());
        SearchFields {
            text,
            date: Some(self.contract.sign_date),
            amount: Some(self.contract.amount),
            status: None,
            kind: Some(self.contract.kind.as_str()),
        }
    }
}

impl Searchable for DownPaymentDetails {
    fn search_fields(&self) -> SearchFields<'_> {
        let mut text = vec![self.contract_number.as_str(), self.customer_name.as_str()];
        text.extend(self.payment.notes.as_deref());
        SearchFields {
            text,
            date: Some(self.payment.payment_date),
            amount: Some(self.payment.amount),
            status: Some(self.payment.status.as_str()),
            kind: None,
        }
    }
}

impl Searchable for Expense {
    fn search_fields(&self) -> SearchFields<'_> {
        SearchFields {
            text: vec![self.description.as_str(), self.category.as_str()],
            date: Some(self.expense_date),
            amount: Some(self.amount),
            status: None,
            kind: Some(self.category.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::*;
    use crate::models::{ExpenseCategory, PaymentStatus, PropertyStatus, PropertyType};

    #[test]
    fn parses_keyed_tokens_and_free_words() {
        let query = Query::parse("Villa  status:Sold from:2024-01-01 to:2024-06-30 min:1000 max:5e5");
        assert_eq!(query.terms, vec!["villa".to_string()]);
        assert_eq!(query.status.as_deref(), Some("sold"));
        assert_eq!(query.dates, DateRange::between(date(2024, 1, 1), date(2024, 6, 30)));
        assert_eq!(query.min_amount, Some(1000.0));
        assert_eq!(query.max_amount, Some(500_000.0));
    }

    #[test]
    fn malformed_tokens_become_free_words() {
        let query = Query::parse("from:yesterday color:blue min:");
        assert_eq!(
            query.terms,
            vec![
                "from:yesterday".to_string(),
                "color:blue".to_string(),
                "min:".to_string()
            ]
        );
        assert!(query.dates.is_unbounded());
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = Query::parse("   ");
        assert!(query.is_empty());
        let customers = vec![customer(1, "Ana"), customer(2, "Ben")];
        assert_eq!(apply(&customers, &query), vec![0, 1]);
    }

    #[test]
    fn every_word_must_match_some_field() {
        let mut listing = property(1, "PRP-0001", PropertyStatus::Available, 200_000.0);
        listing.title = "Sea view villa".to_string();
        listing.address = "Corniche Road".to_string();

        assert!(listing.matches(&Query::parse("VILLA corniche")));
        assert!(!listing.matches(&Query::parse("villa downtown")));
    }

    #[test]
    fn property_filters_on_status_type_and_price() {
        let mut villa = property(1, "PRP-0001", PropertyStatus::Available, 450_000.0);
        villa.property_type = PropertyType::Villa;
        let flat = property(2, "PRP-0002", PropertyStatus::Sold, 150_000.0);
        let listings = vec![villa, flat];

        assert_eq!(apply(&listings, &Query::parse("status:sold")), vec![1]);
        assert_eq!(apply(&listings, &Query::parse("type:villa")), vec![0]);
        assert_eq!(apply(&listings, &Query::parse("min:200000")), vec![0]);
        assert_eq!(apply(&listings, &Query::parse("max:150000")), vec![1]);
    }

    #[test]
    fn records_without_the_attribute_do_not_match_constraints() {
        let customers = vec![customer(1, "Ana")];
        assert!(apply(&customers, &Query::parse("status:paid")).is_empty());
        assert!(apply(&customers, &Query::parse("from:2024-01-01")).is_empty());
        assert!(apply(&customers, &Query::parse("min:1")).is_empty());
    }

    #[test]
    fn expenses_filter_by_date_range_and_category() {
        let expenses = vec![
            expense(1, ExpenseCategory::Marketing, 300.0, date(2024, 1, 15)),
            expense(2, ExpenseCategory::Utilities, 120.0, date(2024, 2, 3)),
            expense(3, ExpenseCategory::Marketing, 80.0, date(2024, 3, 9)),
        ];

        let query = Query::parse("from:2024-02-01 to:2024-03-31");
        assert_eq!(apply(&expenses, &query), vec![1, 2]);

        let query = Query::parse("type:marketing to:2024-02-28");
        assert_eq!(apply(&expenses, &query), vec![0]);
    }

    #[test]
    fn down_payments_search_contract_and_customer() {
        let details = DownPaymentDetails {
            payment: payment(1, 3, 5000.0, PaymentStatus::Pending, date(2024, 4, 1)),
            contract_number: "CTR-2024-0003".to_string(),
            customer_name: "Rania Khoury".to_string(),
            contract_amount: 90_000.0,
        };

        assert!(details.matches(&Query::parse("khoury status:pending")));
        assert!(details.matches(&Query::parse("ctr-2024-0003")));
        assert!(!details.matches(&Query::parse("status:paid")));
    }
}
