pub mod components;
pub mod contract_wizard;
pub mod contracts;
pub mod customer_wizard;
pub mod customers;
pub mod dashboard;
pub mod down_payment_wizard;
pub mod down_payments;
pub mod employee_wizard;
pub mod employees;
pub mod expense_wizard;
pub mod expenses;
pub mod login;
pub mod properties;
pub mod property_images;
pub mod property_wizard;
pub mod reports;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};

/// Blocks for the next terminal event and returns the key, if it was a key press.
pub fn read_key() -> Result<Option<KeyCode>> {
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key.code)),
        _ => Ok(None),
    }
}
