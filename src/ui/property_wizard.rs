use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::KeyCode;
use tui::{backend::Backend, Frame};

use super::components::employee_choices;
use super::components::form::{render_form, FormEvent, FormField, FormState};
use super::read_key;
use crate::domain::numbering::next_listing_code;
use crate::domain::validation::{
    optional, parse_amount, parse_count, required, validate_property, ValidationError,
};
use crate::models::{Employee, Property, PropertyStatus, PropertyType};

const CODE: usize = 0;
const TITLE: usize = 1;
const TYPE: usize = 2;
const ADDRESS: usize = 3;
const PRICE: usize = 4;
const AREA: usize = 5;
const BEDROOMS: usize = 6;
const STATUS: usize = 7;
const AGENT: usize = 8;
const LISTED_ON: usize = 9;
const DESCRIPTION: usize = 10;

pub enum PropertyWizardAction {
    Cancel,
    Save(Property),
}

pub struct PropertyWizardState {
    id: i32,
    form: FormState,
}

impl PropertyWizardState {
    pub fn new<'a>(
        existing_codes: impl IntoIterator<Item = &'a str>,
        employees: &[Employee],
        today: NaiveDate,
    ) -> Self {
        let fields = fields(
            next_listing_code(existing_codes),
            String::new(),
            PropertyType::Apartment,
            String::new(),
            String::new(),
            String::new(),
            "0".to_string(),
            PropertyStatus::Available,
            employees,
            None,
            today,
            String::new(),
        );
        Self {
            id: 0,
            form: FormState::new("New Property", fields),
        }
    }

    pub fn from_existing(property: Property, employees: &[Employee]) -> Self {
        let fields = fields(
            property.listing_code,
            property.title,
            property.property_type,
            property.address,
            property.price.to_string(),
            property.area.to_string(),
            property.bedrooms.to_string(),
            property.status,
            employees,
            property.agent_id,
            property.listed_on,
            property.description.unwrap_or_default(),
        );
        Self {
            id: property.id,
            form: FormState::new("Edit Property", fields),
        }
    }

    /// Reads the form into a validated record.
    pub fn build(&self) -> Result<Property, ValidationError> {
        let form = &self.form;
        let property = Property {
            id: self.id,
            listing_code: required("Listing code", form.text(CODE))?,
            title: required("Title", form.text(TITLE))?,
            property_type: form
                .variant(TYPE, PropertyType::ALL)
                .ok_or(ValidationError::NotSelected("Type"))?,
            address: required("Address", form.text(ADDRESS))?,
            price: parse_amount("Price", form.text(PRICE))?,
            area: parse_amount("Area", form.text(AREA))?,
            bedrooms: parse_count("Bedrooms", form.text(BEDROOMS))?,
            status: form
                .variant(STATUS, PropertyStatus::ALL)
                .ok_or(ValidationError::NotSelected("Status"))?,
            agent_id: form.choice(AGENT),
            description: optional(form.text(DESCRIPTION)),
            listed_on: form
                .date(LISTED_ON)
                .ok_or(ValidationError::Required("Listed on"))?,
        };
        validate_property(&property)?;
        Ok(property)
    }
}

#[allow(clippy::too_many_arguments)]
fn fields(
    code: String,
    title: String,
    property_type: PropertyType,
    address: String,
    price: String,
    area: String,
    bedrooms: String,
    status: PropertyStatus,
    employees: &[Employee],
    agent_id: Option<i32>,
    listed_on: NaiveDate,
    description: String,
) -> Vec<FormField> {
    vec![
        FormField::text("Listing code", code),
        FormField::text("Title", title),
        FormField::variant("Type", PropertyType::ALL, property_type),
        FormField::text("Address", address),
        FormField::text("Price", price),
        FormField::text("Area (m²)", area),
        FormField::text("Bedrooms", bedrooms),
        FormField::variant("Status", PropertyStatus::ALL, status),
        FormField::choice("Agent", employee_choices(employees), agent_id),
        FormField::date("Listed on", listed_on),
        FormField::text("Description", description),
    ]
}

pub fn render_property_wizard<B: Backend>(frame: &mut Frame<B>, state: &PropertyWizardState) {
    render_form(frame, &state.form);
}

pub fn handle_key(state: &mut PropertyWizardState, key: KeyCode) -> Option<PropertyWizardAction> {
    match state.form.handle_key(key)? {
        FormEvent::Cancel => Some(PropertyWizardAction::Cancel),
        FormEvent::Submit => match state.build() {
            Ok(property) => Some(PropertyWizardAction::Save(property)),
            Err(err) => {
                state.form.set_error(err.to_string());
                None
            }
        },
    }
}

pub fn handle_input(state: &mut PropertyWizardState) -> Result<Option<PropertyWizardAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::{date, employee, property};

    fn fill(state: &mut PropertyWizardState, field: usize, text: &str) {
        state.form.set_text(field, text);
    }

    fn new_wizard() -> PropertyWizardState {
        PropertyWizardState::new(["PRP-0007"], &[employee(3, "Rami")], date(2024, 5, 1))
    }

    #[test]
    fn new_listing_gets_next_code() {
        let state = new_wizard();
        assert_eq!(state.form.text(CODE), "PRP-0008");
        assert_eq!(state.form.date(LISTED_ON), Some(date(2024, 5, 1)));
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let mut state = new_wizard();
        fill(&mut state, TITLE, "Sea view flat");
        fill(&mut state, ADDRESS, "3 Port Road");
        fill(&mut state, PRICE, "0");
        fill(&mut state, AREA, "90");

        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.form.error(), Some("Price must be greater than zero"));
    }

    #[test]
    fn unparsable_area_names_the_field() {
        let mut state = new_wizard();
        fill(&mut state, TITLE, "Sea view flat");
        fill(&mut state, ADDRESS, "3 Port Road");
        fill(&mut state, PRICE, "150,000");
        fill(&mut state, AREA, "ninety");

        assert_eq!(
            state.build().unwrap_err(),
            ValidationError::InvalidNumber {
                field: "Area",
                value: "ninety".to_string()
            }
        );
    }

    #[test]
    fn valid_form_saves_trimmed_values() {
        let mut state = new_wizard();
        fill(&mut state, TITLE, "  Sea view flat ");
        fill(&mut state, ADDRESS, "3 Port Road");
        fill(&mut state, PRICE, "150,000");
        fill(&mut state, AREA, "90.5");
        fill(&mut state, BEDROOMS, "3");
        state.form.select_choice(AGENT, Some(3));

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(PropertyWizardAction::Save(p)) => {
                assert_eq!(p.id, 0);
                assert_eq!(p.title, "Sea view flat");
                assert_eq!(p.price, 150_000.0);
                assert_eq!(p.bedrooms, 3);
                assert_eq!(p.agent_id, Some(3));
                assert_eq!(p.description, None);
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn editing_keeps_id_and_values() {
        let existing = property(5, "PRP-0005", PropertyStatus::Reserved, 99_000.0);
        let state = PropertyWizardState::from_existing(existing, &[]);
        let rebuilt = state.build().unwrap();
        assert_eq!(rebuilt.id, 5);
        assert_eq!(rebuilt.status, PropertyStatus::Reserved);
        assert_eq!(rebuilt.price, 99_000.0);
    }
}
