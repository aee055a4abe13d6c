use std::collections::HashMap;

use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{backend::Backend, layout::Constraint, Frame};

use super::components::format_amount;
use super::components::listing::{render_table, ListEvent, ListView, TableLayout};
use super::read_key;
use crate::models::{Employee, Property};

pub enum PropertyAction {
    Back,
    NewProperty,
    EditProperty(i32),
    DeleteProperty(i32),
    ManageImages(i32),
}

// Represents the state of the property listing screen
pub struct PropertiesState {
    view: ListView<Property>,
    agents: HashMap<i32, String>,
    can_delete: bool,
}

impl PropertiesState {
    pub fn new(properties: Vec<Property>, employees: &[Employee], can_delete: bool) -> Self {
        Self {
            view: ListView::new(properties),
            agents: employees
                .iter()
                .map(|e| (e.id, e.full_name.clone()))
                .collect(),
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

    pub fn listing_codes(&self) -> Vec<&str> {
        self.view
            .items()
            .iter()
            .map(|p| p.listing_code.as_str())
            .collect()
    }

    fn selected_id(&self) -> Option<i32> {
        self.view.selected().map(|p| p.id)
    }
}

pub fn render_properties<B: Backend>(frame: &mut Frame<B>, state: &mut PropertiesState) {
    let help = if state.can_delete {
        "<N> New | <E> Edit | <D> Delete | <I> Images | </> Filter | <C> Clear | <Esc> Back"
    } else {
        "<N> New | <E> Edit | <I> Images | </> Filter | <C> Clear | <Esc> Back"
    };
    let layout = TableLayout {
        title: "Properties".to_string(),
        headers: &["Code", "Title", "Type", "Status", "Price", "Area", "Agent"],
        widths: &[
            Constraint::Percentage(10),
            Constraint::Percentage(26),
            Constraint::Percentage(10),
            Constraint::Percentage(10),
            Constraint::Percentage(16),
            Constraint::Percentage(10),
            Constraint::Percentage(18),
        ],
        help: help.to_string(),
        delete_warning: Some("Its images and stored files are removed as well."),
    };

    let agents = &state.agents;
    render_table(frame, &mut state.view, layout, |p| {
        vec![
            p.listing_code.clone(),
            p.title.clone(),
            p.property_type.to_string(),
            p.status.to_string(),
            format_amount(p.price),
            format!("{:.0} m²", p.area),
            p.agent_id
                .and_then(|id| agents.get(&id).cloned())
                .unwrap_or_else(|| "-".to_string()),
        ]
    });
}

pub fn handle_key(state: &mut PropertiesState, key: KeyCode) -> Option<PropertyAction> {
    if key == KeyCode::Char('d') && !state.can_delete && !state.view.is_filtering() {
        return state.selected_id().map(PropertyAction::DeleteProperty);
    }

    match state.view.handle_key(key)? {
        ListEvent::Back => Some(PropertyAction::Back),
        ListEvent::New => Some(PropertyAction::NewProperty),
        ListEvent::Edit | ListEvent::Open => state.selected_id().map(PropertyAction::EditProperty),
        ListEvent::Delete => state.selected_id().map(PropertyAction::DeleteProperty),
        ListEvent::Key('i') => state.selected_id().map(PropertyAction::ManageImages),
        ListEvent::Key(_) => None,
    }
}

pub fn handle_input(state: &mut PropertiesState) -> Result<Option<PropertyAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::{employee, property};
    use crate::models::PropertyStatus;

    fn listings() -> Vec<Property> {
        vec![
            property(1, "PRP-0001", PropertyStatus::Available, 100.0),
            property(2, "PRP-0002", PropertyStatus::Sold, 200.0),
        ]
    }

    #[test]
    fn images_key_targets_selected_property() {
        let mut state = PropertiesState::new(listings(), &[employee(1, "Rami")], true);
        handle_key(&mut state, KeyCode::Down);
        assert!(matches!(
            handle_key(&mut state, KeyCode::Char('i')),
            Some(PropertyAction::ManageImages(2))
        ));
    }

    #[test]
    fn staff_delete_goes_straight_to_the_permission_check() {
        let mut state = PropertiesState::new(listings(), &[], false);
        assert!(matches!(
            handle_key(&mut state, KeyCode::Char('d')),
            Some(PropertyAction::DeleteProperty(1))
        ));
    }

    #[test]
    fn admin_delete_asks_first() {
        let mut state = PropertiesState::new(listings(), &[], true);
        assert!(handle_key(&mut state, KeyCode::Char('d')).is_none());
        assert!(matches!(
            handle_key(&mut state, KeyCode::Char('y')),
            Some(PropertyAction::DeleteProperty(1))
        ));
    }

    #[test]
    fn filter_survives_reload() {
        let state = PropertiesState::new(listings(), &[], true).with_filter("status:sold");
        assert_eq!(state.filter(), "status:sold");
        assert_eq!(state.selected_id(), Some(2));
        assert_eq!(state.listing_codes(), vec!["PRP-0001", "PRP-0002"]);
    }
}
