use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::components::popup::render_confirmation;
use super::read_key;
use crate::models::{Property, PropertyImage};

pub enum PropertyImagesAction {
    Back,
    Add(PathBuf),
    Delete(i32),
}

pub struct PropertyImagesState {
    property_id: i32,
    heading: String,
    images: Vec<PropertyImage>,
    table_state: TableState,
    path_input: Option<String>,
    confirm_delete: bool,
    can_delete: bool,
}

impl PropertyImagesState {
    pub fn new(property: &Property, images: Vec<PropertyImage>, can_delete: bool) -> Self {
        let mut table_state = TableState::default();
        if !images.is_empty() {
            table_state.select(Some(0));
        }
        Self {
            property_id: property.id,
            heading: format!("Images of {} - {}", property.listing_code, property.title),
            images,
            table_state,
            path_input: None,
            confirm_delete: false,
            can_delete,
        }
    }

    pub fn property_id(&self) -> i32 {
        self.property_id
    }

    fn selected(&self) -> Option<&PropertyImage> {
        self.table_state.selected().and_then(|i| self.images.get(i))
    }

    fn step(&mut self, forward: bool) {
        if self.images.is_empty() {
            return;
        }
        let len = self.images.len();
        let current = self.table_state.selected().unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.table_state.select(Some(next));
    }
}

pub fn render_property_images<B: Backend>(frame: &mut Frame<B>, state: &mut PropertyImagesState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3), Constraint::Length(3)].as_ref())
        .split(frame.size());

    let header = Row::new(
        ["Added", "File"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow))),
    )
    .bottom_margin(1);
    let rows: Vec<Row> = state
        .images
        .iter()
        .map(|image| {
            Row::new(vec![
                Cell::from(image.added_on.format("%Y-%m-%d").to_string()),
                Cell::from(image.file_path.clone()),
            ])
        })
        .collect();
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title(state.heading.as_str()).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&[Constraint::Length(12), Constraint::Min(20)]);
    frame.render_stateful_widget(table, chunks[0], &mut state.table_state);

    let path = match &state.path_input {
        Some(path) => Spans::from(vec![
            Span::styled("Image file: ", Style::default().fg(Color::Cyan)),
            Span::styled(format!("{path}|"), Style::default().fg(Color::Yellow)),
        ]),
        None => Spans::from(Span::styled(
            "Press <A> and type the path of a jpg, png, gif, bmp or webp file",
            Style::default().fg(Color::Gray),
        )),
    };
    frame.render_widget(Paragraph::new(path).block(Block::default().borders(Borders::ALL)), chunks[1]);

    let help = if state.path_input.is_some() {
        "Enter - Add | Esc - Cancel"
    } else if state.can_delete {
        "<A> Add | <D> Delete | <Esc> Back"
    } else {
        "<A> Add | <Esc> Back"
    };
    let help = Paragraph::new(help)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, chunks[2]);

    if state.confirm_delete {
        render_confirmation(frame, "Remove this image?", Some("The stored file is deleted too."));
    }
}

pub fn handle_key(state: &mut PropertyImagesState, key: KeyCode) -> Option<PropertyImagesAction> {
    if let Some(path) = &mut state.path_input {
        match key {
            KeyCode::Esc => state.path_input = None,
            KeyCode::Enter => {
                let path = path.trim().to_string();
                state.path_input = None;
                if !path.is_empty() {
                    return Some(PropertyImagesAction::Add(PathBuf::from(path)));
                }
            }
            KeyCode::Backspace => {
                path.pop();
            }
            KeyCode::Char(c) => path.push(c),
            _ => {}
        }
        return None;
    }

    if state.confirm_delete {
        state.confirm_delete = false;
        return match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                state.selected().map(|image| PropertyImagesAction::Delete(image.id))
            }
            _ => None,
        };
    }

    match key {
        KeyCode::Esc | KeyCode::Char('q') => Some(PropertyImagesAction::Back),
        KeyCode::Char('a') | KeyCode::Char('n') => {
            state.path_input = Some(String::new());
            None
        }
        KeyCode::Char('d') => {
            let id = state.selected()?.id;
            if state.can_delete {
                state.confirm_delete = true;
                None
            } else {
                Some(PropertyImagesAction::Delete(id))
            }
        }
        KeyCode::Down => {
            state.step(true);
            None
        }
        KeyCode::Up => {
            state.step(false);
            None
        }
        _ => None,
    }
}

pub fn handle_input(state: &mut PropertyImagesState) -> Result<Option<PropertyImagesAction>> {
    Ok(read_key()?.and_then(|key| handle_key(state, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::{date, property};
    use crate::models::PropertyStatus;

    fn image(id: i32) -> PropertyImage {
        PropertyImage {
            id,
            property_id: 4,
            file_path: format!("images/property-4-20240101000000-{id}.png"),
            added_on: date(2024, 1, 1),
        }
    }

    fn state(can_delete: bool) -> PropertyImagesState {
        let listing = property(4, "PRP-0004", PropertyStatus::Available, 1.0);
        PropertyImagesState::new(&listing, vec![image(1), image(2)], can_delete)
    }

    #[test]
    fn typed_path_is_submitted_trimmed() {
        let mut state = state(true);
        handle_key(&mut state, KeyCode::Char('a'));
        for c in " /tmp/front.jpg ".chars() {
            assert!(handle_key(&mut state, KeyCode::Char(c)).is_none());
        }
        match handle_key(&mut state, KeyCode::Enter) {
            Some(PropertyImagesAction::Add(path)) => assert_eq!(path, PathBuf::from("/tmp/front.jpg")),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn blank_path_adds_nothing() {
        let mut state = state(true);
        handle_key(&mut state, KeyCode::Char('a'));
        assert!(handle_key(&mut state, KeyCode::Enter).is_none());
        assert!(state.path_input.is_none());
    }

    #[test]
    fn admin_confirms_before_delete() {
        let mut state = state(true);
        handle_key(&mut state, KeyCode::Down);
        assert!(handle_key(&mut state, KeyCode::Char('d')).is_none());
        assert!(matches!(
            handle_key(&mut state, KeyCode::Char('y')),
            Some(PropertyImagesAction::Delete(2))
        ));
    }

    #[test]
    fn staff_delete_is_passed_on_for_refusal() {
        let mut state = state(false);
        assert!(matches!(
            handle_key(&mut state, KeyCode::Char('d')),
            Some(PropertyImagesAction::Delete(1))
        ));
        assert_eq!(state.property_id(), 4);
    }
}
