use std::fmt::Display;

use chrono::NaiveDate;
use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::date_input::DateInputState;

/// One entry of a choice field; `id` is `None` for "(none)".
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub id: Option<i32>,
    pub label: String,
}

impl Choice {
    pub fn new(id: i32, label: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            label: label.into(),
        }
    }

    pub fn none() -> Self {
        Self {
            id: None,
            label: "(none)".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub enum FieldInput {
    Text(String),
    /// Text rendered as asterisks
    Secret(String),
    Date(DateInputState),
    Choice { options: Vec<Choice>, selected: usize },
}

#[derive(Clone, Debug)]
pub struct FormField {
    pub label: &'static str,
    pub input: FieldInput,
}

impl FormField {
    pub fn text(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            input: FieldInput::Text(value.into()),
        }
    }

    pub fn secret(label: &'static str) -> Self {
        Self {
            label,
            input: FieldInput::Secret(String::new()),
        }
    }

    pub fn date(label: &'static str, value: NaiveDate) -> Self {
        Self {
            label,
            input: FieldInput::Date(DateInputState::new(value)),
        }
    }

    /// Choice field preselecting the option whose id is `current`.
    pub fn choice(label: &'static str, options: Vec<Choice>, current: Option<i32>) -> Self {
        let selected = options
            .iter()
            .position(|option| option.id == current)
            .unwrap_or(0);
        Self {
            label,
            input: FieldInput::Choice { options, selected },
        }
    }

    /// Choice over an enum's variants, ids being positions in `all`.
    pub fn variant<T: Copy + PartialEq + Display>(label: &'static str, all: &[T], current: T) -> Self {
        let options = all
            .iter()
            .enumerate()
            .map(|(i, variant)| Choice::new(i as i32, variant.to_string()))
            .collect();
        let current = all.iter().position(|v| *v == current).map(|i| i as i32);
        Self::choice(label, options, current)
    }

    fn display(&self, editing: bool) -> String {
        match &self.input {
            FieldInput::Text(value) if editing => format!("{value}|"),
            FieldInput::Text(value) => value.clone(),
            FieldInput::Secret(value) => {
                let masked = "*".repeat(value.chars().count());
                if editing {
                    format!("{masked}|")
                } else {
                    masked
                }
            }
            FieldInput::Date(state) => state.display(editing),
            FieldInput::Choice { options, selected } => options
                .get(*selected)
                .map(|choice| format!("< {} >", choice.label))
                .unwrap_or_else(|| "(no options)".to_string()),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum FormEvent {
    Submit,
    Cancel,
}

/// Field-by-field editor shared by every wizard screen.
pub struct FormState {
    pub title: String,
    fields: Vec<FormField>,
    current: usize,
    editing: bool,
    error: Option<String>,
}

impl FormState {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            fields,
            current: 0,
            editing: false,
            error: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn text(&self, index: usize) -> &str {
        match self.fields.get(index).map(|f| &f.input) {
            Some(FieldInput::Text(value) | FieldInput::Secret(value)) => value,
            _ => "",
        }
    }

    pub fn set_text(&mut self, index: usize, value: impl Into<String>) {
        if let Some(FormField {
            input: FieldInput::Text(current),
            ..
        }) = self.fields.get_mut(index)
        {
            *current = value.into();
        }
    }

    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        match self.fields.get(index).map(|f| &f.input) {
            Some(FieldInput::Date(state)) => Some(state.date),
            _ => None,
        }
    }

    pub fn choice(&self, index: usize) -> Option<i32> {
        match self.fields.get(index).map(|f| &f.input) {
            Some(FieldInput::Choice { options, selected }) => {
                options.get(*selected).and_then(|choice| choice.id)
            }
            _ => None,
        }
    }

    pub fn variant<T: Copy>(&self, index: usize, all: &[T]) -> Option<T> {
        self.choice(index)
            .and_then(|position| all.get(position as usize))
            .copied()
    }

    pub fn select_choice(&mut self, index: usize, id: Option<i32>) {
        if let Some(FormField {
            input: FieldInput::Choice { options, selected },
            ..
        }) = self.fields.get_mut(index)
        {
            if let Some(position) = options.iter().position(|option| option.id == id) {
                *selected = position;
            }
        }
    }

    fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.current = (self.current + 1) % self.fields.len();
        }
    }

    fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.current = (self.current + self.fields.len() - 1) % self.fields.len();
        }
    }

    fn cycle_choice(&mut self, forward: bool) {
        if let Some(FormField {
            input: FieldInput::Choice { options, selected },
            ..
        }) = self.fields.get_mut(self.current)
        {
            if options.is_empty() {
                return;
            }
            *selected = if forward {
                (*selected + 1) % options.len()
            } else {
                (*selected + options.len() - 1) % options.len()
            };
        }
    }

    fn start_editing(&mut self) {
        let Some(field) = self.fields.get_mut(self.current) else {
            return;
        };
        match &mut field.input {
            FieldInput::Choice { .. } => {}
            FieldInput::Date(state) => {
                state.begin_editing();
                self.editing = true;
                return;
            }
            FieldInput::Text(_) | FieldInput::Secret(_) => {
                self.editing = true;
                return;
            }
        }
        self.cycle_choice(true);
    }

    /// Feed one key press; navigation mode uses `s` to submit.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<FormEvent> {
        if self.editing {
            match key {
                KeyCode::Enter | KeyCode::Esc => self.editing = false,
                _ => match self.fields.get_mut(self.current).map(|f| &mut f.input) {
                    Some(FieldInput::Text(value) | FieldInput::Secret(value)) => match key {
                        KeyCode::Char(c) => value.push(c),
                        KeyCode::Backspace => {
                            value.pop();
                        }
                        _ => {}
                    },
                    Some(FieldInput::Date(state)) => state.handle_key(key),
                    _ => {}
                },
            }
            return None;
        }

        match key {
            KeyCode::Esc => return Some(FormEvent::Cancel),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.error = None;
                return Some(FormEvent::Submit);
            }
            KeyCode::Down | KeyCode::Tab => self.next_field(),
            KeyCode::Up | KeyCode::BackTab => self.previous_field(),
            KeyCode::Right => self.cycle_choice(true),
            KeyCode::Left => self.cycle_choice(false),
            KeyCode::Enter => self.start_editing(),
            _ => {}
        }
        None
    }
}

pub fn render_form<B: Backend>(f: &mut Frame<B>, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title = Paragraph::new(state.title.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_fields(f, state, chunks[1]);

    let status = match state.error() {
        Some(message) => Paragraph::new(message).style(Style::default().fg(Color::Red)),
        None => Paragraph::new(""),
    };
    f.render_widget(status.block(Block::default().borders(Borders::ALL)), chunks[2]);

    let help_text = if state.is_editing() {
        "Type to edit | Enter/Esc - Done"
    } else {
        "Up/Down - Navigate | Enter - Edit | Left/Right - Change choice | S - Save | Esc - Cancel"
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

fn render_fields<B: Backend>(f: &mut Frame<B>, state: &FormState, area: Rect) {
    let items: Vec<ListItem> = state
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let active = i == state.current;
            let editing = active && state.editing;
            let label_style = if active {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let value_style = if editing {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Spans::from(vec![
                Span::styled(format!("{}: ", field.label), label_style),
                Span::styled(field.display(editing), value_style),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Details"));
    f.render_widget(list, area);
}
