use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::popup::render_confirmation;
use crate::domain::filters::{self, Query, Searchable};

/// What a list screen should do after a key press.
#[derive(Debug, PartialEq)]
pub enum ListEvent {
    Back,
    New,
    Edit,
    Open,
    Delete,
    /// A key the list does not handle itself
    Key(char),
}

/// Filterable, selectable table contents behind every list screen.
pub struct ListView<T> {
    items: Vec<T>,
    visible: Vec<usize>,
    table_state: TableState,
    filter: String,
    filtering: bool,
    confirm_delete: bool,
}

impl<T: Searchable> ListView<T> {
    pub fn new(items: Vec<T>) -> Self {
        let visible = (0..items.len()).collect();
        let mut view = Self {
            items,
            visible,
            table_state: TableState::default(),
            filter: String::new(),
            filtering: false,
            confirm_delete: false,
        };
        view.reset_selection();
        view
    }

    /// Keep the filter text when reloading after a save or delete.
    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = filter.to_string();
        self.refilter();
        self
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn visible(&self) -> impl Iterator<Item = &T> {
        self.visible.iter().map(|&i| &self.items[i])
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn selected(&self) -> Option<&T> {
        self.table_state
            .selected()
            .and_then(|row| self.visible.get(row))
            .map(|&i| &self.items[i])
    }

    fn refilter(&mut self) {
        let query = Query::parse(&self.filter);
        self.visible = filters::apply(&self.items, &query);
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        let selection = if self.visible.is_empty() { None } else { Some(0) };
        self.table_state.select(selection);
    }

    fn next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    fn previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => self.visible.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<ListEvent> {
        if self.filtering {
            match key {
                KeyCode::Enter | KeyCode::Esc => self.filtering = false,
                KeyCode::Char(c) => {
                    self.filter.push(c);
                    self.refilter();
                }
                KeyCode::Backspace => {
                    self.filter.pop();
                    self.refilter();
                }
                _ => {}
            }
            return None;
        }

        if self.confirm_delete {
            match key {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.confirm_delete = false;
                    if self.selected().is_some() {
                        return Some(ListEvent::Delete);
                    }
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_delete = false;
                }
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Esc | KeyCode::Char('q') => Some(ListEvent::Back),
            KeyCode::Char('/') => {
                self.filtering = true;
                None
            }
            KeyCode::Char('c') => {
                self.filter.clear();
                self.refilter();
                None
            }
            KeyCode::Char('n') => Some(ListEvent::New),
            KeyCode::Char('e') if self.selected().is_some() => Some(ListEvent::Edit),
            KeyCode::Char('d') if self.selected().is_some() => {
                self.confirm_delete = true;
                None
            }
            KeyCode::Enter if self.selected().is_some() => Some(ListEvent::Open),
            KeyCode::Down => {
                self.next();
                None
            }
            KeyCode::Up => {
                self.previous();
                None
            }
            KeyCode::Char(c) => Some(ListEvent::Key(c)),
            _ => None,
        }
    }
}

/// Static parts of a table screen.
pub struct TableLayout<'a> {
    pub title: String,
    pub headers: &'a [&'a str],
    pub widths: &'a [Constraint],
    pub help: String,
    pub delete_warning: Option<&'a str>,
}

pub fn render_table<B: Backend, T: Searchable>(
    frame: &mut Frame<B>,
    view: &mut ListView<T>,
    layout: TableLayout<'_>,
    row: impl Fn(&T) -> Vec<String>,
) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    let filter_style = if view.filtering {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let filter_text = if view.filtering {
        format!("{}|", view.filter)
    } else if view.filter.is_empty() {
        "</> to filter, e.g. villa status:available from:2024-01-01 min:100000".to_string()
    } else {
        view.filter.clone()
    };
    let filter = Paragraph::new(Spans::from(vec![
        Span::styled("Filter: ", Style::default().fg(Color::Cyan)),
        Span::styled(filter_text, filter_style),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(filter, chunks[0]);

    let header_cells = layout
        .headers
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows: Vec<Row> = view
        .visible()
        .map(|item| Row::new(row(item).into_iter().map(Cell::from)).height(1))
        .collect();

    let title = format!(
        "{} ({} of {})",
        layout.title,
        view.visible_count(),
        view.items().len()
    );
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(layout.widths);

    frame.render_stateful_widget(table, chunks[1], &mut view.table_state);

    let buttons = Paragraph::new(layout.help)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[2]);

    if view.confirm_delete {
        render_confirmation(frame, "Are you sure you want to delete this record?", layout.delete_warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::fixtures::customer;
    use crate::models::Customer;

    fn view() -> ListView<Customer> {
        ListView::new(vec![
            customer(1, "Ana Haddad"),
            customer(2, "Ben Saleh"),
            customer(3, "Carla Haddad"),
        ])
    }

    fn type_text(view: &mut ListView<Customer>, text: &str) {
        for c in text.chars() {
            view.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn selection_wraps_in_both_directions() {
        let mut view = view();
        assert_eq!(view.selected().map(|c| c.id), Some(1));
        view.handle_key(KeyCode::Up);
        assert_eq!(view.selected().map(|c| c.id), Some(3));
        view.handle_key(KeyCode::Down);
        assert_eq!(view.selected().map(|c| c.id), Some(1));
    }

    #[test]
    fn filtering_narrows_rows_and_resets_selection() {
        let mut view = view();
        view.handle_key(KeyCode::Down);
        view.handle_key(KeyCode::Char('/'));
        type_text(&mut view, "haddad");
        view.handle_key(KeyCode::Enter);

        assert!(!view.is_filtering());
        assert_eq!(view.visible_count(), 2);
        assert_eq!(view.selected().map(|c| c.id), Some(1));

        view.handle_key(KeyCode::Char('c'));
        assert_eq!(view.visible_count(), 3);
        assert_eq!(view.filter(), "");
    }

    #[test]
    fn keys_typed_into_filter_do_not_trigger_actions() {
        let mut view = view();
        view.handle_key(KeyCode::Char('/'));
        assert_eq!(view.handle_key(KeyCode::Char('n')), None);
        assert_eq!(view.handle_key(KeyCode::Char('q')), None);
        assert_eq!(view.filter(), "nq");
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut view = view();
        assert_eq!(view.handle_key(KeyCode::Char('d')), None);
        assert!(view.confirm_delete);
        assert_eq!(view.handle_key(KeyCode::Char('n')), None);
        assert!(!view.confirm_delete);

        view.handle_key(KeyCode::Char('d'));
        assert_eq!(view.handle_key(KeyCode::Char('y')), Some(ListEvent::Delete));
    }

    #[test]
    fn empty_result_disables_row_actions() {
        let mut view = view().with_filter("nobody");
        assert_eq!(view.selected().map(|c| c.id), None);
        assert_eq!(view.handle_key(KeyCode::Char('e')), Some(ListEvent::Key('e')));
        assert_eq!(view.handle_key(KeyCode::Enter), None);
        assert_eq!(view.handle_key(KeyCode::Char('n')), Some(ListEvent::New));
    }

    #[test]
    fn unhandled_keys_are_forwarded() {
        let mut view = view();
        assert_eq!(view.handle_key(KeyCode::Char('p')), Some(ListEvent::Key('p')));
        assert_eq!(view.handle_key(KeyCode::Esc), Some(ListEvent::Back));
    }
}
