use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Spans,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Kind of message shown over the current screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

pub fn render_notice<B: Backend>(frame: &mut Frame<B>, notice: &Notice) {
    let (title, color) = match notice.kind {
        NoticeKind::Info => ("Information", Color::Green),
        NoticeKind::Error => ("Error", Color::Red),
    };
    let lines = vec![
        Spans::from(""),
        Spans::from(notice.text.as_str()),
        Spans::from(""),
        Spans::from("Press any key to continue"),
    ];
    render_popup(frame, title, lines, color);
}

pub fn render_confirmation<B: Backend>(frame: &mut Frame<B>, question: &str, detail: Option<&str>) {
    let mut lines = vec![Spans::from(""), Spans::from(question.to_string())];
    if let Some(detail) = detail {
        lines.push(Spans::from(""));
        lines.push(Spans::from(detail.to_string()));
    }
    lines.push(Spans::from(""));
    lines.push(Spans::from("<Y> Yes  <N> No"));
    render_popup(frame, "Confirm Delete", lines, Color::White);
}

fn render_popup<B: Backend>(frame: &mut Frame<B>, title: &str, lines: Vec<Spans>, color: Color) {
    let area = centered_rect(60, 30, frame.size());
    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
