use ratatui::{prelude::*, widgets::*};

use crate::messages::render::{BannerKind, FieldView, ListView};
use crate::models::TaskStatus;

/// Renders a text input field, with its validation error in the bottom border
pub fn render_input<'a>(field: &'a FieldView, is_focused: bool, is_editing: bool) -> Paragraph<'a> {
    let style = if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(format!(" {} ", field.label));

    if let Some(error) = &field.error {
        block = block.title_bottom(Line::from(format!(" {} ", error)).style(Style::default().fg(Color::Red)));
    }

    Paragraph::new(field.value.as_str()).block(block)
}

/// Renders a list; rows with a checkbox show it
pub fn render_list<'a>(view: &'a ListView) -> List<'a> {
    let items: Vec<ListItem> = view
        .rows
        .iter()
        .map(|row| {
            let text = match row.checked {
                Some(true) => format!("[x] {}", row.text),
                Some(false) => format!("[ ] {}", row.text),
                None => row.text.clone(),
            };
            let style = if row.checked == Some(true) {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(text).style(style)
        })
        .collect();

    List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", view.title)),
        )
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ")
}

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: Option<usize>) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Banner color
pub fn banner_style(kind: BannerKind) -> Style {
    match kind {
        BannerKind::Info => Style::default().fg(Color::Cyan),
        BannerKind::Success => Style::default().fg(Color::Green).bold(),
        BannerKind::Error => Style::default().fg(Color::Red).bold(),
    }
}

/// Task status color
pub fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::Yellow,
        TaskStatus::InProgress => Color::Cyan,
        TaskStatus::Done => Color::Green,
    }
}
