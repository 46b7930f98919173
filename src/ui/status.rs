use crate::app::{App, Focus};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Key hints for the focused panel.
pub(super) fn hints(focus: Focus) -> &'static str {
    match focus {
        Focus::CategoryForm => "Type name | ↑↓ field | ←→ parent | Enter save | Esc cancel | Tab next",
        Focus::PostForm => "Type text | ↑↓ field | Space toggle | Enter save | Esc cancel | Tab next",
        Focus::CategoryTree | Focus::PostList => {
            "[j/k]move [e]dit [n]ew [d]elete [r]efresh [Tab]next [q]uit"
        }
    }
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        Cow::Borrowed(hints(app.focus))
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
