//! Category and post editor panels.

use crate::app::{App, CategoryField, Focus, PostField};
use crate::tree;
use crate::util::single_line;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

fn label_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

/// Text value with a trailing cursor when the field is being edited.
fn input_value(value: &str, active: bool) -> String {
    if active {
        format!("{}_", value)
    } else {
        value.to_string()
    }
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        })
        .title(title)
}

fn error_line(error: Option<&str>) -> Line<'_> {
    match error {
        Some(msg) => Line::from(Span::styled(msg, Style::default().fg(Color::Red))),
        None => Line::default(),
    }
}

fn hint_line(editing: bool, loading: bool, create_label: &'static str) -> Line<'static> {
    let submit = if loading {
        Span::styled("[Enter] (loading...)", Style::default().fg(Color::DarkGray))
    } else if editing {
        Span::raw("[Enter] Save changes")
    } else {
        Span::raw(create_label)
    };
    Line::from(vec![submit, Span::raw("  [Esc] Cancel")])
}

/// Render the category form.
pub fn render_category_form(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::CategoryForm;
    let form = &app.category_form;
    let title = match form.id {
        Some(id) => format!("Edit category #{}", id),
        None => "New category".to_string(),
    };

    let name_active = focused && app.category_field == CategoryField::Name;
    let parent_active = focused && app.category_field == CategoryField::Parent;

    let parent_value = if parent_active {
        format!("< {} >", app.parent_label())
    } else {
        app.parent_label()
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Name:   ", label_style(name_active)),
            Span::raw(input_value(&form.name, name_active)),
        ]),
        Line::from(vec![
            Span::styled("Parent: ", label_style(parent_active)),
            Span::raw(parent_value),
        ]),
        error_line(app.category_error.as_deref()),
        hint_line(form.is_editing(), app.loading_categories, "[Enter] Create category"),
    ];

    let paragraph = Paragraph::new(lines).block(panel_block(title, focused));
    f.render_widget(paragraph, area);
}

/// Render the post form, including the category checkbox tree.
pub fn render_post_form(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::PostForm;
    let form = &app.post_form;
    let title = match form.id {
        Some(id) => format!("Edit post #{}", id),
        None => "New post".to_string(),
    };

    let block = panel_block(title, focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height < 6 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(3), // content
            Constraint::Length(1), // categories label
            Constraint::Min(1),    // checkbox tree
            Constraint::Length(1), // error
            Constraint::Length(1), // hints
        ])
        .split(inner);

    let title_active = focused && app.post_field == PostField::Title;
    let content_active = focused && app.post_field == PostField::Content;
    let boxes_active = focused && app.post_field == PostField::Categories;

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Title:   ", label_style(title_active)),
            Span::raw(input_value(&form.title, title_active)),
        ])),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Content: ", label_style(content_active)),
            Span::raw(input_value(&form.content, content_active)),
        ]))
        .wrap(Wrap { trim: false }),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(Span::styled(
            format!("Categories ({} selected, space toggles):", form.selection.len()),
            label_style(boxes_active),
        )),
        chunks[2],
    );

    render_checkbox_tree(f, app, chunks[3], boxes_active);

    f.render_widget(Paragraph::new(error_line(app.post_error.as_deref())), chunks[4]);
    f.render_widget(
        Paragraph::new(hint_line(
            form.is_editing(),
            app.loading_posts,
            "[Enter] Create post",
        )),
        chunks[5],
    );
}

fn render_checkbox_tree(f: &mut Frame, app: &App, area: Rect, active: bool) {
    let rows = tree::checkbox_rows(&app.categories, &app.post_form.selection);

    if rows.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "  No categories",
                Style::default().fg(Color::DarkGray),
            )),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mark = if row.checked { "[x] " } else { "[ ] " };
            let style = if active && i == app.checkbox_cursor {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else if row.checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("  {}", "┊ ".repeat(row.depth)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("{}{}", mark, single_line(&row.name)), style),
            ]))
        })
        .collect();

    let selected = active.then_some(app.checkbox_cursor);
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(List::new(items), area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_value_cursor() {
        assert_eq!(input_value("abc", true), "abc_");
        assert_eq!(input_value("abc", false), "abc");
    }

    #[test]
    fn test_hint_line_loading_disables_submit() {
        let line = hint_line(false, true, "[Enter] Create post");
        assert!(line.spans[0].content.contains("loading"));
        let line = hint_line(true, false, "[Enter] Create post");
        assert_eq!(line.spans[0].content, "[Enter] Save changes");
    }
}
