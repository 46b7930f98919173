use crate::api::PostSummary;
use crate::app::{App, Focus};
use crate::util::{single_line, truncate_to_width};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

/// Comma-separated category names, or a placeholder when none.
pub(super) fn category_names(post: &PostSummary) -> String {
    if post.categories.is_empty() {
        return "Uncategorized".to_string();
    }
    post.categories
        .iter()
        .map(|c| single_line(&c.name).into_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the post table panel.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let is_focused = app.focus == Focus::PostList;
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let title = if app.loading_posts {
        "Posts (loading...)".to_string()
    } else {
        format!("Posts ({})", app.posts.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);

    if app.posts.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No posts yet",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let inner = area.width.saturating_sub(2) as usize;
    let title_width = inner * 30 / 100;
    let content_width = inner * 40 / 100;
    let categories_width = inner.saturating_sub(title_width + content_width + 2);

    let rows: Vec<Row> = app
        .posts
        .iter()
        .map(|post| {
            let uncategorized = post.categories.is_empty();
            let names = category_names(post);
            let content = single_line(&post.content);
            Row::new(vec![
                Cell::from(truncate_to_width(&single_line(&post.title), title_width).into_owned())
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(truncate_to_width(&content, content_width).into_owned())
                    .style(Style::default().fg(Color::Gray)),
                Cell::from(truncate_to_width(&names, categories_width).into_owned()).style(
                    if uncategorized {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default().fg(Color::Green)
                    },
                ),
            ])
        })
        .collect();

    let header = Row::new(vec!["Title", "Content", "Categories"])
        .style(Style::default().add_modifier(Modifier::UNDERLINED));

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(if is_focused {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    } else {
        Style::default()
    });

    let mut state = TableState::default().with_selected(Some(app.selected_post));
    f.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CategoryRef;

    #[test]
    fn test_category_names() {
        let mut post = PostSummary {
            id: 1,
            title: "T".to_string(),
            content: "C".to_string(),
            categories: Vec::new(),
        };
        assert_eq!(category_names(&post), "Uncategorized");

        post.categories = vec![
            CategoryRef {
                id: 1,
                name: "Tech".to_string(),
                parent_category_id: None,
            },
            CategoryRef {
                id: 2,
                name: "Rust".to_string(),
                parent_category_id: Some(1),
            },
        ];
        assert_eq!(category_names(&post), "Tech, Rust");
    }
}
