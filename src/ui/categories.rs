use crate::app::{App, Focus};
use crate::tree::{self, TreeRow};
use crate::util::{single_line, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Visual nesting marker, one per depth level.
const NEST_MARKER: &str = "│ ";

/// Detail suffix for a tree row: parent, child count, post count.
pub(super) fn row_details(row: &TreeRow<'_>) -> String {
    let mut parts = Vec::with_capacity(3);
    if let Some(parent) = row.category.parent_category_id {
        parts.push(format!("parent #{}", parent));
    }
    if row.child_count > 0 {
        parts.push(format!("{} sub", row.child_count));
    }
    if row.post_count > 0 {
        parts.push(format!("{} posts", row.post_count));
    }
    parts.join(", ")
}

/// Render the category tree panel.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let is_focused = app.focus == Focus::CategoryTree;
    let rows = tree::tree_rows(&app.categories);
    let inner_width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = if rows.is_empty() {
        vec![ListItem::new(Span::styled(
            "No categories yet",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let style = if is_focused && i == app.selected_tree_row {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else {
                    Style::default()
                };

                let indent = NEST_MARKER.repeat(row.depth);
                let name = single_line(&row.category.name);
                let details = row_details(row);
                let budget = inner_width.saturating_sub(row.depth * 2 + details.len() + 1);
                let name = truncate_to_width(&name, budget);

                let mut spans = vec![
                    Span::styled(indent, Style::default().fg(Color::DarkGray)),
                    Span::styled(name.into_owned(), style.add_modifier(Modifier::BOLD)),
                ];
                if !details.is_empty() {
                    spans.push(Span::styled(
                        format!(" {}", details),
                        style.fg(Color::Gray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect()
    };

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let title = if app.loading_categories {
        "Categories (loading...)".to_string()
    } else {
        format!("Categories ({})", rows.len())
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );

    let mut state = ListState::default().with_selected(Some(app.selected_tree_row));
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Category;

    #[test]
    fn test_row_details() {
        let forest = vec![
            Category::new(1, "A", None).with_children(vec![Category::new(2, "A1", Some(1))])
        ];
        let rows = tree::tree_rows(&forest);
        assert_eq!(row_details(&rows[0]), "1 sub");
        assert_eq!(row_details(&rows[1]), "parent #1");
    }
}
