//! Input handling for the TUI.
//!
//! Routes key presses to the confirmation dialog first, then to the focused
//! panel. Anything that needs the network becomes an [`ops::Job`] spawned on
//! a background task.

use crate::app::{App, AppEvent, CategoryField, Focus, PostField};
use crate::ops::{self, Job};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    // Confirmation dialog captures all keys while visible
    if app.pending_confirm.is_some() {
        handle_confirm_input(app, code, event_tx);
        return Action::Continue;
    }

    match code {
        KeyCode::Tab => {
            app.focus = app.focus.next();
            return Action::Continue;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return Action::Continue;
        }
        _ => {}
    }

    match app.focus {
        Focus::CategoryForm => handle_category_form_input(app, code, modifiers, event_tx),
        Focus::PostForm => handle_post_form_input(app, code, modifiers, event_tx),
        Focus::CategoryTree | Focus::PostList => return handle_list_input(app, code, event_tx),
    }
    Action::Continue
}

fn dispatch(app: &App, job: Job, event_tx: &mpsc::Sender<AppEvent>) {
    tracing::debug!(job = job.name(), "Dispatching job");
    ops::spawn_job(app.api.clone(), job, event_tx.clone());
}

/// Re-fetch both lists concurrently.
pub(super) fn refresh_all(app: &App, event_tx: &mpsc::Sender<AppEvent>) {
    dispatch(app, Job::RefreshCategories, event_tx);
    dispatch(app, Job::RefreshPosts, event_tx);
}

fn handle_confirm_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    let accepted = match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
        _ => return,
    };
    if let Some(job) = app.answer_confirm(accepted) {
        dispatch(app, job, event_tx);
    }
}

/// Plain characters typed into a text field; modified keys are ignored.
fn typed_char(code: KeyCode, modifiers: KeyModifiers) -> Option<char> {
    match code {
        KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Some(c)
        }
        _ => None,
    }
}

fn handle_category_form_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match code {
        KeyCode::Enter => {
            if let Some(job) = app.begin_category_submit() {
                dispatch(app, job, event_tx);
            }
        }
        KeyCode::Esc => app.reset_category_form(),
        KeyCode::Up | KeyCode::Down => {
            app.category_field = match app.category_field {
                CategoryField::Name => CategoryField::Parent,
                CategoryField::Parent => CategoryField::Name,
            };
        }
        _ => match app.category_field {
            CategoryField::Name => {
                if let Some(c) = typed_char(code, modifiers) {
                    app.category_form.name.push(c);
                } else if code == KeyCode::Backspace {
                    app.category_form.name.pop();
                }
            }
            CategoryField::Parent => match code {
                KeyCode::Right | KeyCode::Char(' ') | KeyCode::Char('l') => app.cycle_parent(true),
                KeyCode::Left | KeyCode::Char('h') => app.cycle_parent(false),
                KeyCode::Backspace | KeyCode::Delete => app.category_form.parent_id = None,
                _ => {}
            },
        },
    }
}

fn handle_post_form_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match code {
        KeyCode::Enter => {
            if let Some(job) = app.begin_post_submit() {
                dispatch(app, job, event_tx);
            }
            return;
        }
        KeyCode::Esc => {
            app.reset_post_form();
            return;
        }
        _ => {}
    }

    match app.post_field {
        PostField::Title | PostField::Content => match code {
            KeyCode::Up => {
                app.post_field = PostField::Title;
            }
            KeyCode::Down => {
                app.post_field = match app.post_field {
                    PostField::Title => PostField::Content,
                    _ => PostField::Categories,
                };
            }
            KeyCode::Backspace => {
                field_text(app).pop();
            }
            _ => {
                if let Some(c) = typed_char(code, modifiers) {
                    field_text(app).push(c);
                }
            }
        },
        PostField::Categories => match code {
            KeyCode::Up | KeyCode::Char('k') => {
                if app.checkbox_cursor == 0 {
                    app.post_field = PostField::Content;
                } else {
                    app.checkbox_cursor -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if app.checkbox_cursor + 1 < app.category_options.len() {
                    app.checkbox_cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_checkbox_at_cursor(),
            _ => {}
        },
    }
}

/// Text buffer of the active post field (title or content).
fn field_text(app: &mut App) -> &mut String {
    match app.post_field {
        PostField::Title => &mut app.post_form.title,
        _ => &mut app.post_form.content,
    }
}

fn handle_list_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    let len = match app.focus {
        Focus::CategoryTree => app.category_options.len(),
        _ => app.posts.len(),
    };
    let cursor = match app.focus {
        Focus::CategoryTree => &mut app.selected_tree_row,
        _ => &mut app.selected_post,
    };

    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Down | KeyCode::Char('j') => {
            if *cursor + 1 < len {
                *cursor += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => *cursor = cursor.saturating_sub(1),
        KeyCode::Home | KeyCode::Char('g') => *cursor = 0,
        KeyCode::End | KeyCode::Char('G') => *cursor = len.saturating_sub(1),
        KeyCode::Char('e') | KeyCode::Enter => match app.focus {
            Focus::CategoryTree => app.edit_selected_category(),
            _ => app.edit_selected_post(),
        },
        KeyCode::Char('n') => match app.focus {
            Focus::CategoryTree => {
                app.reset_category_form();
                app.focus = Focus::CategoryForm;
            }
            _ => {
                app.reset_post_form();
                app.focus = Focus::PostForm;
            }
        },
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('r') => {
            app.set_status("Refreshing...");
            refresh_all(app, event_tx);
        }
        _ => {}
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, Category};
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new(
            ApiClient::new("http://localhost:3000").unwrap(),
            Duration::from_secs(3),
        );
        app.set_categories(vec![
            Category::new(1, "A", None).with_children(vec![Category::new(2, "A1", Some(1))])
        ]);
        app
    }

    fn press(app: &mut App, code: KeyCode, tx: &mpsc::Sender<AppEvent>) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx)
    }

    #[tokio::test]
    async fn test_typing_into_category_name() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);

        for c in "News".chars() {
            press(&mut app, KeyCode::Char(c), &tx);
        }
        press(&mut app, KeyCode::Backspace, &tx);
        assert_eq!(app.category_form.name, "New");
    }

    #[tokio::test]
    async fn test_empty_submit_shows_validation_error() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, KeyCode::Enter, &tx);
        assert!(app.category_error.is_some());
    }

    #[tokio::test]
    async fn test_checkbox_navigation_and_toggle() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        app.focus = Focus::PostForm;

        press(&mut app, KeyCode::Down, &tx);
        press(&mut app, KeyCode::Down, &tx);
        assert_eq!(app.post_field, PostField::Categories);

        press(&mut app, KeyCode::Down, &tx);
        press(&mut app, KeyCode::Char(' '), &tx);
        assert!(app.post_form.selection.contains(2));
        assert!(!app.post_form.selection.contains(1));
    }

    #[tokio::test]
    async fn test_q_quits_only_from_lists() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);

        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Continue));
        assert_eq!(app.category_form.name, "q");

        app.focus = Focus::CategoryTree;
        assert!(matches!(press(&mut app, KeyCode::Char('q'), &tx), Action::Quit));
    }

    #[tokio::test]
    async fn test_confirm_dialog_captures_keys() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        app.focus = Focus::CategoryTree;

        press(&mut app, KeyCode::Char('d'), &tx);
        assert!(app.pending_confirm.is_some());

        press(&mut app, KeyCode::Tab, &tx);
        assert_eq!(app.focus, Focus::CategoryTree);

        press(&mut app, KeyCode::Esc, &tx);
        assert!(app.pending_confirm.is_none());
    }
}
