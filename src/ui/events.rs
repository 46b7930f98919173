//! Application event handling.
//!
//! Applies job results to `App`: list replacement, loading flags, per-panel
//! errors and form resets after a successful save.

use crate::app::{App, AppEvent, CategoryField, PostField};
use crate::util::single_line;

/// Apply one background event to the application state.
pub fn handle_app_event(app: &mut App, event: AppEvent) {
    app.needs_redraw = true;

    match event {
        AppEvent::CategoriesLoading => {
            app.loading_categories = true;
            app.category_error = None;
        }
        AppEvent::CategoriesLoaded(result) => {
            app.loading_categories = false;
            match result {
                Ok(categories) => {
                    tracing::debug!(roots = categories.len(), "Categories refreshed");
                    app.set_categories(categories);
                }
                Err(error) => app.category_error = Some(error),
            }
        }
        AppEvent::PostsLoading => {
            app.loading_posts = true;
            app.post_error = None;
        }
        AppEvent::PostsLoaded(result) => {
            app.loading_posts = false;
            match result {
                Ok(posts) => {
                    tracing::debug!(count = posts.len(), "Posts refreshed");
                    app.set_posts(posts);
                }
                Err(error) => app.post_error = Some(error),
            }
        }
        AppEvent::CategorySaved { id, name, created } => {
            app.category_form.reset();
            app.category_field = CategoryField::Name;
            let verb = if created { "Created" } else { "Updated" };
            app.set_status(format!("{} category '{}' (#{})", verb, name, id));
        }
        AppEvent::CategorySaveFailed { error } => {
            app.category_error = Some(error);
        }
        AppEvent::CategoryDeleted { id, name, message } => {
            if app.category_form.id == Some(id) {
                app.category_form.reset();
            }
            if message.is_empty() {
                app.set_status(format!("Deleted category '{}'", name));
            } else {
                app.set_status(single_line(&message).into_owned());
            }
        }
        AppEvent::CategoryDeleteFailed { id, error } => {
            tracing::error!(id, error = %error, "Category delete failed");
            app.category_error = Some(error);
        }
        AppEvent::PostSaved { id, title, created } => {
            app.post_form.reset();
            app.post_field = PostField::Title;
            app.checkbox_cursor = 0;
            let verb = if created { "Created" } else { "Updated" };
            app.set_status(format!("{} post '{}' (#{})", verb, title, id));
        }
        AppEvent::PostSaveFailed { error } => {
            app.post_error = Some(error);
        }
        AppEvent::PostDeleted { id, title, message } => {
            if app.post_form.id == Some(id) {
                app.post_form.reset();
            }
            if message.is_empty() {
                app.set_status(format!("Deleted post '{}'", title));
            } else {
                app.set_status(single_line(&message).into_owned());
            }
        }
        AppEvent::PostDeleteFailed { id, error } => {
            tracing::error!(id, error = %error, "Post delete failed");
            app.post_error = Some(error);
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, Category, PostSummary};
    use std::time::Duration;

    fn test_app() -> App {
        App::new(
            ApiClient::new("http://localhost:3000").unwrap(),
            Duration::from_secs(3),
        )
    }

    #[tokio::test]
    async fn test_loading_flags_are_independent() {
        let mut app = test_app();
        handle_app_event(&mut app, AppEvent::CategoriesLoading);
        assert!(app.loading_categories);
        assert!(!app.loading_posts);

        handle_app_event(&mut app, AppEvent::PostsLoading);
        handle_app_event(&mut app, AppEvent::PostsLoaded(Ok(Vec::new())));
        assert!(app.loading_categories);
        assert!(!app.loading_posts);
    }

    #[tokio::test]
    async fn test_categories_loaded_replaces_forest() {
        let mut app = test_app();
        app.set_categories(vec![Category::new(1, "Old", None)]);

        handle_app_event(&mut app, AppEvent::CategoriesLoading);
        handle_app_event(
            &mut app,
            AppEvent::CategoriesLoaded(Ok(vec![
                Category::new(5, "New", None).with_children(vec![Category::new(6, "Kid", Some(5))])
            ])),
        );

        assert!(!app.loading_categories);
        let ids: Vec<i64> = app.category_options.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![5, 6]);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_data() {
        let mut app = test_app();
        app.set_posts(vec![PostSummary {
            id: 1,
            title: "Kept".to_string(),
            content: "C".to_string(),
            categories: Vec::new(),
        }]);

        handle_app_event(&mut app, AppEvent::PostsLoading);
        handle_app_event(&mut app, AppEvent::PostsLoaded(Err("Bad Gateway".to_string())));

        assert_eq!(app.posts.len(), 1);
        assert_eq!(app.post_error.as_deref(), Some("Bad Gateway"));
        assert!(!app.loading_posts);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_draft() {
        let mut app = test_app();
        app.category_form.name = "Draft".to_string();

        handle_app_event(
            &mut app,
            AppEvent::CategorySaveFailed {
                error: "Name taken".to_string(),
            },
        );

        assert_eq!(app.category_form.name, "Draft");
        assert_eq!(app.category_error.as_deref(), Some("Name taken"));
    }

    #[tokio::test]
    async fn test_post_saved_clears_form_and_selection() {
        let mut app = test_app();
        app.post_form.title = "T".to_string();
        app.post_form.toggle_category(3);

        handle_app_event(
            &mut app,
            AppEvent::PostSaved {
                id: 10,
                title: "T".to_string(),
                created: true,
            },
        );

        assert!(app.post_form.title.is_empty());
        assert!(app.post_form.selection.is_empty());
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_deleting_edited_category_resets_form() {
        let mut app = test_app();
        app.category_form.id = Some(4);
        app.category_form.name = "Gone".to_string();

        handle_app_event(
            &mut app,
            AppEvent::CategoryDeleted {
                id: 4,
                name: "Gone".to_string(),
                message: String::new(),
            },
        );

        assert!(!app.category_form.is_editing());
    }

    #[tokio::test]
    async fn test_delete_message_is_flattened_for_status_bar() {
        let mut app = test_app();
        handle_app_event(
            &mut app,
            AppEvent::PostDeleted {
                id: 4,
                title: "T".to_string(),
                message: "Post\n\x1b[31mdeleted".to_string(),
            },
        );
        let status = app.status_message.as_ref().map(|(msg, _)| msg.to_string());
        assert_eq!(status.as_deref(), Some("Post [31mdeleted"));
    }
}
