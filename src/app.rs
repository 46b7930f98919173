use crate::api::{ApiClient, Category, PostSummary};
use crate::forms::{CategoryForm, PostForm};
use crate::ops::Job;
use crate::tree::{self, CategoryOption};
use std::borrow::Cow;
use std::time::Duration;
use tokio::time::Instant;

// ============================================================================
// Focus and Fields
// ============================================================================

/// Which panel receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    CategoryForm,
    CategoryTree,
    PostForm,
    PostList,
}

impl Focus {
    const ORDER: [Focus; 4] = [
        Focus::CategoryForm,
        Focus::CategoryTree,
        Focus::PostForm,
        Focus::PostList,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_form(self) -> bool {
        matches!(self, Focus::CategoryForm | Focus::PostForm)
    }
}

/// Active input inside the category form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Name,
    Parent,
}

/// Active input inside the post form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    Title,
    Content,
    Categories,
}

// ============================================================================
// Confirmation Dialog
// ============================================================================

/// Pending delete awaiting a y/n answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteCategory { id: i64, name: String },
    DeletePost { id: i64, title: String },
}

impl ConfirmAction {
    pub fn prompt(&self) -> String {
        match self {
            ConfirmAction::DeleteCategory { name, .. } => {
                format!("Delete category \"{}\"?", name)
            }
            ConfirmAction::DeletePost { title, .. } => format!("Delete post \"{}\"?", title),
        }
    }
}

// ============================================================================
// Background Events
// ============================================================================

/// Results reported by background jobs.
///
/// Refreshes report a `*Loading` event before the request and a `*Loaded`
/// event after it, so each list's loading flag is tracked independently.
#[derive(Debug)]
pub enum AppEvent {
    CategoriesLoading,
    CategoriesLoaded(Result<Vec<Category>, String>),
    PostsLoading,
    PostsLoaded(Result<Vec<PostSummary>, String>),
    CategorySaved {
        id: i64,
        name: String,
        created: bool,
    },
    CategorySaveFailed {
        error: String,
    },
    CategoryDeleted {
        id: i64,
        name: String,
        message: String,
    },
    CategoryDeleteFailed {
        id: i64,
        error: String,
    },
    PostSaved {
        id: i64,
        title: String,
        created: bool,
    },
    PostSaveFailed {
        error: String,
    },
    PostDeleted {
        id: i64,
        title: String,
        message: String,
    },
    PostDeleteFailed {
        id: i64,
        error: String,
    },
    /// A background job panicked.
    TaskPanicked {
        task: &'static str,
        error: String,
    },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state, owned by the UI task.
pub struct App {
    pub api: ApiClient,

    // Data, replaced wholesale on every successful fetch
    pub categories: Vec<Category>,
    /// Flattened `categories`, recomputed whenever the forest is replaced.
    pub category_options: Vec<CategoryOption>,
    pub posts: Vec<PostSummary>,

    pub loading_categories: bool,
    pub loading_posts: bool,
    /// Inline error for the category panel (validation or request).
    pub category_error: Option<String>,
    /// Inline error for the post panel (validation or request).
    pub post_error: Option<String>,

    // Drafts
    pub category_form: CategoryForm,
    pub post_form: PostForm,
    pub category_field: CategoryField,
    pub post_field: PostField,

    // UI state
    pub focus: Focus,
    pub selected_tree_row: usize,
    pub selected_post: usize,
    /// Cursor row inside the post form's checkbox tree.
    pub checkbox_cursor: usize,
    pub pending_confirm: Option<ConfirmAction>,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub status_timeout: Duration,

    /// Skip frame renders when nothing changed.
    pub needs_redraw: bool,
}

impl App {
    pub fn new(api: ApiClient, status_timeout: Duration) -> Self {
        Self {
            api,
            categories: Vec::new(),
            category_options: Vec::new(),
            posts: Vec::new(),
            loading_categories: false,
            loading_posts: false,
            category_error: None,
            post_error: None,
            category_form: CategoryForm::default(),
            post_form: PostForm::default(),
            category_field: CategoryField::Name,
            post_field: PostField::Title,
            focus: Focus::CategoryForm,
            selected_tree_row: 0,
            selected_post: 0,
            checkbox_cursor: 0,
            pending_confirm: None,
            status_message: None,
            status_timeout,
            needs_redraw: true,
        }
    }

    // ========================================================================
    // Status Line
    // ========================================================================

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Drop the status message once it has been shown long enough.
    /// Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        let expired = matches!(
            &self.status_message,
            Some((_, shown_at)) if shown_at.elapsed() >= self.status_timeout
        );
        if expired {
            self.status_message = None;
        }
        expired
    }

    // ========================================================================
    // Data Replacement
    // ========================================================================

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.category_options = tree::flatten(&categories);
        self.categories = categories;
        self.clamp_selections();
    }

    pub fn set_posts(&mut self, posts: Vec<PostSummary>) {
        self.posts = posts;
        self.clamp_selections();
    }

    /// Keep cursors inside the current lists after a refresh.
    pub fn clamp_selections(&mut self) {
        let rows = self.category_options.len();
        self.selected_tree_row = self.selected_tree_row.min(rows.saturating_sub(1));
        self.checkbox_cursor = self.checkbox_cursor.min(rows.saturating_sub(1));
        self.selected_post = self.selected_post.min(self.posts.len().saturating_sub(1));
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Category under the tree cursor.
    pub fn selected_category(&self) -> Option<&Category> {
        let id = self.category_options.get(self.selected_tree_row)?.id;
        tree::find(&self.categories, id)
    }

    pub fn selected_post(&self) -> Option<&PostSummary> {
        self.posts.get(self.selected_post)
    }

    /// Parent picker choices for the current category draft.
    pub fn parent_options(&self) -> Vec<CategoryOption> {
        tree::parent_options(&self.categories, self.category_form.id)
    }

    /// Label for the currently chosen parent, depth-indented like the picker options.
    pub fn parent_label(&self) -> String {
        match self.category_form.parent_id {
            None => "None".to_string(),
            Some(id) => self
                .category_options
                .iter()
                .find(|o| o.id == id)
                .map(CategoryOption::label)
                .unwrap_or_else(|| format!("#{}", id)),
        }
    }

    // ========================================================================
    // Form Actions
    // ========================================================================

    /// Step the parent picker through "None" followed by every allowed option.
    pub fn cycle_parent(&mut self, forward: bool) {
        let options = self.parent_options();
        let slots = options.len() + 1;
        let current = self
            .category_form
            .parent_id
            .and_then(|id| options.iter().position(|o| o.id == id))
            .map(|i| i + 1)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        self.category_form.parent_id = next.checked_sub(1).map(|i| options[i].id);
    }

    /// Toggle the category under the checkbox cursor.
    pub fn toggle_checkbox_at_cursor(&mut self) {
        if let Some(option) = self.category_options.get(self.checkbox_cursor) {
            let id = option.id;
            self.post_form.toggle_category(id);
        }
    }

    pub fn edit_selected_category(&mut self) {
        if let Some(form) = self.selected_category().map(CategoryForm::edit) {
            self.category_form = form;
            self.category_field = CategoryField::Name;
            self.focus = Focus::CategoryForm;
        }
    }

    pub fn edit_selected_post(&mut self) {
        if let Some(form) = self.selected_post().map(PostForm::edit) {
            self.post_form = form;
            self.post_field = PostField::Title;
            self.focus = Focus::PostForm;
        }
    }

    pub fn reset_category_form(&mut self) {
        self.category_form.reset();
        self.category_field = CategoryField::Name;
        self.category_error = None;
    }

    pub fn reset_post_form(&mut self) {
        self.post_form.reset();
        self.post_field = PostField::Title;
        self.checkbox_cursor = 0;
        self.post_error = None;
    }

    /// Validate the category draft and build the save job.
    ///
    /// Returns `None` (and records why) when nothing should be sent.
    pub fn begin_category_submit(&mut self) -> Option<Job> {
        if self.loading_categories {
            self.set_status("Categories are still loading");
            return None;
        }

        let payload = match self.category_form.validate() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(error = %e, "Category form rejected");
                self.category_error = Some(e.to_string());
                return None;
            }
        };

        if let (Some(id), Some(parent)) = (self.category_form.id, payload.parent_category_id) {
            if tree::is_descendant(&self.categories, id, parent) {
                tracing::warn!(
                    category_id = id,
                    parent_id = parent,
                    "Category assigned under its own descendant"
                );
                self.set_status("Warning: new parent is a descendant of this category");
            }
        }

        Some(Job::SaveCategory {
            id: self.category_form.id,
            payload,
        })
    }

    /// Validate the post draft and build the save job.
    pub fn begin_post_submit(&mut self) -> Option<Job> {
        if self.loading_posts {
            self.set_status("Posts are still loading");
            return None;
        }

        match self.post_form.validate() {
            Ok(payload) => Some(Job::SavePost {
                id: self.post_form.id,
                payload,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Post form rejected");
                self.post_error = Some(e.to_string());
                None
            }
        }
    }

    /// Ask for confirmation before deleting the highlighted record.
    pub fn request_delete(&mut self) {
        self.pending_confirm = match self.focus {
            Focus::CategoryTree => self
                .selected_category()
                .map(|c| ConfirmAction::DeleteCategory {
                    id: c.id,
                    name: c.name.clone(),
                }),
            Focus::PostList => self.selected_post().map(|p| ConfirmAction::DeletePost {
                id: p.id,
                title: p.title.clone(),
            }),
            Focus::CategoryForm | Focus::PostForm => None,
        };
    }

    /// Resolve the confirmation dialog. `None` when declined or nothing pending.
    pub fn answer_confirm(&mut self, accepted: bool) -> Option<Job> {
        let action = self.pending_confirm.take()?;
        if !accepted {
            return None;
        }
        Some(match action {
            ConfirmAction::DeleteCategory { id, name } => Job::DeleteCategory { id, name },
            ConfirmAction::DeletePost { id, title } => Job::DeletePost { id, title },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CategoryPayload;

    fn test_app() -> App {
        let api = ApiClient::new("http://localhost:3000").unwrap();
        let mut app = App::new(api, Duration::from_secs(3));
        app.set_categories(vec![
            Category::new(1, "A", None).with_children(vec![Category::new(2, "A1", Some(1))]),
            Category::new(3, "B", None),
        ]);
        app
    }

    #[test]
    fn test_focus_cycles() {
        assert_eq!(Focus::CategoryForm.next(), Focus::CategoryTree);
        assert_eq!(Focus::PostList.next(), Focus::CategoryForm);
        assert_eq!(Focus::CategoryForm.prev(), Focus::PostList);
    }

    #[tokio::test]
    async fn test_parent_options_exclude_edited_category() {
        let mut app = test_app();
        app.selected_tree_row = 0;
        app.edit_selected_category();

        let ids: Vec<i64> = app.parent_options().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_cycle_parent_wraps_through_none() {
        let mut app = test_app();
        assert_eq!(app.category_form.parent_id, None);

        app.cycle_parent(true);
        assert_eq!(app.category_form.parent_id, Some(1));
        app.cycle_parent(true);
        app.cycle_parent(true);
        assert_eq!(app.category_form.parent_id, Some(3));
        app.cycle_parent(true);
        assert_eq!(app.category_form.parent_id, None);
        app.cycle_parent(false);
        assert_eq!(app.category_form.parent_id, Some(3));
        assert_eq!(app.parent_label(), " B");
    }

    #[tokio::test]
    async fn test_parent_label_shows_depth_markers() {
        let mut app = test_app();
        app.cycle_parent(true);
        app.cycle_parent(true);
        assert_eq!(app.category_form.parent_id, Some(2));
        assert_eq!(app.parent_label(), "·· A1");

        app.category_form.parent_id = None;
        assert_eq!(app.parent_label(), "None");
    }

    #[tokio::test]
    async fn test_category_submit_validation_error() {
        let mut app = test_app();
        app.category_form.name = "  ".to_string();

        assert!(app.begin_category_submit().is_none());
        assert_eq!(
            app.category_error.as_deref(),
            Some("Category name cannot be empty")
        );
    }

    #[tokio::test]
    async fn test_category_submit_builds_job() {
        let mut app = test_app();
        app.category_form.name = " New ".to_string();
        app.category_form.parent_id = Some(3);

        match app.begin_category_submit() {
            Some(Job::SaveCategory { id, payload }) => {
                assert_eq!(id, None);
                assert_eq!(
                    payload,
                    CategoryPayload {
                        name: "New".to_string(),
                        parent_category_id: Some(3),
                    }
                );
            }
            _ => panic!("expected a save job"),
        }
    }

    #[tokio::test]
    async fn test_submit_blocked_while_loading() {
        let mut app = test_app();
        app.category_form.name = "X".to_string();
        app.loading_categories = true;
        assert!(app.begin_category_submit().is_none());
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_descendant_parent_is_flagged_not_blocked() {
        let mut app = test_app();
        app.category_form = CategoryForm {
            id: Some(1),
            name: "A".to_string(),
            parent_id: Some(2),
        };

        assert!(app.begin_category_submit().is_some());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("descendant"));
    }

    #[tokio::test]
    async fn test_toggle_checkbox_at_cursor() {
        let mut app = test_app();
        app.checkbox_cursor = 1;
        app.toggle_checkbox_at_cursor();
        assert!(app.post_form.selection.contains(2));
        app.toggle_checkbox_at_cursor();
        assert!(app.post_form.selection.is_empty());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut app = test_app();
        app.focus = Focus::CategoryTree;
        app.selected_tree_row = 2;
        app.request_delete();
        assert_eq!(
            app.pending_confirm,
            Some(ConfirmAction::DeleteCategory {
                id: 3,
                name: "B".to_string()
            })
        );

        assert!(app.answer_confirm(false).is_none());
        assert!(app.pending_confirm.is_none());

        app.request_delete();
        assert!(matches!(
            app.answer_confirm(true),
            Some(Job::DeleteCategory { id: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_set_categories_clamps_cursor() {
        let mut app = test_app();
        app.selected_tree_row = 2;
        app.set_categories(vec![Category::new(9, "Only", None)]);
        assert_eq!(app.selected_tree_row, 0);
        assert_eq!(app.category_options.len(), 1);
    }
}
