//! Draft state for the category and post editors.
//!
//! A draft is either in "create" mode (`id == None`) or "edit" mode. Calling
//! `validate` checks the required fields and yields the trimmed request
//! payload; no network work happens here.

use crate::api::{Category, CategoryPayload, PostPayload, PostSummary};
use crate::selection::Selection;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Category name cannot be empty")]
    EmptyCategoryName,
    #[error("Post title cannot be empty")]
    EmptyPostTitle,
    #[error("Post content cannot be empty")]
    EmptyPostContent,
}

// ============================================================================
// Category Form
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    /// Category being edited, or `None` when creating.
    pub id: Option<i64>,
    pub name: String,
    pub parent_id: Option<i64>,
}

impl CategoryForm {
    /// Load an existing category into the draft.
    pub fn edit(category: &Category) -> Self {
        Self {
            id: Some(category.id),
            name: category.name.clone(),
            parent_id: category.parent_category_id,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn validate(&self) -> Result<CategoryPayload, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyCategoryName);
        }
        Ok(CategoryPayload {
            name: name.to_owned(),
            parent_category_id: self.parent_id,
        })
    }
}

// ============================================================================
// Post Form
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    /// Post being edited, or `None` when creating.
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
    pub selection: Selection,
}

impl PostForm {
    /// Load an existing post; its categories become the selection.
    pub fn edit(post: &PostSummary) -> Self {
        Self {
            id: Some(post.id),
            title: post.title.clone(),
            content: post.content.clone(),
            selection: Selection::from_ids(post.categories.iter().map(|c| c.id)),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    pub fn toggle_category(&mut self, id: i64) {
        self.selection = self.selection.toggle(id);
    }

    /// Back to an empty create draft with no categories selected.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Title is checked before content.
    pub fn validate(&self) -> Result<PostPayload, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyPostTitle);
        }
        let content = self.content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyPostContent);
        }
        Ok(PostPayload {
            title: title.to_owned(),
            content: content.to_owned(),
            categories: self.selection.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CategoryRef;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_category_form_rejects_blank_name() {
        let form = CategoryForm {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ValidationError::EmptyCategoryName));
    }

    #[test]
    fn test_category_form_trims_name() {
        let form = CategoryForm {
            id: None,
            name: "  News ".to_string(),
            parent_id: Some(4),
        };
        assert_eq!(
            form.validate().unwrap(),
            CategoryPayload {
                name: "News".to_string(),
                parent_category_id: Some(4),
            }
        );
    }

    #[test]
    fn test_category_form_edit_and_reset() {
        let category = Category::new(7, "Sports", Some(1));
        let mut form = CategoryForm::edit(&category);
        assert!(form.is_editing());
        assert_eq!(form.parent_id, Some(1));

        form.reset();
        assert_eq!(form, CategoryForm::default());
        assert!(!form.is_editing());
    }

    #[test]
    fn test_post_form_empty_content() {
        let form = PostForm {
            title: "T".to_string(),
            content: String::new(),
            ..Default::default()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyPostContent);
        assert_eq!(err.to_string(), "Post content cannot be empty");
    }

    #[test]
    fn test_post_form_title_checked_first() {
        let form = PostForm::default();
        assert_eq!(form.validate(), Err(ValidationError::EmptyPostTitle));
    }

    #[test]
    fn test_post_form_payload() {
        let mut form = PostForm {
            title: " Hello ".to_string(),
            content: "\nBody\n".to_string(),
            ..Default::default()
        };
        form.toggle_category(5);
        form.toggle_category(2);

        assert_eq!(
            form.validate().unwrap(),
            PostPayload {
                title: "Hello".to_string(),
                content: "Body".to_string(),
                categories: vec![2, 5],
            }
        );
    }

    #[test]
    fn test_post_form_edit_loads_categories() {
        let post = PostSummary {
            id: 3,
            title: "T".to_string(),
            content: "C".to_string(),
            categories: vec![
                CategoryRef {
                    id: 8,
                    name: "X".to_string(),
                    parent_category_id: None,
                },
                CategoryRef {
                    id: 1,
                    name: "Y".to_string(),
                    parent_category_id: Some(8),
                },
            ],
        };
        let mut form = PostForm::edit(&post);
        assert_eq!(form.id, Some(3));
        assert_eq!(form.selection.to_vec(), vec![1, 8]);

        form.reset();
        assert!(form.selection.is_empty());
        assert!(form.title.is_empty());
    }
}
