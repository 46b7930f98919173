//! Category tree model.
//!
//! Pure projections over the category forest returned by the API:
//!
//! - [`flatten`] - pre-order, depth-annotated option list for pickers
//! - [`parent_options`] - `flatten` minus the category being edited
//! - [`tree_rows`] - per-node display rows for the category tree panel
//! - [`checkbox_rows`] - per-node rows for the post form's multi-select
//!
//! Nothing here talks to the network or mutates the forest. Every function
//! recomputes from scratch, so callers just re-run them after a refresh.

use crate::api::Category;
use crate::selection::Selection;

/// Leading marker used to indent picker options, repeated `depth * 2` times.
pub const OPTION_INDENT: &str = "·";

/// Flattened view of one category for selection lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub id: i64,
    pub name: String,
    /// Distance from a root (root = 0).
    pub depth: usize,
}

impl CategoryOption {
    /// Picker label: `depth * 2` dots, a space, then the name.
    pub fn label(&self) -> String {
        format!("{} {}", OPTION_INDENT.repeat(self.depth * 2), self.name)
    }
}

/// One line of the category tree panel.
#[derive(Debug, Clone, Copy)]
pub struct TreeRow<'a> {
    pub category: &'a Category,
    pub depth: usize,
    pub child_count: usize,
    pub post_count: usize,
}

/// One line of the checkbox tree in the post form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxRow {
    pub id: i64,
    pub name: String,
    pub depth: usize,
    pub checked: bool,
}

/// Pre-order walk: a node is visited before its children, siblings in input order.
fn walk<'a, F>(forest: &'a [Category], depth: usize, visit: &mut F)
where
    F: FnMut(&'a Category, usize),
{
    for node in forest {
        visit(node, depth);
        if !node.children_categories.is_empty() {
            walk(&node.children_categories, depth + 1, visit);
        }
    }
}

/// Flatten the forest into a depth-annotated option list.
///
/// Server order is preserved; nothing is re-sorted.
pub fn flatten(forest: &[Category]) -> Vec<CategoryOption> {
    let mut options = Vec::with_capacity(count_nodes(forest));
    walk(forest, 0, &mut |node, depth| {
        options.push(CategoryOption {
            id: node.id,
            name: node.name.clone(),
            depth,
        });
    });
    options
}

/// Total number of categories in the forest, at any depth.
pub fn count_nodes(forest: &[Category]) -> usize {
    forest
        .iter()
        .map(|node| 1 + count_nodes(&node.children_categories))
        .sum()
}

/// Options for the parent picker of the category form.
///
/// When editing category `editing`, its own option is removed so it cannot
/// be chosen as its own parent. Descendants are still offered.
pub fn parent_options(forest: &[Category], editing: Option<i64>) -> Vec<CategoryOption> {
    let mut options = flatten(forest);
    if let Some(id) = editing {
        options.retain(|option| option.id != id);
    }
    options
}

/// Display rows for the category tree panel, in pre-order.
pub fn tree_rows(forest: &[Category]) -> Vec<TreeRow<'_>> {
    let mut rows = Vec::new();
    walk(forest, 0, &mut |node, depth| {
        rows.push(TreeRow {
            category: node,
            depth,
            child_count: node.children_categories.len(),
            post_count: node.posts.len(),
        });
    });
    rows
}

/// Checkbox rows for the post form; `checked` mirrors `selected`.
pub fn checkbox_rows(forest: &[Category], selected: &Selection) -> Vec<CheckboxRow> {
    let mut rows = Vec::new();
    walk(forest, 0, &mut |node, depth| {
        rows.push(CheckboxRow {
            id: node.id,
            name: node.name.clone(),
            depth,
            checked: selected.contains(node.id),
        });
    });
    rows
}

/// Find a category anywhere in the forest.
pub fn find(forest: &[Category], id: i64) -> Option<&Category> {
    forest.iter().find_map(|node| {
        if node.id == id {
            Some(node)
        } else {
            find(&node.children_categories, id)
        }
    })
}

/// True if `candidate` sits somewhere below `ancestor` in the forest.
///
/// Used to warn when a category is about to be moved under its own
/// descendant. The move itself is not blocked.
pub fn is_descendant(forest: &[Category], ancestor: i64, candidate: i64) -> bool {
    find(forest, ancestor)
        .map(|node| find(&node.children_categories, candidate).is_some())
        .unwrap_or(false)
}
