//! Terminal admin client for a hierarchical category / post REST API.
//!
//! - `api` - HTTP client and wire types
//! - `tree` - category forest projections (flatten, tree rows, checkbox rows)
//! - `selection` - category multi-select state for posts
//! - `forms` - editor drafts and validation
//! - `ops` - write-then-refresh background jobs
//! - `app` - central UI state and job events
//! - `ui` - ratatui front end
//! - `config` - TOML configuration

pub mod api;
pub mod app;
pub mod config;
pub mod forms;
pub mod ops;
pub mod selection;
pub mod tree;
pub mod ui;
pub mod util;
