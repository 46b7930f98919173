//! REST API access for categories and posts.
//!
//! - `client` - `ApiClient` issuing list/create/update/delete requests
//! - `types` - wire models and request payloads

mod client;
mod types;

pub use client::{ApiClient, ApiError, DEFAULT_API_BASE_URL};
pub use types::{
    Category, CategoryPayload, CategoryRef, DeleteResponse, ListResponse, PostPayload,
    PostSummary,
};
