//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background job event processing
//! - `render` - Layout and overlay dispatch
//! - `categories` - Category tree panel
//! - `posts` - Post table panel
//! - `forms` - Category and post editor panels
//! - `status` - Status bar widget

mod categories;
mod events;
mod forms;
mod input;
mod loop_runner;
mod posts;
mod render;
mod status;

pub use events::handle_app_event;
pub use loop_runner::{run, Action};
