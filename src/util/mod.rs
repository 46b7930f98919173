//! Text helpers for drawing server-supplied strings in the terminal.

mod text;

pub use text::{single_line, truncate_to_width};
