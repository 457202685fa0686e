//! Utility functions for common operations.
//!
//! - **HTML flattening**: turning the server's rich-text article payload
//!   into plain text lines for the detail pane
//! - **Text processing**: Unicode-aware truncation for list rows

mod text;

pub use text::{html_to_text, truncate_to_width};
