//! Core note-handling layer
//!
//! Metric data structures, the frontmatter merger and the daily note locator.

pub mod data;
pub mod frontmatter;
pub mod note;
