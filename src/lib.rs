//! rowpager Library
//!
//! This library provides a hierarchical, incremental pagination engine and the
//! terminal pager built on it. The engine splits a lazily pulled, possibly
//! unbounded stream of items into pages of at most N rows, where an item may
//! itself be a container whose rows count against the same page budget.
//!
//! # Modules
//!
//! - `engine`: Cursors, pagination nodes, the repagination pass and page navigation
//! - `source`: JSON and text inputs as item streams
//! - `formatter`: Page rendering for the terminal
//! - `config`: Configuration management
//! - `cli`: Command-line interface and argument parsing
//! - `repl`: Interactive pager
//! - `error`: Error types and handling
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rowpager::engine::{PaginationNode, Paginator};
//! use rowpager::source::JsonTemplate;
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let items = vec![json!("intro"), json!({"title": "Chapter", "items": ["a", "b", "c"]})];
//! let root = PaginationNode::from_items(items).with_template(Arc::new(JsonTemplate));
//! let mut paginator = Paginator::new(root, 3);
//!
//! paginator.jump_to_first_page().await?;
//! assert_eq!(paginator.current().map(|page| page.rows_displayed), Some(3));
//! # Ok::<(), rowpager::PagerError>(())
//! # });
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod repl;
pub mod source;

// Re-export commonly used types
pub use config::Config;
pub use engine::{PagerHandle, PaginationNode, Paginator};
pub use error::{PagerError, Result};
pub use formatter::Formatter;
pub use repl::{PagerSession, ReplEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
