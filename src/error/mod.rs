//! Error handling module for rowpager.
//!
//! This module provides the crate-wide error type with:
//! - Usage errors raised synchronously by navigation (negative page index)
//! - Content errors propagated unchanged from templates and item streams
//! - Application-specific errors for configuration and interactive commands
//!
//! Stale data sources have no variant here: the pagination engine recovers
//! from them by falling back to the last known-good page.
//!
//! # Example
//!
//! ```rust
//! use rowpager::error::{PagerError, PaginationError, Result};
//!
//! fn check_page(n: i64) -> Result<()> {
//!     if n < 0 {
//!         return Err(PaginationError::NegativePageIndex(n).into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(matches!(check_page(-1), Err(PagerError::Pagination(_))));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{CommandError, ConfigError, PagerError, PaginationError, Result};
