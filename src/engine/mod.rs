//! Hierarchical incremental pagination engine.
//!
//! The engine pages through a tree of containers. Each container is a
//! [`PaginationNode`] that walks its own [`Cursor`] and shares a row quota
//! between the children its [`Template`] builds. Children that are containers
//! themselves receive whatever quota is left and paginate recursively.
//!
//! - `cursor`: cached random access over a lazily pulled item stream
//! - `state`: quotas, resume tokens and the three-valued completion status
//! - `component`: what the engine needs from components and templates
//! - `arena`: the children a node rendered on its last pass
//! - `node` / `repaginate`: one container and its pass
//! - `paginator`: page navigation with a stack of visited pages
//! - `guard` / `handle`: serialized mutations for shared use between tasks
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rowpager::engine::{PaginationNode, Paginator, TextTemplate};
//!
//! # tokio_test::block_on(async {
//! let items: Vec<String> = (1..=25).map(|i| i.to_string()).collect();
//! let root = PaginationNode::from_items(items).with_template(Arc::new(TextTemplate));
//! let mut paginator = Paginator::new(root, 10);
//!
//! paginator.jump_to_first_page().await.unwrap();
//! paginator.next_page().await.unwrap();
//! assert_eq!(paginator.current().unwrap().current_index, 10);
//! # });
//! ```

pub mod arena;
pub mod component;
pub mod cursor;
pub mod guard;
pub mod handle;
pub mod node;
pub mod paginator;
mod repaginate;
pub mod state;


pub use arena::{ChildArena, ChildSlot};
pub use component::{AttachHooks, Component, NodeView, Paginatable, Template, TextRow, TextTemplate};
pub use cursor::{Cursor, ItemStream};
pub use guard::MutationGuard;
pub use handle::{Mutation, Navigation, PagerHandle, PagerState};
pub use node::{PaginationNode, Panel};
pub use paginator::{PageBoundary, PageStack, Paginator};
pub use state::{Done, PageOutcome, PaginationState, ResumeToken, RowQuota};
