//! Goal/Todo relation sync for a hosted document store
//!
//! This library keeps two remote collections — Goals and Todos — linked
//! both ways through their relation properties, without ever discarding
//! links that already exist. The remote store replaces whole property
//! values on write, so every link is a fetch-merge-conditional-patch
//! sequence.
//!
//! # Architecture
//!
//! The crate follows a 3-layer architecture:
//! - **CLI Layer**: the `goal-sync` binary - import, repair, summary, and
//!   schema subcommands
//! - **Domain Layer**: `reconcile` and `import` modules - the relation
//!   merge core and the batch driver
//! - **Remote-access Layer**: `store` trait plus the `notion` module -
//!   HTTP accessor with rate limiting, retry/backoff, and pagination
//!
//! # Example
//!
//! ```no_run
//! use goal_sync::{LinkOptions, NotionConfig, NotionStore, Reconciler};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = NotionStore::new(NotionConfig::new("secret-token", "goals-db", "todos-db"))?;
//! let reconciler = Reconciler::new(&store);
//! reconciler.link("goal-page-id", "todo-page-id", &LinkOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod import;
pub mod model;
pub mod notion;
pub mod reconcile;
pub mod report;
pub mod store;

// Re-export commonly used types
pub use config::BatchFile;
pub use error::{Side, SyncError, SyncResult};
pub use import::{BatchSummary, GoalMap, GoalSetup, ImportDriver, ImportItem, LinkFailure};
pub use model::{
    Document, GoalDraft, GoalPriority, GoalStatus, ProgressImpact, TodoDraft, TodoPriority,
    TodoStatus,
};
pub use notion::{NotionConfig, NotionStore};
pub use reconcile::{LinkOptions, LinkOutcome, Reconciler, RepairReport};
pub use store::{Collection, PageStore, PropertyMap};
