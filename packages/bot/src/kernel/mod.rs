//! Kernel module - infrastructure and dependencies.

pub mod deps;
pub mod scheduled_tasks;
pub mod store;
pub mod test_dependencies;
pub mod traits;

pub use deps::{BotDeps, TwitterAdapter};
pub use store::PostgresWordStore;
pub use test_dependencies::{MemoryWordStore, MockPublisher, StoreOp};
pub use traits::*;
