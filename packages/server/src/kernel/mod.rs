//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod object_store;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{GoTrueAdapter, PgProfileStore, ServerDeps};
pub use object_store::HttpObjectStore;
pub use test_dependencies::{
    MockIdentityProvider, MockObjectStore, MockProfileStore, TestDependencies,
};
pub use traits::*;
