// Staff Provisioning API Core
//
// Backend for multi-location gym staff management. Account provisioning spans
// two independently-consistent stores (GoTrue identity provider + Postgres
// profiles), stitched together with explicit compensation instead of a
// distributed transaction.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
