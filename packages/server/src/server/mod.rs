// HTTP server layer. Glue only: handlers decode transport shapes and call
// domain activities.

pub mod app;
pub mod routes;

pub use app::{build_router, AppState};
