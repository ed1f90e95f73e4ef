// Library entry so integration tests can reference internal modules.
// Re-exports the same modules used by the binary (`main.rs`).
pub mod commands;
pub mod config;
pub mod handler;
pub mod model;
pub mod raid;

pub use model::AppState;
