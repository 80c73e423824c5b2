//! Telegen HTTP presentation layer
//!
//! Serves the Prometheus scrape endpoint and a liveness probe, and hosts the
//! emission loop as a background task.

pub mod cli;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod tasks;

pub use cli::Cli;
pub use routes::create_router;
pub use state::AppState;
pub use tasks::spawn_emission_task;
