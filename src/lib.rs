pub mod config;
pub mod connect_info;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod poll;
pub mod results;
pub mod routes;
pub mod store;
pub mod telemetry;
pub mod vote;

pub use error::{PollError, PollResult, StoreError};
pub use handlers::AppState;
pub use store::{EntityStore, MemoryStore, PgStore};
