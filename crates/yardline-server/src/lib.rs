//! Yardline Server — HTTP surface over the compliance, tenancy and
//! inventory services.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
