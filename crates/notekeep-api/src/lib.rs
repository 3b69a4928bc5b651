//! # notekeep-api
//!
//! HTTP surface for notekeep: the notes service, identity extraction,
//! error mapping, and the axum router with its middleware stack.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ServerConfig, StoreBackend};
pub use error::ApiError;
pub use routes::{build_router, RouterConfig};
pub use services::NotesService;
pub use state::AppState;
