//! BeansHub - Application Core
//!
//! The client-side store, reducer, and provider bridges for a small coffee
//! roastery operations app. Persistence, querying, and real-time sync are
//! delegated to an external document store; identity to an external auth
//! provider. This crate owns the in-session state and the write paths that
//! keep it consistent with those providers.

pub mod bridges;
pub mod config;
pub mod error;
pub mod providers;
pub mod services;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use store::{Action, AppState, Store};
