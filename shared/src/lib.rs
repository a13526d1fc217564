//! Shared types and models for BeansHub
//!
//! This crate contains the domain entities, validation helpers, and
//! derived-view computations shared between the application core and the
//! WASM bindings driving the UI.

pub mod analytics;
pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
