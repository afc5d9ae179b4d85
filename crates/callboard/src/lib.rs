//! Callboard server library.
//!
//! The binary in `main.rs` wires these pieces together: configuration
//! loading, the axum web layer, and the embedded demo show used when no
//! show file is configured.

pub mod config;
pub mod web;

/// Demo show served when no show file is given. Exercises chains,
/// continuations, gaps, and cross-track signals.
pub const DEMO_SHOW_JSON: &str = include_str!("../static/show.json");
