//! Ballroom Match - partner and Pro-Am teacher matching for competitive ballroom dancers
//!
//! The scoring core (`core`) is pure and synchronous. The HTTP layer (`routes`) wraps it
//! together with the Postgres-backed profile directory (`services`).

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{score, MatchLimits, MatchLists, Matcher};
pub use crate::error::ApiError;
pub use crate::models::{Dancer, DanceStyleEntry, MatchMode, MatchResult, ScoredMatch};
