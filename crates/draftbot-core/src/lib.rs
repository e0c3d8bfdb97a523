//! Draftbot core — shared types, configuration, and context loading.

pub mod config;
pub mod context;
pub mod types;
pub mod utils;
