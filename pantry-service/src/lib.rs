//! pantry-service: identifies fridge ingredients from photos, generates
//! recipes from ingredient lists and serves recent recipe history.
//!
//! Every request is forwarded to a hosted chat-completion API and the
//! results are written to a Supabase table.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
