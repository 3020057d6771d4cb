//! Cutover Core: store clients, identity-domain data model, and configuration.

pub mod config;
pub mod error;
pub mod models;
pub mod store;
