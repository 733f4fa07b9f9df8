//! Workdesk board API server library.
//!
//! [`app::build_router`] assembles the service; the binary adds configuration
//! loading, database setup, and graceful shutdown around it.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
