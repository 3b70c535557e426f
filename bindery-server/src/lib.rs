//! # Bindery Server
//!
//! HTTP front end for Bindery read lists.
//!
//! Callers authenticate with a bearer API key. Each key maps to a user, an
//! admin flag, and optionally a set of libraries; everything the server
//! returns is narrowed to those libraries. Read lists live in PostgreSQL
//! when `DATABASE_URL` is set and in memory otherwise.

pub mod api;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::create_app;
