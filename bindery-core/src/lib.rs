//! # Bindery Core
//!
//! Domain rules and persistence for read lists: named, ordered collections of
//! books drawn from one or more libraries.
//!
//! ## Overview
//!
//! - **Scopes**: every caller is either unrestricted or limited to a set of
//!   libraries; [`domain::resolve_library_filter`] combines that ceiling with
//!   an explicit library filter.
//! - **Read lists**: names are unique, member order defines position, and a
//!   book appears at most once per list.
//! - **Queries**: [`application::ReadListService`] pages read lists by name
//!   and members by position, hiding anything outside the caller's scope.
//! - **Storage**: repository ports in [`database::ports`] with an in-memory
//!   adapter and a PostgreSQL adapter (`database` feature).
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bindery_core::application::{CreateReadListCommand, ReadListService};
//! use bindery_core::database::InMemoryCatalog;
//! use bindery_core::domain::Principal;
//! use bindery_model::UserId;
//!
//! async fn create(catalog: InMemoryCatalog) -> bindery_core::error::Result<()> {
//!     let catalog = Arc::new(catalog);
//!     let service = ReadListService::new(catalog.clone(), catalog);
//!     let admin = Principal::admin(UserId::new());
//!
//!     service
//!         .create_read_list(
//!             &admin,
//!             CreateReadListCommand {
//!                 name: "Saga Arc".to_string(),
//!                 ..Default::default()
//!             },
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod application;

/// Repository ports and storage adapters
pub mod database;

pub mod domain;

/// Error types shared by every layer
pub mod error;

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use bindery_model as model;
pub use error::{CatalogError, Result};
