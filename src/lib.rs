//! Marketplace persistence core.
//!
//! This crate owns the data model for a small marketplace — categories,
//! products, payment methods, purchase orders with denormalized line items —
//! together with the unique URL-slug generator that runs when a product is
//! first persisted. There is no serving layer here: embedding applications
//! bring their own transport and talk to the [`services`] module.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod services;
pub mod slug;
pub mod validation;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use errors::ServiceError;
pub use services::AppServices;

/// Composition root shared by embedding applications and tests.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: AppServices,
}
