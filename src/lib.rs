//! Admin-side client for a real-estate listing API: typed property
//! model, per-kind form schema registry, multipart submission encoder,
//! and an in-memory store with the listing view's search/filter/
//! pagination rules.

pub mod api;
pub mod config;
pub mod forms;
pub mod models;
pub mod schema;
pub mod store;
pub mod units;
