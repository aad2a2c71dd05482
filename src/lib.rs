//! Multilingual restaurant menu: translation resolution, ordered projection
//! for the storefront, and an admin API for editing and reordering.

pub mod admin;
pub mod config;
pub mod error;
pub mod i18n;
pub mod menu;
pub mod ordering;
pub mod projector;
pub mod refresh;
pub mod resolve;
pub mod retry;
pub mod scheduler;
pub mod security;
pub mod seed;
pub mod server;
pub mod store;
