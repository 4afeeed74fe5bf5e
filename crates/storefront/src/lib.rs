//! Grocer storefront library.
//!
//! The binary in `main.rs` and the `grocer-cli` tool both build on this
//! crate; the integration tests drive its services against a real database.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
