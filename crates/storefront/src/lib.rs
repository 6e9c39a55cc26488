//! Savory storefront, as a library.
//!
//! The binary in `main.rs` only bootstraps; everything it wires together
//! lives here so the CLI can reuse the repositories and the test suites
//! can reach the handlers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
