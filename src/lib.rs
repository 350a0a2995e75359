//! linkstat - a small URL shortener with per-click statistics
//!
//! Clients submit a long URL and receive a short code that redirects to it.
//! Every redirect appends a click (time, referrer, coarse geo) to the link's
//! log, which the statistics endpoints expose.
//!
//! # Architecture
//! - `storage`: in-memory record store, lazy expiry, injectable clock
//! - `utils`: short code generation and URL / short code validation
//! - `api`: actix-web handlers and the access log middleware
//! - `config`: static configuration (TOML file + environment)
//! - `system`: logging initialization
//! - `runtime`: server bootstrap
//! - `cli`: command-line definitions

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod storage;
pub mod system;
pub mod utils;
