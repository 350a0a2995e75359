//! Application lifecycle
//!
//! Wires the record store, the public base URL and the middleware stack
//! into an actix-web server.

pub mod server;

pub use server::run_server;
