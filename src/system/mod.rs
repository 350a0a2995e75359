//! System-level modules
//!
//! Process-wide concerns that sit outside the request path:
//! - Logging initialization (console + append-only access log)

pub mod logging;
