//! System-level modules
//!
//! Process-wide setup that is not tied to request handling.

pub mod logging;
