//! Viewcounter - URL view counter service
//!
//! Counts page views per URL while suppressing repeat views from the same
//! client within a cooldown window.
//!
//! # Architecture
//! - `storage`: `ViewStore` trait, SeaORM and in-memory backends
//! - `services`: view counting business logic
//! - `api`: HTTP handlers and middleware
//! - `config`: configuration loading (TOML + environment)
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging setup
//! - `utils`: URL normalization, client identification

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
