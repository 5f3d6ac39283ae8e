//! Business logic layer

pub mod view_service;

pub use view_service::{URL_ID_NOT_FOUND, UrlStats, ViewOutcome, ViewService};
