//! Tritius Scraper Core Library
//!
//! This crate scrapes a patron's borrowing status from a Tritius
//! library-management portal over authenticated HTML scraping.
//!
//! # Features
//! - Login state machine that survives silent session-cookie expiry
//! - Patron profile and current-borrowings scraping
//! - Renew-all action with portal-side rejection surfaced as errors
//! - Polling coordinator producing immutable snapshots for entities

pub mod client;
pub mod coordinator;
pub mod error;
pub mod markup;
pub mod parser;
pub mod scraper;
pub mod types;

// Re-export main types for convenience
pub use client::{default_http_client, AuthorizedScope, ClientConfig, TritiusClient};
pub use coordinator::{TritiusCoordinator, UpdateError, UPDATE_INTERVAL};
pub use error::{Result, TritiusError};
pub use scraper::TritiusScraper;
pub use types::{Borrowing, Snapshot, UserProfile, ALERT_WINDOW_DAYS};
