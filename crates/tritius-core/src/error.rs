//! Error types for the Tritius scraper
//!
//! This module defines all error types used throughout the library.
//! The coordinator decides retry policy from the variant: communication
//! failures are transient, authentication failures require new credentials,
//! structure failures require a library update.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for Tritius scraper operations
#[derive(Error, Debug)]
pub enum TritiusError {
    /// Network failure, timeout or unexpected HTTP status (transient)
    #[error("Error communicating with the portal: {0}")]
    Communication(String),

    /// Credentials rejected or re-login did not stick
    #[error("Invalid credentials")]
    Authentication,

    /// Portal markup no longer matches the expected structure
    #[error("Unknown page structure: {0}")]
    UnknownStructure(String),

    /// Portal rejected a business action (inline danger alert)
    #[error("Portal rejected the request: {0}")]
    Application(String),

    /// Base URL could not be normalized
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Catch-all for failures outside the taxonomy, never discarded
    #[error("Unexpected client error: {0}")]
    Unexpected(String),
}

impl TritiusError {
    /// Whether a retry on the next poll cycle can plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, TritiusError::Communication(_))
    }
}

/// Serialize as the display string so errors survive state publication
impl Serialize for TritiusError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for Tritius scraper operations
pub type Result<T> = std::result::Result<T, TritiusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_communication() {
        let error = TritiusError::Communication("connection refused".to_string());
        assert_eq!(
            error.to_string(),
            "Error communicating with the portal: connection refused"
        );
    }

    #[test]
    fn test_error_display_authentication() {
        let error = TritiusError::Authentication;
        assert_eq!(error.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_error_display_unknown_structure() {
        let error = TritiusError::UnknownStructure("#portlet-personal-data".to_string());
        assert_eq!(
            error.to_string(),
            "Unknown page structure: #portlet-personal-data"
        );
    }

    #[test]
    fn test_error_display_application() {
        let error = TritiusError::Application("Renewal limit reached".to_string());
        assert_eq!(
            error.to_string(),
            "Portal rejected the request: Renewal limit reached"
        );
    }

    #[test]
    fn test_error_display_invalid_url() {
        let error = TritiusError::InvalidUrl("not a url".to_string());
        assert_eq!(error.to_string(), "Invalid URL: not a url");
    }

    #[test]
    fn test_only_communication_is_transient() {
        assert!(TritiusError::Communication("timeout".to_string()).is_transient());
        assert!(!TritiusError::Authentication.is_transient());
        assert!(!TritiusError::UnknownStructure("x".to_string()).is_transient());
        assert!(!TritiusError::Application("x".to_string()).is_transient());
    }

    #[test]
    fn test_error_serialize() {
        let error = TritiusError::Authentication;
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, "\"Invalid credentials\"");
    }
}
