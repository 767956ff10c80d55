//! High-level Tritius scraper API
//!
//! Combines the HTTP client with the page parsers into the operations the
//! coordinator and the entity layer call: patron profile, current
//! borrowings and the renew-all action.

use tracing::debug;

use crate::client::{AuthorizedScope, TritiusClient};
use crate::error::Result;
use crate::markup::paths;
use crate::parser;
use crate::types::{Borrowing, UserProfile};

/// Main scraper API for a Tritius portal
///
/// All operations are asynchronous and run through the client's login
/// state machine, so any of them may transparently re-login when the
/// session cookie expired.
///
/// # Example
/// ```no_run
/// use tritius_core::{default_http_client, TritiusScraper};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = TritiusScraper::new(
///         "knihovna.example.cz",
///         "reader",
///         "password",
///         default_http_client()?,
///     )?;
///
///     let scope = scraper.authorized().await?;
///     let borrowings = scraper.get_borrowings().await?;
///     drop(scope);
///
///     println!("{} borrowings", borrowings.len());
///     Ok(())
/// }
/// ```
pub struct TritiusScraper {
    client: TritiusClient,
}

impl TritiusScraper {
    /// Create a scraper for one portal account.
    ///
    /// # Errors
    /// `TritiusError::InvalidUrl` when the base URL cannot be normalized.
    pub fn new(
        url: &str,
        username: &str,
        password: &str,
        http: reqwest::Client,
    ) -> Result<Self> {
        Ok(Self {
            client: TritiusClient::new(url, username, password, http)?,
        })
    }

    /// Create a scraper around a pre-configured client.
    ///
    /// Useful for tests and for custom timeouts.
    pub fn with_client(client: TritiusClient) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &TritiusClient {
        &self.client
    }

    /// Verify the session once and skip login checks while the guard
    /// lives. See [`TritiusClient::authorized`].
    pub async fn authorized(&self) -> Result<AuthorizedScope<'_>> {
        self.client.authorized().await
    }

    /// Fetch and parse the patron profile from the personal-data page.
    ///
    /// # Errors
    /// `TritiusError::UnknownStructure` when the personal-data panel is
    /// missing from the page.
    pub async fn get_user_profile(&self) -> Result<UserProfile> {
        let body = self.client.get(paths::PERSONAL_DATA).await?;
        parser::parse_user_profile(self.client.markup(), &body)
    }

    /// Fetch and parse the current borrowings.
    ///
    /// The list is sorted ascending by (due date, title); the first
    /// element carries the nearest due date.
    pub async fn get_borrowings(&self) -> Result<Vec<Borrowing>> {
        let body = self.get_borrowings_page().await?;
        parser::parse_borrowings(self.client.markup(), &body)
    }

    /// Renew every renewable borrowing through the page-wide form.
    ///
    /// Returns `false` without issuing a POST when the page carries no
    /// renew-all form, there is nothing to renew. Returns `true` after a
    /// successful submission.
    ///
    /// # Errors
    /// `TritiusError::Application` when the portal answers the submission
    /// with an inline danger alert.
    pub async fn renew_all(&self) -> Result<bool> {
        let body = self.get_borrowings_page().await?;
        let Some(inputs) = parser::renew_all_form_inputs(self.client.markup(), &body) else {
            debug!("nothing to renew");
            return Ok(false);
        };

        self.client.post(paths::RENEW_ALL, &inputs).await?;
        Ok(true)
    }

    /// Fetch the raw borrowings page shared by `get_borrowings` and
    /// `renew_all`.
    async fn get_borrowings_page(&self) -> Result<String> {
        self.client.get(paths::BORROWINGS).await
    }
}
