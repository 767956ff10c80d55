//! HTTP transport and session state machine for the Tritius portal
//!
//! The transport issues one outbound call per request with a fixed
//! timeout and no internal retries, retry policy belongs to the
//! coordinator. On top of it sits the login state machine: the portal's
//! session cookie can silently expire between polls, so every plain `get`
//! is prepared to discover a login form, resubmit credentials and verify
//! the login stuck. Batches that have just verified the session enter an
//! authorized scope to skip the per-fetch check.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::{Method, StatusCode};
use tracing::debug;
use url::Url;

use crate::error::{Result, TritiusError};
use crate::markup::{paths, Markup};
use crate::parser;

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the Tritius HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout (default: 10 seconds)
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Build an HTTP client suitable for the portal.
///
/// The portal session is cookie-based, so the cookie store is enabled.
/// Callers supplying their own client must do the same or every fetch
/// will land on the login form again.
///
/// # Errors
/// Returns an error if the HTTP client cannot be created.
pub fn default_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .cookie_store(true)
        .build()
        .map_err(|e| TritiusError::Unexpected(format!("cannot build HTTP client: {e}")))
}

/// Marker held while a batch of calls may skip login checking.
///
/// Created by [`TritiusClient::authorized`] after one verified login.
/// Dropping the guard clears the flag on every exit path, success, error
/// or a cancelled future alike, so a later unrelated call cannot skip the
/// check against a session that may have expired since.
#[must_use = "the authorized scope ends as soon as the guard is dropped"]
pub struct AuthorizedScope<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AuthorizedScope<'a> {
    fn new(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        debug!("entered authorized scope");
        Self { flag }
    }
}

impl Drop for AuthorizedScope<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
        debug!("left authorized scope");
    }
}

/// HTTP client for a Tritius portal with login-state handling
///
/// Owns the normalized base URL and the credentials; the underlying
/// `reqwest::Client` is supplied by the caller and shared. One client
/// serves one sequential fetch cycle at a time, the authorized-scope flag
/// is not meant to coordinate concurrent cycles.
pub struct TritiusClient {
    base: Url,
    username: String,
    password: String,
    http: reqwest::Client,
    markup: Markup,
    request_timeout: Duration,
    authorized: AtomicBool,
}

impl TritiusClient {
    /// Create a client with the default configuration.
    ///
    /// # Arguments
    /// * `url` - Portal base URL; a missing scheme defaults to `https`
    ///   and a trailing slash is enforced
    /// * `username` / `password` - Patron credentials
    /// * `http` - Shared HTTP client, must keep cookies
    ///
    /// # Errors
    /// `TritiusError::InvalidUrl` when the base URL cannot be normalized.
    pub fn new(url: &str, username: &str, password: &str, http: reqwest::Client) -> Result<Self> {
        Self::with_config(url, username, password, http, ClientConfig::default())
    }

    /// Create a client with a custom configuration.
    pub fn with_config(
        url: &str,
        username: &str,
        password: &str,
        http: reqwest::Client,
        config: ClientConfig,
    ) -> Result<Self> {
        Ok(Self {
            base: normalize_base_url(url)?,
            username: username.to_string(),
            password: password.to_string(),
            http,
            markup: Markup::new()?,
            request_timeout: config.request_timeout,
            authorized: AtomicBool::new(false),
        })
    }

    /// The normalized base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Selector schema shared with the page parsers.
    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    /// Issue one HTTP call and return the response body.
    ///
    /// No retries and no login handling here, callers decide both.
    ///
    /// # Errors
    /// - `TritiusError::Authentication` on status 401/403, regardless of
    ///   the body
    /// - `TritiusError::Communication` on timeout, network failure or any
    ///   other non-2xx status
    /// - `TritiusError::Unexpected` for failures outside the taxonomy
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        form: Option<&HashMap<String, String>>,
    ) -> Result<String> {
        let url = self
            .base
            .join(path)
            .map_err(|e| TritiusError::InvalidUrl(format!("{path}: {e}")))?;
        debug!(%method, %url, "calling portal");

        let mut builder = self.http.request(method, url).timeout(self.request_timeout);
        if let Some(form) = form {
            builder = builder.form(form);
        }

        let response = builder.send().await.map_err(classify_transport_error)?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TritiusError::Authentication);
        }
        if !status.is_success() {
            return Err(TritiusError::Communication(format!(
                "unexpected status {status}"
            )));
        }

        response.text().await.map_err(classify_transport_error)
    }

    /// Fetch a page, logging in first when the portal asks for it.
    ///
    /// Outside an authorized scope the body is checked for the login
    /// form. If present, its input pairs (CSRF token included) are
    /// resubmitted with the credentials injected, the page is fetched
    /// once more, and a login form that survives the round trip is an
    /// authentication failure. Inside an authorized scope the check is
    /// skipped entirely, the caller has asserted the session is fresh.
    pub async fn get(&self, path: &str) -> Result<String> {
        let body = self.request(Method::GET, path, None).await?;

        if self.authorized.load(Ordering::SeqCst) {
            debug!("authorized scope active, skipping login check");
            return Ok(body);
        }

        let Some(mut inputs) = parser::login_form_inputs(&self.markup, &body) else {
            return Ok(body);
        };

        debug!("login form found, submitting credentials");
        inputs.insert("username".to_string(), self.username.clone());
        inputs.insert("password".to_string(), self.password.clone());
        // The danger-alert check is skipped for the login POST itself,
        // login failure shows up as the form reappearing instead.
        self.request(Method::POST, paths::LOGIN, Some(&inputs)).await?;

        debug!("retrieving page again");
        let body = self.request(Method::GET, path, None).await?;
        if parser::login_form_inputs(&self.markup, &body).is_some() {
            debug!("login form still present after submit");
            return Err(TritiusError::Authentication);
        }

        Ok(body)
    }

    /// Submit a non-login form and check the response for rejection.
    ///
    /// # Errors
    /// `TritiusError::Application` with the alert text when the portal
    /// answers with an inline danger alert.
    pub async fn post(&self, path: &str, form: &HashMap<String, String>) -> Result<String> {
        let body = self.request(Method::POST, path, Some(form)).await?;
        if let Some(alert) = parser::danger_alert(&self.markup, &body) {
            return Err(TritiusError::Application(alert));
        }
        Ok(body)
    }

    /// Verify the session by fetching the personal-data page.
    ///
    /// Logs in on the way when needed; the body is discarded.
    pub async fn ensure_logged_in(&self) -> Result<()> {
        debug!("ensuring logged in");
        self.get(paths::PERSONAL_DATA).await.map(|_| ())
    }

    /// Verify the session once, then skip login checks while the
    /// returned guard lives.
    pub async fn authorized(&self) -> Result<AuthorizedScope<'_>> {
        self.ensure_logged_in().await?;
        Ok(AuthorizedScope::new(&self.authorized))
    }
}

/// Map a transport-level failure into the error taxonomy.
fn classify_transport_error(error: reqwest::Error) -> TritiusError {
    if error.is_timeout() {
        TritiusError::Communication(format!("timeout fetching information: {error}"))
    } else if error.is_connect() || error.is_request() || error.is_body() || error.is_decode() {
        TritiusError::Communication(format!("error fetching information: {error}"))
    } else {
        TritiusError::Unexpected(error.to_string())
    }
}

/// Normalize a portal base URL: default the scheme to `https`, keep host
/// and path, enforce a trailing slash so relative paths resolve under it.
fn normalize_base_url(url: &str) -> Result<Url> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(TritiusError::InvalidUrl("empty base URL".to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let mut base =
        Url::parse(&with_scheme).map_err(|e| TritiusError::InvalidUrl(format!("{url}: {e}")))?;
    if base.cannot_be_a_base() {
        return Err(TritiusError::InvalidUrl(url.to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults_scheme_to_https() {
        let base = normalize_base_url("knihovna.example.cz").unwrap();
        assert_eq!(base.as_str(), "https://knihovna.example.cz/");
    }

    #[test]
    fn test_normalize_keeps_explicit_scheme() {
        let base = normalize_base_url("http://knihovna.example.cz").unwrap();
        assert_eq!(base.as_str(), "http://knihovna.example.cz/");
    }

    #[test]
    fn test_normalize_enforces_trailing_slash_on_path() {
        let base = normalize_base_url("https://knihovna.example.cz/opac").unwrap();
        assert_eq!(base.as_str(), "https://knihovna.example.cz/opac/");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_base_url(""),
            Err(TritiusError::InvalidUrl(_))
        ));
        assert!(matches!(
            normalize_base_url("https://"),
            Err(TritiusError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_paths_resolve_under_base() {
        let base = normalize_base_url("knihovna.example.cz/opac").unwrap();
        let url = base.join(paths::PERSONAL_DATA).unwrap();
        assert_eq!(
            url.as_str(),
            "https://knihovna.example.cz/opac/profile/personal-data"
        );
    }

    #[test]
    fn test_client_config_default_timeout() {
        assert_eq!(
            ClientConfig::default().request_timeout,
            Duration::from_secs(10)
        );
    }

    #[test]
    fn test_client_creation() {
        let http = default_http_client().unwrap();
        let client = TritiusClient::new("knihovna.example.cz", "user", "pass", http);
        assert!(client.is_ok());
    }

    #[test]
    fn test_authorized_scope_clears_flag_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _scope = AuthorizedScope::new(&flag);
            assert!(flag.load(Ordering::SeqCst));
        }
        assert!(!flag.load(Ordering::SeqCst));
    }
}
