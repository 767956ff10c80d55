//! Markup contract for the Tritius portal
//!
//! Everything fragile about the portal lives here: request paths, CSS
//! selectors for each logical field, and the fixed column layout of the
//! borrowings table. The selectors are parsed once at construction so
//! drift in the contract itself fails at startup, not mid-poll.

use scraper::Selector;

use crate::error::{Result, TritiusError};

/// Portal release the selector set was written against.
pub const SCHEMA_VERSION: u32 = 1;

/// Request paths, relative to the normalized base URL.
pub mod paths {
    /// Unauthenticated/authenticated probe and profile source
    pub const PERSONAL_DATA: &str = "profile/personal-data";
    /// Login form submission endpoint
    pub const LOGIN: &str = "process-login";
    /// Current borrowings table source
    pub const BORROWINGS: &str = "profile/borrowings/current";
    /// Page-wide renew-all submission endpoint
    pub const RENEW_ALL: &str = "profile/renew-all";
}

/// Column indices within one borrowings-table row.
pub mod columns {
    /// Due date cell
    pub const DUE_DATE: usize = 2;
    /// Title cell, title text nested inside an anchor
    pub const TITLE: usize = 4;
    /// Author cell
    pub const AUTHOR: usize = 5;
    /// Cell carrying the per-row renewal form (absent on non-renewable rows)
    pub const RENEWAL_FORM: usize = 7;
}

/// Parsed selector for every logical field the scraper reads.
#[derive(Debug, Clone)]
pub struct Markup {
    /// Login form shown on any page while unauthenticated
    pub login_form: Selector,
    /// Inline danger alert carrying a server-side rejection message
    pub danger_alert: Selector,
    /// Personal-data panel on the profile page
    pub personal_data: Selector,
    /// Navbar element carrying the registration-expiration date
    pub registration_expiration: Selector,
    /// Rows of the current-borrowings table
    pub borrowing_rows: Selector,
    /// Page-wide renew-all form, keyed by its action attribute
    pub renew_all_form: Selector,
    /// Cells within a borrowing row
    pub cell: Selector,
    /// Per-row renewal form inside its cell
    pub form: Selector,
    /// Renewal id input inside the per-row form
    pub renewal_id: Selector,
    /// Title anchor inside the title cell
    pub title_anchor: Selector,
    /// Named inputs inside a form
    pub named_input: Selector,
}

impl Markup {
    /// Parse the full selector schema.
    ///
    /// # Errors
    /// Returns `TritiusError::UnknownStructure` if any selector fails to
    /// parse, which means the contract itself is broken.
    pub fn new() -> Result<Self> {
        Ok(Self {
            login_form: parse("form.login-form")?,
            danger_alert: parse("div.flash-messages div.alert-danger span")?,
            personal_data: parse("#portlet-personal-data")?,
            registration_expiration: parse(
                "#navbar li.dropdown-user li.hidden-xs span.dropdown-text",
            )?,
            borrowing_rows: parse("#borrowings-portlet .portlet-content table tbody tr")?,
            renew_all_form: parse(&format!("form[action='/{}']", paths::RENEW_ALL))?,
            cell: parse("td")?,
            form: parse("form")?,
            renewal_id: parse("input[name='id']")?,
            title_anchor: parse("a")?,
            named_input: parse("input[name]")?,
        })
    }
}

fn parse(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        TritiusError::UnknownStructure(format!("invalid selector '{selector}': {e:?}"))
    })
}
