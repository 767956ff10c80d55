//! HTML extraction helpers and page parsers for Tritius pages
//!
//! This module contains the pure functions between raw HTML and the data
//! model:
//! - shared helpers: form input maps, trimmed text, portal dates
//! - `profile`: parse the personal-data page
//! - `borrowings`: parse the current-borrowings table and renew-all form
//!
//! Parsers fail loudly with `UnknownStructure` when a required element is
//! missing instead of propagating nulls.

pub mod borrowings;
pub mod profile;

use std::collections::HashMap;

use chrono::NaiveDate;
use scraper::{ElementRef, Html};

use crate::markup::Markup;

// Re-export main parsing functions
pub use borrowings::{parse_borrowings, renew_all_form_inputs};
pub use profile::parse_user_profile;

/// Textual date format used on every portal page.
pub const PORTAL_DATE_FORMAT: &str = "%d.%m.%Y";

/// Collect `name -> value` pairs from every named input under `element`.
///
/// Inputs without a value attribute are ignored, matching what the portal
/// expects back on form resubmission.
pub fn form_inputs(markup: &Markup, element: ElementRef) -> HashMap<String, String> {
    element
        .select(&markup.named_input)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            let value = input.value().attr("value")?;
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Text content of an element with surrounding whitespace removed.
pub fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parse a `dd.mm.yyyy` portal date.
pub fn parse_portal_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), PORTAL_DATE_FORMAT).ok()
}

/// Render a date back into the portal's `dd.mm.yyyy` form for display.
pub fn format_portal_date(date: NaiveDate) -> String {
    date.format(PORTAL_DATE_FORMAT).to_string()
}

/// Find the first `dd.mm.yyyy` date anywhere inside free-form text.
pub fn find_portal_date(text: &str) -> Option<NaiveDate> {
    let re = regex_lite::Regex::new(r"\d{2}\.\d{2}\.\d{4}").ok()?;
    re.find(text).and_then(|m| parse_portal_date(m.as_str()))
}

/// Extract the login form's input pairs if the page shows one.
///
/// Returns `None` on an authenticated page. The map includes the hidden
/// CSRF token input the portal expects back on the login POST.
pub fn login_form_inputs(markup: &Markup, html: &str) -> Option<HashMap<String, String>> {
    let document = Html::parse_document(html);
    let form = document.select(&markup.login_form).next()?;
    Some(form_inputs(markup, form))
}

/// Extract the text of an inline danger alert, if the page shows one.
pub fn danger_alert(markup: &Markup, html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document.select(&markup.danger_alert).next().map(text_of)
}
