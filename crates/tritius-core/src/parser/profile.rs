//! Personal-data page parser
//!
//! Extracts the patron profile from the authenticated profile page.

use scraper::Html;

use crate::error::{Result, TritiusError};
use crate::markup::Markup;
use crate::types::UserProfile;

use super::{find_portal_date, form_inputs, text_of};

/// Parse the patron profile from the personal-data page.
///
/// The reader number and names come from the panel's form input values;
/// missing inputs default to empty strings so entity rendering stays
/// stable. The registration expiration is read from a navbar element and
/// is optional, not every account has one.
///
/// # Errors
/// `TritiusError::UnknownStructure` when the personal-data panel is
/// missing, which means the portal markup changed (or an authorized-scope
/// caller trusted a session that had in fact expired).
pub fn parse_user_profile(markup: &Markup, html: &str) -> Result<UserProfile> {
    let document = Html::parse_document(html);

    let panel = document.select(&markup.personal_data).next().ok_or_else(|| {
        TritiusError::UnknownStructure("personal-data panel not found".to_string())
    })?;
    let inputs = form_inputs(markup, panel);

    let registration_expiration = document
        .select(&markup.registration_expiration)
        .next()
        .and_then(|element| find_portal_date(&text_of(element)));

    Ok(UserProfile {
        reader_id: inputs.get("values[readerNumber]").cloned().unwrap_or_default(),
        first_name: inputs.get("values[firstname]").cloned().unwrap_or_default(),
        last_name: inputs.get("values[lastname]").cloned().unwrap_or_default(),
        registration_expiration,
    })
}
