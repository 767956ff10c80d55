//! Borrowings page parser
//!
//! Extracts the current-borrowings table and the page-wide renew-all form.

use std::collections::HashMap;

use scraper::{ElementRef, Html};
use tracing::debug;

use crate::error::{Result, TritiusError};
use crate::markup::{columns, Markup};
use crate::types::{sort_borrowings, Borrowing};

use super::{form_inputs, parse_portal_date, text_of};

/// Parse the current borrowings from the borrowings page.
///
/// Rows without a renewal form in the expected column are skipped
/// entirely; the portal renders such rows for items that cannot be renewed
/// and they carry no id. The result is sorted ascending by
/// (due date, title), so the first element is the nearest due date.
///
/// # Errors
/// `TritiusError::UnknownStructure` when a row that does carry a renewal
/// form is missing its id input, its title anchor, or a parseable due
/// date. Those mean the markup drifted, not that the row is optional.
pub fn parse_borrowings(markup: &Markup, html: &str) -> Result<Vec<Borrowing>> {
    let document = Html::parse_document(html);

    let mut borrowings = Vec::new();
    for row in document.select(&markup.borrowing_rows) {
        if let Some(borrowing) = parse_borrowing_row(markup, row)? {
            borrowings.push(borrowing);
        }
    }

    sort_borrowings(&mut borrowings);
    Ok(borrowings)
}

/// Parse one table row, `Ok(None)` when the row is not renewable.
fn parse_borrowing_row(markup: &Markup, row: ElementRef) -> Result<Option<Borrowing>> {
    let cells: Vec<ElementRef> = row.select(&markup.cell).collect();
    if cells.len() <= columns::RENEWAL_FORM {
        debug!(cells = cells.len(), "skipping row with too few cells");
        return Ok(None);
    }

    let Some(form) = cells[columns::RENEWAL_FORM].select(&markup.form).next() else {
        debug!("skipping row without renewal form");
        return Ok(None);
    };

    let id = form
        .select(&markup.renewal_id)
        .next()
        .and_then(|input| input.value().attr("value"))
        .ok_or_else(|| {
            TritiusError::UnknownStructure("renewal form without id input".to_string())
        })?
        .parse::<u32>()
        .map_err(|_| TritiusError::UnknownStructure("renewal id is not numeric".to_string()))?;

    let due_text = text_of(cells[columns::DUE_DATE]);
    let due_date = parse_portal_date(&due_text).ok_or_else(|| {
        TritiusError::UnknownStructure(format!("unparseable due date '{due_text}'"))
    })?;

    let title_anchor = cells[columns::TITLE]
        .select(&markup.title_anchor)
        .next()
        .ok_or_else(|| TritiusError::UnknownStructure("title cell without anchor".to_string()))?;

    Ok(Some(Borrowing {
        author: text_of(cells[columns::AUTHOR]),
        title: text_of(title_anchor),
        id,
        due_date,
    }))
}

/// Extract the renew-all form's input pairs, `None` when nothing is
/// renewable and the portal omits the form.
pub fn renew_all_form_inputs(markup: &Markup, html: &str) -> Option<HashMap<String, String>> {
    let document = Html::parse_document(html);
    let form = document.select(&markup.renew_all_form).next()?;
    Some(form_inputs(markup, form))
}
