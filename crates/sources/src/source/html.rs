//! Shared markup-extraction helpers for the HTML sources.

use scraper::{ElementRef, Html, Selector};

use crate::errors::SourceError;

/// All elements matching `selector` in `document`.
pub(crate) fn select_all<'a>(
    document: &'a Html,
    selector: &str,
) -> Result<Vec<ElementRef<'a>>, SourceError> {
    let selector = Selector::parse(selector)
        .map_err(|e| SourceError::parse("document", format!("bad selector: {e}")))?;
    Ok(document.select(&selector).collect())
}

/// The `index`-th `<td>` element of a row.
pub(crate) fn cell<'a>(
    source: &str,
    row: &ElementRef<'a>,
    index: usize,
) -> Result<ElementRef<'a>, SourceError> {
    let selector = Selector::parse("td")
        .map_err(|e| SourceError::parse(source, format!("bad selector: {e}")))?;
    row.select(&selector)
        .nth(index)
        .ok_or_else(|| SourceError::parse(source, format!("missing cell {index}")))
}

/// Trimmed text content of the `index`-th `<td>` of a row.
pub(crate) fn cell_text(
    source: &str,
    row: &ElementRef<'_>,
    index: usize,
) -> Result<String, SourceError> {
    let cell = cell(source, row, index)?;
    Ok(cell.text().collect::<String>().trim().to_string())
}

/// The first text node of the `index`-th `<td>` that parses as a number.
///
/// Some institutions interleave the rate value with markup (icons, trend
/// arrows), so the useful text is not necessarily the full cell text.
pub(crate) fn cell_leading_number(
    source: &str,
    row: &ElementRef<'_>,
    index: usize,
) -> Result<f64, SourceError> {
    let cell = cell(source, row, index)?;
    cell.text()
        .filter_map(|node| node.trim().parse::<f64>().ok())
        .next()
        .ok_or_else(|| SourceError::parse(source, format!("no numeric value in cell {index}")))
}
