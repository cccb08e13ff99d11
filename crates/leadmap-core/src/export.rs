//! CSV export of selected leads.
//!
//! The output is meant to be opened directly in spreadsheet tools: every
//! field is quoted, embedded quotes are doubled, and the text is prefixed
//! with a UTF-8 byte-order mark so the encoding is detected.

use chrono::NaiveDate;

use crate::lead::Lead;
use crate::selection::Selection;

/// Column header row.
pub const CSV_HEADER: [&str; 7] = [
    "Nome", "Telefone", "Cidade", "Bairro", "Website", "Email", "Segmento",
];

const UTF8_BOM: &str = "\u{feff}";

/// A rendered export file, ready to be handed to the host for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Number of data rows (header excluded)
    pub rows: usize,
}

impl CsvExport {
    pub const CONTENT_TYPE: &'static str = "text/csv;charset=utf-8;";
}

/// File name embedding the export date.
pub fn export_filename(date: NaiveDate) -> String {
    format!("leadmap_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Wraps a field in double quotes, doubling any embedded quote.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// One CSV line (without terminator) for a lead.
pub fn lead_row(lead: &Lead) -> String {
    let fields = [
        lead.name.as_deref(),
        Some(lead.phone.as_str()),
        lead.city.as_deref(),
        lead.neighborhood.as_deref(),
        lead.website.as_deref(),
        lead.email.as_deref(),
        lead.segment.as_deref(),
    ];

    fields
        .iter()
        .map(|field| quote_field(field.unwrap_or("")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders header plus one row per lead, BOM-prefixed, rows separated by `\n`.
pub fn render_csv<'a>(leads: impl IntoIterator<Item = &'a Lead>) -> String {
    let mut lines = vec![CSV_HEADER.join(",")];
    lines.extend(leads.into_iter().map(lead_row));
    format!("{UTF8_BOM}{}", lines.join("\n"))
}

/// Exports the selected leads, looked up in the full list.
///
/// Returns `None` when nothing is selected: no file is produced.
pub fn export_selected(leads: &[Lead], selection: &Selection, date: NaiveDate) -> Option<CsvExport> {
    let picked = selection.pick(leads);
    if picked.is_empty() {
        return None;
    }

    let rows = picked.len();
    let content = render_csv(picked);

    Some(CsvExport {
        filename: export_filename(date),
        bytes: content.into_bytes(),
        rows,
    })
}
