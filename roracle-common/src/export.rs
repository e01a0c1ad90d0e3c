//! CSV export of affiliation lookup results

use crate::error::{Error, Result};
use crate::results::AffiliationResult;

/// Suggested download name for the export
pub const CSV_FILE_NAME: &str = "roracle_results.csv";

pub const CSV_HEADER: &str = "Affiliation,ROR IDs";

/// Render `results` as CSV, one quoted row per affiliation.
///
/// ROR identifiers are space-joined into the second column. Every line,
/// including the last, ends with `\n`.
pub fn results_to_csv(results: &[AffiliationResult]) -> Result<String> {
    // Header goes in unquoted; the writer quotes every field after it
    let buffer = format!("{}\n", CSV_HEADER).into_bytes();
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buffer);

    for result in results {
        let ror_ids = result.ror_ids().collect::<Vec<_>>().join(" ");
        writer.write_record([result.affiliation.as_str(), ror_ids.as_str()])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidInput(format!("CSV is not UTF-8: {}", e)))
}
