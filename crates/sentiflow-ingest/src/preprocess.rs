//! Label filtering and binary encoding.

use tracing::info;

use crate::error::{IngestError, IngestResult};
use crate::records::RecordSet;

/// Column holding the sentiment label.
pub const LABEL_COLUMN: &str = "sentiment";

/// Binary encoding of the labels we keep. Matching is exact.
fn encode_label(label: &str) -> Option<&'static str> {
    match label {
        "positive" => Some("1"),
        "negative" => Some("0"),
        _ => None,
    }
}

/// Keep `positive` / `negative` rows and rewrite the label as `1` / `0`.
///
/// Rows with any other label are dropped silently. Row order is preserved.
pub fn preprocess(records: &RecordSet) -> IngestResult<RecordSet> {
    info!("pre-processing started");

    let label_idx = records.column_index(LABEL_COLUMN).ok_or_else(|| {
        IngestError::schema(format!("missing label column '{}'", LABEL_COLUMN))
    })?;

    let rows: Vec<Vec<String>> = records
        .rows()
        .iter()
        .filter_map(|row| {
            let encoded = encode_label(&row[label_idx])?;
            let mut row = row.clone();
            row[label_idx] = encoded.to_string();
            Some(row)
        })
        .collect();

    let output = records.with_rows(rows);
    info!(
        kept = output.len(),
        dropped = records.len() - output.len(),
        "pre-processing completed"
    );
    Ok(output)
}
