//! Delimited-text ingestion into an [`ObservationTable`].

use std::path::Path;

use anyhow::{Context, Result};
use hm_core::{Column, ObservationTable};

/// Cells read as missing values (the usual dataframe `read_csv` defaults).
pub const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}

/// Field delimiter implied by the file extension (`.tsv` is tab-separated).
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// Read a CSV/TSV file with a header row.
///
/// A column becomes numeric when every non-missing cell parses as `f64`;
/// otherwise it stays text.
pub fn read_table(path: &Path) -> Result<ObservationTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers: Vec<String> =
        rdr.headers().context("failed to read CSV headers")?.iter().map(str::to_string).collect();
    if headers.iter().all(String::is_empty) {
        anyhow::bail!("{} has no header row", path.display());
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("failed to read row {}", i + 1))?;
        for (j, field) in record.iter().enumerate() {
            cells[j].push((!is_missing(field)).then(|| field.to_string()));
        }
    }

    let columns: Vec<Column> =
        headers.into_iter().zip(cells).map(|(name, cells)| typed_column(name, cells)).collect();
    let table = ObservationTable::new(columns)?;
    tracing::info!(
        path = %path.display(),
        rows = table.n_rows(),
        columns = table.column_names().len(),
        "table loaded"
    );
    Ok(table)
}

fn typed_column(name: String, cells: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|c| match c {
            None => Some(None),
            Some(s) => s.parse::<f64>().ok().map(Some),
        })
        .collect();
    match parsed {
        Some(values) if values.iter().any(Option::is_some) => Column::numeric(name, values),
        _ => Column::text(name, cells),
    }
}
