use crate::error::Result;
use crate::kpi::CorrelationMatrix;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing::debug;

/// CSV bytes for `rows`, header taken from the `Tabled` derive so an empty
/// table still carries its header row.
pub fn to_csv_bytes<T>(rows: &[T]) -> Result<Vec<u8>>
where
    T: Serialize + Tabled,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(T::headers().iter().map(|h| h.as_bytes()))?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

pub fn write_csv<T>(path: &Path, rows: &[T]) -> Result<()>
where
    T: Serialize + Tabled,
{
    let bytes = to_csv_bytes(rows)?;
    std::fs::write(path, bytes)?;
    debug!(path = %path.display(), rows = rows.len(), "Wrote CSV export");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    debug!(path = %path.display(), "Wrote JSON export");
    Ok(())
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

/// Square matrix with a leading label column; undefined cells are empty.
pub fn write_correlation_csv(path: &Path, matrix: &CorrelationMatrix) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec![String::new()];
    header.extend(matrix.labels.iter().map(|l| l.to_string()));
    wtr.write_record(&header)?;
    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        let mut record = vec![label.to_string()];
        record.extend(row.iter().map(|v| v.map(|x| x.to_string()).unwrap_or_default()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}", table_str);
    if rows.len() > max_rows {
        println!("... {} more rows", rows.len() - max_rows);
    }
    println!();
}

pub fn correlation_table(matrix: &CorrelationMatrix) -> String {
    let mut builder = Builder::default();
    let mut header = vec![String::new()];
    header.extend(matrix.labels.iter().map(|l| l.to_string()));
    builder.push_record(header);
    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        let mut record = vec![label.to_string()];
        record.extend(
            row.iter()
                .map(|v| v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".to_string())),
        );
        builder.push_record(record);
    }
    builder.build().with(Style::markdown()).to_string()
}
