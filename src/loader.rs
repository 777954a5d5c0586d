use crate::error::{DashboardError, Result};
use crate::types::{Dataset, Field, Record};
use crate::util::{parse_date_safe, parse_f64_safe};
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub unparsed_dates: usize,
    pub unparsed_numbers: usize,
}

/// Load the well dataset from a CSV file.
///
/// A missing file is fatal; bad cells inside the file are not (they become
/// nulls and are counted in the [`LoadReport`]).
pub fn load_dataset(path: &Path) -> Result<(Dataset, LoadReport)> {
    if !path.exists() {
        return Err(DashboardError::DatasetNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path)?;
    let (dataset, report) = load_from_reader(file)?;
    info!(
        path = %path.display(),
        rows = report.loaded_rows,
        parse_errors = report.parse_errors,
        "Loaded well dataset"
    );
    Ok((dataset, report))
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<(Dataset, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let mapping: Vec<Option<Field>> = headers.iter().map(Field::from_header).collect();
    let columns: Vec<String> = headers
        .iter()
        .zip(&mapping)
        .map(|(h, f)| match f {
            Some(field) => field.column().to_string(),
            None => h.trim().to_string(),
        })
        .collect();
    debug!(columns = ?columns, "Resolved CSV header");

    let mut report = LoadReport::default();
    let mut records: Vec<Record> = Vec::new();
    for result in rdr.records() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(row = report.total_rows, error = %e, "Skipping unreadable row");
                report.parse_errors += 1;
                continue;
            }
        };
        records.push(parse_row(&row, &headers, &mapping, &mut report));
    }

    report.loaded_rows = records.len();
    Ok((Dataset::new(columns, records), report))
}

fn parse_row(
    row: &StringRecord,
    headers: &StringRecord,
    mapping: &[Option<Field>],
    report: &mut LoadReport,
) -> Record {
    let mut record = Record::default();
    for (idx, raw) in row.iter().enumerate() {
        let raw = raw.trim();
        match mapping.get(idx).copied().flatten() {
            Some(field) if field.is_text() => {
                let value = (!raw.is_empty()).then(|| raw.to_string());
                record.set_text(field, value);
            }
            Some(Field::TdDate) => {
                record.td_date = parse_date_safe(Some(raw));
                if record.td_date.is_none() && !raw.is_empty() {
                    report.unparsed_dates += 1;
                }
            }
            Some(field) => {
                let value = parse_f64_safe(Some(raw));
                if value.is_none() && !raw.is_empty() {
                    report.unparsed_numbers += 1;
                }
                record.set_number(field, value);
            }
            None => {
                let name = headers
                    .get(idx)
                    .map(|h| h.trim().to_string())
                    .unwrap_or_else(|| format!("column_{}", idx + 1));
                record.extra.push((name, raw.to_string()));
            }
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    const SAMPLE: &str = "\
Well_Name,Operator,Contractor,flowline_Shakers,Hole_Size,Haul_OFF,IntLength,TD_Date,MD Depth,County Code
A,Op1,C1,Derrick FLC,8.5,100,50,2023-04-09,12000,42
B,Op2,C2,Brandt,,\"1,200\",abc,garbage,,7
";

    #[test]
    fn parses_known_and_extra_columns() {
        let (ds, report) = load_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.loaded_rows, 2);
        assert!(ds.has_field(Field::MdDepth));
        assert!(ds.has_field(Field::TdDate));
        assert!(!ds.has_field(Field::Amw));

        let a = &ds.records()[0];
        assert_eq!(a.well_name.as_deref(), Some("A"));
        assert_eq!(a.hole_size, Some(8.5));
        assert_eq!(a.md_depth, Some(12000.0));
        assert_eq!(a.td_date, NaiveDate::from_ymd_opt(2023, 4, 9));
        assert_eq!(a.extra, vec![("County Code".to_string(), "42".to_string())]);
    }

    #[test]
    fn bad_cells_become_nulls() {
        let (ds, report) = load_from_reader(SAMPLE.as_bytes()).unwrap();
        let b = &ds.records()[1];
        assert_eq!(b.hole_size, None);
        assert_eq!(b.haul_off, Some(1200.0));
        assert_eq!(b.int_length, None);
        assert_eq!(b.td_date, None);
        assert_eq!(report.unparsed_dates, 1);
        assert_eq!(report.unparsed_numbers, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_dataset(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::DatasetNotFound { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let (ds, _) = load_dataset(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
    }
}
