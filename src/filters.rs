//! Shared filter pipeline.
//!
//! Every page starts by narrowing the raw dataset with the same set of
//! criteria. Criteria are ANDed; a criterion whose column the dataset does
//! not carry at all is skipped rather than excluding everything. Filtering
//! copies the surviving rows and never reorders or edits them.

use crate::types::{Dataset, Field, Record};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

pub const ALL: &str = "All";

/// A dropdown choice: everything, or one concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Value(String),
}

impl Selection {
    pub fn value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Value(v) => Some(v),
        }
    }
}

impl From<String> for Selection {
    fn from(s: String) -> Self {
        if s.trim().is_empty() || s == ALL {
            Selection::All
        } else {
            Selection::Value(s)
        }
    }
}

impl From<&str> for Selection {
    fn from(s: &str) -> Self {
        Selection::from(s.to_string())
    }
}

impl From<Selection> for String {
    fn from(s: Selection) -> Self {
        match s {
            Selection::All => ALL.to_string(),
            Selection::Value(v) => v,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value().unwrap_or(ALL))
    }
}

/// Half-open numeric interval `[low, high)` with a display label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub label: &'static str,
    pub low: f64,
    pub high: f64,
}

impl Bin {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value < self.high
    }
}

const fn bin(label: &'static str, low: f64, high: f64) -> Bin {
    Bin { label, low, high }
}

pub const DEPTH_BINS: [Bin; 6] = [
    bin("<5000 ft", 0.0, 5000.0),
    bin("5000–10000 ft", 5000.0, 10000.0),
    bin("10000–15000 ft", 10000.0, 15000.0),
    bin("15000–20000 ft", 15000.0, 20000.0),
    bin("20000–25000 ft", 20000.0, 25000.0),
    bin(">25000 ft", 25000.0, f64::INFINITY),
];

pub const MUD_WEIGHT_BINS: [Bin; 6] = [
    bin("<3", 0.0, 3.0),
    bin("3–6", 3.0, 6.0),
    bin("6–9", 6.0, 9.0),
    bin("9–11", 9.0, 11.0),
    bin("11–14", 11.0, 14.0),
    bin("14–30", 14.0, 30.0),
];

/// Look up a bin by label. An ASCII hyphen is accepted for the en dash.
pub fn find_bin(bins: &[Bin], label: &str) -> Option<Bin> {
    let wanted = label.trim().replace('-', "–");
    bins.iter().copied().find(|b| b.label == wanted)
}

/// Filter selections for one render.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Case-insensitive substring matched against every field.
    pub search_text: String,
    pub operator: Selection,
    pub contractor: Selection,
    pub shaker: Selection,
    pub hole_size: Selection,
    /// Inclusive `[min_year, max_year]` on `TD_Date`. When unset the
    /// dataset's own [`year_bounds`] apply, so undated wells still drop out.
    pub year_range: Option<(i32, i32)>,
    pub depth_bin: Selection,
    pub mud_weight_bin: Selection,
}

impl FilterConfig {
    /// The categorical selections in the order the sidebar offers them.
    pub fn categorical(&self) -> [(Field, &Selection); 4] {
        [
            (Field::Operator, &self.operator),
            (Field::Contractor, &self.contractor),
            (Field::FlowlineShakers, &self.shaker),
            (Field::HoleSize, &self.hole_size),
        ]
    }

    /// Active criteria for `dataset`, in sidebar order.
    pub fn criteria(&self, dataset: &Dataset) -> Vec<Criterion> {
        let mut out = Vec::new();
        let term = self.search_text.trim();
        if !term.is_empty() {
            out.push(Criterion::Search(term.to_lowercase()));
        }
        for (field, selection) in self.categorical() {
            if let Some(value) = selection.value() {
                out.push(Criterion::Equals {
                    field,
                    value: value.to_string(),
                });
            }
        }
        let (min, max) = self.year_range.unwrap_or_else(|| year_bounds(dataset));
        out.push(Criterion::YearRange { min, max });
        for (field, bins, selection) in [
            (Field::MdDepth, &DEPTH_BINS[..], &self.depth_bin),
            (Field::Amw, &MUD_WEIGHT_BINS[..], &self.mud_weight_bin),
        ] {
            let Some(label) = selection.value() else {
                continue;
            };
            match find_bin(bins, label) {
                Some(bin) => out.push(Criterion::InBin { field, bin }),
                None => warn!(field = field.column(), label, "Unknown bin label, ignoring"),
            }
        }
        out
    }
}

/// One predicate of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Lower-cased search term.
    Search(String),
    Equals { field: Field, value: String },
    YearRange { min: i32, max: i32 },
    InBin { field: Field, bin: Bin },
}

impl Criterion {
    /// The column this criterion needs, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            Criterion::Search(_) => None,
            Criterion::Equals { field, .. } | Criterion::InBin { field, .. } => Some(*field),
            Criterion::YearRange { .. } => Some(Field::TdDate),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Criterion::Search(term) => record
                .display_values()
                .any(|v| v.to_lowercase().contains(term.as_str())),
            Criterion::Equals { field, value } => {
                record.text(*field).is_some_and(|v| v == *value)
            }
            Criterion::YearRange { min, max } => record
                .td_date
                .is_some_and(|d| (*min..=*max).contains(&d.year())),
            Criterion::InBin { field, bin } => {
                record.number(*field).is_some_and(|v| bin.contains(v))
            }
        }
    }
}

/// Apply every configured criterion to `dataset`.
pub fn apply_filters(dataset: &Dataset, config: &FilterConfig) -> Dataset {
    let filtered = apply_criteria(dataset, &config.criteria(dataset));
    debug!(
        before = dataset.len(),
        after = filtered.len(),
        "Applied shared filters"
    );
    filtered
}

/// Keep the records that satisfy all applicable `criteria`.
pub fn apply_criteria(dataset: &Dataset, criteria: &[Criterion]) -> Dataset {
    let active: Vec<&Criterion> = criteria
        .iter()
        .filter(|c| match c.field() {
            Some(field) if !dataset.has_field(field) => {
                debug!(field = field.column(), "Column absent, skipping criterion");
                false
            }
            _ => true,
        })
        .collect();
    let kept: Vec<Record> = dataset
        .records()
        .iter()
        .filter(|r| active.iter().all(|c| c.matches(r)))
        .cloned()
        .collect();
    dataset.with_records(kept)
}

/// Narrow by a single categorical selection.
pub fn narrow(dataset: &Dataset, field: Field, selection: &Selection) -> Dataset {
    match selection.value() {
        Some(value) => apply_criteria(
            dataset,
            &[Criterion::Equals {
                field,
                value: value.to_string(),
            }],
        ),
        None => dataset.clone(),
    }
}

/// Distinct non-null values of `field`, sorted ascending.
pub fn category_options(dataset: &Dataset, field: Field) -> Vec<String> {
    dataset
        .records()
        .iter()
        .filter_map(|r| r.text(field))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

const DEFAULT_YEAR_RANGE: (i32, i32) = (2020, 2026);

/// Year slider bounds from the `TD_Date` column.
///
/// Falls back to 2020–2026 when no date parses; a single year is widened by
/// one on each side so the slider has a range.
pub fn year_bounds(dataset: &Dataset) -> (i32, i32) {
    let years = || {
        dataset
            .records()
            .iter()
            .filter_map(|r| r.td_date.map(|d| d.year()))
    };
    match (years().min(), years().max()) {
        (Some(min), Some(max)) if min == max => (min - 1, max + 1),
        (Some(min), Some(max)) => (min, max),
        _ => DEFAULT_YEAR_RANGE,
    }
}
