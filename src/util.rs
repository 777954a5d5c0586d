// Utility helpers: guarded arithmetic, parsing and basic statistics.
//
// Every division in the KPI, normalization and cost code goes through
// `safe_div`, so a well with a zero or missing interval length degrades to a
// zero KPI instead of a NaN or infinity leaking into the tables.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Divide `numerator` by `denominator`, returning `0.0` instead of failing.
///
/// Accepts plain `f64` or `Option<f64>` on either side. The result is `0.0`
/// when either operand is `None` or NaN, when the denominator is zero, or
/// when the quotient would not be finite.
pub fn safe_div(numerator: impl Into<Option<f64>>, denominator: impl Into<Option<f64>>) -> f64 {
    let (Some(n), Some(d)) = (numerator.into(), denominator.into()) else {
        return 0.0;
    };
    if n.is_nan() || d.is_nan() || d == 0.0 {
        return 0.0;
    }
    let q = n / d;
    if q.is_finite() {
        q
    } else {
        0.0
    }
}

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces, text).
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (`NaN`, `n/a`, ...).
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok()
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// Parse a `TD_Date` cell. Unparseable or empty input is `None`.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Mean of the present values, `None` when there are none.
pub fn mean_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let present: Vec<f64> = values.into_iter().flatten().collect();
    if present.is_empty() {
        None
    } else {
        Some(average(&present))
    }
}

/// Sum of the present values; missing values contribute nothing.
pub fn sum_present<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().sum()
}

/// Pearson correlation of two equally long series.
///
/// Undefined (`None`) for fewer than two points or when either series has
/// zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mx = average(xs);
    let my = average(ys);
    let mut cov = 0.0;
    let mut vx = 0.0;
    let mut vy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }
    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    let r = cov / (vx * vy).sqrt();
    // Rounding can push |r| a hair past 1.
    Some(r.clamp(-1.0, 1.0))
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimal places plus locale-aware thousands separators
    // (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// `tabled` display hook for numeric cells in console previews.
pub fn display_2dp(v: &f64) -> String {
    format_number(*v, 2)
}

/// `tabled` display hook for optional numeric cells.
pub fn display_opt_2dp(v: &Option<f64>) -> String {
    v.map(|x| format_number(x, 2)).unwrap_or_else(|| "N/A".to_string())
}
