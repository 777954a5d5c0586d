use crate::types::{
    ContractorDiscardRow, Dataset, ExecutiveSummary, Field, MonthlyRopRow, MonthlyWellsRow,
    MultiWellSummary, OperatorFluidRow, OperatorRopRow, RadarRow, Record, WellRop,
};
use crate::util::{average, mean_present, sum_present};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

const NO_WELL: &str = "N/A";

/// Means of the headline columns on the multi-well page.
pub fn multi_well_summary(data: &Dataset) -> MultiWellSummary {
    let mean = |field: Field| mean_present(data.numbers(field));
    MultiWellSummary {
        int_length: mean(Field::IntLength),
        rop: mean(Field::Rop),
        dilution_ratio: mean(Field::DilutionRatio),
        discard_ratio: mean(Field::DiscardRatio),
        haul_off: mean(Field::HaulOff),
        amw: mean(Field::Amw),
    }
}

const RADAR_FIELDS: [Field; 5] = [
    Field::Rop,
    Field::DilutionRatio,
    Field::DiscardRatio,
    Field::Amw,
    Field::HaulOff,
];

/// Per-well means of the radar metrics, sorted by well name.
///
/// Rows missing any radar metric are left out before grouping.
pub fn radar_rows(data: &Dataset) -> Vec<RadarRow> {
    #[derive(Default)]
    struct Acc {
        sums: [f64; 5],
        count: usize,
    }
    let mut map: BTreeMap<String, Acc> = BTreeMap::new();
    for r in data.records() {
        let Some(name) = r.well_name.clone() else {
            continue;
        };
        let values: Option<Vec<f64>> = RADAR_FIELDS.iter().map(|f| r.number(*f)).collect();
        let Some(values) = values else {
            continue;
        };
        let e = map.entry(name).or_default();
        for (sum, v) in e.sums.iter_mut().zip(values) {
            *sum += v;
        }
        e.count += 1;
    }
    map.into_iter()
        .map(|(well_name, acc)| {
            let n = acc.count as f64;
            RadarRow {
                well_name,
                rop: acc.sums[0] / n,
                dilution_ratio: acc.sums[1] / n,
                discard_ratio: acc.sums[2] / n,
                amw: acc.sums[3] / n,
                haul_off: acc.sums[4] / n,
            }
        })
        .collect()
}

fn month_key(r: &Record) -> Option<String> {
    r.td_date.map(|d| d.format("%Y-%m").to_string())
}

/// Wells completed per month, with a running total.
pub fn monthly_wells(data: &Dataset) -> Vec<MonthlyWellsRow> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for month in data.records().iter().filter_map(month_key) {
        *counts.entry(month).or_default() += 1;
    }
    let mut cumulative = 0;
    counts
        .into_iter()
        .map(|(month, well_count)| {
            cumulative += well_count;
            MonthlyWellsRow {
                month,
                well_count,
                cumulative,
            }
        })
        .collect()
}

pub fn monthly_rop(data: &Dataset) -> Vec<MonthlyRopRow> {
    let mut map: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in data.records() {
        if let (Some(month), Some(rop)) = (month_key(r), r.rop) {
            map.entry(month).or_default().push(rop);
        }
    }
    map.into_iter()
        .map(|(month, rops)| MonthlyRopRow {
            month,
            avg_rop: average(&rops),
        })
        .collect()
}

pub fn contractor_discard(data: &Dataset) -> Vec<ContractorDiscardRow> {
    let mut map: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in data.records() {
        if let (Some(contractor), Some(ratio)) = (&r.contractor, r.discard_ratio) {
            map.entry(contractor.clone()).or_default().push(ratio);
        }
    }
    map.into_iter()
        .map(|(contractor, ratios)| ContractorDiscardRow {
            contractor,
            avg_discard_ratio: average(&ratios),
        })
        .collect()
}

/// Mean ROP per operator; rows without an operator or ROP are skipped.
pub fn operator_rop(data: &Dataset) -> Vec<OperatorRopRow> {
    let mut map: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in data.records() {
        if let (Some(operator), Some(rop)) = (&r.operator, r.rop) {
            map.entry(operator.clone()).or_default().push(rop);
        }
    }
    map.into_iter()
        .map(|(operator, rops)| OperatorRopRow {
            operator,
            avg_rop: average(&rops),
        })
        .collect()
}

/// Fluid volumes summed per operator; missing volumes count as zero.
pub fn operator_fluids(data: &Dataset) -> Vec<OperatorFluidRow> {
    #[derive(Default)]
    struct Acc {
        base_oil: Vec<Option<f64>>,
        water: Vec<Option<f64>>,
        chemicals: Vec<Option<f64>>,
    }
    let mut map: BTreeMap<String, Acc> = BTreeMap::new();
    for r in data.records() {
        let Some(operator) = &r.operator else {
            continue;
        };
        let e = map.entry(operator.clone()).or_default();
        e.base_oil.push(r.base_oil);
        e.water.push(r.water);
        e.chemicals.push(r.chemicals);
    }
    map.into_iter()
        .map(|(operator, acc)| OperatorFluidRow {
            operator,
            base_oil: sum_present(acc.base_oil),
            water: sum_present(acc.water),
            chemicals: sum_present(acc.chemicals),
        })
        .collect()
}

pub fn generate_executive_summary(data: &Dataset) -> ExecutiveSummary {
    let wells: HashSet<&str> = data
        .records()
        .iter()
        .filter_map(|r| r.well_name.as_deref())
        .collect();
    let mean = |field: Field| mean_present(data.numbers(field)).unwrap_or(0.0);

    let with_rop: Vec<(&Record, f64)> = data
        .records()
        .iter()
        .filter_map(|r| r.rop.map(|rop| (r, rop)))
        .collect();
    // First occurrence wins on ties.
    let fastest = with_rop.iter().fold(None, |best: Option<&(&Record, f64)>, cur| match best {
        Some(b) if b.1.partial_cmp(&cur.1) != Some(Ordering::Less) => Some(b),
        _ => Some(cur),
    });
    let slowest = with_rop.iter().fold(None, |best: Option<&(&Record, f64)>, cur| match best {
        Some(b) if b.1.partial_cmp(&cur.1) != Some(Ordering::Greater) => Some(b),
        _ => Some(cur),
    });
    let to_well = |entry: Option<&(&Record, f64)>| match entry {
        Some((r, rop)) => WellRop {
            well_name: r.well_name.clone().unwrap_or_else(|| NO_WELL.to_string()),
            rop: *rop,
        },
        None => WellRop {
            well_name: NO_WELL.to_string(),
            rop: 0.0,
        },
    };

    ExecutiveSummary {
        total_wells: wells.len(),
        avg_rop: mean(Field::Rop),
        avg_amw: mean(Field::Amw),
        avg_dilution_ratio: mean(Field::DilutionRatio),
        avg_discard_ratio: mean(Field::DiscardRatio),
        fastest_well: to_well(fastest),
        slowest_well: to_well(slowest),
    }
}

/// Plain-text rendering used for the summary download.
pub fn executive_summary_text(s: &ExecutiveSummary) -> String {
    format!(
        "Executive Summary for {} wells\n\
         Average ROP: {:.1} ft/hr\n\
         Average Mud Weight: {:.2} ppg\n\
         Average Dilution Ratio: {:.2}\n\
         Average Discard Ratio: {:.2}\n\
         Fastest Well: {} @ {:.1} ft/hr\n\
         Slowest Well: {} @ {:.1} ft/hr\n",
        s.total_wells,
        s.avg_rop,
        s.avg_amw,
        s.avg_dilution_ratio,
        s.avg_discard_ratio,
        s.fastest_well.well_name,
        s.fastest_well.rop,
        s.slowest_well.well_name,
        s.slowest_well.rop,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn well(
        name: &str,
        contractor: &str,
        op: &str,
        rop: Option<f64>,
        date: Option<(i32, u32)>,
    ) -> Record {
        Record {
            well_name: Some(name.into()),
            contractor: Some(contractor.into()),
            operator: Some(op.into()),
            rop,
            td_date: date.and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 15)),
            dilution_ratio: Some(1.5),
            discard_ratio: Some(0.4),
            amw: Some(10.0),
            haul_off: Some(200.0),
            base_oil: Some(10.0),
            water: None,
            chemicals: Some(1.0),
            ..Default::default()
        }
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            well("W1", "C1", "Op1", Some(50.0), Some((2023, 2))),
            well("W2", "C2", "Op2", Some(80.0), Some((2023, 1))),
            well("W3", "C1", "Op1", Some(20.0), Some((2023, 2))),
            well("W1", "C1", "Op1", None, None),
        ])
    }

    #[test]
    fn multi_well_means_skip_missing() {
        let s = multi_well_summary(&sample());
        assert_eq!(s.rop, Some(50.0));
        assert_eq!(s.amw, Some(10.0));
        assert_eq!(s.int_length, None);
    }

    #[test]
    fn radar_drops_incomplete_rows_and_groups_by_well() {
        let rows = radar_rows(&sample());
        let names: Vec<_> = rows.iter().map(|r| r.well_name.as_str()).collect();
        assert_eq!(names, ["W1", "W2", "W3"]);
        assert_eq!(rows[0].rop, 50.0);
    }

    #[test]
    fn monthly_counts_are_sorted_and_cumulative() {
        let rows = monthly_wells(&sample());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].month, "2023-01");
        assert_eq!((rows[0].well_count, rows[0].cumulative), (1, 1));
        assert_eq!((rows[1].well_count, rows[1].cumulative), (2, 3));

        let rop = monthly_rop(&sample());
        assert_eq!(rop[1].avg_rop, 35.0);
    }

    #[test]
    fn grouped_sales_tables() {
        let discard = contractor_discard(&sample());
        assert_eq!(discard.len(), 2);
        assert_eq!(discard[0].contractor, "C1");

        let fluids = operator_fluids(&sample());
        assert_eq!(fluids[0].operator, "Op1");
        assert_eq!(fluids[0].base_oil, 30.0);
        assert_eq!(fluids[0].water, 0.0);
        assert_eq!(fluids[0].chemicals, 3.0);
    }

    #[test]
    fn operator_rop_is_sorted_and_skips_missing() {
        let rows = operator_rop(&sample());
        let ops: Vec<_> = rows.iter().map(|r| r.operator.as_str()).collect();
        assert_eq!(ops, ["Op1", "Op2"]);
        // Op1: 50 and 20, the ROP-less W1 row is ignored.
        assert_eq!(rows[0].avg_rop, 35.0);
        assert_eq!(rows[1].avg_rop, 80.0);
        assert!(operator_rop(&Dataset::default()).is_empty());
    }

    #[test]
    fn executive_summary_extremes() {
        let s = generate_executive_summary(&sample());
        assert_eq!(s.total_wells, 3);
        assert_eq!(s.fastest_well.well_name, "W2");
        assert_eq!(s.slowest_well.well_name, "W3");
        let text = executive_summary_text(&s);
        assert!(text.starts_with("Executive Summary for 3 wells\n"));
        assert!(text.contains("Fastest Well: W2 @ 80.0 ft/hr"));
    }

    #[test]
    fn empty_dataset_reports_are_empty() {
        let empty = Dataset::default();
        assert!(radar_rows(&empty).is_empty());
        assert!(monthly_wells(&empty).is_empty());
        let s = generate_executive_summary(&empty);
        assert_eq!(s.total_wells, 0);
        assert_eq!(s.avg_rop, 0.0);
        assert_eq!(s.fastest_well.well_name, "N/A");
        assert_eq!(s.slowest_well.rop, 0.0);
    }
}
