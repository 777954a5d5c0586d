//! KPI derivation and normalization for the advanced analysis page.

use crate::types::{Dataset, Field, Kpi, KpiMeanRow, KpiRecord, Record};
use crate::util::{average, pearson, safe_div, sum_present};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const MISSING_IDENTITY: &str = "N/A";

/// Operator-entered values the dataset does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualInputs {
    /// Total flow rate (GPM).
    pub total_flow_rate: f64,
    pub num_screens: f64,
    /// Area per screen (sq ft).
    pub screen_area: f64,
}

impl Default for ManualInputs {
    fn default() -> Self {
        Self {
            total_flow_rate: 800.0,
            num_screens: 3.0,
            screen_area: 2.0,
        }
    }
}

impl ManualInputs {
    pub fn screen_loading_index(&self) -> f64 {
        safe_div(self.total_flow_rate, self.num_screens * self.screen_area)
    }
}

/// Degenerate efficiency: 100 when the well has any SCE throughput, else 0.
///
/// The dataset has no target SCE to compare against, so the ratio is SCE
/// over itself.
fn sce_self_ratio_pct(sce: f64) -> f64 {
    if sce > 0.0 {
        safe_div(sce, sce) * 100.0
    } else {
        0.0
    }
}

/// KPIs for one well.
pub fn derive_record(record: &Record, inputs: &ManualInputs) -> KpiRecord {
    let haul = record.number_or_default(Field::HaulOff);
    let int_length = record.number_or_default(Field::IntLength);
    let hole = record.number_or_default(Field::HoleSize);
    let sce = record.number_or_default(Field::TotalSce);
    let base_oil = record.number_or_default(Field::BaseOil);
    let water = record.number_or_default(Field::Water);
    let chemicals = record.number_or_default(Field::Chemicals);
    let rop = record.number_or_default(Field::Rop);

    let efficiency = sce_self_ratio_pct(sce);
    KpiRecord {
        well_name: record
            .well_name
            .clone()
            .unwrap_or_else(|| MISSING_IDENTITY.to_string()),
        operator: record
            .operator
            .clone()
            .unwrap_or_else(|| MISSING_IDENTITY.to_string()),
        shaker_throughput_efficiency: efficiency,
        cuttings_volume_ratio: safe_div(haul, int_length),
        screen_loading_index: inputs.screen_loading_index(),
        fluid_retention_on_cuttings_pct: sce_self_ratio_pct(sce),
        drilling_intensity_index: safe_div(rop, hole),
        fluid_loading_index: safe_div(base_oil + water + chemicals, int_length),
        chemical_demand_rate: safe_div(chemicals, int_length),
        mud_retention_efficiency_pct: 100.0 - efficiency,
        downstream_solids_loss: 100.0 - efficiency,
    }
}

/// One KPI row per well, in dataset order.
pub fn derive_kpis(dataset: &Dataset, inputs: &ManualInputs) -> Vec<KpiRecord> {
    let rows: Vec<KpiRecord> = dataset
        .records()
        .iter()
        .map(|r| derive_record(r, inputs))
        .collect();
    debug!(rows = rows.len(), "Derived KPI table");
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum NormalizationUnit {
    #[default]
    #[serde(alias = "none")]
    None,
    #[serde(alias = "feet")]
    Feet,
    #[serde(alias = "hours")]
    Hours,
    #[serde(alias = "days")]
    Days,
}

/// Dataset-wide divisor for `unit`.
///
/// `None` when the unit is `None` or the source column is absent.
pub fn normalization_divisor(unit: NormalizationUnit, dataset: &Dataset) -> Option<f64> {
    let total = |field: Field| {
        dataset
            .has_field(field)
            .then(|| sum_present(dataset.numbers(field)))
    };
    match unit {
        NormalizationUnit::None => None,
        NormalizationUnit::Feet => total(Field::IntLength),
        NormalizationUnit::Hours => total(Field::DrillingHours),
        NormalizationUnit::Days => total(Field::DrillingHours).map(|h| safe_div(h, 24.0)),
    }
}

/// Rescale every KPI column by one dataset-wide divisor.
///
/// Rows pass through untouched when there is no usable divisor.
pub fn normalize(
    mut kpis: Vec<KpiRecord>,
    unit: NormalizationUnit,
    dataset: &Dataset,
) -> Vec<KpiRecord> {
    let divisor = match normalization_divisor(unit, dataset) {
        Some(d) if d != 0.0 && !d.is_nan() => d,
        _ => {
            debug!(?unit, "No normalization divisor, KPIs unchanged");
            return kpis;
        }
    };
    info!(?unit, divisor, "Normalizing KPI table");
    for row in &mut kpis {
        for value in row.values_mut() {
            *value = safe_div(*value, divisor);
        }
    }
    kpis
}

/// Mean of each KPI column (0 for an empty table).
pub fn kpi_means(kpis: &[KpiRecord]) -> Vec<KpiMeanRow> {
    Kpi::ALL
        .into_iter()
        .map(|kpi| KpiMeanRow {
            kpi: kpi.label().to_string(),
            mean: average(&column(kpis, kpi)),
        })
        .collect()
}

fn column(kpis: &[KpiRecord], kpi: Kpi) -> Vec<f64> {
    kpis.iter().map(|r| r.value(kpi)).collect()
}

/// Pairwise Pearson correlation of the KPI columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<&'static str>,
    /// Row-major; `None` where the correlation is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: Kpi, b: Kpi) -> Option<f64> {
        let i = Kpi::ALL.iter().position(|k| *k == a)?;
        let j = Kpi::ALL.iter().position(|k| *k == b)?;
        self.values[i][j]
    }

    /// Off-diagonal pair with the largest |r|; earlier pairs win ties.
    pub fn strongest_pair(&self) -> Option<(Kpi, Kpi, f64)> {
        let mut best: Option<(Kpi, Kpi, f64)> = None;
        for (i, a) in Kpi::ALL.iter().enumerate() {
            for b in &Kpi::ALL[i + 1..] {
                let Some(r) = self.get(*a, *b) else {
                    continue;
                };
                if best.map_or(true, |(_, _, top)| r.abs() > top.abs()) {
                    best = Some((*a, *b, r));
                }
            }
        }
        best
    }
}

pub fn correlation_matrix(kpis: &[KpiRecord]) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = Kpi::ALL.iter().map(|k| column(kpis, *k)).collect();
    let values = columns
        .iter()
        .map(|x| columns.iter().map(|y| pearson(x, y)).collect())
        .collect();
    CorrelationMatrix {
        labels: Kpi::ALL.iter().map(|k| k.label()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_record() -> Record {
        Record {
            well_name: Some("A".into()),
            operator: Some("Op1".into()),
            haul_off: Some(100.0),
            int_length: Some(50.0),
            hole_size: Some(5.0),
            total_sce: Some(0.0),
            base_oil: Some(10.0),
            water: Some(5.0),
            chemicals: Some(2.0),
            rop: Some(20.0),
            ..Default::default()
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn end_to_end_single_well() {
        let ds = Dataset::from_records(vec![scenario_record()]);
        let kpis = normalize(
            derive_kpis(&ds, &ManualInputs::default()),
            NormalizationUnit::None,
            &ds,
        );
        assert_eq!(kpis.len(), 1);
        let k = &kpis[0];
        assert_eq!(k.well_name, "A");
        assert_eq!(k.operator, "Op1");
        assert!(close(k.cuttings_volume_ratio, 2.0));
        assert!(close(k.screen_loading_index, 800.0 / 6.0));
        assert!(close(k.drilling_intensity_index, 4.0));
        assert!(close(k.fluid_loading_index, 0.34));
        assert!(close(k.chemical_demand_rate, 0.04));
        assert_eq!(k.shaker_throughput_efficiency, 0.0);
        assert_eq!(k.mud_retention_efficiency_pct, 100.0);
    }

    #[test]
    fn zero_interval_length_degrades_to_zero() {
        let mut r = scenario_record();
        r.int_length = Some(0.0);
        let k = derive_record(&r, &ManualInputs::default());
        assert_eq!(k.cuttings_volume_ratio, 0.0);
        assert_eq!(k.fluid_loading_index, 0.0);
        assert_eq!(k.chemical_demand_rate, 0.0);
    }

    #[test]
    fn sce_flips_degenerate_kpis() {
        let mut r = scenario_record();
        r.total_sce = Some(12.5);
        let k = derive_record(&r, &ManualInputs::default());
        assert_eq!(k.shaker_throughput_efficiency, 100.0);
        assert_eq!(k.fluid_retention_on_cuttings_pct, 100.0);
        assert_eq!(k.mud_retention_efficiency_pct, 0.0);
        assert_eq!(k.downstream_solids_loss, 0.0);

        for sce in [Some(-1.0), None] {
            r.total_sce = sce;
            let k = derive_record(&r, &ManualInputs::default());
            assert_eq!(k.shaker_throughput_efficiency, 0.0);
            assert_eq!(k.mud_retention_efficiency_pct, 100.0);
        }
    }

    #[test]
    fn missing_fields_use_defaults_and_sentinels() {
        let k = derive_record(
            &Record {
                rop: Some(30.0),
                ..Default::default()
            },
            &ManualInputs::default(),
        );
        assert_eq!(k.well_name, "N/A");
        assert_eq!(k.operator, "N/A");
        // Missing hole size divides by 1.
        assert_eq!(k.drilling_intensity_index, 30.0);

        let k = derive_record(
            &Record {
                rop: Some(30.0),
                hole_size: Some(0.0),
                ..Default::default()
            },
            &ManualInputs::default(),
        );
        assert_eq!(k.drilling_intensity_index, 0.0);
    }

    #[test]
    fn zero_screens_give_zero_loading_index() {
        let inputs = ManualInputs {
            num_screens: 0.0,
            ..Default::default()
        };
        assert_eq!(inputs.screen_loading_index(), 0.0);
    }

    #[test]
    fn row_count_matches_dataset() {
        let ds = Dataset::from_records(vec![scenario_record(); 5]);
        assert_eq!(derive_kpis(&ds, &ManualInputs::default()).len(), 5);
        assert!(derive_kpis(&Dataset::default(), &ManualInputs::default()).is_empty());
    }

    fn two_wells() -> Dataset {
        let mut b = scenario_record();
        b.well_name = Some("B".into());
        b.int_length = Some(150.0);
        b.drilling_hours = Some(36.0);
        let mut a = scenario_record();
        a.drilling_hours = Some(12.0);
        Dataset::from_records(vec![a, b])
    }

    #[test]
    fn divisors_per_unit() {
        let ds = two_wells();
        assert_eq!(normalization_divisor(NormalizationUnit::None, &ds), None);
        assert_eq!(normalization_divisor(NormalizationUnit::Feet, &ds), Some(200.0));
        assert_eq!(normalization_divisor(NormalizationUnit::Hours, &ds), Some(48.0));
        assert_eq!(normalization_divisor(NormalizationUnit::Days, &ds), Some(2.0));
    }

    #[test]
    fn normalize_divides_kpi_columns_only() {
        let ds = two_wells();
        let raw = derive_kpis(&ds, &ManualInputs::default());
        let scaled = normalize(raw.clone(), NormalizationUnit::Days, &ds);
        for (r, s) in raw.iter().zip(&scaled) {
            assert_eq!(r.well_name, s.well_name);
            assert_eq!(r.operator, s.operator);
            for kpi in Kpi::ALL {
                assert!(close(s.value(kpi), r.value(kpi) / 2.0));
            }
        }
    }

    #[test]
    fn normalize_is_noop_without_divisor() {
        let ds = Dataset::from_records(vec![scenario_record()]);
        let raw = derive_kpis(&ds, &ManualInputs::default());
        assert_eq!(normalize(raw.clone(), NormalizationUnit::None, &ds), raw);
        // No Drilling_Hours column at all.
        assert_eq!(normalize(raw.clone(), NormalizationUnit::Hours, &ds), raw);

        let mut zero = scenario_record();
        zero.int_length = Some(0.0);
        let ds = Dataset::from_records(vec![zero]);
        let raw = derive_kpis(&ds, &ManualInputs::default());
        assert_eq!(normalize(raw.clone(), NormalizationUnit::Feet, &ds), raw);
    }

    #[test]
    fn means_and_correlation() {
        let ds = two_wells();
        let kpis = derive_kpis(&ds, &ManualInputs::default());
        let means = kpi_means(&kpis);
        assert_eq!(means.len(), 9);
        assert_eq!(means[1].kpi, "Cuttings Volume Ratio");
        // (2.0 + 100/150) / 2
        assert!(close(means[1].mean, (2.0 + 100.0 / 150.0) / 2.0));

        let corr = correlation_matrix(&kpis);
        assert_eq!(corr.labels.len(), 9);
        let r = corr
            .get(Kpi::CuttingsVolumeRatio, Kpi::ChemicalDemandRate)
            .unwrap();
        assert!(close(r, 1.0));
        // Screen loading index is constant across rows.
        assert_eq!(corr.get(Kpi::ScreenLoadingIndex, Kpi::CuttingsVolumeRatio), None);
        let (_, _, top) = corr.strongest_pair().unwrap();
        assert!(close(top.abs(), 1.0));
    }

    #[test]
    fn empty_table_means_are_zero() {
        assert!(kpi_means(&[]).iter().all(|m| m.mean == 0.0));
        let corr = correlation_matrix(&[]);
        assert!(corr.values.iter().flatten().all(Option::is_none));
    }
}
