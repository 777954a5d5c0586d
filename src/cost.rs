//! Cost estimator: compares the running cost of two shaker categories.

use crate::filters::{narrow, Selection};
use crate::types::{CostDelta, CostSummary, Dataset, Field, Record};
use crate::util::{mean_present, safe_div, sum_present};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Unit rates for one category. Both categories start from the same
/// defaults but are configured independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// $ per unit of total dilution.
    pub dilution_rate: f64,
    /// $ per unit of haul-off.
    pub haul_rate: f64,
    pub screen_price: f64,
    pub num_screens: f64,
    pub equipment_cost: f64,
    pub num_shakers: f64,
    pub shaker_life_years: f64,
    pub engineering_cost: f64,
    pub other_cost: f64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            dilution_rate: 100.0,
            haul_rate: 20.0,
            screen_price: 500.0,
            num_screens: 1.0,
            equipment_cost: 100_000.0,
            num_shakers: 3.0,
            shaker_life_years: 7.0,
            engineering_cost: 1000.0,
            other_cost: 500.0,
        }
    }
}

impl RateConfig {
    /// Annualised equipment cost; zero for a non-positive shaker life.
    pub fn equipment(&self) -> f64 {
        if self.shaker_life_years > 0.0 {
            safe_div(self.equipment_cost * self.num_shakers, self.shaker_life_years)
        } else {
            0.0
        }
    }
}

/// Cost summary for the rows of `dataset` that satisfy `predicate`.
pub fn estimate_cost<P>(
    dataset: &Dataset,
    predicate: P,
    rates: &RateConfig,
    label: &str,
) -> CostSummary
where
    P: Fn(&Record) -> bool,
{
    summarize_cost(&split(dataset, predicate), rates, label)
}

pub fn split<P>(dataset: &Dataset, predicate: P) -> Dataset
where
    P: Fn(&Record) -> bool,
{
    let rows = dataset
        .records()
        .iter()
        .filter(|r| predicate(*r))
        .cloned()
        .collect();
    dataset.with_records(rows)
}

/// Cost summary over every row of `subset`.
pub fn summarize_cost(subset: &Dataset, rates: &RateConfig, label: &str) -> CostSummary {
    let total_dil = sum_present(subset.numbers(Field::TotalDil));
    let haul_off = sum_present(subset.numbers(Field::HaulOff));
    let int_length = sum_present(subset.numbers(Field::IntLength));

    let dilution = rates.dilution_rate * total_dil;
    let haul = rates.haul_rate * haul_off;
    let screen = rates.screen_price * rates.num_screens;
    let equipment = rates.equipment();
    let total = dilution + haul + screen + equipment + rates.engineering_cost + rates.other_cost;

    let depth = subset
        .numbers(Field::MdDepth)
        .flatten()
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(0.0);

    let summary = CostSummary {
        label: label.to_string(),
        cost_per_ft: safe_div(total, int_length),
        total_cost: total,
        dilution,
        haul,
        screen,
        equipment,
        engineering: rates.engineering_cost,
        other: rates.other_cost,
        avg_lgs_pct: mean_present(subset.numbers(Field::Lgs)).unwrap_or(0.0) * 100.0,
        dsre_pct: mean_present(subset.numbers(Field::Dsre)).unwrap_or(0.0) * 100.0,
        depth,
    };
    debug!(label, rows = subset.len(), total = summary.total_cost, "Estimated cost");
    summary
}

/// The category split used by the dashboard: shaker name contains a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShakerSplit {
    pub marker: String,
}

impl ShakerSplit {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// A well without a shaker entry never matches.
    pub fn is_primary(&self, record: &Record) -> bool {
        record
            .flowline_shakers
            .as_deref()
            .is_some_and(|s| s.contains(self.marker.as_str()))
    }
}

/// Per-category narrowing applied after the split, in field order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySelection {
    pub shaker: Selection,
    pub operator: Selection,
    pub contractor: Selection,
    pub well: Selection,
}

impl CategorySelection {
    pub fn apply(&self, subset: &Dataset) -> Dataset {
        [
            (Field::FlowlineShakers, &self.shaker),
            (Field::Operator, &self.operator),
            (Field::Contractor, &self.contractor),
            (Field::WellName, &self.well),
        ]
        .into_iter()
        .fold(subset.clone(), |ds, (field, selection)| narrow(&ds, field, selection))
    }
}

/// Rates and narrowing for one side of the comparison.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub rates: RateConfig,
    pub selection: CategorySelection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Substring of `flowline_Shakers` that puts a well in the primary category.
    pub marker: String,
    pub primary_label: String,
    pub secondary_label: String,
    pub primary: CategoryConfig,
    pub secondary: CategoryConfig,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            marker: "Derrick".to_string(),
            primary_label: "Derrick".to_string(),
            secondary_label: "Non-Derrick".to_string(),
            primary: CategoryConfig::default(),
            secondary: CategoryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostComparison {
    pub primary: CostSummary,
    pub secondary: CostSummary,
    pub delta: CostDelta,
}

impl CostComparison {
    pub fn rows(&self) -> Vec<CostSummary> {
        vec![self.primary.clone(), self.secondary.clone()]
    }
}

pub fn cost_delta(primary: &CostSummary, secondary: &CostSummary) -> CostDelta {
    CostDelta {
        total_cost: secondary.total_cost - primary.total_cost,
        cost_per_ft: secondary.cost_per_ft - primary.cost_per_ft,
    }
}

/// Narrow, split and price both categories of an already filtered dataset.
pub fn compare_costs(dataset: &Dataset, config: &CostConfig) -> CostComparison {
    let splitter = ShakerSplit::new(config.marker.as_str());
    let primary = estimate_cost(
        &config.primary.selection.apply(dataset),
        |r| splitter.is_primary(r),
        &config.primary.rates,
        &config.primary_label,
    );
    let secondary = estimate_cost(
        &config.secondary.selection.apply(dataset),
        |r| !splitter.is_primary(r),
        &config.secondary.rates,
        &config.secondary_label,
    );
    let delta = cost_delta(&primary, &secondary);
    info!(
        marker = config.marker.as_str(),
        delta_total = delta.total_cost,
        "Compared category costs"
    );
    CostComparison {
        primary,
        secondary,
        delta,
    }
}
