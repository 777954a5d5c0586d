use crate::util::{display_2dp, display_opt_2dp};
use chrono::NaiveDate;
use serde::Serialize;
use tabled::Tabled;

/// Source columns the dashboard understands.
///
/// Anything else in the CSV is carried through untouched in
/// [`Record::extra`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    WellName,
    Operator,
    Contractor,
    FlowlineShakers,
    HoleSize,
    HaulOff,
    IntLength,
    TotalSce,
    BaseOil,
    Water,
    Chemicals,
    Rop,
    DrillingHours,
    TdDate,
    MdDepth,
    Amw,
    TotalDil,
    Lgs,
    Dsre,
    DilutionRatio,
    DiscardRatio,
    WellCoordLat,
    WellCoordLon,
}

impl Field {
    pub const ALL: [Field; 23] = [
        Field::WellName,
        Field::Operator,
        Field::Contractor,
        Field::FlowlineShakers,
        Field::HoleSize,
        Field::HaulOff,
        Field::IntLength,
        Field::TotalSce,
        Field::BaseOil,
        Field::Water,
        Field::Chemicals,
        Field::Rop,
        Field::DrillingHours,
        Field::TdDate,
        Field::MdDepth,
        Field::Amw,
        Field::TotalDil,
        Field::Lgs,
        Field::Dsre,
        Field::DilutionRatio,
        Field::DiscardRatio,
        Field::WellCoordLat,
        Field::WellCoordLon,
    ];

    /// Canonical column name.
    pub fn column(self) -> &'static str {
        match self {
            Field::WellName => "Well_Name",
            Field::Operator => "Operator",
            Field::Contractor => "Contractor",
            Field::FlowlineShakers => "flowline_Shakers",
            Field::HoleSize => "Hole_Size",
            Field::HaulOff => "Haul_OFF",
            Field::IntLength => "IntLength",
            Field::TotalSce => "Total_SCE",
            Field::BaseOil => "Base_Oil",
            Field::Water => "Water",
            Field::Chemicals => "Chemicals",
            Field::Rop => "ROP",
            Field::DrillingHours => "Drilling_Hours",
            Field::TdDate => "TD_Date",
            Field::MdDepth => "MD_Depth",
            Field::Amw => "AMW",
            Field::TotalDil => "Total_Dil",
            Field::Lgs => "LGS",
            Field::Dsre => "DSRE",
            Field::DilutionRatio => "Dilution_Ratio",
            Field::DiscardRatio => "Discard Ratio",
            Field::WellCoordLat => "Well_Coord_Lat",
            Field::WellCoordLon => "Well_Coord_Lon",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::MdDepth => &["MD Depth"],
            Field::DiscardRatio => &["Discard_Ratio"],
            _ => &[],
        }
    }

    /// Resolve a CSV header (canonical name or known alias).
    pub fn from_header(header: &str) -> Option<Field> {
        let header = header.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.column() == header || f.aliases().contains(&header))
    }

    pub fn is_text(self) -> bool {
        matches!(
            self,
            Field::WellName | Field::Operator | Field::Contractor | Field::FlowlineShakers
        )
    }

    /// Value used by the KPI deriver when a numeric field is missing.
    ///
    /// Hole size falls back to 1 so a well without one divides by 1, not 0.
    pub fn default_number(self) -> f64 {
        match self {
            Field::HoleSize => 1.0,
            _ => 0.0,
        }
    }
}

/// One well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub well_name: Option<String>,
    pub operator: Option<String>,
    pub contractor: Option<String>,
    pub flowline_shakers: Option<String>,
    pub hole_size: Option<f64>,
    pub haul_off: Option<f64>,
    pub int_length: Option<f64>,
    pub total_sce: Option<f64>,
    pub base_oil: Option<f64>,
    pub water: Option<f64>,
    pub chemicals: Option<f64>,
    pub rop: Option<f64>,
    pub drilling_hours: Option<f64>,
    pub td_date: Option<NaiveDate>,
    pub md_depth: Option<f64>,
    pub amw: Option<f64>,
    pub total_dil: Option<f64>,
    pub lgs: Option<f64>,
    pub dsre: Option<f64>,
    pub dilution_ratio: Option<f64>,
    pub discard_ratio: Option<f64>,
    pub well_coord_lat: Option<f64>,
    pub well_coord_lon: Option<f64>,
    /// Columns the dashboard does not interpret, in source order.
    pub extra: Vec<(String, String)>,
}

impl Record {
    fn number_slot(&mut self, field: Field) -> Option<&mut Option<f64>> {
        Some(match field {
            Field::HoleSize => &mut self.hole_size,
            Field::HaulOff => &mut self.haul_off,
            Field::IntLength => &mut self.int_length,
            Field::TotalSce => &mut self.total_sce,
            Field::BaseOil => &mut self.base_oil,
            Field::Water => &mut self.water,
            Field::Chemicals => &mut self.chemicals,
            Field::Rop => &mut self.rop,
            Field::DrillingHours => &mut self.drilling_hours,
            Field::MdDepth => &mut self.md_depth,
            Field::Amw => &mut self.amw,
            Field::TotalDil => &mut self.total_dil,
            Field::Lgs => &mut self.lgs,
            Field::Dsre => &mut self.dsre,
            Field::DilutionRatio => &mut self.dilution_ratio,
            Field::DiscardRatio => &mut self.discard_ratio,
            Field::WellCoordLat => &mut self.well_coord_lat,
            Field::WellCoordLon => &mut self.well_coord_lon,
            _ => return None,
        })
    }

    fn text_slot(&mut self, field: Field) -> Option<&mut Option<String>> {
        Some(match field {
            Field::WellName => &mut self.well_name,
            Field::Operator => &mut self.operator,
            Field::Contractor => &mut self.contractor,
            Field::FlowlineShakers => &mut self.flowline_shakers,
            _ => return None,
        })
    }

    /// Numeric value of `field`; `None` for missing values and text fields.
    pub fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::HoleSize => self.hole_size,
            Field::HaulOff => self.haul_off,
            Field::IntLength => self.int_length,
            Field::TotalSce => self.total_sce,
            Field::BaseOil => self.base_oil,
            Field::Water => self.water,
            Field::Chemicals => self.chemicals,
            Field::Rop => self.rop,
            Field::DrillingHours => self.drilling_hours,
            Field::MdDepth => self.md_depth,
            Field::Amw => self.amw,
            Field::TotalDil => self.total_dil,
            Field::Lgs => self.lgs,
            Field::Dsre => self.dsre,
            Field::DilutionRatio => self.dilution_ratio,
            Field::DiscardRatio => self.discard_ratio,
            Field::WellCoordLat => self.well_coord_lat,
            Field::WellCoordLon => self.well_coord_lon,
            _ => None,
        }
    }

    pub fn number_or_default(&self, field: Field) -> f64 {
        self.number(field).unwrap_or_else(|| field.default_number())
    }

    /// String form of `field`, as shown to the user and compared by the
    /// categorical filters.
    pub fn text(&self, field: Field) -> Option<String> {
        match field {
            Field::WellName => self.well_name.clone(),
            Field::Operator => self.operator.clone(),
            Field::Contractor => self.contractor.clone(),
            Field::FlowlineShakers => self.flowline_shakers.clone(),
            Field::TdDate => self.td_date.map(|d| d.format("%Y-%m-%d").to_string()),
            _ => self.number(field).map(|v| v.to_string()),
        }
    }

    pub fn set_number(&mut self, field: Field, value: Option<f64>) {
        if let Some(slot) = self.number_slot(field) {
            *slot = value;
        }
    }

    pub fn set_text(&mut self, field: Field, value: Option<String>) {
        if let Some(slot) = self.text_slot(field) {
            *slot = value;
        }
    }

    /// String forms of every present value, known fields first.
    pub fn display_values(&self) -> impl Iterator<Item = String> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(move |f| self.text(f))
            .chain(self.extra.iter().map(|(_, v)| v.clone()))
    }
}

/// An ordered set of wells plus the columns its source carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Build a dataset whose columns are every known field that has a value
    /// in at least one record, plus the extra columns.
    #[cfg(test)]
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Field::ALL
            .into_iter()
            .filter(|f| records.iter().any(|r| r.text(*f).is_some()))
            .map(|f| f.column().to_string())
            .collect();
        for r in &records {
            for (name, _) in &r.extra {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }
        Self { columns, records }
    }

    /// Same columns, different rows.
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            columns: self.columns.clone(),
            records,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.columns.iter().any(|c| c == field.column())
    }

    pub fn numbers(&self, field: Field) -> impl Iterator<Item = Option<f64>> + '_ {
        self.records.iter().map(move |r| r.number(field))
    }
}

/// The nine derived KPIs, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kpi {
    ShakerThroughputEfficiency,
    CuttingsVolumeRatio,
    ScreenLoadingIndex,
    FluidRetentionOnCuttings,
    DrillingIntensityIndex,
    FluidLoadingIndex,
    ChemicalDemandRate,
    MudRetentionEfficiency,
    DownstreamSolidsLoss,
}

impl Kpi {
    pub const ALL: [Kpi; 9] = [
        Kpi::ShakerThroughputEfficiency,
        Kpi::CuttingsVolumeRatio,
        Kpi::ScreenLoadingIndex,
        Kpi::FluidRetentionOnCuttings,
        Kpi::DrillingIntensityIndex,
        Kpi::FluidLoadingIndex,
        Kpi::ChemicalDemandRate,
        Kpi::MudRetentionEfficiency,
        Kpi::DownstreamSolidsLoss,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Kpi::ShakerThroughputEfficiency => "Shaker Throughput Efficiency",
            Kpi::CuttingsVolumeRatio => "Cuttings Volume Ratio",
            Kpi::ScreenLoadingIndex => "Screen Loading Index",
            Kpi::FluidRetentionOnCuttings => "Fluid Retention on Cuttings (%)",
            Kpi::DrillingIntensityIndex => "Drilling Intensity Index",
            Kpi::FluidLoadingIndex => "Fluid Loading Index",
            Kpi::ChemicalDemandRate => "Chemical Demand Rate",
            Kpi::MudRetentionEfficiency => "Mud Retention Efficiency (%)",
            Kpi::DownstreamSolidsLoss => "Downstream Solids Loss",
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct KpiRecord {
    #[serde(rename = "Well_Name")]
    #[tabled(rename = "Well_Name")]
    pub well_name: String,
    #[serde(rename = "Operator")]
    #[tabled(rename = "Operator")]
    pub operator: String,
    #[serde(rename = "Shaker Throughput Efficiency")]
    #[tabled(rename = "Shaker Throughput Efficiency", display_with = "display_2dp")]
    pub shaker_throughput_efficiency: f64,
    #[serde(rename = "Cuttings Volume Ratio")]
    #[tabled(rename = "Cuttings Volume Ratio", display_with = "display_2dp")]
    pub cuttings_volume_ratio: f64,
    #[serde(rename = "Screen Loading Index")]
    #[tabled(rename = "Screen Loading Index", display_with = "display_2dp")]
    pub screen_loading_index: f64,
    #[serde(rename = "Fluid Retention on Cuttings (%)")]
    #[tabled(rename = "Fluid Retention on Cuttings (%)", display_with = "display_2dp")]
    pub fluid_retention_on_cuttings_pct: f64,
    #[serde(rename = "Drilling Intensity Index")]
    #[tabled(rename = "Drilling Intensity Index", display_with = "display_2dp")]
    pub drilling_intensity_index: f64,
    #[serde(rename = "Fluid Loading Index")]
    #[tabled(rename = "Fluid Loading Index", display_with = "display_2dp")]
    pub fluid_loading_index: f64,
    #[serde(rename = "Chemical Demand Rate")]
    #[tabled(rename = "Chemical Demand Rate", display_with = "display_2dp")]
    pub chemical_demand_rate: f64,
    #[serde(rename = "Mud Retention Efficiency (%)")]
    #[tabled(rename = "Mud Retention Efficiency (%)", display_with = "display_2dp")]
    pub mud_retention_efficiency_pct: f64,
    #[serde(rename = "Downstream Solids Loss")]
    #[tabled(rename = "Downstream Solids Loss", display_with = "display_2dp")]
    pub downstream_solids_loss: f64,
}

impl KpiRecord {
    pub fn value(&self, kpi: Kpi) -> f64 {
        match kpi {
            Kpi::ShakerThroughputEfficiency => self.shaker_throughput_efficiency,
            Kpi::CuttingsVolumeRatio => self.cuttings_volume_ratio,
            Kpi::ScreenLoadingIndex => self.screen_loading_index,
            Kpi::FluidRetentionOnCuttings => self.fluid_retention_on_cuttings_pct,
            Kpi::DrillingIntensityIndex => self.drilling_intensity_index,
            Kpi::FluidLoadingIndex => self.fluid_loading_index,
            Kpi::ChemicalDemandRate => self.chemical_demand_rate,
            Kpi::MudRetentionEfficiency => self.mud_retention_efficiency_pct,
            Kpi::DownstreamSolidsLoss => self.downstream_solids_loss,
        }
    }

    /// Mutable access to the KPI columns (identity fields excluded).
    pub fn values_mut(&mut self) -> [&mut f64; 9] {
        [
            &mut self.shaker_throughput_efficiency,
            &mut self.cuttings_volume_ratio,
            &mut self.screen_loading_index,
            &mut self.fluid_retention_on_cuttings_pct,
            &mut self.drilling_intensity_index,
            &mut self.fluid_loading_index,
            &mut self.chemical_demand_rate,
            &mut self.mud_retention_efficiency_pct,
            &mut self.downstream_solids_loss,
        ]
    }
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct KpiMeanRow {
    #[serde(rename = "KPI")]
    #[tabled(rename = "KPI")]
    pub kpi: String,
    #[serde(rename = "Mean")]
    #[tabled(rename = "Mean", display_with = "display_2dp")]
    pub mean: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CostSummary {
    #[serde(rename = "Label")]
    #[tabled(rename = "Label")]
    pub label: String,
    #[serde(rename = "Cost/ft")]
    #[tabled(rename = "Cost/ft", display_with = "display_2dp")]
    pub cost_per_ft: f64,
    #[serde(rename = "Total Cost")]
    #[tabled(rename = "Total Cost", display_with = "display_2dp")]
    pub total_cost: f64,
    #[serde(rename = "Dilution")]
    #[tabled(rename = "Dilution", display_with = "display_2dp")]
    pub dilution: f64,
    #[serde(rename = "Haul")]
    #[tabled(rename = "Haul", display_with = "display_2dp")]
    pub haul: f64,
    #[serde(rename = "Screen")]
    #[tabled(rename = "Screen", display_with = "display_2dp")]
    pub screen: f64,
    #[serde(rename = "Equipment")]
    #[tabled(rename = "Equipment", display_with = "display_2dp")]
    pub equipment: f64,
    #[serde(rename = "Engineering")]
    #[tabled(rename = "Engineering", display_with = "display_2dp")]
    pub engineering: f64,
    #[serde(rename = "Other")]
    #[tabled(rename = "Other", display_with = "display_2dp")]
    pub other: f64,
    #[serde(rename = "Avg LGS%")]
    #[tabled(rename = "Avg LGS%", display_with = "display_2dp")]
    pub avg_lgs_pct: f64,
    #[serde(rename = "DSRE%")]
    #[tabled(rename = "DSRE%", display_with = "display_2dp")]
    pub dsre_pct: f64,
    #[serde(rename = "Depth")]
    #[tabled(rename = "Depth", display_with = "display_2dp")]
    pub depth: f64,
}

impl CostSummary {
    /// Named breakdown components in display order.
    pub fn components(&self) -> [(&'static str, f64); 6] {
        [
            ("Dilution", self.dilution),
            ("Haul", self.haul),
            ("Screen", self.screen),
            ("Equipment", self.equipment),
            ("Engineering", self.engineering),
            ("Other", self.other),
        ]
    }
}

/// Secondary minus primary category; negative means the secondary is cheaper.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct CostDelta {
    pub total_cost: f64,
    pub cost_per_ft: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct MultiWellSummary {
    #[serde(rename = "IntLength")]
    #[tabled(rename = "IntLength", display_with = "display_opt_2dp")]
    pub int_length: Option<f64>,
    #[serde(rename = "ROP")]
    #[tabled(rename = "ROP", display_with = "display_opt_2dp")]
    pub rop: Option<f64>,
    #[serde(rename = "Dilution Ratio")]
    #[tabled(rename = "Dilution Ratio", display_with = "display_opt_2dp")]
    pub dilution_ratio: Option<f64>,
    #[serde(rename = "Discard Ratio")]
    #[tabled(rename = "Discard Ratio", display_with = "display_opt_2dp")]
    pub discard_ratio: Option<f64>,
    #[serde(rename = "Haul OFF")]
    #[tabled(rename = "Haul OFF", display_with = "display_opt_2dp")]
    pub haul_off: Option<f64>,
    #[serde(rename = "AMW")]
    #[tabled(rename = "AMW", display_with = "display_opt_2dp")]
    pub amw: Option<f64>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct RadarRow {
    #[serde(rename = "Well_Name")]
    #[tabled(rename = "Well_Name")]
    pub well_name: String,
    #[serde(rename = "ROP")]
    #[tabled(rename = "ROP", display_with = "display_2dp")]
    pub rop: f64,
    #[serde(rename = "Dilution_Ratio")]
    #[tabled(rename = "Dilution_Ratio", display_with = "display_2dp")]
    pub dilution_ratio: f64,
    #[serde(rename = "Discard Ratio")]
    #[tabled(rename = "Discard Ratio", display_with = "display_2dp")]
    pub discard_ratio: f64,
    #[serde(rename = "AMW")]
    #[tabled(rename = "AMW", display_with = "display_2dp")]
    pub amw: f64,
    #[serde(rename = "Haul_OFF")]
    #[tabled(rename = "Haul_OFF", display_with = "display_2dp")]
    pub haul_off: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct MonthlyWellsRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "Well Count")]
    #[tabled(rename = "Well Count")]
    pub well_count: usize,
    #[serde(rename = "Cumulative Well Count")]
    #[tabled(rename = "Cumulative Well Count")]
    pub cumulative: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct MonthlyRopRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "ROP")]
    #[tabled(rename = "ROP", display_with = "display_2dp")]
    pub avg_rop: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct ContractorDiscardRow {
    #[serde(rename = "Contractor")]
    #[tabled(rename = "Contractor")]
    pub contractor: String,
    #[serde(rename = "Discard Ratio")]
    #[tabled(rename = "Discard Ratio", display_with = "display_2dp")]
    pub avg_discard_ratio: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct OperatorRopRow {
    #[serde(rename = "Operator")]
    #[tabled(rename = "Operator")]
    pub operator: String,
    #[serde(rename = "ROP")]
    #[tabled(rename = "ROP", display_with = "display_2dp")]
    pub avg_rop: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct OperatorFluidRow {
    #[serde(rename = "Operator")]
    #[tabled(rename = "Operator")]
    pub operator: String,
    #[serde(rename = "Base_Oil")]
    #[tabled(rename = "Base_Oil", display_with = "display_2dp")]
    pub base_oil: f64,
    #[serde(rename = "Water")]
    #[tabled(rename = "Water", display_with = "display_2dp")]
    pub water: f64,
    #[serde(rename = "Chemicals")]
    #[tabled(rename = "Chemicals", display_with = "display_2dp")]
    pub chemicals: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct WellRop {
    pub well_name: String,
    pub rop: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ExecutiveSummary {
    pub total_wells: usize,
    pub avg_rop: f64,
    pub avg_amw: f64,
    pub avg_dilution_ratio: f64,
    pub avg_discard_ratio: f64,
    pub fastest_well: WellRop,
    pub slowest_well: WellRop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_resolve_with_aliases() {
        assert_eq!(Field::from_header("MD Depth"), Some(Field::MdDepth));
        assert_eq!(Field::from_header("MD_Depth"), Some(Field::MdDepth));
        assert_eq!(Field::from_header(" Discard_Ratio "), Some(Field::DiscardRatio));
        assert_eq!(Field::from_header("County Code"), None);
    }

    #[test]
    fn hole_size_defaults_to_one_when_missing() {
        let r = Record::default();
        assert_eq!(r.number_or_default(Field::HoleSize), 1.0);
        assert_eq!(r.number_or_default(Field::IntLength), 0.0);

        let r = Record {
            hole_size: Some(0.0),
            ..Default::default()
        };
        assert_eq!(r.number_or_default(Field::HoleSize), 0.0);
    }

    #[test]
    fn text_renders_numbers_and_dates() {
        let r = Record {
            hole_size: Some(8.5),
            md_depth: Some(12000.0),
            td_date: NaiveDate::from_ymd_opt(2022, 1, 5),
            ..Default::default()
        };
        assert_eq!(r.text(Field::HoleSize).as_deref(), Some("8.5"));
        assert_eq!(r.text(Field::MdDepth).as_deref(), Some("12000"));
        assert_eq!(r.text(Field::TdDate).as_deref(), Some("2022-01-05"));
        assert_eq!(r.text(Field::Operator), None);
    }

    #[test]
    fn setters_ignore_mismatched_field_kinds() {
        let mut r = Record::default();
        r.set_number(Field::Operator, Some(3.0));
        r.set_text(Field::Rop, Some("fast".into()));
        assert_eq!(r, Record::default());
        r.set_number(Field::Rop, Some(3.0));
        assert_eq!(r.rop, Some(3.0));
    }

    #[test]
    fn from_records_tracks_present_columns() {
        let ds = Dataset::from_records(vec![Record {
            operator: Some("Op1".into()),
            extra: vec![("County Code".into(), "42".into())],
            ..Default::default()
        }]);
        assert!(ds.has_field(Field::Operator));
        assert!(!ds.has_field(Field::Amw));
        assert_eq!(ds.columns(), ["Operator", "County Code"]);
    }

    #[test]
    fn cost_components_match_fields() {
        let c = CostSummary {
            label: "X".into(),
            cost_per_ft: 0.0,
            total_cost: 21.0,
            dilution: 1.0,
            haul: 2.0,
            screen: 3.0,
            equipment: 4.0,
            engineering: 5.0,
            other: 6.0,
            avg_lgs_pct: 0.0,
            dsre_pct: 0.0,
            depth: 0.0,
        };
        let sum: f64 = c.components().iter().map(|(_, v)| v).sum();
        assert_eq!(sum, c.total_cost);
    }
}
