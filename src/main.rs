// Entry point and page dispatch.
//
// With `--page` the selected page is rendered once and the process exits.
// Otherwise a numbered menu runs:
// - Option [1] loads the well CSV and prints load diagnostics.
// - Options [2]-[6] render one page; [7] renders all of them.
// - After rendering, the user can go back to the menu or exit.
mod cli;
mod config;
mod cost;
mod error;
mod filters;
mod kpi;
mod loader;
mod output;
mod reports;
mod types;
mod util;

use clap::Parser;
use cli::{Args, Page};
use config::DashboardConfig;
use error::{DashboardError, Result};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};
use types::{
    ContractorDiscardRow, CostSummary, Dataset, Field, KpiRecord, MonthlyRopRow, MonthlyWellsRow,
    OperatorFluidRow, OperatorRopRow, RadarRow,
};

// The loaded dataset survives between menu choices so the CSV is read once.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Dataset>,
}

fn app_state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Everything fixed at startup.
struct Session {
    input: PathBuf,
    output_dir: PathBuf,
    config: DashboardConfig,
}

impl Session {
    fn export_path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }
}

fn setup_logging(args: &Args) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("prodigy_iq={}", args.log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .compact(),
        )
        .init();
}

/// Read one trimmed line after the menu prompt; `None` on end of input.
fn read_choice() -> Option<String> {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` for `Y`, `false` for `N` or end of input.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Page Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        match io::stdin().read_line(&mut buf) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Option [1]: load the CSV into `APP_STATE` and print diagnostics.
fn handle_load(session: &Session) -> Result<()> {
    let (data, report) = loader::load_dataset(&session.input)?;
    println!(
        "Processing dataset... ({} rows read, {} loaded)",
        util::format_int(report.total_rows),
        util::format_int(report.loaded_rows)
    );
    if report.parse_errors > 0 {
        println!(
            "Note: {} rows skipped due to parse errors.",
            util::format_int(report.parse_errors)
        );
    }
    if report.unparsed_numbers + report.unparsed_dates > 0 {
        println!(
            "Info: {} numeric and {} date cells could not be parsed and were left empty.",
            util::format_int(report.unparsed_numbers),
            util::format_int(report.unparsed_dates)
        );
    }
    println!("Columns: {}", data.columns().join(", "));
    let (min_year, max_year) = filters::year_bounds(&data);
    println!("TD_Date years: {min_year}-{max_year}");
    for field in [Field::Operator, Field::Contractor, Field::FlowlineShakers] {
        let options = filters::category_options(&data, field);
        println!("{}: {} distinct values", field.column(), util::format_int(options.len()));
    }
    println!();
    app_state().data = Some(data);
    Ok(())
}

fn loaded_dataset() -> Result<Dataset> {
    app_state().data.clone().ok_or(DashboardError::NoDataLoaded)
}

fn render(session: &Session, page: Page) -> Result<()> {
    let data = loaded_dataset()?;
    let filtered = filters::apply_filters(&data, &session.config.filters);
    info!(
        page = page.title(),
        rows = data.len(),
        filtered = filtered.len(),
        "Rendering page"
    );
    match page {
        Page::All => {
            for page in Page::PAGES {
                render_filtered(session, page, &filtered)?;
            }
            Ok(())
        }
        page => render_filtered(session, page, &filtered),
    }
}

fn render_filtered(session: &Session, page: Page, filtered: &Dataset) -> Result<()> {
    println!("== {} ==\n", page.title());
    if filtered.is_empty() {
        warn!(page = page.title(), "Filters left no rows");
        println!("No data available\n");
        return write_empty_exports(session, page);
    }
    match page {
        Page::MultiWell => multi_well_page(session, filtered),
        Page::Sales => sales_page(session, filtered),
        Page::Advanced => advanced_page(session, filtered),
        Page::Cost => cost_page(session, filtered),
        Page::Executive => executive_page(session, filtered),
        Page::All => Ok(()),
    }
}

/// Header-only CSVs for the tables a page would have exported.
fn write_empty_exports(session: &Session, page: Page) -> Result<()> {
    let path = |file: &str| session.export_path(file);
    match page {
        Page::MultiWell => output::write_csv::<RadarRow>(&path(MULTI_WELL_FILE), &[]),
        Page::Sales => {
            output::write_csv::<MonthlyWellsRow>(&path(MONTHLY_WELLS_FILE), &[])?;
            output::write_csv::<MonthlyRopRow>(&path(MONTHLY_ROP_FILE), &[])?;
            output::write_csv::<ContractorDiscardRow>(&path(CONTRACTOR_FILE), &[])?;
            output::write_csv::<OperatorFluidRow>(&path(FLUIDS_FILE), &[])
        }
        Page::Advanced => output::write_csv::<KpiRecord>(&path(ADVANCED_FILE), &[]),
        Page::Cost => output::write_csv::<CostSummary>(&path(COST_FILE), &[]),
        Page::Executive => output::write_csv::<OperatorRopRow>(&path(OPERATOR_ROP_FILE), &[]),
        Page::All => Ok(()),
    }
}

const MULTI_WELL_FILE: &str = "multi_well_radar.csv";
const MONTHLY_WELLS_FILE: &str = "sales_monthly_wells.csv";
const MONTHLY_ROP_FILE: &str = "sales_monthly_rop.csv";
const CONTRACTOR_FILE: &str = "sales_contractor_discard.csv";
const FLUIDS_FILE: &str = "sales_operator_fluids.csv";
const ADVANCED_FILE: &str = "filtered_advanced_metrics.csv";
const CORRELATION_FILE: &str = "kpi_correlation.csv";
const COST_FILE: &str = "cost_summary.csv";
const SUMMARY_TEXT_FILE: &str = "executive_summary.txt";
const SUMMARY_JSON_FILE: &str = "executive_summary.json";
const OPERATOR_ROP_FILE: &str = "executive_rop_by_operator.csv";

fn export<T>(session: &Session, file: &str, rows: &[T]) -> Result<()>
where
    T: serde::Serialize + tabled::Tabled,
{
    output::write_csv(&session.export_path(file), rows)?;
    println!("(Full table exported to {})\n", file);
    Ok(())
}

fn multi_well_page(session: &Session, data: &Dataset) -> Result<()> {
    println!("Average Metrics");
    output::preview_table_rows(&[reports::multi_well_summary(data)], 1);

    let radar = reports::radar_rows(data);
    println!("Per-Well Radar Metrics");
    output::preview_table_rows(&radar, 10);
    export(session, MULTI_WELL_FILE, &radar)
}

fn sales_page(session: &Session, data: &Dataset) -> Result<()> {
    let wells = reports::monthly_wells(data);
    println!("Wells Completed per Month");
    output::preview_table_rows(&wells, 12);
    export(session, MONTHLY_WELLS_FILE, &wells)?;

    let rop = reports::monthly_rop(data);
    println!("Average ROP per Month");
    output::preview_table_rows(&rop, 12);
    export(session, MONTHLY_ROP_FILE, &rop)?;

    let discard = reports::contractor_discard(data);
    println!("Discard Ratio by Contractor");
    output::preview_table_rows(&discard, 10);
    export(session, CONTRACTOR_FILE, &discard)?;

    let fluids = reports::operator_fluids(data);
    println!("Fluid Consumption by Operator");
    output::preview_table_rows(&fluids, 10);
    export(session, FLUIDS_FILE, &fluids)
}

fn advanced_page(session: &Session, data: &Dataset) -> Result<()> {
    let config = &session.config;
    let derived = kpi::derive_kpis(data, &config.manual_inputs);
    let kpis = kpi::normalize(derived, config.normalization, data);

    println!("Derived KPIs (normalization: {:?})", config.normalization);
    output::preview_table_rows(&kpis, 5);
    export(session, ADVANCED_FILE, &kpis)?;

    println!("KPI Means");
    output::preview_table_rows(&kpi::kpi_means(&kpis), types::Kpi::ALL.len());

    let matrix = kpi::correlation_matrix(&kpis);
    println!("KPI Correlation");
    println!("{}\n", output::correlation_table(&matrix));
    if let Some((a, b, r)) = matrix.strongest_pair() {
        println!("Strongest correlation: {} vs {} (r = {:.2})\n", a.label(), b.label(), r);
    }
    output::write_correlation_csv(&session.export_path(CORRELATION_FILE), &matrix)?;
    println!("(Correlation matrix exported to {})\n", CORRELATION_FILE);
    Ok(())
}

fn cost_page(session: &Session, data: &Dataset) -> Result<()> {
    let comparison = cost::compare_costs(data, &session.config.cost);
    println!("Cost Comparison");
    let rows = comparison.rows();
    output::preview_table_rows(&rows, rows.len());
    for summary in &rows {
        let parts: Vec<String> = summary
            .components()
            .iter()
            .map(|(name, value)| format!("{name} ${}", util::format_number(*value, 2)))
            .collect();
        println!("{}: {}", summary.label, parts.join(", "));
    }
    println!();

    let delta = comparison.delta;
    let verdict = if delta.total_cost < 0.0 {
        "cheaper"
    } else {
        "more expensive"
    };
    println!(
        "{} is {} than {} by ${} total (${}/ft)\n",
        comparison.secondary.label,
        verdict,
        comparison.primary.label,
        util::format_number(delta.total_cost.abs(), 2),
        util::format_number(delta.cost_per_ft.abs(), 2)
    );
    export(session, COST_FILE, &rows)
}

fn executive_page(session: &Session, data: &Dataset) -> Result<()> {
    let summary = reports::generate_executive_summary(data);
    let text = reports::executive_summary_text(&summary);
    println!("{}", text);
    output::write_text(&session.export_path(SUMMARY_TEXT_FILE), &text)?;
    output::write_json(&session.export_path(SUMMARY_JSON_FILE), &summary)?;
    println!("(Summary saved to {} and {})\n", SUMMARY_TEXT_FILE, SUMMARY_JSON_FILE);

    let rop = reports::operator_rop(data);
    println!("Average ROP by Operator");
    output::preview_table_rows(&rop, 10);
    export(session, OPERATOR_ROP_FILE, &rop)
}

fn menu_page(choice: &str) -> Option<Page> {
    match choice {
        "2" => Some(Page::MultiWell),
        "3" => Some(Page::Sales),
        "4" => Some(Page::Advanced),
        "5" => Some(Page::Cost),
        "6" => Some(Page::Executive),
        "7" => Some(Page::All),
        _ => None,
    }
}

fn run_menu(session: &Session) {
    loop {
        println!("Select Page:");
        println!("[1] Load the file");
        for (n, page) in (2..).zip(Page::PAGES.into_iter().chain([Page::All])) {
            println!("[{}] {}", n, page.title());
        }
        println!();
        let Some(choice) = read_choice() else {
            println!("Exiting the program.");
            break;
        };
        if choice == "1" {
            if let Err(e) = handle_load(session) {
                eprintln!("Failed to load file: {}\n", e);
            }
            continue;
        }
        let Some(page) = menu_page(&choice) else {
            println!("Invalid choice. Please enter 1-7.\n");
            continue;
        };
        println!();
        if let Err(e) = render(session, page) {
            eprintln!("Error: {}\n", e);
        }
        if !prompt_back_to_menu() {
            println!("Exiting the program.");
            break;
        }
    }
}

fn run_once(session: &Session, page: Page) -> Result<()> {
    handle_load(session)?;
    render(session, page)
}

fn startup(args: &Args) -> Result<Session> {
    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(unit) = args.normalize {
        config.normalization = unit;
    }
    ensure_dir(&args.output_dir)?;
    Ok(Session {
        input: args.input.clone(),
        output_dir: args.output_dir.clone(),
        config,
    })
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args);

    let session = match startup(&args) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Startup failed");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.page {
        Some(page) => match run_once(&session, page) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "Page render failed");
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
        None => {
            run_menu(&session);
            ExitCode::SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::Record;

    fn session(dir: &Path) -> Session {
        Session {
            input: dir.join("wells.csv"),
            output_dir: dir.to_path_buf(),
            config: DashboardConfig::default(),
        }
    }

    #[test]
    fn menu_numbers_map_to_pages() {
        assert_eq!(menu_page("2"), Some(Page::MultiWell));
        assert_eq!(menu_page("7"), Some(Page::All));
        assert_eq!(menu_page("1"), None);
        assert_eq!(menu_page("x"), None);
    }

    #[test]
    fn empty_pages_write_header_only_exports() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(dir.path());
        render_filtered(&s, Page::Cost, &Dataset::default()).unwrap();
        let text = std::fs::read_to_string(dir.path().join(COST_FILE)).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Label,Cost/ft,Total Cost,"));

        render_filtered(&s, Page::Executive, &Dataset::default()).unwrap();
        let rop = std::fs::read_to_string(dir.path().join(OPERATOR_ROP_FILE)).unwrap();
        assert_eq!(rop, "Operator,ROP\n");
    }

    #[test]
    fn pages_export_their_tables() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(dir.path());
        let data = Dataset::from_records(vec![Record {
            well_name: Some("W1".into()),
            operator: Some("Op1".into()),
            flowline_shakers: Some("Derrick FLC".into()),
            rop: Some(60.0),
            int_length: Some(1000.0),
            haul_off: Some(40.0),
            ..Default::default()
        }]);
        for page in Page::PAGES {
            render_filtered(&s, page, &data).unwrap();
        }
        for file in [
            ADVANCED_FILE,
            CORRELATION_FILE,
            COST_FILE,
            SUMMARY_JSON_FILE,
            MULTI_WELL_FILE,
            OPERATOR_ROP_FILE,
        ] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }
        let rop = std::fs::read_to_string(dir.path().join(OPERATOR_ROP_FILE)).unwrap();
        assert_eq!(rop, "Operator,ROP\nOp1,60.0\n");
        let advanced = std::fs::read_to_string(dir.path().join(ADVANCED_FILE)).unwrap();
        assert_eq!(advanced.lines().count(), 2);
        assert!(advanced.lines().nth(1).unwrap().starts_with("W1,Op1,"));
    }
}
