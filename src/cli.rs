//! Command-line arguments.

use crate::kpi::NormalizationUnit;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Drilling fluids KPI dashboard: filters a well dataset and renders the
/// multi-well, sales, advanced analysis, cost and executive pages.
#[derive(Debug, Clone, Parser)]
#[command(name = "prodigy-iq", version, about)]
pub struct Args {
    /// Well dataset CSV
    #[arg(short = 'i', long = "input", value_name = "PATH", default_value = "Refine Sample.csv")]
    pub input: PathBuf,

    /// Dashboard config (TOML); overrides $PRODIGY_CONFIG and ./dashboard.toml
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory for exported CSV/JSON/text files
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Render one page and exit instead of showing the menu
    #[arg(short = 'p', long = "page", value_enum)]
    pub page: Option<Page>,

    /// Override the configured KPI normalization unit
    #[arg(long = "normalize", value_enum)]
    pub normalize: Option<NormalizationUnit>,

    /// Log level used when RUST_LOG is not set
    #[arg(
        long = "log-level",
        default_value = "info",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Page {
    MultiWell,
    Sales,
    Advanced,
    Cost,
    Executive,
    All,
}

impl Page {
    pub const PAGES: [Page; 5] = [
        Page::MultiWell,
        Page::Sales,
        Page::Advanced,
        Page::Cost,
        Page::Executive,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::MultiWell => "Multi-Well Comparison",
            Page::Sales => "Sales Analysis",
            Page::Advanced => "Advanced Analysis",
            Page::Cost => "Cost Estimator",
            Page::Executive => "Executive Summary",
            Page::All => "All Pages",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dashboard() {
        let args = Args::try_parse_from(["prodigy-iq"]).unwrap();
        assert_eq!(args.input, PathBuf::from("Refine Sample.csv"));
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!(args.page, None);
        assert_eq!(args.normalize, None);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn parses_page_and_normalization() {
        let args = Args::try_parse_from([
            "prodigy-iq",
            "--page",
            "multi-well",
            "--normalize",
            "days",
            "--output-dir",
            "out",
        ])
        .unwrap();
        assert_eq!(args.page, Some(Page::MultiWell));
        assert_eq!(args.normalize, Some(NormalizationUnit::Days));
        assert_eq!(args.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(Args::try_parse_from(["prodigy-iq", "--log-level", "loud"]).is_err());
    }
}
