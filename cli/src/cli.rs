use std::path::PathBuf;

use incendios::IncidentFilter;

/// Wildfire incident explorer CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "incendios", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Lookup workbook (xlsx/xls/ods) or CSV with code -> label columns
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub lookups: Option<PathBuf>,

    /// JSON file overriding the candidate column names
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub aliases: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Describe the normalized dataset inside an archive
    Inspect(InspectArgs),

    /// Write the normalized (optionally filtered) table as CSV
    Export(ExportArgs),

    /// Print the yearly burned-area trend and the cause distribution
    Summary(SummaryArgs),

    /// Write capped incident markers as GeoJSON
    Map(MapArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// First year to include
    #[arg(long)]
    pub from_year: Option<i32>,

    /// Last year to include
    #[arg(long)]
    pub to_year: Option<i32>,

    /// Region label or code (repeatable)
    #[arg(long = "region")]
    pub regions: Vec<String>,

    /// Province label or code (repeatable)
    #[arg(long = "province")]
    pub provinces: Vec<String>,

    /// Cause label or code (repeatable)
    #[arg(long = "cause")]
    pub causes: Vec<String>,

    /// Minimum burned area in hectares
    #[arg(long)]
    pub min_area: Option<f64>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> IncidentFilter {
        let years = match (self.from_year, self.to_year) {
            (None, None) => None,
            (from, to) => Some((from.unwrap_or(i32::MIN), to.unwrap_or(i32::MAX))),
        };
        IncidentFilter {
            years,
            regions: self.regions.clone(),
            provinces: self.provinces.clone(),
            causes: self.causes.clone(),
            min_area: self.min_area,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Zip archive containing the incident CSV
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub archive: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Zip archive containing the incident CSV
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub archive: PathBuf,

    /// Output CSV file, defaults to "./incendios.csv"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Zip archive containing the incident CSV
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub archive: PathBuf,

    /// Print JSON instead of a text report
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(clap::Args, Debug)]
pub struct MapArgs {
    /// Zip archive containing the incident CSV
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub archive: PathBuf,

    /// Output GeoJSON file, defaults to "./incendios.geojson"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Maximum number of markers (never more than 2000)
    #[arg(long, default_value_t = incendios::MAX_MAP_POINTS)]
    pub limit: usize,

    #[command(flatten)]
    pub filter: FilterArgs,
}
