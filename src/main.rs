use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tnea_cutoff::config::{self, FetchConfig};
use tnea_cutoff::export::{ExportFormat, Exporter};
use tnea_cutoff::io::fetch::HttpFetcher;
use tnea_cutoff::listing;
use tnea_cutoff::model::Community;
use tnea_cutoff::pipeline::{self, Action, RunOutcome, RunRequest, SortRequest};
use tnea_cutoff::query::{FilterSet, SortOrder};
use tnea_cutoff::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging() {
        eprintln!("warning: {error}");
    }
    if let Err(error) = run(cli) {
        match &error {
            ToolError::Fetch(fetch) => eprintln!("error: {} failure: {fetch}", fetch.kind()),
            other => eprintln!("error: {other}"),
        }
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    if cli.list_sortable_columns {
        print!("{}", listing::sortable_columns());
        return Ok(());
    }

    let request = cli.request();
    let fetcher = HttpFetcher::new(cli.fetch_config())?;
    let exporter = Exporter::with_default_renderers();

    match pipeline::run(&fetcher, &exporter, &request)? {
        RunOutcome::Listed(listing) => print!("{listing}"),
        RunOutcome::NoData
        | RunOutcome::NoMatches
        | RunOutcome::Exported(_)
        | RunOutcome::ExportFailed(_) => {}
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Fetch, filter, sort, and export TNEA admission cutoff data."
)]
struct Cli {
    /// Year for which to fetch data (e.g. 2023).
    #[arg(long, allow_negative_numbers = true)]
    year: i64,

    /// Path of the output file. Required unless a --list-* action is used.
    #[arg(
        long,
        required_unless_present_any = ["list_colleges", "list_branches", "list_sortable_columns"]
    )]
    output_file: Option<PathBuf>,

    /// Format of the output file.
    #[arg(long, value_enum, default_value_t = FormatArg::Excel)]
    format: FormatArg,

    /// List every college name and code for the year and exit.
    #[arg(long)]
    list_colleges: bool,

    /// List every branch name and code for the year and exit.
    #[arg(long)]
    list_branches: bool,

    /// List the column names accepted by --sort-by and exit.
    #[arg(long)]
    list_sortable_columns: bool,

    /// Base URL of the allotment list API.
    #[arg(long, env = "TNEA_BASE_URL", default_value = config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "TNEA_TIMEOUT_SECS", default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(flatten)]
    sort: SortArgs,
}

impl Cli {
    fn action(&self) -> Action {
        if self.list_colleges {
            return Action::ListColleges;
        }
        if self.list_branches {
            return Action::ListBranches;
        }
        // clap requires --output-file when no list flag is set.
        Action::Export {
            format: self.format.into(),
            output: self.output_file.clone().unwrap_or_default(),
        }
    }

    fn request(&self) -> RunRequest {
        RunRequest {
            year: self.year,
            filters: self.filters.to_filter_set(),
            sort: self.sort.sort_by.clone().map(|column| SortRequest {
                column,
                order: self.sort.sort_order.into(),
            }),
            action: self.action(),
        }
    }

    fn fetch_config(&self) -> FetchConfig {
        FetchConfig::new(
            self.base_url.clone(),
            Duration::from_secs(self.timeout_secs),
        )
    }
}

#[derive(clap::Args)]
#[command(next_help_heading = "Filtering Options")]
struct FilterArgs {
    /// Filter by exact College Code (e.g. 1).
    #[arg(long)]
    filter_college_code: Option<String>,

    /// Filter by College Name (case-insensitive, contains).
    #[arg(long)]
    filter_college_name: Option<String>,

    /// Filter by exact Branch Code (e.g. CS).
    #[arg(long)]
    filter_branch_code: Option<String>,

    /// Filter by Branch Name (case-insensitive, contains).
    #[arg(long)]
    filter_branch_name: Option<String>,

    /// Minimum OC cutoff mark.
    #[arg(long)]
    min_oc_cutoff: Option<f64>,
    /// Maximum OC cutoff mark.
    #[arg(long)]
    max_oc_cutoff: Option<f64>,
    /// Minimum BC cutoff mark.
    #[arg(long)]
    min_bc_cutoff: Option<f64>,
    /// Maximum BC cutoff mark.
    #[arg(long)]
    max_bc_cutoff: Option<f64>,
    /// Minimum BCM cutoff mark.
    #[arg(long)]
    min_bcm_cutoff: Option<f64>,
    /// Maximum BCM cutoff mark.
    #[arg(long)]
    max_bcm_cutoff: Option<f64>,
    /// Minimum MBC cutoff mark.
    #[arg(long)]
    min_mbc_cutoff: Option<f64>,
    /// Maximum MBC cutoff mark.
    #[arg(long)]
    max_mbc_cutoff: Option<f64>,
    /// Minimum SC cutoff mark.
    #[arg(long)]
    min_sc_cutoff: Option<f64>,
    /// Maximum SC cutoff mark.
    #[arg(long)]
    max_sc_cutoff: Option<f64>,
    /// Minimum SCA cutoff mark.
    #[arg(long)]
    min_sca_cutoff: Option<f64>,
    /// Maximum SCA cutoff mark.
    #[arg(long)]
    max_sca_cutoff: Option<f64>,
    /// Minimum ST cutoff mark.
    #[arg(long)]
    min_st_cutoff: Option<f64>,
    /// Maximum ST cutoff mark.
    #[arg(long)]
    max_st_cutoff: Option<f64>,
}

impl FilterArgs {
    fn bounds(&self, community: Community) -> (Option<f64>, Option<f64>) {
        match community {
            Community::Oc => (self.min_oc_cutoff, self.max_oc_cutoff),
            Community::Bc => (self.min_bc_cutoff, self.max_bc_cutoff),
            Community::Bcm => (self.min_bcm_cutoff, self.max_bcm_cutoff),
            Community::Mbc => (self.min_mbc_cutoff, self.max_mbc_cutoff),
            Community::Sc => (self.min_sc_cutoff, self.max_sc_cutoff),
            Community::Sca => (self.min_sca_cutoff, self.max_sca_cutoff),
            Community::St => (self.min_st_cutoff, self.max_st_cutoff),
        }
    }

    fn to_filter_set(&self) -> FilterSet {
        let mut filters = FilterSet {
            college_code: self.filter_college_code.clone(),
            college_name: self.filter_college_name.clone(),
            branch_code: self.filter_branch_code.clone(),
            branch_name: self.filter_branch_name.clone(),
            ..FilterSet::default()
        };
        for community in Community::ALL {
            let (min, max) = self.bounds(community);
            let bounds = filters.bounds_mut(community);
            bounds.min = min;
            bounds.max = max;
        }
        filters
    }
}

#[derive(clap::Args)]
#[command(next_help_heading = "Sorting Options")]
struct SortArgs {
    /// Column to sort by (e.g. 'Branch Name', 'OC Cutoff'). See --list-sortable-columns.
    #[arg(long)]
    sort_by: Option<String>,

    /// Sort direction.
    #[arg(long, value_enum, default_value_t = SortOrderArg::Asc)]
    sort_order: SortOrderArg,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
    Excel,
    Pdf,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Excel => ExportFormat::Excel,
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SortOrderArg {
    Asc,
    Desc,
}

impl From<SortOrderArg> for SortOrder {
    fn from(order: SortOrderArg) -> Self {
        match order {
            SortOrderArg::Asc => SortOrder::Ascending,
            SortOrderArg::Desc => SortOrder::Descending,
        }
    }
}
