use std::path::PathBuf;

use tracing::{error, info, instrument, warn};

use crate::tnea::cutoff::config;
use crate::tnea::cutoff::error::Result;
use crate::tnea::cutoff::export::{ExportFormat, ExportOutcome, Exporter};
use crate::tnea::cutoff::io::fetch::RecordSource;
use crate::tnea::cutoff::listing::{self, Listing};
use crate::tnea::cutoff::model::{Field, Table};
use crate::tnea::cutoff::normalize::normalize;
use crate::tnea::cutoff::query::{self, FilterSet, SortOrder};

/// Column and direction requested with `--sort-by` / `--sort-order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRequest {
    pub column: String,
    pub order: SortOrder,
}

/// Terminal action of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ListColleges,
    ListBranches,
    Export { format: ExportFormat, output: PathBuf },
}

/// Everything one invocation asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub year: i64,
    pub filters: FilterSet,
    pub sort: Option<SortRequest>,
    pub action: Action,
}

/// How a run ended. Every variant is a successful exit.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The API returned no records for the year.
    NoData,
    Listed(Listing),
    /// No record survived the filters; nothing was exported.
    NoMatches,
    Exported(ExportOutcome),
    /// Writing the export failed; the message has been logged.
    ExportFailed(String),
}

/// Fetches and normalizes the records of one year.
#[instrument(level = "info", skip(source))]
pub fn fetch_table(source: &dyn RecordSource, year: i64) -> Result<Table> {
    let code = config::year_code(year)?;
    let raw = source.fetch(code)?;
    info!(records = raw.len(), "records fetched");
    Ok(normalize(&raw))
}

/// Applies the filters and then the optional sort.
pub fn query_table(table: &Table, filters: &FilterSet, sort: Option<&SortRequest>) -> Table {
    let filtered = query::filter(table, filters);
    match sort {
        Some(request) => query::sort(&filtered, &request.column, request.order),
        None => filtered,
    }
}

/// Runs one full invocation: fetch, normalize, then list or
/// filter → sort → export.
#[instrument(level = "info", skip_all, fields(year = request.year))]
pub fn run(source: &dyn RecordSource, exporter: &Exporter, request: &RunRequest) -> Result<RunOutcome> {
    let table = fetch_table(source, request.year)?;
    if table.is_empty() {
        warn!(
            year = request.year,
            "no data found; the API may not have published this year yet"
        );
        return Ok(RunOutcome::NoData);
    }

    match &request.action {
        Action::ListColleges => Ok(RunOutcome::Listed(listing::list_field(
            &table,
            Field::CollegeName,
        ))),
        Action::ListBranches => Ok(RunOutcome::Listed(listing::list_field(
            &table,
            Field::BranchName,
        ))),
        Action::Export { format, output } => {
            let result = query_table(&table, &request.filters, request.sort.as_ref());
            if result.is_empty() {
                warn!("no data matches the applied filters");
                return Ok(RunOutcome::NoMatches);
            }
            info!(rows = result.len(), "records selected for export");

            match exporter.export(&result, *format, output) {
                Ok(ExportOutcome::Skipped(reason)) => {
                    warn!(%reason, "export skipped; consider excel or csv instead");
                    Ok(RunOutcome::Exported(ExportOutcome::Skipped(reason)))
                }
                Ok(outcome) => Ok(RunOutcome::Exported(outcome)),
                Err(err) => {
                    error!(error = %err, output = %output.display(), "export failed");
                    Ok(RunOutcome::ExportFailed(err.to_string()))
                }
            }
        }
    }
}
