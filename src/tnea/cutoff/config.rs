//! Static lookup tables shared by the whole process.

use std::time::Duration;

use crate::tnea::cutoff::error::{Result, ToolError};
use crate::tnea::cutoff::model::{Community, Field};

/// Endpoint serving the per-year allotment lists.
pub const DEFAULT_BASE_URL: &str = "https://cutoff.tneaonline.org/api/auth/glist";

/// Upper bound on the single blocking request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Raw field holding the API's internal document identifier.
pub const INTERNAL_ID_FIELD: &str = "_id";

/// Supported admission years and their opaque API codes.
pub const YEAR_CODES: [(i64, &str); 5] = [
    (2024, "1C"),
    (2023, "2C"),
    (2022, "3C"),
    (2021, "4C"),
    (2020, "5C"),
];

/// One entry of the raw-code → canonical-name mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub field: Field,
    pub code: &'static str,
    pub name: &'static str,
}

const fn column(field: Field, code: &'static str, name: &'static str) -> ColumnSpec {
    ColumnSpec { field, code, name }
}

/// Canonical columns in declared order.
pub static COLUMNS: [ColumnSpec; 25] = [
    column(Field::CollegeCode, "coc", "College Code"),
    column(Field::CollegeName, "con", "College Name"),
    column(Field::BranchCode, "brc", "Branch Code"),
    column(Field::BranchName, "brn", "Branch Name"),
    column(Field::Cutoff(Community::Oc), "OC", "OC Cutoff"),
    column(Field::Cutoff(Community::Bc), "BC", "BC Cutoff"),
    column(Field::Cutoff(Community::Bcm), "BCM", "BCM Cutoff"),
    column(Field::Cutoff(Community::Mbc), "MBC", "MBC Cutoff"),
    column(Field::Cutoff(Community::Sc), "SC", "SC Cutoff"),
    column(Field::Cutoff(Community::Sca), "SCA", "SCA Cutoff"),
    column(Field::Cutoff(Community::St), "ST", "ST Cutoff"),
    column(Field::TotalSeats(Community::Oc), "octl", "OC Total Seats"),
    column(Field::AllottedSeats(Community::Oc), "ocal", "OC Allotted Seats"),
    column(Field::TotalSeats(Community::Bc), "bctl", "BC Total Seats"),
    column(Field::AllottedSeats(Community::Bc), "bcal", "BC Allotted Seats"),
    column(Field::TotalSeats(Community::Bcm), "bcmtl", "BCM Total Seats"),
    column(Field::AllottedSeats(Community::Bcm), "bcmal", "BCM Allotted Seats"),
    column(Field::TotalSeats(Community::Mbc), "mbctl", "MBC Total Seats"),
    column(Field::AllottedSeats(Community::Mbc), "mbcal", "MBC Allotted Seats"),
    column(Field::TotalSeats(Community::Sc), "sctl", "SC Total Seats"),
    column(Field::AllottedSeats(Community::Sc), "scal", "SC Allotted Seats"),
    column(Field::TotalSeats(Community::Sca), "scatl", "SCA Total Seats"),
    column(Field::AllottedSeats(Community::Sca), "scaal", "SCA Allotted Seats"),
    column(Field::TotalSeats(Community::St), "sttl", "ST Total Seats"),
    column(Field::AllottedSeats(Community::St), "stal", "ST Allotted Seats"),
];

/// Returns the API code for a supported year.
pub fn year_code(year: i64) -> Result<&'static str> {
    YEAR_CODES
        .iter()
        .find(|(candidate, _)| *candidate == year)
        .map(|(_, code)| *code)
        .ok_or_else(|| ToolError::UnsupportedYear {
            year,
            supported: supported_years(),
        })
}

/// Comma separated list of the supported years, newest first.
pub fn supported_years() -> String {
    YEAR_CODES
        .iter()
        .map(|(year, _)| year.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runtime settings of the HTTP fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl FetchConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    /// URL of the list for the given API year code.
    pub fn url_for(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_BASE_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }
}
