//! Predicate filtering and single-key sorting over a [`Table`].

use std::cmp::Ordering;

use tracing::{debug, instrument, warn};

use crate::tnea::cutoff::config::COLUMNS;
use crate::tnea::cutoff::error::{Result, ToolError};
use crate::tnea::cutoff::model::{Cell, Community, CutoffRecord, Field, Table};

/// Inclusive bounds on one community's cutoff.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CutoffBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl CutoffBounds {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// A null cutoff fails any bound.
    pub fn admits(&self, value: Option<f64>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(value) = value else {
            return false;
        };
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

/// AND-combined record predicates. Absent predicates do not constrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    /// Exact match after coercion to string.
    pub college_code: Option<String>,
    /// Case-insensitive substring.
    pub college_name: Option<String>,
    /// Case-insensitive exact match.
    pub branch_code: Option<String>,
    /// Case-insensitive substring.
    pub branch_name: Option<String>,
    /// Indexed by [`Community`] declared order.
    pub cutoffs: [CutoffBounds; 7],
}

impl FilterSet {
    pub fn bounds_mut(&mut self, community: Community) -> &mut CutoffBounds {
        &mut self.cutoffs[community.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.college_code.is_none()
            && self.college_name.is_none()
            && self.branch_code.is_none()
            && self.branch_name.is_none()
            && self.cutoffs.iter().all(CutoffBounds::is_unbounded)
    }

    /// Whether a single record satisfies every predicate.
    pub fn matches(&self, record: &CutoffRecord) -> bool {
        if let Some(code) = &self.college_code {
            if record.text(Field::CollegeCode) != Some(code.as_str()) {
                return false;
            }
        }
        if let Some(code) = &self.branch_code {
            match record.text(Field::BranchCode) {
                Some(value) if value.to_uppercase() == code.to_uppercase() => {}
                _ => return false,
            }
        }
        if let Some(needle) = &self.college_name {
            if !contains_ignore_case(record.text(Field::CollegeName), needle) {
                return false;
            }
        }
        if let Some(needle) = &self.branch_name {
            if !contains_ignore_case(record.text(Field::BranchName), needle) {
                return false;
            }
        }
        Community::ALL
            .iter()
            .all(|community| self.cutoffs[community.index()].admits(record.cutoff(*community)))
    }
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    match haystack {
        Some(value) => value.to_lowercase().contains(&needle.to_lowercase()),
        None => needle.is_empty(),
    }
}

/// Returns a new table containing the records matching `filters`, in their
/// original relative order.
#[instrument(level = "debug", skip_all, fields(rows = table.len()))]
pub fn filter(table: &Table, filters: &FilterSet) -> Table {
    if filters.is_empty() {
        return table.clone();
    }
    let records: Vec<CutoffRecord> = table
        .records
        .iter()
        .filter(|record| filters.matches(record))
        .cloned()
        .collect();
    debug!(kept = records.len(), "filters applied");
    table.with_records(records)
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Resolves a user supplied column identifier to a canonical field.
///
/// Exact canonical names win. Otherwise the declared mapping is scanned in
/// order and the first column whose canonical name or raw code contains the
/// identifier (case-insensitively) is taken, so `oc` resolves to `College
/// Code` rather than `OC Cutoff`. An empty identifier never resolves.
pub fn resolve_column(requested: &str) -> Result<Field> {
    if let Some(spec) = COLUMNS.iter().find(|spec| spec.name == requested) {
        return Ok(spec.field);
    }

    let needle = requested.to_lowercase();
    if !needle.is_empty() {
        let found = COLUMNS.iter().find(|spec| {
            spec.name.to_lowercase().contains(&needle) || spec.code.to_lowercase().contains(&needle)
        });
        if let Some(spec) = found {
            return Ok(spec.field);
        }
    }

    Err(ToolError::UnknownColumn {
        requested: requested.to_string(),
        available: COLUMNS
            .iter()
            .map(|spec| spec.name)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Sorts by a user supplied column identifier. An unresolvable identifier is
/// reported and the table comes back unsorted.
#[instrument(level = "debug", skip(table), fields(rows = table.len()))]
pub fn sort(table: &Table, column: &str, order: SortOrder) -> Table {
    match resolve_column(column) {
        Ok(field) => sort_by_field(table, field, order),
        Err(error) => {
            warn!(%error, "leaving table unsorted");
            table.clone()
        }
    }
}

/// Stable single-key sort on a canonical field.
///
/// Cutoff columns put nulls last when ascending and first when descending;
/// every other column keeps nulls last in both directions.
pub fn sort_by_field(table: &Table, field: Field, order: SortOrder) -> Table {
    let nulls_first = field.is_cutoff() && order == SortOrder::Descending;
    let mut records = table.records.clone();
    records.sort_by(|lhs, rhs| {
        let (lhs, rhs) = (lhs.get(field), rhs.get(field));
        match (lhs.is_null(), rhs.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) if nulls_first => Ordering::Less,
            (true, false) => Ordering::Greater,
            (false, true) if nulls_first => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = compare_cells(&lhs, &rhs);
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            }
        }
    });
    debug!(column = field.name(), ?order, "table sorted");
    table.with_records(records)
}

/// Numeric values order before text; each tier has its own total order.
fn compare_cells(lhs: &Cell<'_>, rhs: &Cell<'_>) -> Ordering {
    match (numeric(lhs), numeric(rhs)) {
        (Some(lhs), Some(rhs)) => lhs.total_cmp(&rhs),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => lhs.render("").cmp(&rhs.render("")),
    }
}

/// Numbers, and text that reads as a number (college codes).
fn numeric(cell: &Cell<'_>) -> Option<f64> {
    match cell {
        Cell::Text(value) => value.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        other => other.as_f64(),
    }
}
