//! Conversion of raw API records into the fixed-schema [`Table`].

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::tnea::cutoff::config::{COLUMNS, ColumnSpec, INTERNAL_ID_FIELD};
use crate::tnea::cutoff::model::{CutoffRecord, Field, RawRecord, Table};

/// Normalizes raw records into a table with a uniform schema.
///
/// Each canonical field is looked up by its raw code and then by its canonical
/// name, so a table projected back with [`Table::to_raw`] normalizes to itself.
/// Cells that cannot be coerced become null; a single bad cell never fails the
/// whole batch. Fields outside the mapping are kept as extra columns in
/// first-seen order.
#[instrument(level = "debug", skip_all, fields(records = raw_records.len()))]
pub fn normalize(raw_records: &[RawRecord]) -> Table {
    let mut extra_columns: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(raw_records.len());

    for raw in raw_records {
        let record = normalize_record(raw);
        for key in record.extras.keys() {
            if !extra_columns.contains(key) {
                extra_columns.push(key.clone());
            }
        }
        records.push(record);
    }

    debug!(
        rows = records.len(),
        extra_columns = extra_columns.len(),
        "normalized records"
    );
    Table::new(extra_columns, records)
}

/// Normalizes a single raw record.
pub fn normalize_record(raw: &RawRecord) -> CutoffRecord {
    let mut record = CutoffRecord::default();

    for spec in &COLUMNS {
        let value = lookup(raw, spec);
        match spec.field {
            Field::CollegeCode => record.college_code = coerce_text(value),
            Field::CollegeName => record.college_name = coerce_text(value),
            Field::BranchCode => record.branch_code = coerce_text(value),
            Field::BranchName => record.branch_name = coerce_text(value),
            Field::Cutoff(community) => {
                record.cutoffs[community.index()] = coerce_cutoff(value);
            }
            Field::TotalSeats(community) => {
                record.total_seats[community.index()] = coerce_seats(value);
            }
            Field::AllottedSeats(community) => {
                record.allotted_seats[community.index()] = coerce_seats(value);
            }
        }
    }

    record.extras = raw
        .iter()
        .filter(|(key, _)| !is_known_key(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect::<BTreeMap<_, _>>();

    record
}

fn lookup<'a>(raw: &'a RawRecord, spec: &ColumnSpec) -> Option<&'a Value> {
    raw.get(spec.code).or_else(|| raw.get(spec.name))
}

fn is_known_key(key: &str) -> bool {
    key == INTERNAL_ID_FIELD
        || COLUMNS
            .iter()
            .any(|spec| spec.code == key || spec.name == key)
}

/// Coerces an identity value to its string form; numbers keep their JSON
/// spelling (`5` → `"5"`).
pub fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Parses a cutoff mark; anything that is not a finite number is null.
pub fn coerce_cutoff(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|mark| mark.is_finite())
}

/// Parses a seat count; whole-valued floats such as `"5.0"` are accepted.
pub fn coerce_seats(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().and_then(whole)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(whole))
        }
        _ => None,
    }
}

fn whole(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64)
        .then_some(value as i64)
}
