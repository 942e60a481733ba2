//! Deduplicated projections used to discover valid filter values.

use std::cmp::Ordering;
use std::fmt;

use crate::tnea::cutoff::model::{Cell, Field, NOT_AVAILABLE, Table};

/// One `(code, name)` style entry of a paired listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub companion: Option<String>,
    pub value: Option<String>,
}

/// Result of [`list_field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Distinct `(companion, target)` pairs sorted by target.
    Paired {
        target: Field,
        companion: Field,
        entries: Vec<ListingEntry>,
    },
    /// Distinct values in first-seen order.
    Distinct { target: Field, values: Vec<String> },
}

/// Distinct `(companion, target)` pairs, stably sorted by the target value
/// with nulls last.
pub fn list_unique(table: &Table, target: Field, companion: Field) -> Vec<ListingEntry> {
    let mut entries: Vec<ListingEntry> = Vec::new();
    for record in &table.records {
        let entry = ListingEntry {
            companion: cell_text(record.get(companion)),
            value: cell_text(record.get(target)),
        };
        if !entries.contains(&entry) {
            entries.push(entry);
        }
    }
    entries.sort_by(|lhs, rhs| match (&lhs.value, &rhs.value) {
        (Some(lhs), Some(rhs)) => lhs.cmp(rhs),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    });
    entries
}

/// Distinct non-null values of a field in first-seen order.
pub fn distinct_values(table: &Table, field: Field) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for record in &table.records {
        if let Some(value) = cell_text(record.get(field)) {
            if !values.contains(&value) {
                values.push(value);
            }
        }
    }
    values
}

/// Lists a field, pairing it with its code column when it has one.
pub fn list_field(table: &Table, field: Field) -> Listing {
    match field.companion() {
        Some(companion) => Listing::Paired {
            target: field,
            companion,
            entries: list_unique(table, field, companion),
        },
        None => Listing::Distinct {
            target: field,
            values: distinct_values(table, field),
        },
    }
}

fn cell_text(cell: Cell<'_>) -> Option<String> {
    (!cell.is_null()).then(|| cell.render(""))
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listing::Paired {
                target,
                companion,
                entries,
            } => {
                writeln!(f, "--- Unique {} ({}) ---", target.name(), companion.name())?;
                for entry in entries {
                    writeln!(
                        f,
                        "  Code: {} - Name: {}",
                        entry.companion.as_deref().unwrap_or(NOT_AVAILABLE),
                        entry.value.as_deref().unwrap_or(NOT_AVAILABLE)
                    )?;
                }
            }
            Listing::Distinct { target, values } => {
                writeln!(f, "--- Unique {} ---", target.name())?;
                for value in values {
                    writeln!(f, "  {value}")?;
                }
            }
        }
        Ok(())
    }
}

/// Help text naming every column accepted by `--sort-by`.
pub fn sortable_columns() -> String {
    let mut text = String::from("--- Available columns for sorting (use these names with --sort-by) ---\n");
    for field in Field::all() {
        text.push_str(&format!("  - '{}' (or try '{}')\n", field.name(), field.code()));
    }
    text
}
