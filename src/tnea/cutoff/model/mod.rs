use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::tnea::cutoff::config::{COLUMNS, ColumnSpec};

/// As-received record from the allotment API: short field codes mapped to
/// loosely typed values.
pub type RawRecord = Map<String, Value>;

/// Marker used wherever a null cell has to be spelled out.
pub const NOT_AVAILABLE: &str = "N/A";

/// Reservation category with its own cutoff and seat counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Community {
    Oc,
    Bc,
    Bcm,
    Mbc,
    Sc,
    Sca,
    St,
}

impl Community {
    /// All communities in declared order.
    pub const ALL: [Community; 7] = [
        Community::Oc,
        Community::Bc,
        Community::Bcm,
        Community::Mbc,
        Community::Sc,
        Community::Sca,
        Community::St,
    ];

    /// Upper-case label as used by the API and the column names.
    pub fn label(self) -> &'static str {
        match self {
            Community::Oc => "OC",
            Community::Bc => "BC",
            Community::Bcm => "BCM",
            Community::Mbc => "MBC",
            Community::Sc => "SC",
            Community::Sca => "SCA",
            Community::St => "ST",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// A canonical column of the cutoff table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CollegeCode,
    CollegeName,
    BranchCode,
    BranchName,
    Cutoff(Community),
    TotalSeats(Community),
    AllottedSeats(Community),
}

impl Field {
    /// Iterates the canonical fields in declared order.
    pub fn all() -> impl Iterator<Item = Field> {
        COLUMNS.iter().map(|spec| spec.field)
    }

    /// Mapping entry of this field.
    pub fn spec(self) -> &'static ColumnSpec {
        &COLUMNS[self.position()]
    }

    /// Canonical display name, e.g. `OC Cutoff`.
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Short code used by the API, e.g. `OC` or `octl`.
    pub fn code(self) -> &'static str {
        self.spec().code
    }

    pub fn is_cutoff(self) -> bool {
        matches!(self, Field::Cutoff(_))
    }

    /// Code column that identifies the entity named by this field.
    pub fn companion(self) -> Option<Field> {
        match self {
            Field::CollegeName => Some(Field::CollegeCode),
            Field::BranchName => Some(Field::BranchCode),
            _ => None,
        }
    }

    /// Index into [`COLUMNS`].
    fn position(self) -> usize {
        match self {
            Field::CollegeCode => 0,
            Field::CollegeName => 1,
            Field::BranchCode => 2,
            Field::BranchName => 3,
            Field::Cutoff(community) => 4 + community.index(),
            Field::TotalSeats(community) => 11 + 2 * community.index(),
            Field::AllottedSeats(community) => 12 + 2 * community.index(),
        }
    }
}

/// Borrowed view of a single table cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Cutoff(f64),
    Seats(i64),
    /// Value of a column the mapping does not know about.
    Extra(&'a Value),
    Null,
}

impl Cell<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null | Cell::Extra(Value::Null))
    }

    /// Numeric value of the cell, when it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Cutoff(value) => Some(*value),
            Cell::Seats(value) => Some(*value as f64),
            Cell::Extra(Value::Number(number)) => number.as_f64(),
            _ => None,
        }
    }

    /// Renders the cell as text, spelling nulls as `null_marker`.
    pub fn render(&self, null_marker: &str) -> String {
        match self {
            Cell::Text(value) => (*value).to_string(),
            Cell::Cutoff(value) => format_cutoff(*value),
            Cell::Seats(value) => value.to_string(),
            Cell::Extra(Value::Null) | Cell::Null => null_marker.to_string(),
            Cell::Extra(Value::String(value)) => value.clone(),
            Cell::Extra(other) => other.to_string(),
        }
    }
}

/// Formats a cutoff mark with at least one decimal place (`180` → `180.0`).
pub fn format_cutoff(value: f64) -> String {
    format!("{value:?}")
}

/// Normalized, fixed-schema row of cutoff data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CutoffRecord {
    pub college_code: Option<String>,
    pub college_name: Option<String>,
    pub branch_code: Option<String>,
    pub branch_name: Option<String>,
    /// Indexed by [`Community`] declared order.
    pub cutoffs: [Option<f64>; 7],
    pub total_seats: [Option<i64>; 7],
    pub allotted_seats: [Option<i64>; 7],
    /// Raw fields outside the mapping, preserved unmodified.
    pub extras: BTreeMap<String, Value>,
}

impl CutoffRecord {
    /// Reads a canonical field.
    pub fn get(&self, field: Field) -> Cell<'_> {
        match field {
            Field::CollegeCode => text_cell(&self.college_code),
            Field::CollegeName => text_cell(&self.college_name),
            Field::BranchCode => text_cell(&self.branch_code),
            Field::BranchName => text_cell(&self.branch_name),
            Field::Cutoff(community) => self.cutoffs[community.index()]
                .map(Cell::Cutoff)
                .unwrap_or(Cell::Null),
            Field::TotalSeats(community) => self.total_seats[community.index()]
                .map(Cell::Seats)
                .unwrap_or(Cell::Null),
            Field::AllottedSeats(community) => self.allotted_seats[community.index()]
                .map(Cell::Seats)
                .unwrap_or(Cell::Null),
        }
    }

    /// Text value of an identity field; `None` for numeric fields and nulls.
    pub fn text(&self, field: Field) -> Option<&str> {
        match self.get(field) {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn cutoff(&self, community: Community) -> Option<f64> {
        self.cutoffs[community.index()]
    }

    /// Reads a column outside the mapping; missing entries read as null.
    pub fn extra(&self, column: &str) -> Cell<'_> {
        self.extras.get(column).map(Cell::Extra).unwrap_or(Cell::Null)
    }

    /// Projects the record back to a raw mapping keyed by canonical names.
    pub fn to_raw(&self) -> RawRecord {
        let mut raw = Map::new();
        for field in Field::all() {
            let value = match self.get(field) {
                Cell::Text(value) => Value::String(value.to_string()),
                Cell::Cutoff(value) => Number::from_f64(value)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                Cell::Seats(value) => Value::Number(value.into()),
                Cell::Extra(value) => value.clone(),
                Cell::Null => Value::Null,
            };
            raw.insert(field.name().to_string(), value);
        }
        for (key, value) in &self.extras {
            raw.insert(key.clone(), value.clone());
        }
        raw
    }
}

fn text_cell(value: &Option<String>) -> Cell<'_> {
    value.as_deref().map(Cell::Text).unwrap_or(Cell::Null)
}

/// Ordered sequence of records sharing one schema: the canonical columns
/// followed by `extra_columns`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub extra_columns: Vec<String>,
    pub records: Vec<CutoffRecord>,
}

impl Table {
    pub fn new(extra_columns: Vec<String>, records: Vec<CutoffRecord>) -> Self {
        Self {
            extra_columns,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// New table with the same schema and the given rows.
    pub fn with_records(&self, records: Vec<CutoffRecord>) -> Self {
        Self {
            extra_columns: self.extra_columns.clone(),
            records,
        }
    }

    /// Header row: canonical display names, then extra columns.
    pub fn headers(&self) -> Vec<String> {
        Field::all()
            .map(|field| field.name().to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect()
    }

    /// Cells of one record in header order.
    pub fn row<'a>(&'a self, record: &'a CutoffRecord) -> Vec<Cell<'a>> {
        Field::all()
            .map(|field| record.get(field))
            .chain(self.extra_columns.iter().map(|column| record.extra(column)))
            .collect()
    }

    /// All rows rendered as text with nulls spelled as `null_marker`.
    pub fn render_rows(&self, null_marker: &str) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|record| {
                self.row(record)
                    .iter()
                    .map(|cell| cell.render(null_marker))
                    .collect()
            })
            .collect()
    }

    /// Projects every record back to raw form.
    pub fn to_raw(&self) -> Vec<RawRecord> {
        self.records.iter().map(CutoffRecord::to_raw).collect()
    }
}
