use serde_json::json;
use tnea_cutoff::listing::{self, Listing, ListingEntry};
use tnea_cutoff::model::{Field, RawRecord, Table};
use tnea_cutoff::normalize::normalize;

fn table() -> Table {
    let raw: Vec<RawRecord> = serde_json::from_value(json!([
        {"coc": "2", "con": "Zenith College", "brc": "ME", "brn": "Mechanical"},
        {"coc": "1", "con": "Anna University", "brc": "CS", "brn": "Computer Science"},
        {"coc": "2", "con": "Zenith College", "brc": "CS", "brn": "Computer Science"},
        {"coc": "3", "brc": "AE", "brn": "Aeronautical"}
    ]))
    .expect("raw records");
    normalize(&raw)
}

fn entry(companion: Option<&str>, value: Option<&str>) -> ListingEntry {
    ListingEntry {
        companion: companion.map(str::to_string),
        value: value.map(str::to_string),
    }
}

#[test]
fn colleges_are_deduplicated_and_sorted_by_name() {
    let entries = listing::list_unique(&table(), Field::CollegeName, Field::CollegeCode);
    assert_eq!(
        entries,
        vec![
            entry(Some("1"), Some("Anna University")),
            entry(Some("2"), Some("Zenith College")),
            entry(Some("3"), None),
        ]
    );
}

#[test]
fn branches_pair_with_branch_codes() {
    let Listing::Paired {
        companion, entries, ..
    } = listing::list_field(&table(), Field::BranchName)
    else {
        panic!("branch names have a companion column");
    };
    assert_eq!(companion, Field::BranchCode);
    assert_eq!(
        entries,
        vec![
            entry(Some("AE"), Some("Aeronautical")),
            entry(Some("CS"), Some("Computer Science")),
            entry(Some("ME"), Some("Mechanical")),
        ]
    );
}

#[test]
fn fields_without_companion_list_distinct_values_in_first_seen_order() {
    let listing = listing::list_field(&table(), Field::BranchCode);
    assert_eq!(
        listing,
        Listing::Distinct {
            target: Field::BranchCode,
            values: vec!["ME".into(), "CS".into(), "AE".into()],
        }
    );
}

#[test]
fn listing_renders_code_and_name_lines() {
    let rendered = listing::list_field(&table(), Field::CollegeName).to_string();
    assert!(rendered.contains("  Code: 1 - Name: Anna University"));
    assert!(rendered.contains("  Code: 3 - Name: N/A"));
}

#[test]
fn sortable_columns_mention_names_and_codes() {
    let help = listing::sortable_columns();
    assert!(help.contains("'OC Cutoff' (or try 'OC')"));
    assert!(help.contains("'ST Allotted Seats' (or try 'stal')"));
}
