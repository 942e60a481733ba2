use serde_json::json;
use tnea_cutoff::model::{Cell, Community, Field, RawRecord};
use tnea_cutoff::normalize::{coerce_seats, normalize, normalize_record};

fn raw(value: serde_json::Value) -> RawRecord {
    value.as_object().cloned().expect("raw record is an object")
}

#[test]
fn unparseable_cells_become_null() {
    let record = normalize_record(&raw(json!({
        "coc": "5",
        "con": "ABC College",
        "brc": "CS",
        "OC": "",
        "ST": "180.5"
    })));

    assert_eq!(record.college_code.as_deref(), Some("5"));
    assert_eq!(record.college_name.as_deref(), Some("ABC College"));
    assert_eq!(record.cutoff(Community::Oc), None);
    assert_eq!(record.cutoff(Community::St), Some(180.5));
    assert_eq!(record.branch_name, None);
    assert_eq!(record.get(Field::TotalSeats(Community::Bc)), Cell::Null);
}

#[test]
fn every_record_carries_the_full_schema() {
    let table = normalize(&[
        raw(json!({"coc": 1, "OC": 190.25})),
        raw(json!({"brn": "Civil", "octl": "12", "ocal": "abc"})),
    ]);

    let headers = table.headers();
    assert_eq!(headers.len(), 25);
    assert_eq!(headers[0], "College Code");
    assert_eq!(headers[4], "OC Cutoff");
    assert_eq!(headers[11], "OC Total Seats");
    assert_eq!(headers[24], "ST Allotted Seats");

    for record in &table.records {
        assert_eq!(table.row(record).len(), headers.len());
    }

    let first = &table.records[0];
    assert_eq!(first.college_code.as_deref(), Some("1"));
    assert_eq!(first.cutoff(Community::Oc), Some(190.25));

    let second = &table.records[1];
    assert_eq!(second.get(Field::TotalSeats(Community::Oc)), Cell::Seats(12));
    assert_eq!(second.get(Field::AllottedSeats(Community::Oc)), Cell::Null);
}

#[test]
fn internal_id_is_dropped_and_unknown_fields_are_appended() {
    let table = normalize(&[
        raw(json!({"_id": "65f0", "coc": "1", "zeta": "z", "alpha": 3})),
        raw(json!({"coc": "2", "remarks": "new"})),
    ]);

    assert_eq!(table.extra_columns, vec!["alpha", "zeta", "remarks"]);
    let headers = table.headers();
    assert_eq!(&headers[25..], &["alpha", "zeta", "remarks"]);
    assert!(!headers.iter().any(|header| header == "_id"));

    let second = &table.records[1];
    assert_eq!(second.extra("remarks"), Cell::Extra(&json!("new")));
    assert!(second.extra("alpha").is_null());
}

#[test]
fn normalization_is_idempotent() {
    let table = normalize(&[
        raw(json!({
            "_id": "x1",
            "coc": 1,
            "con": "Test College",
            "brc": "CS",
            "brn": "Computer Science",
            "OC": "180",
            "BC": 175.5,
            "ST": "",
            "sttl": "5",
            "stal": "",
            "extra": {"nested": true}
        })),
        raw(json!({"coc": "2", "MBC": "n/a", "bcmtl": 3.0})),
    ]);

    let renormalized = normalize(&table.to_raw());
    assert_eq!(renormalized, table);
}

#[test]
fn seat_counts_accept_whole_floats_only() {
    assert_eq!(coerce_seats(Some(&json!("5.0"))), Some(5));
    assert_eq!(coerce_seats(Some(&json!(7))), Some(7));
    assert_eq!(coerce_seats(Some(&json!(" 9 "))), Some(9));
    assert_eq!(coerce_seats(Some(&json!("5.5"))), None);
    assert_eq!(coerce_seats(Some(&json!(true))), None);
    assert_eq!(coerce_seats(None), None);
}

#[test]
fn empty_input_yields_empty_table() {
    let table = normalize(&[]);
    assert!(table.is_empty());
    assert!(table.extra_columns.is_empty());
}
