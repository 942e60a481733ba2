use serde_json::json;
use tnea_cutoff::ToolError;
use tnea_cutoff::model::{Community, Field, RawRecord, Table};
use tnea_cutoff::normalize::normalize;
use tnea_cutoff::query::{self, FilterSet, SortOrder};

fn table(records: serde_json::Value) -> Table {
    let raw: Vec<RawRecord> = serde_json::from_value(records).expect("raw records");
    normalize(&raw)
}

fn codes(table: &Table) -> Vec<&str> {
    table
        .records
        .iter()
        .map(|record| record.college_code.as_deref().unwrap_or("-"))
        .collect()
}

fn sample() -> Table {
    table(json!([
        {"coc": "1", "con": "Anna University", "brc": "CS", "brn": "Computer Science", "OC": "199.5"},
        {"coc": "2", "con": "PSG College of Technology", "brc": "ME", "brn": "Mechanical", "OC": "160"},
        {"coc": "10", "con": "Coimbatore Institute", "brc": "cs", "brn": "Computer Science", "OC": ""},
        {"coc": "11", "brc": "EC", "brn": "Electronics", "OC": "150", "SC": "140"}
    ]))
}

#[test]
fn empty_filter_set_returns_table_unchanged() {
    let table = sample();
    assert_eq!(query::filter(&table, &FilterSet::default()), table);
}

#[test]
fn cutoff_bounds_are_inclusive_and_reject_nulls() {
    let mut filters = FilterSet::default();
    filters.bounds_mut(Community::Oc).min = Some(150.0);
    filters.bounds_mut(Community::Oc).max = Some(180.0);

    let result = query::filter(&sample(), &filters);
    assert_eq!(codes(&result), vec!["2", "11"]);
}

#[test]
fn text_filters_combine_with_and() {
    let filters = FilterSet {
        branch_code: Some("CS".into()),
        branch_name: Some("computer".into()),
        ..FilterSet::default()
    };
    let result = query::filter(&sample(), &filters);
    assert_eq!(codes(&result), vec!["1", "10"]);

    let filters = FilterSet {
        branch_code: Some("CS".into()),
        college_name: Some("INSTITUTE".into()),
        ..FilterSet::default()
    };
    assert_eq!(codes(&query::filter(&sample(), &filters)), vec!["10"]);
}

#[test]
fn null_names_never_match_substring_filters() {
    let filters = FilterSet {
        college_name: Some("e".into()),
        ..FilterSet::default()
    };
    let result = query::filter(&sample(), &filters);
    assert!(!codes(&result).contains(&"11"));
}

#[test]
fn college_code_is_an_exact_match() {
    let filters = FilterSet {
        college_code: Some("1".into()),
        ..FilterSet::default()
    };
    assert_eq!(codes(&query::filter(&sample(), &filters)), vec!["1"]);
}

#[test]
fn filtering_does_not_touch_the_source_table() {
    let table = sample();
    let before = table.clone();
    let filters = FilterSet {
        branch_code: Some("ME".into()),
        ..FilterSet::default()
    };
    let filtered = query::filter(&table, &filters);
    assert_eq!(filtered.len(), 1);
    assert_eq!(table, before);
}

#[test]
fn cutoff_nulls_go_last_ascending_and_first_descending() {
    let table = table(json!([
        {"coc": "a", "OC": 200},
        {"coc": "b", "OC": null},
        {"coc": "c", "OC": 150}
    ]));

    let ascending = query::sort(&table, "OC Cutoff", SortOrder::Ascending);
    assert_eq!(codes(&ascending), vec!["c", "a", "b"]);

    let descending = query::sort(&table, "OC Cutoff", SortOrder::Descending);
    assert_eq!(codes(&descending), vec!["b", "a", "c"]);
}

#[test]
fn non_cutoff_nulls_stay_last_in_both_directions() {
    let table = table(json!([
        {"coc": "1", "brn": "Mechanical"},
        {"coc": "2"},
        {"coc": "3", "brn": "Civil"}
    ]));

    let ascending = query::sort_by_field(&table, Field::BranchName, SortOrder::Ascending);
    assert_eq!(codes(&ascending), vec!["3", "1", "2"]);

    let descending = query::sort_by_field(&table, Field::BranchName, SortOrder::Descending);
    assert_eq!(codes(&descending), vec!["1", "3", "2"]);
}

#[test]
fn sorting_by_a_constant_key_keeps_row_order() {
    let table = table(json!([
        {"coc": "9", "brc": "CS"},
        {"coc": "3", "brc": "CS"},
        {"coc": "7", "brc": "CS"}
    ]));

    for order in [SortOrder::Ascending, SortOrder::Descending] {
        let sorted = query::sort(&table, "Branch Code", order);
        assert_eq!(codes(&sorted), vec!["9", "3", "7"]);
    }
}

#[test]
fn college_codes_sort_numerically() {
    let sorted = query::sort(&sample(), "College Code", SortOrder::Ascending);
    assert_eq!(codes(&sorted), vec!["1", "2", "10", "11"]);
}

#[test]
fn mixed_codes_sort_the_same_regardless_of_input_order() {
    let forward = table(json!([{"coc": "1A"}, {"coc": "9"}, {"coc": "10"}]));
    let backward = table(json!([{"coc": "10"}, {"coc": "9"}, {"coc": "1A"}]));

    for input in [forward, backward] {
        let ascending = query::sort(&input, "College Code", SortOrder::Ascending);
        assert_eq!(codes(&ascending), vec!["9", "10", "1A"]);
        let descending = query::sort(&input, "College Code", SortOrder::Descending);
        assert_eq!(codes(&descending), vec!["1A", "10", "9"]);
    }
}

#[test]
fn large_mixed_code_tables_sort_into_numeric_then_text_tiers() {
    let raw: Vec<serde_json::Value> = (0..2000)
        .map(|i| {
            let code = if i % 3 == 0 {
                format!("{}A", (i * 7919) % 500)
            } else {
                format!("{}", (i * 104_729) % 1000)
            };
            json!({"coc": code})
        })
        .collect();
    let input = table(serde_json::Value::Array(raw));

    let sorted = query::sort_by_field(&input, Field::CollegeCode, SortOrder::Ascending);
    let sorted_codes = codes(&sorted);
    assert_eq!(sorted_codes.len(), 2000);

    let split = sorted_codes
        .iter()
        .position(|code| code.parse::<f64>().is_err())
        .expect("text codes present");
    let (numbers, texts) = sorted_codes.split_at(split);
    assert!(texts.iter().all(|code| code.parse::<f64>().is_err()));
    let numbers: Vec<f64> = numbers.iter().map(|code| code.parse().expect("number")).collect();
    assert!(numbers.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(texts.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn column_resolution_prefers_exact_names_then_first_substring() {
    assert_eq!(
        query::resolve_column("OC Cutoff").expect("exact"),
        Field::Cutoff(Community::Oc)
    );
    assert_eq!(
        query::resolve_column("branch name").expect("substring"),
        Field::BranchName
    );
    assert_eq!(
        query::resolve_column("bcmal").expect("raw code"),
        Field::AllottedSeats(Community::Bcm)
    );
    // `coc` is declared before `OC`, so the first match wins.
    assert_eq!(
        query::resolve_column("oc").expect("first match"),
        Field::CollegeCode
    );
    assert_eq!(
        query::resolve_column("mbc cut").expect("partial name"),
        Field::Cutoff(Community::Mbc)
    );
}

#[test]
fn unknown_sort_column_leaves_table_unsorted() {
    let table = sample();
    assert!(matches!(
        query::resolve_column("rank"),
        Err(ToolError::UnknownColumn { .. })
    ));
    assert!(query::resolve_column("").is_err());
    assert_eq!(query::sort(&table, "rank", SortOrder::Descending), table);
}

#[test]
fn zero_row_tables_pass_through() {
    let empty = normalize(&[]);
    assert!(query::filter(&empty, &FilterSet {
        college_name: Some("x".into()),
        ..FilterSet::default()
    })
    .is_empty());
    assert!(query::sort(&empty, "OC Cutoff", SortOrder::Ascending).is_empty());
}
