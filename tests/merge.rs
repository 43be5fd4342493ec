use row_merge::{
    BlankPlacement, Check, Comparand, Conditions, Criterion, Error, FieldRead, LookupIndex,
    MultiRowLookup, Row, RowSorter, SortDirection, SortMode, Transform, apply_chain,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn treatment_lookup() -> LookupIndex {
    LookupIndex::from_rows(
        vec![
            Row::from_pairs([("id", "1"), ("date", "2019-07-21"), ("treatment", "hatch")]),
            Row::from_pairs([("id", "1"), ("date", "2019-09-15"), ("treatment", "adopted")]),
            Row::from_pairs([("id", "1"), ("date", "2020-04-15"), ("treatment", "deworm")]),
            Row::from_pairs([("id", "2"), ("date", "2021-01-01"), ("treatment", "hatch")]),
        ],
        "id",
    )
}

#[test]
fn merges_all_candidate_rows_with_positional_alignment() {
    init_logging();
    let merge = MultiRowLookup::builder(treatment_lookup(), "id")
        .field("date", "date")
        .field("event", "treatment")
        .delim(";")
        .build()
        .expect("valid configuration");

    let mut row = Row::from_pairs([("id", "1"), ("name", "Weddy")]);
    merge.process(&mut row).expect("merge succeeds");

    assert_eq!(row.value("date"), Some("2019-07-21;2019-09-15;2020-04-15"));
    assert_eq!(row.value("event"), Some("hatch;adopted;deworm"));
    assert_eq!(row.value("name"), Some("Weddy"));
}

#[test]
fn unmatched_key_writes_explicit_nulls() {
    let merge = MultiRowLookup::builder(treatment_lookup(), "id")
        .field("date", "date")
        .field("event", "treatment")
        .delim(";")
        .build()
        .expect("valid configuration");

    let mut row = Row::from_pairs([("id", "3"), ("name", "Stray")]);
    merge.process(&mut row).expect("merge succeeds");

    assert_eq!(row.get("date"), FieldRead::Null);
    assert_eq!(row.get("event"), FieldRead::Null);
    assert!(row.contains("date"));
    assert!(row.contains("event"));
}

#[test]
fn invalid_configurations_fail_at_build_time() {
    let no_fieldmap = MultiRowLookup::builder(treatment_lookup(), "id")
        .delim(";")
        .build();
    assert!(matches!(no_fieldmap, Err(Error::Merge(_))));

    let no_delim = MultiRowLookup::builder(treatment_lookup(), "id")
        .field("date", "date")
        .build();
    assert!(matches!(no_delim, Err(Error::Merge(_))));

    let blank_keycolumn = MultiRowLookup::builder(treatment_lookup(), "")
        .field("date", "date")
        .delim(";")
        .build();
    assert!(matches!(blank_keycolumn, Err(Error::Merge(_))));

    let duplicate_source = MultiRowLookup::builder(treatment_lookup(), "id")
        .field("date", "date")
        .field("day", "date")
        .delim(";")
        .build();
    assert!(matches!(duplicate_source, Err(Error::Merge(_))));
}

#[test]
fn conditions_filter_candidates_before_accumulation() {
    init_logging();
    let conditions = Conditions::new().exclude(Criterion::of(Check::equal(
        Comparand::MergeRowField("treatment".to_string()),
        Comparand::Literal("deworm".to_string()),
    )));
    let merge = MultiRowLookup::builder(treatment_lookup(), "id")
        .field("date", "date")
        .field("event", "treatment")
        .conditions(conditions)
        .delim(";")
        .build()
        .expect("valid configuration");

    let mut row = Row::from_pairs([("id", "1")]);
    merge.process(&mut row).expect("merge succeeds");

    assert_eq!(row.value("date"), Some("2019-07-21;2019-09-15"));
    assert_eq!(row.value("event"), Some("hatch;adopted"));
}

#[test]
fn sorter_orders_selected_rows_before_accumulation() {
    let sorter = RowSorter::new(
        "date",
        SortMode::Text,
        SortDirection::Desc,
        BlankPlacement::Last,
    );
    let merge = MultiRowLookup::builder(treatment_lookup(), "id")
        .field("date", "date")
        .field("event", "treatment")
        .sorter(sorter)
        .delim(";")
        .build()
        .expect("valid configuration");

    let mut row = Row::from_pairs([("id", "1")]);
    merge.process(&mut row).expect("merge succeeds");

    assert_eq!(row.value("date"), Some("2020-04-15;2019-09-15;2019-07-21"));
    assert_eq!(row.value("event"), Some("deworm;adopted;hatch"));
}

#[test]
fn multikey_accumulates_across_keys_in_key_order() {
    let merge = MultiRowLookup::builder(treatment_lookup(), "id")
        .field("date", "date")
        .field("event", "treatment")
        .multikey()
        .delim(";")
        .build()
        .expect("valid configuration");

    let mut row = Row::from_pairs([("id", "2;1")]);
    merge.process(&mut row).expect("merge succeeds");

    assert_eq!(
        row.value("date"),
        Some("2021-01-01;2019-07-21;2019-09-15;2020-04-15")
    );
    assert_eq!(row.value("event"), Some("hatch;hatch;adopted;deworm"));
}

#[test]
fn multikey_with_blank_key_writes_nulls() {
    let merge = MultiRowLookup::builder(treatment_lookup(), "id")
        .field("date", "date")
        .multikey()
        .delim(";")
        .build()
        .expect("valid configuration");

    let mut row = Row::new();
    row.insert("id", None);
    merge.process(&mut row).expect("merge succeeds");

    assert_eq!(row.get("date"), FieldRead::Null);
}

#[test]
fn constants_are_merged_once_per_matched_row() {
    let merge = MultiRowLookup::builder(treatment_lookup(), "id")
        .field("event", "treatment")
        .constant("source", "vet records")
        .delim(";")
        .build()
        .expect("valid configuration");

    let mut row = Row::from_pairs([("id", "1")]);
    merge.process(&mut row).expect("merge succeeds");
    assert_eq!(row.value("source"), Some("vet records;vet records;vet records"));

    let mut unmatched = Row::from_pairs([("id", "3")]);
    merge.process(&mut unmatched).expect("merge succeeds");
    assert_eq!(unmatched.get("source"), FieldRead::Null);
}

#[test]
fn null_placeholder_fills_gaps_in_merge_rows() {
    let lookup = LookupIndex::from_rows(
        vec![
            Row::from_pairs([("id", "1"), ("date", "2019-07-21"), ("treatment", "hatch")]),
            Row::from_pairs([("id", "1"), ("date", "2019-09-15")]),
        ],
        "id",
    );
    let merge = MultiRowLookup::builder(lookup, "id")
        .field("date", "date")
        .field("event", "treatment")
        .null_placeholder("%NULL%")
        .delim(";")
        .build()
        .expect("valid configuration");

    let mut row = Row::from_pairs([("id", "1")]);
    merge.process(&mut row).expect("merge succeeds");

    assert_eq!(row.value("date"), Some("2019-07-21;2019-09-15"));
    assert_eq!(row.value("event"), Some("hatch;%NULL%"));
}

#[test]
fn position_first_keeps_only_the_first_candidate() {
    let conditions = Conditions::new().first_only();
    let merge = MultiRowLookup::builder(treatment_lookup(), "id")
        .field("event", "treatment")
        .conditions(conditions)
        .delim(";")
        .build()
        .expect("valid configuration");

    let mut row = Row::from_pairs([("id", "1")]);
    merge.process(&mut row).expect("merge succeeds");

    assert_eq!(row.value("event"), Some("hatch"));
}

#[test]
fn merge_participates_in_a_transform_chain() {
    let merge = MultiRowLookup::builder(treatment_lookup(), "id")
        .field("event", "treatment")
        .delim(";")
        .build()
        .expect("valid configuration");
    let transforms: [&dyn Transform; 1] = [&merge];

    let rows = vec![
        Row::from_pairs([("id", "1")]),
        Row::from_pairs([("id", "2")]),
    ];
    let out = apply_chain(&transforms, rows).expect("chain succeeds");

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].value("event"), Some("hatch;adopted;deworm"));
    assert_eq!(out[1].value("event"), Some("hatch"));
}
