use std::time::Duration;

use chrono::NaiveDate;

use agingboard_aging::cache::TtlCache;
use agingboard_aging::{
    compute_aggregate, AgeCategory, AgingError, ColumnMapping, DatasetSession, FixedClock, RawRow, View,
};

fn as_of() -> FixedClock {
    FixedClock::at_midnight(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
}

/// Three rows: one disconnected only, one revisited, one with a blank date.
fn scenario_rows() -> Vec<RawRow> {
    vec![
        RawRow::from_pairs([("Business Area", "North"), ("Disconnected Date", "01.01.2024")]),
        RawRow::from_pairs([
            ("Business Area", "North"),
            ("Disconnected Date", "01.06.2024"),
            ("Latest Revisit Date", "01.07.2024"),
        ]),
        RawRow::from_pairs([("Business Area", "South"), ("Disconnected Date", "")]),
    ]
}

fn session() -> DatasetSession<TtlCache> {
    DatasetSession::new(ColumnMapping::default(), TtlCache::new(Duration::from_secs(600))).with_clock(as_of())
}

// -------------------------------------------------------------------------
// End-to-end
// -------------------------------------------------------------------------

#[test]
fn three_views_end_to_end() {
    let mut s = session();
    s.load(scenario_rows(), "scenario");

    let disconnected = s.aggregate(View::Disconnected).unwrap();
    let north = disconnected.get("North").unwrap();
    assert_eq!(north.total(), 2);
    assert_eq!(north.get(AgeCategory::UnderTwoYears), 1); // 366 days
    assert_eq!(north.get(AgeCategory::UnderTwelveMonths), 1); // 214 days
    assert!(!disconnected.contains("South"));

    let revisit = s.aggregate(View::Revisit).unwrap();
    assert_eq!(revisit.get("North").unwrap().total(), 1);
    assert_eq!(revisit.get("North").unwrap().get(AgeCategory::UnderTwelveMonths), 1);

    let belum = s.aggregate(View::BelumRevisit).unwrap();
    let north = belum.get("North").unwrap();
    assert_eq!(north.total(), 1);
    assert_eq!(north.get(AgeCategory::UnderTwoYears), 1);
    assert_eq!(north.get(AgeCategory::UnderTwelveMonths), 0);
    assert!(!belum.contains("South"));
}

#[test]
fn records_per_view() {
    let mut s = session();
    s.load(scenario_rows(), "scenario");

    let disconnected = s.records(View::Disconnected).unwrap();
    assert_eq!(disconnected.records.len(), 2);
    assert_eq!(disconnected.discarded.missing_date, 1);

    let revisit = s.records(View::Revisit).unwrap();
    assert_eq!(revisit.records.len(), 1);
    assert_eq!(revisit.records[0].days_since, 214);

    let err = s.records(View::BelumRevisit).unwrap_err();
    assert_eq!(err.code(), "AGGREGATE_ONLY_VIEW");
}

#[test]
fn rows_without_business_area_never_counted() {
    let mut rows = scenario_rows();
    rows.push(RawRow::from_pairs([("Disconnected Date", "01.01.2024")]));
    rows.push(RawRow::from_pairs([("Business Area", "  "), ("Disconnected Date", "01.01.2024")]));

    let now = as_of().0;
    let columns = ColumnMapping::default();
    for view in View::ALL {
        let agg = compute_aggregate(&rows, view, &columns, now).unwrap();
        let total: u64 = agg.iter().map(|(_, c)| c.total()).sum();
        let expected = match view {
            View::Disconnected => 2,
            View::Revisit | View::BelumRevisit => 1,
        };
        assert_eq!(total, expected, "view {view}");
        assert!(agg.area_names().all(|a| !a.trim().is_empty()));
    }
}

#[test]
fn custom_column_names() {
    let columns = ColumnMapping {
        business_area: "BA".into(),
        disconnected_date: "Disc".into(),
        revisit_date: "Rev".into(),
    };
    let rows = vec![
        RawRow::from_pairs([("BA", "North"), ("Disc", "01.12.2024"), ("Rev", "02.12.2024")]),
        RawRow::from_pairs([("BA", "North"), ("Disc", "01.12.2024")]),
    ];
    let mut s = DatasetSession::new(columns, TtlCache::new(Duration::from_secs(60))).with_clock(as_of());
    s.load(rows, "custom");
    let belum = s.aggregate(View::BelumRevisit).unwrap();
    assert_eq!(belum.get("North").unwrap().get(AgeCategory::UnderThreeMonths), 1);
}

#[test]
fn invalid_view_token_is_client_error() {
    let err = "Disconnected".parse::<View>().unwrap_err();
    assert!(matches!(err, AgingError::InvalidView(_)));
    assert!(err.is_client_error());
}
