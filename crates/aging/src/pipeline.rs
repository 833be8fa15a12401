use chrono::NaiveDateTime;

use crate::aggregate::aggregate_by_area;
use crate::classify::{classify_rows, Classified};
use crate::columns::ColumnMapping;
use crate::error::AgingError;
use crate::model::{AreaAggregate, RawRow};
use crate::reconcile::subtract_revisited;
use crate::view::View;

/// Classified records for `view`. Fails for the aggregate-only `belumrevisit`.
pub fn compute_records(
    rows: &[RawRow],
    view: View,
    columns: &ColumnMapping,
    now: NaiveDateTime,
) -> Result<Classified, AgingError> {
    classify_rows(rows, view, columns, now)
}

/// Per-area aggregate for `view`. `belumrevisit` is `disconnected - revisit`.
pub fn compute_aggregate(
    rows: &[RawRow],
    view: View,
    columns: &ColumnMapping,
    now: NaiveDateTime,
) -> Result<AreaAggregate, AgingError> {
    match view {
        View::Disconnected | View::Revisit => {
            let classified = classify_rows(rows, view, columns, now)?;
            Ok(aggregate_by_area(&classified.records))
        }
        View::BelumRevisit => {
            let disconnected = compute_aggregate(rows, View::Disconnected, columns, now)?;
            let revisit = compute_aggregate(rows, View::Revisit, columns, now)?;
            Ok(subtract_revisited(&disconnected, &revisit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn rows() -> Vec<RawRow> {
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

    #[test]
    fn aggregates_each_view() {
        let columns = ColumnMapping::default();
        let rows = rows();

        let disconnected = compute_aggregate(&rows, View::Disconnected, &columns, now()).unwrap();
        assert_eq!(disconnected.get("North").unwrap().total(), 2);
        assert!(!disconnected.contains("South"));

        let revisit = compute_aggregate(&rows, View::Revisit, &columns, now()).unwrap();
        assert_eq!(revisit.get("North").unwrap().total(), 1);

        let belum = compute_aggregate(&rows, View::BelumRevisit, &columns, now()).unwrap();
        assert_eq!(belum.get("North").unwrap().total(), 1);
        assert!(!belum.contains("South"));
    }

    #[test]
    fn records_for_belumrevisit_are_rejected() {
        let err = compute_records(&rows(), View::BelumRevisit, &ColumnMapping::default(), now()).unwrap_err();
        assert!(matches!(err, AgingError::AggregateOnlyView(View::BelumRevisit)));
    }

    #[test]
    fn padded_area_names_share_a_row() {
        let rows = vec![
            RawRow::from_pairs([("Business Area", "North "), ("Disconnected Date", "01.12.2024")]),
            RawRow::from_pairs([("Business Area", "North"), ("Disconnected Date", "01.12.2024")]),
        ];
        let areas = compute_aggregate(&rows, View::Disconnected, &ColumnMapping::default(), now()).unwrap();
        assert_eq!(areas.area_names().collect::<Vec<_>>(), ["North"]);
        assert_eq!(areas.get("North").unwrap().total(), 2);
    }
}
