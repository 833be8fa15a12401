use chrono::NaiveDateTime;
use serde::Serialize;

use crate::aggregate::aggregate_by_area;
use crate::classify::{Classified, DiscardTally};
use crate::columns::ColumnMapping;
use crate::error::AgingError;
use crate::model::{AreaAggregate, CategoryCounts, ClassifiedRecord, RawRow};
use crate::pipeline::{compute_aggregate, compute_records};
use crate::view::View;

/// Full processing result for one view: records, bucket totals, per-area counts.
#[derive(Debug, Clone, Serialize)]
pub struct AgingReport {
    pub view: View,
    pub as_of: String,
    #[serde(rename = "daysProcessed")]
    pub records: Vec<ClassifiedRecord>,
    #[serde(rename = "categoryCounts")]
    pub category_counts: CategoryCounts,
    #[serde(rename = "BACount")]
    pub areas: AreaAggregate,
    pub discarded: DiscardTally,
}

impl AgingReport {
    /// Assemble from already-computed parts. `classified` is `None` for
    /// aggregate-only views, whose bucket totals come from `areas`.
    pub fn from_parts(
        view: View,
        now: NaiveDateTime,
        classified: Option<Classified>,
        areas: AreaAggregate,
    ) -> Self {
        let (records, discarded, category_counts) = match classified {
            Some(c) => {
                let counts = CategoryCounts::from_records(&c.records);
                (c.records, c.discarded, counts)
            }
            None => (Vec::new(), DiscardTally::default(), areas.grand_total()),
        };

        Self {
            view,
            as_of: now.format("%Y-%m-%dT%H:%M:%S").to_string(),
            records,
            category_counts,
            areas,
            discarded,
        }
    }
}

/// Compute the report for `view` directly from rows, without memoization.
pub fn build_report(
    rows: &[RawRow],
    view: View,
    columns: &ColumnMapping,
    now: NaiveDateTime,
) -> Result<AgingReport, AgingError> {
    if view.has_records() {
        let classified = compute_records(rows, view, columns, now)?;
        let areas = aggregate_by_area(&classified.records);
        Ok(AgingReport::from_parts(view, now, Some(classified), areas))
    } else {
        let areas = compute_aggregate(rows, view, columns, now)?;
        Ok(AgingReport::from_parts(view, now, None, areas))
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
            RawRow::from_pairs([("Business Area", "North"), ("Disconnected Date", "20.12.2024")]),
            RawRow::from_pairs([("Business Area", "South"), ("Disconnected Date", "01.01.2020")]),
            RawRow::from_pairs([("Business Area", ""), ("Disconnected Date", "01.01.2020")]),
        ]
    }

    #[test]
    fn disconnected_report() {
        let report = build_report(&rows(), View::Disconnected, &ColumnMapping::default(), now()).unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.category_counts.up_to_one_month, 1);
        assert_eq!(report.category_counts.over_two_years, 1);
        assert_eq!(report.discarded.missing_business_area, 1);
        assert_eq!(report.areas.len(), 2);
        assert_eq!(report.as_of, "2025-01-01T00:00:00");
    }

    #[test]
    fn belumrevisit_report_has_no_records() {
        let report = build_report(&rows(), View::BelumRevisit, &ColumnMapping::default(), now()).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.category_counts.total(), 2);
        assert_eq!(report.areas.get("South").unwrap().total(), 1);
    }

    #[test]
    fn serializes_with_report_keys() {
        let report = build_report(&rows(), View::Disconnected, &ColumnMapping::default(), now()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["view"], "disconnected");
        assert_eq!(json["daysProcessed"].as_array().unwrap().len(), 2);
        assert_eq!(json["categoryCounts"][">2Years"], 1);
        assert_eq!(json["BACount"]["North"]["total"], 1);
    }
}
