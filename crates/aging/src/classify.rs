use chrono::NaiveDateTime;
use serde::Serialize;

use crate::category::AgeCategory;
use crate::columns::ColumnMapping;
use crate::date_age::{days_since, DateAgeError};
use crate::error::AgingError;
use crate::model::{ClassifiedRecord, RawRow};
use crate::view::View;

/// Why a row did not become a [`ClassifiedRecord`]. Dropping is expected
/// data cleaning, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discard {
    MissingBusinessArea,
    MissingDate,
    UnparseableDate(DateAgeError),
    /// Filtered out by the `revisit` view before classification.
    NoRevisitDate,
}

/// Per-reason counts of dropped rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiscardTally {
    pub missing_business_area: usize,
    pub missing_date: usize,
    pub unparseable_date: usize,
    pub no_revisit_date: usize,
}

impl DiscardTally {
    pub fn record(&mut self, discard: &Discard) {
        match discard {
            Discard::MissingBusinessArea => self.missing_business_area += 1,
            Discard::MissingDate => self.missing_date += 1,
            Discard::UnparseableDate(_) => self.unparseable_date += 1,
            Discard::NoRevisitDate => self.no_revisit_date += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_business_area + self.missing_date + self.unparseable_date + self.no_revisit_date
    }
}

/// Records that survived classification plus what was dropped.
#[derive(Debug, Clone, Default)]
pub struct Classified {
    pub records: Vec<ClassifiedRecord>,
    pub discarded: DiscardTally,
}

/// Classify one row: business area must be present and `date_column` must
/// hold a valid `dd.mm.yyyy` date.
pub fn classify_row(
    row: &RawRow,
    business_area_column: &str,
    date_column: &str,
    now: NaiveDateTime,
) -> Result<ClassifiedRecord, Discard> {
    let business_area = row
        .text(business_area_column)
        .ok_or(Discard::MissingBusinessArea)?;

    let date = row.text(date_column).ok_or(Discard::MissingDate)?;
    let days = days_since(&date, now).map_err(Discard::UnparseableDate)?;

    Ok(ClassifiedRecord {
        business_area,
        category: AgeCategory::from_days(days),
        days_since: days,
    })
}

/// Apply the view's filter and classify each surviving row.
///
/// `revisit` keeps only rows with a revisit date, then ages them by
/// disconnection date like every other view. `belumrevisit` has no
/// per-record form.
pub fn classify_rows(
    rows: &[RawRow],
    view: View,
    columns: &ColumnMapping,
    now: NaiveDateTime,
) -> Result<Classified, AgingError> {
    if !view.has_records() {
        return Err(AgingError::AggregateOnlyView(view));
    }

    let mut out = Classified::default();
    for row in rows {
        if view.requires_revisit_date() && !row.has_value(&columns.revisit_date) {
            out.discarded.record(&Discard::NoRevisitDate);
            continue;
        }
        match classify_row(row, &columns.business_area, columns.age_column(), now) {
            Ok(record) => out.records.push(record),
            Err(discard) => out.discarded.record(&discard),
        }
    }

    tracing::debug!(
        view = %view,
        rows = rows.len(),
        classified = out.records.len(),
        discarded = out.discarded.total(),
        "classified rows"
    );

    Ok(out)
}
