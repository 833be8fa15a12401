use std::collections::HashMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::category::AgeCategory;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single spreadsheet cell as handed over by row extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Cell coerced to text. `None` for empty cells and whitespace-only text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) if s.trim().is_empty() => None,
            Self::Text(s) => Some(s.trim().to_string()),
            // Integers without decimals
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Self::Number(n) => Some(format!("{}", n)),
            Self::Empty => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_text().is_none()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// One spreadsheet row keyed by column header. Immutable once extracted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, CellValue>,
}

impl RawRow {
    pub fn new(cells: HashMap<String, CellValue>) -> Self {
        Self { cells }
    }

    /// Build a row from `(header, value)` pairs. Handy in tests and fixtures.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<CellValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            cells: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Non-blank text of `column`, if any.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).and_then(CellValue::as_text)
    }

    pub fn has_value(&self, column: &str) -> bool {
        self.text(column).is_some()
    }

    /// True when every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_blank)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// A row that passed validation, with its age and bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedRecord {
    #[serde(rename = "BusinessArea")]
    pub business_area: String,
    pub category: AgeCategory,
    #[serde(rename = "daysSinceDisconnection")]
    pub days_since: i64,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Fixed-shape counters for one business area: total plus one per bucket.
///
/// `total` equals the sum of `by_category` for anything counted from rows.
/// Reconciled counts clamp each cell on its own and may not add up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AreaCounts {
    total: u64,
    by_category: [u64; 6],
}

impl AreaCounts {
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn get(&self, category: AgeCategory) -> u64 {
        self.by_category[category.index()]
    }

    pub fn increment(&mut self, category: AgeCategory) {
        self.total += 1;
        self.by_category[category.index()] += 1;
    }

    /// Build from per-category counts; total is derived.
    pub fn from_categories(by_category: [u64; 6]) -> Self {
        Self {
            total: by_category.iter().sum(),
            by_category,
        }
    }

    /// Build from explicit counters. Used by reconciliation, where each cell
    /// (total included) is clamped independently.
    pub(crate) fn from_parts(total: u64, by_category: [u64; 6]) -> Self {
        Self { total, by_category }
    }

    pub fn categories(&self) -> impl Iterator<Item = (AgeCategory, u64)> + '_ {
        AgeCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

impl Serialize for AreaCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        map.serialize_entry("total", &self.total)?;
        for (category, count) in self.categories() {
            map.serialize_entry(category.label(), &count)?;
        }
        map.end()
    }
}

/// Per-business-area counters, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AreaAggregate {
    areas: Vec<(String, AreaCounts)>,
    index: HashMap<String, usize>,
}

impl AreaAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for `area`, created zeroed on first use.
    pub fn entry(&mut self, area: &str) -> &mut AreaCounts {
        let idx = match self.index.get(area) {
            Some(&idx) => idx,
            None => {
                self.areas.push((area.to_string(), AreaCounts::default()));
                self.index.insert(area.to_string(), self.areas.len() - 1);
                self.areas.len() - 1
            }
        };
        &mut self.areas[idx].1
    }

    pub(crate) fn insert(&mut self, area: &str, counts: AreaCounts) {
        *self.entry(area) = counts;
    }

    pub fn get(&self, area: &str) -> Option<&AreaCounts> {
        self.index.get(area).map(|&idx| &self.areas[idx].1)
    }

    pub fn contains(&self, area: &str) -> bool {
        self.index.contains_key(area)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AreaCounts)> {
        self.areas.iter().map(|(name, counts)| (name.as_str(), counts))
    }

    pub fn area_names(&self) -> impl Iterator<Item = &str> {
        self.areas.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Sum of all areas' counters.
    pub fn grand_total(&self) -> CategoryCounts {
        let mut by_category = [0u64; 6];
        for (_, counts) in &self.areas {
            for (category, count) in counts.categories() {
                by_category[category.index()] += count;
            }
        }
        CategoryCounts::from_array(by_category)
    }

    /// Sum of the per-area totals. Differs from `grand_total().total()` only
    /// for reconciled aggregates whose totals were clamped on their own.
    pub fn sum_of_totals(&self) -> u64 {
        self.areas.iter().map(|(_, counts)| counts.total()).sum()
    }

    /// Same areas and counts, ignoring first-appearance order.
    pub fn same_counts(&self, other: &AreaAggregate) -> bool {
        self.len() == other.len()
            && self.iter().all(|(area, counts)| other.get(area) == Some(counts))
    }
}

impl Serialize for AreaAggregate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.areas.len()))?;
        for (name, counts) in &self.areas {
            map.serialize_entry(name, counts)?;
        }
        map.end()
    }
}

/// Overall count per bucket, across every business area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    #[serde(rename = "0-1Months")]
    pub up_to_one_month: u64,
    #[serde(rename = "<3Months")]
    pub under_three_months: u64,
    #[serde(rename = "<6Months")]
    pub under_six_months: u64,
    #[serde(rename = "<12Months")]
    pub under_twelve_months: u64,
    #[serde(rename = "<2Years")]
    pub under_two_years: u64,
    #[serde(rename = ">2Years")]
    pub over_two_years: u64,
}

impl CategoryCounts {
    pub fn from_array(counts: [u64; 6]) -> Self {
        Self {
            up_to_one_month: counts[0],
            under_three_months: counts[1],
            under_six_months: counts[2],
            under_twelve_months: counts[3],
            under_two_years: counts[4],
            over_two_years: counts[5],
        }
    }

    pub fn from_records(records: &[ClassifiedRecord]) -> Self {
        let mut counts = [0u64; 6];
        for record in records {
            counts[record.category.index()] += 1;
        }
        Self::from_array(counts)
    }

    pub fn get(&self, category: AgeCategory) -> u64 {
        match category {
            AgeCategory::UpToOneMonth => self.up_to_one_month,
            AgeCategory::UnderThreeMonths => self.under_three_months,
            AgeCategory::UnderSixMonths => self.under_six_months,
            AgeCategory::UnderTwelveMonths => self.under_twelve_months,
            AgeCategory::UnderTwoYears => self.under_two_years,
            AgeCategory::OverTwoYears => self.over_two_years,
        }
    }

    pub fn total(&self) -> u64 {
        AgeCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }
}
