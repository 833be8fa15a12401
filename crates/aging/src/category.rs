use serde::{Serialize, Serializer};

/// Age bucket for a day count. Ordered youngest to oldest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeCategory {
    UpToOneMonth,
    UnderThreeMonths,
    UnderSixMonths,
    UnderTwelveMonths,
    UnderTwoYears,
    OverTwoYears,
}

/// Inclusive upper bounds, checked in order. Anything above the last is `OverTwoYears`.
const LADDER: [(i64, AgeCategory); 5] = [
    (30, AgeCategory::UpToOneMonth),
    (90, AgeCategory::UnderThreeMonths),
    (180, AgeCategory::UnderSixMonths),
    (365, AgeCategory::UnderTwelveMonths),
    (730, AgeCategory::UnderTwoYears),
];

impl AgeCategory {
    pub const ALL: [AgeCategory; 6] = [
        AgeCategory::UpToOneMonth,
        AgeCategory::UnderThreeMonths,
        AgeCategory::UnderSixMonths,
        AgeCategory::UnderTwelveMonths,
        AgeCategory::UnderTwoYears,
        AgeCategory::OverTwoYears,
    ];

    /// Bucket a day count. First matching threshold wins.
    ///
    /// Negative counts (dates after "now") land in `0-1Months`.
    pub fn from_days(days: i64) -> Self {
        LADDER
            .iter()
            .find(|(limit, _)| days <= *limit)
            .map(|(_, category)| *category)
            .unwrap_or(AgeCategory::OverTwoYears)
    }

    /// Report label, as used in output column names.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UpToOneMonth => "0-1Months",
            Self::UnderThreeMonths => "<3Months",
            Self::UnderSixMonths => "<6Months",
            Self::UnderTwelveMonths => "<12Months",
            Self::UnderTwoYears => "<2Years",
            Self::OverTwoYears => ">2Years",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Position in [`AgeCategory::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for AgeCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        assert_eq!(AgeCategory::from_days(0).label(), "0-1Months");
        assert_eq!(AgeCategory::from_days(30).label(), "0-1Months");
        assert_eq!(AgeCategory::from_days(31).label(), "<3Months");
        assert_eq!(AgeCategory::from_days(90).label(), "<3Months");
        assert_eq!(AgeCategory::from_days(91).label(), "<6Months");
        assert_eq!(AgeCategory::from_days(180).label(), "<6Months");
        assert_eq!(AgeCategory::from_days(181).label(), "<12Months");
        assert_eq!(AgeCategory::from_days(365).label(), "<12Months");
        assert_eq!(AgeCategory::from_days(366).label(), "<2Years");
        assert_eq!(AgeCategory::from_days(730).label(), "<2Years");
        assert_eq!(AgeCategory::from_days(731).label(), ">2Years");
    }

    #[test]
    fn future_dates_fall_into_first_bucket() {
        // Kept as observed: the ladder has no lower bound.
        assert_eq!(AgeCategory::from_days(-1), AgeCategory::UpToOneMonth);
        assert_eq!(AgeCategory::from_days(i64::MIN), AgeCategory::UpToOneMonth);
    }

    #[test]
    fn labels_round_trip_and_index_matches_all() {
        for (i, category) in AgeCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
            assert_eq!(AgeCategory::from_label(category.label()), Some(*category));
        }
        assert_eq!(AgeCategory::from_label("3Months"), None);
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&AgeCategory::OverTwoYears).unwrap();
        assert_eq!(json, "\">2Years\"");
    }
}
