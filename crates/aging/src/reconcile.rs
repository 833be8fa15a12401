//! Derived "not yet revisited" aggregate: disconnected minus revisited.

use crate::category::AgeCategory;
use crate::model::{AreaAggregate, AreaCounts};

/// Subtract `revisit` from `disconnected` cell by cell, flooring at zero.
///
/// Only areas present in `disconnected` are emitted, in its order. Areas
/// missing from `revisit` subtract nothing. `total` is clamped on its own,
/// like every category cell.
pub fn subtract_revisited(disconnected: &AreaAggregate, revisit: &AreaAggregate) -> AreaAggregate {
    let empty = AreaCounts::default();
    let mut out = AreaAggregate::new();
    let mut clamped_cells = 0usize;

    for (area, base) in disconnected.iter() {
        let seen = revisit.get(area).unwrap_or(&empty);

        let mut by_category = [0u64; 6];
        for category in AgeCategory::ALL {
            let (value, clamped) = floor_sub(base.get(category), seen.get(category));
            by_category[category.index()] = value;
            clamped_cells += usize::from(clamped);
        }
        let (total, clamped) = floor_sub(base.total(), seen.total());
        clamped_cells += usize::from(clamped);

        out.insert(area, AreaCounts::from_parts(total, by_category));
    }

    let ignored = revisit.area_names().filter(|a| !disconnected.contains(a)).count();
    if clamped_cells > 0 || ignored > 0 {
        tracing::debug!(clamped_cells, ignored_areas = ignored, "revisit counts exceed disconnected counts");
    }

    out
}

fn floor_sub(base: u64, minus: u64) -> (u64, bool) {
    match base.checked_sub(minus) {
        Some(v) => (v, false),
        None => (0, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(by_category: [u64; 6]) -> AreaCounts {
        AreaCounts::from_categories(by_category)
    }

    fn agg(entries: &[(&str, [u64; 6])]) -> AreaAggregate {
        let mut out = AreaAggregate::new();
        for (area, c) in entries {
            out.insert(area, counts(*c));
        }
        out
    }

    #[test]
    fn subtracts_per_cell() {
        let disconnected = agg(&[("North", [3, 2, 1, 0, 0, 4])]);
        let revisit = agg(&[("North", [1, 2, 0, 0, 0, 1])]);
        let out = subtract_revisited(&disconnected, &revisit);
        let north = out.get("North").unwrap();
        assert_eq!(north.get(AgeCategory::UpToOneMonth), 2);
        assert_eq!(north.get(AgeCategory::UnderThreeMonths), 0);
        assert_eq!(north.get(AgeCategory::UnderSixMonths), 1);
        assert_eq!(north.get(AgeCategory::OverTwoYears), 3);
        assert_eq!(north.total(), 6);
    }

    #[test]
    fn area_missing_from_revisit_is_unchanged() {
        let disconnected = agg(&[("North", [1, 0, 0, 0, 0, 0]), ("South", [0, 2, 0, 0, 0, 0])]);
        let revisit = agg(&[("North", [1, 0, 0, 0, 0, 0])]);
        let out = subtract_revisited(&disconnected, &revisit);
        assert_eq!(out.get("South"), disconnected.get("South"));
        assert_eq!(out.get("North").unwrap().total(), 0);
    }

    #[test]
    fn negative_residuals_clamp_to_zero() {
        let disconnected = agg(&[("North", [1, 0, 0, 0, 0, 0])]);
        let revisit = agg(&[("North", [0, 3, 0, 0, 0, 0])]);
        let out = subtract_revisited(&disconnected, &revisit);
        let north = out.get("North").unwrap();
        assert_eq!(north.get(AgeCategory::UpToOneMonth), 1);
        assert_eq!(north.get(AgeCategory::UnderThreeMonths), 0);
        // total: max(0, 1 - 3)
        assert_eq!(north.total(), 0);
    }

    #[test]
    fn revisit_only_areas_are_ignored() {
        let disconnected = agg(&[("North", [1, 0, 0, 0, 0, 0])]);
        let revisit = agg(&[("Ghost", [5, 0, 0, 0, 0, 0])]);
        let out = subtract_revisited(&disconnected, &revisit);
        assert!(!out.contains("Ghost"));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn keeps_disconnected_order() {
        let disconnected = agg(&[("B", [1, 0, 0, 0, 0, 0]), ("A", [1, 0, 0, 0, 0, 0])]);
        let revisit = agg(&[("A", [1, 0, 0, 0, 0, 0]), ("B", [0, 0, 0, 0, 0, 0])]);
        let out = subtract_revisited(&disconnected, &revisit);
        let names: Vec<&str> = out.area_names().collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
