use crate::model::{AreaAggregate, ClassifiedRecord};

/// Group records by business area, counting the total and each age bucket.
///
/// Counts do not depend on input order; area order follows first appearance.
pub fn aggregate_by_area<'a, I>(records: I) -> AreaAggregate
where
    I: IntoIterator<Item = &'a ClassifiedRecord>,
{
    let mut aggregate = AreaAggregate::new();
    for record in records {
        aggregate.entry(&record.business_area).increment(record.category);
    }
    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::AgeCategory;

    fn record(area: &str, days: i64) -> ClassifiedRecord {
        ClassifiedRecord {
            business_area: area.into(),
            category: AgeCategory::from_days(days),
            days_since: days,
        }
    }

    #[test]
    fn basic_aggregation() {
        let records = vec![record("North", 10), record("North", 400), record("South", 800)];
        let agg = aggregate_by_area(&records);
        assert_eq!(agg.len(), 2);

        let north = agg.get("North").unwrap();
        assert_eq!(north.total(), 2);
        assert_eq!(north.get(AgeCategory::UpToOneMonth), 1);
        assert_eq!(north.get(AgeCategory::UnderTwoYears), 1);
        assert_eq!(north.get(AgeCategory::OverTwoYears), 0);

        let south = agg.get("South").unwrap();
        assert_eq!(south.total(), 1);
        assert_eq!(south.get(AgeCategory::OverTwoYears), 1);
    }

    #[test]
    fn first_appearance_order() {
        let records = vec![record("West", 1), record("East", 1), record("West", 1)];
        let agg = aggregate_by_area(&records);
        let names: Vec<&str> = agg.area_names().collect();
        assert_eq!(names, vec!["West", "East"]);
    }

    #[test]
    fn empty_input() {
        let agg = aggregate_by_area(&Vec::<ClassifiedRecord>::new());
        assert!(agg.is_empty());
    }
}
