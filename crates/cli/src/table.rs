// Plain-text rendering for terminal output

use agingboard_aging::classify::Classified;
use agingboard_aging::{AgeCategory, AreaAggregate};

const AREA_HEADER: &str = "Business Area";

/// One row per area, one column per bucket, plus a grand-total footer.
pub fn render_aggregate(areas: &AreaAggregate) -> String {
    let width = areas
        .area_names()
        .map(|name| name.chars().count())
        .chain(std::iter::once(AREA_HEADER.len()))
        .max()
        .unwrap_or(AREA_HEADER.len());

    let mut out = String::new();
    out.push_str(&format!("{:<width$}  {:>7}", AREA_HEADER, "total"));
    for category in AgeCategory::ALL {
        out.push_str(&format!("  {:>9}", category.label()));
    }
    out.push('\n');

    for (area, counts) in areas.iter() {
        out.push_str(&format!("{:<width$}  {:>7}", area, counts.total()));
        for (_, count) in counts.categories() {
            out.push_str(&format!("  {:>9}", count));
        }
        out.push('\n');
    }

    let totals = areas.grand_total();
    out.push_str(&format!("{:<width$}  {:>7}", "(all)", areas.sum_of_totals()));
    for category in AgeCategory::ALL {
        out.push_str(&format!("  {:>9}", totals.get(category)));
    }
    out.push('\n');
    out
}

pub fn render_records(classified: &Classified) -> String {
    let mut out = String::new();
    for record in &classified.records {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            record.business_area, record.category, record.days_since
        ));
    }
    let discarded = classified.discarded.total();
    if discarded > 0 {
        out.push_str(&format!("({} rows discarded)\n", discarded));
    }
    out
}
