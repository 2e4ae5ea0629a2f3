use crate::aggregate::flatten_pages;
use crate::consolidate::{ConsolidatedItem, consolidate};
use crate::domain::{Page, WheelStructure};
use crate::error::Irregularity;
use crate::filter::{YearFilter, filter_items};
use crate::grouping::{GroupBy, GroupedItems, group_items};

/// Gantt-ready view of a wheel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GanttData {
    pub grouped_items: GroupedItems,
    /// Every visible item after consolidation, including ones the grouping left out.
    pub all_items: Vec<ConsolidatedItem>,
    pub irregularities: Vec<Irregularity>,
}

/// Aggregates pages, filters by year, merges cross-year segments and buckets
/// the result into rows.
pub fn consolidate_and_group(
    pages: &[Page],
    structure: &WheelStructure,
    year_filter: YearFilter,
    group_by: GroupBy,
) -> GanttData {
    let every_item = flatten_pages(pages);
    let visible = filter_items(&every_item, year_filter);
    let consolidation = consolidate(&visible, &every_item);
    let grouping = group_items(&consolidation.items, structure, group_by);

    let mut irregularities = consolidation.irregularities;
    irregularities.extend(grouping.irregularities);
    if !irregularities.is_empty() {
        tracing::debug!(
            count = irregularities.len(),
            %year_filter,
            %group_by,
            "recovered from calendar data irregularities"
        );
    }

    GanttData {
        grouped_items: grouping.grouped,
        all_items: consolidation.items,
        irregularities,
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::fixtures::{date, item, linked, page, structure};
    use crate::filter::YearFilter;
    use crate::grouping::{GroupBy, GroupKey};

    use super::consolidate_and_group;

    #[test]
    fn year_filter_still_yields_the_full_cross_year_span() {
        let pages = vec![
            page(2024, vec![linked("seg1", date(2024, 11, 1), date(2024, 12, 31), "x")]),
            page(2025, vec![linked("seg2", date(2025, 1, 1), date(2025, 2, 15), "x")]),
        ];

        for filter in [YearFilter::All, YearFilter::Year(2024)] {
            let data = consolidate_and_group(&pages, &structure(), filter, GroupBy::Rings);
            assert_eq!(data.all_items.len(), 1);
            assert_eq!(data.all_items[0].start_date(), date(2024, 11, 1));
            assert_eq!(data.all_items[0].end_date(), date(2025, 2, 15));

            let bucket = &data.grouped_items[&GroupKey::Group("ring-a".to_string())];
            assert_eq!(bucket.len(), 1);
            assert_eq!(bucket[0].segment_ids, vec!["seg1", "seg2"]);
        }
    }

    #[test]
    fn label_grouping_keeps_unlabeled_items() {
        let pages = vec![page(2025, vec![item("a", date(2025, 4, 1), date(2025, 4, 2))])];
        let data = consolidate_and_group(&pages, &structure(), YearFilter::All, GroupBy::Labels);
        assert_eq!(data.grouped_items[&GroupKey::Unlabeled].len(), 1);
    }

    #[test]
    fn unresolved_ring_is_absent_from_rows_but_present_in_all_items() {
        let mut stray = item("stray", date(2025, 4, 1), date(2025, 4, 2));
        stray.ring_id = "missing".to_string();
        let pages = vec![page(2025, vec![stray])];

        let data = consolidate_and_group(&pages, &structure(), YearFilter::All, GroupBy::Rings);
        assert!(data.grouped_items.values().all(|bucket| bucket.is_empty()));
        assert_eq!(data.all_items.len(), 1);
        assert_eq!(data.irregularities.len(), 1);
    }

    #[test]
    fn recomputation_is_value_equal() {
        let pages = vec![page(2025, vec![item("a", date(2025, 4, 1), date(2025, 4, 2))])];
        let first = consolidate_and_group(&pages, &structure(), YearFilter::Year(2025), GroupBy::ActivityGroups);
        let second = consolidate_and_group(&pages, &structure(), YearFilter::Year(2025), GroupBy::ActivityGroups);
        assert_eq!(first, second);
    }
}
