use crate::domain::{CalendarItem, Page};

/// Flattens year pages into one item list, tagging each item with its page year.
pub fn flatten_pages(pages: &[Page]) -> Vec<CalendarItem> {
    pages
        .iter()
        .flat_map(|page| {
            page.items.iter().map(move |item| CalendarItem {
                page_year: page.year,
                ..item.clone()
            })
        })
        .collect()
}

/// Sorted, de-duplicated years that have a page.
pub fn available_years(pages: &[Page]) -> Vec<i32> {
    let mut years = pages.iter().map(|page| page.year).collect::<Vec<_>>();
    years.sort_unstable();
    years.dedup();
    years
}

#[cfg(test)]
mod tests {
    use crate::domain::fixtures::{date, item, page};

    use super::{available_years, flatten_pages};

    #[test]
    fn tags_items_with_their_page_year() {
        let mut stray = item("b", date(2025, 1, 1), date(2025, 1, 2));
        stray.page_year = 0;
        let pages = vec![
            page(2024, vec![item("a", date(2024, 5, 1), date(2024, 5, 3))]),
            page(2025, vec![stray]),
        ];

        let items = flatten_pages(&pages);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].page_year, 2024);
        assert_eq!(items[1].page_year, 2025);
    }

    #[test]
    fn lists_each_year_once_in_order() {
        let pages = vec![page(2026, vec![]), page(2024, vec![]), page(2026, vec![])];
        assert_eq!(available_years(&pages), vec![2024, 2026]);
    }
}
