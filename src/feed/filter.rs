//! Category filtering of the loaded items.
//!
//! Recomputed on every render; a linear scan over the loaded items is cheap
//! enough at feed sizes and keeps the filter free of cache invalidation.

use crate::provider::{CategoryId, ContentItem};

/// Items visible under `selected`, in arrival order.
///
/// `CategoryId::ALL` shows everything.
pub fn visible_items(items: &[ContentItem], selected: CategoryId) -> Vec<&ContentItem> {
    if selected.is_all() {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.category == selected).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::make_item;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn items_with_categories(categories: &[u8]) -> Vec<ContentItem> {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        categories
            .iter()
            .enumerate()
            .map(|(i, &c)| make_item(i as u64 + 1, c, ts))
            .collect()
    }

    fn ids(items: &[&ContentItem]) -> Vec<u64> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn all_returns_everything_in_order() {
        let items = items_with_categories(&[3, 1, 3, 2]);
        assert_eq!(ids(&visible_items(&items, CategoryId::ALL)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn selection_keeps_only_matching_in_arrival_order() {
        let items = items_with_categories(&[3, 1, 3, 2, 3]);
        assert_eq!(ids(&visible_items(&items, CategoryId(3))), vec![1, 3, 5]);
    }

    #[test]
    fn unknown_category_yields_nothing() {
        let items = items_with_categories(&[1, 2]);
        assert!(visible_items(&items, CategoryId(7)).is_empty());
    }

    #[test]
    fn empty_feed_stays_empty() {
        assert!(visible_items(&[], CategoryId(1)).is_empty());
    }

    proptest! {
        #[test]
        fn filter_matches_exactly_the_selected_category(
            categories in prop::collection::vec(1u8..=8, 0..64),
            selected in 0u8..=8,
        ) {
            let items = items_with_categories(&categories);
            let visible = visible_items(&items, CategoryId(selected));

            let expected: Vec<u64> = items
                .iter()
                .filter(|i| selected == 0 || i.category.0 == selected)
                .map(|i| i.id)
                .collect();
            prop_assert_eq!(ids(&visible), expected);
        }
    }
}
