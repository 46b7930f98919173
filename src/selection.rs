use std::collections::BTreeSet;

/// Category ids checked in the post form.
///
/// Membership of each id is independent: checking a parent never touches its
/// children. Transitions return a new set instead of mutating in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<i64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Remove `id` if present, otherwise add it.
    #[must_use]
    pub fn toggle(&self, id: i64) -> Self {
        let mut ids = self.ids.clone();
        if !ids.remove(&id) {
            ids.insert(id);
        }
        Self { ids }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order.
    pub fn to_vec(&self) -> Vec<i64> {
        self.ids.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_toggle_scenario() {
        let start = Selection::from_ids([2, 3]);

        let once = start.toggle(2);
        assert_eq!(once, Selection::from_ids([3]));

        let twice = once.toggle(2);
        assert_eq!(twice, Selection::from_ids([2, 3]));
    }

    #[test]
    fn test_toggle_leaves_original_untouched() {
        let start = Selection::from_ids([1]);
        let next = start.toggle(5);
        assert!(!start.contains(5));
        assert!(next.contains(5));
        assert!(next.contains(1));
    }

    #[test]
    fn test_duplicates_collapse() {
        let selection = Selection::from_ids([4, 4, 1]);
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.to_vec(), vec![1, 4]);
    }

    #[test]
    fn test_empty() {
        let selection = Selection::new();
        assert!(selection.is_empty());
        assert!(selection.to_vec().is_empty());
    }

    proptest! {
        #[test]
        fn prop_toggle_twice_is_identity(ids in prop::collection::vec(-50i64..50, 0..20), id in -60i64..60) {
            let set = Selection::from_ids(ids);
            prop_assert_eq!(set.toggle(id).toggle(id), set);
        }

        #[test]
        fn prop_toggle_changes_only_target(ids in prop::collection::vec(-50i64..50, 0..20), id in -60i64..60) {
            let set = Selection::from_ids(ids);
            let toggled = set.toggle(id);
            prop_assert_ne!(set.contains(id), toggled.contains(id));
            for other in -60i64..60 {
                if other != id {
                    prop_assert_eq!(set.contains(other), toggled.contains(other));
                }
            }
        }
    }
}
