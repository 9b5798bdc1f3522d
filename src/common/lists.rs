//! Searching and grouping helpers over sorted slices.
//!
//! The `*_monotonous` searches require the predicate to be monotone over the
//! slice: `true` for a prefix and `false` afterwards (`find_last_*`), or `false`
//! for a prefix and `true` afterwards (`find_first_*`).

/// Index of the last item for which `predicate` holds, searching `items[start..]`.
pub fn find_last_idx_monotonous_from<T>(
    items: &[T],
    start: usize,
    predicate: impl Fn(&T) -> bool,
) -> Option<usize> {
    let start = start.min(items.len());
    let split = start + items[start..].partition_point(|item| predicate(item));
    split.checked_sub(1)
}

pub fn find_last_idx_monotonous<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> Option<usize> {
    find_last_idx_monotonous_from(items, 0, predicate)
}

pub fn find_last_monotonous<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> Option<&T> {
    find_last_idx_monotonous(items, predicate).map(|idx| &items[idx])
}

/// Index of the first item for which `predicate` holds, or `items.len()`.
pub fn find_first_idx_monotonous_or_len<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> usize {
    items.partition_point(|item| !predicate(item))
}

pub fn find_first_monotonous<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> Option<&T> {
    items.get(find_first_idx_monotonous_or_len(items, predicate))
}

/// Repeated `find_last_monotonous` over the same slice with predicates that only
/// ever accept more items than the previous one. Each search resumes from the
/// previous hit instead of the start of the slice.
#[derive(Debug)]
pub struct MonotonousList<'a, T> {
    items: &'a [T],
    last_idx: usize,
    #[cfg(feature = "debug_invariants")]
    prev_matches: Option<Vec<bool>>,
}

impl<'a, T> MonotonousList<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self {
            items,
            last_idx: 0,
            #[cfg(feature = "debug_invariants")]
            prev_matches: None,
        }
    }

    pub fn find_last_monotonous(&mut self, predicate: impl Fn(&T) -> bool) -> Option<&'a T> {
        #[cfg(feature = "debug_invariants")]
        {
            let matches: Vec<bool> = self.items.iter().map(&predicate).collect();
            if let Some(prev) = &self.prev_matches {
                assert!(
                    prev.iter().zip(&matches).all(|(before, now)| !before || *now),
                    "MonotonousList predicates must accept a growing prefix"
                );
            }
            self.prev_matches = Some(matches);
        }

        // Items before the resume point are known to satisfy the predicate.
        let found = find_last_idx_monotonous_from(self.items, self.last_idx, predicate);
        self.last_idx = found.map_or(0, |idx| idx + 1);
        found.map(|idx| &self.items[idx])
    }
}

/// Splits `items` into maximal runs where every consecutive pair satisfies
/// `should_be_grouped`.
pub fn group_adjacent_by<T>(
    items: impl IntoIterator<Item = T>,
    should_be_grouped: impl Fn(&T, &T) -> bool,
) -> Vec<Vec<T>> {
    let mut groups: Vec<Vec<T>> = Vec::new();
    for item in items {
        match groups.last_mut() {
            Some(group)
                if group
                    .last()
                    .is_some_and(|last| should_be_grouped(last, &item)) =>
            {
                group.push(item)
            }
            _ => groups.push(vec![item]),
        }
    }
    groups
}

pub fn for_each_with_neighbors<T>(items: &[T], mut f: impl FnMut(Option<&T>, &T, Option<&T>)) {
    for (i, item) in items.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| &items[p]);
        f(prev, item, items.get(i + 1));
    }
}

pub fn check_adjacent_items<T>(items: &[T], predicate: impl Fn(&T, &T) -> bool) -> bool {
    items.windows(2).all(|pair| predicate(&pair[0], &pair[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, None)]
    #[case(1, Some(0))]
    #[case(5, Some(2))]
    #[case(100, Some(4))]
    fn last_idx_of_values_at_most(#[case] bound: i32, #[case] expected: Option<usize>) {
        let items = [1, 3, 5, 7, 9];
        assert_eq!(find_last_idx_monotonous(&items, |v| *v <= bound), expected);
    }

    #[test]
    fn first_idx_falls_back_to_len() {
        let items = [1, 3, 5];
        assert_eq!(find_first_idx_monotonous_or_len(&items, |v| *v >= 4), 2);
        assert_eq!(find_first_idx_monotonous_or_len(&items, |v| *v >= 10), 3);
        assert_eq!(find_first_monotonous(&items, |v| *v >= 10), None);
    }

    #[test]
    fn monotonous_list_resumes_from_last_hit() {
        let items = [2, 4, 6, 8, 10];
        let mut list = MonotonousList::new(&items);
        assert_eq!(list.find_last_monotonous(|v| *v <= 1), None);
        assert_eq!(list.find_last_monotonous(|v| *v <= 5), Some(&4));
        assert_eq!(list.find_last_monotonous(|v| *v <= 5), Some(&4));
        assert_eq!(list.find_last_monotonous(|v| *v <= 9), Some(&8));
        assert_eq!(list.find_last_monotonous(|v| *v <= 100), Some(&10));
    }

    #[test]
    fn group_adjacent_by_runs() {
        let groups = group_adjacent_by(vec![1, 2, 3, 7, 8, 12], |a, b| b - a == 1);
        assert_eq!(groups, vec![vec![1, 2, 3], vec![7, 8], vec![12]]);
    }

    #[test]
    fn neighbors_are_reported() {
        let mut seen = Vec::new();
        for_each_with_neighbors(&[1, 2, 3], |prev, cur, next| {
            seen.push((prev.copied(), *cur, next.copied()))
        });
        assert_eq!(
            seen,
            vec![(None, 1, Some(2)), (Some(1), 2, Some(3)), (Some(2), 3, None)]
        );
    }

    #[test]
    fn adjacency_check() {
        assert!(check_adjacent_items(&[1, 2, 5], |a, b| a < b));
        assert!(!check_adjacent_items(&[1, 5, 2], |a, b| a < b));
        assert!(check_adjacent_items::<i32>(&[], |a, b| a < b));
    }
}
