use movie_query::BoundedSorted;
use proptest::prelude::*;

/// (key, insertion index)
type Item = (i32, usize);

fn key(item: &Item) -> i32 {
    item.0
}

fn tagged(values: &[i32]) -> Vec<Item> {
    values.iter().copied().zip(0..).collect()
}

fn keys_of(items: &[Item]) -> Vec<i32> {
    items.iter().map(|item| item.0).collect()
}

/// 沒有首尾捷徑的二分搜尋插入，中點規則相同
fn reference_insert(items: &mut Vec<Item>, value: Item, capacity: Option<usize>) {
    let mut start: isize = 0;
    let mut end: isize = items.len() as isize - 1;
    let mut position = None;
    while start <= end {
        let mid = (start + end) / 2;
        let mid_key = items[mid as usize].0;
        if value.0 == mid_key {
            position = Some(mid as usize + 1);
            break;
        } else if value.0 < mid_key {
            end = mid - 1;
        } else {
            start = mid + 1;
        }
    }
    let position = position.unwrap_or(start as usize);

    match capacity {
        Some(cap) if items.len() >= cap => {
            if position < cap {
                items.pop();
                items.insert(position, value);
            }
        }
        _ => items.insert(position, value),
    }
}

proptest! {
    #[test]
    fn prop_unbounded_stays_sorted(values in prop::collection::vec(-50i32..50, 0..200)) {
        let mut seq = BoundedSorted::unbounded(key);
        for (count, item) in tagged(&values).into_iter().enumerate() {
            prop_assert!(seq.insert(item));
            prop_assert_eq!(seq.len(), count + 1);
            prop_assert!(keys_of(seq.as_slice()).windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn prop_bounded_keeps_smallest_keys(
        values in prop::collection::vec(-50i32..50, 0..200),
        capacity in 0usize..16,
    ) {
        let mut seq = BoundedSorted::bounded(key, capacity);
        let mut seen = Vec::new();
        for item in tagged(&values) {
            seq.insert(item);
            seen.push(item.0);

            let kept = keys_of(seq.as_slice());
            prop_assert!(kept.len() <= capacity);
            prop_assert!(kept.windows(2).all(|w| w[0] <= w[1]));

            let mut expected = seen.clone();
            expected.sort();
            expected.truncate(capacity);
            prop_assert_eq!(kept, expected);
        }
    }

    #[test]
    fn prop_distinct_keys_are_order_independent(
        values in prop::collection::hash_set(-500i32..500, 0..100)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle(),
    ) {
        let mut seq = BoundedSorted::unbounded(|v: &i32| *v);
        seq.extend(values.iter().copied());

        let mut expected = values.clone();
        expected.sort();
        prop_assert_eq!(seq.into_vec(), expected);
    }

    #[test]
    fn prop_fast_paths_match_plain_binary_search(
        values in prop::collection::vec(-20i32..20, 0..150),
        capacity in prop::option::of(0usize..12),
    ) {
        let mut seq = BoundedSorted::with_limit(key, capacity);
        let mut reference = Vec::new();
        for item in tagged(&values) {
            seq.insert(item);
            reference_insert(&mut reference, item, capacity);
            prop_assert_eq!(keys_of(seq.as_slice()), keys_of(&reference));
        }
    }

    #[test]
    fn prop_non_decreasing_ties_keep_insertion_order(
        mut values in prop::collection::vec(0i32..5, 0..60),
    ) {
        values.sort();
        let items = tagged(&values);
        let mut seq = BoundedSorted::unbounded(key);
        seq.extend(items.iter().copied());
        prop_assert_eq!(seq.into_vec(), items);
    }

    #[test]
    fn prop_partitioned_scan_needs_bounded_merge(
        values in prop::collection::vec(-100i32..100, 0..200),
        split in 0usize..200,
        capacity in 1usize..10,
    ) {
        let items = tagged(&values);
        let split = split.min(items.len());

        let mut single = BoundedSorted::bounded(key, capacity);
        single.extend(items.iter().copied());

        let mut left = BoundedSorted::bounded(key, capacity);
        left.extend(items[..split].iter().copied());
        let mut right = BoundedSorted::bounded(key, capacity);
        right.extend(items[split..].iter().copied());

        prop_assert!(left.len() + right.len() <= 2 * capacity);
        left.merge(right);

        prop_assert_eq!(keys_of(left.as_slice()), keys_of(single.as_slice()));
    }
}
