use std::cmp::Ordering;

/// Indices that would sort `items` ascending: applying the result with
/// [`apply_permutation`] yields the sorted sequence.
pub(crate) fn sort_permutation<T, F>(items: &[T], mut compare: F) -> Vec<usize>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut perm: Vec<usize> = (0..items.len()).collect();
    perm.sort_by(|&a, &b| compare(&items[a], &items[b]));
    perm
}

/// Reorder `items` so that position `i` receives the element previously at
/// `perm[i]`.
pub(crate) fn apply_permutation<T>(perm: &[usize], items: &mut Vec<T>) {
    debug_assert_eq!(perm.len(), items.len());
    let mut taken: Vec<Option<T>> = items.drain(..).map(Some).collect();
    items.extend(
        perm.iter()
            .map(|&i| taken[i].take().expect("permutation is not a bijection")),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_sorts() {
        let items = vec![30, 10, 20];
        let perm = sort_permutation(&items, Ord::cmp);
        assert_eq!(perm, vec![1, 2, 0]);
        let mut moved = items;
        apply_permutation(&perm, &mut moved);
        assert_eq!(moved, vec![10, 20, 30]);
    }

    #[test]
    #[should_panic(expected = "bijection")]
    fn repeated_index_is_rejected() {
        let mut items = vec![1, 2];
        apply_permutation(&[0, 0], &mut items);
    }
}
