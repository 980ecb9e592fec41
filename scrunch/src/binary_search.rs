use std::cmp::Ordering;

/// Binary search over the inclusive range [first, last] and return the index of the first element
/// for which search returns ordering of greater or equal.  Will never evaluate search(last).
pub fn binary_search_by<F: FnMut(usize) -> Ordering>(
    first: usize,
    last: usize,
    mut search: F,
) -> usize {
    let mut left = first;
    let mut right = last;
    while left < right {
        let mid = left + (right - left) / 2;
        let cmp = search(mid);
        if cmp == Ordering::Less {
            left = mid + 1;
        } else if cmp == Ordering::Greater {
            right = mid;
        } else {
            return mid;
        }
    }
    left
}

/// Return the first index in [first, last] for which the first element returns false.  Assumes
/// that the list is partitioned such that the first n elements are true and the last m are false.
pub fn partition_by<F: FnMut(usize) -> bool>(first: usize, last: usize, mut search: F) -> usize {
    binary_search_by(first, last, move |probe| {
        if search(probe) {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    })
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
