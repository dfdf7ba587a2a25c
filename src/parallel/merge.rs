/// Recursive top-down merge sort, stable, with one scratch buffer sized to `items`.
pub fn merge_sort<T, F>(items: &mut [T], less: &F)
where
    T: Copy,
    F: Fn(&T, &T) -> bool,
{
    if items.len() < 2 {
        return;
    }
    let mut scratch = items.to_vec();
    sort_range(items, &mut scratch, less);
}

fn sort_range<T, F>(items: &mut [T], scratch: &mut [T], less: &F)
where
    T: Copy,
    F: Fn(&T, &T) -> bool,
{
    let len = items.len();
    if len < 2 {
        return;
    }
    let mid = len / 2;
    {
        let (left, right) = items.split_at_mut(mid);
        let (scratch_left, scratch_right) = scratch.split_at_mut(mid);
        sort_range(left, scratch_left, less);
        sort_range(right, scratch_right, less);
    }
    scratch.copy_from_slice(items);
    let (left, right) = scratch.split_at(mid);
    merge_into(left, right, items, less);
}

/// Merges the sorted runs `items[..mid]` and `items[mid..]` in place, using
/// auxiliary copies of both runs. No-op when either run is empty.
pub fn merge_adjacent<T, F>(items: &mut [T], mid: usize, less: &F)
where
    T: Copy,
    F: Fn(&T, &T) -> bool,
{
    if mid == 0 || mid >= items.len() {
        return;
    }
    let left = items[..mid].to_vec();
    let right = items[mid..].to_vec();
    merge_into(&left, &right, items, less);
}

/// Two-pointer merge. Takes from `left` unless the `right` head strictly
/// precedes it, so equal elements keep their relative order.
fn merge_into<T, F>(left: &[T], right: &[T], out: &mut [T], less: &F)
where
    T: Copy,
    F: Fn(&T, &T) -> bool,
{
    debug_assert_eq!(left.len() + right.len(), out.len());

    let (mut i, mut j, mut k) = (0, 0, 0);
    while i < left.len() && j < right.len() {
        if less(&right[j], &left[i]) {
            out[k] = right[j];
            j += 1;
        } else {
            out[k] = left[i];
            i += 1;
        }
        k += 1;
    }

    let rest_left = &left[i..];
    out[k..k + rest_left.len()].copy_from_slice(rest_left);
    k += rest_left.len();
    out[k..].copy_from_slice(&right[j..]);
}
