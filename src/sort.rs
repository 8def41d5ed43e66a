//! Partition-based sorting
//!
//! Three-way quicksort: values strictly less than the pivot, equal to it, and
//! strictly greater are split apart, the outer groups are sorted recursively
//! and the three are concatenated.

/// Sort values in ascending order
///
/// The pivot is the middle element. Recursion depth is bounded by the number
/// of distinct values, which the accepted range keeps small.
pub fn quick_sort(values: Vec<i32>) -> Vec<i32> {
    if values.len() <= 1 {
        return values;
    }

    let pivot = values[values.len() / 2];

    let mut less = Vec::new();
    let mut equal = Vec::new();
    let mut greater = Vec::new();

    for value in values {
        match value.cmp(&pivot) {
            std::cmp::Ordering::Less => less.push(value),
            std::cmp::Ordering::Equal => equal.push(value),
            std::cmp::Ordering::Greater => greater.push(value),
        }
    }

    let mut sorted = quick_sort(less);
    sorted.append(&mut equal);
    sorted.append(&mut quick_sort(greater));
    sorted
}
