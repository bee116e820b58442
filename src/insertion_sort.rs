//! Small-range sorters: a quadratic insertion sort for short subranges and a
//! budgeted partial variant that detects nearly sorted input.

use crate::IndexOrd;

/// Sorts `data[a..b]` using insertion sort, which is *O*(*n*²) worst-case.
pub(crate) fn insertion_sort<S>(data: &mut S, a: usize, b: usize)
where
	S: IndexOrd + ?Sized,
{
	for i in a + 1..b {
		for j in (a + 1..=i).rev() {
			if !data.less(j, j - 1) {
				break;
			}
			data.swap(j, j - 1);
		}
	}
}

/// Partially sorts `data[a..b]` by shifting several out-of-order elements around.
///
/// Returns `true` if the subrange is sorted at the end. This function is *O*(*n*)
/// worst-case.
#[cold]
pub(crate) fn partial_insertion_sort<S>(data: &mut S, a: usize, b: usize) -> bool
where
	S: IndexOrd + ?Sized,
{
	// Maximum number of adjacent out-of-order pairs that will get shifted.
	const MAX_STEPS: usize = 5;
	// If the subrange is shorter than this, don't shift any elements.
	const SHORTEST_SHIFTING: usize = 50;

	let mut i = a + 1;

	for _ in 0..MAX_STEPS {
		// Find the next pair of adjacent out-of-order elements.
		while i < b && !data.less(i, i - 1) {
			i += 1;
		}

		// Are we done?
		if i == b {
			return true;
		}

		// Don't shift elements on short subranges, that has a performance cost.
		if b - a < SHORTEST_SHIFTING {
			return false;
		}

		// Swap the found pair of elements. This puts them in correct order.
		data.swap(i, i - 1);

		// Shift the smaller element to the left.
		if i - a >= 2 {
			for j in (a + 1..i).rev() {
				if !data.less(j, j - 1) {
					break;
				}
				data.swap(j, j - 1);
			}
		}

		// Shift the greater element to the right.
		if b - i >= 2 {
			for j in i + 1..b {
				if !data.less(j, j - 1) {
					break;
				}
				data.swap(j, j - 1);
			}
		}
	}

	// Didn't manage to sort the subrange in the limited number of steps.
	false
}
