//! The selection driver: an iterative, adaptive quickselect loop that descends
//! into one side of each partition and never recurses.

use crate::{
	heap_select::heap_select,
	insertion_sort::{insertion_sort, partial_insertion_sort},
	partition::{break_patterns, choose_pivot, partition, partition_equal, reverse_range, Hint},
	IndexOrd,
};
use core::cmp::Ordering::{Equal, Greater, Less};

/// Moves the element with sorted rank `t` of `data[a..b]` to position `t` and
/// partitions the subrange around it.
///
/// `limit` is the number of allowed imbalanced partitions before switching to
/// [`heap_select`]. If zero, this function switches immediately once the
/// subrange outgrows the insertion sort threshold.
///
/// Elements in front of `a` must not be greater and elements from `b` on must
/// not be smaller than any element of `data[a..b]`, which trivially holds for
/// the full range.
pub(crate) fn select_loop<S>(data: &mut S, mut a: usize, mut b: usize, t: usize, mut limit: u32)
where
	S: IndexOrd + ?Sized,
{
	// Subranges of up to this length are finished off with insertion sort.
	const MAX_INSERTION: usize = 12;

	// True if the last partitioning was reasonably balanced.
	let mut was_balanced = true;
	// True if the last partitioning didn't shuffle elements (the subrange was
	// already partitioned).
	let mut was_partitioned = true;

	loop {
		let len = b - a;

		// Very short subranges get sorted outright, placing every rank.
		if len <= MAX_INSERTION {
			insertion_sort(data, a, b);
			return;
		}

		// If too many bad pivot choices were made, fall back to heap-select in
		// order to guarantee the worst-case bound.
		if limit == 0 {
			heap_select(data, a, b, t - a);
			return;
		}

		// If the last partitioning was imbalanced, try breaking patterns in
		// the subrange by shuffling some elements around. Hopefully we'll
		// choose a better pivot this time.
		if !was_balanced {
			break_patterns(data, a, b);
			limit -= 1;
		}

		// Choose a pivot and try guessing whether the subrange is already
		// sorted.
		let (mut pivot, mut hint) = choose_pivot(data, a, b);

		if hint == Hint::Decreasing {
			reverse_range(data, a, b);
			// The pivot was `pivot - a` positions after the start of the
			// subrange; after reversing it is the same distance before its
			// end.
			pivot = (b - 1) - (pivot - a);
			hint = Hint::Increasing;
		}

		// If the last partitioning was decently balanced and didn't shuffle
		// elements, and if pivot selection predicts the subrange is likely
		// already sorted...
		if was_balanced && was_partitioned && hint == Hint::Increasing {
			// Try identifying several out-of-order elements and shifting them
			// to correct positions. If the subrange ends up completely sorted,
			// every rank is in place.
			if partial_insertion_sort(data, a, b) {
				return;
			}
		}

		// If the chosen pivot is equal to the predecessor of the subrange, it
		// is the smallest element in it. Group the elements equal to the pivot
		// at the front. This case is usually hit when the subrange contains
		// many duplicate elements.
		if a > 0 && !data.less(a - 1, pivot) {
			let mid = partition_equal(data, a, b, pivot);

			// If the equal block swallowed the target, it is at its final
			// rank already.
			if mid > t {
				return;
			}

			// Otherwise, continue with the elements greater than the pivot.
			a = mid;
			continue;
		}

		let (mid, was_p) = partition(data, a, b, pivot);
		was_partitioned = was_p;

		let (left_len, right_len) = (mid - a, b - mid);
		let balance_threshold = len / 8;

		match t.cmp(&mid) {
			Less => {
				was_balanced = left_len >= balance_threshold;
				b = mid;
			}
			Greater => {
				was_balanced = right_len >= balance_threshold;
				a = mid + 1;
			}
			// The pivot landed exactly on the target rank and the partition
			// contract holds on both sides.
			Equal => return,
		}
	}
}
