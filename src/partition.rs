//! Pivot selection, partitioning, pattern breaking, and reversal in the style
//! of [pattern-defeating quicksort][pdqsort] by Orson Peters.
//!
//! [pdqsort]: https://github.com/orlp/pdqsort

use crate::IndexOrd;

/// Monotonicity classification of the pivot probes, used by the driver to gate
/// the sorted-subrange fast path and to reverse descending runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Hint {
	/// The probes gave no usable signal.
	Unknown,
	/// The probes were already in non-decreasing order.
	Increasing,
	/// The probes were in strictly decreasing order.
	Decreasing,
}

/// Xorshift random number generator from the [xorshift paper].
///
/// [xorshift paper]: https://www.jstatsoft.org/article/view/v008i14
struct Xorshift(u64);

impl Xorshift {
	fn next(&mut self) -> u64 {
		self.0 ^= self.0 << 13;
		self.0 ^= self.0 >> 17;
		self.0 ^= self.0 << 5;
		self.0
	}
}

/// Chooses a pivot in `data[a..b]` and returns its position along with a hint
/// on whether the probes suggest an already sorted or reversed subrange.
///
/// Elements in `data[a..b]` are reordered in the process: the probes are
/// compare-swapped into order, presorting a sparse skeleton of the subrange
/// which biases later partitioning toward balance.
pub(crate) fn choose_pivot<S>(data: &mut S, a: usize, b: usize) -> (usize, Hint)
where
	S: IndexOrd + ?Sized,
{
	// Minimum length to choose the ninther method. Shorter subranges use the
	// simple median-of-three method.
	const SHORTEST_NINTHER: usize = 50;

	let len = b - a;
	let mid = a + len / 2;

	if len < 8 {
		return (mid, Hint::Unknown);
	}

	// Counts the compare-swaps performed while sorting the probes. Zero swaps
	// means the probes were already in order, the maximum means every pair was
	// reversed; each `sort3` performs up to 3 swaps.
	let mut swaps = 0;
	let max_swaps = if len >= SHORTEST_NINTHER { 4 * 3 } else { 3 };

	{
		// Swaps elements so that `data[i] <= data[j]`.
		let mut sort2 = |i: usize, j: usize| {
			if data.less(j, i) {
				data.swap(i, j);
				swaps += 1;
			}
		};

		// Swaps elements so that `data[i] <= data[j] <= data[k]`.
		let mut sort3 = |i: usize, j: usize, k: usize| {
			sort2(i, j);
			sort2(j, k);
			sort2(i, j);
		};

		if len >= SHORTEST_NINTHER {
			// Ninther: median each of three interleaved triples, then median
			// the triple medians, leaving the estimate at `mid`.
			sort3(a, mid, b - 1);
			sort3(a + 1, mid - 1, b - 2);
			sort3(a + 2, mid + 1, b - 3);
			sort3(mid - 1, mid, mid + 1);
		} else {
			sort3(a, mid, b - 1);
		}
	}

	if swaps == 0 {
		(mid, Hint::Increasing)
	} else if swaps == max_swaps {
		(mid, Hint::Decreasing)
	} else {
		(mid, Hint::Unknown)
	}
}

/// Partitions `data[a..b]` around the element at `pivot`, moving it to its
/// final position.
///
/// Returns a tuple of:
///
/// 1. The final pivot position `mid`; `data[a..mid]` is less than or equal to
///    the pivot and `data[mid + 1..b]` is greater than or equal to it.
/// 2. True if the subrange was already partitioned, i.e. no element other than
///    the pivot itself had to move across the split.
pub(crate) fn partition<S>(data: &mut S, a: usize, b: usize, pivot: usize) -> (usize, bool)
where
	S: IndexOrd + ?Sized,
{
	// Place the pivot at the beginning of the subrange.
	data.swap(a, pivot);
	let mut i = a + 1;
	let mut j = b - 1;

	// March the cursors once without swapping; if they cross right away, no
	// element was out of place.
	while i <= j && data.less(i, a) {
		i += 1;
	}
	while i <= j && !data.less(j, a) {
		j -= 1;
	}
	if i > j {
		data.swap(j, a);
		return (j, true);
	}

	// Swap the found pair of out-of-order elements and keep marching.
	data.swap(i, j);
	i += 1;
	j -= 1;

	loop {
		while i <= j && data.less(i, a) {
			i += 1;
		}
		while i <= j && !data.less(j, a) {
			j -= 1;
		}
		if i > j {
			break;
		}
		data.swap(i, j);
		i += 1;
		j -= 1;
	}

	// Place the pivot between the two sides.
	data.swap(j, a);
	(j, false)
}

/// Partitions `data[a..b]` into elements equal to the element at `pivot`
/// followed by elements strictly greater, and returns the first index of the
/// strictly-greater suffix.
///
/// The caller must guarantee that no element of the subrange is smaller than
/// the pivot, which holds whenever the pivot compares equal to the predecessor
/// of the subrange.
pub(crate) fn partition_equal<S>(data: &mut S, a: usize, b: usize, pivot: usize) -> usize
where
	S: IndexOrd + ?Sized,
{
	// Place the pivot at the beginning of the subrange.
	data.swap(a, pivot);
	let mut i = a + 1;
	let mut j = b - 1;

	loop {
		// Find the first element greater than the pivot.
		while i <= j && !data.less(a, i) {
			i += 1;
		}
		// Find the last element equal to the pivot.
		while i <= j && data.less(a, j) {
			j -= 1;
		}
		if i > j {
			break;
		}
		data.swap(i, j);
		i += 1;
		j -= 1;
	}

	i
}

/// Scatters some elements of `data[a..b]` around in an attempt to break
/// patterns that might cause imbalanced partitions in quickselect.
///
/// The perturbation is deterministic for a given subrange length; no state
/// crosses calls.
pub(crate) fn break_patterns<S>(data: &mut S, a: usize, b: usize)
where
	S: IndexOrd + ?Sized,
{
	let len = b - a;
	if len < 8 {
		return;
	}

	let mut random = Xorshift(len as u64);
	let modulus = len.next_power_of_two();

	// Swap three elements just left of the midpoint with pseudorandom targets,
	// reducing each random number modulo the next power of two and wrapping
	// overshoot back into range.
	let pos = a + len / 4 * 2 - 1;
	for i in 0..3 {
		let mut other = random.next() as usize & (modulus - 1);
		if other >= len {
			other -= len;
		}
		data.swap(pos + i, a + other);
	}
}

/// Reverses `data[a..b]` in place. The subrange must not be empty.
pub(crate) fn reverse_range<S>(data: &mut S, a: usize, b: usize)
where
	S: IndexOrd + ?Sized,
{
	let mut i = a;
	let mut j = b - 1;
	while i < j {
		data.swap(i, j);
		i += 1;
		j -= 1;
	}
}
