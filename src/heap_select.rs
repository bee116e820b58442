//! Heap-select fallback behind the worst-case guarantee of the selection
//! engine.

use crate::IndexOrd;

/// Moves the element with sorted rank `r` of the subrange `data[a..b]` to
/// position `a + r`, preceded by the `r` smaller elements, which guarantees
/// *O*(*n* log *r*) worst-case.
///
/// A max-heap of size `r + 1` is built over the front of the subrange and the
/// remaining elements are streamed through it, evicting the current maximum
/// whenever a smaller element is found. Afterwards the heap holds the `r + 1`
/// smallest elements with their maximum at `a`, which one final swap moves to
/// its rank.
#[cold]
pub(crate) fn heap_select<S>(data: &mut S, a: usize, b: usize, r: usize)
where
	S: IndexOrd + ?Sized,
{
	let n = b - a;
	let k = r + 1;

	// Build a max-heap over the first `k` elements of the subrange.
	for i in (0..=r / 2).rev() {
		sift_down(data, a, i, k);
	}

	// Stream the remaining elements through the heap, keeping the `k` smallest.
	for i in k..n {
		if data.less(a + i, a) {
			data.swap(a, a + i);
			sift_down(data, a, 0, k);
		}
	}

	// The heap maximum is the element of rank `r`; move it into place.
	data.swap(a, a + r);
}

/// Restores the max-heap invariant `parent >= child` below `node` for the heap
/// of size `end` living at offset `base`.
fn sift_down<S>(data: &mut S, base: usize, mut node: usize, end: usize)
where
	S: IndexOrd + ?Sized,
{
	loop {
		// Children of `node`.
		let mut child = 2 * node + 1;
		if child >= end {
			break;
		}

		// Choose the greater child.
		if child + 1 < end && data.less(base + child, base + child + 1) {
			child += 1;
		}

		// Stop if the invariant holds at `node`.
		if !data.less(base + node, base + child) {
			break;
		}

		// Swap `node` with the greater child, move one step down, and continue
		// sifting.
		data.swap(base + node, base + child);
		node = child;
	}
}
