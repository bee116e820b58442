//! Fast and robust in-place [selection] (k smallest elements, k-th order
//! statistic) for non-contiguous (sub)views into *n*-dimensional arrays and for
//! any other sequence that can compare and swap elements by index.
//!
//! The selection engine touches sequences exclusively through the [`IndexOrd`]
//! capability surface — length, less-than between two positions, and swapping
//! two positions — so it never copies elements out, never allocates, and works
//! for [`ndarray`] views with arbitrary memory layout as well as for plain
//! slices and custom containers.
//!
//! # Example
//!
//! ```
//! use ndarray_select::{ndarray::arr2, Select1Ext};
//!
//! // 2-dimensional array of 4 rows and 5 columns.
//! let mut v = arr2(&[[-5, 4, 1, -3,  2],   // row 0, axis 0
//!                    [ 8, 3, 2,  4,  8],   // row 1, axis 0
//!                    [38, 9, 3,  0,  3],   // row 2, axis 0
//!                    [ 4, 9, 0,  8, -1]]); // row 3, axis 0
//!
//! // Mutable subview into the last column.
//! let mut column = v.column_mut(4);
//!
//! // Due to row-major memory layout, columns are non-contiguous and cannot be
//! // viewed as mutable slices. Selection only compares and swaps by index, so
//! // it applies regardless.
//! assert_eq!(column.as_slice_mut(), None);
//!
//! // Partition the two smallest values to the front of the column.
//! column.select_smallest(2);
//!
//! assert_eq!(column[1], 2);
//! assert!(column[0] <= column[1]);
//! ```
//!
//! # Current Implementation
//!
//! The algorithm is a selection variant of [pattern-defeating quicksort
//! (pdqsort)][pdqsort] by Orson Peters: adaptive quickselect with
//! median-of-three and ninther pivots, detection of sorted and reversed runs,
//! an equal-element path for duplicate-heavy input, deterministic pattern
//! breaking on imbalance, and a bounded heap-select fallback. Runtime is
//! *O*(*n*) on average and *O*(*n* log *n*) worst-case, space is *O*(1), and
//! the result is deterministic for a given input.
//!
//! [selection]: https://en.wikipedia.org/wiki/Selection_algorithm
//! [pdqsort]: https://github.com/orlp/pdqsort

#![deny(
	missing_docs,
	rustdoc::broken_intra_doc_links,
	rustdoc::missing_crate_level_docs
)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod heap_select;
mod insertion_sort;
mod partition;
mod select;

use crate::select::select_loop;
use core::cmp::Ordering::{self, Less};
use ndarray::{ArrayBase, ArrayViewMut1, Data, DataMut, Ix1};

pub use ndarray;

/// Minimum access surface the selection engine needs from an indexable
/// sequence: length, strict less-than between two positions, and swapping two
/// positions.
///
/// Elements are never copied out of the sequence; the engine only ever compares
/// and swaps in place. Every index the engine passes to [`less`](Self::less)
/// and [`swap`](Self::swap) is in `0..self.len()`.
///
/// Implementations are provided for slices and 1-dimensional [`ndarray`]
/// arrays of [`Ord`] elements. Implement the trait directly to select on
/// custom containers or orders, e.g. on parallel sequences that must be
/// permuted in lockstep.
pub trait IndexOrd {
	/// Returns the number of elements.
	fn len(&self) -> usize;

	/// Returns `true` if there are no elements.
	#[inline]
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Whether the element at `i` is strictly less than the element at `j`.
	///
	/// Must be consistent with a total order over the elements: exactly one of
	/// `less(i, j)`, `less(j, i)`, or equality holds, and the order is
	/// transitive. A violation leaves the sequence in an unspecified but valid
	/// permutation.
	///
	/// Takes `&mut self` so that implementations may carry a stateful
	/// [`FnMut`] comparator.
	fn less(&mut self, i: usize, j: usize) -> bool;

	/// Swaps the elements at `i` and `j`.
	fn swap(&mut self, i: usize, j: usize);
}

impl<T: Ord> IndexOrd for [T] {
	#[inline]
	fn len(&self) -> usize {
		<[T]>::len(self)
	}
	#[inline]
	fn less(&mut self, i: usize, j: usize) -> bool {
		self[i] < self[j]
	}
	#[inline]
	fn swap(&mut self, i: usize, j: usize) {
		<[T]>::swap(self, i, j);
	}
}

impl<A, S> IndexOrd for ArrayBase<S, Ix1>
where
	A: Ord,
	S: DataMut<Elem = A>,
{
	#[inline]
	fn len(&self) -> usize {
		ArrayBase::len(self)
	}
	#[inline]
	fn less(&mut self, i: usize, j: usize) -> bool {
		self[i] < self[j]
	}
	#[inline]
	fn swap(&mut self, i: usize, j: usize) {
		ArrayBase::swap(self, i, j);
	}
}

/// Adapts a 1-dimensional view plus a comparator function into the capability
/// surface of the engine.
struct By<'a, A, F> {
	view: ArrayViewMut1<'a, A>,
	compare: F,
}

impl<A, F> IndexOrd for By<'_, A, F>
where
	F: FnMut(&A, &A) -> Ordering,
{
	#[inline]
	fn len(&self) -> usize {
		self.view.len()
	}
	#[inline]
	fn less(&mut self, i: usize, j: usize) -> bool {
		(self.compare)(&self.view[i], &self.view[j]) == Less
	}
	#[inline]
	fn swap(&mut self, i: usize, j: usize) {
		self.view.swap(i, j);
	}
}

/// Rearranges `data` so that its `k` smallest elements occupy the first `k`
/// positions: the element with sorted rank `k - 1` ends up at position `k - 1`,
/// preceded by elements less than or equal to it and followed by elements
/// greater than or equal to it. No particular order is guaranteed within
/// either side.
///
/// `k` counts from 1; out-of-range `k` (`k < 1` or `k > data.len()`) leaves
/// `data` untouched. The reordering is unstable (i.e. any number of equal
/// elements may end up at position `k - 1`), in-place (i.e. does not
/// allocate), deterministic for a given input, and runs in *O*(*n*) time on
/// average and *O*(*n* log *n*) worst-case.
///
/// # Examples
///
/// ```
/// use ndarray_select::select;
///
/// let mut v = [-5, 4, 1, -3, 2];
///
/// // Partition the three smallest values to the front.
/// select(&mut v[..], 3);
///
/// assert_eq!(v[2], 1);
/// assert!(v[..2].iter().all(|x| *x <= 1));
/// assert!(v[3..].iter().all(|x| *x >= 1));
/// ```
pub fn select<S>(data: &mut S, k: usize)
where
	S: IndexOrd + ?Sized,
{
	let n = data.len();
	if k < 1 || k > n {
		return;
	}
	// Limit the number of imbalanced partitions to `floor(log2(n)) + 1`.
	let limit = usize::BITS - n.leading_zeros();
	select_loop(data, 0, n, k - 1, limit);
}

/// [`select`] for slices of a totally ordered element type.
///
/// # Examples
///
/// ```
/// use ndarray_select::select_ordered;
///
/// let mut v = vec![3, 7, 2, 1, 4, 6, 5, 8, 9];
///
/// select_ordered(&mut v, 1);
///
/// assert_eq!(v[0], 1);
/// ```
#[inline]
pub fn select_ordered<T: Ord>(data: &mut [T], k: usize) {
	select(data, k);
}

/// [`select`] for slices with a comparator function defining the order.
///
/// The comparator function must define a total ordering for the elements in
/// the slice, i.e. be total, antisymmetric, and transitive; otherwise the
/// resulting permutation is unspecified. For example, while [`f64`] doesn't
/// implement [`Ord`] because `NaN != NaN`, we can use `partial_cmp` as our
/// comparator when we know the slice doesn't contain a `NaN`.
///
/// # Examples
///
/// ```
/// use ndarray_select::select_by;
///
/// let mut floats = [5f64, 4.0, 1.0, 3.0, 2.0];
///
/// select_by(&mut floats, 2, |a, b| a.partial_cmp(b).unwrap());
///
/// assert_eq!(floats[1], 2.0);
/// ```
pub fn select_by<T, F>(data: &mut [T], k: usize, compare: F)
where
	F: FnMut(&T, &T) -> Ordering,
{
	let mut by = By {
		view: ArrayViewMut1::from(data),
		compare,
	};
	select(&mut by, k);
}

/// Extension trait for 1-dimensional [`ArrayBase<S, Ix1>`](`ArrayBase`) arrays
/// or (sub)views with arbitrary memory layout (e.g., non-contiguous) providing
/// in-place [selection] of the k smallest elements.
///
/// [selection]: https://en.wikipedia.org/wiki/Selection_algorithm
pub trait Select1Ext<A, S>
where
	S: Data<Elem = A>,
{
	/// Rearranges the array so that its `k` smallest elements occupy the first
	/// `k` positions, with the element of sorted rank `k - 1` at position
	/// `k - 1`; see [`select`] for the full contract.
	///
	/// # Examples
	///
	/// ```
	/// use ndarray_select::{ndarray::arr1, Select1Ext};
	///
	/// let mut v = arr1(&[-5i32, 4, 1, -3, 2]);
	///
	/// // Find the median.
	/// v.select_smallest(3);
	///
	/// assert_eq!(v[2], 1);
	/// ```
	fn select_smallest(&mut self, k: usize)
	where
		A: Ord,
		S: DataMut;

	/// Rearranges the array with a comparator function so that its `k`
	/// smallest elements under that order occupy the first `k` positions; see
	/// [`select`] and [`select_by`] for the full contract.
	///
	/// # Examples
	///
	/// ```
	/// use ndarray_select::{ndarray::arr1, Select1Ext};
	///
	/// let mut v = arr1(&[-5i32, 4, 1, -3, 2]);
	///
	/// // Find the median as if the array were sorted in descending order.
	/// v.select_smallest_by(3, |a, b| b.cmp(a));
	///
	/// assert_eq!(v[2], 1);
	/// ```
	fn select_smallest_by<F>(&mut self, k: usize, compare: F)
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut;
}

impl<A, S> Select1Ext<A, S> for ArrayBase<S, Ix1>
where
	S: Data<Elem = A>,
{
	#[inline]
	fn select_smallest(&mut self, k: usize)
	where
		A: Ord,
		S: DataMut,
	{
		select(self, k);
	}
	#[inline]
	fn select_smallest_by<F>(&mut self, k: usize, compare: F)
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut,
	{
		let mut by = By {
			view: self.view_mut(),
			compare,
		};
		select(&mut by, k);
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::{select, select_by, select_ordered, Select1Ext};
	use ndarray::{arr1, arr2};
	use quickcheck::TestResult;
	use quickcheck_macros::quickcheck;

	/// Checks the full selection contract for a 1-based rank `k` across all
	/// three entry points and asserts they agree element for element.
	fn check(input: &[u32], k: usize) {
		let mut sorted = input.to_vec();
		sorted.sort_unstable();
		let t = k - 1;

		let mut by_capability = input.to_vec();
		select(&mut by_capability[..], k);
		let mut by_ordering = input.to_vec();
		select_ordered(&mut by_ordering, k);
		let mut by_comparator = input.to_vec();
		select_by(&mut by_comparator, k, u32::cmp);

		assert_eq!(by_capability, by_ordering);
		assert_eq!(by_capability, by_comparator);

		let output = by_capability;
		assert_eq!(output[t], sorted[t], "rank {t} of {input:?}");
		for i in 0..t {
			assert!(output[i] <= output[t]);
		}
		for i in t..output.len() {
			assert!(output[i] >= output[t]);
		}
		let mut multiset = output;
		multiset.sort_unstable();
		assert_eq!(multiset, sorted);
	}

	// Deterministic pseudorandom numbers for building test inputs.
	struct Lcg(u64);

	impl Lcg {
		fn next(&mut self) -> u64 {
			self.0 = self
				.0
				.wrapping_mul(6364136223846793005)
				.wrapping_add(1442695040888963407);
			self.0 >> 33
		}
	}

	fn patterns(n: usize) -> Vec<(&'static str, Vec<u32>)> {
		let mut rng = Lcg(0x93c4_67e3_7db0_c7a4);
		let n32 = n as u32;
		let mut mostly_sorted: Vec<u32> = (0..n32).collect();
		for _ in 0..n / 10 {
			let i = rng.next() as usize % n;
			let j = rng.next() as usize % n;
			mostly_sorted.swap(i, j);
		}
		let period = (n as f64).sqrt() as u32;
		vec![
			("sorted", (0..n32).collect()),
			("reversed", (0..n32).rev().collect()),
			("random", (0..n).map(|_| rng.next() as u32).collect()),
			("mostly_sorted", mostly_sorted),
			("sawtooth", (0..n32).map(|i| i % period).collect()),
			("organ_pipe", (0..n32).map(|i| i.min(n32 - 1 - i)).collect()),
			(
				"push_front",
				(0..n32)
					.map(|i| if i < n32 / 2 { 0 } else { i - n32 / 2 + 1 })
					.collect(),
			),
			(
				"push_middle",
				(0..n32)
					.map(|i| {
						if i < n32 / 4 || i >= 3 * n32 / 4 {
							i
						} else {
							n32 / 2
						}
					})
					.collect(),
			),
		]
	}

	#[test]
	fn small_sorted() {
		check(&[1, 2, 3, 4, 5], 3);
	}

	#[test]
	fn small_reversed() {
		check(&[5, 4, 3, 2, 1], 3);
	}

	#[test]
	fn medium_random() {
		check(&[3, 7, 2, 1, 4, 6, 5, 8, 9], 5);
	}

	#[test]
	fn large_random() {
		check(&[15, 3, 9, 8, 5, 2, 7, 1, 6, 13, 11, 12, 10, 4, 14], 8);
	}

	#[test]
	fn all_equal() {
		check(&[1, 1, 1, 1, 1], 3);
		let mut v = [7u32; 64];
		select(&mut v[..], 17);
		assert_eq!(v, [7u32; 64]);
	}

	#[test]
	fn mostly_equal() {
		let input = [2, 2, 2, 2, 1, 2, 2, 3, 2, 2];
		check(&input, 6);
		let mut v = input;
		select(&mut v[..], 6);
		assert_eq!(v[5], 2);
		// The single 1 stays in the prefix, the single 3 in the suffix.
		assert!(v[..5].contains(&1));
		assert!(v[6..].contains(&3));
	}

	#[test]
	fn singleton() {
		check(&[42], 1);
	}

	#[test]
	fn pair() {
		check(&[2, 1], 1);
		check(&[2, 1], 2);
	}

	#[test]
	fn out_of_range_is_noop() {
		let mut v = [3, 1, 2];
		select(&mut v[..], 0);
		assert_eq!(v, [3, 1, 2]);
		select(&mut v[..], 4);
		assert_eq!(v, [3, 1, 2]);
		let mut empty: [u32; 0] = [];
		select(&mut empty[..], 1);
	}

	#[quickcheck]
	fn selects_any_rank(xs: Vec<u32>, k: usize) -> TestResult {
		if xs.is_empty() {
			return TestResult::discard();
		}
		check(&xs, k % xs.len() + 1);
		TestResult::passed()
	}

	#[quickcheck]
	fn extremes(xs: Vec<u32>) -> TestResult {
		if xs.is_empty() {
			return TestResult::discard();
		}
		let mut v = xs.clone();
		select(&mut v[..], 1);
		assert_eq!(v[0], *xs.iter().min().unwrap());
		let mut v = xs.clone();
		select(&mut v[..], xs.len());
		assert_eq!(v[xs.len() - 1], *xs.iter().max().unwrap());
		TestResult::passed()
	}

	#[quickcheck]
	fn deterministic(xs: Vec<u32>, k: usize) -> TestResult {
		if xs.is_empty() {
			return TestResult::discard();
		}
		let k = k % xs.len() + 1;
		let mut once = xs.clone();
		let mut twice = xs;
		select(&mut once[..], k);
		select(&mut twice[..], k);
		assert_eq!(once, twice);
		TestResult::passed()
	}

	#[quickcheck]
	fn reselecting_keeps_the_rank(xs: Vec<u32>, k: usize) -> TestResult {
		if xs.is_empty() {
			return TestResult::discard();
		}
		let k = k % xs.len() + 1;
		let mut v = xs;
		select(&mut v[..], k);
		let once = v.clone();
		select(&mut v[..], k);
		// Equal elements may shuffle, but the rank element and the multisets
		// on both sides of it stay fixed.
		assert_eq!(v[k - 1], once[k - 1]);
		let mut prefix = v[..k].to_vec();
		let mut once_prefix = once[..k].to_vec();
		prefix.sort_unstable();
		once_prefix.sort_unstable();
		assert_eq!(prefix, once_prefix);
		TestResult::passed()
	}

	#[quickcheck]
	fn descending_order_comparator(xs: Vec<u32>, k: usize) -> TestResult {
		if xs.is_empty() {
			return TestResult::discard();
		}
		let k = k % xs.len() + 1;
		let mut sorted = xs.clone();
		sorted.sort_unstable_by(|a, b| b.cmp(a));
		let mut v = xs;
		select_by(&mut v, k, |a, b| b.cmp(a));
		assert_eq!(v[k - 1], sorted[k - 1]);
		TestResult::passed()
	}

	#[quickcheck]
	fn ndarray_matches_slice(xs: Vec<u32>, k: usize) -> TestResult {
		if xs.is_empty() {
			return TestResult::discard();
		}
		let k = k % xs.len() + 1;
		let mut array = arr1(&xs);
		array.select_smallest(k);
		let mut slice = xs;
		select(&mut slice[..], k);
		assert_eq!(array, arr1(&slice));
		TestResult::passed()
	}

	#[test]
	fn non_contiguous_column() {
		let mut v = arr2(&[[3, 9], [1, 7], [4, 8], [1, 6], [5, 5]]);
		let mut column = v.column_mut(0);
		assert_eq!(column.as_slice_mut(), None);
		column.select_smallest(3);
		assert_eq!(column[2], 3);
		// The other column is untouched.
		assert_eq!(v.column(1), arr1(&[9, 7, 8, 6, 5]));
	}

	#[test]
	fn ndarray_comparator() {
		let mut v = arr1(&[-5i32, 4, 1, -3, 2]);
		v.select_smallest_by(2, |a, b| b.cmp(a));
		assert_eq!(v[1], 2);
	}

	#[cfg_attr(miri, ignore)]
	#[test]
	fn pattern_inputs() {
		for (name, input) in patterns(512) {
			let mut sorted = input.clone();
			sorted.sort_unstable();
			for k in [1, 32, 256, 512] {
				let mut v = input.clone();
				select(&mut v[..], k);
				assert_eq!(v[k - 1], sorted[k - 1], "pattern {name}, k {k}");
			}
		}
	}

	#[cfg_attr(miri, ignore)]
	#[test]
	fn adversarial_patterns_stay_subquadratic() {
		let n = 2000;
		for (name, input) in patterns(n) {
			let mut sorted = input.clone();
			sorted.sort_unstable();
			for k in [1, n / 2, n] {
				let mut compares = 0u64;
				let mut v = input.clone();
				select_by(&mut v, k, |a, b| {
					compares += 1;
					a.cmp(b)
				});
				assert_eq!(v[k - 1], sorted[k - 1], "pattern {name}, k {k}");
				let quadratic = (n as u64) * (n as u64) / 4;
				assert!(
					compares < quadratic,
					"pattern {name}, k {k}: {compares} compares"
				);
			}
		}
	}

	#[cfg_attr(miri, ignore)]
	#[test]
	fn large_skewed_distribution() {
		// Heavily duplicated values with geometrically decaying frequencies.
		let mut rng = Lcg(42);
		let n = 1_000_000;
		let input: Vec<u32> = (0..n).map(|_| (rng.next() as u32).leading_zeros()).collect();
		let k = n / 2;
		let mut sorted = input.clone();
		sorted.sort_unstable();
		let mut v = input;
		select(&mut v[..], k);
		assert_eq!(v[k - 1], sorted[k - 1]);
		for i in 0..k {
			assert!(v[i] <= v[k - 1]);
		}
		for i in k - 1..v.len() {
			assert!(v[i] >= v[k - 1]);
		}
	}
}
