//! Concurrent index loop.
//!
//! [`parallel_for`] partitions a half-open integer range across a set of
//! workers on the rayon pool. Workers claim indices through a shared atomic
//! counter (fetch-and-add), so load balances itself: a worker that finishes
//! a cheap index immediately claims the next one.
//!
//! # Contract
//!
//! - The call blocks until every claimed index has been processed.
//! - Indices are processed in unspecified order across workers; the body
//!   must be valid for any index and any interleaving.
//! - At most [`MAX_WORKERS`] workers run, fewer when the pool or the range
//!   is smaller.
//!
//! Between two consecutive `parallel_for` calls the caller observes a
//! strict happens-before: the first call has fully completed before the
//! second starts.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Upper bound on workers participating in one loop.
pub const MAX_WORKERS: usize = 64;

/// Runs `body` for every index in `start..end`, distributing indices over
/// the thread pool.
///
/// # Example
///
/// ```rust
/// use raster_ops::parallel_for;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let sum = AtomicUsize::new(0);
/// parallel_for(0, 100, |i| {
///     sum.fetch_add(i, Ordering::Relaxed);
/// });
/// assert_eq!(sum.load(Ordering::Relaxed), 99 * 100 / 2);
/// ```
pub fn parallel_for<F>(start: usize, end: usize, body: F)
where
    F: Fn(usize) + Sync,
{
    if end <= start {
        return;
    }
    let len = end - start;
    let workers = rayon::current_num_threads().min(MAX_WORKERS).min(len).max(1);
    if workers == 1 {
        for index in start..end {
            body(index);
        }
        return;
    }

    let next = AtomicUsize::new(start);
    let next = &next;
    let body = &body;
    rayon::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(move |_| loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                if index >= end {
                    break;
                }
                body(index);
            });
        }
    });
}

/// Shared mutable slice for workers writing disjoint ranges.
///
/// `parallel_for` bodies receive `Fn` closures, so writing rows of one
/// destination buffer from several workers needs a pointer the borrow
/// checker cannot track. Each claimed index must map to a byte range no
/// other index touches; row-partitioned passes satisfy that by
/// construction.
pub(crate) struct SharedSlice<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

unsafe impl<T: Send> Send for SharedSlice<'_, T> {}
unsafe impl<T: Send> Sync for SharedSlice<'_, T> {}

impl<'a, T> SharedSlice<'a, T> {
    pub fn new(slice: &'a mut [T]) -> Self {
        Self {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
            _marker: PhantomData,
        }
    }

    /// Hands out a mutable sub-slice.
    ///
    /// # Safety
    ///
    /// Ranges handed out to concurrently-running callers must not overlap.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn slice_mut(&self, start: usize, len: usize) -> &mut [T] {
        debug_assert!(start + len <= self.len, "row range out of bounds");
        std::slice::from_raw_parts_mut(self.ptr.add(start), len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU8;

    #[test]
    fn test_every_index_claimed_once() {
        let hits: Vec<AtomicU8> = (0..1000).map(|_| AtomicU8::new(0)).collect();
        parallel_for(0, 1000, |i| {
            hits[i].fetch_add(1, Ordering::Relaxed);
        });
        assert!(hits.iter().all(|h| h.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn test_offset_range() {
        let sum = AtomicUsize::new(0);
        parallel_for(10, 20, |i| {
            sum.fetch_add(i, Ordering::Relaxed);
        });
        assert_eq!(sum.load(Ordering::Relaxed), (10..20).sum::<usize>());
    }

    #[test]
    fn test_empty_range() {
        parallel_for(5, 5, |_| panic!("body must not run"));
        parallel_for(7, 3, |_| panic!("body must not run"));
    }

    #[test]
    fn test_disjoint_row_writes() {
        let mut data = vec![0usize; 64 * 16];
        let shared = SharedSlice::new(&mut data);
        parallel_for(0, 64, |row| {
            let out = unsafe { shared.slice_mut(row * 16, 16) };
            for v in out.iter_mut() {
                *v = row;
            }
        });
        for (i, v) in data.iter().enumerate() {
            assert_eq!(*v, i / 16);
        }
    }
}
