//! Progress reporting and cancellation.
//!
//! Long operations report fractional progress through a caller-supplied
//! callback. The callback returns `true` to request cancellation; the
//! running pass then drains the rows already claimed and the operation
//! returns [`Error::Cancelled`](raster_core::Error::Cancelled) without
//! applying its result.
//!
//! Callbacks may be invoked from worker threads and must be `Sync` and
//! return promptly.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A progress callback that never cancels.
///
/// # Example
///
/// ```rust
/// use raster_ops::progress_ignored;
///
/// let cb = progress_ignored();
/// assert!(!cb(0.5));
/// ```
pub fn progress_ignored() -> impl Fn(f32) -> bool + Sync {
    |_| false
}

/// Step counter shared by the workers of a multi-phase operation.
///
/// Emits the callback roughly ten times over the operation (every
/// `total / 10` completed steps) and latches the first cancellation
/// request.
pub(crate) struct ProgressTracker<'a> {
    callback: &'a (dyn Fn(f32) -> bool + Sync),
    total: usize,
    emit_every: usize,
    steps: AtomicUsize,
    cancelled: AtomicBool,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(callback: &'a (dyn Fn(f32) -> bool + Sync), total: usize) -> Self {
        Self {
            callback,
            total: total.max(1),
            emit_every: (total / 10).max(1),
            steps: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Records one completed step, emitting progress on the report grid.
    pub fn step(&self) {
        let done = self.steps.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.emit_every == 0 {
            let fraction = (done as f32 / self.total as f32).min(1.0);
            if (self.callback)(fraction) {
                self.cancelled.store(true, Ordering::Relaxed);
            }
        }
    }

    /// Returns `true` once any callback invocation requested cancellation.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Reports completion. The return value no longer matters.
    pub fn finish(&self) {
        let _ = (self.callback)(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_emit_grid() {
        let fractions = Mutex::new(Vec::new());
        let cb = |f: f32| {
            fractions.lock().unwrap().push(f);
            false
        };
        let tracker = ProgressTracker::new(&cb, 100);
        for _ in 0..100 {
            tracker.step();
        }
        tracker.finish();
        let seen = fractions.lock().unwrap();
        // 10 grid emissions plus the final 1.0
        assert_eq!(seen.len(), 11);
        assert_eq!(*seen.last().unwrap(), 1.0);
        assert!(!tracker.is_cancelled());
    }

    #[test]
    fn test_cancellation_latches() {
        let cb = |f: f32| f > 0.45;
        let tracker = ProgressTracker::new(&cb, 10);
        for _ in 0..10 {
            tracker.step();
        }
        assert!(tracker.is_cancelled());
    }

    #[test]
    fn test_small_totals_emit() {
        let count = AtomicUsize::new(0);
        let cb = |_f: f32| {
            count.fetch_add(1, Ordering::Relaxed);
            false
        };
        let tracker = ProgressTracker::new(&cb, 3);
        for _ in 0..3 {
            tracker.step();
        }
        assert!(count.load(Ordering::Relaxed) >= 1);
    }
}
