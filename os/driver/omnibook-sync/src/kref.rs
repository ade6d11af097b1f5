use core::sync::atomic::{AtomicUsize, Ordering, fence};

/// Atomic reference count with "last one out" detection.
///
/// A fresh `Kref` holds one reference, owned by whoever created it.
#[derive(Debug)]
pub struct Kref {
    count: AtomicUsize,
}

impl Default for Kref {
    fn default() -> Self {
        Self::new()
    }
}

impl Kref {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: AtomicUsize::new(1),
        }
    }

    /// Takes another reference.
    ///
    /// Must only be called while the caller already holds one.
    #[inline]
    pub fn get(&self) {
        let prev = self.count.fetch_add(1, Ordering::Relaxed);
        debug_assert!(prev > 0, "kref resurrected after release");
    }

    /// Drops a reference; returns `true` if it was the last one.
    ///
    /// The caller that observes `true` owns the teardown of whatever the
    /// count protects.
    #[inline]
    #[must_use]
    pub fn put(&self) -> bool {
        let prev = self.count.fetch_sub(1, Ordering::Release);
        debug_assert!(prev > 0, "kref released more often than taken");
        if prev == 1 {
            fence(Ordering::Acquire);
            true
        } else {
            false
        }
    }

    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn last_put_reports_release() {
        let k = Kref::new();
        k.get();
        k.get();
        assert_eq!(k.count(), 3);
        assert!(!k.put());
        assert!(!k.put());
        assert!(k.put());
        assert_eq!(k.count(), 0);
    }
}
