use core::cell::UnsafeCell;
use core::hint::spin_loop;
use core::ops::{Deref, DerefMut};
use core::sync::atomic::{AtomicBool, Ordering};

/// Tells a waiting lock whether the calling task should give up.
pub trait TaskSignals: Send + Sync {
    /// `true` if a signal is pending for the current task.
    fn signal_pending(&self) -> bool;
}

/// Signal source for contexts that can never be interrupted.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSignals;

impl TaskSignals for NoSignals {
    #[inline]
    fn signal_pending(&self) -> bool {
        false
    }
}

/// The wait for a [`Mutex`] was abandoned because a signal arrived.
///
/// The caller should unwind and retry the whole operation later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("interrupted while waiting for a lock")]
pub struct Interrupted;

/// Mutual exclusion for sections that may take a while.
///
/// Unlike [`SpinLock`](crate::SpinLock) this lock never touches the interrupt
/// state and supports abandoning the wait.
pub struct Mutex<T> {
    held: AtomicBool,
    cell: UnsafeCell<T>,
}

unsafe impl<T: Send> Sync for Mutex<T> {}
unsafe impl<T: Send> Send for Mutex<T> {}

impl<T: Default> Default for Mutex<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Mutex<T> {
    pub const fn new(value: T) -> Self {
        Self {
            held: AtomicBool::new(false),
            cell: UnsafeCell::new(value),
        }
    }

    #[inline]
    fn try_acquire(&self) -> bool {
        !self.held.swap(true, Ordering::Acquire)
    }

    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, T> {
        while !self.try_acquire() {
            while self.held.load(Ordering::Relaxed) {
                spin_loop();
            }
        }
        MutexGuard { m: self }
    }

    #[inline]
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T>> {
        self.try_acquire().then_some(MutexGuard { m: self })
    }

    /// Waits for the lock unless `signals` reports a pending signal.
    ///
    /// # Errors
    ///
    /// [`Interrupted`] if a signal arrived before the lock could be taken.
    /// An uncontended lock is always acquired, even with a signal pending.
    pub fn lock_interruptible(
        &self,
        signals: &dyn TaskSignals,
    ) -> Result<MutexGuard<'_, T>, Interrupted> {
        loop {
            if self.try_acquire() {
                return Ok(MutexGuard { m: self });
            }
            if signals.signal_pending() {
                return Err(Interrupted);
            }
            spin_loop();
        }
    }

    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }

    #[inline]
    pub const fn get_mut(&mut self) -> &mut T {
        self.cell.get_mut()
    }
}

/// Proof of holding a [`Mutex`].
///
/// Functions that must only run under the lock take `&MutexGuard<T>` (or
/// `&mut`) instead of asserting at runtime.
pub struct MutexGuard<'a, T> {
    m: &'a Mutex<T>,
}

impl<T> Deref for MutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.m.cell.get() }
    }
}

impl<T> DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.m.cell.get() }
    }
}

impl<T> Drop for MutexGuard<'_, T> {
    fn drop(&mut self) {
        self.m.held.store(false, Ordering::Release);
    }
}
