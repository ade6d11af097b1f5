use crate::backend::Backend;
use crate::{BackendKind, Error, Result};
use alloc::sync::Arc;
use log::{debug, error, warn};
use omnibook_sync::{Mutex, SpinLock, TaskSignals};

/// Lifecycle of one backend.
///
/// The first user moves `Uninitialized` through `Initializing` to `Ready`,
/// or to `Failed` if the probe fails. The last user to leave disposes the
/// backend; a later user probes it again from `Disposed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendState {
    Uninitialized,
    /// A probe is running; other acquirers wait for its outcome.
    Initializing,
    Ready { users: usize },
    Disposed,
    /// The probe failed; the backend is never probed again.
    Failed,
}

/// One backend and its user count.
pub(crate) struct Slot {
    backend: Arc<dyn Backend>,
    state: SpinLock<BackendState>,
    /// Serializes probe and dispose.
    transition: Mutex<()>,
}

impl Slot {
    pub(crate) fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: SpinLock::new(BackendState::Uninitialized),
            transition: Mutex::new(()),
        }
    }

    pub(crate) fn backend(&self) -> &dyn Backend {
        &*self.backend
    }

    pub(crate) fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub(crate) fn state(&self) -> BackendState {
        *self.state.lock()
    }

    /// Adds a user, probing the backend if it has none.
    pub(crate) fn acquire(&self, signals: &dyn TaskSignals) -> Result<()> {
        let _transition = self.transition.lock_interruptible(signals)?;
        {
            let mut state = self.state.lock();
            match *state {
                BackendState::Ready { users } => {
                    *state = BackendState::Ready { users: users + 1 };
                    return Ok(());
                }
                BackendState::Failed => return Err(Error::NoSuchDevice),
                BackendState::Uninitialized
                | BackendState::Disposed
                | BackendState::Initializing => *state = BackendState::Initializing,
            }
        }

        debug!("{}: probing", self.kind());
        let result = self.backend.probe();
        let mut state = self.state.lock();
        match result {
            Ok(()) => {
                *state = BackendState::Ready { users: 1 };
                debug!("{}: ready", self.kind());
                Ok(())
            }
            Err(Error::Interrupted) => {
                *state = BackendState::Uninitialized;
                Err(Error::Interrupted)
            }
            Err(err) => {
                *state = BackendState::Failed;
                error!("{}: initialization failed: {err}", self.kind());
                Err(err)
            }
        }
    }

    /// Drops a user, disposing the backend when it was the last.
    pub(crate) fn release(&self) {
        let _transition = self.transition.lock();
        let last = {
            let mut state = self.state.lock();
            match *state {
                BackendState::Ready { users } if users > 1 => {
                    *state = BackendState::Ready { users: users - 1 };
                    false
                }
                BackendState::Ready { .. } => true,
                other => {
                    warn!("{}: release in state {other:?}", self.kind());
                    false
                }
            }
        };

        if last {
            self.backend.dispose();
            *self.state.lock() = BackendState::Disposed;
            debug!("{}: disposed", self.kind());
        }
    }
}
