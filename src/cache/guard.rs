//! Instrumented reader/writer lock.
//!
//! Wraps a `parking_lot::RwLock` and reports how long each acquisition
//! waited to the engine's observer.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::metrics::{LockMode, Observer};

pub struct InstrumentedRwLock<T> {
    lock: RwLock<T>,
    observer: Arc<dyn Observer>,
}

impl<T> InstrumentedRwLock<T> {
    pub fn new(value: T, observer: Arc<dyn Observer>) -> Self {
        Self {
            lock: RwLock::new(value),
            observer,
        }
    }

    /// Acquires the shared lock.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        let start = Instant::now();
        let guard = self.lock.read();
        self.observer
            .observe_lock_wait(LockMode::Read, start.elapsed());
        guard
    }

    /// Acquires the exclusive lock.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        let start = Instant::now();
        let guard = self.lock.write();
        self.observer
            .observe_lock_wait(LockMode::Write, start.elapsed());
        guard
    }
}
