//! Single-flight gate for store mutations
//!
//! At most one mutation may be in flight per store. Acquiring the gate never
//! waits: a second caller is turned away immediately. The gate is released when
//! the returned guard drops, so every exit path of an operation (success, error,
//! early return, panic unwinding) frees it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Try-acquire gate shared by all mutation operations of a store.
#[derive(Debug, Clone, Default)]
pub struct BusyGate {
    busy: Arc<AtomicBool>,
}

impl BusyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, or `None` if another operation holds it.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Holding this means the gate is claimed; dropping it releases the gate.
#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
