//! Re-entrancy guard for user-triggered handlers.
//!
//! Each controller owns one `BusyFlag`. A handler acquires it before issuing
//! a remote call and holds the returned `BusyGuard` until the call resolves.
//! A second trigger while the guard is held is rejected instead of issuing a
//! duplicate call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Busy flag shared by the handlers of one controller.
#[derive(Debug, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to mark the controller busy.
    ///
    /// Returns `None` if a call is already in flight.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard {
                flag: self.busy.clone(),
            })
    }

    /// Check if a call is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

/// RAII guard that clears the busy flag when dropped.
///
/// The flag is released even if the handler future is dropped mid-call.
#[derive(Debug)]
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
