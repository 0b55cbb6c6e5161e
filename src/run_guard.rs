//! Single-slot run guard for hosts.
//!
//! The pipeline itself assumes single-threaded execution and carries no
//! internal synchronization; it is the host's job to never start a second run
//! for the same directory while one is active. [`RunGuard`] is that contract
//! made concrete: a non-blocking, single-slot guard. A GUI host would hold the
//! permit while its worker runs and keep its start control disabled; the
//! console host acquires it around the whole run.

use std::sync::atomic::{AtomicBool, Ordering};

/// Non-blocking mutual exclusion for pipeline runs.
pub struct RunGuard {
    active: AtomicBool,
}

impl RunGuard {
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
        }
    }

    /// Claim the slot. Returns `None` while another permit is alive.
    pub fn try_acquire(&self) -> Option<RunPermit<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunPermit { guard: self })
    }

    /// True while a permit is held.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Default for RunGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Permit for one pipeline run; releases the slot on drop.
pub struct RunPermit<'a> {
    guard: &'a RunGuard,
}

impl Drop for RunPermit<'_> {
    fn drop(&mut self) {
        self.guard.active.store(false, Ordering::Release);
    }
}
