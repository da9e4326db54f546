//! Pending auto-advance bookkeeping
//!
//! At most one advance is pending at a time. Scheduling again re-arms the same
//! slot, so repeated end-of-media notifications still produce a single `next()`.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Default)]
pub(crate) struct AutoAdvance {
    deadline: Option<Instant>,
}

impl AutoAdvance {
    /// Arm (or re-arm) the advance to fire `delay` after `now`
    pub fn schedule(&mut self, now: Instant, delay: Duration) -> Instant {
        let deadline = now + delay;
        self.deadline = Some(deadline);
        deadline
    }

    /// Disarm; returns whether an advance was pending
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm and return true if the deadline has passed
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
