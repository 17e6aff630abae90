//! Leading-edge rate limiter
//!
//! The first call in a window runs immediately and opens the window; calls
//! made while it is open are dropped, never deferred. Exactly one re-arm
//! timer is pending per limiter while the window is open.

use std::time::Duration;

use crate::timer::{Scheduler, TimerEvent, TimerHandle};

#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    rearm: TimerEvent,
    window: Option<TimerHandle>,
    dropped: u64,
}

impl RateLimiter {
    /// `rearm` is the event the scheduler delivers back when the window closes
    pub fn new(interval: Duration, rearm: TimerEvent) -> Self {
        Self {
            interval,
            rearm,
            window: None,
            dropped: 0,
        }
    }

    /// Returns true when the caller may run its action now
    pub fn permit(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        if self.window.is_some() {
            self.dropped += 1;
            tracing::trace!("Rate-limited call dropped ({} so far)", self.dropped);
            return false;
        }
        self.window = Some(scheduler.schedule_once(self.interval, self.rearm));
        true
    }

    /// Run `action` if permitted, handing the scheduler through
    pub fn run<R>(
        &mut self,
        scheduler: &mut dyn Scheduler,
        action: impl FnOnce(&mut dyn Scheduler) -> R,
    ) -> Option<R> {
        if self.permit(scheduler) {
            Some(action(scheduler))
        } else {
            None
        }
    }

    /// Close the window; called when the re-arm event fires
    pub fn rearm(&mut self) {
        self.window = None;
    }

    pub fn is_open(&self) -> bool {
        self.window.is_some()
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
