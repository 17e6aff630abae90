//! Timer collaborator and a deterministic timer queue
//!
//! Delayed work is expressed as typed [`TimerEvent`] values rather than
//! closures. The controller receives each event when it fires and re-checks
//! the current state before mutating anything.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

use crate::dom::ElementId;
use crate::notify::{NotificationId, NotificationStage};
use crate::panel::ItemStage;

/// Handle to a scheduled event, used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Everything the engine schedules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Scroll rate-limit window elapsed
    ScrollRearm,
    /// Back-to-top grace delay elapsed
    BackToTopHide,
    /// Staggered reveal of one element
    Reveal(ElementId),
    /// Next step of one panel item's appearance
    PanelItem { item: ElementId, stage: ItemStage },
    /// Next step of one notification's lifecycle
    Notification {
        id: NotificationId,
        stage: NotificationStage,
    },
}

pub trait Scheduler {
    fn schedule_once(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle;

    /// Returns false when the handle already fired or was cancelled
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

#[derive(Debug)]
struct Pending {
    due: Duration,
    handle: TimerHandle,
    event: TimerEvent,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    // Equal due times fire in scheduling order
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then(self.handle.0.cmp(&other.handle.0))
    }
}

/// Virtual-clock timer queue
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_handle: u64,
    pending: BinaryHeap<Reverse<Pending>>,
    live: HashSet<TimerHandle>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock value that new delays are measured from
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.live.contains(&handle)
    }

    pub fn pending_count(&self) -> usize {
        self.live.len()
    }

    /// Due time of the earliest live event
    pub fn next_due(&mut self) -> Option<Duration> {
        self.discard_cancelled();
        self.pending.peek().map(|Reverse(p)| p.due)
    }

    /// Pop the earliest event due at or before `now`, advancing the clock to its due time.
    /// Once nothing more is due the clock settles on `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<TimerEvent> {
        self.discard_cancelled();
        let due = self.pending.peek().map(|Reverse(p)| p.due);
        match due {
            Some(due) if due <= now => {
                let Reverse(entry) = self.pending.pop()?;
                self.live.remove(&entry.handle);
                self.now = self.now.max(entry.due);
                Some(entry.event)
            }
            _ => {
                self.now = self.now.max(now);
                None
            }
        }
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse(top)) = self.pending.peek() {
            if self.live.contains(&top.handle) {
                break;
            }
            self.pending.pop();
        }
    }
}

impl Scheduler for TimerQueue {
    fn schedule_once(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(handle);
        self.pending.push(Reverse(Pending {
            due: self.now + delay,
            handle,
            event,
        }));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.live.remove(&handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_fires_in_due_then_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule_once(ms(20), TimerEvent::BackToTopHide);
        queue.schedule_once(ms(10), TimerEvent::ScrollRearm);
        queue.schedule_once(ms(10), TimerEvent::Reveal(ElementId(3)));

        assert_eq!(queue.pop_due(ms(5)), None);
        assert_eq!(queue.pop_due(ms(30)), Some(TimerEvent::ScrollRearm));
        assert_eq!(queue.now(), ms(10));
        assert_eq!(queue.pop_due(ms(30)), Some(TimerEvent::Reveal(ElementId(3))));
        assert_eq!(queue.pop_due(ms(30)), Some(TimerEvent::BackToTopHide));
        assert_eq!(queue.pop_due(ms(30)), None);
        assert_eq!(queue.now(), ms(30));
    }

    #[test]
    fn test_cancelled_events_never_fire() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule_once(ms(10), TimerEvent::BackToTopHide);
        assert!(queue.is_pending(handle));
        assert!(queue.cancel(handle));
        assert!(!queue.cancel(handle));
        assert_eq!(queue.next_due(), None);
        assert_eq!(queue.pop_due(ms(100)), None);
    }

    #[test]
    fn test_delays_measured_from_fire_time() {
        let mut queue = TimerQueue::new();
        queue.schedule_once(ms(100), TimerEvent::ScrollRearm);
        assert_eq!(queue.pop_due(ms(250)), Some(TimerEvent::ScrollRearm));
        // Scheduled from inside the callback: relative to t=100, not t=250
        queue.schedule_once(ms(100), TimerEvent::ScrollRearm);
        assert_eq!(queue.next_due(), Some(ms(200)));
    }
}
