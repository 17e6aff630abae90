//! Transient notification system
//!
//! Each call creates an independent element with its own lifecycle:
//! - inserted immediately, transparent and lifted
//! - slides in after a short delay
//! - fades out after the display duration
//! - removed once the exit transition has run
//!
//! There is no cap, no dedup and no handle for the caller.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::{NotifyConfig, classes, notify};
use crate::dom::{Document, ElementId};
use crate::timer::{Scheduler, TimerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

/// Type of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Positive confirmation (subscribed, added to cart)
    Success,
    /// Anything else worth flagging
    Warning,
}

impl NotificationKind {
    pub fn alert_class(self) -> &'static str {
        match self {
            NotificationKind::Success => classes::ALERT_SUCCESS,
            NotificationKind::Warning => classes::ALERT_WARNING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStage {
    Enter,
    Exit,
    Remove,
}

/// Lifecycle position, ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NotificationPhase {
    /// In the document, entrance pending
    Scheduled,
    Visible,
    /// Exit transition running
    Hidden,
    Removed,
}

#[derive(Debug)]
struct Live {
    element: ElementId,
    phase: NotificationPhase,
}

#[derive(Debug, Default)]
pub struct NotificationQueue {
    config: NotifyConfig,
    next_id: u64,
    live: BTreeMap<NotificationId, Live>,
}

impl NotificationQueue {
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            config,
            next_id: 0,
            live: BTreeMap::new(),
        }
    }

    /// Show `message`; the message is rendered as given, empty included
    pub fn notify(
        &mut self,
        message: &str,
        kind: NotificationKind,
        doc: &mut dyn Document,
        scheduler: &mut dyn Scheduler,
    ) {
        let id = NotificationId(self.next_id);
        self.next_id += 1;

        let element = doc.create_element(
            "div",
            &[
                "alert",
                kind.alert_class(),
                "position-fixed",
                "top-0",
                "start-50",
                "translate-middle-x",
                "mt-5",
            ],
        );
        doc.set_style(element, "z-index", &notify::Z_INDEX.to_string());
        doc.set_style(element, "min-width", &format!("{}px", notify::MIN_WIDTH_PX));
        doc.set_style(element, "opacity", "0");
        doc.set_style(element, "transform", &lifted(self.config.exit_offset_px));
        doc.set_text(element, message);
        doc.append_to_body(element);
        // A record still holding this element lost it to an outside removal
        self.live.retain(|_, live| live.element != element);

        self.live.insert(
            id,
            Live {
                element,
                phase: NotificationPhase::Scheduled,
            },
        );
        scheduler.schedule_once(
            Duration::from_millis(self.config.enter_delay_ms),
            TimerEvent::Notification {
                id,
                stage: NotificationStage::Enter,
            },
        );
        scheduler.schedule_once(
            Duration::from_millis(self.config.display_ms),
            TimerEvent::Notification {
                id,
                stage: NotificationStage::Exit,
            },
        );
        debug!("Notification {:?} ({:?}): {}", id, kind, message);
    }

    pub fn phase(&self, id: NotificationId) -> NotificationPhase {
        self.live
            .get(&id)
            .map_or(NotificationPhase::Removed, |live| live.phase)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Elements still in the document, oldest first
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.live.values().map(|live| live.element)
    }

    /// Advance one notification; stale stages are ignored
    pub fn on_timer(
        &mut self,
        id: NotificationId,
        stage: NotificationStage,
        doc: &mut dyn Document,
        scheduler: &mut dyn Scheduler,
    ) {
        let Some(live) = self.live.get_mut(&id) else {
            trace!("Notification {:?} already gone, {:?} ignored", id, stage);
            return;
        };
        if !doc.is_connected(live.element) {
            self.live.remove(&id);
            return;
        }

        match (stage, live.phase) {
            (NotificationStage::Enter, NotificationPhase::Scheduled) => {
                doc.set_style(live.element, "opacity", "1");
                doc.set_style(live.element, "transform", "translateX(-50%) translateY(0)");
                live.phase = NotificationPhase::Visible;
            }
            (NotificationStage::Exit, NotificationPhase::Scheduled | NotificationPhase::Visible) => {
                doc.set_style(live.element, "opacity", "0");
                doc.set_style(live.element, "transform", &lifted(self.config.exit_offset_px));
                live.phase = NotificationPhase::Hidden;
                scheduler.schedule_once(
                    Duration::from_millis(self.config.exit_ms),
                    TimerEvent::Notification {
                        id,
                        stage: NotificationStage::Remove,
                    },
                );
            }
            (NotificationStage::Remove, NotificationPhase::Hidden) => {
                doc.remove(live.element);
                self.live.remove(&id);
                debug!("Notification {:?} removed", id);
            }
            (stage, phase) => trace!("Notification {:?}: {:?} ignored in {:?}", id, stage, phase),
        }
    }
}

fn lifted(offset_px: f32) -> String {
    format!("translateX(-50%) translateY(-{offset_px}px)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageDocument;
    use crate::timer::TimerQueue;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn run(queue: &mut TimerQueue, notes: &mut NotificationQueue, doc: &mut PageDocument, now: u64) {
        while let Some(event) = queue.pop_due(ms(now)) {
            if let TimerEvent::Notification { id, stage } = event {
                notes.on_timer(id, stage, doc, queue);
            }
        }
    }

    fn find_text(doc: &PageDocument, text: &str) -> Option<ElementId> {
        doc.elements()
            .find(|(_, node)| node.text.contains(text))
            .map(|(id, _)| id)
    }

    #[test]
    fn test_lifecycle_timeline() {
        let mut doc = PageDocument::new(800.0, 600);
        let mut queue = TimerQueue::new();
        let mut notes = NotificationQueue::new(NotifyConfig::default());
        notes.notify("Test", NotificationKind::Success, &mut doc, &mut queue);
        let id = NotificationId(0);

        let element = find_text(&doc, "Test").expect("inserted immediately");
        assert!(doc.has_class(element, "alert-success"));
        assert_eq!(notes.phase(id), NotificationPhase::Scheduled);

        run(&mut queue, &mut notes, &mut doc, 10);
        assert_eq!(notes.phase(id), NotificationPhase::Visible);
        assert_eq!(doc.style(element, "opacity").as_deref(), Some("1"));

        run(&mut queue, &mut notes, &mut doc, 2999);
        assert!(notes.phase(id) < NotificationPhase::Hidden);

        run(&mut queue, &mut notes, &mut doc, 3000);
        assert_eq!(notes.phase(id), NotificationPhase::Hidden);
        assert_eq!(doc.style(element, "opacity").as_deref(), Some("0"));
        assert!(doc.is_connected(element));

        run(&mut queue, &mut notes, &mut doc, 3310);
        assert_eq!(notes.phase(id), NotificationPhase::Removed);
        assert!(!doc.is_connected(element));
        assert!(find_text(&doc, "Test").is_none());
    }

    #[test]
    fn test_independent_instances() {
        let mut doc = PageDocument::new(800.0, 600);
        let mut queue = TimerQueue::new();
        let mut notes = NotificationQueue::new(NotifyConfig::default());

        notes.notify("uno", NotificationKind::Success, &mut doc, &mut queue);
        run(&mut queue, &mut notes, &mut doc, 1000);
        notes.notify("uno", NotificationKind::Warning, &mut doc, &mut queue);
        notes.notify("", NotificationKind::Warning, &mut doc, &mut queue);
        assert_eq!(notes.live_count(), 3);

        run(&mut queue, &mut notes, &mut doc, 3300);
        assert_eq!(notes.live_count(), 2);
        run(&mut queue, &mut notes, &mut doc, 4300);
        assert_eq!(notes.live_count(), 0);
    }

    #[test]
    fn test_externally_removed_element() {
        let mut doc = PageDocument::new(800.0, 600);
        let mut queue = TimerQueue::new();
        let mut notes = NotificationQueue::new(NotifyConfig::default());
        notes.notify("bye", NotificationKind::Success, &mut doc, &mut queue);
        let element = find_text(&doc, "bye").unwrap();
        doc.remove(element);

        run(&mut queue, &mut notes, &mut doc, 5000);
        assert_eq!(notes.live_count(), 0);
    }

    #[test]
    fn test_reused_element_does_not_revive_stale_notification() {
        let mut doc = PageDocument::new(800.0, 600);
        let mut queue = TimerQueue::new();
        let mut notes = NotificationQueue::new(NotifyConfig::default());
        notes.notify("first", NotificationKind::Success, &mut doc, &mut queue);
        let element = find_text(&doc, "first").unwrap();
        doc.remove(element);

        notes.notify("second", NotificationKind::Warning, &mut doc, &mut queue);
        let reused = find_text(&doc, "second").unwrap();
        assert_eq!(reused, element);
        assert_eq!(notes.live_count(), 1);

        run(&mut queue, &mut notes, &mut doc, 3000);
        assert_eq!(notes.live_count(), 1);
        assert_eq!(doc.style(reused, "opacity").as_deref(), Some("0"));
        run(&mut queue, &mut notes, &mut doc, 3300);
        assert_eq!(notes.live_count(), 0);
        assert!(!doc.is_connected(reused));
    }
}
