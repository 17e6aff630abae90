//! Page behavior controller
//!
//! Owns every component, binds them to the page once, and routes host
//! events (scroll, clicks, fired timers, intersection batches) to the
//! component responsible. Components never talk to each other directly.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::dom::{CollapsibleMenu, Document, ScrollBehavior};
use crate::navigation::{AnchorNavigator, LinkOutcome};
use crate::newsletter;
use crate::notify::{NotificationKind, NotificationQueue};
use crate::panel::PanelToggle;
use crate::rate_limit::RateLimiter;
use crate::reveal::RevealAnimator;
use crate::scroll_tracker::ScrollTracker;
use crate::timer::{Scheduler, TimerEvent, TimerQueue};
use crate::viewport::{IntersectionEntry, IntersectionObserver};

pub struct PageController {
    config: EngineConfig,
    scroll_limiter: RateLimiter,
    scroll: ScrollTracker,
    reveal: RevealAnimator,
    panel: Option<PanelToggle>,
    notifications: NotificationQueue,
    navigator: AnchorNavigator,
}

impl PageController {
    /// Bind all components to `doc`; revealable elements are registered with `observer`
    pub fn new(
        config: EngineConfig,
        doc: &dyn Document,
        observer: &mut dyn IntersectionObserver,
    ) -> Self {
        let scroll = ScrollTracker::bind(doc, &config);
        let reveal = RevealAnimator::bind(doc, &config, observer);
        let panel = PanelToggle::bind(doc, &config);
        if panel.is_none() {
            debug!("No menu panel on this page");
        }
        info!("Page controller ready");

        Self {
            scroll_limiter: RateLimiter::new(config.tick_interval(), TimerEvent::ScrollRearm),
            notifications: NotificationQueue::new(config.notify.clone()),
            navigator: AnchorNavigator::new(&config),
            scroll,
            reveal,
            panel,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    pub fn reveal(&self) -> &RevealAnimator {
        &self.reveal
    }

    pub fn panel(&self) -> Option<&PanelToggle> {
        self.panel.as_ref()
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn scroll_limiter(&self) -> &RateLimiter {
        &self.scroll_limiter
    }

    /// Scroll event from the host; returns whether a tick ran
    pub fn on_scroll(&mut self, doc: &mut dyn Document, scheduler: &mut dyn Scheduler) -> bool {
        let scroll = &mut self.scroll;
        self.scroll_limiter
            .run(scheduler, |scheduler| scroll.tick(doc, scheduler))
            .is_some()
    }

    /// Deliver a fired timer to its owner
    pub fn on_timer(
        &mut self,
        event: TimerEvent,
        doc: &mut dyn Document,
        scheduler: &mut dyn Scheduler,
    ) {
        match event {
            TimerEvent::ScrollRearm => self.scroll_limiter.rearm(),
            TimerEvent::BackToTopHide => self.scroll.on_hide_timer(doc),
            TimerEvent::Reveal(element) => self.reveal.on_timer(element, doc),
            TimerEvent::PanelItem { item, stage } => {
                if let Some(panel) = &mut self.panel {
                    panel.on_item_timer(item, stage, doc, scheduler);
                }
            }
            TimerEvent::Notification { id, stage } => {
                self.notifications.on_timer(id, stage, doc, scheduler)
            }
        }
    }

    /// Fire everything due by `now`, including events scheduled along the way
    pub fn run_due(&mut self, queue: &mut TimerQueue, now: Duration, doc: &mut dyn Document) -> usize {
        let mut fired = 0;
        while let Some(event) = queue.pop_due(now) {
            self.on_timer(event, doc, queue);
            fired += 1;
        }
        fired
    }

    pub fn on_intersections(
        &mut self,
        entries: &[IntersectionEntry],
        scheduler: &mut dyn Scheduler,
        observer: &mut dyn IntersectionObserver,
    ) {
        if !entries.is_empty() {
            self.reveal.on_intersections(entries, scheduler, observer);
        }
    }

    /// Activation of the panel control
    pub fn on_panel_toggle(&mut self, doc: &mut dyn Document, scheduler: &mut dyn Scheduler) {
        if let Some(panel) = &mut self.panel {
            panel.activate(doc, scheduler);
        }
    }

    pub fn notify(
        &mut self,
        message: &str,
        kind: NotificationKind,
        doc: &mut dyn Document,
        scheduler: &mut dyn Scheduler,
    ) {
        self.notifications.notify(message, kind, doc, scheduler);
    }

    pub fn on_link_click(
        &self,
        href: &str,
        doc: &mut dyn Document,
        menu: &mut dyn CollapsibleMenu,
    ) -> LinkOutcome {
        self.navigator.on_link_click(href, doc, menu)
    }

    pub fn on_back_to_top_click(&self, doc: &mut dyn Document) {
        doc.scroll_to(0, ScrollBehavior::Smooth);
    }

    /// An order button was pressed for `dish`
    pub fn on_order(&mut self, dish: &str, doc: &mut dyn Document, scheduler: &mut dyn Scheduler) {
        let message = format!("\"{dish}\" agregado al carrito 🛒");
        self.notify(&message, NotificationKind::Success, doc, scheduler);
    }

    /// Returns whether the address was accepted and the field should be cleared
    pub fn submit_newsletter(
        &mut self,
        email: &str,
        doc: &mut dyn Document,
        scheduler: &mut dyn Scheduler,
    ) -> bool {
        let submission = newsletter::submit(email);
        self.notify(submission.message, submission.kind, doc, scheduler);
        submission.clears_input()
    }
}
