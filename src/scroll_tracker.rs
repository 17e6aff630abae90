//! Scroll position to UI state
//!
//! Each permitted tick reads the scroll offset and section layout, derives
//! the active section, navbar mode and back-to-top visibility, then applies
//! only what changed.

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::{EngineConfig, classes};
use crate::dom::{self, Document, ElementId};
use crate::presentation::{ClassRule, Presented, apply_rules};
use crate::timer::{Scheduler, TimerEvent, TimerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarMode {
    Normal,
    Scrolled,
}

impl NavbarMode {
    /// Scrolled at or beyond the threshold
    pub fn for_position(position: u32, threshold: u32) -> Self {
        if position >= threshold {
            NavbarMode::Scrolled
        } else {
            NavbarMode::Normal
        }
    }

    pub fn rules(self) -> &'static [ClassRule] {
        const NORMAL: [ClassRule; 1] = [ClassRule::off(classes::NAVBAR_SCROLLED)];
        const SCROLLED: [ClassRule; 1] = [ClassRule::on(classes::NAVBAR_SCROLLED)];
        match self {
            NavbarMode::Normal => &NORMAL,
            NavbarMode::Scrolled => &SCROLLED,
        }
    }
}

/// Back-to-top button lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackToTop {
    Hidden,
    Visible,
    /// Logically hidden, still in layout until the grace timer fires
    FadingOut(TimerHandle),
}

impl BackToTop {
    pub fn is_shown(&self) -> bool {
        matches!(self, BackToTop::Visible)
    }
}

/// Last section (in document order) whose top is at or above `position + lookahead`
pub fn active_section<'a, I>(sections: I, position: u32, lookahead: u32) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, i32)>,
{
    let line = i64::from(position) + i64::from(lookahead);
    sections
        .into_iter()
        .filter(|(_, top)| i64::from(*top) <= line)
        .last()
        .map(|(key, _)| key)
}

#[derive(Debug)]
struct NavLink {
    element: ElementId,
    /// Section key from an in-page `#key` href
    target: Option<String>,
}

/// Values read from the document at the start of a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollSnapshot {
    pub position: u32,
    pub active: Option<String>,
    pub navbar: NavbarMode,
    pub back_to_top_shown: bool,
}

#[derive(Debug)]
pub struct ScrollTracker {
    lookahead: u32,
    navbar_threshold: u32,
    back_to_top_threshold: u32,
    grace: Duration,
    sections: Vec<String>,
    nav_links: Vec<NavLink>,
    navbar: Option<ElementId>,
    back_to_top: Option<ElementId>,
    navbar_mode: Presented<NavbarMode>,
    active: Presented<Option<String>>,
    back_to_top_state: BackToTop,
}

impl ScrollTracker {
    /// Bind to the page; any missing element disables only its own feature
    pub fn bind(doc: &dyn Document, config: &EngineConfig) -> Self {
        let selectors = &config.selectors;
        let sections: Vec<String> = dom::resolve_all(doc, &selectors.sections)
            .into_iter()
            .filter_map(|el| doc.attribute(el, "id"))
            .collect();
        let nav_links: Vec<NavLink> = dom::resolve_all(doc, &selectors.nav_links)
            .into_iter()
            .map(|element| NavLink {
                element,
                target: doc
                    .attribute(element, "href")
                    .and_then(|href| href.strip_prefix('#').map(str::to_string))
                    .filter(|key| !key.is_empty()),
            })
            .collect();

        debug!(
            "Scroll tracker bound: {} sections, {} nav links",
            sections.len(),
            nav_links.len()
        );

        Self {
            lookahead: config.section_lookahead_px,
            navbar_threshold: config.navbar_scrolled_px,
            back_to_top_threshold: config.back_to_top_px,
            grace: config.back_to_top_grace(),
            sections,
            nav_links,
            navbar: dom::resolve(doc, &selectors.navbar),
            back_to_top: dom::resolve(doc, &selectors.back_to_top),
            navbar_mode: Presented::new(),
            active: Presented::new(),
            back_to_top_state: BackToTop::Hidden,
        }
    }

    pub fn navbar_mode(&self) -> Option<NavbarMode> {
        self.navbar_mode.current().copied()
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active.current().and_then(|a| a.as_deref())
    }

    pub fn back_to_top(&self) -> BackToTop {
        self.back_to_top_state
    }

    /// Read phase: everything a tick needs, before any write
    pub fn snapshot(&self, doc: &dyn Document) -> ScrollSnapshot {
        let position = doc.scroll_y();
        let tops: Vec<(&str, i32)> = self
            .sections
            .iter()
            .filter_map(|key| {
                // Sections removed since binding are skipped
                let el = doc.element_by_id(key)?;
                Some((key.as_str(), doc.offset_top(el)?))
            })
            .collect();

        ScrollSnapshot {
            position,
            active: active_section(tops, position, self.lookahead).map(str::to_string),
            navbar: NavbarMode::for_position(position, self.navbar_threshold),
            back_to_top_shown: position > self.back_to_top_threshold,
        }
    }

    /// One rate-limited tick: read, then write
    pub fn tick(&mut self, doc: &mut dyn Document, scheduler: &mut dyn Scheduler) {
        let snapshot = self.snapshot(doc);
        trace!("Scroll tick at {}px", snapshot.position);
        self.apply_active(doc, snapshot.active);
        self.apply_navbar(doc, snapshot.navbar);
        self.apply_back_to_top(doc, scheduler, snapshot.back_to_top_shown);
    }

    fn apply_active(&mut self, doc: &mut dyn Document, active: Option<String>) {
        if self.nav_links.is_empty() || self.sections.is_empty() {
            return;
        }
        // The first application also clears whatever the markup shipped with
        let first = self.active.current().is_none();
        let previous = self.active.current().cloned().flatten();
        if !self.active.update(active.clone()) {
            return;
        }
        debug!("Active section: {:?}", active);

        for link in &self.nav_links {
            let was = previous.is_some() && link.target == previous;
            let now = active.is_some() && link.target == active;
            if now && (first || !was) {
                doc.add_class(link.element, classes::NAV_LINK_ACTIVE);
            } else if !now && (first || was) {
                doc.remove_class(link.element, classes::NAV_LINK_ACTIVE);
            }
        }
    }

    fn apply_navbar(&mut self, doc: &mut dyn Document, mode: NavbarMode) {
        let Some(navbar) = self.navbar else {
            return;
        };
        if self.navbar_mode.update(mode) {
            debug!("Navbar mode: {:?}", mode);
            apply_rules(doc, navbar, mode.rules());
        }
    }

    fn apply_back_to_top(
        &mut self,
        doc: &mut dyn Document,
        scheduler: &mut dyn Scheduler,
        shown: bool,
    ) {
        let Some(button) = self.back_to_top else {
            return;
        };
        self.back_to_top_state = match (self.back_to_top_state, shown) {
            (BackToTop::Visible, true) | (BackToTop::Hidden, false) => return,
            (BackToTop::FadingOut(handle), false) => BackToTop::FadingOut(handle),
            (state, true) => {
                if let BackToTop::FadingOut(handle) = state {
                    scheduler.cancel(handle);
                    trace!("Back-to-top hide cancelled");
                }
                doc.add_class(button, classes::SHOW);
                doc.set_style(button, "display", "block");
                debug!("Back-to-top visible");
                BackToTop::Visible
            }
            (_, false) => {
                doc.remove_class(button, classes::SHOW);
                debug!("Back-to-top fading out");
                BackToTop::FadingOut(scheduler.schedule_once(self.grace, TimerEvent::BackToTopHide))
            }
        };
    }

    /// Grace delay elapsed; re-check before removing the button from layout
    pub fn on_hide_timer(&mut self, doc: &mut dyn Document) {
        let Some(button) = self.back_to_top else {
            return;
        };
        if !matches!(self.back_to_top_state, BackToTop::FadingOut(_))
            || doc.has_class(button, classes::SHOW)
        {
            trace!("Stale back-to-top hide ignored");
            return;
        }
        doc.set_style(button, "display", "none");
        self.back_to_top_state = BackToTop::Hidden;
        debug!("Back-to-top hidden");
    }
}
