//! Application state and coordination
//!
//! Owns the page document, the behavior controller and the timer queue, and
//! turns window input into controller calls. The timer queue runs on the
//! time elapsed since startup.

use std::time::{Duration, Instant};

use page_sync::PageController;
use page_sync::config::{EngineConfig, timing};
use page_sync::dom::{self, ClassCollapse, Document, ElementId};
use page_sync::page::{self, Node, PageDocument, PageLayout};
use page_sync::timer::TimerQueue;
use page_sync::viewport::{IntersectionOptions, ViewportObserver};
use tracing::debug;

use crate::renderer::{PageView, Renderer};
use crate::scroll_input::{ScrollInput, SmoothScroll, offset_by};

/// Result type for application actions that may trigger UI updates
#[must_use = "Handle the AppResult to ensure the UI updates correctly"]
pub enum AppResult {
    /// No action needed
    Ok,
    /// UI needs to be redrawn
    Redraw,
}

impl AppResult {
    pub fn needs_redraw(&self) -> bool {
        matches!(self, AppResult::Redraw)
    }
}

/// Pixels moved by an arrow key
const ARROW_STEP: f32 = 40.0;

/// What a click landed on
#[derive(Debug, Clone, PartialEq, Eq)]
enum ClickTarget {
    NavLink(String),
    PanelToggle,
    BackToTop,
    Order(String),
    NewsletterInput,
    NewsletterSubmit,
}

fn is_interactive(node: &Node) -> bool {
    matches!(node.tag.as_str(), "a" | "button" | "input")
}

pub struct App {
    renderer: Renderer,
    doc: PageDocument,
    controller: PageController,
    timers: TimerQueue,
    observer: ViewportObserver,
    menu: ClassCollapse,
    smooth: SmoothScroll,
    started: Instant,
    scale: f32,
    newsletter: String,
    newsletter_focused: bool,
}

impl App {
    pub fn new(
        gl_renderer: femtovg::renderer::OpenGl,
        width: f32,
        height: f32,
        scale: f32,
        config: EngineConfig,
        layout: &PageLayout,
    ) -> anyhow::Result<Self> {
        let renderer = Renderer::new(gl_renderer, width, height, scale)?;
        let doc = layout.build(width / scale, (height / scale) as u32);
        let mut observer = ViewportObserver::new(IntersectionOptions::from(&config.reveal));
        let controller = PageController::new(config, &doc, &mut observer);

        let mut app = Self {
            renderer,
            doc,
            controller,
            timers: TimerQueue::new(),
            observer,
            menu: ClassCollapse,
            smooth: SmoothScroll::new(),
            started: Instant::now(),
            scale,
            newsletter: String::new(),
            newsletter_focused: false,
        };
        // Initial state before the first scroll
        app.sync_scroll();
        Ok(app)
    }

    // =========================================================================
    // Core lifecycle
    // =========================================================================

    /// Per-frame work: smooth scrolling, due timers and visibility changes
    pub fn tick(&mut self) -> AppResult {
        let mut needs_redraw = false;

        if let Some(request) = self.doc.take_scroll_request() {
            self.smooth.start(request.top);
        }
        if let Some(next) = self.smooth.step(self.doc.scroll_y()) {
            if self.set_scroll(next).needs_redraw() {
                needs_redraw = true;
            } else {
                // Clamped at the page edge
                self.smooth.cancel();
            }
        }
        if self.run_timers() > 0 {
            needs_redraw = true;
        }
        if self.poll_observer() {
            needs_redraw = true;
        }

        if needs_redraw {
            AppResult::Redraw
        } else {
            AppResult::Ok
        }
    }

    /// When the event loop should wake up next, if ever
    pub fn next_deadline(&mut self) -> Option<Instant> {
        if self.smooth.is_active() {
            return Some(Instant::now());
        }
        self.timers.next_due().map(|due| self.started + due)
    }

    pub fn render(&mut self) {
        let notifications: Vec<ElementId> = self.controller.notifications().elements().collect();
        let view = PageView {
            doc: &self.doc,
            notifications: &notifications,
            newsletter: &self.newsletter,
            newsletter_focused: self.newsletter_focused,
        };
        self.renderer.render(&view);
    }

    pub fn resize(&mut self, width: f32, height: f32, scale: f32) {
        self.scale = scale;
        self.renderer.resize(width, height, scale);
        self.doc.set_viewport(width / scale, (height / scale) as u32);
        page::place_fixed(&mut self.doc);
        self.sync_scroll();
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn run_timers(&mut self) -> usize {
        let now = self.elapsed();
        self.controller.run_due(&mut self.timers, now, &mut self.doc)
    }

    /// Report a scroll to the controller, then re-check visibility
    fn sync_scroll(&mut self) {
        self.run_timers();
        self.controller.on_scroll(&mut self.doc, &mut self.timers);
        self.poll_observer();
    }

    fn poll_observer(&mut self) -> bool {
        let entries = self.observer.poll(&self.doc);
        if entries.is_empty() {
            return false;
        }
        self.controller
            .on_intersections(&entries, &mut self.timers, &mut self.observer);
        true
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    fn set_scroll(&mut self, y: u32) -> AppResult {
        let before = self.doc.scroll_y();
        self.doc.set_scroll_y(y);
        if self.doc.scroll_y() == before {
            return AppResult::Ok;
        }
        self.sync_scroll();
        AppResult::Redraw
    }

    /// Direct user scroll; cancels any smooth scroll in flight
    pub fn scroll_by(&mut self, delta: f32) -> AppResult {
        self.smooth.cancel();
        let target = offset_by(self.doc.scroll_y(), delta);
        self.set_scroll(target)
    }

    pub fn handle_wheel(&mut self, input: ScrollInput) -> AppResult {
        match input.to_pixels() {
            Some(delta) => self.scroll_by(delta),
            None => AppResult::Ok,
        }
    }

    fn page_step(&self) -> f32 {
        self.doc.viewport_height() as f32 * timing::PAGE_STEP_RATIO
    }

    pub fn page_down(&mut self) -> AppResult {
        self.scroll_by(self.page_step())
    }

    pub fn page_up(&mut self) -> AppResult {
        self.scroll_by(-self.page_step())
    }

    pub fn line_down(&mut self) -> AppResult {
        self.scroll_by(ARROW_STEP)
    }

    pub fn line_up(&mut self) -> AppResult {
        self.scroll_by(-ARROW_STEP)
    }

    pub fn scroll_to_start(&mut self) -> AppResult {
        self.smooth.cancel();
        self.set_scroll(0)
    }

    pub fn scroll_to_end(&mut self) -> AppResult {
        self.smooth.cancel();
        let end = self.doc.max_scroll();
        self.set_scroll(end)
    }

    // =========================================================================
    // Pointer and keyboard
    // =========================================================================

    fn classify(&self, element: ElementId) -> Option<ClickTarget> {
        let selectors = &self.controller.config().selectors;
        let doc = &self.doc;
        let is = |selector: &str| dom::resolve_all(doc, selector).contains(&element);

        if is(&selectors.nav_links) {
            return doc.attribute(element, "href").map(ClickTarget::NavLink);
        }
        if is(&selectors.panel_control) {
            return Some(ClickTarget::PanelToggle);
        }
        if is(&selectors.back_to_top) {
            return Some(ClickTarget::BackToTop);
        }
        match doc.attribute(element, "id").as_deref() {
            Some("newsletter-email") => return Some(ClickTarget::NewsletterInput),
            Some("newsletter-submit") => return Some(ClickTarget::NewsletterSubmit),
            _ => {}
        }
        doc.attribute(element, "data-dish").map(ClickTarget::Order)
    }

    /// Left click at a physical window position
    pub fn click_at(&mut self, x: f32, y: f32) -> AppResult {
        let (x, y) = (x / self.scale, y / self.scale);
        let target = self
            .doc
            .hit_test(x, y, is_interactive)
            .and_then(|element| self.classify(element));
        let was_focused = self.newsletter_focused;
        self.newsletter_focused = matches!(target, Some(ClickTarget::NewsletterInput));

        let Some(target) = target else {
            return if was_focused {
                AppResult::Redraw
            } else {
                AppResult::Ok
            };
        };
        debug!("Click on {:?}", target);

        self.run_timers();
        match target {
            ClickTarget::NavLink(href) => {
                let outcome = self.controller.on_link_click(&href, &mut self.doc, &mut self.menu);
                debug!("Link {} -> {:?}", href, outcome);
            }
            ClickTarget::PanelToggle => {
                self.controller.on_panel_toggle(&mut self.doc, &mut self.timers);
                self.poll_observer();
            }
            ClickTarget::BackToTop => self.controller.on_back_to_top_click(&mut self.doc),
            ClickTarget::Order(dish) => {
                self.controller.on_order(&dish, &mut self.doc, &mut self.timers)
            }
            ClickTarget::NewsletterInput => {}
            ClickTarget::NewsletterSubmit => self.submit_newsletter(),
        }
        AppResult::Redraw
    }

    pub fn handle_char(&mut self, c: char) -> AppResult {
        if !self.newsletter_focused {
            return AppResult::Ok;
        }
        if c == '\n' || c == '\r' {
            self.submit_newsletter();
        } else if !c.is_control() {
            self.newsletter.push(c);
        } else {
            return AppResult::Ok;
        }
        AppResult::Redraw
    }

    pub fn handle_backspace(&mut self) -> AppResult {
        if self.newsletter_focused && self.newsletter.pop().is_some() {
            AppResult::Redraw
        } else {
            AppResult::Ok
        }
    }

    pub fn is_typing(&self) -> bool {
        self.newsletter_focused
    }

    fn submit_newsletter(&mut self) {
        self.run_timers();
        if self
            .controller
            .submit_newsletter(&self.newsletter, &mut self.doc, &mut self.timers)
        {
            self.newsletter.clear();
        }
    }
}
