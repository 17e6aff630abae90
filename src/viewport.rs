//! Viewport bounds and intersection observation
//!
//! `Viewport` is the visible band of the document after the root margin is
//! applied. `ViewportObserver` polls the layout of observed elements against
//! it and reports state changes in batches, the way a browser's intersection
//! observer delivers its callbacks.

use crate::config::RevealConfig;
use crate::dom::{Document, ElementId};

/// Margin grown (positive) or shrunk (negative) around the viewport
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootMargin {
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionOptions {
    /// Minimum visible fraction for an element to count as intersecting
    pub threshold: f32,
    pub root_margin: RootMargin,
}

impl From<&RevealConfig> for IntersectionOptions {
    fn from(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            root_margin: RootMargin {
                top: 0.0,
                bottom: config.root_margin_bottom_px,
            },
        }
    }
}

/// Visible band in document coordinates
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub top: f32,
    pub bottom: f32,
}

impl Viewport {
    pub fn new(scroll_y: u32, height: u32, margin: RootMargin) -> Self {
        Self {
            top: scroll_y as f32 - margin.top,
            bottom: scroll_y as f32 + height as f32 + margin.bottom,
        }
    }

    pub fn of(doc: &dyn Document, margin: RootMargin) -> Self {
        Self::new(doc.scroll_y(), doc.viewport_height(), margin)
    }

    /// Check if a point is within vertical bounds (with margin)
    #[inline]
    pub fn is_vertically_visible(&self, y: f32, margin: f32) -> bool {
        y >= self.top - margin && y <= self.bottom + margin
    }

    /// Fraction of a vertical span inside the viewport
    pub fn intersection_ratio(&self, top: f32, height: f32) -> f32 {
        if height <= 0.0 {
            return if self.is_vertically_visible(top, 0.0) { 1.0 } else { 0.0 };
        }
        let visible = self.bottom.min(top + height) - self.top.max(top);
        (visible / height).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    pub ratio: f32,
}

/// Registration side of an intersection observer
pub trait IntersectionObserver {
    fn observe(&mut self, element: ElementId);
    fn unobserve(&mut self, element: ElementId);
}

#[derive(Debug)]
struct Observed {
    element: ElementId,
    /// Last reported state; `None` until the first poll
    intersecting: Option<bool>,
}

/// Polling observer over document layout
#[derive(Debug)]
pub struct ViewportObserver {
    options: IntersectionOptions,
    observed: Vec<Observed>,
}

impl ViewportObserver {
    pub fn new(options: IntersectionOptions) -> Self {
        Self {
            options,
            observed: Vec::new(),
        }
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observed.iter().any(|o| o.element == element)
    }

    /// Entries whose state changed since the last poll, in registration order.
    /// The first poll after registration reports every element.
    pub fn poll(&mut self, doc: &dyn Document) -> Vec<IntersectionEntry> {
        let viewport = Viewport::of(doc, self.options.root_margin);
        let threshold = self.options.threshold;
        let mut entries = Vec::new();

        for observed in &mut self.observed {
            let (Some(top), Some(height)) = (
                doc.offset_top(observed.element),
                doc.offset_height(observed.element),
            ) else {
                continue;
            };
            let ratio = viewport.intersection_ratio(top as f32, height as f32);
            let is_intersecting = ratio > 0.0 && ratio >= threshold;
            if observed.intersecting != Some(is_intersecting) {
                observed.intersecting = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    target: observed.element,
                    is_intersecting,
                    ratio,
                });
            }
        }
        entries
    }
}

impl IntersectionObserver for ViewportObserver {
    fn observe(&mut self, element: ElementId) {
        if !self.is_observing(element) {
            self.observed.push(Observed {
                element,
                intersecting: None,
            });
        }
    }

    fn unobserve(&mut self, element: ElementId) {
        self.observed.retain(|o| o.element != element);
    }
}
