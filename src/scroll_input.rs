//! Scroll input normalization and smooth scrolling
//!
//! Wheel and touchpad deltas are converted to page pixels. Smooth scroll
//! requests coming from the page are animated with an exponential ease.

use page_sync::config::timing;

/// Scroll input type from the OS
#[derive(Debug, Clone, Copy)]
pub enum ScrollInput {
    /// Discrete wheel notches (e.g., mouse wheel)
    LineDelta(f32),
    /// Continuous pixel-based scrolling (e.g., touchpad)
    PixelDelta(f32),
}

impl ScrollInput {
    /// Signed page-pixel movement; positive scrolls down the page
    pub fn to_pixels(self) -> Option<f32> {
        let pixels = match self {
            ScrollInput::LineDelta(y) => -y * timing::WHEEL_PIXELS_PER_LINE,
            ScrollInput::PixelDelta(y) => -y,
        };
        if pixels.abs() < 0.5 {
            return None;
        }
        Some(pixels)
    }
}

/// Apply a signed delta to a scroll offset, saturating at zero
pub fn offset_by(position: u32, delta: f32) -> u32 {
    (position as f32 + delta).round().max(0.0) as u32
}

/// Exponential-ease scroll animation
#[derive(Debug, Default)]
pub struct SmoothScroll {
    target: Option<u32>,
}

impl SmoothScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, target: u32) {
        self.target = Some(target);
    }

    /// User input takes over
    pub fn cancel(&mut self) {
        self.target = None;
    }

    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    /// Next offset from `current`, or `None` when idle. Lands exactly on the target.
    pub fn step(&mut self, current: u32) -> Option<u32> {
        let target = self.target?;
        let remaining = target as f32 - current as f32;
        if remaining.abs() <= 1.0 {
            self.target = None;
            return (current != target).then_some(target);
        }
        let mut moved = remaining * timing::SMOOTH_SCROLL_SPEED;
        if moved.abs() < 1.0 {
            moved = moved.signum();
        }
        Some(offset_by(current, moved))
    }
}
