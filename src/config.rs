//! Centralized configuration constants for page-sync
//!
//! All thresholds, delays and class names live here. `EngineConfig` mirrors
//! the tunable subset so a JSON file can override it at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PageError, Result};

/// Scroll-driven state thresholds (in CSS pixels)
pub mod scroll {
    /// Minimum spacing between two scroll ticks
    pub const TICK_INTERVAL_MS: u64 = 100;
    /// A section is current once its top is within this distance below the scroll offset
    pub const SECTION_LOOKAHEAD_PX: u32 = 150;
    /// Navbar switches to its scrolled mode at or beyond this offset
    pub const NAVBAR_SCROLLED_PX: u32 = 50;
    /// Back-to-top button shows strictly beyond this offset
    pub const BACK_TO_TOP_PX: u32 = 400;
    /// Pause between fading the button out and removing it from layout
    pub const BACK_TO_TOP_GRACE_MS: u64 = 300;
}

/// Entrance animation for `[data-aos]` elements
pub mod reveal {
    /// Fraction of the element that must be visible
    pub const THRESHOLD: f32 = 0.1;
    /// Bottom root margin (negative shrinks the viewport)
    pub const ROOT_MARGIN_BOTTOM_PX: f32 = -50.0;
    /// Per-item delay within one intersection batch
    pub const STAGGER_MS: u64 = 50;
}

/// Expandable menu panel
pub mod panel {
    /// Delay between consecutive extra items
    pub const ITEM_STAGGER_MS: u64 = 100;
    /// Pause between preparing an item and starting its transition
    pub const ITEM_SETTLE_MS: u64 = 50;
    /// Length of each item's opacity/offset transition
    pub const ITEM_TRANSITION_MS: u64 = 500;
    /// Starting vertical offset of an appearing item
    pub const ITEM_OFFSET_PX: f32 = 20.0;
    pub const COLLAPSED_LABEL: &str = "Ver Menú Completo";
    pub const EXPANDED_LABEL: &str = "Ver Menú Reducido";
}

/// Transient notifications
pub mod notify {
    /// Delay before the entrance transition starts
    pub const ENTER_DELAY_MS: u64 = 10;
    /// Time from creation until the exit transition starts
    pub const DISPLAY_MS: u64 = 3000;
    /// Exit transition length before removal
    pub const EXIT_MS: u64 = 300;
    /// Upward offset applied while exiting
    pub const EXIT_OFFSET_PX: f32 = 20.0;
    pub const MIN_WIDTH_PX: f32 = 300.0;
    pub const Z_INDEX: u32 = 9999;
}

/// Presentation class names shared with the page stylesheet
pub mod classes {
    pub const NAVBAR_SCROLLED: &str = "scrolled";
    pub const NAV_LINK_ACTIVE: &str = "active";
    pub const SHOW: &str = "show";
    pub const REVEALED: &str = "aos-animate";
    pub const PANEL_EXPANDED: &str = "show-extra";
    pub const ICON_COLLAPSED: &str = "bi-chevron-down";
    pub const ICON_EXPANDED: &str = "bi-chevron-up";
    pub const ALERT_SUCCESS: &str = "alert-success";
    pub const ALERT_WARNING: &str = "alert-warning";
}

/// Default selectors for the elements each component binds to
pub mod selectors {
    pub const NAVBAR: &str = ".navbar-custom";
    pub const NAV_COLLAPSE: &str = ".navbar-collapse";
    pub const SECTIONS: &str = "section[id]";
    pub const NAV_LINKS: &str = ".nav-link";
    pub const BACK_TO_TOP: &str = "#btnVolverArriba";
    pub const REVEALABLE: &str = "[data-aos]";
    pub const PANEL_CONTROL: &str = "#toggle-menu";
    pub const PANEL_CONTAINER: &str = "#platos-container";
    pub const PANEL_LABEL: &str = "#toggle-text";
    pub const PANEL_ICON: &str = "#toggle-icon";
    pub const PANEL_EXTRA_ITEMS: &str = ".card-extra";
    pub const PANEL_ANCHOR: &str = "#menu";
}

/// Demo page layout (in logical pixels, scaled by DPI)
pub mod layout {
    pub const VIEWPORT_WIDTH: f32 = 1024.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;
    pub const NAVBAR_HEIGHT: f32 = 64.0;
    pub const SECTION_PADDING: f32 = 48.0;
    pub const SECTION_TITLE_HEIGHT: f32 = 56.0;
    pub const CARD_WIDTH: f32 = 280.0;
    pub const CARD_HEIGHT: f32 = 180.0;
    pub const CARD_GAP: f32 = 24.0;
    pub const CARDS_PER_ROW: usize = 3;
    pub const BUTTON_HEIGHT: f32 = 44.0;
    pub const BACK_TO_TOP_SIZE: f32 = 48.0;
    pub const NOTIFICATION_HEIGHT: f32 = 52.0;
    pub const NOTIFICATION_GAP: f32 = 8.0;
}

/// Demo host timing
pub mod timing {
    /// Fraction of the remaining distance covered per frame by smooth scrolling
    pub const SMOOTH_SCROLL_SPEED: f32 = 0.18;
    /// Wheel pixels per line-delta notch
    pub const WHEEL_PIXELS_PER_LINE: f32 = 60.0;
    /// Keyboard page step as a fraction of the viewport height
    pub const PAGE_STEP_RATIO: f32 = 0.9;
}

/// Demo rendering constants
pub mod rendering {
    pub const TITLE_FONT_SIZE: f32 = 28.0;
    pub const BODY_FONT_SIZE: f32 = 16.0;
    pub const NAV_FONT_SIZE: f32 = 15.0;
    pub const CORNER_RADIUS: f32 = 8.0;
}

/// Entrance animation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub threshold: f32,
    pub root_margin_bottom_px: f32,
    pub stagger_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: reveal::THRESHOLD,
            root_margin_bottom_px: reveal::ROOT_MARGIN_BOTTOM_PX,
            stagger_ms: reveal::STAGGER_MS,
        }
    }
}

impl RevealConfig {
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }
}

/// Menu panel options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub item_stagger_ms: u64,
    pub item_settle_ms: u64,
    pub item_transition_ms: u64,
    pub item_offset_px: f32,
    pub collapsed_label: String,
    pub expanded_label: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            item_stagger_ms: panel::ITEM_STAGGER_MS,
            item_settle_ms: panel::ITEM_SETTLE_MS,
            item_transition_ms: panel::ITEM_TRANSITION_MS,
            item_offset_px: panel::ITEM_OFFSET_PX,
            collapsed_label: panel::COLLAPSED_LABEL.to_string(),
            expanded_label: panel::EXPANDED_LABEL.to_string(),
        }
    }
}

/// Notification timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub enter_delay_ms: u64,
    pub display_ms: u64,
    pub exit_ms: u64,
    pub exit_offset_px: f32,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enter_delay_ms: notify::ENTER_DELAY_MS,
            display_ms: notify::DISPLAY_MS,
            exit_ms: notify::EXIT_MS,
            exit_offset_px: notify::EXIT_OFFSET_PX,
        }
    }
}

/// Selectors the controller binds at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub navbar: String,
    pub nav_collapse: String,
    pub sections: String,
    pub nav_links: String,
    pub back_to_top: String,
    pub revealable: String,
    pub panel_control: String,
    pub panel_container: String,
    pub panel_label: String,
    pub panel_icon: String,
    pub panel_extra_items: String,
    pub panel_anchor: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            navbar: selectors::NAVBAR.to_string(),
            nav_collapse: selectors::NAV_COLLAPSE.to_string(),
            sections: selectors::SECTIONS.to_string(),
            nav_links: selectors::NAV_LINKS.to_string(),
            back_to_top: selectors::BACK_TO_TOP.to_string(),
            revealable: selectors::REVEALABLE.to_string(),
            panel_control: selectors::PANEL_CONTROL.to_string(),
            panel_container: selectors::PANEL_CONTAINER.to_string(),
            panel_label: selectors::PANEL_LABEL.to_string(),
            panel_icon: selectors::PANEL_ICON.to_string(),
            panel_extra_items: selectors::PANEL_EXTRA_ITEMS.to_string(),
            panel_anchor: selectors::PANEL_ANCHOR.to_string(),
        }
    }
}

/// Tunable engine configuration; any field missing from a file keeps its default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tick_interval_ms: u64,
    pub section_lookahead_px: u32,
    pub navbar_scrolled_px: u32,
    pub back_to_top_px: u32,
    pub back_to_top_grace_ms: u64,
    pub reveal: RevealConfig,
    pub panel: PanelConfig,
    pub notify: NotifyConfig,
    pub selectors: SelectorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: scroll::TICK_INTERVAL_MS,
            section_lookahead_px: scroll::SECTION_LOOKAHEAD_PX,
            navbar_scrolled_px: scroll::NAVBAR_SCROLLED_PX,
            back_to_top_px: scroll::BACK_TO_TOP_PX,
            back_to_top_grace_ms: scroll::BACK_TO_TOP_GRACE_MS,
            reveal: RevealConfig::default(),
            panel: PanelConfig::default(),
            notify: NotifyConfig::default(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn back_to_top_grace(&self) -> Duration {
        Duration::from_millis(self.back_to_top_grace_ms)
    }

    /// Parse a configuration from JSON text
    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Read a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let payload = std::fs::read_to_string(path).map_err(|source| PageError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&payload)
    }

    /// Read a configuration file, falling back to defaults when absent or invalid
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(config) => {
                tracing::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(PageError::ConfigIo { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::debug!("No configuration at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                tracing::warn!("Ignoring configuration: {}", err);
                Self::default()
            }
        }
    }
}

/// Default location of the user configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("page-sync").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"back_to_top_px": 600, "panel": {"item_stagger_ms": 80}}"#)
            .unwrap();
        assert_eq!(config.back_to_top_px, 600);
        assert_eq!(config.panel.item_stagger_ms, 80);
        assert_eq!(config.panel.item_settle_ms, panel::ITEM_SETTLE_MS);
        assert_eq!(config.section_lookahead_px, scroll::SECTION_LOOKAHEAD_PX);
        assert_eq!(config.selectors.navbar, selectors::NAVBAR);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, PageError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("page-sync-definitely-missing.json");
        let config = EngineConfig::load_or_default(Some(&path));
        assert_eq!(config, EngineConfig::default());
    }
}
