//! In-page anchor links

use tracing::debug;

use crate::config::{EngineConfig, classes};
use crate::dom::{self, CollapsibleMenu, Document, ScrollBehavior};

/// What happened to a link activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Not an in-page link or target missing; let the default action run
    Default,
    /// A bare `#`; default suppressed, nothing else
    Suppressed,
    /// Scrolled to the target and recorded its hash
    Scrolled { hash: String },
}

impl LinkOutcome {
    pub fn prevents_default(&self) -> bool {
        !matches!(self, LinkOutcome::Default)
    }
}

#[derive(Debug, Clone)]
pub struct AnchorNavigator {
    nav_collapse: String,
}

impl AnchorNavigator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            nav_collapse: config.selectors.nav_collapse.clone(),
        }
    }

    /// Follow an `href` with smooth scrolling, closing the mobile menu if open
    pub fn on_link_click(
        &self,
        href: &str,
        doc: &mut dyn Document,
        menu: &mut dyn CollapsibleMenu,
    ) -> LinkOutcome {
        let Some(key) = href.strip_prefix('#') else {
            return LinkOutcome::Default;
        };
        if key.is_empty() {
            return LinkOutcome::Suppressed;
        }
        let Some(target) = doc.element_by_id(key) else {
            return LinkOutcome::Default;
        };

        doc.scroll_into_view(target, ScrollBehavior::Smooth);
        if let Some(nav) = dom::resolve(doc, &self.nav_collapse) {
            if doc.has_class(nav, classes::SHOW) {
                menu.hide(doc, nav);
            }
        }
        doc.push_location_hash(href);
        debug!("Navigated to {}", href);
        LinkOutcome::Scrolled {
            hash: href.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ClassCollapse, ElementId};
    use crate::page::{Node, PageDocument, Rect};

    #[derive(Default)]
    struct CountingMenu {
        hidden: Vec<ElementId>,
    }

    impl CollapsibleMenu for CountingMenu {
        fn hide(&mut self, _doc: &mut dyn Document, nav: ElementId) {
            self.hidden.push(nav);
        }
    }

    fn page() -> (PageDocument, ElementId) {
        let mut doc = PageDocument::new(800.0, 600);
        let nav = doc.push(Node::new("div").class("navbar-collapse"));
        doc.push(Node::new("section").id("inicio").at(Rect::new(0.0, 0.0, 800.0, 900.0)));
        doc.push(Node::new("section").id("contacto").at(Rect::new(0.0, 900.0, 800.0, 900.0)));
        (doc, nav)
    }

    #[test]
    fn test_bare_hash_only_suppresses() {
        let (mut doc, _) = page();
        let navigator = AnchorNavigator::new(&EngineConfig::default());
        let outcome = navigator.on_link_click("#", &mut doc, &mut ClassCollapse);
        assert_eq!(outcome, LinkOutcome::Suppressed);
        assert!(outcome.prevents_default());
        assert_eq!(doc.take_scroll_request(), None);
    }

    #[test]
    fn test_scrolls_and_records_hash() {
        let (mut doc, _) = page();
        let navigator = AnchorNavigator::new(&EngineConfig::default());
        let mut menu = CountingMenu::default();
        let outcome = navigator.on_link_click("#contacto", &mut doc, &mut menu);

        assert_eq!(outcome, LinkOutcome::Scrolled { hash: "#contacto".into() });
        assert_eq!(doc.take_scroll_request().map(|r| r.top), Some(900));
        assert_eq!(doc.location_hash(), "#contacto");
        // Mobile menu was closed already
        assert!(menu.hidden.is_empty());
    }

    #[test]
    fn test_open_mobile_menu_is_closed() {
        let (mut doc, nav) = page();
        doc.add_class(nav, "show");
        let navigator = AnchorNavigator::new(&EngineConfig::default());
        navigator.on_link_click("#inicio", &mut doc, &mut ClassCollapse);
        assert!(!doc.has_class(nav, "show"));
    }

    #[test]
    fn test_unknown_target_falls_through() {
        let (mut doc, _) = page();
        let navigator = AnchorNavigator::new(&EngineConfig::default());
        assert_eq!(
            navigator.on_link_click("#nowhere", &mut doc, &mut ClassCollapse),
            LinkOutcome::Default
        );
        assert_eq!(
            navigator.on_link_click("https://example.com", &mut doc, &mut ClassCollapse),
            LinkOutcome::Default
        );
    }
}
