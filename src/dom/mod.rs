//! Document collaborator interface
//!
//! The engine never owns the page. It reads layout and applies class, text
//! and style changes through [`Document`], so a browser binding, the
//! in-memory [`crate::page::PageDocument`] and test fixtures are
//! interchangeable.

mod selector;

pub use selector::{Filter, Selector};

/// Opaque handle to an element in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Query and mutation capability over the page
pub trait Document {
    /// All connected elements matching `selector`, in document order
    fn query_all(&self, selector: &Selector) -> Vec<ElementId>;

    fn query(&self, selector: &Selector) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.query(&Selector::id(id))
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn text(&self, element: ElementId) -> Option<String>;

    /// Distance from the document top in whole pixels, `None` once detached
    fn offset_top(&self, element: ElementId) -> Option<i32>;

    fn offset_height(&self, element: ElementId) -> Option<i32>;

    /// Current vertical scroll offset
    fn scroll_y(&self) -> u32;

    fn viewport_height(&self) -> u32;

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    fn add_class(&mut self, element: ElementId, class: &str);

    fn remove_class(&mut self, element: ElementId, class: &str);

    fn set_text(&mut self, element: ElementId, text: &str);

    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    fn style(&self, element: ElementId, property: &str) -> Option<String>;

    /// Create a detached element
    fn create_element(&mut self, tag: &str, classes: &[&str]) -> ElementId;

    fn append_to_body(&mut self, element: ElementId);

    fn remove(&mut self, element: ElementId);

    fn is_connected(&self, element: ElementId) -> bool;

    fn scroll_into_view(&mut self, element: ElementId, behavior: ScrollBehavior);

    fn scroll_to(&mut self, top: u32, behavior: ScrollBehavior);

    /// Record `hash` as the current location without reloading
    fn push_location_hash(&mut self, hash: &str);
}

/// Third-party collapsible navigation panel
pub trait CollapsibleMenu {
    fn hide(&mut self, doc: &mut dyn Document, nav: ElementId);
}

/// Collapses a panel by dropping its `show` class
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassCollapse;

impl CollapsibleMenu for ClassCollapse {
    fn hide(&mut self, doc: &mut dyn Document, nav: ElementId) {
        doc.remove_class(nav, crate::config::classes::SHOW);
    }
}

/// Resolve a selector string, treating parse failures like an absent element
pub fn resolve_all(doc: &dyn Document, selector: &str) -> Vec<ElementId> {
    match Selector::parse(selector) {
        Ok(parsed) => doc.query_all(&parsed),
        Err(err) => {
            tracing::warn!("{}", err);
            Vec::new()
        }
    }
}

/// Resolve the first match for a selector string
pub fn resolve(doc: &dyn Document, selector: &str) -> Option<ElementId> {
    let found = resolve_all(doc, selector).into_iter().next();
    if found.is_none() {
        tracing::debug!("{}", crate::error::PageError::MissingElement(selector.to_string()));
    }
    found
}
