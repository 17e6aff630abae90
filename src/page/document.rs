//! In-memory page document
//!
//! A flat element arena with fixed geometry. It backs the demo window and the
//! engine tests, and counts every write so tests can prove updates are
//! idempotent.

use std::collections::BTreeMap;

use crate::config::classes;
use crate::dom::{Document, ElementId, Filter, ScrollBehavior, Selector};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub styles: BTreeMap<String, String>,
    /// Document coordinates, or viewport coordinates when `fixed`
    pub rect: Rect,
    pub fixed: bool,
    /// Attached to its parent, or to the body for root elements
    pub connected: bool,
    pub parent: Option<ElementId>,
    /// Created at runtime rather than by the page builder
    transient: bool,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            styles: BTreeMap::new(),
            rect: Rect::default(),
            fixed: false,
            connected: true,
            parent: None,
            transient: false,
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: &str) -> Self {
        for name in class.split_whitespace() {
            if !self.classes.iter().any(|c| c == name) {
                self.classes.push(name.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.styles.insert(property.to_string(), value.to_string());
        self
    }

    pub fn at(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn child_of(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn dom_id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn matches(&self, selector: &Selector) -> bool {
        if let Some(tag) = &selector.tag {
            if &self.tag != tag {
                return false;
            }
        }
        match &selector.filter {
            Filter::None => true,
            Filter::Id(id) => self.dom_id() == Some(id.as_str()),
            Filter::Class(class) => self.has_class(class),
            Filter::Attribute(name) => match name.as_str() {
                "class" => !self.classes.is_empty(),
                _ => self.attributes.contains_key(name),
            },
        }
    }
}

/// Pending smooth scroll for the host to animate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub top: u32,
}

#[derive(Debug)]
pub struct PageDocument {
    nodes: Vec<Node>,
    /// Slots of removed runtime elements, reused by `create_element`
    free: Vec<usize>,
    scroll_y: u32,
    viewport_width: f32,
    viewport_height: u32,
    mutations: u64,
    scroll_request: Option<ScrollRequest>,
    location_hash: String,
}

impl PageDocument {
    pub fn new(viewport_width: f32, viewport_height: u32) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            scroll_y: 0,
            viewport_width,
            viewport_height,
            mutations: 0,
            scroll_request: None,
            location_hash: String::new(),
        }
    }

    /// Add an element while building the page; not counted as a mutation
    pub fn push(&mut self, node: Node) -> ElementId {
        self.nodes.push(node);
        ElementId(self.nodes.len() - 1)
    }

    /// Adjust geometry while laying out the page; not counted as a mutation
    pub fn place(&mut self, element: ElementId, rect: Rect) {
        if let Some(node) = self.node_mut(element) {
            node.rect = rect;
        }
    }

    pub fn node(&self, element: ElementId) -> Option<&Node> {
        self.nodes.get(element.0)
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(element.0)
    }

    /// Connected elements in document order
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (ElementId(index), node))
            .filter(move |(id, _)| self.is_connected(*id))
    }

    /// Number of slots held, live or not
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    fn has_children(&self, element: ElementId) -> bool {
        self.nodes.iter().any(|n| n.parent == Some(element))
    }

    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn set_viewport(&mut self, width: f32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.scroll_y = self.scroll_y.min(self.max_scroll());
    }

    /// Total height of the in-flow content
    pub fn content_height(&self) -> u32 {
        self.elements()
            .filter(|(_, n)| !n.fixed)
            .map(|(_, n)| n.rect.bottom())
            .fold(0.0f32, f32::max)
            .ceil() as u32
    }

    pub fn max_scroll(&self) -> u32 {
        self.content_height().saturating_sub(self.viewport_height)
    }

    /// Move the viewport, clamped to the scrollable range
    pub fn set_scroll_y(&mut self, y: u32) {
        self.scroll_y = y.min(self.max_scroll());
    }

    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.scroll_request.take()
    }

    pub fn location_hash(&self) -> &str {
        &self.location_hash
    }

    /// Whether the page stylesheet would render this element
    pub fn is_displayed(&self, element: ElementId) -> bool {
        let Some(node) = self.node(element) else {
            return false;
        };
        if !node.connected || node.styles.get("display").map(String::as_str) == Some("none") {
            return false;
        }
        if node.has_class("card-extra") {
            let expanded = node
                .parent
                .and_then(|p| self.node(p))
                .is_some_and(|p| p.has_class(classes::PANEL_EXPANDED));
            if !expanded {
                return false;
            }
        }
        match node.parent {
            Some(parent) => self.is_displayed(parent),
            None => true,
        }
    }

    /// Topmost displayed element under a viewport point accepted by `filter`
    pub fn hit_test(&self, x: f32, y: f32, filter: impl Fn(&Node) -> bool) -> Option<ElementId> {
        let scroll = self.scroll_y as f32;
        self.elements()
            .filter(|(_, node)| filter(node))
            .filter(|(_, node)| {
                let doc_y = if node.fixed { y } else { y + scroll };
                node.rect.contains(x, doc_y)
            })
            .map(|(id, _)| id)
            .filter(|id| self.is_displayed(*id))
            .last()
    }
}

impl Document for PageDocument {
    fn query_all(&self, selector: &Selector) -> Vec<ElementId> {
        self.elements()
            .filter(|(_, node)| node.matches(selector))
            .map(|(id, _)| id)
            .collect()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element)?.attributes.get(name).cloned()
    }

    fn text(&self, element: ElementId) -> Option<String> {
        Some(self.node(element)?.text.clone())
    }

    fn offset_top(&self, element: ElementId) -> Option<i32> {
        let node = self.node(element).filter(|_| self.is_connected(element))?;
        Some(node.rect.y.round() as i32)
    }

    fn offset_height(&self, element: ElementId) -> Option<i32> {
        let node = self.node(element).filter(|_| self.is_connected(element))?;
        Some(node.rect.height.round() as i32)
    }

    fn scroll_y(&self) -> u32 {
        self.scroll_y
    }

    fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element).is_some_and(|n| n.has_class(class))
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        self.mutations += 1;
        if let Some(node) = self.node_mut(element) {
            if !node.has_class(class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        self.mutations += 1;
        if let Some(node) = self.node_mut(element) {
            node.classes.retain(|c| c != class);
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.mutations += 1;
        if let Some(node) = self.node_mut(element) {
            node.text = text.to_string();
        }
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        self.mutations += 1;
        if let Some(node) = self.node_mut(element) {
            node.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn style(&self, element: ElementId, property: &str) -> Option<String> {
        self.node(element)?.styles.get(property).cloned()
    }

    /// Slots of removed runtime elements are reused, so a removed id must
    /// not be written to afterwards
    fn create_element(&mut self, tag: &str, classes: &[&str]) -> ElementId {
        let mut node = Node::new(tag);
        node.connected = false;
        node.transient = true;
        let node = classes.iter().fold(node, |node, class| node.class(class));
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                ElementId(slot)
            }
            None => self.push(node),
        }
    }

    fn append_to_body(&mut self, element: ElementId) {
        self.mutations += 1;
        if let Some(node) = self.node_mut(element) {
            node.connected = true;
            node.parent = None;
        }
    }

    /// Detach `element` together with its subtree
    fn remove(&mut self, element: ElementId) {
        self.mutations += 1;
        let Some(node) = self.node_mut(element) else {
            return;
        };
        let reclaim = node.connected && node.transient;
        node.connected = false;
        if reclaim && !self.has_children(element) {
            self.free.push(element.0);
        }
    }

    fn is_connected(&self, element: ElementId) -> bool {
        let mut current = element;
        loop {
            let Some(node) = self.node(current) else {
                return false;
            };
            if !node.connected {
                return false;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return true,
            }
        }
    }

    fn scroll_into_view(&mut self, element: ElementId, behavior: ScrollBehavior) {
        if let Some(top) = self.offset_top(element) {
            self.scroll_to(top.max(0) as u32, behavior);
        }
    }

    fn scroll_to(&mut self, top: u32, behavior: ScrollBehavior) {
        let top = top.min(self.max_scroll());
        match behavior {
            ScrollBehavior::Instant => {
                self.scroll_request = None;
                self.scroll_y = top;
            }
            ScrollBehavior::Smooth => self.scroll_request = Some(ScrollRequest { top }),
        }
    }

    fn push_location_hash(&mut self, hash: &str) {
        self.location_hash = hash.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (PageDocument, ElementId, ElementId) {
        let mut doc = PageDocument::new(800.0, 600);
        let section = doc.push(
            Node::new("section")
                .id("menu")
                .at(Rect::new(0.0, 0.0, 800.0, 2000.0)),
        );
        let card = doc.push(
            Node::new("div")
                .class("card-plato card-extra")
                .attr("data-aos", "fade-up")
                .child_of(section),
        );
        (doc, section, card)
    }

    #[test]
    fn test_query_by_selector_forms() {
        let (doc, section, card) = sample();
        assert_eq!(doc.query(&Selector::parse("section[id]").unwrap()), Some(section));
        assert_eq!(doc.query(&Selector::parse("#menu").unwrap()), Some(section));
        assert_eq!(doc.query_all(&Selector::parse("[data-aos]").unwrap()), vec![card]);
        assert!(doc.query(&Selector::parse("div[id]").unwrap()).is_none());
    }

    #[test]
    fn test_detached_elements_have_no_layout() {
        let (mut doc, section, _) = sample();
        assert_eq!(doc.offset_top(section), Some(0));
        doc.remove(section);
        assert_eq!(doc.offset_top(section), None);
        assert!(doc.query(&Selector::id("menu")).is_none());
    }

    #[test]
    fn test_scroll_is_clamped_and_smooth_is_deferred() {
        let (mut doc, _, _) = sample();
        doc.set_scroll_y(5000);
        assert_eq!(doc.scroll_y(), 1400);

        doc.scroll_to(100, ScrollBehavior::Smooth);
        assert_eq!(doc.scroll_y(), 1400);
        assert_eq!(doc.take_scroll_request(), Some(ScrollRequest { top: 100 }));
        assert_eq!(doc.take_scroll_request(), None);
    }

    #[test]
    fn test_extra_items_hidden_until_expanded() {
        let (mut doc, section, card) = sample();
        assert!(!doc.is_displayed(card));
        doc.add_class(section, classes::PANEL_EXPANDED);
        assert!(doc.is_displayed(card));
        assert_eq!(doc.mutation_count(), 1);
    }

    #[test]
    fn test_removing_a_parent_detaches_its_subtree() {
        let (mut doc, section, card) = sample();
        doc.add_class(section, classes::PANEL_EXPANDED);
        doc.remove(section);

        assert!(!doc.is_connected(card));
        assert!(doc.query_all(&Selector::parse("[data-aos]").unwrap()).is_empty());
        assert_eq!(doc.offset_top(card), None);
        assert!(!doc.is_displayed(card));
        assert_eq!(doc.elements().count(), 0);
    }

    #[test]
    fn test_removed_runtime_elements_free_their_slot() {
        let (mut doc, _, _) = sample();
        let base = doc.capacity();
        for _ in 0..1000 {
            let alert = doc.create_element("div", &["alert"]);
            doc.append_to_body(alert);
            doc.remove(alert);
        }
        assert_eq!(doc.capacity(), base + 1);

        let first = doc.create_element("div", &["alert"]);
        let second = doc.create_element("div", &["alert"]);
        assert_ne!(first, second);
        assert!(!doc.is_connected(first));
        assert_eq!(doc.capacity(), base + 2);
    }

    #[test]
    fn test_built_elements_are_never_reused() {
        let (mut doc, section, _) = sample();
        let base = doc.capacity();
        doc.remove(section);
        doc.create_element("div", &["alert"]);
        assert_eq!(doc.capacity(), base + 1);
    }
}
