//! Expandable menu panel
//!
//! A two-state toggle bound to one control and one container. Container
//! class, label text and icon are always written together in a single call,
//! so no observer ever sees them disagree. Expanding also runs a staggered
//! appearance over the extra items, one small state machine per item.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::{EngineConfig, PanelConfig, classes};
use crate::dom::{self, Document, ElementId, ScrollBehavior};
use crate::presentation::{ClassRule, apply_rules};
use crate::timer::{Scheduler, TimerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Collapsed,
    Expanded,
}

impl PanelState {
    pub fn toggled(self) -> Self {
        match self {
            PanelState::Collapsed => PanelState::Expanded,
            PanelState::Expanded => PanelState::Collapsed,
        }
    }

    pub fn label(self, config: &PanelConfig) -> &str {
        match self {
            PanelState::Collapsed => &config.collapsed_label,
            PanelState::Expanded => &config.expanded_label,
        }
    }

    pub fn container_rules(self) -> &'static [ClassRule] {
        const COLLAPSED: [ClassRule; 1] = [ClassRule::off(classes::PANEL_EXPANDED)];
        const EXPANDED: [ClassRule; 1] = [ClassRule::on(classes::PANEL_EXPANDED)];
        match self {
            PanelState::Collapsed => &COLLAPSED,
            PanelState::Expanded => &EXPANDED,
        }
    }

    pub fn icon_rules(self) -> &'static [ClassRule] {
        const COLLAPSED: [ClassRule; 2] = [
            ClassRule::off(classes::ICON_EXPANDED),
            ClassRule::on(classes::ICON_COLLAPSED),
        ];
        const EXPANDED: [ClassRule; 2] = [
            ClassRule::off(classes::ICON_COLLAPSED),
            ClassRule::on(classes::ICON_EXPANDED),
        ];
        match self {
            PanelState::Collapsed => &COLLAPSED,
            PanelState::Expanded => &EXPANDED,
        }
    }
}

/// Step of an item's appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStage {
    /// Reset to transparent and offset
    Prepare,
    /// Start the transition to opaque and in place
    Transition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPhase {
    Scheduled,
    Prepared,
    Visible,
}

#[derive(Debug)]
pub struct PanelToggle {
    config: PanelConfig,
    control: ElementId,
    container: ElementId,
    label: Option<ElementId>,
    icon: Option<ElementId>,
    extra_items: String,
    anchor: String,
    state: PanelState,
    items: BTreeMap<ElementId, ItemPhase>,
}

impl PanelToggle {
    /// `None` when the control or the container is absent
    pub fn bind(doc: &dyn Document, config: &EngineConfig) -> Option<Self> {
        let selectors = &config.selectors;
        let control = dom::resolve(doc, &selectors.panel_control)?;
        let container = dom::resolve(doc, &selectors.panel_container)?;
        Some(Self {
            config: config.panel.clone(),
            control,
            container,
            label: dom::resolve(doc, &selectors.panel_label),
            icon: dom::resolve(doc, &selectors.panel_icon),
            extra_items: selectors.panel_extra_items.clone(),
            anchor: selectors.panel_anchor.clone(),
            state: PanelState::Collapsed,
            items: BTreeMap::new(),
        })
    }

    pub fn control(&self) -> ElementId {
        self.control
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn item_phase(&self, item: ElementId) -> Option<ItemPhase> {
        self.items.get(&item).copied()
    }

    /// User activated the control
    pub fn activate(&mut self, doc: &mut dyn Document, scheduler: &mut dyn Scheduler) {
        self.state = self.state.toggled();
        debug!("Panel {:?}", self.state);
        self.present(doc);

        match self.state {
            PanelState::Expanded => self.schedule_items(doc, scheduler),
            PanelState::Collapsed => {
                if let Some(anchor) = dom::resolve(doc, &self.anchor) {
                    doc.scroll_into_view(anchor, ScrollBehavior::Smooth);
                }
            }
        }
    }

    fn present(&self, doc: &mut dyn Document) {
        apply_rules(doc, self.container, self.state.container_rules());
        if let Some(label) = self.label {
            doc.set_text(label, self.state.label(&self.config));
        }
        if let Some(icon) = self.icon {
            apply_rules(doc, icon, self.state.icon_rules());
        }
    }

    fn schedule_items(&mut self, doc: &dyn Document, scheduler: &mut dyn Scheduler) {
        let stagger = Duration::from_millis(self.config.item_stagger_ms);
        for (index, item) in dom::resolve_all(doc, &self.extra_items)
            .into_iter()
            .enumerate()
        {
            self.items.insert(item, ItemPhase::Scheduled);
            scheduler.schedule_once(
                stagger * index as u32,
                TimerEvent::PanelItem {
                    item,
                    stage: ItemStage::Prepare,
                },
            );
        }
    }

    /// Advance one item's appearance
    pub fn on_item_timer(
        &mut self,
        item: ElementId,
        stage: ItemStage,
        doc: &mut dyn Document,
        scheduler: &mut dyn Scheduler,
    ) {
        if !doc.is_connected(item) {
            self.items.remove(&item);
            trace!("Panel item {:?} gone, skipping {:?}", item, stage);
            return;
        }
        match stage {
            ItemStage::Prepare => {
                doc.set_style(item, "opacity", "0");
                doc.set_style(
                    item,
                    "transform",
                    &format!("translateY({}px)", self.config.item_offset_px),
                );
                self.items.insert(item, ItemPhase::Prepared);
                scheduler.schedule_once(
                    Duration::from_millis(self.config.item_settle_ms),
                    TimerEvent::PanelItem {
                        item,
                        stage: ItemStage::Transition,
                    },
                );
            }
            ItemStage::Transition => {
                let seconds = self.config.item_transition_ms as f32 / 1000.0;
                doc.set_style(item, "transition", &format!("all {seconds}s ease"));
                doc.set_style(item, "opacity", "1");
                doc.set_style(item, "transform", "translateY(0)");
                self.items.insert(item, ItemPhase::Visible);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Node, PageDocument, Rect};
    use crate::timer::TimerQueue;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    struct Fixture {
        doc: PageDocument,
        queue: TimerQueue,
        panel: PanelToggle,
        container: ElementId,
        label: ElementId,
        icon: ElementId,
        extras: Vec<ElementId>,
    }

    fn fixture() -> Fixture {
        let mut doc = PageDocument::new(800.0, 600);
        doc.push(Node::new("section").id("menu").at(Rect::new(0.0, 900.0, 800.0, 1500.0)));
        let container = doc.push(Node::new("div").id("platos-container"));
        let extras = (0..3)
            .map(|_| doc.push(Node::new("div").class("card-extra").child_of(container)))
            .collect();
        doc.push(Node::new("button").id("toggle-menu"));
        let label = doc.push(Node::new("span").id("toggle-text").text("Ver Menú Completo"));
        let icon = doc.push(Node::new("i").id("toggle-icon").class("bi bi-chevron-down"));
        let panel = PanelToggle::bind(&doc, &EngineConfig::default()).unwrap();
        Fixture {
            doc,
            queue: TimerQueue::new(),
            panel,
            container,
            label,
            icon,
            extras,
        }
    }

    fn run(f: &mut Fixture, now: u64) {
        while let Some(event) = f.queue.pop_due(ms(now)) {
            if let TimerEvent::PanelItem { item, stage } = event {
                f.panel.on_item_timer(item, stage, &mut f.doc, &mut f.queue);
            }
        }
    }

    fn assert_consistent(f: &Fixture) {
        let expanded = f.doc.has_class(f.container, "show-extra");
        let text = f.doc.text(f.label).unwrap();
        let up = f.doc.has_class(f.icon, "bi-chevron-up");
        let down = f.doc.has_class(f.icon, "bi-chevron-down");
        if expanded {
            assert_eq!(text, "Ver Menú Reducido");
            assert!(up && !down);
        } else {
            assert_eq!(text, "Ver Menú Completo");
            assert!(down && !up);
        }
    }

    #[test]
    fn test_toggle_keeps_label_icon_and_class_in_sync() {
        let mut f = fixture();
        for _ in 0..4 {
            f.panel.activate(&mut f.doc, &mut f.queue);
            assert_consistent(&f);
            let later = f.queue.now().as_millis() as u64 + 30;
            run(&mut f, later);
            assert_consistent(&f);
        }
        assert_eq!(f.panel.state(), PanelState::Collapsed);
    }

    #[test]
    fn test_expand_staggers_items() {
        let mut f = fixture();
        f.panel.activate(&mut f.doc, &mut f.queue);
        assert_eq!(f.panel.state(), PanelState::Expanded);

        run(&mut f, 0);
        assert_eq!(f.panel.item_phase(f.extras[0]), Some(ItemPhase::Prepared));
        assert_eq!(f.doc.style(f.extras[0], "opacity").as_deref(), Some("0"));
        assert_eq!(f.panel.item_phase(f.extras[1]), Some(ItemPhase::Scheduled));

        run(&mut f, 50);
        assert_eq!(f.panel.item_phase(f.extras[0]), Some(ItemPhase::Visible));
        assert_eq!(f.doc.style(f.extras[0], "opacity").as_deref(), Some("1"));
        assert_eq!(
            f.doc.style(f.extras[0], "transition").as_deref(),
            Some("all 0.5s ease")
        );

        run(&mut f, 100);
        assert_eq!(f.panel.item_phase(f.extras[1]), Some(ItemPhase::Prepared));
        run(&mut f, 250);
        for extra in &f.extras {
            assert_eq!(f.panel.item_phase(*extra), Some(ItemPhase::Visible));
            assert_eq!(f.doc.style(*extra, "transform").as_deref(), Some("translateY(0)"));
        }
    }

    #[test]
    fn test_collapse_scrolls_to_anchor() {
        let mut f = fixture();
        f.doc.set_scroll_y(1500);
        f.panel.activate(&mut f.doc, &mut f.queue);
        f.panel.activate(&mut f.doc, &mut f.queue);
        assert_eq!(f.doc.take_scroll_request().map(|r| r.top), Some(900));
    }

    #[test]
    fn test_removed_item_skipped() {
        let mut f = fixture();
        f.panel.activate(&mut f.doc, &mut f.queue);
        f.doc.remove(f.extras[2]);
        run(&mut f, 500);
        assert_eq!(f.panel.item_phase(f.extras[2]), None);
        assert_eq!(f.doc.style(f.extras[2], "opacity"), None);
    }

    #[test]
    fn test_removed_container_stops_item_animation() {
        let mut f = fixture();
        f.panel.activate(&mut f.doc, &mut f.queue);
        run(&mut f, 0);
        assert_eq!(f.panel.item_phase(f.extras[0]), Some(ItemPhase::Prepared));

        f.doc.remove(f.container);
        run(&mut f, 500);

        assert!(dom::resolve_all(&f.doc, ".card-extra").is_empty());
        for extra in &f.extras {
            assert!(!f.doc.is_connected(*extra));
            assert_eq!(f.panel.item_phase(*extra), None);
        }
        assert_eq!(f.doc.style(f.extras[0], "opacity").as_deref(), Some("0"));
        assert_eq!(f.doc.style(f.extras[1], "opacity"), None);
    }

    #[test]
    fn test_missing_control_disables_panel() {
        let doc = PageDocument::new(800.0, 600);
        assert!(PanelToggle::bind(&doc, &EngineConfig::default()).is_none());
    }
}
