//! One-shot entrance animation for tagged elements
//!
//! Elements are registered once at startup. The first qualifying
//! intersection schedules the reveal class after a stagger based on the
//! element's position among the intersecting entries of that batch, and the
//! element is never observed again.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, trace};

use crate::config::{EngineConfig, classes};
use crate::dom::{self, Document, ElementId};
use crate::timer::{Scheduler, TimerEvent};
use crate::viewport::{IntersectionEntry, IntersectionObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    /// Intersected; class toggle waiting on its stagger delay
    Scheduled,
    Revealed,
}

#[derive(Debug)]
pub struct RevealAnimator {
    stagger: Duration,
    elements: BTreeMap<ElementId, RevealState>,
}

impl RevealAnimator {
    /// Register every matching element with `observer`
    pub fn bind(
        doc: &dyn Document,
        config: &EngineConfig,
        observer: &mut dyn IntersectionObserver,
    ) -> Self {
        let elements: BTreeMap<ElementId, RevealState> =
            dom::resolve_all(doc, &config.selectors.revealable)
                .into_iter()
                .map(|el| (el, RevealState::Pending))
                .collect();
        for element in elements.keys() {
            observer.observe(*element);
        }
        debug!("Reveal animator observing {} elements", elements.len());

        Self {
            stagger: config.reveal.stagger(),
            elements,
        }
    }

    pub fn state(&self, element: ElementId) -> Option<RevealState> {
        self.elements.get(&element).copied()
    }

    pub fn pending_count(&self) -> usize {
        self.elements
            .values()
            .filter(|s| **s == RevealState::Pending)
            .count()
    }

    /// Handle one intersection batch
    pub fn on_intersections(
        &mut self,
        entries: &[IntersectionEntry],
        scheduler: &mut dyn Scheduler,
        observer: &mut dyn IntersectionObserver,
    ) {
        let intersecting = entries.iter().filter(|e| e.is_intersecting);
        for (batch_index, entry) in intersecting.enumerate() {
            let Some(state) = self.elements.get_mut(&entry.target) else {
                continue;
            };
            if *state != RevealState::Pending {
                // Late entry for an element already handled
                observer.unobserve(entry.target);
                continue;
            }
            *state = RevealState::Scheduled;
            let delay = self.stagger * batch_index as u32;
            scheduler.schedule_once(delay, TimerEvent::Reveal(entry.target));
            observer.unobserve(entry.target);
            trace!("Reveal of {:?} scheduled in {:?}", entry.target, delay);
        }
    }

    /// Stagger delay elapsed for `element`
    pub fn on_timer(&mut self, element: ElementId, doc: &mut dyn Document) {
        match self.elements.get_mut(&element) {
            Some(state) if *state == RevealState::Scheduled => {
                *state = RevealState::Revealed;
                if doc.is_connected(element) {
                    doc.add_class(element, classes::REVEALED);
                }
                debug!("Revealed {:?}", element);
            }
            _ => trace!("Stale reveal for {:?} ignored", element),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Node, PageDocument, Rect};
    use crate::timer::TimerQueue;
    use crate::viewport::{IntersectionOptions, ViewportObserver};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn setup() -> (PageDocument, Vec<ElementId>, ViewportObserver, RevealAnimator) {
        let mut doc = PageDocument::new(800.0, 600);
        let cards: Vec<ElementId> = (0..4)
            .map(|i| {
                doc.push(
                    Node::new("div")
                        .attr("data-aos", "fade-up")
                        .at(Rect::new(0.0, 100.0 + i as f32 * 700.0, 200.0, 150.0)),
                )
            })
            .collect();
        let config = EngineConfig::default();
        let mut observer = ViewportObserver::new(IntersectionOptions::from(&config.reveal));
        let animator = RevealAnimator::bind(&doc, &config, &mut observer);
        (doc, cards, observer, animator)
    }

    fn run(queue: &mut TimerQueue, animator: &mut RevealAnimator, doc: &mut PageDocument, now: u64) {
        while let Some(event) = queue.pop_due(ms(now)) {
            if let TimerEvent::Reveal(el) = event {
                animator.on_timer(el, doc);
            }
        }
    }

    #[test]
    fn test_stagger_follows_batch_position() {
        let mut queue = TimerQueue::new();
        let (mut doc, cards, mut observer, mut animator) = setup();
        let batch = [
            IntersectionEntry { target: cards[2], is_intersecting: false, ratio: 0.0 },
            IntersectionEntry { target: cards[3], is_intersecting: true, ratio: 1.0 },
            IntersectionEntry { target: cards[1], is_intersecting: true, ratio: 1.0 },
        ];
        animator.on_intersections(&batch, &mut queue, &mut observer);

        run(&mut queue, &mut animator, &mut doc, 0);
        assert!(doc.has_class(cards[3], "aos-animate"));
        assert!(!doc.has_class(cards[1], "aos-animate"));

        run(&mut queue, &mut animator, &mut doc, 50);
        assert!(doc.has_class(cards[1], "aos-animate"));
        assert_eq!(animator.state(cards[2]), Some(RevealState::Pending));
        assert!(observer.is_observing(cards[2]));
        assert!(!observer.is_observing(cards[1]));
    }

    #[test]
    fn test_reveal_is_permanent() {
        let mut queue = TimerQueue::new();
        let (mut doc, cards, mut observer, mut animator) = setup();

        let entries = observer.poll(&doc);
        animator.on_intersections(&entries, &mut queue, &mut observer);
        run(&mut queue, &mut animator, &mut doc, 100);
        assert_eq!(animator.state(cards[0]), Some(RevealState::Revealed));

        // Leave and re-enter repeatedly
        for y in [1200, 0, 1200, 0] {
            doc.set_scroll_y(y);
            let entries = observer.poll(&doc);
            animator.on_intersections(&entries, &mut queue, &mut observer);
            run(&mut queue, &mut animator, &mut doc, 1000);
        }
        let writes = doc.mutation_count();
        animator.on_intersections(
            &[IntersectionEntry { target: cards[0], is_intersecting: true, ratio: 1.0 }],
            &mut queue,
            &mut observer,
        );
        run(&mut queue, &mut animator, &mut doc, 2000);

        assert_eq!(animator.state(cards[0]), Some(RevealState::Revealed));
        assert_eq!(doc.mutation_count(), writes);
        assert!(doc.has_class(cards[0], "aos-animate"));
    }

    #[test]
    fn test_unknown_element_ignored() {
        let mut queue = TimerQueue::new();
        let (mut doc, _, mut observer, mut animator) = setup();
        animator.on_timer(ElementId(999), &mut doc);
        animator.on_intersections(
            &[IntersectionEntry { target: ElementId(999), is_intersecting: true, ratio: 1.0 }],
            &mut queue,
            &mut observer,
        );
        assert_eq!(queue.pending_count(), 0);
        assert_eq!(doc.mutation_count(), 0);
    }
}
