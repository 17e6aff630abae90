//! State-to-presentation mapping
//!
//! Each component maps its state to a small table of class toggles and
//! remembers what it last applied, so re-running an update with unchanged
//! state writes nothing to the document.

use crate::dom::{Document, ElementId};

/// One row of a presentation table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassRule {
    pub class: &'static str,
    pub present: bool,
}

impl ClassRule {
    pub const fn on(class: &'static str) -> Self {
        Self {
            class,
            present: true,
        }
    }

    pub const fn off(class: &'static str) -> Self {
        Self {
            class,
            present: false,
        }
    }
}

/// Apply a presentation table to one element
pub fn apply_rules(doc: &mut dyn Document, element: ElementId, rules: &[ClassRule]) {
    for rule in rules {
        if rule.present {
            doc.add_class(element, rule.class);
        } else {
            doc.remove_class(element, rule.class);
        }
    }
}

/// Last value pushed to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presented<T> {
    applied: Option<T>,
}

impl<T> Default for Presented<T> {
    fn default() -> Self {
        Self { applied: None }
    }
}

impl<T: PartialEq> Presented<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `next`; returns true when it differs from what was applied.
    /// The first update always reports a change.
    pub fn update(&mut self, next: T) -> bool {
        if self.applied.as_ref() == Some(&next) {
            return false;
        }
        self.applied = Some(next);
        true
    }

    pub fn current(&self) -> Option<&T> {
        self.applied.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presented_reports_only_changes() {
        let mut presented = Presented::new();
        assert!(presented.update(1));
        assert!(!presented.update(1));
        assert!(presented.update(2));
        assert_eq!(presented.current(), Some(&2));
    }
}
