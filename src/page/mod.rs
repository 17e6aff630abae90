//! In-memory page model used by the demo window and the tests

mod document;
mod layout;

pub use document::{Node, PageDocument, Rect, ScrollRequest};
pub use layout::{Dish, PageLayout, SectionLayout, place_fixed};
