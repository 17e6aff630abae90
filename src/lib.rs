//! Page Sync - scroll-driven behavior layer for a landing page
//!
//! Keeps navigation highlighting, navbar styling, the back-to-top button,
//! entrance animations, the expandable menu panel and transient
//! notifications in sync with the scroll position and user input.
//!
//! The engine is host-agnostic: it talks to the page through
//! [`dom::Document`], schedules work through [`timer::Scheduler`] and learns
//! about visibility through [`viewport::IntersectionObserver`].

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod navigation;
pub mod newsletter;
pub mod notify;
pub mod page;
pub mod panel;
pub mod presentation;
pub mod rate_limit;
pub mod reveal;
pub mod scroll_tracker;
pub mod timer;
pub mod viewport;

pub use config::EngineConfig;
pub use controller::PageController;
pub use error::{PageError, Result};
