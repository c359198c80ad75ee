#![forbid(unsafe_code)]

//! The itinerary list container and its placeholder messages.

use crate::stage::{Markup, View};

/// Empty container the board mounts rows and editors under. Renders
/// nothing itself; layout comes from its children.
#[derive(Debug, Default)]
pub struct ListView;

impl ListView {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl View for ListView {
    fn markup(&self) -> Markup {
        Markup::new()
    }
}

/// One-line placeholder shown instead of rows: loading, load failure,
/// or the empty-filter hint.
#[derive(Debug)]
pub struct ListMessageView {
    text: String,
}

impl ListMessageView {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl View for ListMessageView {
    fn markup(&self) -> Markup {
        Markup::new().line(self.text.clone())
    }
}
