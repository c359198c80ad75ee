#![forbid(unsafe_code)]

//! The time-class filter bar.
//!
//! Entries whose class currently matches no waypoint are disabled, and
//! the whole bar can be disabled while the board's data never loaded.
//! `on_select` fires only for selectable entries.

use waymark_core::FilterKind;

use crate::stage::{Markup, View};

/// One filter option as the bar shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterEntry {
    pub kind: FilterKind,
    pub count: usize,
    pub active: bool,
}

pub struct FilterBarView {
    entries: Vec<FilterEntry>,
    enabled: bool,
    on_select: Box<dyn Fn(FilterKind)>,
}

impl FilterBarView {
    pub fn new(entries: Vec<FilterEntry>, enabled: bool, on_select: Box<dyn Fn(FilterKind)>) -> Self {
        Self {
            entries,
            enabled,
            on_select,
        }
    }

    /// Ask the presenter to switch to `kind`. Disabled entries and a
    /// disabled bar swallow the request.
    pub fn select(&self, kind: FilterKind) {
        if !self.enabled {
            return;
        }
        let selectable = self
            .entries
            .iter()
            .any(|entry| entry.kind == kind && entry.count > 0);
        if selectable {
            (self.on_select)(kind);
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }
}

impl View for FilterBarView {
    fn markup(&self) -> Markup {
        let mut parts = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            let label = entry.kind.label();
            let part = if entry.active {
                format!("[{}:{label}]", index + 1)
            } else if entry.count == 0 || !self.enabled {
                format!(" {}:{label}~", index + 1)
            } else {
                format!(" {}:{label} ", index + 1)
            };
            parts.push(part);
        }
        Markup::new().line(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn entries() -> Vec<FilterEntry> {
        vec![
            FilterEntry {
                kind: FilterKind::All,
                count: 3,
                active: true,
            },
            FilterEntry {
                kind: FilterKind::Future,
                count: 1,
                active: false,
            },
            FilterEntry {
                kind: FilterKind::Present,
                count: 0,
                active: false,
            },
            FilterEntry {
                kind: FilterKind::Past,
                count: 2,
                active: false,
            },
        ]
    }

    fn recording_bar(enabled: bool) -> (FilterBarView, Rc<RefCell<Vec<FilterKind>>>) {
        let picked = Rc::new(RefCell::new(Vec::new()));
        let bar = FilterBarView::new(
            entries(),
            enabled,
            Box::new({
                let picked = Rc::clone(&picked);
                move |kind| picked.borrow_mut().push(kind)
            }),
        );
        (bar, picked)
    }

    #[test]
    fn selectable_entry_fires_the_callback() {
        let (bar, picked) = recording_bar(true);
        bar.select(FilterKind::Past);
        assert_eq!(*picked.borrow(), vec![FilterKind::Past]);
    }

    #[test]
    fn empty_entry_is_not_selectable() {
        let (bar, picked) = recording_bar(true);
        bar.select(FilterKind::Present);
        assert!(picked.borrow().is_empty());
    }

    #[test]
    fn disabled_bar_swallows_everything() {
        let (bar, picked) = recording_bar(false);
        bar.select(FilterKind::All);
        assert!(picked.borrow().is_empty());
    }

    #[test]
    fn markup_marks_active_and_empty_entries() {
        let (bar, _) = recording_bar(true);
        let line = bar.markup().lines()[0].clone();
        assert!(line.contains("[1:Everything]"), "{line}");
        assert!(line.contains("3:Present~"), "{line}");
        assert!(line.contains("4:Past "), "{line}");
    }
}
