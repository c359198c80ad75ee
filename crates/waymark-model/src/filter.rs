#![forbid(unsafe_code)]

//! The active list filter. Purely local; nothing to load.

use waymark_core::FilterKind;

use std::cell::Cell;

use crate::observable::{Observable, Subscription};
use crate::update::UpdateKind;

/// Holds which [`FilterKind`] the board is currently showing.
///
/// `set_filter` always notifies, even when the value is unchanged; callers
/// that want to skip redundant switches compare against [`current`]
/// first.
///
/// [`current`]: FilterModel::current
#[derive(Debug, Default)]
pub struct FilterModel {
    current: Cell<FilterKind>,
    observable: Observable<FilterKind>,
}

impl FilterModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> FilterKind {
        self.current.get()
    }

    /// Switch the filter and broadcast `(kind, new filter)`.
    pub fn set_filter(&self, kind: UpdateKind, filter: FilterKind) {
        self.current.set(filter);
        self.observable.notify(kind, &filter);
    }

    #[must_use = "dropping the subscription immediately unsubscribes the listener"]
    pub fn subscribe(&self, listener: impl Fn(UpdateKind, &FilterKind) + 'static) -> Subscription {
        self.observable.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn starts_on_everything() {
        assert_eq!(FilterModel::new().current(), FilterKind::All);
    }

    #[test]
    fn set_filter_updates_and_broadcasts() {
        let model = FilterModel::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let _sub = model.subscribe(move |kind, filter| sink.borrow_mut().push((kind, *filter)));

        model.set_filter(UpdateKind::Major, FilterKind::Past);

        assert_eq!(model.current(), FilterKind::Past);
        assert_eq!(*seen.borrow(), vec![(UpdateKind::Major, FilterKind::Past)]);
    }
}
