#![forbid(unsafe_code)]

//! One-shot readiness barrier over several remote models.
//!
//! The board, the trip header, and the new-event button must not come up
//! until waypoints, destinations, and offers have all settled their initial
//! load. [`observe_ready`] watches any set of [`ReadySource`]s and invokes
//! its callback exactly once, after the last of them settles.
//!
//! # Invariants
//!
//! 1. The callback fires exactly once, or never if some source never
//!    settles.
//! 2. Sources already settled when the barrier is installed count
//!    immediately; if all are settled the callback fires before
//!    `observe_ready` returns.
//! 3. The reported kind is [`UpdateKind::InitFailed`] if any source
//!    failed, otherwise [`UpdateKind::Init`].
//! 4. After firing, the barrier drops its subscriptions; nothing lingers
//!    on the sources.

use std::cell::RefCell;
use std::rc::Rc;

use crate::observable::Subscription;
use crate::update::{InitStatus, UpdateKind};

/// A model whose initial load the barrier can wait on.
pub trait ReadySource {
    /// Where the source stands with its initial load.
    fn init_status(&self) -> InitStatus;

    /// Forward every published update kind to `listener`, payload dropped.
    fn observe_kinds(&self, listener: Box<dyn Fn(UpdateKind)>) -> Subscription;
}

struct Barrier {
    pending: usize,
    any_failed: bool,
    on_ready: Option<Box<dyn FnOnce(UpdateKind)>>,
    subscriptions: Vec<Subscription>,
}

impl Barrier {
    fn settle(&mut self, failed: bool) -> Option<(Box<dyn FnOnce(UpdateKind)>, Vec<Subscription>)> {
        self.any_failed |= failed;
        self.pending -= 1;
        if self.pending > 0 {
            return None;
        }
        let callback = self.on_ready.take()?;
        Some((callback, std::mem::take(&mut self.subscriptions)))
    }

    fn outcome(&self) -> UpdateKind {
        if self.any_failed {
            UpdateKind::InitFailed
        } else {
            UpdateKind::Init
        }
    }
}

/// Run `on_ready` once every source has settled its initial load.
///
/// Fire-and-forget: the barrier keeps itself alive through its
/// subscriptions and cleans up after firing. Non-init notifications and
/// repeated init notifications from the same source are ignored.
pub fn observe_ready(sources: &[&dyn ReadySource], on_ready: impl FnOnce(UpdateKind) + 'static) {
    let any_failed = sources
        .iter()
        .any(|source| source.init_status() == InitStatus::Failed);
    let unsettled: Vec<&dyn ReadySource> = sources
        .iter()
        .copied()
        .filter(|source| !source.init_status().is_settled())
        .collect();

    if unsettled.is_empty() {
        let kind = if any_failed {
            UpdateKind::InitFailed
        } else {
            UpdateKind::Init
        };
        on_ready(kind);
        return;
    }

    let barrier = Rc::new(RefCell::new(Barrier {
        pending: unsettled.len(),
        any_failed,
        on_ready: Some(Box::new(on_ready)),
        subscriptions: Vec::new(),
    }));

    for source in unsettled {
        let shared = Rc::clone(&barrier);
        let seen = std::cell::Cell::new(false);
        let subscription = source.observe_kinds(Box::new(move |kind| {
            let failed = match kind {
                UpdateKind::Init => false,
                UpdateKind::InitFailed => true,
                _ => return,
            };
            if seen.replace(true) {
                return;
            }
            let fired = shared.borrow_mut().settle(failed);
            if let Some((callback, subscriptions)) = fired {
                let kind = shared.borrow().outcome();
                drop(subscriptions);
                callback(kind);
            }
        }));
        barrier.borrow_mut().subscriptions.push(subscription);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observable::Observable;
    use std::cell::Cell;

    struct FakeSource {
        status: Cell<InitStatus>,
        observable: Observable<()>,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                status: Cell::new(InitStatus::Pending),
                observable: Observable::new(),
            }
        }

        fn settled(status: InitStatus) -> Self {
            let source = Self::new();
            source.status.set(status);
            source
        }

        fn finish_ok(&self) {
            self.status.set(InitStatus::Ready);
            self.observable.notify(UpdateKind::Init, &());
        }

        fn finish_err(&self) {
            self.status.set(InitStatus::Failed);
            self.observable.notify(UpdateKind::InitFailed, &());
        }
    }

    impl ReadySource for FakeSource {
        fn init_status(&self) -> InitStatus {
            self.status.get()
        }

        fn observe_kinds(&self, listener: Box<dyn Fn(UpdateKind)>) -> Subscription {
            self.observable.subscribe(move |kind, _| listener(kind))
        }
    }

    fn record() -> (Rc<RefCell<Vec<UpdateKind>>>, impl FnOnce(UpdateKind)) {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&fired);
        (fired, move |kind| sink.borrow_mut().push(kind))
    }

    #[test]
    fn fires_once_after_the_last_source_settles() {
        let a = FakeSource::new();
        let b = FakeSource::new();
        let c = FakeSource::new();
        let (fired, on_ready) = record();

        observe_ready(&[&a, &b, &c], on_ready);

        b.finish_ok();
        a.finish_ok();
        assert!(fired.borrow().is_empty(), "two of three is not ready");

        c.finish_ok();
        assert_eq!(*fired.borrow(), vec![UpdateKind::Init]);
    }

    #[test]
    fn fires_immediately_when_everything_already_settled() {
        let a = FakeSource::settled(InitStatus::Ready);
        let b = FakeSource::settled(InitStatus::Ready);
        let (fired, on_ready) = record();

        observe_ready(&[&a, &b], on_ready);
        assert_eq!(*fired.borrow(), vec![UpdateKind::Init]);
    }

    #[test]
    fn any_failure_turns_the_outcome_into_init_failed() {
        let a = FakeSource::new();
        let b = FakeSource::new();
        let (fired, on_ready) = record();

        observe_ready(&[&a, &b], on_ready);
        a.finish_err();
        b.finish_ok();
        assert_eq!(*fired.borrow(), vec![UpdateKind::InitFailed]);
    }

    #[test]
    fn already_failed_source_counts_toward_the_outcome() {
        let a = FakeSource::settled(InitStatus::Failed);
        let b = FakeSource::new();
        let (fired, on_ready) = record();

        observe_ready(&[&a, &b], on_ready);
        b.finish_ok();
        assert_eq!(*fired.borrow(), vec![UpdateKind::InitFailed]);
    }

    #[test]
    fn non_init_notifications_are_ignored() {
        let a = FakeSource::new();
        let (fired, on_ready) = record();

        observe_ready(&[&a], on_ready);
        a.observable.notify(UpdateKind::Minor, &());
        a.observable.notify(UpdateKind::Major, &());
        assert!(fired.borrow().is_empty());

        a.finish_ok();
        assert_eq!(*fired.borrow(), vec![UpdateKind::Init]);
    }

    #[test]
    fn duplicate_init_from_one_source_counts_once() {
        let a = FakeSource::new();
        let b = FakeSource::new();
        let (fired, on_ready) = record();

        observe_ready(&[&a, &b], on_ready);
        a.finish_ok();
        a.observable.notify(UpdateKind::Init, &());
        assert!(
            fired.borrow().is_empty(),
            "one source settling twice must not satisfy the barrier"
        );

        b.finish_ok();
        assert_eq!(*fired.borrow(), vec![UpdateKind::Init]);
    }

    #[test]
    fn barrier_unsubscribes_after_firing() {
        let a = FakeSource::new();
        let (fired, on_ready) = record();

        observe_ready(&[&a], on_ready);
        assert_eq!(a.observable.listener_count(), 1);

        a.finish_ok();
        assert_eq!(*fired.borrow(), vec![UpdateKind::Init]);
        assert_eq!(a.observable.listener_count(), 0);

        a.observable.notify(UpdateKind::Init, &());
        assert_eq!(fired.borrow().len(), 1, "the barrier is one-shot");
    }
}
