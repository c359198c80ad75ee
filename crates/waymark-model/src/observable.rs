#![forbid(unsafe_code)]

//! Single-threaded broadcast of model changes.
//!
//! An [`Observable<P>`] carries notifications of the form
//! `(UpdateKind, &P)` to every live subscriber. Models own one and publish
//! through it; presenters subscribe and hold the returned [`Subscription`]
//! for as long as they want to hear updates.
//!
//! # Invariants
//!
//! 1. Each notify delivers to every listener subscribed at the moment
//!    notify is called, exactly once, in subscription order.
//! 2. A listener added while a notify is in flight first hears the next
//!    notify, not the current one.
//! 3. Dropping a [`Subscription`] removes the listener before the next
//!    notify; a drop performed inside a callback does not disturb the
//!    cycle already in flight.
//! 4. A panicking listener is caught and logged; the remaining listeners
//!    of that cycle still run.
//!
//! # Failure Modes
//!
//! - Listener panic: logged via `tracing::error`, notification continues.
//!   The panicking listener stays subscribed.
//! - Subscription outliving the observable: detaching becomes a no-op.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use crate::update::UpdateKind;

type Listener<P> = Rc<dyn Fn(UpdateKind, &P)>;

struct Entry<P> {
    id: u64,
    listener: Listener<P>,
}

struct Registry<P> {
    entries: RefCell<Vec<Entry<P>>>,
    next_id: Cell<u64>,
}

/// A broadcast channel for one model's change notifications.
///
/// Cloning is shallow; clones share the listener registry.
pub struct Observable<P> {
    registry: Rc<Registry<P>>,
}

impl<P> Observable<P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(Registry {
                entries: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Register `listener` for every subsequent notify.
    ///
    /// The listener fires until the returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription immediately unsubscribes the listener"]
    pub fn subscribe(&self, listener: impl Fn(UpdateKind, &P) + 'static) -> Subscription
    where
        P: 'static,
    {
        let id = self.registry.next_id.get();
        self.registry.next_id.set(id + 1);
        self.registry.entries.borrow_mut().push(Entry {
            id,
            listener: Rc::new(listener),
        });

        let registry = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.entries.borrow_mut().retain(|entry| entry.id != id);
            }
        })
    }

    /// Deliver `(kind, payload)` to every current listener.
    ///
    /// The listener set is snapshotted up front, so callbacks are free to
    /// subscribe, unsubscribe, or notify again without deadlocking on the
    /// registry.
    pub fn notify(&self, kind: UpdateKind, payload: &P) {
        let snapshot: Vec<(u64, Listener<P>)> = self
            .registry
            .entries
            .borrow()
            .iter()
            .map(|entry| (entry.id, Rc::clone(&entry.listener)))
            .collect();

        for (id, listener) in snapshot {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener(kind, payload))) {
                tracing::error!(
                    listener = id,
                    kind = %kind,
                    panic = panic_message(panic.as_ref()),
                    "listener panicked during notify; continuing with the rest"
                );
            }
        }
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.entries.borrow().len()
    }
}

impl<P> Default for Observable<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for Observable<P> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<P> std::fmt::Debug for Observable<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

// ---------------------------------------------------------------------------
// Subscription: RAII unsubscribe guard
// ---------------------------------------------------------------------------

/// Keeps a listener registered for as long as it lives.
///
/// Dropping the guard unsubscribes. The guard is payload-type-erased so
/// holders can collect subscriptions to differently-typed observables in
/// one `Vec<Subscription>`.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Unsubscribe now instead of at end of scope.
    pub fn cancel(mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
