#![forbid(unsafe_code)]

//! Read-only cache of the destination catalog.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use waymark_core::{Destination, DestinationId};

use crate::gateway::DestinationsGateway;
use crate::join::ReadySource;
use crate::observable::{Observable, Subscription};
use crate::update::{InitStatus, UpdateKind};

/// The destination catalog, loaded once at startup.
pub struct DestinationsModel {
    gateway: Rc<dyn DestinationsGateway>,
    destinations: RefCell<Vec<Destination>>,
    status: Cell<InitStatus>,
    observable: Observable<()>,
}

impl DestinationsModel {
    #[must_use]
    pub fn new(gateway: Rc<dyn DestinationsGateway>) -> Self {
        Self {
            gateway,
            destinations: RefCell::new(Vec::new()),
            status: Cell::new(InitStatus::Pending),
            observable: Observable::new(),
        }
    }

    /// Load the catalog and announce the outcome. Settles at most once.
    pub async fn init(&self) {
        if self.status.get().is_settled() {
            return;
        }
        match self.gateway.list().await {
            Ok(destinations) => {
                tracing::info!(count = destinations.len(), "destinations loaded");
                *self.destinations.borrow_mut() = destinations;
                self.status.set(InitStatus::Ready);
                self.observable.notify(UpdateKind::Init, &());
            }
            Err(err) => {
                tracing::warn!(error = %err, "destinations failed to load");
                self.status.set(InitStatus::Failed);
                self.observable.notify(UpdateKind::InitFailed, &());
            }
        }
    }

    #[must_use]
    pub fn init_status(&self) -> InitStatus {
        self.status.get()
    }

    #[must_use]
    pub fn destinations(&self) -> Vec<Destination> {
        self.destinations.borrow().clone()
    }

    #[must_use]
    pub fn find(&self, id: &DestinationId) -> Option<Destination> {
        self.destinations
            .borrow()
            .iter()
            .find(|destination| destination.id == *id)
            .cloned()
    }
}

impl ReadySource for DestinationsModel {
    fn init_status(&self) -> InitStatus {
        self.status.get()
    }

    fn observe_kinds(&self, listener: Box<dyn Fn(UpdateKind)>) -> Subscription {
        self.observable.subscribe(move |kind, _| listener(kind))
    }
}

impl std::fmt::Debug for DestinationsModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DestinationsModel")
            .field("status", &self.status.get())
            .field("cached", &self.destinations.borrow().len())
            .finish()
    }
}
