#![forbid(unsafe_code)]

//! Read-only cache of the offer catalog, grouped per event kind.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use waymark_core::{EventKind, Offer, OfferBundle, offers_for};

use crate::gateway::OffersGateway;
use crate::join::ReadySource;
use crate::observable::{Observable, Subscription};
use crate::update::{InitStatus, UpdateKind};

/// The offer catalog, loaded once at startup.
pub struct OffersModel {
    gateway: Rc<dyn OffersGateway>,
    bundles: RefCell<Vec<OfferBundle>>,
    status: Cell<InitStatus>,
    observable: Observable<()>,
}

impl OffersModel {
    #[must_use]
    pub fn new(gateway: Rc<dyn OffersGateway>) -> Self {
        Self {
            gateway,
            bundles: RefCell::new(Vec::new()),
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
            Ok(bundles) => {
                tracing::info!(kinds = bundles.len(), "offers loaded");
                *self.bundles.borrow_mut() = bundles;
                self.status.set(InitStatus::Ready);
                self.observable.notify(UpdateKind::Init, &());
            }
            Err(err) => {
                tracing::warn!(error = %err, "offers failed to load");
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
    pub fn bundles(&self) -> Vec<OfferBundle> {
        self.bundles.borrow().clone()
    }

    /// Offers valid for `kind`, empty when the catalog has none.
    #[must_use]
    pub fn offers_for(&self, kind: EventKind) -> Vec<Offer> {
        offers_for(&self.bundles.borrow(), kind).to_vec()
    }
}

impl ReadySource for OffersModel {
    fn init_status(&self) -> InitStatus {
        self.status.get()
    }

    fn observe_kinds(&self, listener: Box<dyn Fn(UpdateKind)>) -> Subscription {
        self.observable.subscribe(move |kind, _| listener(kind))
    }
}

impl std::fmt::Debug for OffersModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffersModel")
            .field("status", &self.status.get())
            .field("kinds", &self.bundles.borrow().len())
            .finish()
    }
}
