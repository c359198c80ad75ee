#![forbid(unsafe_code)]

//! Presenter for the trip header.
//!
//! Mounted first so the header owns the top of the screen. It stays
//! blank until the startup barrier reports a successful load, then
//! recomputes the summary on every waypoint change. After a failed load
//! it stays blank for good.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use waymark_core::TripSummary;
use waymark_model::{
    DestinationsModel, OffersModel, Subscription, UpdateKind, WaypointsModel,
};

use crate::stage::{MountPoint, NodeId, Stage};
use crate::view::TripInfoView;

pub struct TripInfoPresenter {
    stage: Rc<Stage>,
    waypoints: Rc<WaypointsModel>,
    destinations: Rc<DestinationsModel>,
    offers: Rc<OffersModel>,
    node: Cell<NodeId>,
    subscriptions: RefCell<Vec<Subscription>>,
    weak_self: Weak<Self>,
}

impl TripInfoPresenter {
    /// Reserve the header slot with an empty view.
    pub fn new(
        stage: Rc<Stage>,
        waypoints: Rc<WaypointsModel>,
        destinations: Rc<DestinationsModel>,
        offers: Rc<OffersModel>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak_self: &Weak<Self>| {
            let node = stage.mount_root(MountPoint::Back, Rc::new(TripInfoView::new(None)));
            Self {
                stage,
                waypoints,
                destinations,
                offers,
                node: Cell::new(node),
                subscriptions: RefCell::new(Vec::new()),
                weak_self: weak_self.clone(),
            }
        })
    }

    /// Outcome of the startup barrier. A successful load renders the
    /// summary and starts tracking waypoint changes; a failed one leaves
    /// the header blank.
    pub fn init(&self, kind: UpdateKind) {
        if kind != UpdateKind::Init {
            return;
        }
        self.render();
        let weak = self.weak_self.clone();
        self.subscriptions
            .borrow_mut()
            .push(self.waypoints.subscribe(move |_, _| {
                if let Some(presenter) = weak.upgrade() {
                    presenter.render();
                }
            }));
    }

    fn render(&self) {
        let summary = TripSummary::compute(
            &self.waypoints.waypoints(),
            &self.destinations.destinations(),
            &self.offers.bundles(),
        );
        let view = Rc::new(TripInfoView::new(summary));
        if let Some(node) = self.stage.replace(self.node.get(), view) {
            self.node.set(node);
        }
    }
}

impl std::fmt::Debug for TripInfoPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripInfoPresenter")
            .field("tracking", &!self.subscriptions.borrow().is_empty())
            .finish()
    }
}
