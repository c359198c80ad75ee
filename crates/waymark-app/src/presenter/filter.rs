#![forbid(unsafe_code)]

//! Presenter for the filter bar.
//!
//! Rebuilds the bar whenever the active filter or the waypoint counts
//! change, and disables it for good when the initial load failed. A
//! selection of the already-active filter is dropped here so the board
//! is not rebuilt for nothing.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};

use waymark_core::FilterKind;
use waymark_model::{FilterModel, Subscription, UpdateKind, WaypointsModel};

use crate::stage::{MountPoint, NodeId, Stage};
use crate::view::{FilterBarView, FilterEntry};

pub struct FilterPresenter {
    stage: Rc<Stage>,
    filter: Rc<FilterModel>,
    waypoints: Rc<WaypointsModel>,
    clock: Rc<dyn Fn() -> DateTime<Utc>>,
    enabled: Cell<bool>,
    bar_node: Cell<NodeId>,
    bar_view: RefCell<Rc<FilterBarView>>,
    subscriptions: RefCell<Vec<Subscription>>,
    weak_self: Weak<Self>,
}

impl FilterPresenter {
    /// Mount the bar and keep it in sync with the models.
    pub fn new(
        stage: Rc<Stage>,
        filter: Rc<FilterModel>,
        waypoints: Rc<WaypointsModel>,
        clock: Rc<dyn Fn() -> DateTime<Utc>>,
    ) -> Rc<Self> {
        let presenter = Rc::new_cyclic(|weak_self: &Weak<Self>| {
            let bar = build_bar(&filter, &waypoints, (clock)(), true, weak_self.clone());
            let bar_node = stage.mount_root(MountPoint::Back, bar.clone());
            Self {
                stage,
                filter,
                waypoints,
                clock,
                enabled: Cell::new(true),
                bar_node: Cell::new(bar_node),
                bar_view: RefCell::new(bar),
                subscriptions: RefCell::new(Vec::new()),
                weak_self: weak_self.clone(),
            }
        });

        let mut subscriptions = presenter.subscriptions.borrow_mut();
        let on_filter = presenter.weak_self.clone();
        subscriptions.push(presenter.filter.subscribe(move |_, _| {
            if let Some(p) = on_filter.upgrade() {
                p.render();
            }
        }));
        let on_waypoints = presenter.weak_self.clone();
        subscriptions.push(presenter.waypoints.subscribe(move |_, _| {
            if let Some(p) = on_waypoints.upgrade() {
                p.render();
            }
        }));
        drop(subscriptions);
        presenter
    }

    /// Outcome of the startup barrier: a failed load disables the bar
    /// permanently.
    pub fn init(&self, kind: UpdateKind) {
        if kind == UpdateKind::InitFailed {
            self.enabled.set(false);
        }
        self.render();
    }

    /// Switch to `kind`, skipping a switch to the filter already active.
    pub fn select(&self, kind: FilterKind) {
        if kind == self.filter.current() {
            return;
        }
        self.filter.set_filter(UpdateKind::Major, kind);
    }

    #[must_use]
    pub fn bar(&self) -> Rc<FilterBarView> {
        self.bar_view.borrow().clone()
    }

    fn render(&self) {
        let bar = build_bar(
            &self.filter,
            &self.waypoints,
            (self.clock)(),
            self.enabled.get(),
            self.weak_self.clone(),
        );
        if let Some(node) = self.stage.replace(self.bar_node.get(), bar.clone()) {
            self.bar_node.set(node);
            *self.bar_view.borrow_mut() = bar;
        }
    }
}

impl std::fmt::Debug for FilterPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPresenter")
            .field("enabled", &self.enabled.get())
            .field("current", &self.filter.current())
            .finish()
    }
}

fn build_bar(
    filter: &FilterModel,
    waypoints: &WaypointsModel,
    now: DateTime<Utc>,
    enabled: bool,
    weak: Weak<FilterPresenter>,
) -> Rc<FilterBarView> {
    let cached = waypoints.waypoints();
    let current = filter.current();
    let entries = FilterKind::ALL
        .iter()
        .map(|kind| FilterEntry {
            kind: *kind,
            count: kind.count(&cached, now),
            active: *kind == current,
        })
        .collect();
    Rc::new(FilterBarView::new(
        entries,
        enabled,
        Box::new(move |kind| {
            if let Some(presenter) = weak.upgrade() {
                presenter.select(kind);
            }
        }),
    ))
}
