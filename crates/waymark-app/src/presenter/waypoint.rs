#![forbid(unsafe_code)]

//! Presenter for one itinerary row.
//!
//! Each waypoint gets its own presenter that flips the row between a
//! read-only view and an inline editor, in the same stage slot. The
//! board guarantees at most one editor: `mode_change` runs before this
//! presenter flips to edit mode, and the board uses it to sweep every
//! other row back to view mode.
//!
//! # Invariants
//!
//! 1. Exactly one of row and form is mounted at any time (until
//!    `destroy`).
//! 2. `mode_change` fires while this presenter still reports
//!    `is_editing() == false`.
//! 3. A refused mutation keeps the editor open with an inline error; the
//!    cache was left untouched, so there is nothing to re-render.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use waymark_core::{Offer, Waypoint, WaypointDraft};
use waymark_model::{DestinationsModel, OffersModel, UpdateKind};

use crate::presenter::{DataChange, WaypointChange, service_error_message};
use crate::stage::{MountPoint, NodeId, Stage};
use crate::view::{WaypointFormView, WaypointRowView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    View,
    Edit,
}

pub struct WaypointPresenter {
    stage: Rc<Stage>,
    list_node: NodeId,
    destinations: Rc<DestinationsModel>,
    offers: Rc<OffersModel>,
    data_change: DataChange,
    mode_change: Rc<dyn Fn()>,
    waypoint: RefCell<Waypoint>,
    mode: Cell<Mode>,
    row_node: Cell<Option<NodeId>>,
    form_node: Cell<Option<NodeId>>,
    row_view: RefCell<Option<Rc<WaypointRowView>>>,
    form_view: RefCell<Option<Rc<WaypointFormView>>>,
    weak_self: Weak<Self>,
}

impl WaypointPresenter {
    /// Build the presenter and mount the row at the end of the list.
    pub fn new(
        stage: Rc<Stage>,
        list_node: NodeId,
        destinations: Rc<DestinationsModel>,
        offers: Rc<OffersModel>,
        data_change: DataChange,
        mode_change: Rc<dyn Fn()>,
        waypoint: Waypoint,
    ) -> Rc<Self> {
        let presenter = Rc::new_cyclic(|weak_self| Self {
            stage,
            list_node,
            destinations,
            offers,
            data_change,
            mode_change,
            waypoint: RefCell::new(waypoint.clone()),
            mode: Cell::new(Mode::View),
            row_node: Cell::new(None),
            form_node: Cell::new(None),
            row_view: RefCell::new(None),
            form_view: RefCell::new(None),
            weak_self: weak_self.clone(),
        });
        presenter.init(waypoint);
        presenter
    }

    /// Re-render from `waypoint`, keeping the current mode.
    pub fn init(&self, waypoint: Waypoint) {
        *self.waypoint.borrow_mut() = waypoint;
        match self.mode.get() {
            Mode::View => self.render_row(),
            Mode::Edit => self.render_form(),
        }
    }

    /// Switch to the inline editor. No-op when already editing.
    pub fn open_edit(&self) {
        if self.mode.get() == Mode::Edit {
            return;
        }
        // Board sweep first; this presenter still reports view mode, so
        // its own reset is a no-op.
        (self.mode_change)();
        self.mode.set(Mode::Edit);
        self.render_form();
    }

    /// Discard the editor and show the row again. No-op in view mode.
    pub fn reset_view(&self) {
        if self.mode.get() == Mode::View {
            return;
        }
        self.mode.set(Mode::View);
        self.render_row();
    }

    /// Unmount whatever this presenter has on the stage.
    pub fn destroy(&self) {
        for node in [self.row_node.take(), self.form_node.take()] {
            if let Some(node) = node {
                self.stage.unmount(node);
            }
        }
        self.row_view.borrow_mut().take();
        self.form_view.borrow_mut().take();
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.mode.get() == Mode::Edit
    }

    #[must_use]
    pub fn waypoint(&self) -> Waypoint {
        self.waypoint.borrow().clone()
    }

    #[must_use]
    pub fn row(&self) -> Option<Rc<WaypointRowView>> {
        self.row_view.borrow().clone()
    }

    #[must_use]
    pub fn form(&self) -> Option<Rc<WaypointFormView>> {
        self.form_view.borrow().clone()
    }

    pub fn set_highlighted(&self, highlighted: bool) {
        if let Some(row) = self.row() {
            row.set_highlighted(highlighted);
        }
    }

    // ---- rendering ----

    fn render_row(&self) {
        let row = Rc::new(self.build_row());
        let node = match (self.row_node.get(), self.form_node.take()) {
            (Some(old), _) => self.stage.replace(old, row.clone()),
            (None, Some(form)) => self.stage.replace(form, row.clone()),
            (None, None) => self.stage.mount(self.list_node, MountPoint::Back, row.clone()),
        };
        self.row_node.set(node);
        *self.row_view.borrow_mut() = Some(row);
        self.form_view.borrow_mut().take();
    }

    fn render_form(&self) {
        let form = Rc::new(self.build_form());
        let node = match (self.form_node.get(), self.row_node.take()) {
            (Some(old), _) => self.stage.replace(old, form.clone()),
            (None, Some(row)) => self.stage.replace(row, form.clone()),
            (None, None) => self.stage.mount(self.list_node, MountPoint::Back, form.clone()),
        };
        self.form_node.set(node);
        *self.form_view.borrow_mut() = Some(form);
        self.row_view.borrow_mut().take();
    }

    fn build_row(&self) -> WaypointRowView {
        let waypoint = self.waypoint.borrow().clone();
        let destination_name = self
            .destinations
            .find(&waypoint.destination)
            .map_or_else(|| "?".to_string(), |d| d.name);
        let selected: Vec<Offer> = self
            .offers
            .offers_for(waypoint.kind)
            .into_iter()
            .filter(|offer| waypoint.offers.contains(&offer.id))
            .collect();

        let open = self.weak_self.clone();
        let favorite = self.weak_self.clone();
        WaypointRowView::new(
            waypoint,
            destination_name,
            selected,
            Box::new(move || {
                if let Some(presenter) = open.upgrade() {
                    presenter.open_edit();
                }
            }),
            Box::new(move || {
                if let Some(presenter) = favorite.upgrade() {
                    tokio::task::spawn_local(presenter.toggle_favorite());
                }
            }),
        )
    }

    fn build_form(&self) -> WaypointFormView {
        let draft = WaypointDraft::from_waypoint(&self.waypoint.borrow());
        let submit = self.weak_self.clone();
        let cancel = self.weak_self.clone();
        let delete = self.weak_self.clone();
        WaypointFormView::new(
            draft,
            self.destinations.destinations(),
            self.offers.bundles(),
            Box::new(move |draft| {
                if let Some(presenter) = submit.upgrade() {
                    tokio::task::spawn_local(presenter.submit(draft));
                }
            }),
            Box::new(move || {
                if let Some(presenter) = cancel.upgrade() {
                    presenter.reset_view();
                }
            }),
            Some(Box::new(move || {
                if let Some(presenter) = delete.upgrade() {
                    tokio::task::spawn_local(presenter.delete());
                }
            })),
        )
    }

    // ---- mutations ----

    async fn submit(self: Rc<Self>, draft: WaypointDraft) {
        let Some(form) = self.form() else { return };
        let id = self.waypoint.borrow().id.clone();
        let edited = match draft.build(id) {
            Ok(edited) => edited,
            Err(invalid) => {
                form.set_error(invalid.to_string());
                return;
            }
        };
        form.set_busy(true);
        match (self.data_change)(UpdateKind::Minor, WaypointChange::Update(edited)).await {
            // The board re-renders on minor updates and replaces this
            // presenter, so there is nothing left to do here.
            Ok(()) => {}
            Err(err) => {
                tracing::warn!(error = %err, "waypoint update refused");
                if let Some(form) = self.form() {
                    form.set_busy(false);
                    form.set_error(service_error_message(&err));
                }
            }
        }
    }

    async fn toggle_favorite(self: Rc<Self>) {
        let flipped = {
            let waypoint = self.waypoint.borrow();
            waypoint.with_favorite(!waypoint.is_favorite)
        };
        if let Err(err) =
            (self.data_change)(UpdateKind::Patch, WaypointChange::Update(flipped)).await
        {
            tracing::warn!(error = %err, "favorite toggle refused");
        }
    }

    async fn delete(self: Rc<Self>) {
        let Some(form) = self.form() else { return };
        form.set_busy(true);
        let id = self.waypoint.borrow().id.clone();
        match (self.data_change)(UpdateKind::Minor, WaypointChange::Delete(id)).await {
            Ok(()) => {}
            Err(err) => {
                tracing::warn!(error = %err, "waypoint delete refused");
                if let Some(form) = self.form() {
                    form.set_busy(false);
                    form.set_error(service_error_message(&err));
                }
            }
        }
    }
}

impl std::fmt::Debug for WaypointPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaypointPresenter")
            .field("waypoint", &self.waypoint.borrow().id)
            .field("editing", &self.is_editing())
            .finish()
    }
}
