#![forbid(unsafe_code)]

//! Presenter for the "new event" editor.
//!
//! Opens a create form at the top of the list and lives until the form
//! is cancelled, the create is confirmed, or the board tears it down.
//! `on_close` fires exactly once, whichever way the editor goes away;
//! the app uses it to re-enable the new-event button.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};

use waymark_core::WaypointDraft;
use waymark_model::{DestinationsModel, OffersModel, UpdateKind};

use crate::presenter::{DataChange, WaypointChange, service_error_message};
use crate::stage::{MountPoint, NodeId, Stage};
use crate::view::WaypointFormView;

pub struct NewWaypointPresenter {
    stage: Rc<Stage>,
    data_change: DataChange,
    on_close: Rc<dyn Fn()>,
    form_node: Cell<Option<NodeId>>,
    form_view: RefCell<Option<Rc<WaypointFormView>>>,
    weak_self: Weak<Self>,
}

impl NewWaypointPresenter {
    /// Build the presenter and mount a blank create form at the front of
    /// the list.
    pub fn new(
        stage: Rc<Stage>,
        list_node: NodeId,
        destinations: &DestinationsModel,
        offers: &OffersModel,
        data_change: DataChange,
        on_close: Rc<dyn Fn()>,
        now: DateTime<Utc>,
    ) -> Rc<Self> {
        let presenter = Rc::new_cyclic(|weak_self: &Weak<Self>| {
            let submit = weak_self.clone();
            let cancel = weak_self.clone();
            let form = Rc::new(WaypointFormView::new(
                WaypointDraft::blank(now),
                destinations.destinations(),
                offers.bundles(),
                Box::new(move |draft| {
                    if let Some(presenter) = submit.upgrade() {
                        tokio::task::spawn_local(presenter.submit(draft));
                    }
                }),
                Box::new(move || {
                    if let Some(presenter) = cancel.upgrade() {
                        presenter.destroy();
                    }
                }),
                None,
            ));
            Self {
                stage,
                data_change,
                on_close,
                form_node: Cell::new(None),
                form_view: RefCell::new(Some(form)),
                weak_self: weak_self.clone(),
            }
        });
        if let Some(form) = presenter.form() {
            let node = presenter.stage.mount(list_node, MountPoint::Front, form);
            presenter.form_node.set(node);
        }
        presenter
    }

    #[must_use]
    pub fn form(&self) -> Option<Rc<WaypointFormView>> {
        self.form_view.borrow().clone()
    }

    /// Tear the editor down. Idempotent; `on_close` fires on the first
    /// call only.
    pub fn destroy(&self) {
        let Some(node) = self.form_node.take() else {
            return;
        };
        self.stage.unmount(node);
        self.form_view.borrow_mut().take();
        (self.on_close)();
    }

    async fn submit(self: Rc<Self>, draft: WaypointDraft) {
        let Some(form) = self.form() else { return };
        let new = match draft.validate() {
            Ok(new) => new,
            Err(invalid) => {
                form.set_error(invalid.to_string());
                return;
            }
        };
        form.set_busy(true);
        match (self.data_change)(UpdateKind::Minor, WaypointChange::Create(new)).await {
            // The board re-renders on minor updates and closes this
            // editor on the way.
            Ok(()) => {}
            Err(err) => {
                tracing::warn!(error = %err, "waypoint create refused");
                if let Some(form) = self.form() {
                    form.set_busy(false);
                    form.set_error(service_error_message(&err));
                }
            }
        }
    }
}

impl std::fmt::Debug for NewWaypointPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewWaypointPresenter")
            .field("open", &self.form_node.get().is_some())
            .finish()
    }
}
