#![forbid(unsafe_code)]

//! The board presenter: owns the list, its rows, and the create editor.
//!
//! Subscribes to every model and decides how far each change ripples:
//! a patch re-renders just the touched row, anything bigger rebuilds the
//! whole list. All mutations from rows and editors funnel through the
//! [`DataChange`] channel this presenter builds over the waypoints
//! model.
//!
//! # Invariants
//!
//! 1. At most one editor is open across the board: opening a row editor
//!    sweeps every other row back to view mode and closes the create
//!    editor; opening the create editor happens through a full rebuild.
//! 2. Row order on the stage is the filtered, date-sorted order.
//! 3. The create editor's `on_close` runs exactly once however the
//!    editor closes.
//!
//! # Failure Modes
//!
//! When any catalog load fails the board shows a single failure line
//! and never renders rows; the filter bar and new-event button stay
//! disabled through their own init barriers.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use waymark_core::{FilterKind, Waypoint, WaypointId};
use waymark_model::{
    DestinationsModel, FilterModel, InitStatus, OffersModel, ReadySource, Subscription,
    UpdateKind, WaypointsModel,
};

use crate::presenter::{DataChange, NewWaypointPresenter, WaypointChange, WaypointPresenter};
use crate::stage::{MountPoint, NodeId, Stage};
use crate::view::{ListMessageView, ListView, WaypointFormView};

const FAILED_MESSAGE: &str = "Failed to load latest route information";
const LOADING_MESSAGE: &str = "Loading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoardState {
    Loading,
    Failed,
    Ready,
}

pub struct TripEventsPresenter {
    stage: Rc<Stage>,
    list_node: NodeId,
    waypoints: Rc<WaypointsModel>,
    destinations: Rc<DestinationsModel>,
    offers: Rc<OffersModel>,
    filter: Rc<FilterModel>,
    clock: Rc<dyn Fn() -> DateTime<Utc>>,
    data_change: DataChange,
    mode_change: Rc<dyn Fn()>,
    on_editor_closed: Rc<dyn Fn()>,
    rows: RefCell<IndexMap<WaypointId, Rc<WaypointPresenter>>>,
    editor: RefCell<Option<Rc<NewWaypointPresenter>>>,
    message_node: Cell<Option<NodeId>>,
    subscriptions: RefCell<Vec<Subscription>>,
    weak_self: Weak<Self>,
}

impl TripEventsPresenter {
    /// Mount the list container and render the initial board state.
    pub fn new(
        stage: Rc<Stage>,
        waypoints: Rc<WaypointsModel>,
        destinations: Rc<DestinationsModel>,
        offers: Rc<OffersModel>,
        filter: Rc<FilterModel>,
        clock: Rc<dyn Fn() -> DateTime<Utc>>,
        on_editor_closed: Rc<dyn Fn()>,
    ) -> Rc<Self> {
        let list_node = stage.mount_root(MountPoint::Back, Rc::new(ListView::new()));
        let data_change = build_data_change(Rc::clone(&waypoints));

        let presenter = Rc::new_cyclic(|weak_self: &Weak<Self>| {
            let sweep = weak_self.clone();
            Self {
                stage,
                list_node,
                waypoints,
                destinations,
                offers,
                filter,
                clock,
                data_change,
                mode_change: Rc::new(move || {
                    if let Some(board) = sweep.upgrade() {
                        board.handle_mode_change();
                    }
                }),
                on_editor_closed,
                rows: RefCell::new(IndexMap::new()),
                editor: RefCell::new(None),
                message_node: Cell::new(None),
                subscriptions: RefCell::new(Vec::new()),
                weak_self: weak_self.clone(),
            }
        });
        presenter.wire_subscriptions();
        presenter.render_board();
        presenter
    }

    fn wire_subscriptions(&self) {
        let mut subscriptions = self.subscriptions.borrow_mut();

        let on_waypoints = self.weak_self.clone();
        subscriptions.push(self.waypoints.subscribe(
            move |kind, payload: &Option<Waypoint>| {
                let Some(board) = on_waypoints.upgrade() else {
                    return;
                };
                match (kind, payload) {
                    (UpdateKind::Patch, Some(waypoint)) => board.patch_row(waypoint),
                    _ => board.rebuild(),
                }
            },
        ));

        // Catalogs only ever announce their init outcome; either way the
        // board re-renders with whatever names and offers resolved.
        let on_destinations = self.weak_self.clone();
        subscriptions.push(self.destinations.observe_kinds(Box::new(move |_| {
            if let Some(board) = on_destinations.upgrade() {
                board.rebuild();
            }
        })));
        let on_offers = self.weak_self.clone();
        subscriptions.push(self.offers.observe_kinds(Box::new(move |_| {
            if let Some(board) = on_offers.upgrade() {
                board.rebuild();
            }
        })));

        let on_filter = self.weak_self.clone();
        subscriptions.push(self.filter.subscribe(move |_, _| {
            if let Some(board) = on_filter.upgrade() {
                board.rebuild();
            }
        }));
    }

    /// Re-render one row in place after a patch-scope change.
    fn patch_row(&self, waypoint: &Waypoint) {
        let row = self.rows.borrow().get(&waypoint.id).cloned();
        if let Some(row) = row {
            row.init(waypoint.clone());
        }
    }

    /// Tear everything down and render from model state.
    pub fn rebuild(&self) {
        self.close_editor();
        self.clear();
        self.render_board();
    }

    fn clear(&self) {
        let drained: Vec<(WaypointId, Rc<WaypointPresenter>)> =
            self.rows.borrow_mut().drain(..).collect();
        for (_, row) in drained {
            row.destroy();
        }
        if let Some(node) = self.message_node.take() {
            self.stage.unmount(node);
        }
    }

    fn render_board(&self) {
        match self.board_state() {
            BoardState::Loading => self.show_message(LOADING_MESSAGE),
            BoardState::Failed => self.show_message(FAILED_MESSAGE),
            BoardState::Ready => {
                let now = (self.clock)();
                let filter = self.filter.current();
                let visible = filter.select(&self.waypoints.waypoints(), now);
                if visible.is_empty() {
                    self.show_message(filter.empty_message());
                    return;
                }
                let mut built = Vec::with_capacity(visible.len());
                for waypoint in visible {
                    let id = waypoint.id.clone();
                    let row = WaypointPresenter::new(
                        Rc::clone(&self.stage),
                        self.list_node,
                        Rc::clone(&self.destinations),
                        Rc::clone(&self.offers),
                        Rc::clone(&self.data_change),
                        Rc::clone(&self.mode_change),
                        waypoint,
                    );
                    built.push((id, row));
                }
                self.rows.borrow_mut().extend(built);
            }
        }
    }

    fn board_state(&self) -> BoardState {
        let statuses = [
            self.waypoints.init_status(),
            self.destinations.init_status(),
            self.offers.init_status(),
        ];
        if statuses.contains(&InitStatus::Failed) {
            BoardState::Failed
        } else if statuses.contains(&InitStatus::Pending) {
            BoardState::Loading
        } else {
            BoardState::Ready
        }
    }

    fn show_message(&self, text: &str) {
        let node = self.stage.mount(
            self.list_node,
            MountPoint::Back,
            Rc::new(ListMessageView::new(text)),
        );
        self.message_node.set(node);
    }

    /// Open the create editor, first resetting the filter so the new
    /// event will be visible wherever it lands.
    pub fn create_new_waypoint(&self) {
        self.filter.set_filter(UpdateKind::Minor, FilterKind::All);
        self.open_editor();
    }

    fn open_editor(&self) {
        if self.editor.borrow().is_some() {
            return;
        }
        let weak = self.weak_self.clone();
        let external = Rc::clone(&self.on_editor_closed);
        let on_close = Rc::new(move || {
            if let Some(board) = weak.upgrade() {
                board.editor.borrow_mut().take();
            }
            external();
        });
        let editor = NewWaypointPresenter::new(
            Rc::clone(&self.stage),
            self.list_node,
            &self.destinations,
            &self.offers,
            Rc::clone(&self.data_change),
            on_close,
            (self.clock)(),
        );
        *self.editor.borrow_mut() = Some(editor);
    }

    fn close_editor(&self) {
        let editor = self.editor.borrow().clone();
        if let Some(editor) = editor {
            editor.destroy();
        }
    }

    /// Sweep every open editor closed before another row flips to edit.
    fn handle_mode_change(&self) {
        self.close_editor();
        let rows: Vec<Rc<WaypointPresenter>> = self.rows.borrow().values().cloned().collect();
        for row in rows {
            row.reset_view();
        }
    }

    /// The form currently accepting input, if any: the create editor
    /// first, else the editing row's form.
    #[must_use]
    pub fn active_form(&self) -> Option<Rc<WaypointFormView>> {
        if let Some(editor) = self.editor.borrow().as_ref() {
            return editor.form();
        }
        self.rows
            .borrow()
            .values()
            .find(|row| row.is_editing())
            .and_then(|row| row.form())
    }

    /// Close whatever editor is open. Returns whether the key was
    /// consumed. Routed through the form so a busy save blocks it.
    pub fn handle_escape(&self) -> bool {
        match self.active_form() {
            Some(form) => {
                form.cancel();
                true
            }
            None => false,
        }
    }

    /// The row presenters in render order.
    #[must_use]
    pub fn visible(&self) -> Vec<Rc<WaypointPresenter>> {
        self.rows.borrow().values().cloned().collect()
    }
}

impl std::fmt::Debug for TripEventsPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripEventsPresenter")
            .field("rows", &self.rows.borrow().len())
            .field("editor_open", &self.editor.borrow().is_some())
            .finish()
    }
}

fn build_data_change(waypoints: Rc<WaypointsModel>) -> DataChange {
    Rc::new(move |kind, change| {
        let waypoints = Rc::clone(&waypoints);
        Box::pin(async move {
            match change {
                WaypointChange::Update(waypoint) => waypoints
                    .update_waypoint(kind, &waypoint)
                    .await
                    .map(|_| ()),
                WaypointChange::Create(new) => {
                    waypoints.add_waypoint(kind, &new).await.map(|_| ())
                }
                WaypointChange::Delete(id) => waypoints.delete_waypoint(kind, &id).await,
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_model::testing::{
        StubDestinations, StubOffers, StubWaypoints, sample_bundles, sample_destinations,
        sample_now, sample_route,
    };

    struct Fixture {
        stage: Rc<Stage>,
        waypoints: Rc<WaypointsModel>,
        destinations: Rc<DestinationsModel>,
        offers: Rc<OffersModel>,
        filter: Rc<FilterModel>,
        board: Rc<TripEventsPresenter>,
    }

    fn fixture() -> Fixture {
        let stage = Rc::new(Stage::new());
        let waypoints = Rc::new(WaypointsModel::new(Rc::new(StubWaypoints::new(
            sample_route(),
        ))));
        let destinations = Rc::new(DestinationsModel::new(Rc::new(StubDestinations::new(
            sample_destinations(),
        ))));
        let offers = Rc::new(OffersModel::new(Rc::new(StubOffers::new(sample_bundles()))));
        let filter = Rc::new(FilterModel::new());
        let board = TripEventsPresenter::new(
            Rc::clone(&stage),
            Rc::clone(&waypoints),
            Rc::clone(&destinations),
            Rc::clone(&offers),
            Rc::clone(&filter),
            Rc::new(sample_now),
            Rc::new(|| {}),
        );
        Fixture {
            stage,
            waypoints,
            destinations,
            offers,
            filter,
            board,
        }
    }

    async fn ready_fixture() -> Fixture {
        let fx = fixture();
        fx.waypoints.init().await;
        fx.destinations.init().await;
        fx.offers.init().await;
        fx
    }

    #[tokio::test]
    async fn shows_loading_until_every_model_settles() {
        let fx = fixture();
        assert!(fx.stage.render().contains(LOADING_MESSAGE));

        fx.waypoints.init().await;
        assert!(
            fx.stage.render().contains(LOADING_MESSAGE),
            "catalogs still pending"
        );

        fx.destinations.init().await;
        fx.offers.init().await;
        assert!(!fx.stage.render().contains(LOADING_MESSAGE));
        assert_eq!(fx.board.visible().len(), 3);
    }

    #[tokio::test]
    async fn any_failed_catalog_means_a_failure_board() {
        let failing = Rc::new(StubDestinations::new(sample_destinations()));
        failing.fail_list.set(true);
        let destinations = Rc::new(DestinationsModel::new(failing));

        let stage = Rc::new(Stage::new());
        let waypoints = Rc::new(WaypointsModel::new(Rc::new(StubWaypoints::new(
            sample_route(),
        ))));
        let offers = Rc::new(OffersModel::new(Rc::new(StubOffers::new(sample_bundles()))));
        let board = TripEventsPresenter::new(
            Rc::clone(&stage),
            Rc::clone(&waypoints),
            Rc::clone(&destinations),
            Rc::clone(&offers),
            Rc::new(FilterModel::new()),
            Rc::new(sample_now),
            Rc::new(|| {}),
        );

        waypoints.init().await;
        destinations.init().await;
        offers.init().await;

        assert!(stage.render().contains(FAILED_MESSAGE));
        assert!(board.visible().is_empty());
    }

    #[tokio::test]
    async fn rows_come_out_in_date_order() {
        let fx = ready_fixture().await;
        let ids: Vec<String> = fx
            .board
            .visible()
            .iter()
            .map(|row| row.waypoint().id.to_string())
            .collect();
        assert_eq!(ids, ["wp-taxi", "wp-flight", "wp-drive"]);
    }

    #[tokio::test]
    async fn patch_reinits_the_row_without_a_rebuild() {
        let fx = ready_fixture().await;
        let before = fx.board.visible();

        let mut flipped = fx.waypoints.find(&WaypointId::new("wp-flight")).unwrap();
        flipped.is_favorite = true;
        fx.waypoints
            .update_waypoint(UpdateKind::Patch, &flipped)
            .await
            .unwrap();

        let after = fx.board.visible();
        assert_eq!(after.len(), 3);
        for (a, b) in before.iter().zip(after.iter()) {
            assert!(Rc::ptr_eq(a, b), "patch must keep the same presenters");
        }
        assert!(fx.stage.render().contains('★'));
    }

    #[tokio::test]
    async fn switching_filters_rebuilds_the_visible_set() {
        let fx = ready_fixture().await;
        fx.filter.set_filter(UpdateKind::Major, FilterKind::Past);

        let ids: Vec<String> = fx
            .board
            .visible()
            .iter()
            .map(|row| row.waypoint().id.to_string())
            .collect();
        assert_eq!(ids, ["wp-taxi"]);
    }

    #[tokio::test]
    async fn empty_filter_shows_its_message() {
        let fx = ready_fixture().await;
        fx.filter.set_filter(UpdateKind::Major, FilterKind::Present);
        // Only the flight is present at sample_now, so narrow further by
        // deleting it.
        fx.waypoints
            .delete_waypoint(UpdateKind::Minor, &WaypointId::new("wp-flight"))
            .await
            .unwrap();

        assert!(fx.board.visible().is_empty());
        assert!(fx.stage.render().contains("There are no present events now"));
    }

    #[tokio::test]
    async fn opening_one_editor_sweeps_the_others() {
        let fx = ready_fixture().await;
        let rows = fx.board.visible();
        rows[0].row().unwrap().open();
        assert!(rows[0].is_editing());

        rows[2].row().unwrap().open();
        assert!(!rows[0].is_editing(), "first editor must be swept closed");
        assert!(rows[2].is_editing());
        assert!(fx.board.active_form().is_some());
    }

    #[tokio::test]
    async fn create_new_waypoint_resets_the_filter_and_opens_the_editor() {
        let fx = ready_fixture().await;
        fx.filter.set_filter(UpdateKind::Major, FilterKind::Past);
        assert_eq!(fx.board.visible().len(), 1);

        fx.board.create_new_waypoint();

        assert_eq!(fx.filter.current(), FilterKind::All);
        assert_eq!(fx.board.visible().len(), 3, "filter reset restores rows");
        let form = fx.board.active_form().unwrap();
        assert!(form.error().is_none());
        let first_line = &fx.stage.render_lines()[0];
        assert!(first_line.contains("New event"), "{first_line}");
    }

    #[tokio::test]
    async fn escape_closes_the_open_editor_only() {
        let fx = ready_fixture().await;
        assert!(!fx.board.handle_escape(), "nothing open yet");

        let rows = fx.board.visible();
        rows[1].row().unwrap().open();
        assert!(fx.board.handle_escape());
        assert!(!rows[1].is_editing());
        assert!(fx.board.active_form().is_none());
    }
}
