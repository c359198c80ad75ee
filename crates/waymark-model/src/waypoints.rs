#![forbid(unsafe_code)]

//! The waypoints model: cache, mutations, and change notifications.
//!
//! All mutations are remote-first. The gateway must confirm a change
//! before the cache absorbs it and before any listener hears about it;
//! when the gateway refuses, the cache is left exactly as it was and no
//! notification goes out. The caller picks the [`UpdateKind`] because only
//! it knows how far the change should ripple through the UI.
//!
//! # Invariants
//!
//! 1. The cache only ever holds service-confirmed waypoints.
//! 2. A failed mutation changes nothing and notifies nobody.
//! 3. `init` settles [`InitStatus`] exactly once and announces the outcome
//!    with [`UpdateKind::Init`] or [`UpdateKind::InitFailed`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thiserror::Error;

use waymark_core::{NewWaypoint, Waypoint, WaypointId};

use crate::gateway::{GatewayError, WaypointsGateway};
use crate::join::ReadySource;
use crate::observable::{Observable, Subscription};
use crate::update::{InitStatus, UpdateKind};

/// Why a model mutation did not go through.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// The waypoint is not in the cache, so there is nothing to mutate.
    #[error("waypoint {id} is not part of the current itinerary")]
    UnknownWaypoint { id: WaypointId },
}

/// Cached view of the remote waypoint collection.
///
/// Notification payloads carry the confirmed waypoint for updates and
/// creates, and nothing for init and delete.
pub struct WaypointsModel {
    gateway: Rc<dyn WaypointsGateway>,
    waypoints: RefCell<Vec<Waypoint>>,
    status: Cell<InitStatus>,
    observable: Observable<Option<Waypoint>>,
}

impl WaypointsModel {
    #[must_use]
    pub fn new(gateway: Rc<dyn WaypointsGateway>) -> Self {
        Self {
            gateway,
            waypoints: RefCell::new(Vec::new()),
            status: Cell::new(InitStatus::Pending),
            observable: Observable::new(),
        }
    }

    /// Load the collection from the service and announce the outcome.
    ///
    /// Settles at most once; calling again after the first settle is a
    /// no-op.
    pub async fn init(&self) {
        if self.status.get().is_settled() {
            tracing::debug!("waypoints init called after settling; ignored");
            return;
        }
        match self.gateway.list().await {
            Ok(waypoints) => {
                tracing::info!(count = waypoints.len(), "waypoints loaded");
                *self.waypoints.borrow_mut() = waypoints;
                self.status.set(InitStatus::Ready);
                self.observable.notify(UpdateKind::Init, &None);
            }
            Err(err) => {
                tracing::warn!(error = %err, "waypoints failed to load");
                self.status.set(InitStatus::Failed);
                self.observable.notify(UpdateKind::InitFailed, &None);
            }
        }
    }

    #[must_use]
    pub fn init_status(&self) -> InitStatus {
        self.status.get()
    }

    /// Snapshot of the cached collection.
    #[must_use]
    pub fn waypoints(&self) -> Vec<Waypoint> {
        self.waypoints.borrow().clone()
    }

    #[must_use]
    pub fn find(&self, id: &WaypointId) -> Option<Waypoint> {
        self.waypoints
            .borrow()
            .iter()
            .find(|wp| wp.id == *id)
            .cloned()
    }

    #[must_use = "dropping the subscription immediately unsubscribes the listener"]
    pub fn subscribe(
        &self,
        listener: impl Fn(UpdateKind, &Option<Waypoint>) + 'static,
    ) -> Subscription {
        self.observable.subscribe(listener)
    }

    /// Replace an existing waypoint with `waypoint`, service-first.
    ///
    /// Fails fast with [`ModelError::UnknownWaypoint`] before touching the
    /// network when the id is not cached.
    pub async fn update_waypoint(
        &self,
        kind: UpdateKind,
        waypoint: &Waypoint,
    ) -> Result<Waypoint, ModelError> {
        if self.find(&waypoint.id).is_none() {
            return Err(ModelError::UnknownWaypoint {
                id: waypoint.id.clone(),
            });
        }

        let confirmed = self.gateway.update(waypoint).await?;
        {
            let mut cache = self.waypoints.borrow_mut();
            if let Some(slot) = cache.iter_mut().find(|wp| wp.id == confirmed.id) {
                *slot = confirmed.clone();
            }
        }
        self.observable.notify(kind, &Some(confirmed.clone()));
        Ok(confirmed)
    }

    /// Create a waypoint on the service and prepend the confirmed copy.
    pub async fn add_waypoint(
        &self,
        kind: UpdateKind,
        waypoint: &NewWaypoint,
    ) -> Result<Waypoint, ModelError> {
        let created = self.gateway.create(waypoint).await?;
        self.waypoints.borrow_mut().insert(0, created.clone());
        self.observable.notify(kind, &Some(created.clone()));
        Ok(created)
    }

    /// Delete a waypoint on the service, then drop it from the cache.
    ///
    /// Fails fast with [`ModelError::UnknownWaypoint`] before touching the
    /// network when the id is not cached.
    pub async fn delete_waypoint(&self, kind: UpdateKind, id: &WaypointId) -> Result<(), ModelError> {
        if self.find(id).is_none() {
            return Err(ModelError::UnknownWaypoint { id: id.clone() });
        }

        self.gateway.delete(id).await?;
        self.waypoints.borrow_mut().retain(|wp| wp.id != *id);
        self.observable.notify(kind, &None);
        Ok(())
    }
}

impl ReadySource for WaypointsModel {
    fn init_status(&self) -> InitStatus {
        self.status.get()
    }

    fn observe_kinds(&self, listener: Box<dyn Fn(UpdateKind)>) -> Subscription {
        self.observable.subscribe(move |kind, _| listener(kind))
    }
}

impl std::fmt::Debug for WaypointsModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaypointsModel")
            .field("status", &self.status.get())
            .field("cached", &self.waypoints.borrow().len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubWaypoints, sample_route, waypoint_at};
    use chrono::{TimeZone, Utc};

    fn recording_model(
        stub: Rc<StubWaypoints>,
    ) -> (WaypointsModel, Rc<RefCell<Vec<(UpdateKind, Option<WaypointId>)>>>, Subscription) {
        let model = WaypointsModel::new(stub);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = model.subscribe(move |kind, payload: &Option<Waypoint>| {
            sink.borrow_mut()
                .push((kind, payload.as_ref().map(|wp| wp.id.clone())));
        });
        (model, seen, sub)
    }

    #[tokio::test]
    async fn init_caches_the_list_and_announces_init() {
        let stub = Rc::new(StubWaypoints::new(sample_route()));
        let (model, seen, _sub) = recording_model(stub);

        model.init().await;

        assert_eq!(model.init_status(), InitStatus::Ready);
        assert_eq!(model.waypoints().len(), 3);
        assert_eq!(*seen.borrow(), vec![(UpdateKind::Init, None)]);
    }

    #[tokio::test]
    async fn failed_init_settles_failed_with_an_empty_cache() {
        let stub = Rc::new(StubWaypoints::new(sample_route()));
        stub.fail_list.set(true);
        let (model, seen, _sub) = recording_model(stub);

        model.init().await;

        assert_eq!(model.init_status(), InitStatus::Failed);
        assert!(model.waypoints().is_empty());
        assert_eq!(*seen.borrow(), vec![(UpdateKind::InitFailed, None)]);
    }

    #[tokio::test]
    async fn init_settles_only_once() {
        let stub = Rc::new(StubWaypoints::new(sample_route()));
        let (model, seen, _sub) = recording_model(Rc::clone(&stub));

        model.init().await;
        model.init().await;

        assert_eq!(seen.borrow().len(), 1, "second init must be a no-op");
        assert_eq!(stub.calls.get(), 1);
    }

    #[tokio::test]
    async fn update_replaces_the_cached_copy_and_forwards_the_kind() {
        let stub = Rc::new(StubWaypoints::new(sample_route()));
        let (model, seen, _sub) = recording_model(stub);
        model.init().await;

        let mut edited = model.waypoints().remove(0);
        edited.base_price = 999;
        let confirmed = model
            .update_waypoint(UpdateKind::Patch, &edited)
            .await
            .unwrap();

        assert_eq!(confirmed.base_price, 999);
        assert_eq!(model.find(&edited.id).unwrap().base_price, 999);
        assert_eq!(
            seen.borrow().last().unwrap(),
            &(UpdateKind::Patch, Some(edited.id))
        );
    }

    #[tokio::test]
    async fn update_of_unknown_id_fails_before_the_gateway() {
        let stub = Rc::new(StubWaypoints::new(sample_route()));
        let (model, seen, _sub) = recording_model(Rc::clone(&stub));
        model.init().await;
        let calls_after_init = stub.calls.get();

        let ghost = waypoint_at(
            "ghost",
            Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap(),
        );
        let err = model
            .update_waypoint(UpdateKind::Minor, &ghost)
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::UnknownWaypoint { .. }));
        assert_eq!(stub.calls.get(), calls_after_init, "no network call expected");
        assert_eq!(seen.borrow().len(), 1, "only the init notification");
    }

    #[tokio::test]
    async fn rejected_update_leaves_the_cache_untouched_and_silent() {
        let stub = Rc::new(StubWaypoints::new(sample_route()));
        let (model, seen, _sub) = recording_model(Rc::clone(&stub));
        model.init().await;

        stub.fail_update.set(true);
        let mut edited = model.waypoints().remove(0);
        let original_price = edited.base_price;
        edited.base_price = 999;

        let err = model
            .update_waypoint(UpdateKind::Minor, &edited)
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::Gateway(_)));
        assert_eq!(model.find(&edited.id).unwrap().base_price, original_price);
        assert_eq!(seen.borrow().len(), 1, "no notification after a rejection");
    }

    #[tokio::test]
    async fn add_prepends_the_confirmed_waypoint() {
        let stub = Rc::new(StubWaypoints::new(sample_route()));
        let (model, seen, _sub) = recording_model(stub);
        model.init().await;

        let draft = waypoint_at(
            "ignored",
            Utc.with_ymd_and_hms(2026, 9, 2, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 9, 2, 9, 0, 0).unwrap(),
        );
        let new = NewWaypoint {
            kind: draft.kind,
            destination: draft.destination.clone(),
            date_from: draft.date_from,
            date_to: draft.date_to,
            base_price: 42,
            offers: Vec::new(),
            is_favorite: false,
        };
        let created = model.add_waypoint(UpdateKind::Minor, &new).await.unwrap();

        assert_eq!(model.waypoints()[0].id, created.id);
        assert_eq!(model.waypoints().len(), 4);
        assert_eq!(
            seen.borrow().last().unwrap(),
            &(UpdateKind::Minor, Some(created.id))
        );
    }

    #[tokio::test]
    async fn rejected_create_changes_nothing_and_stays_silent() {
        let stub = Rc::new(StubWaypoints::new(sample_route()));
        let (model, seen, _sub) = recording_model(Rc::clone(&stub));
        model.init().await;

        stub.fail_create.set(true);
        let new = NewWaypoint {
            kind: waymark_core::EventKind::Taxi,
            destination: waymark_core::DestinationId::new("ams"),
            date_from: Utc.with_ymd_and_hms(2026, 9, 2, 8, 0, 0).unwrap(),
            date_to: Utc.with_ymd_and_hms(2026, 9, 2, 9, 0, 0).unwrap(),
            base_price: 42,
            offers: Vec::new(),
            is_favorite: false,
        };
        let err = model.add_waypoint(UpdateKind::Minor, &new).await.unwrap_err();

        assert!(matches!(err, ModelError::Gateway(_)));
        assert_eq!(model.waypoints().len(), 3, "cache must be unchanged");
        assert_eq!(seen.borrow().len(), 1, "no notification after a rejection");
    }

    #[tokio::test]
    async fn delete_drops_the_waypoint_and_notifies_without_payload() {
        let stub = Rc::new(StubWaypoints::new(sample_route()));
        let (model, seen, _sub) = recording_model(stub);
        model.init().await;

        let doomed = model.waypoints()[1].id.clone();
        model
            .delete_waypoint(UpdateKind::Minor, &doomed)
            .await
            .unwrap();

        assert_eq!(model.waypoints().len(), 2);
        assert!(model.find(&doomed).is_none());
        assert_eq!(seen.borrow().last().unwrap(), &(UpdateKind::Minor, None));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_fails_before_the_gateway() {
        let stub = Rc::new(StubWaypoints::new(sample_route()));
        let (model, _seen, _sub) = recording_model(Rc::clone(&stub));
        model.init().await;
        let calls_after_init = stub.calls.get();

        let err = model
            .delete_waypoint(UpdateKind::Minor, &WaypointId::new("ghost"))
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::UnknownWaypoint { .. }));
        assert_eq!(stub.calls.get(), calls_after_init);
    }
}
