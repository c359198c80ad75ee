#![forbid(unsafe_code)]

//! Stub gateways and fixtures for model and presenter tests.
//!
//! The stubs act as an in-memory itinerary service: reads return the
//! stored state, writes mutate it, and each `fail_*` flag turns the next
//! matching call into a status-500 rejection. `calls` counts every
//! gateway invocation, which lets tests assert that fail-fast paths never
//! reach the network.

use std::cell::{Cell, RefCell};

use chrono::{DateTime, TimeZone, Utc};
use futures::future::LocalBoxFuture;

use waymark_core::{
    Destination, DestinationId, EventKind, NewWaypoint, Offer, OfferBundle, OfferId, Picture,
    Waypoint, WaypointId,
};

use crate::gateway::{
    DestinationsGateway, GatewayError, GatewayResult, OffersGateway, WaypointsGateway,
};

// ---------------------------------------------------------------------------
// Stub gateways
// ---------------------------------------------------------------------------

/// In-memory [`WaypointsGateway`].
pub struct StubWaypoints {
    store: RefCell<Vec<Waypoint>>,
    next_id: Cell<u32>,
    pub calls: Cell<u32>,
    pub fail_list: Cell<bool>,
    pub fail_create: Cell<bool>,
    pub fail_update: Cell<bool>,
    pub fail_delete: Cell<bool>,
}

impl StubWaypoints {
    #[must_use]
    pub fn new(initial: Vec<Waypoint>) -> Self {
        Self {
            store: RefCell::new(initial),
            next_id: Cell::new(1),
            calls: Cell::new(0),
            fail_list: Cell::new(false),
            fail_create: Cell::new(false),
            fail_update: Cell::new(false),
            fail_delete: Cell::new(false),
        }
    }

    /// What the stub service currently holds.
    #[must_use]
    pub fn stored(&self) -> Vec<Waypoint> {
        self.store.borrow().clone()
    }

    fn rejected<T>(&self) -> GatewayResult<T> {
        Err(GatewayError::Status { status: 500 })
    }
}

impl WaypointsGateway for StubWaypoints {
    fn list(&self) -> LocalBoxFuture<'_, GatewayResult<Vec<Waypoint>>> {
        self.calls.set(self.calls.get() + 1);
        let result = if self.fail_list.get() {
            self.rejected()
        } else {
            Ok(self.store.borrow().clone())
        };
        Box::pin(async move { result })
    }

    fn create<'a>(
        &'a self,
        waypoint: &'a NewWaypoint,
    ) -> LocalBoxFuture<'a, GatewayResult<Waypoint>> {
        self.calls.set(self.calls.get() + 1);
        let result = if self.fail_create.get() {
            self.rejected()
        } else {
            let id = self.next_id.get();
            self.next_id.set(id + 1);
            let created = Waypoint {
                id: WaypointId::new(format!("wp-{id}")),
                kind: waypoint.kind,
                destination: waypoint.destination.clone(),
                date_from: waypoint.date_from,
                date_to: waypoint.date_to,
                base_price: waypoint.base_price,
                offers: waypoint.offers.clone(),
                is_favorite: waypoint.is_favorite,
            };
            self.store.borrow_mut().push(created.clone());
            Ok(created)
        };
        Box::pin(async move { result })
    }

    fn update<'a>(&'a self, waypoint: &'a Waypoint) -> LocalBoxFuture<'a, GatewayResult<Waypoint>> {
        self.calls.set(self.calls.get() + 1);
        let result = if self.fail_update.get() {
            self.rejected()
        } else if let Some(slot) = self
            .store
            .borrow_mut()
            .iter_mut()
            .find(|stored| stored.id == waypoint.id)
        {
            *slot = waypoint.clone();
            Ok(waypoint.clone())
        } else {
            Err(GatewayError::Status { status: 404 })
        };
        Box::pin(async move { result })
    }

    fn delete<'a>(&'a self, id: &'a WaypointId) -> LocalBoxFuture<'a, GatewayResult<()>> {
        self.calls.set(self.calls.get() + 1);
        let result = if self.fail_delete.get() {
            self.rejected()
        } else {
            self.store.borrow_mut().retain(|stored| stored.id != *id);
            Ok(())
        };
        Box::pin(async move { result })
    }
}

/// In-memory [`DestinationsGateway`].
pub struct StubDestinations {
    catalog: Vec<Destination>,
    pub fail_list: Cell<bool>,
}

impl StubDestinations {
    #[must_use]
    pub fn new(catalog: Vec<Destination>) -> Self {
        Self {
            catalog,
            fail_list: Cell::new(false),
        }
    }
}

impl DestinationsGateway for StubDestinations {
    fn list(&self) -> LocalBoxFuture<'_, GatewayResult<Vec<Destination>>> {
        let result = if self.fail_list.get() {
            Err(GatewayError::Status { status: 500 })
        } else {
            Ok(self.catalog.clone())
        };
        Box::pin(async move { result })
    }
}

/// In-memory [`OffersGateway`].
pub struct StubOffers {
    catalog: Vec<OfferBundle>,
    pub fail_list: Cell<bool>,
}

impl StubOffers {
    #[must_use]
    pub fn new(catalog: Vec<OfferBundle>) -> Self {
        Self {
            catalog,
            fail_list: Cell::new(false),
        }
    }
}

impl OffersGateway for StubOffers {
    fn list(&self) -> LocalBoxFuture<'_, GatewayResult<Vec<OfferBundle>>> {
        let result = if self.fail_list.get() {
            Err(GatewayError::Status { status: 500 })
        } else {
            Ok(self.catalog.clone())
        };
        Box::pin(async move { result })
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// The fixed "now" the sample route is arranged around: the taxi already
/// happened, the flight is underway, the drive is yet to come.
#[must_use]
pub fn sample_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap()
}

/// Minimal taxi waypoint with the given window.
#[must_use]
pub fn waypoint_at(id: &str, date_from: DateTime<Utc>, date_to: DateTime<Utc>) -> Waypoint {
    Waypoint {
        id: WaypointId::new(id),
        kind: EventKind::Taxi,
        destination: DestinationId::new("ams"),
        date_from,
        date_to,
        base_price: 20,
        offers: Vec::new(),
        is_favorite: false,
    }
}

/// Three waypoints: one past, one present, one future relative to
/// [`sample_now`].
#[must_use]
pub fn sample_route() -> Vec<Waypoint> {
    vec![
        Waypoint {
            id: WaypointId::new("wp-taxi"),
            kind: EventKind::Taxi,
            destination: DestinationId::new("ams"),
            date_from: Utc.with_ymd_and_hms(2026, 8, 20, 10, 0, 0).unwrap(),
            date_to: Utc.with_ymd_and_hms(2026, 8, 20, 11, 0, 0).unwrap(),
            base_price: 20,
            offers: vec![OfferId::new("taxi-comfort")],
            is_favorite: true,
        },
        Waypoint {
            id: WaypointId::new("wp-flight"),
            kind: EventKind::Flight,
            destination: DestinationId::new("cmx"),
            date_from: Utc.with_ymd_and_hms(2026, 8, 25, 11, 0, 0).unwrap(),
            date_to: Utc.with_ymd_and_hms(2026, 8, 25, 13, 0, 0).unwrap(),
            base_price: 160,
            offers: vec![OfferId::new("flight-luggage")],
            is_favorite: false,
        },
        Waypoint {
            id: WaypointId::new("wp-drive"),
            kind: EventKind::Drive,
            destination: DestinationId::new("gva"),
            date_from: Utc.with_ymd_and_hms(2026, 9, 1, 10, 0, 0).unwrap(),
            date_to: Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap(),
            base_price: 60,
            offers: Vec::new(),
            is_favorite: false,
        },
    ]
}

/// Amsterdam, Chamonix, and Geneva.
#[must_use]
pub fn sample_destinations() -> Vec<Destination> {
    vec![
        Destination {
            id: DestinationId::new("ams"),
            name: "Amsterdam".into(),
            description: "Amsterdam, a true asian pearl, with crowded streets.".into(),
            pictures: vec![Picture {
                src: "https://loremflickr.com/248/152?random=1".into(),
                description: "Amsterdam parliament building".into(),
            }],
        },
        Destination {
            id: DestinationId::new("cmx"),
            name: "Chamonix".into(),
            description: "Chamonix, in a middle of Europe, full of the \"cultural heritage\"."
                .into(),
            pictures: Vec::new(),
        },
        Destination {
            id: DestinationId::new("gva"),
            name: "Geneva".into(),
            description: "Geneva, with an embankment of a mighty river as a centre of attraction."
                .into(),
            pictures: Vec::new(),
        },
    ]
}

/// Taxi and flight offers; every other kind has none.
#[must_use]
pub fn sample_bundles() -> Vec<OfferBundle> {
    vec![
        OfferBundle {
            kind: EventKind::Taxi,
            offers: vec![
                Offer {
                    id: OfferId::new("taxi-comfort"),
                    title: "Upgrade to a comfort class".into(),
                    price: 5,
                },
                Offer {
                    id: OfferId::new("taxi-business"),
                    title: "Upgrade to a business class".into(),
                    price: 120,
                },
            ],
        },
        OfferBundle {
            kind: EventKind::Flight,
            offers: vec![
                Offer {
                    id: OfferId::new("flight-luggage"),
                    title: "Add luggage".into(),
                    price: 50,
                },
                Offer {
                    id: OfferId::new("flight-meal"),
                    title: "Add meal".into(),
                    price: 15,
                },
            ],
        },
    ]
}
