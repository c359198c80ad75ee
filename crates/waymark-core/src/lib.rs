#![forbid(unsafe_code)]

//! Domain types and pure itinerary logic for Waymark.
//!
//! This crate is free of I/O: entities, the filter predicates, draft
//! validation, and the trip-summary arithmetic all live here so that the
//! model, API, and UI layers can share one vocabulary.

pub mod destination;
pub mod event_kind;
pub mod filter;
pub mod offer;
pub mod summary;
pub mod waypoint;

pub use destination::{Destination, DestinationId, Picture};
pub use event_kind::EventKind;
pub use filter::FilterKind;
pub use offer::{Offer, OfferBundle, OfferId, offers_for};
pub use summary::TripSummary;
pub use waypoint::{NewWaypoint, ValidationError, Waypoint, WaypointDraft, WaypointId};
