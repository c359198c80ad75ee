#![forbid(unsafe_code)]

//! Reactive models for Waymark.
//!
//! This crate owns the application's shared state and the protocol by which
//! the UI learns about changes:
//!
//! - [`Observable`]: a single-threaded broadcast channel carrying an
//!   [`UpdateKind`] plus a payload, with RAII [`Subscription`] guards.
//! - [`UpdateKind`]: how much of the UI a change invalidates, from a
//!   one-row [`UpdateKind::Patch`] up to a whole-board [`UpdateKind::Major`].
//! - Models ([`WaypointsModel`], [`DestinationsModel`], [`OffersModel`],
//!   [`FilterModel`]): caches over the gateway ports that mutate remote
//!   state first and publish only confirmed results.
//! - [`observe_ready`]: a one-shot barrier that fires after every remote
//!   model has settled its initial load.
//!
//! # Architecture
//!
//! Everything here is single-threaded: models are shared via `Rc`, state
//! lives in `RefCell`/`Cell`, and gateway calls return
//! [`futures::future::LocalBoxFuture`] so implementations need not be
//! `Send`. Mutations follow one rule with no exceptions: the gateway
//! confirms first, the cache changes second, subscribers hear about it
//! third. A failed call leaves the cache untouched and publishes nothing.

pub mod destinations;
pub mod filter;
pub mod gateway;
pub mod join;
pub mod observable;
pub mod offers;
pub mod update;
pub mod waypoints;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use destinations::DestinationsModel;
pub use filter::FilterModel;
pub use gateway::{
    DestinationsGateway, GatewayError, GatewayResult, OffersGateway, WaypointsGateway,
};
pub use join::{ReadySource, observe_ready};
pub use observable::{Observable, Subscription};
pub use offers::OffersModel;
pub use update::{InitStatus, UpdateKind};
pub use waypoints::{ModelError, WaypointsModel};
