#![forbid(unsafe_code)]

//! Ports to the remote itinerary service.
//!
//! Models talk to the network through these traits only; the HTTP
//! implementation lives in `waymark-api`, and the test stubs in
//! [`crate::testing`]. All methods return
//! [`LocalBoxFuture`](futures::future::LocalBoxFuture) so the traits stay
//! object-safe and implementations need not be `Send`.

use futures::future::LocalBoxFuture;
use std::error::Error;

use waymark_core::{Destination, NewWaypoint, OfferBundle, Waypoint, WaypointId};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// What went wrong between the model and the remote service.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The service answered with a non-success status.
    #[error("service rejected the request with status {status}")]
    Status { status: u16 },
    /// The request never completed (connection, timeout, redirect loop).
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn Error + Send + Sync>),
    /// The response arrived but its body was not the shape we expect.
    #[error("malformed response body: {0}")]
    Decode(#[source] Box<dyn Error + Send + Sync>),
}

impl GatewayError {
    pub fn transport(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }

    pub fn decode(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Decode(Box::new(err))
    }

    /// The HTTP status, when the failure was a service rejection.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

/// Remote CRUD for waypoints.
pub trait WaypointsGateway {
    fn list(&self) -> LocalBoxFuture<'_, GatewayResult<Vec<Waypoint>>>;

    fn create<'a>(
        &'a self,
        waypoint: &'a NewWaypoint,
    ) -> LocalBoxFuture<'a, GatewayResult<Waypoint>>;

    fn update<'a>(&'a self, waypoint: &'a Waypoint) -> LocalBoxFuture<'a, GatewayResult<Waypoint>>;

    fn delete<'a>(&'a self, id: &'a WaypointId) -> LocalBoxFuture<'a, GatewayResult<()>>;
}

/// Read-only destination catalog.
pub trait DestinationsGateway {
    fn list(&self) -> LocalBoxFuture<'_, GatewayResult<Vec<Destination>>>;
}

/// Read-only offer catalog, grouped per event kind.
pub trait OffersGateway {
    fn list(&self) -> LocalBoxFuture<'_, GatewayResult<Vec<OfferBundle>>>;
}
