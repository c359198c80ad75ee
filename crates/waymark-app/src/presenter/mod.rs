#![forbid(unsafe_code)]

//! Presenters: the glue between models, views, and the stage.
//!
//! Each presenter owns a patch of the stage, subscribes to the models it
//! renders, and translates view callbacks into model mutations. Mutations
//! funnel through one [`DataChange`] channel owned by the board presenter
//! so every row and editor hits the waypoints model the same way.

use std::rc::Rc;

use futures::future::LocalBoxFuture;

use waymark_core::{NewWaypoint, Waypoint, WaypointId};
use waymark_model::{ModelError, UpdateKind};

pub mod filter;
pub mod new_waypoint;
pub mod trip_events;
pub mod trip_info;
pub mod waypoint;

pub use filter::FilterPresenter;
pub use new_waypoint::NewWaypointPresenter;
pub use trip_events::TripEventsPresenter;
pub use trip_info::TripInfoPresenter;
pub use waypoint::WaypointPresenter;

/// One mutation a row or editor wants applied to the itinerary.
#[derive(Debug, Clone)]
pub enum WaypointChange {
    Update(Waypoint),
    Create(NewWaypoint),
    Delete(WaypointId),
}

/// Shared mutation channel: carries a change to the waypoints model and
/// resolves once the service confirmed or refused it.
pub type DataChange =
    Rc<dyn Fn(UpdateKind, WaypointChange) -> LocalBoxFuture<'static, Result<(), ModelError>>>;

/// What a form shows when the service refuses a mutation.
#[must_use]
pub fn service_error_message(err: &ModelError) -> String {
    match err {
        ModelError::Gateway(gateway) => match gateway.status() {
            Some(status) => format!("The service rejected the request (status {status})"),
            None => "The service could not be reached; try again".to_string(),
        },
        ModelError::UnknownWaypoint { .. } => {
            "This event is no longer part of the itinerary".to_string()
        }
    }
}
