#![forbid(unsafe_code)]

//! Views: dumb markup producers with injected callbacks.
//!
//! A view owns presentation state only. Anything that changes the
//! itinerary goes through a callback handed in by a presenter; the view
//! never touches a model. Every view implements [`crate::stage::View`]
//! and is swapped wholesale on re-render rather than patched.

pub mod filter_bar;
pub mod format;
pub mod list;
pub mod new_button;
pub mod trip_info;
pub mod waypoint_form;
pub mod waypoint_row;

pub use filter_bar::{FilterBarView, FilterEntry};
pub use list::{ListMessageView, ListView};
pub use new_button::NewEventButtonView;
pub use trip_info::TripInfoView;
pub use waypoint_form::{FormField, FormOp, WaypointFormView};
pub use waypoint_row::WaypointRowView;
