#![forbid(unsafe_code)]

//! HTTP implementations of the Waymark gateway ports.
//!
//! One [`ApiClient`] carries the base URL, the authorization token, and a
//! shared `reqwest::Client`; the three services borrow it per resource:
//!
//! - [`WaypointsService`]: `points`, full CRUD
//! - [`DestinationsService`]: `destinations`, read-only
//! - [`OffersService`]: `offers`, read-only
//!
//! The wire shapes live in [`dto`] and never leak past this crate; each
//! service converts to and from the domain types at its boundary.

pub mod client;
pub mod destinations;
pub mod dto;
pub mod offers;
pub mod waypoints;

pub use client::ApiClient;
pub use destinations::DestinationsService;
pub use offers::OffersService;
pub use waypoints::WaypointsService;
