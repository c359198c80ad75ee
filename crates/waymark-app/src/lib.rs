#![forbid(unsafe_code)]

//! Terminal front end for the Waymark itinerary planner.
//!
//! The crate follows a model-view-presenter split:
//!
//! - [`stage`]: a retained tree of text views, the terminal's stand-in
//!   for a render surface. Presenters mount, replace, and unmount nodes;
//!   drawing is one depth-first walk.
//! - [`view`]: dumb display structs. They format their data into markup
//!   lines and forward interactions to presenter callbacks.
//! - [`presenter`]: the wiring between models and views. Presenters
//!   subscribe to model notifications and decide what to rebuild based on
//!   the published [`UpdateKind`](waymark_model::UpdateKind).
//! - [`app`]: composition root plus keyboard routing, fully headless so
//!   integration tests can drive it without a terminal.
//! - [`terminal`]: raw-mode session guard, the input thread, and the draw
//!   loop. Nothing else touches the terminal.

pub mod app;
pub mod config;
pub mod presenter;
pub mod stage;
pub mod terminal;
pub mod view;

pub use app::{App, KeyInput, Models};
pub use config::{Config, ConfigError};
