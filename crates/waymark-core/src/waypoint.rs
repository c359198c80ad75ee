#![forbid(unsafe_code)]

//! The waypoint entity and its editable draft.
//!
//! # Invariants
//!
//! 1. `date_from <= date_to` for every committed [`Waypoint`].
//! 2. Every offer id is valid for the waypoint's own [`EventKind`] bundle.
//! 3. A [`Waypoint`] is only ever produced by the remote service (list,
//!    create, update responses) or by validating a [`WaypointDraft`];
//!    nothing else mints one.
//!
//! Drafts are the editable shape: no id yet, destination optional until the
//! user picks one. [`WaypointDraft::validate`] is the single gate between
//! "being edited" and "fit to send".

use chrono::{DateTime, Duration, Utc};
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::destination::DestinationId;
use crate::event_kind::EventKind;
use crate::offer::{Offer, OfferId};

/// Opaque server-assigned waypoint identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WaypointId(String);

impl WaypointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One event of the trip: a transport leg or activity with a time window,
/// a price, and optional paid add-ons.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub id: WaypointId,
    pub kind: EventKind,
    pub destination: DestinationId,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    pub offers: Vec<OfferId>,
    pub is_favorite: bool,
}

impl Waypoint {
    /// Length of the time window.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.date_to - self.date_from
    }

    /// Copy with the favorite flag set to `is_favorite`.
    #[must_use]
    pub fn with_favorite(&self, is_favorite: bool) -> Waypoint {
        Waypoint {
            is_favorite,
            ..self.clone()
        }
    }

    /// Base price plus every selected offer resolved through the offers
    /// valid for this waypoint's kind. Unknown ids contribute nothing.
    #[must_use]
    pub fn total_price(&self, offers_for_kind: &[Offer]) -> u32 {
        let extras: u32 = self
            .offers
            .iter()
            .filter_map(|id| offers_for_kind.iter().find(|offer| offer.id == *id))
            .map(|offer| offer.price)
            .sum();
        self.base_price + extras
    }
}

/// Why a draft cannot be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a destination must be chosen")]
    MissingDestination,
    #[error("the end date precedes the start date")]
    DatesInverted,
}

/// A validated, id-less waypoint ready for a create call.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWaypoint {
    pub kind: EventKind,
    pub destination: DestinationId,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    pub offers: Vec<OfferId>,
    pub is_favorite: bool,
}

/// The editable shape behind the waypoint form.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointDraft {
    pub kind: EventKind,
    pub destination: Option<DestinationId>,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    pub offers: Vec<OfferId>,
    pub is_favorite: bool,
}

impl WaypointDraft {
    /// The draft a fresh "new event" editor opens with: a one-hour flight
    /// starting now, nothing else chosen.
    #[must_use]
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            kind: EventKind::default(),
            destination: None,
            date_from: now,
            date_to: now + Duration::hours(1),
            base_price: 0,
            offers: Vec::new(),
            is_favorite: false,
        }
    }

    /// Draft pre-filled from an existing waypoint (the edit flow).
    #[must_use]
    pub fn from_waypoint(waypoint: &Waypoint) -> Self {
        Self {
            kind: waypoint.kind,
            destination: Some(waypoint.destination.clone()),
            date_from: waypoint.date_from,
            date_to: waypoint.date_to,
            base_price: waypoint.base_price,
            offers: waypoint.offers.clone(),
            is_favorite: waypoint.is_favorite,
        }
    }

    /// Add the offer if absent, remove it if present.
    pub fn toggle_offer(&mut self, id: OfferId) {
        if let Some(pos) = self.offers.iter().position(|o| *o == id) {
            self.offers.remove(pos);
        } else {
            self.offers.push(id);
        }
    }

    /// Validate into a create payload.
    pub fn validate(&self) -> Result<NewWaypoint, ValidationError> {
        let destination = self
            .destination
            .clone()
            .ok_or(ValidationError::MissingDestination)?;
        if self.date_to < self.date_from {
            return Err(ValidationError::DatesInverted);
        }
        Ok(NewWaypoint {
            kind: self.kind,
            destination,
            date_from: self.date_from,
            date_to: self.date_to,
            base_price: self.base_price,
            offers: self.offers.clone(),
            is_favorite: self.is_favorite,
        })
    }

    /// Validate into a full waypoint carrying `id` (the update flow).
    pub fn build(&self, id: WaypointId) -> Result<Waypoint, ValidationError> {
        let new = self.validate()?;
        Ok(Waypoint {
            id,
            kind: new.kind,
            destination: new.destination,
            date_from: new.date_from,
            date_to: new.date_to,
            base_price: new.base_price,
            offers: new.offers,
            is_favorite: new.is_favorite,
        })
    }
}
