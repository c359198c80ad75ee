#![forbid(unsafe_code)]

//! Paid add-on offers, bundled per event kind.
//!
//! The remote catalog ships one [`OfferBundle`] per [`EventKind`]; a
//! waypoint may only reference offers from the bundle matching its own
//! kind. Lookups for unknown ids return `None`: a broken reference is the
//! remote service's data problem and must not take the board down.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::event_kind::EventKind;

/// Opaque server-assigned offer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(String);

impl OfferId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single purchasable add-on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub price: u32,
}

/// All offers available for one event kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferBundle {
    pub kind: EventKind,
    pub offers: Vec<Offer>,
}

impl OfferBundle {
    /// Look up an offer of this bundle by id.
    #[must_use]
    pub fn find(&self, id: &OfferId) -> Option<&Offer> {
        self.offers.iter().find(|offer| offer.id == *id)
    }
}

/// The offers valid for `kind`, or an empty slice when the catalog has no
/// bundle for it.
#[must_use]
pub fn offers_for(bundles: &[OfferBundle], kind: EventKind) -> &[Offer] {
    bundles
        .iter()
        .find(|bundle| bundle.kind == kind)
        .map(|bundle| bundle.offers.as_slice())
        .unwrap_or(&[])
}
