#![forbid(unsafe_code)]

//! Trip-level rollup shown in the header.

use chrono::{DateTime, Utc};

use crate::destination::Destination;
use crate::offer::{OfferBundle, offers_for};
use crate::waypoint::Waypoint;

/// Aggregate of the whole route: where it goes, when, and what it costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripSummary {
    /// Destination names in travel order, e.g. "Amsterdam — Chamonix — Geneva".
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Sum of every waypoint's base price plus its selected offers.
    pub total_cost: u32,
}

impl TripSummary {
    /// Roll the route up, or `None` when there are no waypoints.
    ///
    /// The title lists destinations in chronological order. Four stops or
    /// more collapse to "first — ... — last". A destination id the catalog
    /// does not know renders as "?".
    #[must_use]
    pub fn compute(
        waypoints: &[Waypoint],
        destinations: &[Destination],
        bundles: &[OfferBundle],
    ) -> Option<TripSummary> {
        if waypoints.is_empty() {
            return None;
        }

        let mut ordered: Vec<&Waypoint> = waypoints.iter().collect();
        ordered.sort_by_key(|wp| wp.date_from);

        let names: Vec<&str> = ordered
            .iter()
            .map(|wp| {
                destinations
                    .iter()
                    .find(|d| d.id == wp.destination)
                    .map_or("?", |d| d.name.as_str())
            })
            .collect();
        let title = if names.len() <= 3 {
            names.join(" — ")
        } else {
            format!("{} — ... — {}", names[0], names[names.len() - 1])
        };

        let start = ordered
            .iter()
            .map(|wp| wp.date_from)
            .min()
            .unwrap_or_default();
        let end = ordered.iter().map(|wp| wp.date_to).max().unwrap_or_default();
        let total_cost = ordered
            .iter()
            .map(|wp| wp.total_price(offers_for(bundles, wp.kind)))
            .sum();

        Some(TripSummary {
            title,
            start,
            end,
            total_cost,
        })
    }
}
