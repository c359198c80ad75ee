#![forbid(unsafe_code)]

//! The catalog of trip event kinds.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a trip waypoint: a transport leg or an on-site activity.
///
/// The serialized form is the kebab-case wire name used by the remote API
/// (`CheckIn` travels as `"check-in"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Taxi,
    Bus,
    Train,
    Ship,
    Drive,
    #[default]
    Flight,
    CheckIn,
    Sightseeing,
    Restaurant,
}

impl EventKind {
    /// Every kind, in the order pickers cycle through them.
    pub const ALL: [EventKind; 9] = [
        EventKind::Taxi,
        EventKind::Bus,
        EventKind::Train,
        EventKind::Ship,
        EventKind::Drive,
        EventKind::Flight,
        EventKind::CheckIn,
        EventKind::Sightseeing,
        EventKind::Restaurant,
    ];

    /// Human-facing label ("Check-in", "Flight", ...).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Taxi => "Taxi",
            EventKind::Bus => "Bus",
            EventKind::Train => "Train",
            EventKind::Ship => "Ship",
            EventKind::Drive => "Drive",
            EventKind::Flight => "Flight",
            EventKind::CheckIn => "Check-in",
            EventKind::Sightseeing => "Sightseeing",
            EventKind::Restaurant => "Restaurant",
        }
    }

    /// Wire name as the remote API spells it.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            EventKind::Taxi => "taxi",
            EventKind::Bus => "bus",
            EventKind::Train => "train",
            EventKind::Ship => "ship",
            EventKind::Drive => "drive",
            EventKind::Flight => "flight",
            EventKind::CheckIn => "check-in",
            EventKind::Sightseeing => "sightseeing",
            EventKind::Restaurant => "restaurant",
        }
    }

    /// One-glyph marker used by the terminal row renderer.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            EventKind::Taxi => "🚕",
            EventKind::Bus => "🚌",
            EventKind::Train => "🚆",
            EventKind::Ship => "🚢",
            EventKind::Drive => "🚗",
            EventKind::Flight => "✈",
            EventKind::CheckIn => "🏨",
            EventKind::Sightseeing => "🏛",
            EventKind::Restaurant => "🍴",
        }
    }

    /// Next kind in catalog order, wrapping at the end.
    #[must_use]
    pub fn next(self) -> EventKind {
        let i = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Previous kind in catalog order, wrapping at the start.
    #[must_use]
    pub fn prev(self) -> EventKind {
        let i = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
