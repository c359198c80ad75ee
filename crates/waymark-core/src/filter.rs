#![forbid(unsafe_code)]

//! Time-based waypoint filters.
//!
//! A waypoint's relation to "now" is decided purely by its time window:
//!
//! * future: the window has not opened yet (`date_from > now`)
//! * present: now falls inside the window, bounds included
//! * past: the window has closed (`date_to < now`)
//!
//! The three classes partition any list for a fixed `now`; [`FilterKind::All`]
//! is the union. `now` is always passed in so callers own the clock.

use chrono::{DateTime, Utc};
use core::fmt;

use crate::waypoint::Waypoint;

/// Which slice of the trip the list is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterKind {
    #[default]
    All,
    Future,
    Present,
    Past,
}

impl FilterKind {
    /// Every filter, in the order the filter bar shows them.
    pub const ALL: [FilterKind; 4] = [
        FilterKind::All,
        FilterKind::Future,
        FilterKind::Present,
        FilterKind::Past,
    ];

    /// Caption shown on the filter control.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FilterKind::All => "Everything",
            FilterKind::Future => "Future",
            FilterKind::Present => "Present",
            FilterKind::Past => "Past",
        }
    }

    /// Does `waypoint` belong to this filter at instant `now`?
    #[must_use]
    pub fn matches(self, waypoint: &Waypoint, now: DateTime<Utc>) -> bool {
        match self {
            FilterKind::All => true,
            FilterKind::Future => waypoint.date_from > now,
            FilterKind::Present => waypoint.date_from <= now && now <= waypoint.date_to,
            FilterKind::Past => waypoint.date_to < now,
        }
    }

    /// The matching waypoints, ordered by start date ascending.
    #[must_use]
    pub fn select(self, waypoints: &[Waypoint], now: DateTime<Utc>) -> Vec<Waypoint> {
        let mut selected: Vec<Waypoint> = waypoints
            .iter()
            .filter(|wp| self.matches(wp, now))
            .cloned()
            .collect();
        selected.sort_by_key(|wp| wp.date_from);
        selected
    }

    /// How many waypoints this filter would show.
    #[must_use]
    pub fn count(self, waypoints: &[Waypoint], now: DateTime<Utc>) -> usize {
        waypoints.iter().filter(|wp| self.matches(wp, now)).count()
    }

    /// Placeholder text for an empty list under this filter.
    #[must_use]
    pub fn empty_message(self) -> &'static str {
        match self {
            FilterKind::All => "Click New Event to create your first point",
            FilterKind::Future => "There are no future events now",
            FilterKind::Present => "There are no present events now",
            FilterKind::Past => "There are no past events now",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::DestinationId;
    use crate::event_kind::EventKind;
    use crate::waypoint::WaypointId;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 25, h, 0, 0).unwrap()
    }

    fn window(id: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> Waypoint {
        Waypoint {
            id: WaypointId::new(id),
            kind: EventKind::Taxi,
            destination: DestinationId::new("dst-1"),
            date_from: from,
            date_to: to,
            base_price: 0,
            offers: Vec::new(),
            is_favorite: false,
        }
    }

    #[test]
    fn classifies_against_now() {
        let now = at(12);
        let past = window("past", at(8), at(9));
        let present = window("present", at(11), at(13));
        let future = window("future", at(15), at(16));

        assert!(FilterKind::Past.matches(&past, now));
        assert!(FilterKind::Present.matches(&present, now));
        assert!(FilterKind::Future.matches(&future, now));

        assert!(!FilterKind::Past.matches(&present, now));
        assert!(!FilterKind::Past.matches(&future, now));
        assert!(!FilterKind::Future.matches(&present, now));
        assert!(!FilterKind::Future.matches(&past, now));
        assert!(!FilterKind::Present.matches(&past, now));
        assert!(!FilterKind::Present.matches(&future, now));
    }

    #[test]
    fn window_bounds_count_as_present() {
        let now = at(12);
        let starts_now = window("a", at(12), at(14));
        let ends_now = window("b", at(10), at(12));

        assert!(FilterKind::Present.matches(&starts_now, now));
        assert!(!FilterKind::Future.matches(&starts_now, now));
        assert!(FilterKind::Present.matches(&ends_now, now));
        assert!(!FilterKind::Past.matches(&ends_now, now));
    }

    #[test]
    fn select_sorts_by_start_date() {
        let now = at(12);
        let list = vec![
            window("late", at(15), at(16)),
            window("early", at(13), at(14)),
        ];
        let selected = FilterKind::Future.select(&list, now);
        assert_eq!(selected[0].id, WaypointId::new("early"));
        assert_eq!(selected[1].id, WaypointId::new("late"));
    }

    #[test]
    fn all_keeps_everything() {
        let now = at(12);
        let list = vec![
            window("past", at(8), at(9)),
            window("future", at(15), at(16)),
        ];
        assert_eq!(FilterKind::All.count(&list, now), 2);
    }

    #[test]
    fn each_filter_has_its_own_empty_message() {
        let messages: Vec<_> = FilterKind::ALL
            .iter()
            .map(|f| f.empty_message())
            .collect();
        assert_eq!(messages.len(), 4);
        assert!(messages.contains(&"There are no past events now"));
    }

    proptest! {
        // Past, Present, and Future partition any waypoint for a fixed now.
        #[test]
        fn time_classes_partition(from_h in 0u32..23, span_h in 0u32..23) {
            let now = at(12);
            let from = at(from_h);
            let to = from + Duration::hours(i64::from(span_h));
            let wp = window("wp", from, to);

            let hits = [FilterKind::Future, FilterKind::Present, FilterKind::Past]
                .iter()
                .filter(|f| f.matches(&wp, now))
                .count();
            prop_assert_eq!(hits, 1);
            prop_assert!(FilterKind::All.matches(&wp, now));
        }
    }
}
