#![forbid(unsafe_code)]

//! One itinerary row in view mode.
//!
//! Shows the waypoint's day, kind, destination, time window, price, and
//! the selected add-ons underneath. `on_open` asks the owning presenter
//! to switch the row into an editor; `on_favorite` toggles the star.
//! The row never mutates anything itself.

use std::cell::Cell;

use waymark_core::{Offer, Waypoint};

use crate::stage::{Markup, View};
use crate::view::format;

pub struct WaypointRowView {
    waypoint: Waypoint,
    destination_name: String,
    selected_offers: Vec<Offer>,
    highlighted: Cell<bool>,
    on_open: Box<dyn Fn()>,
    on_favorite: Box<dyn Fn()>,
}

impl WaypointRowView {
    pub fn new(
        waypoint: Waypoint,
        destination_name: String,
        selected_offers: Vec<Offer>,
        on_open: Box<dyn Fn()>,
        on_favorite: Box<dyn Fn()>,
    ) -> Self {
        Self {
            waypoint,
            destination_name,
            selected_offers,
            highlighted: Cell::new(false),
            on_open,
            on_favorite,
        }
    }

    #[must_use]
    pub fn waypoint(&self) -> &Waypoint {
        &self.waypoint
    }

    pub fn set_highlighted(&self, highlighted: bool) {
        self.highlighted.set(highlighted);
    }

    /// Ask the presenter to open the editor for this row.
    pub fn open(&self) {
        (self.on_open)();
    }

    /// Ask the presenter to flip the favorite flag.
    pub fn toggle_favorite(&self) {
        (self.on_favorite)();
    }
}

impl View for WaypointRowView {
    fn markup(&self) -> Markup {
        let wp = &self.waypoint;
        let marker = if self.highlighted.get() { "▶ " } else { "  " };
        let star = if wp.is_favorite { " ★" } else { "" };
        let mut markup = Markup::new().line(format!(
            "{marker}{}  {} {} {}  {} — {} ({})  {}{star}",
            format::day(wp.date_from),
            wp.kind.icon(),
            wp.kind.label(),
            self.destination_name,
            format::time(wp.date_from),
            format::time(wp.date_to),
            format::duration(wp.duration()),
            format::euros(wp.total_price(&self.selected_offers)),
        ));
        for offer in &self.selected_offers {
            markup.push(format!(
                "      + {} {}",
                offer.title,
                format::euros(offer.price)
            ));
        }
        markup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::TimeZone;
    use chrono::Utc;
    use waymark_core::{DestinationId, EventKind, OfferId, WaypointId};

    fn flight() -> Waypoint {
        Waypoint {
            id: WaypointId::new("wp-1"),
            kind: EventKind::Flight,
            destination: DestinationId::new("ams"),
            date_from: Utc.with_ymd_and_hms(2026, 8, 25, 11, 20, 0).unwrap(),
            date_to: Utc.with_ymd_and_hms(2026, 8, 25, 13, 0, 0).unwrap(),
            base_price: 160,
            offers: vec![OfferId::new("flight-luggage")],
            is_favorite: false,
        }
    }

    fn luggage() -> Offer {
        Offer {
            id: OfferId::new("flight-luggage"),
            title: "Add luggage".into(),
            price: 50,
        }
    }

    fn quiet_row(waypoint: Waypoint, selected: Vec<Offer>) -> WaypointRowView {
        WaypointRowView::new(
            waypoint,
            "Amsterdam".into(),
            selected,
            Box::new(|| {}),
            Box::new(|| {}),
        )
    }

    #[test]
    fn row_line_carries_times_duration_and_total() {
        let row = quiet_row(flight(), vec![luggage()]);
        let markup = row.markup();
        let line = &markup.lines()[0];
        assert!(line.contains("AUG 25"), "day marker missing: {line}");
        assert!(line.contains("Flight Amsterdam"), "{line}");
        assert!(line.contains("11:20 — 13:00"), "{line}");
        assert!(line.contains("(01H 40M)"), "{line}");
        assert!(line.contains("€210"), "selected offer not in total: {line}");
    }

    #[test]
    fn selected_offers_render_underneath() {
        let row = quiet_row(flight(), vec![luggage()]);
        let markup = row.markup();
        assert_eq!(markup.lines().len(), 2);
        assert!(markup.lines()[1].contains("+ Add luggage €50"));
    }

    #[test]
    fn favorite_star_follows_the_flag() {
        let plain = quiet_row(flight(), Vec::new());
        assert!(!plain.markup().lines()[0].ends_with('★'));

        let favorite = quiet_row(flight().with_favorite(true), Vec::new());
        assert!(favorite.markup().lines()[0].ends_with('★'));
    }

    #[test]
    fn highlight_toggles_the_marker() {
        let row = quiet_row(flight(), Vec::new());
        assert!(row.markup().lines()[0].starts_with("  "));
        row.set_highlighted(true);
        assert!(row.markup().lines()[0].starts_with("▶ "));
    }

    #[test]
    fn open_and_favorite_reach_their_callbacks() {
        let opened = Rc::new(Cell::new(0));
        let starred = Rc::new(Cell::new(0));
        let row = WaypointRowView::new(
            flight(),
            "Amsterdam".into(),
            Vec::new(),
            Box::new({
                let opened = Rc::clone(&opened);
                move || opened.set(opened.get() + 1)
            }),
            Box::new({
                let starred = Rc::clone(&starred);
                move || starred.set(starred.get() + 1)
            }),
        );

        row.open();
        row.toggle_favorite();
        row.toggle_favorite();
        assert_eq!(opened.get(), 1);
        assert_eq!(starred.get(), 2);
    }
}
