#![forbid(unsafe_code)]

//! The trip header: route title, date range, total cost.

use waymark_core::TripSummary;

use crate::stage::{Markup, View};
use crate::view::format;

/// Renders a [`TripSummary`], or nothing while there is no route.
pub struct TripInfoView {
    summary: Option<TripSummary>,
}

impl TripInfoView {
    #[must_use]
    pub fn new(summary: Option<TripSummary>) -> Self {
        Self { summary }
    }
}

impl View for TripInfoView {
    fn markup(&self) -> Markup {
        let Some(summary) = &self.summary else {
            return Markup::new();
        };
        Markup::new()
            .line(summary.title.clone())
            .line(format!(
                "{} — {}   Total: {}",
                format::day(summary.start),
                format::day(summary.end),
                format::euros(summary.total_cost),
            ))
    }
}
