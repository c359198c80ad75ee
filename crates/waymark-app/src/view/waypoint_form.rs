#![forbid(unsafe_code)]

//! The waypoint editor form, shared by the edit and create flows.
//!
//! The form holds text as typed and only turns it into a
//! [`WaypointDraft`] on submit; bad dates or prices become an inline
//! error instead of a callback. While a save is in flight the form is
//! busy and ignores every input.
//!
//! # Invariants
//!
//! 1. Changing the kind clears the selected offers; the old kind's
//!    add-ons are meaningless for the new one.
//! 2. `on_submit` only ever receives a draft whose dates and price
//!    parsed; domain validation stays with the presenter.
//! 3. A busy form drops ops, submits, and cancels until `set_busy(false)`.

use std::cell::RefCell;

use waymark_core::{offers_for, Destination, OfferBundle, WaypointDraft};

use crate::stage::{Markup, View};
use crate::view::format;

/// Focusable parts of the form, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Kind,
    Destination,
    DateFrom,
    DateTo,
    Price,
    Offers,
}

impl FormField {
    const ORDER: [FormField; 6] = [
        FormField::Kind,
        FormField::Destination,
        FormField::DateFrom,
        FormField::DateTo,
        FormField::Price,
        FormField::Offers,
    ];

    fn next(self) -> FormField {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> FormField {
        let i = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(i + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    fn label(self) -> &'static str {
        match self {
            FormField::Kind => "Kind",
            FormField::Destination => "Destination",
            FormField::DateFrom => "From",
            FormField::DateTo => "To",
            FormField::Price => "Price",
            FormField::Offers => "Offers",
        }
    }
}

/// One edit step applied to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOp {
    FocusNext,
    FocusPrev,
    /// Advance the focused picker (kind or destination).
    NextChoice,
    PrevChoice,
    Insert(char),
    Backspace,
    /// Toggle the n-th offer of the current kind's bundle (0-based).
    ToggleOffer(usize),
}

#[derive(Debug, Clone)]
struct FormState {
    draft: WaypointDraft,
    destination_index: Option<usize>,
    date_from_text: String,
    date_to_text: String,
    price_text: String,
    focus: FormField,
    error: Option<String>,
    busy: bool,
}

pub struct WaypointFormView {
    state: RefCell<FormState>,
    destinations: Vec<Destination>,
    bundles: Vec<OfferBundle>,
    on_submit: Box<dyn Fn(WaypointDraft)>,
    on_cancel: Box<dyn Fn()>,
    on_delete: Option<Box<dyn Fn()>>,
}

impl WaypointFormView {
    /// Build a form pre-filled from `draft`. Edit forms pass `on_delete`;
    /// create forms pass `None` and get a Cancel action in its place.
    pub fn new(
        draft: WaypointDraft,
        destinations: Vec<Destination>,
        bundles: Vec<OfferBundle>,
        on_submit: Box<dyn Fn(WaypointDraft)>,
        on_cancel: Box<dyn Fn()>,
        on_delete: Option<Box<dyn Fn()>>,
    ) -> Self {
        let destination_index = draft
            .destination
            .as_ref()
            .and_then(|id| destinations.iter().position(|d| d.id == *id));
        let state = FormState {
            destination_index,
            date_from_text: format::datetime(draft.date_from),
            date_to_text: format::datetime(draft.date_to),
            price_text: draft.base_price.to_string(),
            focus: FormField::Kind,
            error: None,
            busy: false,
            draft,
        };
        Self {
            state: RefCell::new(state),
            destinations,
            bundles,
            on_submit,
            on_cancel,
            on_delete,
        }
    }

    /// Apply one edit step. Ignored while busy.
    pub fn apply(&self, op: FormOp) {
        let mut state = self.state.borrow_mut();
        if state.busy {
            return;
        }
        state.error = None;
        match op {
            FormOp::FocusNext => state.focus = state.focus.next(),
            FormOp::FocusPrev => state.focus = state.focus.prev(),
            FormOp::NextChoice => self.cycle(&mut state, 1),
            FormOp::PrevChoice => self.cycle(&mut state, -1),
            FormOp::Insert(c) => match state.focus {
                FormField::DateFrom if is_date_char(c) => state.date_from_text.push(c),
                FormField::DateTo if is_date_char(c) => state.date_to_text.push(c),
                FormField::Price if c.is_ascii_digit() => state.price_text.push(c),
                _ => {}
            },
            FormOp::Backspace => {
                match state.focus {
                    FormField::DateFrom => state.date_from_text.pop(),
                    FormField::DateTo => state.date_to_text.pop(),
                    FormField::Price => state.price_text.pop(),
                    _ => None,
                };
            }
            FormOp::ToggleOffer(index) => {
                let id = offers_for(&self.bundles, state.draft.kind)
                    .get(index)
                    .map(|offer| offer.id.clone());
                if let Some(id) = id {
                    state.draft.toggle_offer(id);
                }
            }
        }
    }

    fn cycle(&self, state: &mut FormState, step: i32) {
        match state.focus {
            FormField::Kind => {
                state.draft.kind = if step > 0 {
                    state.draft.kind.next()
                } else {
                    state.draft.kind.prev()
                };
                state.draft.offers.clear();
            }
            FormField::Destination => {
                if self.destinations.is_empty() {
                    return;
                }
                let len = self.destinations.len();
                let index = match (state.destination_index, step > 0) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                };
                state.destination_index = Some(index);
                state.draft.destination = Some(self.destinations[index].id.clone());
            }
            _ => {}
        }
    }

    /// Parse the typed text into a draft, or explain what failed.
    pub fn draft(&self) -> Result<WaypointDraft, String> {
        let state = self.state.borrow();
        let date_from = format::parse_datetime(&state.date_from_text)
            .ok_or("The start date must look like 25/08/26 14:30")?;
        let date_to = format::parse_datetime(&state.date_to_text)
            .ok_or("The end date must look like 25/08/26 14:30")?;
        let base_price = if state.price_text.is_empty() {
            0
        } else {
            state
                .price_text
                .parse::<u32>()
                .map_err(|_| "The price does not fit a whole euro amount")?
        };
        let mut draft = state.draft.clone();
        draft.date_from = date_from;
        draft.date_to = date_to;
        draft.base_price = base_price;
        Ok(draft)
    }

    /// Hand the parsed draft to the presenter, or show the parse error.
    pub fn submit(&self) {
        if self.state.borrow().busy {
            return;
        }
        match self.draft() {
            Ok(draft) => (self.on_submit)(draft),
            Err(message) => self.set_error(message),
        }
    }

    /// Abandon the edit. Ignored while busy.
    pub fn cancel(&self) {
        if self.state.borrow().busy {
            return;
        }
        (self.on_cancel)();
    }

    /// Delete the waypoint; on a create form this cancels instead.
    pub fn delete(&self) {
        if self.state.borrow().busy {
            return;
        }
        match &self.on_delete {
            Some(on_delete) => on_delete(),
            None => (self.on_cancel)(),
        }
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.state.borrow_mut().error = Some(message.into());
    }

    pub fn set_busy(&self, busy: bool) {
        self.state.borrow_mut().busy = busy;
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state.borrow().busy
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    #[must_use]
    pub fn focus(&self) -> FormField {
        self.state.borrow().focus
    }

    fn field_line(&self, state: &FormState, field: FormField, value: String) -> String {
        let marker = if state.focus == field { "▸ " } else { "  " };
        format!("{marker}{:<12} {value}", field.label())
    }
}

impl View for WaypointFormView {
    fn markup(&self) -> Markup {
        let state = self.state.borrow();
        let title = if self.on_delete.is_some() {
            "Edit event"
        } else {
            "New event"
        };
        let mut markup = Markup::new().line(format!("──── {title} ────"));

        let kind = state.draft.kind;
        markup.push(self.field_line(
            &state,
            FormField::Kind,
            format!("{} {}", kind.icon(), kind.label()),
        ));
        let destination = state
            .destination_index
            .and_then(|i| self.destinations.get(i))
            .map(|d| d.name.clone())
            .unwrap_or_else(|| "(not chosen)".to_string());
        markup.push(self.field_line(&state, FormField::Destination, destination));
        markup.push(self.field_line(&state, FormField::DateFrom, state.date_from_text.clone()));
        markup.push(self.field_line(&state, FormField::DateTo, state.date_to_text.clone()));
        markup.push(self.field_line(&state, FormField::Price, state.price_text.clone()));

        let available = offers_for(&self.bundles, kind);
        if available.is_empty() {
            markup.push(self.field_line(
                &state,
                FormField::Offers,
                "(none for this kind)".to_string(),
            ));
        } else {
            for (index, offer) in available.iter().enumerate() {
                let checked = if state.draft.offers.contains(&offer.id) {
                    "[x]"
                } else {
                    "[ ]"
                };
                let value = format!(
                    "{checked} {} {} {}",
                    index + 1,
                    offer.title,
                    format::euros(offer.price)
                );
                if index == 0 {
                    markup.push(self.field_line(&state, FormField::Offers, value));
                } else {
                    markup.push(format!("  {:<12} {value}", ""));
                }
            }
        }

        if state.busy {
            markup.push("  Saving...".to_string());
        } else if self.on_delete.is_some() {
            markup.push("  Save · Delete".to_string());
        } else {
            markup.push("  Save · Cancel".to_string());
        }
        if let Some(error) = &state.error {
            markup.push(format!("! {error}"));
        }
        markup
    }
}

fn is_date_char(c: char) -> bool {
    c.is_ascii_digit() || c == '/' || c == ':' || c == ' '
}
