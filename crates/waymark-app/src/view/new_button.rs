#![forbid(unsafe_code)]

//! The "New event" button.
//!
//! Disabled until every model finished loading, and again while a
//! create editor is open. The press handler is wired after
//! construction because the board presenter that opens the editor is
//! built later than the button.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::stage::{Markup, View};

pub struct NewEventButtonView {
    enabled: Cell<bool>,
    on_press: RefCell<Option<Rc<dyn Fn()>>>,
}

impl Default for NewEventButtonView {
    fn default() -> Self {
        Self {
            enabled: Cell::new(false),
            on_press: RefCell::new(None),
        }
    }
}

impl NewEventButtonView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_on_press(&self, on_press: Rc<dyn Fn()>) {
        *self.on_press.borrow_mut() = Some(on_press);
    }

    /// Fire the press handler if the button is enabled and wired.
    pub fn press(&self) {
        if !self.enabled.get() {
            return;
        }
        // Clone out so the handler may re-enter this view.
        let handler = self.on_press.borrow().clone();
        if let Some(handler) = handler {
            handler();
        }
    }
}

impl View for NewEventButtonView {
    fn markup(&self) -> Markup {
        let line = if self.enabled.get() {
            "[ n ] New event"
        } else {
            "[ n ] New event (unavailable)"
        };
        Markup::new().line(line)
    }
}
