#![forbid(unsafe_code)]

//! Application root: wires models, presenters, and key routing.
//!
//! Construction order is mount order: trip header, filter bar,
//! new-event button, then the board. Three readiness barriers gate the
//! header, the bar, and the button on the initial loads; the board
//! renders its own loading and failure states instead.
//!
//! Key handling is synchronous. A key either goes to the open editor
//! form or to the board, and any network work it kicks off runs as a
//! spawned task; the caller redraws via [`App::draw_lines`] after every
//! key and whenever [`App::set_on_change`] fires.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};

use waymark_core::FilterKind;
use waymark_model::{
    DestinationsModel, FilterModel, OffersModel, ReadySource, Subscription, UpdateKind,
    WaypointsModel, observe_ready,
};

use crate::presenter::{
    FilterPresenter, TripEventsPresenter, TripInfoPresenter, WaypointPresenter,
};
use crate::stage::{MountPoint, Stage};
use crate::view::{FormField, FormOp, NewEventButtonView, WaypointFormView};

/// The four models every presenter shares.
#[derive(Clone)]
pub struct Models {
    pub waypoints: Rc<WaypointsModel>,
    pub destinations: Rc<DestinationsModel>,
    pub offers: Rc<OffersModel>,
    pub filter: Rc<FilterModel>,
}

/// A key after terminal decoding, as the app cares about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Up,
    Down,
    Enter,
    Escape,
    Backspace,
    Tab,
    BackTab,
    Delete,
    Char(char),
}

pub struct App {
    stage: Rc<Stage>,
    models: Models,
    filter_bar: Rc<FilterPresenter>,
    button: Rc<NewEventButtonView>,
    board: Rc<TripEventsPresenter>,
    selection: Cell<usize>,
    on_change: Rc<RefCell<Option<Box<dyn Fn()>>>>,
    // Held so the header keeps re-rendering and the redraw hook keeps
    // firing for the app's whole lifetime.
    _trip_info: Rc<TripInfoPresenter>,
    _subscriptions: Vec<Subscription>,
}

impl App {
    /// Assemble the UI over `models`. Does not start the model loads;
    /// the caller spawns those.
    pub fn new(models: Models, clock: Rc<dyn Fn() -> DateTime<Utc>>) -> Rc<App> {
        let stage = Rc::new(Stage::new());

        let trip_info = TripInfoPresenter::new(
            Rc::clone(&stage),
            Rc::clone(&models.waypoints),
            Rc::clone(&models.destinations),
            Rc::clone(&models.offers),
        );
        let filter_bar = FilterPresenter::new(
            Rc::clone(&stage),
            Rc::clone(&models.filter),
            Rc::clone(&models.waypoints),
            Rc::clone(&clock),
        );
        let button = Rc::new(NewEventButtonView::new());
        stage.mount_root(MountPoint::Back, button.clone());

        let on_editor_closed = {
            let button = Rc::downgrade(&button);
            Rc::new(move || {
                if let Some(button) = button.upgrade() {
                    button.set_enabled(true);
                }
            })
        };
        let board = TripEventsPresenter::new(
            Rc::clone(&stage),
            Rc::clone(&models.waypoints),
            Rc::clone(&models.destinations),
            Rc::clone(&models.offers),
            Rc::clone(&models.filter),
            clock,
            on_editor_closed,
        );

        {
            let board = Rc::downgrade(&board);
            let button_weak = Rc::downgrade(&button);
            button.set_on_press(Rc::new(move || {
                let Some(board) = board.upgrade() else { return };
                if let Some(button) = button_weak.upgrade() {
                    button.set_enabled(false);
                }
                board.create_new_waypoint();
            }));
        }

        let sources: [&dyn ReadySource; 3] = [
            &*models.waypoints,
            &*models.destinations,
            &*models.offers,
        ];
        {
            let button = Rc::downgrade(&button);
            observe_ready(&sources, move |kind| {
                if kind != UpdateKind::Init {
                    return;
                }
                if let Some(button) = button.upgrade() {
                    button.set_enabled(true);
                }
            });
        }
        {
            let trip_info = Rc::downgrade(&trip_info);
            observe_ready(&sources, move |kind| {
                if let Some(presenter) = trip_info.upgrade() {
                    presenter.init(kind);
                }
            });
        }
        {
            let filter_bar = Rc::downgrade(&filter_bar);
            observe_ready(&sources, move |kind| {
                if let Some(presenter) = filter_bar.upgrade() {
                    presenter.init(kind);
                }
            });
        }

        let on_change: Rc<RefCell<Option<Box<dyn Fn()>>>> = Rc::new(RefCell::new(None));
        let fire = {
            let hook = Rc::clone(&on_change);
            Rc::new(move || {
                if let Some(hook) = hook.borrow().as_ref() {
                    hook();
                }
            })
        };
        let subscriptions = vec![
            models.waypoints.subscribe({
                let fire = Rc::clone(&fire);
                move |_, _| fire()
            }),
            models.destinations.observe_kinds(Box::new({
                let fire = Rc::clone(&fire);
                move |_| fire()
            })),
            models.offers.observe_kinds(Box::new({
                let fire = Rc::clone(&fire);
                move |_| fire()
            })),
            models.filter.subscribe(move |_, _| fire()),
        ];

        Rc::new(App {
            stage,
            models,
            filter_bar,
            button,
            board,
            selection: Cell::new(0),
            on_change,
            _trip_info: trip_info,
            _subscriptions: subscriptions,
        })
    }

    /// Install the redraw hook the terminal loop waits on.
    pub fn set_on_change(&self, hook: impl Fn() + 'static) {
        *self.on_change.borrow_mut() = Some(Box::new(hook));
    }

    /// Whether an editor form is currently taking input.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.board.active_form().is_some()
    }

    /// Route one key press. Synchronous; any service call it triggers
    /// completes on the local task queue.
    pub fn handle_key(&self, key: KeyInput) {
        match self.board.active_form() {
            Some(form) => self.handle_form_key(&form, key),
            None => self.handle_board_key(key),
        }
    }

    fn handle_form_key(&self, form: &WaypointFormView, key: KeyInput) {
        match key {
            KeyInput::Escape => {
                self.board.handle_escape();
            }
            KeyInput::Enter => form.submit(),
            KeyInput::Tab => form.apply(FormOp::FocusNext),
            KeyInput::BackTab => form.apply(FormOp::FocusPrev),
            KeyInput::Up => form.apply(FormOp::PrevChoice),
            KeyInput::Down => form.apply(FormOp::NextChoice),
            KeyInput::Backspace => form.apply(FormOp::Backspace),
            KeyInput::Delete => form.delete(),
            KeyInput::Char(c) => {
                if form.focus() == FormField::Offers {
                    if let Some(digit) = c.to_digit(10) {
                        if digit >= 1 {
                            form.apply(FormOp::ToggleOffer((digit - 1) as usize));
                            return;
                        }
                    }
                }
                form.apply(FormOp::Insert(c));
            }
        }
    }

    fn handle_board_key(&self, key: KeyInput) {
        match key {
            KeyInput::Up => self.move_selection(-1),
            KeyInput::Down => self.move_selection(1),
            KeyInput::Enter => {
                if let Some(row) = self.selected_row().and_then(|p| p.row()) {
                    row.open();
                }
            }
            KeyInput::Char('f') => {
                if let Some(row) = self.selected_row().and_then(|p| p.row()) {
                    row.toggle_favorite();
                }
            }
            KeyInput::Char('n') => self.button.press(),
            KeyInput::Char(c @ '1'..='4') => {
                let index = (c as usize) - ('1' as usize);
                self.filter_bar.bar().select(FilterKind::ALL[index]);
            }
            _ => {}
        }
    }

    fn move_selection(&self, delta: isize) {
        let len = self.board.visible().len();
        if len == 0 {
            return;
        }
        let current = self.selection.get().min(len - 1) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.selection.set(next);
    }

    fn selected_row(&self) -> Option<Rc<WaypointPresenter>> {
        let rows = self.board.visible();
        if rows.is_empty() {
            return None;
        }
        let index = self.selection.get().min(rows.len() - 1);
        rows.get(index).cloned()
    }

    /// Current screen content, with the selection highlight applied.
    #[must_use]
    pub fn draw_lines(&self) -> Vec<String> {
        let rows = self.board.visible();
        if !rows.is_empty() {
            let selected = self.selection.get().min(rows.len() - 1);
            for (index, row) in rows.iter().enumerate() {
                row.set_highlighted(index == selected);
            }
        }
        self.stage.render_lines()
    }

    #[must_use]
    pub fn models(&self) -> &Models {
        &self.models
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("selection", &self.selection.get())
            .field("editing", &self.is_editing())
            .finish()
    }
}
