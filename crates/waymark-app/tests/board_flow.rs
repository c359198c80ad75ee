//! End-to-end flows through the assembled app: keys in, screen out,
//! with stub gateways standing in for the itinerary service.
//!
//! Covered here rather than in unit tests:
//! - the board lifecycle from loading to rows in date order
//! - a failed catalog load freezing the bar and the new-event button
//! - edit, favorite, create, delete, and filter flows driven purely
//!   through [`App::handle_key`]
//! - refused mutations leaving the cache, screen, and editor intact

#![forbid(unsafe_code)]

use std::rc::Rc;

use tokio::task::{LocalSet, yield_now};

use waymark_app::{App, KeyInput, Models};
use waymark_model::testing::{
    StubDestinations, StubOffers, StubWaypoints, sample_bundles, sample_destinations, sample_now,
    sample_route,
};
use waymark_model::{DestinationsModel, FilterModel, OffersModel, WaypointsModel};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

struct Fixture {
    app: Rc<App>,
    models: Models,
    service: Rc<StubWaypoints>,
}

fn fixture() -> Fixture {
    let service = Rc::new(StubWaypoints::new(sample_route()));
    let models = Models {
        waypoints: Rc::new(WaypointsModel::new(service.clone())),
        destinations: Rc::new(DestinationsModel::new(Rc::new(StubDestinations::new(
            sample_destinations(),
        )))),
        offers: Rc::new(OffersModel::new(Rc::new(StubOffers::new(sample_bundles())))),
        filter: Rc::new(FilterModel::new()),
    };
    let app = App::new(models.clone(), Rc::new(sample_now));
    Fixture {
        app,
        models,
        service,
    }
}

async fn init_all(fx: &Fixture) {
    fx.models.waypoints.init().await;
    fx.models.destinations.init().await;
    fx.models.offers.init().await;
}

/// Let spawned mutation tasks run to completion.
async fn drain() {
    for _ in 0..4 {
        yield_now().await;
    }
}

fn screen(app: &App) -> String {
    app.draw_lines().join("\n")
}

fn press(app: &App, keys: &[KeyInput]) {
    for key in keys {
        app.handle_key(*key);
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn loading_board_becomes_rows_in_date_order() {
    LocalSet::new()
        .run_until(async {
            let fx = fixture();
            let before = screen(&fx.app);
            assert!(before.contains("Loading..."), "{before}");
            assert!(before.contains("New event (unavailable)"), "{before}");
            assert!(!before.contains("Total:"), "header must wait for data");

            init_all(&fx).await;
            let after = screen(&fx.app);
            assert!(!after.contains("Loading..."), "{after}");
            assert!(after.contains("Amsterdam — Chamonix — Geneva"), "{after}");
            assert!(after.contains("Total: €295"), "{after}");
            assert!(!after.contains("unavailable"), "{after}");

            // Rows are identified by their unique time windows.
            let taxi = after.find("10:00 — 11:00").expect("taxi row");
            let flight = after.find("11:00 — 13:00").expect("flight row");
            let drive = after.find("10:00 — 12:00").expect("drive row");
            assert!(taxi < flight && flight < drive, "date order lost:\n{after}");
        })
        .await;
}

#[tokio::test]
async fn failed_catalog_freezes_bar_and_button() {
    LocalSet::new()
        .run_until(async {
            let service = Rc::new(StubWaypoints::new(sample_route()));
            let destinations = Rc::new(StubDestinations::new(sample_destinations()));
            destinations.fail_list.set(true);
            let models = Models {
                waypoints: Rc::new(WaypointsModel::new(service.clone())),
                destinations: Rc::new(DestinationsModel::new(destinations)),
                offers: Rc::new(OffersModel::new(Rc::new(StubOffers::new(sample_bundles())))),
                filter: Rc::new(FilterModel::new()),
            };
            let app = App::new(models.clone(), Rc::new(sample_now));

            models.waypoints.init().await;
            models.destinations.init().await;
            models.offers.init().await;

            let rendered = screen(&app);
            assert!(
                rendered.contains("Failed to load latest route information"),
                "{rendered}"
            );
            assert!(rendered.contains("New event (unavailable)"), "{rendered}");
            assert!(rendered.contains("2:Future~"), "bar not frozen: {rendered}");

            app.handle_key(KeyInput::Char('n'));
            assert!(!app.is_editing(), "a dead board must not open editors");
        })
        .await;
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn enter_opens_the_editor_and_escape_discards_it() {
    LocalSet::new()
        .run_until(async {
            let fx = fixture();
            init_all(&fx).await;

            fx.app.handle_key(KeyInput::Enter);
            assert!(fx.app.is_editing());
            assert!(screen(&fx.app).contains("──── Edit event ────"));

            let calls_before = fx.service.calls.get();
            fx.app.handle_key(KeyInput::Escape);
            assert!(!fx.app.is_editing());
            let rendered = screen(&fx.app);
            assert!(!rendered.contains("Edit event"), "{rendered}");
            assert!(rendered.contains("10:00 — 11:00"), "row not restored");
            assert_eq!(
                fx.service.calls.get(),
                calls_before,
                "a discarded edit must never reach the service"
            );
        })
        .await;
}

#[tokio::test]
async fn typing_n_while_editing_stays_in_the_form() {
    LocalSet::new()
        .run_until(async {
            let fx = fixture();
            init_all(&fx).await;

            fx.app.handle_key(KeyInput::Enter);
            fx.app.handle_key(KeyInput::Char('n'));

            let rendered = screen(&fx.app);
            assert!(fx.app.is_editing());
            assert!(rendered.contains("──── Edit event ────"), "{rendered}");
            assert!(!rendered.contains("──── New event ────"), "{rendered}");
            assert!(!rendered.contains("unavailable"), "button never pressed");
        })
        .await;
}

#[tokio::test]
async fn favorite_key_patches_the_row_and_the_service() {
    LocalSet::new()
        .run_until(async {
            let fx = fixture();
            init_all(&fx).await;
            let taxi_line = |s: &str| {
                s.lines()
                    .find(|line| line.contains("10:00 — 11:00"))
                    .map(str::to_owned)
                    .expect("taxi row")
            };
            assert!(taxi_line(&screen(&fx.app)).ends_with('★'));

            fx.app.handle_key(KeyInput::Char('f'));
            drain().await;

            assert!(!fx.service.stored()[0].is_favorite);
            let rendered = screen(&fx.app);
            assert!(!taxi_line(&rendered).contains('★'), "{rendered}");
        })
        .await;
}

#[tokio::test]
async fn price_edit_saves_through_the_service() {
    LocalSet::new()
        .run_until(async {
            let fx = fixture();
            init_all(&fx).await;

            fx.app.handle_key(KeyInput::Enter);
            press(&fx.app, &[KeyInput::Tab; 4]); // Kind -> ... -> Price
            press(&fx.app, &[KeyInput::Backspace; 2]); // clear "20"
            press(&fx.app, &[KeyInput::Char('3'), KeyInput::Char('5')]);
            fx.app.handle_key(KeyInput::Enter);
            drain().await;

            assert!(!fx.app.is_editing(), "save must close the editor");
            assert_eq!(fx.service.stored()[0].base_price, 35);
            // 35 base + 5 comfort upgrade
            assert!(screen(&fx.app).contains("€40"));
        })
        .await;
}

#[tokio::test]
async fn deleting_the_last_past_event_leaves_the_empty_message() {
    LocalSet::new()
        .run_until(async {
            let fx = fixture();
            init_all(&fx).await;

            fx.app.handle_key(KeyInput::Char('4'));
            fx.app.handle_key(KeyInput::Enter);
            fx.app.handle_key(KeyInput::Delete);
            drain().await;

            assert!(!fx.app.is_editing());
            let ids: Vec<String> = fx
                .service
                .stored()
                .iter()
                .map(|wp| wp.id.to_string())
                .collect();
            assert_eq!(ids, ["wp-flight", "wp-drive"]);
            let rendered = screen(&fx.app);
            assert!(
                rendered.contains("There are no past events now"),
                "{rendered}"
            );
            assert!(rendered.contains("[4:Past]"), "filter must stay put");
        })
        .await;
}

// ---------------------------------------------------------------------------
// Creating
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rejected_create_keeps_the_editor_and_error() {
    LocalSet::new()
        .run_until(async {
            let fx = fixture();
            init_all(&fx).await;
            fx.service.fail_create.set(true);

            fx.app.handle_key(KeyInput::Char('n'));
            fx.app.handle_key(KeyInput::Tab); // Kind -> Destination
            fx.app.handle_key(KeyInput::Down); // pick Amsterdam
            fx.app.handle_key(KeyInput::Enter);
            drain().await;

            assert!(fx.app.is_editing(), "refusal must keep the editor open");
            let rendered = screen(&fx.app);
            assert!(
                rendered.contains("! The service rejected the request (status 500)"),
                "{rendered}"
            );
            assert!(rendered.contains("unavailable"), "button stays parked");
            assert_eq!(fx.service.stored().len(), 3, "cache must stay untouched");
        })
        .await;
}

#[tokio::test]
async fn create_flow_appends_the_row_and_reenables_the_button() {
    LocalSet::new()
        .run_until(async {
            let fx = fixture();
            init_all(&fx).await;

            fx.app.handle_key(KeyInput::Char('n'));
            assert!(screen(&fx.app).contains("unavailable"));
            fx.app.handle_key(KeyInput::Tab);
            fx.app.handle_key(KeyInput::Down);
            fx.app.handle_key(KeyInput::Enter);
            drain().await;

            assert!(!fx.app.is_editing());
            assert_eq!(fx.service.stored().len(), 4);
            let rendered = screen(&fx.app);
            assert!(!rendered.contains("unavailable"), "{rendered}");
            // The blank draft covers the hour after sample_now, so the new
            // flight sorts between the current flight and the drive.
            let flight = rendered.find("11:00 — 13:00").expect("flight row");
            let created = rendered.find("12:00 — 13:00").expect("created row");
            let drive = rendered.find("10:00 — 12:00").expect("drive row");
            assert!(flight < created && created < drive, "{rendered}");
        })
        .await;
}

#[tokio::test]
async fn escape_on_the_create_editor_reenables_the_button() {
    LocalSet::new()
        .run_until(async {
            let fx = fixture();
            init_all(&fx).await;

            fx.app.handle_key(KeyInput::Char('n'));
            assert!(fx.app.is_editing());
            fx.app.handle_key(KeyInput::Escape);

            assert!(!fx.app.is_editing());
            let rendered = screen(&fx.app);
            assert!(!rendered.contains("──── New event ────"), "{rendered}");
            assert!(!rendered.contains("unavailable"), "{rendered}");
        })
        .await;
}

// ---------------------------------------------------------------------------
// Filters and selection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn filter_keys_rewire_the_board() {
    LocalSet::new()
        .run_until(async {
            let fx = fixture();
            init_all(&fx).await;

            fx.app.handle_key(KeyInput::Char('4'));
            let past = screen(&fx.app);
            assert!(past.contains("[4:Past]"), "{past}");
            assert!(past.contains("10:00 — 11:00"), "{past}");
            assert!(!past.contains("11:00 — 13:00"), "{past}");

            fx.app.handle_key(KeyInput::Char('2'));
            let future = screen(&fx.app);
            assert!(future.contains("[2:Future]"), "{future}");
            assert!(future.contains("10:00 — 12:00"), "{future}");
            assert!(!future.contains("10:00 — 11:00"), "{future}");

            fx.app.handle_key(KeyInput::Char('1'));
            let all = screen(&fx.app);
            for window in ["10:00 — 11:00", "11:00 — 13:00", "10:00 — 12:00"] {
                assert!(all.contains(window), "{all}");
            }
        })
        .await;
}

#[tokio::test]
async fn new_button_resets_the_filter_first() {
    LocalSet::new()
        .run_until(async {
            let fx = fixture();
            init_all(&fx).await;

            fx.app.handle_key(KeyInput::Char('4'));
            fx.app.handle_key(KeyInput::Char('n'));

            let rendered = screen(&fx.app);
            assert!(rendered.contains("──── New event ────"), "{rendered}");
            assert!(rendered.contains("[1:Everything]"), "{rendered}");
            assert!(rendered.contains("11:00 — 13:00"), "all rows back");
        })
        .await;
}

#[tokio::test]
async fn selection_clamps_to_the_visible_rows() {
    LocalSet::new()
        .run_until(async {
            let fx = fixture();
            init_all(&fx).await;

            let highlighted = |s: &str| -> Vec<String> {
                s.lines()
                    .filter(|line| line.starts_with("▶ "))
                    .map(str::to_owned)
                    .collect()
            };

            press(&fx.app, &[KeyInput::Down; 5]);
            let down = screen(&fx.app);
            let marked = highlighted(&down);
            assert_eq!(marked.len(), 1, "{down}");
            assert!(marked[0].contains("10:00 — 12:00"), "should sit on drive");

            press(&fx.app, &[KeyInput::Up; 9]);
            let up = screen(&fx.app);
            let marked = highlighted(&up);
            assert_eq!(marked.len(), 1, "{up}");
            assert!(marked[0].contains("10:00 — 11:00"), "should sit on taxi");
        })
        .await;
}
