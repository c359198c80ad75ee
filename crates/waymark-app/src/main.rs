#![forbid(unsafe_code)]

//! Binary entry point: configuration, logging, the HTTP-backed models,
//! and the terminal event loop.

use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use waymark_api::{ApiClient, DestinationsService, OffersService, WaypointsService};
use waymark_app::{App, Config, Models};
use waymark_model::{DestinationsModel, FilterModel, OffersModel, WaypointsModel};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

fn init_tracing(filter: &str) {
    // Stdout belongs to the board; logs go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_filter);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(config))
}

async fn run(config: Config) -> anyhow::Result<()> {
    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
    let api = ApiClient::new(http, config.api_base, config.api_token);

    let models = Models {
        waypoints: Rc::new(WaypointsModel::new(Rc::new(WaypointsService::new(
            api.clone(),
        )))),
        destinations: Rc::new(DestinationsModel::new(Rc::new(DestinationsService::new(
            api.clone(),
        )))),
        offers: Rc::new(OffersModel::new(Rc::new(OffersService::new(api)))),
        filter: Rc::new(FilterModel::new()),
    };

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async move {
            let app = App::new(models.clone(), Rc::new(Utc::now));

            // The loads race each other; the app's readiness barriers
            // and the board's loading state absorb any ordering.
            {
                let waypoints = Rc::clone(&models.waypoints);
                tokio::task::spawn_local(async move { waypoints.init().await });
            }
            {
                let destinations = Rc::clone(&models.destinations);
                tokio::task::spawn_local(async move { destinations.init().await });
            }
            {
                let offers = Rc::clone(&models.offers);
                tokio::task::spawn_local(async move { offers.init().await });
            }

            waymark_app::terminal::run(app).await?;
            Ok(())
        })
        .await
}
