#![forbid(unsafe_code)]

//! `destinations` resource: read-only catalog.

use futures::future::LocalBoxFuture;

use waymark_core::Destination;
use waymark_model::{DestinationsGateway, GatewayResult};

use crate::client::ApiClient;
use crate::dto::DestinationDto;

pub struct DestinationsService {
    client: ApiClient,
}

impl DestinationsService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl DestinationsGateway for DestinationsService {
    fn list(&self) -> LocalBoxFuture<'_, GatewayResult<Vec<Destination>>> {
        Box::pin(async move {
            let dtos: Vec<DestinationDto> = self.client.get_json("destinations").await?;
            Ok(dtos.into_iter().map(Destination::from).collect())
        })
    }
}
