#![forbid(unsafe_code)]

//! `offers` resource: read-only catalog grouped per event kind.

use futures::future::LocalBoxFuture;

use waymark_core::OfferBundle;
use waymark_model::{GatewayResult, OffersGateway};

use crate::client::ApiClient;
use crate::dto::OfferBundleDto;

pub struct OffersService {
    client: ApiClient,
}

impl OffersService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl OffersGateway for OffersService {
    fn list(&self) -> LocalBoxFuture<'_, GatewayResult<Vec<OfferBundle>>> {
        Box::pin(async move {
            let dtos: Vec<OfferBundleDto> = self.client.get_json("offers").await?;
            Ok(dtos.into_iter().map(OfferBundle::from).collect())
        })
    }
}
