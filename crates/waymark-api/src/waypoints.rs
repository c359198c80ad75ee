#![forbid(unsafe_code)]

//! `points` resource: list, create, update, delete.

use futures::future::LocalBoxFuture;

use waymark_core::{NewWaypoint, Waypoint, WaypointId};
use waymark_model::{GatewayResult, WaypointsGateway};

use crate::client::ApiClient;
use crate::dto::{NewWaypointDto, WaypointDto};

pub struct WaypointsService {
    client: ApiClient,
}

impl WaypointsService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl WaypointsGateway for WaypointsService {
    fn list(&self) -> LocalBoxFuture<'_, GatewayResult<Vec<Waypoint>>> {
        Box::pin(async move {
            let dtos: Vec<WaypointDto> = self.client.get_json("points").await?;
            Ok(dtos.into_iter().map(Waypoint::from).collect())
        })
    }

    fn create<'a>(
        &'a self,
        waypoint: &'a NewWaypoint,
    ) -> LocalBoxFuture<'a, GatewayResult<Waypoint>> {
        Box::pin(async move {
            let body = NewWaypointDto::from(waypoint);
            let dto: WaypointDto = self.client.post_json("points", &body).await?;
            Ok(Waypoint::from(dto))
        })
    }

    fn update<'a>(&'a self, waypoint: &'a Waypoint) -> LocalBoxFuture<'a, GatewayResult<Waypoint>> {
        Box::pin(async move {
            let body = WaypointDto::from(waypoint);
            let path = format!("points/{}", waypoint.id);
            let dto: WaypointDto = self.client.put_json(&path, &body).await?;
            Ok(Waypoint::from(dto))
        })
    }

    fn delete<'a>(&'a self, id: &'a WaypointId) -> LocalBoxFuture<'a, GatewayResult<()>> {
        Box::pin(async move { self.client.delete(&format!("points/{id}")).await })
    }
}
