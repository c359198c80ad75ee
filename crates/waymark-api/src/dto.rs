#![forbid(unsafe_code)]

//! Wire shapes of the itinerary service.
//!
//! The service speaks snake_case JSON with RFC 3339 timestamps; the only
//! field whose name the domain cannot reuse is `type`, which Rust reserves.
//! Conversions are total in both directions. [`NewWaypointDto`] is the
//! create payload: identical to [`WaypointDto`] minus the id, which only
//! the service may assign.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use waymark_core::{
    Destination, DestinationId, EventKind, NewWaypoint, Offer, OfferBundle, OfferId, Picture,
    Waypoint, WaypointId,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointDto {
    pub id: WaypointId,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub destination: DestinationId,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    pub offers: Vec<OfferId>,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWaypointDto {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub destination: DestinationId,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    pub offers: Vec<OfferId>,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureDto {
    pub src: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationDto {
    pub id: DestinationId,
    pub name: String,
    pub description: String,
    pub pictures: Vec<PictureDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferDto {
    pub id: OfferId,
    pub title: String,
    pub price: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferBundleDto {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub offers: Vec<OfferDto>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<WaypointDto> for Waypoint {
    fn from(dto: WaypointDto) -> Self {
        Waypoint {
            id: dto.id,
            kind: dto.kind,
            destination: dto.destination,
            date_from: dto.date_from,
            date_to: dto.date_to,
            base_price: dto.base_price,
            offers: dto.offers,
            is_favorite: dto.is_favorite,
        }
    }
}

impl From<&Waypoint> for WaypointDto {
    fn from(waypoint: &Waypoint) -> Self {
        WaypointDto {
            id: waypoint.id.clone(),
            kind: waypoint.kind,
            destination: waypoint.destination.clone(),
            date_from: waypoint.date_from,
            date_to: waypoint.date_to,
            base_price: waypoint.base_price,
            offers: waypoint.offers.clone(),
            is_favorite: waypoint.is_favorite,
        }
    }
}

impl From<&NewWaypoint> for NewWaypointDto {
    fn from(waypoint: &NewWaypoint) -> Self {
        NewWaypointDto {
            kind: waypoint.kind,
            destination: waypoint.destination.clone(),
            date_from: waypoint.date_from,
            date_to: waypoint.date_to,
            base_price: waypoint.base_price,
            offers: waypoint.offers.clone(),
            is_favorite: waypoint.is_favorite,
        }
    }
}

impl From<PictureDto> for Picture {
    fn from(dto: PictureDto) -> Self {
        Picture {
            src: dto.src,
            description: dto.description,
        }
    }
}

impl From<DestinationDto> for Destination {
    fn from(dto: DestinationDto) -> Self {
        Destination {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            pictures: dto.pictures.into_iter().map(Picture::from).collect(),
        }
    }
}

impl From<OfferDto> for Offer {
    fn from(dto: OfferDto) -> Self {
        Offer {
            id: dto.id,
            title: dto.title,
            price: dto.price,
        }
    }
}

impl From<OfferBundleDto> for OfferBundle {
    fn from(dto: OfferBundleDto) -> Self {
        OfferBundle {
            kind: dto.kind,
            offers: dto.offers.into_iter().map(Offer::from).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
