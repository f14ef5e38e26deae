// =============================================================================
// Parque Backend - Park Records
// =============================================================================
// Table of Contents:
// 1. Coordinate
// 2. Stored Records (Park, Point, Species, SpeciesPhoto)
// 3. Nearby Projections (NearbyPoint, NearbyResult)
// =============================================================================

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// 1. Coordinate
// -----------------------------------------------------------------------------

/// A latitude/longitude pair in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers. Range is not checked.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

// -----------------------------------------------------------------------------
// 2. Stored Records
// -----------------------------------------------------------------------------

/// Park model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Park {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub bounds_lat1: f64,
    pub bounds_lng1: f64,
    pub bounds_lat2: f64,
    pub bounds_lng2: f64,
    pub map_tile_url: Option<String>,
    pub active: bool,
}

/// Point of interest inside a park.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: String,
    pub park_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub lat: f64,
    pub lng: f64,
    pub description: Option<String>,
    pub sort_order: i64,
    /// Species linked to this point, filled in by the store.
    #[sqlx(skip)]
    #[serde(default)]
    pub species: Vec<Species>,
}

impl Point {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Flora or fauna entry of a park. Species have no location of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    pub id: String,
    pub park_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[sqlx(skip)]
    #[serde(default)]
    pub photos: Vec<SpeciesPhoto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesPhoto {
    pub id: String,
    pub species_id: String,
    pub url: String,
    pub sort_order: i64,
}

// -----------------------------------------------------------------------------
// 3. Nearby Projections
// -----------------------------------------------------------------------------

/// A stored point annotated with its distance to the requester.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPoint {
    #[serde(flatten)]
    pub point: Point,
    pub distance_km: f64,
}

/// Response body of the nearby query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResult {
    pub points: Vec<NearbyPoint>,
    pub nearby_species: Vec<Species>,
}
