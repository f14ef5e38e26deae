// =============================================================================
// Parque Backend - Nearby-Point Finder
// =============================================================================
// Ranks a park's points of interest by great-circle distance to a visitor
// and slices the park's species list.
//
// Table of Contents:
// 1. Constants
// 2. Errors
// 3. Input Parsing
// 4. Haversine Distance
// 5. Finder
// =============================================================================

use serde::Deserialize;

use crate::models::{Coordinate, NearbyPoint, NearbyResult, Point, Species};

// -----------------------------------------------------------------------------
// 1. Constants
// -----------------------------------------------------------------------------

/// Mean Earth radius used by the spherical approximation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius used when the request omits one or sends something unusable.
pub const DEFAULT_RADIUS_KM: f64 = 2.0;

pub const MAX_NEARBY_POINTS: usize = 15;

pub const MAX_NEARBY_SPECIES: usize = 20;

// -----------------------------------------------------------------------------
// 2. Errors
// -----------------------------------------------------------------------------

/// Rejected visitor coordinate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NearbyError {
    #[error("Missing query parameter: {0}")]
    MissingCoordinate(&'static str),

    #[error("Query parameter {field} is not a finite number: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("Origin coordinate must be finite")]
    NonFiniteOrigin,
}

// -----------------------------------------------------------------------------
// 3. Input Parsing
// -----------------------------------------------------------------------------

/// Raw query string of `GET /parks/{parkId}/nearby`.
///
/// Values stay as strings so that malformed numbers reach [`NearbyQuery`]
/// instead of failing inside the extractor.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NearbyParams {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

fn parse_component(field: &'static str, raw: Option<&str>) -> Result<f64, NearbyError> {
    let raw = raw.ok_or(NearbyError::MissingCoordinate(field))?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| NearbyError::InvalidCoordinate {
            field,
            value: raw.to_string(),
        })
}

impl Coordinate {
    /// Parse a coordinate from raw `lat`/`lng` strings.
    pub fn parse(lat: Option<&str>, lng: Option<&str>) -> Result<Self, NearbyError> {
        Ok(Self::new(
            parse_component("lat", lat)?,
            parse_component("lng", lng)?,
        ))
    }
}

/// Parse the search radius. Never fails: anything that is not a positive
/// finite number falls back to [`DEFAULT_RADIUS_KM`].
pub fn parse_radius(raw: Option<&str>) -> f64 {
    normalize_radius(raw.and_then(|r| r.trim().parse::<f64>().ok()))
}

fn normalize_radius(radius_km: Option<f64>) -> f64 {
    radius_km
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(DEFAULT_RADIUS_KM)
}

/// A validated nearby search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    origin: Coordinate,
    radius_km: f64,
}

impl NearbyQuery {
    pub fn new(origin: Coordinate, radius_km: Option<f64>) -> Result<Self, NearbyError> {
        if !origin.is_finite() {
            return Err(NearbyError::NonFiniteOrigin);
        }
        Ok(Self {
            origin,
            radius_km: normalize_radius(radius_km),
        })
    }

    pub fn from_params(params: &NearbyParams) -> Result<Self, NearbyError> {
        let origin = Coordinate::parse(params.lat.as_deref(), params.lng.as_deref())?;
        Self::new(origin, Some(parse_radius(params.radius.as_deref())))
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

// -----------------------------------------------------------------------------
// 4. Haversine Distance
// -----------------------------------------------------------------------------

/// Great-circle distance in kilometres on a sphere of [`EARTH_RADIUS_KM`].
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    // Rounding can push h just past 1 for near-antipodal pairs
    let h = ((d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2))
    .min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

// -----------------------------------------------------------------------------
// 5. Finder
// -----------------------------------------------------------------------------

/// Points within the radius, nearest first and capped at
/// [`MAX_NEARBY_POINTS`], plus the first [`MAX_NEARBY_SPECIES`] species.
///
/// Points at the same distance keep their input order.
pub fn find_nearby(query: &NearbyQuery, points: Vec<Point>, species: Vec<Species>) -> NearbyResult {
    let mut ranked: Vec<NearbyPoint> = points
        .into_iter()
        .map(|point| {
            let distance_km = haversine_km(query.origin, point.coordinate());
            NearbyPoint { point, distance_km }
        })
        .filter(|p| p.distance_km <= query.radius_km)
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(MAX_NEARBY_POINTS);

    let mut nearby_species = species;
    nearby_species.truncate(MAX_NEARBY_SPECIES);

    NearbyResult {
        points: ranked,
        nearby_species,
    }
}
