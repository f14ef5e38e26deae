//! Data access for park snapshots
//!
//! ## Table of Contents
//! - **ParkStore**: Trait the HTTP layer reads parks through
//! - **attach_species**: Resolves point/species links against a species list
//! - **MemoryStore**: In-memory store for tests and embedding
//!
//! The SQLite implementation lives in [`crate::db`].

use std::collections::HashMap;

use axum::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{Park, Point, Species};

pub type StoreResult<T> = Result<T, StoreError>;

/// `(point id, species id)` association.
pub type SpeciesLink = (String, String);

/// Read-only view of park content.
#[async_trait]
pub trait ParkStore: Send + Sync {
    /// Find an active park by ID.
    async fn find_park(&self, id: &str) -> StoreResult<Option<Park>>;

    /// Points of a park. Linked species are left empty, see [`attach_species`].
    async fn list_points(&self, park_id: &str) -> StoreResult<Vec<Point>>;

    /// Species of a park, each with its photos.
    async fn list_species(&self, park_id: &str) -> StoreResult<Vec<Species>>;

    /// Point/species associations of a park, in link order.
    async fn list_species_links(&self, park_id: &str) -> StoreResult<Vec<SpeciesLink>>;

    /// Store name for logging
    fn name(&self) -> &str;
}

/// Fill each point's `species` from `links`, looking species up in `species`.
/// Links to species outside the list are skipped.
pub fn attach_species(points: &mut [Point], species: &[Species], links: &[SpeciesLink]) {
    if links.is_empty() {
        return;
    }

    let by_id: HashMap<&str, &Species> = species.iter().map(|s| (s.id.as_str(), s)).collect();
    for point in points {
        point.species = links
            .iter()
            .filter(|(point_id, _)| *point_id == point.id)
            .filter_map(|(_, species_id)| by_id.get(species_id.as_str()).map(|s| (*s).clone()))
            .collect();
    }
}

#[derive(Debug, Default)]
struct ParkEntry {
    park: Option<Park>,
    points: Vec<Point>,
    species: Vec<Species>,
    links: Vec<SpeciesLink>,
}

/// In-memory store. Keeps insertion order of points, species and links.
#[derive(Debug, Default)]
pub struct MemoryStore {
    parks: RwLock<HashMap<String, ParkEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_park(&self, park: Park) {
        let id = park.id.clone();
        let mut parks = self.parks.write().await;
        parks.entry(id).or_default().park = Some(park);
    }

    pub async fn insert_point(&self, point: Point) {
        let mut parks = self.parks.write().await;
        parks.entry(point.park_id.clone()).or_default().points.push(point);
    }

    pub async fn insert_species(&self, species: Species) {
        let mut parks = self.parks.write().await;
        parks
            .entry(species.park_id.clone())
            .or_default()
            .species
            .push(species);
    }

    pub async fn insert_link(&self, park_id: &str, point_id: &str, species_id: &str) {
        let mut parks = self.parks.write().await;
        parks
            .entry(park_id.to_string())
            .or_default()
            .links
            .push((point_id.to_string(), species_id.to_string()));
    }
}

#[async_trait]
impl ParkStore for MemoryStore {
    async fn find_park(&self, id: &str) -> StoreResult<Option<Park>> {
        let parks = self.parks.read().await;
        Ok(parks
            .get(id)
            .and_then(|entry| entry.park.clone())
            .filter(|park| park.active))
    }

    async fn list_points(&self, park_id: &str) -> StoreResult<Vec<Point>> {
        let parks = self.parks.read().await;
        Ok(parks
            .get(park_id)
            .map(|entry| entry.points.clone())
            .unwrap_or_default())
    }

    async fn list_species(&self, park_id: &str) -> StoreResult<Vec<Species>> {
        let parks = self.parks.read().await;
        Ok(parks
            .get(park_id)
            .map(|entry| entry.species.clone())
            .unwrap_or_default())
    }

    async fn list_species_links(&self, park_id: &str) -> StoreResult<Vec<SpeciesLink>> {
        let parks = self.parks.read().await;
        Ok(parks
            .get(park_id)
            .map(|entry| entry.links.clone())
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
