// =============================================================================
// Parque Backend - Parks API
// =============================================================================
// Visitor-facing park queries
// =============================================================================

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

use crate::error::ApiError;
use crate::models::NearbyResult;
use crate::nearby::{find_nearby, NearbyParams, NearbyQuery};
use crate::store::attach_species;
use crate::AppState;

/// Points of interest and species near the visitor.
///
/// `GET /parks/:park_id/nearby?lat=&lng=&radius=`
pub async fn get_nearby(
    State(state): State<AppState>,
    Path(park_id): Path<String>,
    params: Result<Query<NearbyParams>, QueryRejection>,
) -> Result<Json<NearbyResult>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    // Reject bad coordinates before touching the store
    let query = NearbyQuery::from_params(&params)?;

    state
        .store
        .find_park(&park_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Park {park_id} not found")))?;

    let (mut points, species, links) = tokio::try_join!(
        state.store.list_points(&park_id),
        state.store.list_species(&park_id),
        state.store.list_species_links(&park_id),
    )?;
    attach_species(&mut points, &species, &links);
    let candidates = points.len();

    let result = find_nearby(&query, points, species);
    tracing::debug!(
        park_id = %park_id,
        store = state.store.name(),
        radius_km = query.radius_km(),
        candidates,
        matched = result.points.len(),
        "Nearby query served"
    );

    Ok(Json(result))
}
