// =============================================================================
// Parque Backend - Demo Park
// =============================================================================
// "Parque Nacional Demo": three points of interest and three species, used to
// seed a fresh database (SEED_DEMO=true) and as test fixture.
// =============================================================================

use crate::models::{Park, Point, Species};
use crate::store::MemoryStore;

pub const DEMO_PARK_ID: &str = "parque-demo-1";

/// (point id, species id) associations.
pub const DEMO_LINKS: [(&str, &str); 3] = [
    ("punto-mirador-1", "especie-1"),
    ("punto-mirador-1", "especie-2"),
    ("punto-sendero-1", "especie-1"),
];

pub fn demo_park() -> Park {
    Park {
        id: DEMO_PARK_ID.to_string(),
        name: "Parque Nacional Demo".to_string(),
        description: Some(
            "Parque de demostración para la plataforma digital. Escanea el QR en los totems para explorar."
                .to_string(),
        ),
        bounds_lat1: -41.15,
        bounds_lng1: -71.35,
        bounds_lat2: -41.08,
        bounds_lng2: -71.25,
        map_tile_url: None,
        active: true,
    }
}

fn point(id: &str, name: &str, kind: &str, lat: f64, lng: f64, description: &str, sort_order: i64) -> Point {
    Point {
        id: id.to_string(),
        park_id: DEMO_PARK_ID.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        lat,
        lng,
        description: Some(description.to_string()),
        sort_order,
        species: Vec::new(),
    }
}

fn species(id: &str, name: &str, kind: &str, description: &str) -> Species {
    Species {
        id: id.to_string(),
        park_id: DEMO_PARK_ID.to_string(),
        name: name.to_string(),
        kind: kind.to_string(),
        description: Some(description.to_string()),
        image_url: None,
        photos: Vec::new(),
    }
}

/// Demo points. Species links are in [`DEMO_LINKS`].
pub fn demo_points() -> Vec<Point> {
    vec![
        point(
            "punto-mirador-1",
            "Mirador Norte",
            "mirador",
            -41.12,
            -71.30,
            "Vista panorámica del lago y la cordillera.",
            1,
        ),
        point(
            "punto-descanso-1",
            "Área de descanso Central",
            "descanso",
            -41.10,
            -71.28,
            "Zona con bancos y sombra. Ideal para reponer energías.",
            2,
        ),
        point(
            "punto-sendero-1",
            "Inicio Sendero Bosque",
            "inicio_sendero",
            -41.11,
            -71.29,
            "Comienzo del sendero que recorre el bosque de arrayanes.",
            3,
        ),
    ]
}

pub fn demo_species() -> Vec<Species> {
    vec![
        species("especie-1", "Arrayán", "árbol", "Árbol autóctono de corteza color canela."),
        species("especie-2", "Huemul", "animal", "Ciervo nativo de la Patagonia."),
        species("especie-3", "Notro", "planta", "Arbusto de flores rojas."),
    ]
}

/// Fill the demo dataset into a [`MemoryStore`], links included.
pub async fn load_demo(store: &MemoryStore) {
    store.insert_park(demo_park()).await;
    for point in demo_points() {
        store.insert_point(point).await;
    }
    for species in demo_species() {
        store.insert_species(species).await;
    }
    for (point_id, species_id) in DEMO_LINKS {
        store.insert_link(DEMO_PARK_ID, point_id, species_id).await;
    }
}
