// =============================================================================
// Parque Backend - Database Layer
// =============================================================================

use std::collections::HashMap;

use axum::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::models::{Park, Point, Species, SpeciesPhoto};
use crate::seed;
use crate::store::{ParkStore, SpeciesLink, StoreResult};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

impl Database {
    /// Create a new database connection pool.
    pub async fn new(url: &str) -> Result<Self, sqlx::Error> {
        // Each connection to an in-memory database sees its own database
        if is_in_memory(url) {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(url)
                .await?;
            return Ok(Self { pool });
        }

        // Add create_if_missing option for SQLite
        let url_with_options = if url.starts_with("sqlite:") && !url.contains('?') {
            format!("{}?mode=rwc", url)
        } else if url.starts_with("sqlite:") && !url.contains("mode=") {
            format!("{}&mode=rwc", url)
        } else {
            url.to_string()
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url_with_options)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS parks (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                bounds_lat1 REAL NOT NULL,
                bounds_lng1 REAL NOT NULL,
                bounds_lat2 REAL NOT NULL,
                bounds_lng2 REAL NOT NULL,
                map_tile_url TEXT,
                active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS points (
                id TEXT PRIMARY KEY,
                park_id TEXT NOT NULL REFERENCES parks(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                lat REAL NOT NULL,
                lng REAL NOT NULL,
                description TEXT,
                sort_order INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS species (
                id TEXT PRIMARY KEY,
                park_id TEXT NOT NULL REFERENCES parks(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                description TEXT,
                image_url TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Point <-> species association
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS point_species (
                point_id TEXT NOT NULL REFERENCES points(id) ON DELETE CASCADE,
                species_id TEXT NOT NULL REFERENCES species(id) ON DELETE CASCADE,
                PRIMARY KEY (point_id, species_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS species_photos (
                id TEXT PRIMARY KEY,
                species_id TEXT NOT NULL REFERENCES species(id) ON DELETE CASCADE,
                url TEXT NOT NULL,
                sort_order INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Create indexes for performance
        let _ = sqlx::query("CREATE INDEX IF NOT EXISTS idx_points_park ON points(park_id)")
            .execute(&self.pool)
            .await;
        let _ = sqlx::query("CREATE INDEX IF NOT EXISTS idx_species_park ON species(park_id)")
            .execute(&self.pool)
            .await;
        let _ = sqlx::query("CREATE INDEX IF NOT EXISTS idx_point_species_species ON point_species(species_id)")
            .execute(&self.pool)
            .await;
        let _ = sqlx::query("CREATE INDEX IF NOT EXISTS idx_species_photos_species ON species_photos(species_id)")
            .execute(&self.pool)
            .await;

        tracing::info!("Database migrations complete");
        Ok(())
    }

    // =========================================================================
    // Write Methods (seeding)
    // =========================================================================

    /// Insert a park unless its ID already exists.
    pub async fn insert_park(&self, park: &Park) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO parks (id, name, description, bounds_lat1, bounds_lng1, bounds_lat2, bounds_lng2, map_tile_url, active)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&park.id)
        .bind(&park.name)
        .bind(&park.description)
        .bind(park.bounds_lat1)
        .bind(park.bounds_lng1)
        .bind(park.bounds_lat2)
        .bind(park.bounds_lng2)
        .bind(&park.map_tile_url)
        .bind(park.active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a point unless its ID already exists. Linked species are ignored.
    pub async fn insert_point(&self, point: &Point) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO points (id, park_id, name, kind, lat, lng, description, sort_order)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&point.id)
        .bind(&point.park_id)
        .bind(&point.name)
        .bind(&point.kind)
        .bind(point.lat)
        .bind(point.lng)
        .bind(&point.description)
        .bind(point.sort_order)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a species unless its ID already exists. Photos are ignored.
    pub async fn insert_species(&self, species: &Species) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO species (id, park_id, name, kind, description, image_url)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&species.id)
        .bind(&species.park_id)
        .bind(&species.name)
        .bind(&species.kind)
        .bind(&species.description)
        .bind(&species.image_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn insert_species_photo(&self, photo: &SpeciesPhoto) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO species_photos (id, species_id, url, sort_order)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&photo.id)
        .bind(&photo.species_id)
        .bind(&photo.url)
        .bind(photo.sort_order)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Associate a species with a point. Re-linking is a no-op.
    pub async fn link_species(&self, point_id: &str, species_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT OR IGNORE INTO point_species (point_id, species_id) VALUES (?, ?)")
            .bind(point_id)
            .bind(species_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert the demo park. Safe to run on every start.
    pub async fn seed_demo(&self) -> Result<(), sqlx::Error> {
        self.insert_park(&seed::demo_park()).await?;
        for point in seed::demo_points() {
            self.insert_point(&point).await?;
        }
        for species in seed::demo_species() {
            self.insert_species(&species).await?;
        }
        for (point_id, species_id) in seed::DEMO_LINKS {
            self.link_species(point_id, species_id).await?;
        }

        tracing::info!("Demo park {} seeded", seed::DEMO_PARK_ID);
        Ok(())
    }

    // =========================================================================
    // Read Methods
    // =========================================================================

    /// Photos of every species of a park, grouped by species ID.
    async fn species_photos(&self, park_id: &str) -> Result<HashMap<String, Vec<SpeciesPhoto>>, sqlx::Error> {
        let photos = sqlx::query_as::<_, SpeciesPhoto>(
            r#"
            SELECT sp.id, sp.species_id, sp.url, sp.sort_order FROM species_photos sp
            INNER JOIN species s ON s.id = sp.species_id
            WHERE s.park_id = ?
            ORDER BY sp.sort_order ASC, sp.rowid ASC
            "#,
        )
        .bind(park_id)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<String, Vec<SpeciesPhoto>> = HashMap::new();
        for photo in photos {
            grouped.entry(photo.species_id.clone()).or_default().push(photo);
        }
        Ok(grouped)
    }
}

#[async_trait]
impl ParkStore for Database {
    async fn find_park(&self, id: &str) -> StoreResult<Option<Park>> {
        let park = sqlx::query_as::<_, Park>("SELECT * FROM parks WHERE id = ? AND active = 1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(park)
    }

    async fn list_points(&self, park_id: &str) -> StoreResult<Vec<Point>> {
        let points = sqlx::query_as::<_, Point>(
            "SELECT * FROM points WHERE park_id = ? ORDER BY sort_order ASC, rowid ASC",
        )
        .bind(park_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(points)
    }

    async fn list_species_links(&self, park_id: &str) -> StoreResult<Vec<SpeciesLink>> {
        let links = sqlx::query_as::<_, SpeciesLink>(
            r#"
            SELECT ps.point_id, ps.species_id FROM point_species ps
            INNER JOIN points p ON p.id = ps.point_id
            WHERE p.park_id = ?
            ORDER BY ps.rowid ASC
            "#,
        )
        .bind(park_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }

    async fn list_species(&self, park_id: &str) -> StoreResult<Vec<Species>> {
        let mut species = sqlx::query_as::<_, Species>(
            "SELECT * FROM species WHERE park_id = ? ORDER BY rowid ASC",
        )
        .bind(park_id)
        .fetch_all(&self.pool)
        .await?;

        let mut photos = self.species_photos(park_id).await?;
        for s in &mut species {
            s.photos = photos.remove(&s.id).unwrap_or_default();
        }

        Ok(species)
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::attach_species;

    async fn demo_db() -> Database {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.run_migrations().await.unwrap();
        db.seed_demo().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = demo_db().await;
        db.run_migrations().await.unwrap();
        db.seed_demo().await.unwrap();

        let points = db.list_points(seed::DEMO_PARK_ID).await.unwrap();
        assert_eq!(points.len(), 3);
    }

    #[tokio::test]
    async fn test_find_park() {
        let db = demo_db().await;

        let park = db.find_park(seed::DEMO_PARK_ID).await.unwrap().unwrap();
        assert_eq!(park, seed::demo_park());
        assert!(db.find_park("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inactive_park_is_hidden() {
        let db = demo_db().await;
        let mut park = seed::demo_park();
        park.id = "parque-cerrado".to_string();
        park.active = false;
        db.insert_park(&park).await.unwrap();

        assert!(db.find_park("parque-cerrado").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_links_resolve_to_park_species() {
        let db = demo_db().await;

        let mut points = db.list_points(seed::DEMO_PARK_ID).await.unwrap();
        let ids: Vec<_> = points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["punto-mirador-1", "punto-descanso-1", "punto-sendero-1"]);
        assert!(points.iter().all(|p| p.species.is_empty()));

        let species = db.list_species(seed::DEMO_PARK_ID).await.unwrap();
        let links = db.list_species_links(seed::DEMO_PARK_ID).await.unwrap();
        assert_eq!(
            links[0],
            ("punto-mirador-1".to_string(), "especie-1".to_string())
        );
        attach_species(&mut points, &species, &links);

        let linked: Vec<_> = points[0].species.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(linked, ["Arrayán", "Huemul"]);
        assert!(points[1].species.is_empty());
        assert_eq!(points[2].species.len(), 1);
    }

    #[tokio::test]
    async fn test_species_photos_are_ordered() {
        let db = demo_db().await;
        for (id, order) in [("foto-b", 2), ("foto-a", 1)] {
            db.insert_species_photo(&SpeciesPhoto {
                id: id.to_string(),
                species_id: "especie-2".to_string(),
                url: format!("/uploads/{id}.jpg"),
                sort_order: order,
            })
            .await
            .unwrap();
        }

        let species = db.list_species(seed::DEMO_PARK_ID).await.unwrap();
        let names: Vec<_> = species.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Arrayán", "Huemul", "Notro"]);

        let photos: Vec<_> = species[1].photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(photos, ["foto-a", "foto-b"]);
        assert!(species[0].photos.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_park_has_no_content() {
        let db = demo_db().await;
        assert!(db.list_points("missing").await.unwrap().is_empty());
        assert!(db.list_species("missing").await.unwrap().is_empty());
        assert!(db.list_species_links("missing").await.unwrap().is_empty());
    }
}
