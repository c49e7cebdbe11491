#![allow(dead_code)]

use configuration::DatabaseSettings;
use core_types::{AlbumBase, ArtistBase, TrackBase};
use database::sqlx::SqlitePool;
use database::{Repositories, connect, run_migrations};

/// A fresh, migrated in-memory store per test.
pub async fn setup() -> Repositories {
    setup_with_pool().await.1
}

/// Like [`setup`], also handing back the pool so a test can close it.
pub async fn setup_with_pool() -> (SqlitePool, Repositories) {
    migrated(&DatabaseSettings::in_memory()).await
}

pub async fn migrated(settings: &DatabaseSettings) -> (SqlitePool, Repositories) {
    let pool = connect(settings).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");
    (pool.clone(), Repositories::new(pool))
}

pub fn track(name: &str) -> TrackBase {
    TrackBase {
        name: name.to_string(),
        length: 200,
        genre: "g".to_string(),
        year: 2020,
        album_id: None,
    }
}

pub fn artist(name: &str) -> ArtistBase {
    ArtistBase {
        name: name.to_string(),
        description: "d".to_string(),
    }
}

pub fn album(name: &str, artist_id: i64) -> AlbumBase {
    AlbumBase {
        name: name.to_string(),
        artist_id,
        year: 2021,
        genre: "g".to_string(),
    }
}
