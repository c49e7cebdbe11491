//! # Tracklist Database Crate
//!
//! This crate is the application-specific interface to the relational store
//! holding tracks, artists, albums and the track/artist relation.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** all SQL lives here. Callers see typed views from `core-types`.
//! - **One repository, many entities:** [`Repository`] is generic over an
//!   [`Entity`] mapping instead of repeating list/create/lookup per table.
//! - **Relations as values:** [`AssociationRepository`] is driven by a
//!   [`Relation`] descriptor; the track/artist join table is exposed from both
//!   sides by [`TRACK_ARTISTS`] and [`ARTIST_TRACKS`].
//! - **Asynchronous & Pooled:** every call borrows one pooled connection for
//!   the length of its own unit of work.

// Declare the modules that constitute this crate.
pub mod association;
pub mod connection;
pub mod entity;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use association::{
    ARTIST_TRACKS, ArtistTrackRepository, AssociationRepository, Relation, TRACK_ARTISTS,
    TrackArtistRepository,
};
pub use connection::{connect, run_migrations};
pub use entity::Entity;
pub use error::DbError;
pub use repository::Repository;

pub use sqlx;

use core_types::{Album, Artist, Track};
use sqlx::sqlite::SqlitePool;

/// Every repository the application uses, sharing one connection pool.
#[derive(Debug, Clone)]
pub struct Repositories {
    pub tracks: Repository<Track>,
    pub artists: Repository<Artist>,
    pub albums: Repository<Album>,
    pub track_artists: TrackArtistRepository,
    pub artist_tracks: ArtistTrackRepository,
}

impl Repositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            tracks: Repository::new(pool.clone()),
            artists: Repository::new(pool.clone()),
            albums: Repository::new(pool.clone()),
            track_artists: TrackArtistRepository::track_artists(pool.clone()),
            artist_tracks: ArtistTrackRepository::artist_tracks(pool),
        }
    }
}
