use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use core_types::{AlbumChange, Artist, ArtistWithTracks, Track, TrackOnlyAlbum, TrackWithArtists};
use database::{Entity, Repository};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Response to a successful create.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub ok: bool,
    pub id: i64,
}

/// Response to a relation change.
#[derive(Debug, Serialize, Deserialize)]
pub struct Acknowledged {
    pub ok: bool,
    pub message: String,
}

// ==============================================================================
// Generic entity endpoints
// ==============================================================================

/// # GET /tracks, /artists, /albums
pub async fn get_all<E>(State(repo): State<Repository<E>>) -> Result<Json<Vec<E>>, AppError>
where
    E: Entity + Serialize,
{
    Ok(Json(repo.get_all().await?))
}

/// # POST /tracks, /artists, /albums
pub async fn add_one<E>(
    State(repo): State<Repository<E>>,
    WithRejection(Json(input), _): WithRejection<Json<E::Create>, AppError>,
) -> Result<Json<Created>, AppError>
where
    E: Entity,
    E::Create: DeserializeOwned,
{
    let id = repo.add_one(&input).await?;
    tracing::info!(entity = E::NAME, id, "Created.");
    Ok(Json(Created { ok: true, id }))
}

/// # GET /tracks/:id, /artists/:id, /albums/:id
pub async fn get_one<E>(
    State(repo): State<Repository<E>>,
    Path(id): Path<i64>,
) -> Result<Json<E>, AppError>
where
    E: Entity + Serialize,
{
    Ok(Json(repo.require_by_id(id).await?))
}

// ==============================================================================
// Tracks
// ==============================================================================

/// # PATCH /tracks/:id
/// Reassigns (or clears) the album of a track. Nothing else is touched.
pub async fn update_track_album(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    WithRejection(Json(data), _): WithRejection<Json<TrackOnlyAlbum>, AppError>,
) -> Result<Json<AlbumChange>, AppError> {
    let change = state.db.tracks.update_track_album(id, data).await?;
    Ok(Json(change))
}

// ==============================================================================
// Track / artist relation
// ==============================================================================

/// # POST /tracks/:track_id/artists/:artist_id
pub async fn add_artist_to_track(
    State(state): State<AppState>,
    Path((track_id, artist_id)): Path<(i64, i64)>,
) -> Result<Json<Acknowledged>, AppError> {
    state
        .db
        .track_artists
        .add_association(track_id, artist_id)
        .await?;
    Ok(Json(Acknowledged {
        ok: true,
        message: "Artist added to track successfully".to_string(),
    }))
}

/// # DELETE /tracks/:track_id/artists/:artist_id
pub async fn remove_artist_from_track(
    State(state): State<AppState>,
    Path((track_id, artist_id)): Path<(i64, i64)>,
) -> Result<Json<Acknowledged>, AppError> {
    let removed = state
        .db
        .track_artists
        .remove_association(track_id, artist_id)
        .await?;
    let message = if removed {
        "Artist removed from track successfully"
    } else {
        "Artist was not linked to track"
    };
    Ok(Json(Acknowledged {
        ok: true,
        message: message.to_string(),
    }))
}

/// # GET /tracks/:track_id/artists
pub async fn get_track_artists(
    State(state): State<AppState>,
    Path(track_id): Path<i64>,
) -> Result<Json<Vec<Artist>>, AppError> {
    let artists = state.db.track_artists.get_associations(track_id).await?;
    Ok(Json(artists))
}

/// # GET /artists/:artist_id/tracks
pub async fn get_artist_tracks(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
) -> Result<Json<Vec<Track>>, AppError> {
    let tracks = state.db.artist_tracks.get_associations(artist_id).await?;
    Ok(Json(tracks))
}

/// # GET /tracks/:track_id/with-artists
/// The plain track view merged with the list of its artists.
pub async fn get_track_with_artists(
    State(state): State<AppState>,
    Path(track_id): Path<i64>,
) -> Result<Json<TrackWithArtists>, AppError> {
    let track = state.db.tracks.require_by_id(track_id).await?;
    let artists = state.db.track_artists.get_associations(track_id).await?;
    Ok(Json(track.with_artists(artists)))
}

/// # GET /artists/:artist_id/with-tracks
pub async fn get_artist_with_tracks(
    State(state): State<AppState>,
    Path(artist_id): Path<i64>,
) -> Result<Json<ArtistWithTracks>, AppError> {
    let artist = state.db.artists.require_by_id(artist_id).await?;
    let tracks = state.db.artist_tracks.get_associations(artist_id).await?;
    Ok(Json(artist.with_tracks(tracks)))
}
