use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==============================================================================
// Tracks
// ==============================================================================

/// The creation shape of a track, as accepted by `POST /tracks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackBase {
    pub name: String,
    /// Length in seconds. Must be positive.
    pub length: i32,
    pub genre: String,
    pub year: i32,
    /// A track may exist without belonging to any album.
    #[serde(default)]
    pub album_id: Option<i64>,
}

/// A row of the `tracks` table, as exposed to API consumers.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Track {
    pub id: i64,
    pub name: String,
    pub length: i32,
    pub genre: String,
    pub year: i32,
    pub album_id: Option<i64>,
}

/// Body of `PATCH /tracks/{id}`. A missing or `null` album clears the link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackOnlyAlbum {
    #[serde(default)]
    pub album_id: Option<i64>,
}

/// The change record returned after reassigning a track's album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumChange {
    pub id: i64,
    pub album_id: Option<i64>,
}

// ==============================================================================
// Artists
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistBase {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub description: String,
}

// ==============================================================================
// Albums
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumBase {
    pub name: String,
    pub artist_id: i64,
    pub year: i32,
    pub genre: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Album {
    pub id: i64,
    pub name: String,
    pub artist_id: i64,
    pub year: i32,
    pub genre: String,
}

// ==============================================================================
// Composite views
// ==============================================================================

/// A track together with every artist linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackWithArtists {
    #[serde(flatten)]
    pub track: Track,
    #[serde(default)]
    pub artists: Vec<Artist>,
}

/// An artist together with every track linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistWithTracks {
    #[serde(flatten)]
    pub artist: Artist,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Track {
    pub fn with_artists(self, artists: Vec<Artist>) -> TrackWithArtists {
        TrackWithArtists { track: self, artists }
    }
}

impl Artist {
    pub fn with_tracks(self, tracks: Vec<Track>) -> ArtistWithTracks {
        ArtistWithTracks { artist: self, tracks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_track() -> Track {
        Track {
            id: 1,
            name: "T".to_string(),
            length: 200,
            genre: "g".to_string(),
            year: 2020,
            album_id: None,
        }
    }

    #[test]
    fn track_base_accepts_missing_album_id() {
        let base: TrackBase =
            serde_json::from_value(json!({"name": "T", "length": 200, "genre": "g", "year": 2020}))
                .unwrap();
        assert_eq!(base.album_id, None);
    }

    #[test]
    fn track_base_rejects_mistyped_length() {
        let result = serde_json::from_value::<TrackBase>(
            json!({"name": "T", "length": "long", "genre": "g", "year": 2020}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn track_with_artists_is_flattened() {
        let artist = Artist {
            id: 1,
            name: "A".to_string(),
            description: "d".to_string(),
        };
        let value = serde_json::to_value(sample_track().with_artists(vec![artist])).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1, "name": "T", "length": 200, "genre": "g", "year": 2020, "album_id": null,
                "artists": [{"id": 1, "name": "A", "description": "d"}]
            })
        );
    }

    #[test]
    fn patch_body_null_clears_album() {
        let body: TrackOnlyAlbum = serde_json::from_value(json!({"album_id": null})).unwrap();
        assert_eq!(body.album_id, None);
        let body: TrackOnlyAlbum = serde_json::from_value(json!({"album_id": 3})).unwrap();
        assert_eq!(body.album_id, Some(3));
    }
}
