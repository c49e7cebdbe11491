use crate::error::CoreError;
use crate::schemas::{AlbumBase, ArtistBase, TrackBase, TrackOnlyAlbum};

/// Semantic checks on a creation shape that JSON typing alone cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), CoreError>;
}

fn non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            field.to_string(),
            "must not be blank".to_string(),
        ));
    }
    Ok(())
}

fn positive(field: &str, value: i64) -> Result<(), CoreError> {
    if value <= 0 {
        return Err(CoreError::InvalidInput(
            field.to_string(),
            format!("must be positive, got {value}"),
        ));
    }
    Ok(())
}

impl Validate for TrackBase {
    fn validate(&self) -> Result<(), CoreError> {
        non_blank("name", &self.name)?;
        positive("length", self.length.into())?;
        if let Some(album_id) = self.album_id {
            positive("album_id", album_id)?;
        }
        Ok(())
    }
}

impl Validate for TrackOnlyAlbum {
    fn validate(&self) -> Result<(), CoreError> {
        match self.album_id {
            Some(album_id) => positive("album_id", album_id),
            None => Ok(()),
        }
    }
}

impl Validate for ArtistBase {
    fn validate(&self) -> Result<(), CoreError> {
        non_blank("name", &self.name)
    }
}

impl Validate for AlbumBase {
    fn validate(&self) -> Result<(), CoreError> {
        non_blank("name", &self.name)?;
        positive("artist_id", self.artist_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(length: i32) -> TrackBase {
        TrackBase {
            name: "T".to_string(),
            length,
            genre: "g".to_string(),
            year: 2020,
            album_id: None,
        }
    }

    #[test]
    fn track_length_must_be_positive() {
        assert!(track(200).validate().is_ok());
        assert_eq!(
            track(0).validate(),
            Err(CoreError::InvalidInput(
                "length".to_string(),
                "must be positive, got 0".to_string()
            ))
        );
    }

    #[test]
    fn album_reassignment_rejects_non_positive_ids() {
        assert!(TrackOnlyAlbum { album_id: None }.validate().is_ok());
        assert!(TrackOnlyAlbum { album_id: Some(3) }.validate().is_ok());
        assert_eq!(
            TrackOnlyAlbum { album_id: Some(-1) }.validate(),
            Err(CoreError::InvalidInput(
                "album_id".to_string(),
                "must be positive, got -1".to_string()
            ))
        );
    }

    #[test]
    fn blank_artist_name_is_rejected() {
        let artist = ArtistBase {
            name: "   ".to_string(),
            description: "d".to_string(),
        };
        assert!(matches!(artist.validate(), Err(CoreError::InvalidInput(field, _)) if field == "name"));
    }

    #[test]
    fn album_requires_an_artist_reference() {
        let album = AlbumBase {
            name: "Album".to_string(),
            artist_id: 0,
            year: 2020,
            genre: "g".to_string(),
        };
        assert!(album.validate().is_err());
    }
}
