pub mod error;
pub mod schemas;
pub mod validate;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use schemas::{
    Album, AlbumBase, AlbumChange, Artist, ArtistBase, ArtistWithTracks, Track, TrackBase,
    TrackOnlyAlbum, TrackWithArtists,
};
pub use validate::Validate;
