use core_types::{Album, AlbumBase, Artist, ArtistBase, Track, TrackBase, Validate};
use sqlx::query::QueryScalar;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::FromRow;

/// An `INSERT ... RETURNING id` query awaiting its values.
pub type InsertQuery<'q> = QueryScalar<'q, Sqlite, i64, SqliteArguments<'q>>;

/// Maps an entity's view shape onto its table.
///
/// The implementing type is the row/view itself (it must decode from a row
/// holding `id` followed by `COLUMNS`); `Create` is the shape accepted when
/// inserting a new row. `COLUMNS` and the order of binds in `bind_insert`
/// must agree.
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static {
    type Create: Validate + Send + Sync + 'static;

    /// Human-readable name used in not-found messages.
    const NAME: &'static str;
    const TABLE: &'static str;
    /// Every column except the generated `id`.
    const COLUMNS: &'static [&'static str];

    fn bind_insert<'q>(query: InsertQuery<'q>, input: &'q Self::Create) -> InsertQuery<'q>;

    /// `id` plus `COLUMNS`, each qualified with `alias.` when an alias is given.
    fn select_list(alias: Option<&str>) -> String {
        std::iter::once("id")
            .chain(Self::COLUMNS.iter().copied())
            .map(|column| match alias {
                Some(alias) => format!("{alias}.{column} AS {column}"),
                None => column.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn select_sql() -> String {
        format!("SELECT {} FROM {}", Self::select_list(None), Self::TABLE)
    }

    fn insert_sql() -> String {
        let placeholders = vec!["?"; Self::COLUMNS.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
            Self::TABLE,
            Self::COLUMNS.join(", "),
            placeholders
        )
    }
}

impl Entity for Track {
    type Create = TrackBase;

    const NAME: &'static str = "Track";
    const TABLE: &'static str = "tracks";
    const COLUMNS: &'static [&'static str] = &["name", "length", "genre", "year", "album_id"];

    fn bind_insert<'q>(query: InsertQuery<'q>, input: &'q TrackBase) -> InsertQuery<'q> {
        query
            .bind(input.name.as_str())
            .bind(input.length)
            .bind(input.genre.as_str())
            .bind(input.year)
            .bind(input.album_id)
    }
}

impl Entity for Artist {
    type Create = ArtistBase;

    const NAME: &'static str = "Artist";
    const TABLE: &'static str = "artists";
    const COLUMNS: &'static [&'static str] = &["name", "description"];

    fn bind_insert<'q>(query: InsertQuery<'q>, input: &'q ArtistBase) -> InsertQuery<'q> {
        query
            .bind(input.name.as_str())
            .bind(input.description.as_str())
    }
}

impl Entity for Album {
    type Create = AlbumBase;

    const NAME: &'static str = "Album";
    const TABLE: &'static str = "albums";
    const COLUMNS: &'static [&'static str] = &["name", "artist_id", "year", "genre"];

    fn bind_insert<'q>(query: InsertQuery<'q>, input: &'q AlbumBase) -> InsertQuery<'q> {
        query
            .bind(input.name.as_str())
            .bind(input.artist_id)
            .bind(input.year)
            .bind(input.genre.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_sql_lists_columns_in_bind_order() {
        assert_eq!(
            Artist::select_sql(),
            "SELECT id, name, description FROM artists"
        );
        assert_eq!(
            Track::insert_sql(),
            "INSERT INTO tracks (name, length, genre, year, album_id) VALUES (?, ?, ?, ?, ?) RETURNING id"
        );
        assert_eq!(
            Artist::select_list(Some("m")),
            "m.id AS id, m.name AS name, m.description AS description"
        );
    }
}
