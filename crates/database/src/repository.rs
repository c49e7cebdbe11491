use crate::entity::Entity;
use crate::error::DbError;
use core_types::{Album, AlbumChange, Track, TrackOnlyAlbum, Validate};
use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::Transaction;
use std::marker::PhantomData;

/// Opens a transaction that holds SQLite's write lock from its first statement.
///
/// A deferred `BEGIN` that reads before writing cannot wait for the lock and
/// fails with `SQLITE_BUSY` when another writer got there first; `BEGIN
/// IMMEDIATE` queues on the busy timeout instead.
pub(crate) async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, DbError> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// The generic CRUD surface shared by every entity kind.
///
/// One instance per entity type; all of them share the same pool. Every call
/// runs in its own short-lived unit of work.
#[derive(Debug)]
pub struct Repository<E> {
    pool: SqlitePool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Fetches every row of the entity's table. Order is unspecified.
    pub async fn get_all(&self) -> Result<Vec<E>, DbError> {
        let sql = E::select_sql();
        let rows = sqlx::query_as::<_, E>(&sql).fetch_all(&self.pool).await?;
        tracing::debug!(entity = E::NAME, count = rows.len(), "Fetched all rows.");
        Ok(rows)
    }

    /// Validates `input`, inserts it and returns the generated id.
    ///
    /// The insert runs inside a transaction; if the write or the commit fails
    /// the transaction is rolled back and no row is left behind.
    pub async fn add_one(&self, input: &E::Create) -> Result<i64, DbError> {
        input.validate()?;

        let sql = E::insert_sql();
        let mut tx = begin_write(&self.pool).await?;
        let id = E::bind_insert(sqlx::query_scalar(&sql), input)
            .fetch_one(&mut *tx)
            .await?;
        // Dropping `tx` on the error paths above rolls it back.
        tx.commit().await?;

        tracing::debug!(entity = E::NAME, id, "Inserted row.");
        Ok(id)
    }

    /// Point lookup. `Ok(None)` means no row has this id.
    pub async fn get_one_by_id(&self, id: i64) -> Result<Option<E>, DbError> {
        let sql = format!("{} WHERE id = ?", E::select_sql());
        let row = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Like [`Self::get_one_by_id`], but an absent row is a `NotFound` error.
    pub async fn require_by_id(&self, id: i64) -> Result<E, DbError> {
        self.get_one_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(E::NAME, id))
    }
}

impl Repository<Track> {
    /// Points a track at `data.album_id`, or detaches it from any album when `None`.
    ///
    /// Only `album_id` is written. A track id matching no row, or an album id
    /// matching no album, is reported as `NotFound` rather than silently ignored.
    pub async fn update_track_album(
        &self,
        id: i64,
        data: TrackOnlyAlbum,
    ) -> Result<AlbumChange, DbError> {
        data.validate()?;
        let change = AlbumChange {
            id,
            album_id: data.album_id,
        };

        let result = sqlx::query("UPDATE tracks SET album_id = ? WHERE id = ?")
            .bind(change.album_id)
            .bind(change.id)
            .execute(&self.pool)
            .await
            .map_err(|err| match (DbError::from(err), change.album_id) {
                (DbError::NotFound(_), Some(album_id)) => DbError::not_found(Album::NAME, album_id),
                (other, _) => other,
            })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(Track::NAME, id));
        }

        tracing::debug!(track_id = id, album_id = ?change.album_id, "Reassigned track album.");
        Ok(change)
    }
}
