use crate::entity::Entity;
use crate::error::DbError;
use crate::repository::begin_write;
use core_types::{Artist, Track};
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use std::collections::HashSet;
use std::marker::PhantomData;

/// Describes one direction of a many-to-many relation stored in a join table.
///
/// The same join table backs both directions; only the roles of its two
/// columns swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// The relation's name as seen from the owner, e.g. `"artists"` on a track.
    pub name: &'static str,
    pub join_table: &'static str,
    /// Join-table column referencing the owner's id.
    pub owner_column: &'static str,
    /// Join-table column referencing the member's id.
    pub member_column: &'static str,
}

/// Artists of a track.
pub const TRACK_ARTISTS: Relation = Relation {
    name: "artists",
    join_table: "track_artist",
    owner_column: "track_id",
    member_column: "artist_id",
};

/// Tracks of an artist.
pub const ARTIST_TRACKS: Relation = Relation {
    name: "tracks",
    join_table: "track_artist",
    owner_column: "artist_id",
    member_column: "track_id",
};

/// Manages the links between owners `A` and members `B` through a [`Relation`].
#[derive(Debug)]
pub struct AssociationRepository<A, B> {
    pool: SqlitePool,
    relation: Relation,
    _entities: PhantomData<fn() -> (A, B)>,
}

pub type TrackArtistRepository = AssociationRepository<Track, Artist>;
pub type ArtistTrackRepository = AssociationRepository<Artist, Track>;

impl<A, B> Clone for AssociationRepository<A, B> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            relation: self.relation,
            _entities: PhantomData,
        }
    }
}

impl TrackArtistRepository {
    pub fn track_artists(pool: SqlitePool) -> Self {
        Self::new(pool, TRACK_ARTISTS)
    }
}

impl ArtistTrackRepository {
    pub fn artist_tracks(pool: SqlitePool) -> Self {
        Self::new(pool, ARTIST_TRACKS)
    }
}

impl<A: Entity, B: Entity> AssociationRepository<A, B> {
    pub fn new(pool: SqlitePool, relation: Relation) -> Self {
        Self {
            pool,
            relation,
            _entities: PhantomData,
        }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Links member `b_id` to owner `a_id`.
    ///
    /// The owner's membership set is materialized before anything is written,
    /// all inside one write transaction. Returns `false` when the pair already
    /// existed. The insert itself is `ON CONFLICT DO NOTHING` against the join
    /// table's primary key, so two concurrent identical calls still leave one pair.
    pub async fn add_association(&self, a_id: i64, b_id: i64) -> Result<bool, DbError> {
        let mut tx = begin_write(&self.pool).await?;

        let members = self.load_membership(&mut tx, a_id).await?;
        let member_exists = row_exists::<B>(&mut tx, b_id).await?;

        let Some(members) = members else {
            return Err(DbError::not_found(A::NAME, a_id));
        };
        if !member_exists {
            return Err(DbError::not_found(B::NAME, b_id));
        }

        if members.contains(&b_id) {
            tracing::debug!(relation = self.relation.name, a_id, b_id, "Association already present.");
            return Ok(false);
        }

        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES (?, ?) ON CONFLICT DO NOTHING",
            self.relation.join_table, self.relation.owner_column, self.relation.member_column
        );
        let inserted = sqlx::query(&sql)
            .bind(a_id)
            .bind(b_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;

        tracing::debug!(relation = self.relation.name, a_id, b_id, "Association added.");
        Ok(inserted > 0)
    }

    /// Unlinks member `b_id` from owner `a_id`. Returns `false` when no such pair existed.
    pub async fn remove_association(&self, a_id: i64, b_id: i64) -> Result<bool, DbError> {
        let mut tx = begin_write(&self.pool).await?;

        if !row_exists::<A>(&mut tx, a_id).await? {
            return Err(DbError::not_found(A::NAME, a_id));
        }
        if !row_exists::<B>(&mut tx, b_id).await? {
            return Err(DbError::not_found(B::NAME, b_id));
        }

        let sql = format!(
            "DELETE FROM {} WHERE {} = ? AND {} = ?",
            self.relation.join_table, self.relation.owner_column, self.relation.member_column
        );
        let removed = sqlx::query(&sql)
            .bind(a_id)
            .bind(b_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;

        tracing::debug!(relation = self.relation.name, a_id, b_id, removed, "Association removed.");
        Ok(removed > 0)
    }

    /// Every member linked to owner `a_id`, as `B` views. Order is unspecified.
    pub async fn get_associations(&self, a_id: i64) -> Result<Vec<B>, DbError> {
        let mut tx = self.pool.begin().await?;

        if !row_exists::<A>(&mut tx, a_id).await? {
            return Err(DbError::not_found(A::NAME, a_id));
        }

        let sql = format!(
            "SELECT {} FROM {} AS m JOIN {} AS j ON j.{} = m.id WHERE j.{} = ?",
            B::select_list(Some("m")),
            B::TABLE,
            self.relation.join_table,
            self.relation.member_column,
            self.relation.owner_column
        );
        let members = sqlx::query_as::<_, B>(&sql)
            .bind(a_id)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(members)
    }

    /// Loads the owner's current membership set, or `None` if the owner does not exist.
    async fn load_membership(
        &self,
        conn: &mut SqliteConnection,
        a_id: i64,
    ) -> Result<Option<HashSet<i64>>, DbError> {
        if !row_exists::<A>(conn, a_id).await? {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            self.relation.member_column, self.relation.join_table, self.relation.owner_column
        );
        let members: Vec<i64> = sqlx::query_scalar(&sql)
            .bind(a_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(Some(members.into_iter().collect()))
    }
}

async fn row_exists<E: Entity>(conn: &mut SqliteConnection, id: i64) -> Result<bool, DbError> {
    let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = ?)", E::TABLE);
    let exists: i64 = sqlx::query_scalar(&sql)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists != 0)
}
