//! The person store: every operation the request handlers perform on the `persons` table.
//!
//! [`PersonStore`] is built once at startup from the connection pool and a [`FetchPeople`]
//! implementation, then shared through the application state. Each method acquires its own
//! connection (or transaction) and drives the [`Persons`] repository over it.

use crate::{
    db::{
        errors::DbError,
        handlers::{Persons, Repository, persons::PersonFilter},
        models::persons::{Person, PersonCreateDBRequest},
    },
    errors::{Error, Result},
    random_user::FetchPeople,
    types::{MAX_QUANTITY, PersonId},
};
use rand::prelude::RngExt;
use rand::rng;
use sqlx::{PgPool, Postgres, Transaction};
use std::{cmp::Ordering, sync::Arc};
use tracing::{info, instrument};

/// What a resize did to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    Unchanged,
    Trimmed { removed: u64 },
    Grown { added: u64 },
}

#[derive(Clone)]
pub struct PersonStore {
    db: PgPool,
    fetcher: Arc<dyn FetchPeople>,
}

impl PersonStore {
    pub fn new(db: PgPool, fetcher: Arc<dyn FetchPeople>) -> Self {
        Self { db, fetcher }
    }

    /// A transaction that sees one snapshot of the table for all of its statements
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self.db.begin().await.map_err(|e| Error::Database(e.into()))?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Ok(tx)
    }

    #[instrument(skip(self), err)]
    pub async fn count(&self) -> Result<i64> {
        let mut conn = self.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        Ok(Persons::new(&mut conn).count().await?)
    }

    /// One page of the id-ordered listing
    #[instrument(skip(self), err)]
    pub async fn list_page(&self, skip: i64, limit: i64) -> Result<Vec<Person>> {
        let mut conn = self.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        Ok(Persons::new(&mut conn).list(&PersonFilter::new(skip, limit)).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn get(&self, id: PersonId) -> Result<Person> {
        let mut conn = self.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        Persons::new(&mut conn)
            .get_by_id(id)
            .await?
            .ok_or_else(|| Error::person_not_found(id))
    }

    #[instrument(skip(self, fields), err)]
    pub async fn create(&self, fields: &PersonCreateDBRequest) -> Result<Person> {
        let mut conn = self.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let person = Persons::new(&mut conn).create(fields).await?;
        info!("Created person {}", person.id);
        Ok(person)
    }

    #[instrument(skip(self, fields), err)]
    pub async fn update(&self, id: PersonId, fields: &PersonCreateDBRequest) -> Result<Person> {
        let mut conn = self.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        match Persons::new(&mut conn).update(id, fields).await {
            Ok(person) => Ok(person),
            Err(DbError::NotFound) => Err(Error::person_not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, id: PersonId) -> Result<()> {
        let mut conn = self.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        if Persons::new(&mut conn).delete(id).await? {
            info!("Deleted person {}", id);
            Ok(())
        } else {
            Err(Error::person_not_found(id))
        }
    }

    /// Id of a randomly picked row: `floor(count * u)` for uniform `u` in `[0, 1)` as an
    /// offset into id order. Count and lookup read the same snapshot, so concurrent deletes
    /// can't push the offset past the end.
    #[instrument(skip(self), err)]
    pub async fn random_id(&self) -> Result<PersonId> {
        let mut tx = self.begin_snapshot().await?;
        let mut repo = Persons::new(&mut tx);

        let count = repo.count().await?;
        if count == 0 {
            return Err(Error::EmptyStore);
        }

        let offset = pick_offset(count, rng().random::<f64>());
        let id = repo.id_at_offset(offset).await?.ok_or(Error::EmptyStore)?;
        tx.commit().await.map_err(|e| Error::Database(e.into()))?;

        Ok(id)
    }

    /// Bring the row count to `target`.
    ///
    /// Shrinking keeps the `target` smallest ids. Growing fetches the missing rows from the
    /// random person source first and only then inserts them, all at once; a failed fetch
    /// leaves the table as it was.
    #[instrument(skip(self), err)]
    pub async fn resize(&self, target: i64) -> Result<ResizeOutcome> {
        if !(0..=MAX_QUANTITY).contains(&target) {
            return Err(Error::BadRequest {
                message: format!("Quantity must be between 0 and {MAX_QUANTITY}"),
            });
        }

        let count = self.count().await?;

        let outcome = match target.cmp(&count) {
            Ordering::Equal => ResizeOutcome::Unchanged,
            Ordering::Less => {
                let mut tx = self.db.begin().await.map_err(|e| Error::Database(e.into()))?;
                let removed = Persons::new(&mut tx).truncate_to(target).await?;
                tx.commit().await.map_err(|e| Error::Database(e.into()))?;
                ResizeOutcome::Trimmed { removed }
            }
            Ordering::Greater => {
                let missing = (target - count) as usize;
                let persons = self.fetch_persons(missing).await?;

                let mut tx = self.db.begin().await.map_err(|e| Error::Database(e.into()))?;
                let added = Persons::new(&mut tx).create_bulk(&persons).await?;
                tx.commit().await.map_err(|e| Error::Database(e.into()))?;
                ResizeOutcome::Grown { added }
            }
        };

        info!("Resized persons table from {} to {}: {:?}", count, target, outcome);
        Ok(outcome)
    }

    async fn fetch_persons(&self, count: usize) -> Result<Vec<PersonCreateDBRequest>> {
        let response = self.fetcher.fetch(count).await.map_err(|e| Error::Upstream {
            message: format!("{e:#}"),
        })?;

        response
            .into_persons(count)
            .map_err(|e| Error::Upstream { message: e.to_string() })
    }
}

/// Map a uniform sample in `[0, 1)` onto an offset in `[0, count)`
fn pick_offset(count: i64, sample: f64) -> i64 {
    let offset = (count as f64 * sample).floor() as i64;
    offset.clamp(0, count - 1)
}
