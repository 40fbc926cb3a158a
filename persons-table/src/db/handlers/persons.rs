//! Database repository for person records.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::persons::{Person, PersonCreateDBRequest, PersonDBResponse, PersonUpdateDBRequest},
};
use crate::types::PersonId;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::instrument;

/// Rows per INSERT statement during a bulk insert. Seven binds per row keeps each
/// statement well under the Postgres limit of 65535 bind parameters.
const BULK_INSERT_CHUNK: usize = 1000;

/// Filter for listing persons, always ordered by id
#[derive(Debug, Clone)]
pub struct PersonFilter {
    pub skip: i64,
    pub limit: i64,
}

impl PersonFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

pub struct Persons<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Persons<'c> {
    type CreateRequest = PersonCreateDBRequest;
    type UpdateRequest = PersonUpdateDBRequest;
    type Response = PersonDBResponse;
    type Id = PersonId;
    type Filter = PersonFilter;

    #[instrument(skip(self, request), fields(email = %request.email), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO persons (gender, first_name, last_name, cell, email, location, pic_link)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&request.gender)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.cell)
        .bind(&request.email)
        .bind(&request.location)
        .bind(&request.pic_link)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(person)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let person = sqlx::query_as::<_, Person>("SELECT * FROM persons WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(person)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let persons = sqlx::query_as::<_, Person>("SELECT * FROM persons ORDER BY id LIMIT $1 OFFSET $2")
            .bind(filter.limit)
            .bind(filter.skip)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(persons)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            UPDATE persons SET
                gender = $2,
                first_name = $3,
                last_name = $4,
                cell = $5,
                email = $6,
                location = $7,
                pic_link = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.gender)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.cell)
        .bind(&request.email)
        .bind(&request.location)
        .bind(&request.pic_link)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(person)
    }
}

impl<'c> Persons<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn count(&mut self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM persons")
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }

    /// Id of the row at the given zero-based position in id order, if there is one
    #[instrument(skip(self), err)]
    pub async fn id_at_offset(&mut self, offset: i64) -> Result<Option<PersonId>> {
        let id = sqlx::query_scalar::<_, PersonId>("SELECT id FROM persons ORDER BY id OFFSET $1 LIMIT 1")
            .bind(offset)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(id)
    }

    /// Keep the first `keep` rows in id order and delete the rest.
    ///
    /// Everything from the row at offset `keep` upwards goes, so no retained id exceeds a
    /// removed one. Returns the number of deleted rows; zero when the table already holds
    /// `keep` rows or fewer.
    #[instrument(skip(self), err)]
    pub async fn truncate_to(&mut self, keep: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM persons
            WHERE id >= (SELECT id FROM persons ORDER BY id OFFSET $1 LIMIT 1)
            "#,
        )
        .bind(keep)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected())
    }

    /// Insert many persons, chunked into multi-row INSERT statements.
    ///
    /// Run this inside a transaction: a failure in a later chunk leaves earlier chunks
    /// inserted until the transaction is rolled back.
    #[instrument(skip(self, requests), fields(count = requests.len()), err)]
    pub async fn create_bulk(&mut self, requests: &[PersonCreateDBRequest]) -> Result<u64> {
        let mut inserted = 0;

        for chunk in requests.chunks(BULK_INSERT_CHUNK) {
            let mut query =
                QueryBuilder::<Postgres>::new("INSERT INTO persons (gender, first_name, last_name, cell, email, location, pic_link) ");
            query.push_values(chunk, |mut row, person| {
                row.push_bind(person.gender.as_str())
                    .push_bind(person.first_name.as_str())
                    .push_bind(person.last_name.as_str())
                    .push_bind(person.cell.as_str())
                    .push_bind(person.email.as_str())
                    .push_bind(person.location.as_str())
                    .push_bind(person.pic_link.as_str());
            });

            let result = query.build().execute(&mut *self.db).await?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }
}
