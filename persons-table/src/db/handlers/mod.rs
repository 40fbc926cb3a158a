//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection or transaction, provides strongly-typed
//! operations with parameter binding, and returns models from [`crate::db::models`].
//!
//! ```ignore
//! use persons_table::db::handlers::{Persons, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!     let mut repo = Persons::new(&mut tx);
//!     let total = repo.count().await?;
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod persons;
pub mod repository;

pub use persons::Persons;
pub use repository::Repository;
