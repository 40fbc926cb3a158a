//! Database record models matching table schemas.
//!
//! Models derive `sqlx::FromRow` for query results and are kept separate from
//! the form models in [`crate::api::models`], so storage and presentation can
//! change independently.
//!
//! - [`persons`]: the `persons` table and its create/update requests

pub mod persons;
