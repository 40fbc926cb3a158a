//! Common type definitions.

/// Identifier of a row in the `persons` table (a Postgres `INTEGER` identity)
pub type PersonId = i32;

/// Largest number of records the table can be resized to in one go; randomuser.me
/// serves at most this many results per request.
pub const MAX_QUANTITY: i64 = 5000;
