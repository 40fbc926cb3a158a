//! Database layer for data persistence and access.
//!
//! Implemented with SQLx on PostgreSQL, following the repository pattern:
//!
//! ```text
//! ┌─────────────┐
//! │ PersonStore │  (crate::store - operations exposed to handlers)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - one method per statement)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        ↓
//! ┌─────────────┐
//! │  PostgreSQL │
//! └─────────────┘
//! ```
//!
//! # Migrations
//!
//! Migrations live in the crate's `migrations/` directory and run on startup through
//! [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;
