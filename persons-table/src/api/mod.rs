//! HTTP layer: route handlers and the form models they decode.
//!
//! - **[`handlers`]**: Axum route handlers rendering HTML pages or redirecting
//! - **[`models`]**: Submitted form payloads and the pagination window
//!
//! # Routes
//!
//! - **Listing** (`/`, `/index`, `/index/{page}`): paged table, plus the resize form on POST
//! - **Persons** (`/new_person`, `/person/{id}`, `/person/{id}/edit`, `/person/{id}/delete`)
//! - **Random** (`/random`): redirect to a randomly picked person
//! - **Assets** (`/static/{*path}`): embedded stylesheet

pub mod handlers;
pub mod models;
