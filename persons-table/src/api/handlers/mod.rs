//! HTTP request handlers.
//!
//! Each handler decodes and validates its input, makes one call on the
//! [`crate::store::PersonStore`], and renders a page or redirects.
//!
//! # Handler Modules
//!
//! - [`persons`]: Listing, resize, create, view, edit, delete and random pick
//! - [`static_assets`]: Embedded stylesheet serving
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`], which renders the error page with a matching
//! status code. Form validation failures are not errors: the form is re-rendered with 422.

pub mod persons;
pub mod static_assets;
