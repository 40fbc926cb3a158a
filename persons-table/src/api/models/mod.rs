//! Request data models.
//!
//! These are the shapes submitted by the HTML forms, kept apart from the database models in
//! [`crate::db::models`]. Validation lives next to each form and reports problems per field so
//! the page can be re-rendered with the messages.
//!
//! - [`persons`]: The create/edit form and the quantity (resize) form
//! - [`pagination`]: Page-number window over the id-ordered listing

pub mod pagination;
pub mod persons;
