//! Database models for person records.

use crate::types::PersonId;
use serde::{Deserialize, Serialize};

/// Column length limits of the `persons` table, in characters.
pub const GENDER_MAX_LEN: usize = 6;
pub const NAME_MAX_LEN: usize = 30;
pub const CELL_MAX_LEN: usize = 30;
pub const EMAIL_MAX_LEN: usize = 50;
pub const LOCATION_MAX_LEN: usize = 200;
pub const PIC_LINK_MAX_LEN: usize = 500;

/// Database representation of a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    pub id: PersonId,
    pub gender: String,
    pub first_name: String,
    pub last_name: String,
    pub cell: String,
    pub email: String,
    pub location: String,
    pub pic_link: String,
}

/// Request to insert a new person; the id is assigned by the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonCreateDBRequest {
    pub gender: String,
    pub first_name: String,
    pub last_name: String,
    pub cell: String,
    pub email: String,
    pub location: String,
    pub pic_link: String,
}

/// An edit replaces every column but `id`, so it carries the same fields as a create
pub type PersonUpdateDBRequest = PersonCreateDBRequest;

/// Response from database after reading, creating or updating a person
pub type PersonDBResponse = Person;

impl Person {
    /// The stored fields without the id, e.g. to compare against what was submitted
    pub fn fields(&self) -> PersonCreateDBRequest {
        PersonCreateDBRequest {
            gender: self.gender.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            cell: self.cell.clone(),
            email: self.email.clone(),
            location: self.location.clone(),
            pic_link: self.pic_link.clone(),
        }
    }
}
