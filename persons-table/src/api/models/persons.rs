//! Form payloads submitted from the HTML pages, and their validation.

use crate::db::models::persons::{
    CELL_MAX_LEN, EMAIL_MAX_LEN, GENDER_MAX_LEN, LOCATION_MAX_LEN, NAME_MAX_LEN, PIC_LINK_MAX_LEN, Person,
    PersonCreateDBRequest,
};
use crate::images::ImageProbe;
use crate::types::MAX_QUANTITY;
use lettre::Address;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, str::FromStr};
use url::Url;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const EMAIL_MESSAGE: &str = "Invalid email address.";
pub const URL_MESSAGE: &str = "Invalid URL.";
pub const NOT_AN_IMAGE_MESSAGE: &str = "Link does not lead to an image";
pub const NOT_A_NUMBER_MESSAGE: &str = "Not a valid decimal value.";
pub const QUANTITY_RANGE_MESSAGE: &str = "Only integers in range 1-5000 are allowed";

/// Validation messages keyed by field name
pub type FieldErrors = BTreeMap<&'static str, String>;

/// The create/edit form, exactly as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonForm {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub cell: String,
    pub email: String,
    pub location: String,
    pub pic_link: String,
}

impl PersonForm {
    /// Prefill for the edit page
    pub fn from_person(person: &Person) -> Self {
        Self {
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            gender: person.gender.clone(),
            cell: person.cell.clone(),
            email: person.email.clone(),
            location: person.location.clone(),
            pic_link: person.pic_link.clone(),
        }
    }

    /// Check every field and return the trimmed values ready to store.
    ///
    /// A picture link that parses as a URL is additionally fetched through `probe` and must
    /// serve an image.
    pub async fn validate(&self, probe: &ImageProbe) -> Result<PersonCreateDBRequest, FieldErrors> {
        let mut errors = FieldErrors::new();

        let first_name = required(&mut errors, "first_name", &self.first_name, NAME_MAX_LEN);
        let last_name = required(&mut errors, "last_name", &self.last_name, NAME_MAX_LEN);
        let gender = required(&mut errors, "gender", &self.gender, GENDER_MAX_LEN);
        let cell = required(&mut errors, "cell", &self.cell, CELL_MAX_LEN);
        let email = required(&mut errors, "email", &self.email, EMAIL_MAX_LEN);
        let location = required(&mut errors, "location", &self.location, LOCATION_MAX_LEN);
        let pic_link = required(&mut errors, "pic_link", &self.pic_link, PIC_LINK_MAX_LEN);

        if let Some(email) = email
            && Address::from_str(email).is_err()
        {
            errors.insert("email", EMAIL_MESSAGE.to_string());
        }

        if let Some(link) = pic_link {
            match parse_web_url(link) {
                Some(url) => {
                    if !probe.is_image(&url).await {
                        errors.insert("pic_link", NOT_AN_IMAGE_MESSAGE.to_string());
                    }
                }
                None => {
                    errors.insert("pic_link", URL_MESSAGE.to_string());
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(PersonCreateDBRequest {
            gender: gender.unwrap_or_default().to_string(),
            first_name: first_name.unwrap_or_default().to_string(),
            last_name: last_name.unwrap_or_default().to_string(),
            cell: cell.unwrap_or_default().to_string(),
            email: email.unwrap_or_default().to_string(),
            location: location.unwrap_or_default().to_string(),
            pic_link: pic_link.unwrap_or_default().to_string(),
        })
    }
}

/// Trimmed value when present and short enough; otherwise the error is recorded
fn required<'a>(errors: &mut FieldErrors, field: &'static str, value: &'a str, max: usize) -> Option<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, REQUIRED_MESSAGE.to_string());
        return None;
    }
    if value.chars().count() > max {
        errors.insert(field, format!("Field cannot be longer than {max} characters."));
        return None;
    }
    Some(value)
}

/// An absolute http(s) URL with a host
fn parse_web_url(value: &str) -> Option<Url> {
    let url = Url::parse(value).ok()?;
    let web = matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|host| !host.is_empty());
    web.then_some(url)
}

/// The "change number of entries" form on the index page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantityForm {
    pub quantity: String,
}

impl QuantityForm {
    /// The requested row count, a whole number in `1..=5000`
    pub fn validate(&self) -> Result<i64, String> {
        let raw = self.quantity.trim();
        if raw.is_empty() {
            return Err(REQUIRED_MESSAGE.to_string());
        }

        let value = Decimal::from_str(raw).map_err(|_| NOT_A_NUMBER_MESSAGE.to_string())?;
        if !value.fract().is_zero() {
            return Err(QUANTITY_RANGE_MESSAGE.to_string());
        }

        value
            .to_i64()
            .filter(|quantity| (1..=MAX_QUANTITY).contains(quantity))
            .ok_or_else(|| QUANTITY_RANGE_MESSAGE.to_string())
    }
}
