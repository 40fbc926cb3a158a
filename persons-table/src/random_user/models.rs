//! Wire format of the randomuser.me API and its mapping onto person records.

use crate::db::models::persons::{
    CELL_MAX_LEN, EMAIL_MAX_LEN, GENDER_MAX_LEN, LOCATION_MAX_LEN, NAME_MAX_LEN, PIC_LINK_MAX_LEN, PersonCreateDBRequest,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level response of `GET /api/?inc=...&results=n`. Other top-level keys (`info`) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomUserResponse {
    pub results: Vec<RandomUser>,
}

/// One generated person, restricted to the fields requested through `inc`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomUser {
    pub gender: String,
    pub name: RandomUserName,
    pub cell: String,
    pub email: String,
    pub location: RandomUserLocation,
    pub picture: RandomUserPicture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomUserName {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomUserLocation {
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomUserPicture {
    pub large: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("expected {expected} records, received {received}")]
    WrongCount { expected: usize, received: usize },

    #[error("record {index}: field `{field}` is empty")]
    EmptyField { index: usize, field: &'static str },

    #[error("record {index}: field `{field}` is longer than {max} characters")]
    TooLong { index: usize, field: &'static str, max: usize },
}

impl RandomUser {
    /// Map one record into the person shape, `location` as "city, country" and the large
    /// picture as `pic_link`.
    pub fn into_person(self, index: usize) -> Result<PersonCreateDBRequest, MappingError> {
        for (field, value) in [("location.city", &self.location.city), ("location.country", &self.location.country)] {
            if value.trim().is_empty() {
                return Err(MappingError::EmptyField { index, field });
            }
        }

        let person = PersonCreateDBRequest {
            gender: self.gender,
            first_name: self.name.first,
            last_name: self.name.last,
            cell: self.cell,
            email: self.email,
            location: format!("{}, {}", self.location.city, self.location.country),
            pic_link: self.picture.large,
        };

        let fields: [(&'static str, &str, usize); 7] = [
            ("gender", &person.gender, GENDER_MAX_LEN),
            ("name.first", &person.first_name, NAME_MAX_LEN),
            ("name.last", &person.last_name, NAME_MAX_LEN),
            ("cell", &person.cell, CELL_MAX_LEN),
            ("email", &person.email, EMAIL_MAX_LEN),
            ("location", &person.location, LOCATION_MAX_LEN),
            ("picture.large", &person.pic_link, PIC_LINK_MAX_LEN),
        ];
        for (field, value, max) in fields {
            if value.trim().is_empty() {
                return Err(MappingError::EmptyField { index, field });
            }
            if value.chars().count() > max {
                return Err(MappingError::TooLong { index, field, max });
            }
        }

        Ok(person)
    }
}

impl RandomUserResponse {
    /// Map a whole batch. Any bad record fails the batch; nothing is skipped.
    pub fn into_persons(self, expected: usize) -> Result<Vec<PersonCreateDBRequest>, MappingError> {
        if self.results.len() != expected {
            return Err(MappingError::WrongCount {
                expected,
                received: self.results.len(),
            });
        }

        self.results
            .into_iter()
            .enumerate()
            .map(|(index, user)| user.into_person(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(first: &str) -> serde_json::Value {
        json!({
            "gender": "female",
            "name": { "title": "Ms", "first": first, "last": "Lambert" },
            "location": {
                "street": { "number": 4107, "name": "Rue Laure-Diebold" },
                "city": "Nantes",
                "country": "France",
                "postcode": 44000
            },
            "email": format!("{}.lambert@example.com", first.to_lowercase()),
            "cell": "06-49-67-51-42",
            "picture": {
                "large": "https://randomuser.me/api/portraits/women/12.jpg",
                "medium": "https://randomuser.me/api/portraits/med/women/12.jpg",
                "thumbnail": "https://randomuser.me/api/portraits/thumb/women/12.jpg"
            }
        })
    }

    #[test]
    fn test_maps_location_and_large_picture() {
        let response: RandomUserResponse = serde_json::from_value(json!({
            "results": [record("Chloe")],
            "info": { "seed": "abc", "results": 1, "page": 1, "version": "1.4" }
        }))
        .unwrap();

        let persons = response.into_persons(1).unwrap();
        assert_eq!(
            persons,
            vec![PersonCreateDBRequest {
                gender: "female".to_string(),
                first_name: "Chloe".to_string(),
                last_name: "Lambert".to_string(),
                cell: "06-49-67-51-42".to_string(),
                email: "chloe.lambert@example.com".to_string(),
                location: "Nantes, France".to_string(),
                pic_link: "https://randomuser.me/api/portraits/women/12.jpg".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_field_fails_to_decode_the_batch() {
        let mut broken = record("Lea");
        broken.as_object_mut().unwrap().remove("cell");

        let result = serde_json::from_value::<RandomUserResponse>(json!({ "results": [record("Chloe"), broken] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_field_fails_the_whole_batch() {
        let mut broken = record("Lea");
        broken["email"] = json!("");
        let response: RandomUserResponse = serde_json::from_value(json!({ "results": [record("Chloe"), broken] })).unwrap();

        assert_eq!(
            response.into_persons(2),
            Err(MappingError::EmptyField { index: 1, field: "email" })
        );
    }

    fn with_location(city: &str, country: &str) -> RandomUser {
        let mut raw = record("Chloe");
        raw["location"]["city"] = json!(city);
        raw["location"]["country"] = json!(country);
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_empty_city_fails_the_record() {
        for city in ["", "  "] {
            assert_eq!(
                with_location(city, "France").into_person(0),
                Err(MappingError::EmptyField {
                    index: 0,
                    field: "location.city"
                })
            );
        }
    }

    #[test]
    fn test_empty_country_fails_the_record() {
        assert_eq!(
            with_location("Nantes", "").into_person(4),
            Err(MappingError::EmptyField {
                index: 4,
                field: "location.country"
            })
        );
    }

    #[test]
    fn test_overlong_field_fails_the_batch() {
        let mut broken = record("Chloe");
        broken["gender"] = json!("unspecified");
        let response: RandomUserResponse = serde_json::from_value(json!({ "results": [broken] })).unwrap();

        assert_eq!(
            response.into_persons(1),
            Err(MappingError::TooLong {
                index: 0,
                field: "gender",
                max: GENDER_MAX_LEN
            })
        );
    }

    #[test]
    fn test_short_batch_is_rejected() {
        let response: RandomUserResponse = serde_json::from_value(json!({ "results": [record("Chloe")] })).unwrap();
        assert_eq!(
            response.into_persons(3),
            Err(MappingError::WrongCount { expected: 3, received: 1 })
        );
    }
}
