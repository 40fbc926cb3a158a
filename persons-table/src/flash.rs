//! One-shot confirmation messages carried across a redirect in a short-lived cookie.
//!
//! A mutating handler attaches [`Flash::set_cookie`] to its redirect; the index reads it back
//! with [`Flash::from_headers`], shows the message once and sends [`Flash::clear_cookie`].

use axum::http::{HeaderMap, header};

pub const FLASH_COOKIE: &str = "flash";

/// Seconds the cookie survives if the index is never visited
const FLASH_MAX_AGE: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Created,
    Updated,
    Deleted,
}

impl Flash {
    /// Value stored in the cookie
    pub fn code(self) -> &'static str {
        match self {
            Flash::Created => "created",
            Flash::Updated => "updated",
            Flash::Deleted => "deleted",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "created" => Some(Flash::Created),
            "updated" => Some(Flash::Updated),
            "deleted" => Some(Flash::Deleted),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::Created => "New entry is successfully added",
            Flash::Updated => "Data is successfully updated",
            Flash::Deleted => "Data entry is successfully deleted",
        }
    }

    pub fn set_cookie(self) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            FLASH_COOKIE,
            self.code(),
            FLASH_MAX_AGE
        )
    }

    pub fn clear_cookie() -> String {
        format!("{FLASH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }

    /// The pending flash, if the request carries one. Unknown values are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|cookie| cookie.trim().split_once('='))
            .find(|(name, _)| *name == FLASH_COOKIE)
            .and_then(|(_, value)| Flash::from_code(value))
    }
}
