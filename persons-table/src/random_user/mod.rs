//! The external random-person data source.
//!
//! The table is grown by asking [randomuser.me](https://randomuser.me) for a batch of
//! generated persons and mapping each record onto a
//! [`PersonCreateDBRequest`](crate::db::models::persons::PersonCreateDBRequest):
//!
//! - [`client`]: the [`FetchPeople`] trait and its reqwest implementation
//! - [`models`]: the JSON shape of the API and the mapping, which fails a whole batch
//!   on the first bad record

pub mod client;
pub mod models;

pub use client::{FetchPeople, RandomUserClient, StaticPeopleFetcher};
pub use models::{MappingError, RandomUserResponse};

use std::time::Duration;

/// Build the HTTP client used for outbound calls.
///
/// reqwest is compiled without a bundled crypto provider, so make sure the process-wide
/// rustls provider is in place first. Installing twice is harmless.
pub(crate) fn build_http_client(timeout: Option<Duration>) -> anyhow::Result<reqwest::Client> {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
