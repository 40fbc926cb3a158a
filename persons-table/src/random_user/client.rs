//! Fetching synthetic persons from randomuser.me.

use super::models::RandomUserResponse;
use crate::config::RandomUserConfig;
use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

/// Fields requested from the API; everything else is left out of the payload.
const INCLUDED_FIELDS: &str = "gender,name,cell,email,location,picture";

/// A trait for fetching a batch of generated persons.
/// In practice this is randomuser.me over http, see [`RandomUserClient`]; tests plug in
/// [`StaticPeopleFetcher`] instead.
#[async_trait]
pub trait FetchPeople: Send + Sync {
    async fn fetch(&self, count: usize) -> anyhow::Result<RandomUserResponse>;
}

/// The concrete implementation of `FetchPeople`.
pub struct RandomUserClient {
    client: Client,
    base_url: Url,
}

impl RandomUserClient {
    pub fn new(config: &RandomUserConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: super::build_http_client(config.request_timeout)?,
            base_url: config.base_url.clone(),
        })
    }

    /// `{base_url}?inc=...&results=n`, keeping any query the base url already carries
    fn request_url(&self, count: usize) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("inc", INCLUDED_FIELDS)
            .append_pair("results", &count.to_string());
        url
    }
}

#[async_trait]
impl FetchPeople for RandomUserClient {
    #[instrument(skip(self), err)]
    async fn fetch(&self, count: usize) -> anyhow::Result<RandomUserResponse> {
        let url = self.request_url(count);
        debug!("Fetching {} persons from {}", count, url);

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Random person request failed, url was: {}", url);
            return Err(anyhow!("randomuser API error: {} - {}", status, body));
        }

        let body_text = response.text().await?;

        match serde_json::from_str::<RandomUserResponse>(&body_text) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::error!("Failed to parse randomuser response as JSON. Error: {}", e);
                tracing::debug!("Response body was: {}", body_text);
                Err(anyhow!("error decoding response body: {}", e))
            }
        }
    }
}

/// A fetcher that serves records from a fixed pool, cycling through it as needed.
/// Used where no network should be involved.
pub struct StaticPeopleFetcher {
    pool: RandomUserResponse,
}

impl StaticPeopleFetcher {
    pub fn new(pool: RandomUserResponse) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FetchPeople for StaticPeopleFetcher {
    async fn fetch(&self, count: usize) -> anyhow::Result<RandomUserResponse> {
        if self.pool.results.is_empty() && count > 0 {
            return Err(anyhow!("static fetcher has no records to serve"));
        }

        let results = self.pool.results.iter().cycle().take(count).cloned().collect();
        Ok(RandomUserResponse { results })
    }
}
