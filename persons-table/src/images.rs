//! Live check that a picture link really serves an image.

use reqwest::{Client, header::CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

#[derive(Clone)]
pub struct ImageProbe {
    client: Client,
}

impl ImageProbe {
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        Ok(Self {
            client: crate::random_user::build_http_client(timeout)?,
        })
    }

    /// Fetch `url` and report whether it answered with an `image/*` content type.
    /// Transport errors and missing headers count as "not an image".
    #[instrument(skip(self), fields(url = %url))]
    pub async fn is_image(&self, url: &Url) -> bool {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Picture link unreachable: {}", e);
                return false;
            }
        };

        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.trim().to_ascii_lowercase().starts_with("image"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_image_content_type_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/portrait.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0xFF, 0xD8, 0xFF], "image/jpeg"))
            .mount(&server)
            .await;

        let probe = ImageProbe::new(None).unwrap();
        let url: Url = format!("{}/portrait.jpg", server.uri()).parse().unwrap();
        assert!(probe.is_image(&url).await);
    }

    #[tokio::test]
    async fn test_html_page_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
            .mount(&server)
            .await;

        let probe = ImageProbe::new(None).unwrap();
        let url: Url = format!("{}/profile", server.uri()).parse().unwrap();
        assert!(!probe.is_image(&url).await);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_rejected() {
        let probe = ImageProbe::new(Some(Duration::from_secs(2))).unwrap();
        let url: Url = "http://127.0.0.1:9/nothing.png".parse().unwrap();
        assert!(!probe.is_image(&url).await);
    }
}
