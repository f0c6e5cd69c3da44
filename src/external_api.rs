pub mod github_api;

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT},
    Client, Response, Url,
};
use std::time::Duration;
use tracing::debug;

use crate::errors::SetupError;

const APPLICATION_GITHUB_JSON: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = concat!("hp-py-sleep-setup/", env!("CARGO_PKG_VERSION"));

/// Basic api client
pub struct BaseApiClient {
    client: Client,
    pub base_url: Url,
}

impl BaseApiClient {
    fn build_url(&self, endpoint: &str) -> Result<Url, SetupError> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| SetupError::InvalidUrl(e.to_string()))
    }

    fn get_default_headers(api_token: Option<&str>) -> Result<HeaderMap, SetupError> {
        let mut headers = HeaderMap::with_capacity(3);
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_GITHUB_JSON));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        if let Some(token) = api_token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => return Err(SetupError::InvalidApiToken),
            };
        }

        Ok(headers)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, SetupError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SetupError::Api(status, body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub fn new(base_url: &str, api_token: Option<&str>) -> Result<Self, SetupError> {
        let default_headers = Self::get_default_headers(api_token)?;

        let client = Client::builder().default_headers(default_headers).build()?;

        // Trailing slash keeps the base path when endpoints are joined
        let parse_base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| SetupError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            client,
            base_url: parse_base_url,
        })
    }

    /// GET `endpoint` relative to the base url and decode the JSON body
    pub async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<T, SetupError> {
        let url = self.build_url(endpoint)?;
        debug!(%url, "GET");
        let response = self.client.get(url).timeout(timeout).send().await?;
        self.handle_response(response).await
    }

    /// GET an absolute url as a raw byte stream; the caller checks the status
    pub async fn get_stream(&self, url: &str, timeout: Duration) -> Result<Response, SetupError> {
        let url = Url::parse(url).map_err(|e| SetupError::InvalidUrl(e.to_string()))?;
        debug!(%url, "GET stream");
        Ok(self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("application/octet-stream"))
            .timeout(timeout)
            .send()
            .await?)
    }
}
