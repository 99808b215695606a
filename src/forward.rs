use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ProxyError;
use crate::windy::WindyObservation;

const WINDY_UPDATE_URL: &str = "https://stations.windy.com/pws/update";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Destination's answer to a forwarded observation.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationReply {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait PostObservation: Send + Sync {
    /// Issues the single outbound call for one observation. No retries.
    async fn post_observation(
        &self,
        record: &WindyObservation,
    ) -> Result<DestinationReply, ProxyError>;
}

/// HTTPS client for the Windy PWS ingestion endpoint. The API key rides in
/// the URL path, per the destination's contract.
pub struct WindyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl WindyClient {
    pub fn new(api_key: &str) -> Result<Self, reqwest::Error> {
        Self::with_base_url(WINDY_UPDATE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(WindyClient {
            http,
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), api_key),
        })
    }
}

#[async_trait]
impl PostObservation for WindyClient {
    async fn post_observation(
        &self,
        record: &WindyObservation,
    ) -> Result<DestinationReply, ProxyError> {
        debug!(station = record.station, "posting observation to windy");
        let response = self
            .http
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProxyError::DestinationTimeout(e.to_string())
                } else {
                    ProxyError::DestinationUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProxyError::DestinationUnavailable(e.to_string()))?;
        if status.is_success() {
            Ok(DestinationReply { status: status.as_u16(), body })
        } else {
            Err(ProxyError::DestinationRejected { status: status.as_u16(), reason: body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_embeds_the_api_key() {
        let client = WindyClient::new("abc123").unwrap();
        assert_eq!(client.endpoint, "https://stations.windy.com/pws/update/abc123");
    }

    #[test]
    fn base_url_trailing_slash_is_tolerated() {
        let client = WindyClient::with_base_url("http://localhost:9999/", "k").unwrap();
        assert_eq!(client.endpoint, "http://localhost:9999/k");
    }
}
