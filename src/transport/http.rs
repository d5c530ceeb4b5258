use super::{AudioPayload, SpeechBackend, StatusReport};
use crate::config::BackendConfig;
use crate::{messages, Error, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Proxy;
use serde::Deserialize;
use tracing::{debug, warn};

/// Error body of a failed synthesis request.
#[derive(Debug, Default, Deserialize)]
struct FailureBody {
    #[serde(default)]
    message: Option<String>,
}

/// Server-supplied message of a failed synthesis, or the default text when the
/// body has none or is not JSON.
fn failure_message(body: &[u8]) -> String {
    let message = match serde_json::from_slice::<FailureBody>(body) {
        Ok(parsed) => parsed.message.filter(|m| !m.is_empty()),
        Err(e) => {
            debug!(error = %e, bytes = body.len(), "synthesis error body is not JSON");
            None
        }
    };
    message.unwrap_or_else(|| messages::SYNTHESIS_FAILED.to_string())
}

/// [`SpeechBackend`] over HTTP.
pub struct HttpBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);

        // Only the configured proxy is used; system proxy variables are ignored.
        match &config.proxy_url {
            Some(proxy_url) => {
                let proxy = Proxy::all(proxy_url).map_err(|e| {
                    Error::configuration(format!("Invalid proxy URL '{}': {}", proxy_url, e))
                })?;
                builder = builder.proxy(proxy);
            }
            None => builder = builder.no_proxy(),
        }

        let client = builder
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

#[async_trait]
impl SpeechBackend for HttpBackend {
    async fn status(&self) -> Result<StatusReport> {
        let url = self.config.status_url();
        debug!(%url, "requesting backend status");

        // The body is authoritative; the HTTP status code is not consulted.
        let response = self.client.get(&url).send().await?;
        let http_status = response.status();
        let body = response.bytes().await?;
        let report: StatusReport = serde_json::from_slice(&body)?;

        debug!(
            http_status = http_status.as_u16(),
            status = %report.status,
            "backend status received"
        );
        Ok(report)
    }

    async fn synthesize(&self, text: &str) -> Result<AudioPayload> {
        let url = self.config.synthesis_url();
        debug!(%url, chars = text.chars().count(), "requesting synthesis");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = failure_message(&body);
            warn!(status = status.as_u16(), %message, "synthesis request rejected");
            return Err(Error::Synthesis {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let data = response.bytes().await?;

        debug!(bytes = data.len(), content_type = ?content_type, "synthesis succeeded");
        Ok(AudioPayload { data, content_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_prefers_server_text() {
        assert_eq!(failure_message(br#"{"message":"boom"}"#), "boom");
        assert_eq!(failure_message(br#"{"message":""}"#), "Speech generation failed");
        assert_eq!(failure_message(b"{}"), "Speech generation failed");
    }

    #[test]
    fn test_failure_message_for_unparsable_body() {
        assert_eq!(failure_message(b"<html>502</html>"), "Speech generation failed");
        assert_eq!(failure_message(b""), "Speech generation failed");
    }
}
