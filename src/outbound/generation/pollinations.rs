//! Reqwest-backed generation source adapter.
//!
//! This adapter owns transport details only: request serialisation, the
//! bounded timeout, HTTP error mapping, and relaying the raw text body. The
//! response is never parsed as JSON here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;

use crate::domain::ports::{GenerationSource, GenerationSourceError};
use crate::domain::ChatMessage;

/// Default upstream endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://text.pollinations.ai";
/// Default request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct GenerationRequestDto<'a> {
    messages: &'a [ChatMessage],
    model: &'a str,
    #[serde(rename = "jsonMode")]
    json_mode: bool,
    private: bool,
}

/// Generation source that POSTs the conversation to one HTTP endpoint.
pub struct PollinationsSource {
    client: Client,
    endpoint: Url,
}

impl PollinationsSource {
    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

fn map_transport_error(error: reqwest::Error) -> GenerationSourceError {
    if error.is_timeout() {
        GenerationSourceError::Timeout
    } else {
        GenerationSourceError::upstream(error.to_string())
    }
}

#[async_trait]
impl GenerationSource for PollinationsSource {
    async fn generate(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<String, GenerationSourceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&GenerationRequestDto {
                messages,
                model,
                json_mode: false,
                private: true,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(GenerationSourceError::upstream(format!(
                "upstream returned {status}: {body}"
            )));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn request_dto_matches_upstream_contract() {
        let messages = vec![ChatMessage {
            role: crate::domain::ChatRole::User,
            content: "hello".to_owned(),
        }];
        let dto = GenerationRequestDto {
            messages: &messages,
            model: "openai",
            json_mode: false,
            private: true,
        };
        let value = serde_json::to_value(&dto).expect("serialize request");
        assert_eq!(
            value,
            serde_json::json!({
                "messages": [{"role": "user", "content": "hello"}],
                "model": "openai",
                "jsonMode": false,
                "private": true,
            })
        );
    }
}
