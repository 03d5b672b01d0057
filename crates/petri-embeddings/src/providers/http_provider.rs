//! OpenAI-compatible HTTP embedding provider.
//!
//! Blocking reqwest client with a hard per-request timeout. Transient
//! transport failures map to retryable `EmbeddingError`s; the retry
//! policy and degradation chain live a layer above.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use petri_core::config::EmbeddingConfig;
use petri_core::errors::{EmbeddingError, PetriResult};
use petri_core::traits::EmbeddingProvider;

const PROVIDER_NAME: &str = "http";

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

/// HTTP provider speaking the OpenAI `/embeddings` wire format.
pub struct HttpProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    dimensions: usize,
    timeout_ms: u64,
}

impl HttpProvider {
    /// Build from config. Fails when the endpoint is missing.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| EmbeddingError::ProviderUnavailable {
                provider: PROVIDER_NAME.to_string(),
                reason: "no endpoint configured".to_string(),
            })?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| EmbeddingError::ProviderUnavailable {
                provider: PROVIDER_NAME.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint,
            model: config
                .model
                .clone()
                .unwrap_or_else(|| "text-embedding-3-small".to_string()),
            dimensions: config.dimensions,
            timeout_ms: config.timeout_ms,
        })
    }

    fn request(&self, inputs: Vec<&str>) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingError::Timeout {
                        provider: PROVIDER_NAME.to_string(),
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    EmbeddingError::ProviderUnavailable {
                        provider: PROVIDER_NAME.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            // 429 and 5xx are transient; anything else is a hard failure.
            if status.as_u16() == 429 || status.is_server_error() {
                return Err(EmbeddingError::ProviderUnavailable {
                    provider: PROVIDER_NAME.to_string(),
                    reason: format!("status {status}"),
                });
            }
            return Err(EmbeddingError::MalformedResponse {
                provider: PROVIDER_NAME.to_string(),
                details: format!("status {status}"),
            });
        }

        let parsed: EmbeddingResponse =
            response
                .json()
                .map_err(|e| EmbeddingError::MalformedResponse {
                    provider: PROVIDER_NAME.to_string(),
                    details: e.to_string(),
                })?;

        let mut vectors = Vec::with_capacity(parsed.data.len());
        for datum in parsed.data {
            if datum.embedding.len() != self.dimensions {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimensions,
                    actual: datum.embedding.len(),
                });
            }
            vectors.push(datum.embedding);
        }
        Ok(vectors)
    }
}

impl EmbeddingProvider for HttpProvider {
    fn embed(&self, text: &str) -> PetriResult<Vec<f32>> {
        let mut vectors = self.request(vec![text])?;
        vectors.pop().ok_or_else(|| {
            EmbeddingError::MalformedResponse {
                provider: PROVIDER_NAME.to_string(),
                details: "empty data array".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> PetriResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        Ok(self.request(inputs)?)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        // Availability is discovered per call; the chain handles failures.
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_requires_endpoint() {
        let config = EmbeddingConfig {
            provider: "http".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpProvider::from_config(&config),
            Err(EmbeddingError::ProviderUnavailable { .. })
        ));
    }

    #[test]
    fn from_config_accepts_endpoint() {
        let config = EmbeddingConfig {
            provider: "http".to_string(),
            endpoint: Some("http://localhost:9999/v1/embeddings".to_string()),
            ..Default::default()
        };
        let provider = HttpProvider::from_config(&config).unwrap();
        assert_eq!(provider.dimensions(), config.dimensions);
        assert_eq!(provider.name(), "http");
    }
}
