//! # HttpClassifier
//!
//! Calls hosted text-classification models (one endpoint for sentiment, one
//! for toxicity) with a `{"inputs": text}` body and a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use domains::{ClassifierError, Sentiment, SentimentClassifier, ToxicityClassifier, ToxicityScore};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;

use crate::labels::{sentiment_from_label, ClassificationOutput, LabelScore};

const USER_AGENT: &str = concat!("modboard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpClassifierConfig {
    pub sentiment_url: String,
    pub toxicity_url: String,
    pub api_token: Option<SecretString>,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

pub struct HttpClassifier {
    http_client: reqwest::Client,
    config: HttpClassifierConfig,
}

impl HttpClassifier {
    pub fn new(config: HttpClassifierConfig) -> Result<Self, ClassifierError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    async fn classify(&self, url: &str, text: &str) -> Result<LabelScore, ClassifierError> {
        let mut request = self
            .http_client
            .post(url)
            .json(&InferenceRequest { inputs: text });
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ClassifierError::Timeout(self.config.timeout.as_millis() as u64)
            } else {
                ClassifierError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status(status.as_u16(), body));
        }

        let output: ClassificationOutput = response
            .json()
            .await
            .map_err(|e| ClassifierError::UnexpectedOutput(e.to_string()))?;
        let top = output.top()?;
        debug!(url, label = %top.label, score = top.score, "classifier response");
        Ok(top)
    }
}

#[async_trait]
impl SentimentClassifier for HttpClassifier {
    async fn classify_sentiment(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        let top = self.classify(&self.config.sentiment_url, text).await?;
        sentiment_from_label(&top.label)
    }
}

#[async_trait]
impl ToxicityClassifier for HttpClassifier {
    async fn score_toxicity(&self, text: &str) -> Result<ToxicityScore, ClassifierError> {
        let top = self.classify(&self.config.toxicity_url, text).await?;
        Ok(top.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_is_a_classifier_error() {
        let classifier = HttpClassifier::new(HttpClassifierConfig {
            sentiment_url: "http://127.0.0.1:9/sentiment".into(),
            toxicity_url: "http://127.0.0.1:9/toxicity".into(),
            api_token: None,
            timeout: Duration::from_millis(500),
        })
        .unwrap();

        assert!(classifier.classify_sentiment("hello").await.is_err());
        assert!(classifier.score_toxicity("hello").await.is_err());
    }
}
