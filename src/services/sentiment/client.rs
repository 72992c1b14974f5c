//! Client for a Hugging Face style text-classification endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::SentimentLabel;

use super::{ClassifierError, Sentiment, SentimentClassifier};

/// Environment variable holding the inference API token.
pub const TOKEN_ENV: &str = "HF_API_TOKEN";

/// Configuration for the sentiment classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Inference API base; the model id is appended.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Bearer token. Falls back to `HF_API_TOKEN`. Never written back out.
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,
    /// Longest text sent to the model, in characters.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}
fn default_model() -> String {
    "distilbert-base-uncased-finetuned-sst-2-english".to_string()
}
fn default_max_input_chars() -> usize {
    512
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_token: None,
            max_input_chars: default_max_input_chars(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClassifierConfig {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Token from the config, else from the environment.
    pub fn token(&self) -> Option<String> {
        self.api_token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .filter(|t| !t.is_empty())
    }

    /// Full URL the texts are posted to.
    pub fn model_url(&self) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), self.model)
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Text-classification responses come nested per input or flat.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            Self::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
            Self::Flat(scores) => scores,
        }
    }
}

/// Pick the highest-scoring label.
fn best_sentiment(scores: Vec<LabelScore>) -> Result<Sentiment, ClassifierError> {
    let best = scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| ClassifierError::Parse("empty classification result".to_string()))?;
    let label = SentimentLabel::parse(&best.label)
        .ok_or_else(|| ClassifierError::UnknownLabel(best.label.clone()))?;
    Ok(Sentiment {
        label,
        score: best.score,
    })
}

/// Sentiment classifier backed by a remote inference API.
pub struct InferenceClient {
    config: ClassifierConfig,
    client: Client,
}

impl InferenceClient {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassifierError::Connection(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

#[async_trait]
impl SentimentClassifier for InferenceClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        let url = self.config.model_url();
        let mut request = self.client.post(&url).json(&InferenceRequest { inputs: text });
        if let Some(token) = self.config.token() {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ClassifierError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClassifierError::Api { status, body });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ClassifierError::Connection(e.to_string()))?;
        debug!("Classifier answered: {}", body);
        parse_response(&body)
    }
}

fn parse_response(body: &str) -> Result<Sentiment, ClassifierError> {
    let response: InferenceResponse =
        serde_json::from_str(body).map_err(|e| ClassifierError::Parse(e.to_string()))?;
    best_sentiment(response.into_scores())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_response() {
        let s = parse_response(
            r#"[[{"label":"NEGATIVE","score":0.0012},{"label":"POSITIVE","score":0.9988}]]"#,
        )
        .unwrap();
        assert_eq!(s.label, SentimentLabel::Positive);
        assert_eq!(s.score, 0.9988);
    }

    #[test]
    fn test_parse_flat_response() {
        let s = parse_response(r#"[{"label":"NEGATIVE","score":0.97}]"#).unwrap();
        assert_eq!(s.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_unknown_label() {
        let err = parse_response(r#"[{"label":"NEUTRAL","score":0.9}]"#).unwrap_err();
        assert!(matches!(err, ClassifierError::UnknownLabel(l) if l == "NEUTRAL"));
    }

    #[test]
    fn test_error_body_is_parse_error() {
        let err = parse_response(r#"{"error":"Model is loading","estimated_time":20.0}"#).unwrap_err();
        assert!(matches!(err, ClassifierError::Parse(_)));
        assert!(matches!(parse_response("[[]]"), Err(ClassifierError::Parse(_))));
    }

    #[test]
    fn test_model_url() {
        let config = ClassifierConfig::default().with_endpoint("http://localhost:8080/models/");
        assert_eq!(
            config.model_url(),
            "http://localhost:8080/models/distilbert-base-uncased-finetuned-sst-2-english"
        );
    }

    #[test]
    fn test_token_never_serialized() {
        let config = ClassifierConfig {
            api_token: Some("secret".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
