use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::google::error_message;
use crate::translator::{Translate, TranslateError};

/// Cloud Translation v2 (`translate/v2`) REST client authenticated with an API key.
/// The source language is left out of every request so the backend detects it.
#[derive(Debug, Clone)]
pub struct GoogleTranslateClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    data: TranslationList,
}

#[derive(Deserialize)]
struct TranslationList {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
    detected_source_language: Option<String>,
}

impl GoogleTranslateClient {
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Translate for GoogleTranslateClient {
    #[instrument(skip_all, fields(chars = text.chars().count(), target = target_language))]
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&TranslateRequest {
                q: text,
                target: target_language,
                format: "text",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(TranslateError::Backend { status, message });
        }

        let body: TranslateResponse = response.json().await?;
        let translation = body
            .data
            .translations
            .into_iter()
            .next()
            .ok_or(TranslateError::EmptyResponse)?;
        debug!(source = ?translation.detected_source_language, "chunk translated");

        Ok(translation.translated_text)
    }
}
