use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use crate::detector::{AnnotateImageResponse, DetectError, WebDetectionBackend};
use crate::google::error_message;

/// Cloud Vision `images:annotate` REST client authenticated with an API key.
#[derive(Debug, Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

#[derive(Serialize)]
struct AnnotateRequestBatch {
    requests: [AnnotateImageRequest; 1],
}

#[derive(Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: [Feature; 1],
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    max_results: u32,
}

#[derive(Deserialize)]
struct AnnotateResponseBatch {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

impl VisionClient {
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl WebDetectionBackend for VisionClient {
    #[instrument(skip_all, fields(bytes = image.len(), max_results = max_results))]
    async fn annotate(
        &self,
        image: &[u8],
        max_results: u32,
    ) -> Result<AnnotateImageResponse, DetectError> {
        let request = AnnotateRequestBatch {
            requests: [AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: [Feature {
                    kind: "WEB_DETECTION",
                    max_results,
                }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let message = error_message(response).await;
            return Err(DetectError::Backend { message });
        }

        let batch: AnnotateResponseBatch = response.json().await?;
        batch
            .responses
            .into_iter()
            .next()
            .ok_or(DetectError::EmptyResponse)
    }
}
