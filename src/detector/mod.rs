pub mod client;
pub mod errors;
pub mod types;

pub use client::VisionClient;
pub use errors::DetectError;
pub use types::{WebDetection, WebDetectionResult, WebEntity, WebImage, WebPage};

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};

use crate::google::ApiError;

/// Per-image part of an annotate response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    pub web_detection: Option<WebDetection>,
    pub error: Option<ApiError>,
}

/// A reverse image search backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebDetectionBackend: Send + Sync {
    async fn annotate(
        &self,
        image: &[u8],
        max_results: u32,
    ) -> Result<AnnotateImageResponse, DetectError>;
}

/// Runs reverse image search for local images.
pub struct WebEvidenceDetector<B> {
    backend: B,
}

impl<B: WebDetectionBackend> WebEvidenceDetector<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    #[instrument(skip(self), fields(path = %image_path.display()))]
    pub async fn detect(
        &self,
        image_path: &Path,
        max_results: u32,
    ) -> Result<WebDetectionResult, DetectError> {
        let content = tokio::fs::read(image_path)
            .await
            .map_err(|source| DetectError::ReadImage {
                path: image_path.display().to_string(),
                source,
            })?;

        let response = self.backend.annotate(&content, max_results).await?;
        if let Some(error) = response.error
            && !error.message.is_empty()
        {
            return Err(DetectError::Backend {
                message: error.message,
            });
        }

        let result = normalize(&response.web_detection.unwrap_or_default());
        if result.page_urls.is_empty() {
            info!("no matching images found");
        } else {
            info!(pages = result.page_urls.len(), "pages with matching images found");
        }
        Ok(result)
    }
}

/// Flattens a web detection annotation into page URLs, the matching image
/// URLs of each page (full matches first) and entity scores.
pub fn normalize(annotations: &WebDetection) -> WebDetectionResult {
    let mut result = WebDetectionResult::default();

    for page in &annotations.pages_with_matching_images {
        result.page_urls.push(page.url.clone());
        let images = page
            .full_matching_images
            .iter()
            .chain(&page.partial_matching_images)
            .map(|image| image.url.clone())
            .collect();
        result.matching_image_urls.insert(page.url.clone(), images);
    }

    for entity in &annotations.web_entities {
        if !entity.description.is_empty() {
            result
                .visual_entities
                .insert(entity.description.clone(), entity.score);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use std::io::Write;

    fn image(url: &str) -> WebImage {
        WebImage { url: url.into() }
    }

    fn entity(description: &str, score: f64) -> WebEntity {
        WebEntity {
            score,
            description: description.into(),
        }
    }

    fn sample_detection() -> WebDetection {
        WebDetection {
            web_entities: vec![
                entity("Flood", 0.81),
                entity("", 0.5),
                entity("Dam", 0.4),
                entity("Flood", 0.9),
            ],
            pages_with_matching_images: vec![
                WebPage {
                    url: "https://a.example/full".into(),
                    full_matching_images: vec![image("https://a.example/1.jpg")],
                    ..Default::default()
                },
                WebPage {
                    url: "https://b.example/partial".into(),
                    partial_matching_images: vec![image("https://b.example/2.jpg")],
                    ..Default::default()
                },
                WebPage {
                    url: "https://c.example/none".into(),
                    ..Default::default()
                },
            ],
        }
    }

    fn temp_image() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x89PNG fake").unwrap();
        file
    }

    #[test]
    fn normalize_keeps_every_page() {
        let result = normalize(&sample_detection());

        assert_eq!(
            result.page_urls,
            vec![
                "https://a.example/full",
                "https://b.example/partial",
                "https://c.example/none"
            ]
        );
        assert_eq!(
            result.matching_image_urls["https://a.example/full"],
            vec!["https://a.example/1.jpg"]
        );
        assert_eq!(
            result.matching_image_urls["https://b.example/partial"],
            vec!["https://b.example/2.jpg"]
        );
        assert!(result.matching_image_urls["https://c.example/none"].is_empty());
        for key in result.matching_image_urls.keys() {
            assert!(result.page_urls.contains(key));
        }
    }

    #[test]
    fn normalize_orders_full_before_partial() {
        let detection = WebDetection {
            pages_with_matching_images: vec![WebPage {
                url: "https://p.example".into(),
                full_matching_images: vec![image("full-1"), image("full-2")],
                partial_matching_images: vec![image("partial-1")],
                ..Default::default()
            }],
            ..Default::default()
        };
        let result = normalize(&detection);
        assert_eq!(
            result.matching_image_urls["https://p.example"],
            vec!["full-1", "full-2", "partial-1"]
        );
    }

    #[test]
    fn normalize_entities_skip_blank_and_last_wins() {
        let result = normalize(&sample_detection());
        assert_eq!(result.visual_entities.len(), 2);
        assert_eq!(result.visual_entities["Flood"], 0.9);
        assert_eq!(result.visual_entities["Dam"], 0.4);
    }

    #[tokio::test]
    async fn detect_uses_backend_annotations() {
        let file = temp_image();
        let mut backend = MockWebDetectionBackend::new();
        backend
            .expect_annotate()
            .with(eq(&b"\x89PNG fake"[..]), eq(50u32))
            .times(1)
            .returning(|_, _| {
                Ok(AnnotateImageResponse {
                    web_detection: Some(sample_detection()),
                    error: None,
                })
            });

        let detector = WebEvidenceDetector::new(backend);
        let result = detector.detect(file.path(), 50).await.unwrap();
        assert_eq!(result.page_urls.len(), 3);
    }

    #[tokio::test]
    async fn detect_without_matches_is_not_an_error() {
        let file = temp_image();
        let mut backend = MockWebDetectionBackend::new();
        backend.expect_annotate().returning(|_, _| {
            Ok(AnnotateImageResponse {
                web_detection: Some(WebDetection {
                    web_entities: vec![entity("Sky", 0.3)],
                    ..Default::default()
                }),
                error: None,
            })
        });

        let result = WebEvidenceDetector::new(backend)
            .detect(file.path(), 10)
            .await
            .unwrap();
        assert!(result.page_urls.is_empty());
        assert!(result.matching_image_urls.is_empty());
        assert_eq!(result.visual_entities["Sky"], 0.3);
    }

    #[tokio::test]
    async fn detect_fails_on_backend_error_message() {
        let file = temp_image();
        let mut backend = MockWebDetectionBackend::new();
        backend.expect_annotate().returning(|_, _| {
            Ok(AnnotateImageResponse {
                web_detection: None,
                error: Some(ApiError {
                    code: 3,
                    message: "Bad image data.".into(),
                    status: String::new(),
                }),
            })
        });

        let err = WebEvidenceDetector::new(backend)
            .detect(file.path(), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DetectError::Backend { .. }));
        assert!(err.to_string().starts_with("Bad image data."));
    }

    #[tokio::test]
    async fn detect_missing_file_is_read_error() {
        let mut backend = MockWebDetectionBackend::new();
        backend.expect_annotate().never();

        let err = WebEvidenceDetector::new(backend)
            .detect(Path::new("/definitely/not/here.jpg"), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DetectError::ReadImage { .. }));
    }
}
