use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `webDetection` annotation as returned by the Vision API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebDetection {
    #[serde(default)]
    pub web_entities: Vec<WebEntity>,
    #[serde(default)]
    pub pages_with_matching_images: Vec<WebPage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebEntity {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPage {
    pub url: String,
    #[serde(default)]
    pub full_matching_images: Vec<WebImage>,
    #[serde(default)]
    pub partial_matching_images: Vec<WebImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebImage {
    pub url: String,
}

/// Reverse image search outcome for one local image.
///
/// Every key of `matching_image_urls` is also in `page_urls`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebDetectionResult {
    pub page_urls: Vec<String>,
    pub matching_image_urls: BTreeMap<String, Vec<String>>,
    pub visual_entities: BTreeMap<String, f64>,
}
