use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Article content scraped from one evidence page.
///
/// `image_caption` is aligned with `image_url`, followed by one extra entry
/// for `image` when the page declares a primary image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub description: Option<String>,
    pub text: String,
    pub image: Option<String>,
    pub image_url: Vec<String>,
    pub image_caption: Vec<String>,
}

/// What article extraction yields before captions are attached.
#[derive(Debug, Default)]
pub struct ArticleFields {
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub text: String,
    pub image: Option<String>,
}

static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

/// Collapses runs of spaces/tabs and squeezes blank lines to a single empty line.
pub fn normalize_whitespace(text: &str) -> String {
    let spaced = SPACES.replace_all(text.trim(), " ");
    BLANK_LINES.replace_all(&spaced, "\n\n").into_owned()
}
