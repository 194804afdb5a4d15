pub mod chunk;
pub mod client;
pub mod errors;
pub mod language;

pub use chunk::{MAX_CHUNK_CHARS, split_text};
pub use client::GoogleTranslateClient;
pub use errors::TranslateError;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::extractor::ExtractedPage;

/// A machine translation backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translate: Send + Sync {
    /// Translates `text` into `target_language` (ISO 639-1), detecting the source language.
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError>;
}

/// Translates every text field of scraped pages into one target language.
pub struct RecordTranslator<T> {
    backend: T,
    target_language: String,
    max_chunk_chars: usize,
    skip_same_language: bool,
}

impl<T: Translate> RecordTranslator<T> {
    pub fn new(backend: T, target_language: impl Into<String>) -> Self {
        Self {
            backend,
            target_language: target_language.into(),
            max_chunk_chars: MAX_CHUNK_CHARS,
            skip_same_language: false,
        }
    }

    /// Keep chunks that already read as the target language instead of sending them.
    pub fn with_language_skip(mut self, enabled: bool) -> Self {
        self.skip_same_language = enabled;
        self
    }

    /// Translates `text` chunk by chunk and joins the results in order.
    /// Any failing chunk fails the whole text.
    pub async fn translate_text(&self, text: &str) -> Result<String, TranslateError> {
        let mut translated = String::with_capacity(text.len());
        for chunk in split_text(text, self.max_chunk_chars) {
            if self.skip_same_language && language::is_language(chunk, &self.target_language) {
                debug!(chars = chunk.len(), "chunk already in target language");
                translated.push_str(chunk);
                continue;
            }
            let piece = self.backend.translate(chunk, &self.target_language).await?;
            translated.push_str(&piece);
        }
        Ok(translated)
    }

    async fn translate_optional(&self, text: &Option<String>) -> Result<Option<String>, TranslateError> {
        match text {
            Some(text) => Ok(Some(self.translate_text(text).await?)),
            None => Ok(None),
        }
    }

    async fn translate_list(&self, items: &[String]) -> Result<Vec<String>, TranslateError> {
        let mut translated = Vec::with_capacity(items.len());
        for item in items {
            translated.push(self.translate_text(item).await?);
        }
        Ok(translated)
    }

    /// Returns a copy of `page` with every string field translated, list
    /// fields element by element.
    #[instrument(skip_all, fields(url = %page.url))]
    pub async fn translate_page(&self, page: &ExtractedPage) -> Result<ExtractedPage, TranslateError> {
        Ok(ExtractedPage {
            title: self.translate_text(&page.title).await?,
            author: self.translate_optional(&page.author).await?,
            url: self.translate_text(&page.url).await?,
            description: self.translate_optional(&page.description).await?,
            text: self.translate_text(&page.text).await?,
            image: self.translate_optional(&page.image).await?,
            image_url: self.translate_list(&page.image_url).await?,
            image_caption: self.translate_list(&page.image_caption).await?,
        })
    }
}
