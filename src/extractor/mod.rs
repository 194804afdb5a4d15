pub mod caption;
pub mod errors;
pub mod matcher;
pub mod model;
pub mod reader;

#[cfg(test)]
mod tests;

pub use caption::{CAPTION_NOT_FOUND, IMAGE_NOT_FOUND, find_caption};
pub use errors::ScrapeError;
pub use matcher::{DEFAULT_URL_THRESHOLD, urls_match};
pub use model::ExtractedPage;

use scraper::Html;
use tracing::{debug, instrument};
use url::Url;

use crate::fetcher::fetch;

/// Fetches `page_url` and turns it into an [`ExtractedPage`] whose captions
/// line up with `candidate_image_urls`.
#[instrument(skip(candidate_image_urls), fields(candidates = candidate_image_urls.len()))]
pub async fn extract(
    page_url: &str,
    candidate_image_urls: &[String],
) -> Result<ExtractedPage, ScrapeError> {
    let response = fetch(page_url).await?;
    build_page(page_url, &response.url_final, &response.body, candidate_image_urls)
}

/// The offline half of [`extract`]: article extraction plus caption lookup
/// over an already fetched body.
pub fn build_page(
    page_url: &str,
    base_url: &Url,
    html: &str,
    candidate_image_urls: &[String],
) -> Result<ExtractedPage, ScrapeError> {
    let article = reader::extract(html, base_url)
        .ok_or_else(|| ScrapeError::Extraction("no article content found".to_string()))?;

    let document = Html::parse_document(html);
    let mut image_caption: Vec<String> = candidate_image_urls
        .iter()
        .map(|image_url| find_caption(&document, image_url, DEFAULT_URL_THRESHOLD))
        .collect();
    if let Some(image) = &article.image {
        image_caption.push(find_caption(&document, image, DEFAULT_URL_THRESHOLD));
    }
    debug!(captions = image_caption.len(), "captions attached");

    Ok(ExtractedPage {
        title: article.title,
        author: article.author,
        url: page_url.to_string(),
        description: article.description,
        text: article.text,
        image: article.image,
        image_url: candidate_image_urls.to_vec(),
        image_caption,
    })
}
