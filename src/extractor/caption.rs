//! Caption lookup for an image inside a parsed page.
//!
//! Strategies, first hit wins:
//! 1. `<figcaption>` of the nearest enclosing `<figure>`
//! 2. first following sibling `div`/`p`/`small` with text
//! 3. the image's `title` attribute
//! 4. the image's `alt` attribute

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::extractor::matcher::urls_match;

pub const IMAGE_NOT_FOUND: &str = "Image not found";
pub const CAPTION_NOT_FOUND: &str = "Caption not found";

const SOURCE_ATTRS: [&str; 3] = ["src", "data-src", "data-original"];
const SIBLING_TAGS: [&str; 3] = ["div", "p", "small"];

static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());
static FIGCAPTION: Lazy<Selector> = Lazy::new(|| Selector::parse("figcaption").unwrap());

/// Returns the caption text for `image_url`, or one of the sentinels
/// [`IMAGE_NOT_FOUND`] / [`CAPTION_NOT_FOUND`].
pub fn find_caption(document: &Html, image_url: &str, threshold: usize) -> String {
    let Some(img) = find_image(document, image_url, threshold) else {
        return IMAGE_NOT_FOUND.to_string();
    };

    figure_caption(img)
        .or_else(|| sibling_caption(img))
        .or_else(|| attr_caption(img, "title"))
        .or_else(|| attr_caption(img, "alt"))
        .unwrap_or_else(|| CAPTION_NOT_FOUND.to_string())
}

fn image_source<'a>(img: &ElementRef<'a>) -> Option<&'a str> {
    SOURCE_ATTRS
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .find(|value| !value.is_empty())
}

fn find_image<'a>(document: &'a Html, image_url: &str, threshold: usize) -> Option<ElementRef<'a>> {
    document.select(&IMG).find(|img| {
        image_source(img).is_some_and(|src| urls_match(src, image_url, threshold))
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn figure_caption(img: ElementRef<'_>) -> Option<String> {
    // Only the innermost figure is considered
    let figure = img
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "figure")?;
    let caption = figure.select(&FIGCAPTION).next()?;
    Some(text_of(caption))
}

fn sibling_caption(img: ElementRef<'_>) -> Option<String> {
    img.next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|el| SIBLING_TAGS.contains(&el.value().name()))
        .map(text_of)
        .find(|text| !text.is_empty())
}

fn attr_caption(img: ElementRef<'_>, attr: &str) -> Option<String> {
    img.value()
        .attr(attr)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}


#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn find_caption_never_panics(html in ".*", url in "https?://[a-z]+\\.com/.*") {
            let document = Html::parse_document(&html);
            let _ = find_caption(&document, &url, 25);
        }
    }
}
