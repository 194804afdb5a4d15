#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use ris_evidence::extractor::{DEFAULT_URL_THRESHOLD, build_page, find_caption};

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let base = Url::parse("https://example.com/article").unwrap();
    let candidates = vec!["https://example.com/image.jpg".to_string()];

    // Neither extraction nor caption lookup may panic on arbitrary markup
    let _ = build_page(base.as_str(), &base, &html, &candidates);
    let document = scraper::Html::parse_document(&html);
    let _ = find_caption(&document, "https://example.com/image.jpg", DEFAULT_URL_THRESHOLD);
});
