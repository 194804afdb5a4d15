use url::Url;

use crate::extractor::{CAPTION_NOT_FOUND, IMAGE_NOT_FOUND, ScrapeError, build_page};
use crate::fetcher::FetchError;

const ARTICLE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Dam collapse floods valley villages</title>
  <meta name="author" content="Maria Lopez">
  <meta name="description" content="Heavy rain caused a dam to fail overnight.">
  <meta property="og:image" content="https://cdn.example.com/lead.jpg">
</head>
<body>
  <nav><a href="/">Home</a> | <a href="/world">World</a></nav>
  <article>
    <h1>Dam collapse floods valley villages</h1>
    <figure>
      <img src="https://cdn.example.com/lead.jpg" alt="lead alt">
      <figcaption>Water pours through the broken dam wall.</figcaption>
    </figure>
    <p>Heavy rain over the weekend caused the old dam above the valley to fail overnight, sending water into three villages downstream.</p>
    <p>Emergency services evacuated hundreds of residents and set up shelters in the regional school, officials said on Monday morning.</p>
    <div>
      <img src="https://images.example.net/uploads/2024/05/rescuers-carrying-resident.jpeg">
      <p>Rescuers carry a resident to safety.</p>
    </div>
    <p>Engineers had warned about cracks in the structure for several years, according to documents seen by reporters this week.</p>
  </article>
</body>
</html>"#;

const RESCUE_IMAGE: &str = "https://images.example.net/uploads/2024/05/rescuers-carrying-resident.jpeg";

fn base() -> Url {
    Url::parse("https://news.example.com/dam").unwrap()
}

#[test]
fn test_build_page_attaches_aligned_captions() {
    let candidates = vec![
        RESCUE_IMAGE.to_string(),
        "https://archive.unrelated-site.org/collections/2019/never-appears-on-this-page/at-all/original-size/photo-0001.png".to_string(),
    ];
    let page = build_page("https://news.example.com/dam", &base(), ARTICLE, &candidates).unwrap();

    assert_eq!(page.url, "https://news.example.com/dam");
    assert!(page.title.contains("Dam collapse"));
    assert_eq!(page.author.as_deref(), Some("Maria Lopez"));
    assert_eq!(
        page.description.as_deref(),
        Some("Heavy rain caused a dam to fail overnight.")
    );
    assert!(page.text.contains("Emergency services evacuated"));
    assert_eq!(page.image.as_deref(), Some("https://cdn.example.com/lead.jpg"));

    assert_eq!(page.image_url, candidates);
    assert_eq!(page.image_caption.len(), page.image_url.len() + 1);
    assert_eq!(page.image_caption[0], "Rescuers carry a resident to safety.");
    assert_eq!(page.image_caption[1], IMAGE_NOT_FOUND);
    assert_eq!(page.image_caption[2], "Water pours through the broken dam wall.");
}

#[test]
fn test_build_page_without_primary_image() {
    let html = ARTICLE.replace(
        r#"<meta property="og:image" content="https://cdn.example.com/lead.jpg">"#,
        "",
    );
    let candidates = vec![RESCUE_IMAGE.to_string()];
    let page = build_page("https://news.example.com/dam", &base(), &html, &candidates).unwrap();

    assert_eq!(page.image, None);
    assert_eq!(page.image_caption.len(), 1);
}

#[test]
fn test_caption_not_found_is_a_value() {
    let html = ARTICLE.replace(r#"<p>Rescuers carry a resident to safety.</p>"#, "");
    let candidates = vec![RESCUE_IMAGE.to_string()];
    let page = build_page("https://news.example.com/dam", &base(), &html, &candidates).unwrap();

    assert_eq!(page.image_caption[0], CAPTION_NOT_FOUND);
}

#[test]
fn test_empty_page_is_extraction_error() {
    let result = build_page("https://x.example.com", &base(), "<html><body></body></html>", &[]);
    match result {
        Err(err @ ScrapeError::Extraction(_)) => {
            assert!(err.to_string().starts_with("Error occurred: "));
        }
        other => panic!("expected extraction error, got {other:?}"),
    }
}

#[test]
fn test_failure_messages() {
    let not_found: ScrapeError = FetchError::Http {
        status: reqwest::StatusCode::NOT_FOUND,
    }
    .into();
    assert_eq!(not_found.to_string(), "Failed to retrieve webpage");

    let timeout: ScrapeError = FetchError::RequestTimeout.into();
    assert_eq!(timeout.to_string(), "Error occurred: request timeout");
}
