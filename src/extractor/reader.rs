use kuchiki::traits::TendrilSink;
use once_cell::sync::Lazy;
use readability::extractor;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::extractor::model::{ArticleFields, normalize_whitespace};

const MIN_FALLBACK_TEXT: usize = 100;

const AUTHOR_META: [&str; 3] = [
    "meta[name='author']",
    "meta[property='article:author']",
    "meta[property='og:article:author']",
];
const DESCRIPTION_META: [&str; 2] = [
    "meta[name='description']",
    "meta[property='og:description']",
];
const TITLE_META: [&str; 1] = ["meta[property='og:title']"];
const IMAGE_META: [&str; 3] = [
    "meta[property='og:image']",
    "meta[name='twitter:image']",
    "meta[property='twitter:image']",
];
const CONTENT_SELECTORS: [&str; 9] = [
    "article",
    "main",
    "[role='main']",
    ".content",
    ".post",
    ".article",
    "#content",
    "#main",
    ".entry-content",
];

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// Extracts the article fields of a page. Tables are dropped before the
/// readability pass. `None` when neither readability nor the selector
/// fallback finds any text.
pub fn extract(html: &str, base_url: &Url) -> Option<ArticleFields> {
    let without_tables = strip_tables(html);
    let document = Html::parse_document(html);

    let (title, text) = match extractor::extract(&mut without_tables.as_bytes(), base_url) {
        Ok(product) if !product.text.trim().is_empty() => (product.title, product.text),
        Ok(_) | Err(_) => {
            debug!(url = %base_url, "readability found nothing, using selector fallback");
            let fallback = Html::parse_document(&without_tables);
            let text = fallback_text(&fallback);
            if text.trim().is_empty() {
                return None;
            }
            (String::new(), text)
        }
    };

    let title = if title.trim().is_empty() {
        document_title(&document).unwrap_or_default()
    } else {
        title.trim().to_string()
    };

    Some(ArticleFields {
        title,
        author: first_meta(&document, &AUTHOR_META),
        description: first_meta(&document, &DESCRIPTION_META),
        text: normalize_whitespace(&text),
        image: first_meta(&document, &IMAGE_META).map(|src| resolve(base_url, &src)),
    })
}

fn strip_tables(html: &str) -> String {
    let document = kuchiki::parse_html().one(html);
    if let Ok(tables) = document.select("table") {
        // collect first: detaching while iterating the selection skips nodes
        let tables: Vec<_> = tables.collect();
        for table in tables {
            table.as_node().detach();
        }
    }
    document.to_string()
}

fn first_meta(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .filter_map(|el| el.value().attr("content"))
                .map(str::trim)
                .find(|content| !content.is_empty())
                .map(str::to_string)
        })
}

fn resolve(base_url: &Url, src: &str) -> String {
    base_url
        .join(src)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| src.to_string())
}

fn document_title(document: &Html) -> Option<String> {
    if let Some(title) = first_meta(document, &TITLE_META) {
        return Some(title);
    }

    [&*TITLE, &*H1].into_iter().find_map(|selector| {
        document
            .select(selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .find(|t| !t.is_empty())
    })
}

fn fallback_text(document: &Html) -> String {
    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = element.text().collect::<String>();
            if text.trim().len() > MIN_FALLBACK_TEXT {
                return text;
            }
        }
    }

    document
        .select(&BODY)
        .next()
        .map(|body| body.text().collect::<String>())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://news.example.com/2024/story").unwrap()
    }

    #[test]
    fn tables_are_removed() {
        let html = "<html><body><p>keep</p><table><tr><td>drop<table><tr><td>inner</td></tr></table></td></tr></table></body></html>";
        let stripped = strip_tables(html);
        assert!(stripped.contains("keep"));
        assert!(!stripped.contains("drop"));
        assert!(!stripped.contains("inner"));
    }

    #[test]
    fn meta_fields_are_collected() {
        let html = r#"<html><head>
            <meta name="author" content=" Jane Roe ">
            <meta property="og:description" content="What happened">
            <meta property="og:image" content="/img/lead.jpg">
            </head><body></body></html>"#;
        let document = Html::parse_document(html);
        assert_eq!(first_meta(&document, &AUTHOR_META), Some("Jane Roe".to_string()));
        assert_eq!(first_meta(&document, &DESCRIPTION_META), Some("What happened".to_string()));
        assert_eq!(
            first_meta(&document, &IMAGE_META).map(|s| resolve(&base(), &s)),
            Some("https://news.example.com/img/lead.jpg".to_string())
        );
    }

    #[test]
    fn title_prefers_og_title() {
        let html = r#"<html><head><meta property="og:title" content="OG"><title>Plain</title></head></html>"#;
        assert_eq!(document_title(&Html::parse_document(html)), Some("OG".to_string()));
    }

    #[test]
    fn blank_og_title_falls_back_to_title_tag() {
        let html = r#"<html><head><meta property="og:title" content="  "><title> Plain </title></head></html>"#;
        assert_eq!(document_title(&Html::parse_document(html)), Some("Plain".to_string()));
    }

    #[test]
    fn title_falls_back_to_h1() {
        let html = "<html><body><h1> Headline </h1></body></html>";
        assert_eq!(document_title(&Html::parse_document(html)), Some("Headline".to_string()));
    }

    #[test]
    fn extracts_article_text() {
        let paragraph = "The flood waters reached the old town centre on Tuesday morning, residents said. ";
        let html = format!(
            r#"<html><head><title>Floods hit town</title><meta name="author" content="A. Writer"></head>
            <body><nav>Home | World</nav><article><h1>Floods hit town</h1><p>{}</p><p>{}</p></article>
            <table><tr><td>Table cell noise</td></tr></table></body></html>"#,
            paragraph.repeat(6),
            paragraph.repeat(6)
        );
        let fields = extract(&html, &base()).unwrap();
        assert!(fields.title.contains("Floods hit town"));
        assert!(fields.text.contains("flood waters"));
        assert!(!fields.text.contains("Table cell noise"));
        assert_eq!(fields.author, Some("A. Writer".to_string()));
        assert_eq!(fields.image, None);
    }

    #[test]
    fn empty_page_yields_none() {
        assert!(extract("<html><body></body></html>", &base()).is_none());
    }
}
