//! Fuzzy image URL comparison.
//!
//! Pages rarely reference an image by exactly the URL the search backend
//! reported (CDN prefixes, resize query strings, protocol-relative `src`), so
//! two URLs count as the same resource when their Levenshtein distance is
//! below a threshold. No normalisation happens before comparing.

/// Default maximum edit distance (exclusive) between two matching URLs.
pub const DEFAULT_URL_THRESHOLD: usize = 25;

/// `true` iff the edit distance between `url1` and `url2` is strictly below `threshold`.
pub fn urls_match(url1: &str, url2: &str, threshold: usize) -> bool {
    strsim::levenshtein(url1, url2) < threshold
}
