use url::Url;

/// A successfully fetched page, already decoded to UTF-8.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub url_final: Url,
    pub body: String,
    /// WHATWG label of the encoding the body was decoded from.
    pub encoding: &'static str,
}
