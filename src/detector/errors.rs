use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("failed to read image {path}: {source}")]
    ReadImage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("web detection request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an error message, at HTTP level or inside
    /// the per-image response.
    #[error(
        "{message}\nFor more info on error messages, check: https://cloud.google.com/apis/design/errors"
    )]
    Backend { message: String },

    #[error("web detection response had no result for the image")]
    EmptyResponse,
}
