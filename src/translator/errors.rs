use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation backend returned {status}: {message}")]
    Backend {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("translation backend returned no translations")]
    EmptyResponse,
}
