use thiserror::Error;

use crate::fetcher::FetchError;

/// Why an evidence page produced no record. These are expected outcomes for a
/// share of any URL batch; callers log and skip them.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to retrieve webpage")]
    NotRetrieved { status: reqwest::StatusCode },

    #[error("Error occurred: {0}")]
    Fetch(FetchError),

    #[error("Error occurred: {0}")]
    Extraction(String),
}

impl From<FetchError> for ScrapeError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Http { status } => Self::NotRetrieved { status },
            other => Self::Fetch(other),
        }
    }
}
