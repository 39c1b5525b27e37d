use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// HTTP client couldn't be built
    #[error("Can't build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Both the primary and the fallback request failed
    #[error("Unable to fetch schedule from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Less than the three weekend days were found in the page
    #[error("Failed to parse all weekend slots ({found}/3 found). The page layout may have changed.")]
    IncompleteSchedule { found: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
