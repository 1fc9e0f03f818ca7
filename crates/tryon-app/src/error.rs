use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("A try-on is already being processed")]
    AlreadySubmitting,

    #[error("Unknown catalog item: {0}")]
    UnknownCatalogItem(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
