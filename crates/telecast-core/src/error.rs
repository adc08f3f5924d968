use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelecastError {
    #[error("config error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(#[from] telecast_api::ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
