use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CspError {
    #[error("Invalid directive detected '{0}'")]
    InvalidDirective(String),

    #[error("Unsupported hash algorithm detected '{0}'")]
    UnsupportedHashAlgorithm(String),

    #[error("The builder \"{0}\" is not a registered HeaderBuilder implementation")]
    InvalidClass(String),

    #[error("Invalid source URL: {0}")]
    InvalidSourceUrl(String),

    #[error("Random source error: {0}")]
    RandomSource(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Header processing error: {0}")]
    Header(String),
}

impl From<serde_json::Error> for CspError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl ResponseError for CspError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidDirective(_)
            | Self::UnsupportedHashAlgorithm(_)
            | Self::InvalidSourceUrl(_) => StatusCode::BAD_REQUEST,

            Self::InvalidClass(_)
            | Self::RandomSource(_)
            | Self::Config(_)
            | Self::Header(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
