use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "No suitable package found";

const NOT_APPLICABLE_MESSAGE: &str = "We are unable to pack the provided products at this time. Please check the product specifications or try again later";
const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again later";

#[derive(Error, Debug)]
pub enum PackingError {
    /// A strategy could not answer; the chain moves on to the next one.
    #[error("Packing strategy failed: {message}")]
    StrategyFailure { message: String },

    #[error("{message}")]
    SuitablePackageNotFound { message: String },

    #[error("{message}")]
    MultipleBinsNotSupported { message: String },

    #[error("All packing strategies have been exhausted and none were successful")]
    StrategyChainExhausted,

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Data source error: {message}")]
    DataSource { message: String },

    #[error("Packing result already recorded for fingerprint {fingerprint}")]
    DuplicateFingerprint { fingerprint: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },
}

impl PackingError {
    pub fn strategy_failure(message: impl Into<String>) -> Self {
        Self::StrategyFailure {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::SuitablePackageNotFound {
            message: message.into(),
        }
    }

    pub fn not_found_default() -> Self {
        Self::not_found(DEFAULT_NOT_FOUND_MESSAGE)
    }

    pub fn multiple_bins(count: usize) -> Self {
        Self::MultipleBinsNotSupported {
            message: format!(
                "Multiple bins ({}) were returned, but only one bin is supported at the moment",
                count
            ),
        }
    }

    pub fn data_source(message: impl Into<String>) -> Self {
        Self::DataSource {
            message: message.into(),
        }
    }

    /// Decisive errors answer "this shipment cannot be packed" and stop the chain.
    pub fn is_decisive(&self) -> bool {
        matches!(
            self,
            Self::SuitablePackageNotFound { .. } | Self::MultipleBinsNotSupported { .. }
        )
    }

    pub fn is_strategy_failure(&self) -> bool {
        matches!(self, Self::StrategyFailure { .. })
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MultipleBinsNotSupported { .. } => "multiple-bins-not-supported",
            Self::SuitablePackageNotFound { .. } => "suitable-package-not-found",
            Self::StrategyChainExhausted => "packing-not-applicable",
            Self::ValidationError { .. } => "invalid-request",
            _ => "unexpected-error",
        }
    }

    /// HTTP status an outer transport layer would answer with.
    pub fn status_hint(&self) -> u16 {
        match self {
            Self::MultipleBinsNotSupported { .. }
            | Self::SuitablePackageNotFound { .. }
            | Self::StrategyChainExhausted
            | Self::ValidationError { .. } => 422,
            _ => 500,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::MultipleBinsNotSupported { .. }
            | Self::SuitablePackageNotFound { .. }
            | Self::ValidationError { .. } => self.to_string(),
            Self::StrategyChainExhausted => NOT_APPLICABLE_MESSAGE.to_string(),
            _ => UNEXPECTED_MESSAGE.to_string(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.user_message(),
            code: self.error_code().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub type Result<T> = std::result::Result<T, PackingError>;
