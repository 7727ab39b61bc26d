//! Error handling for ShopDesk
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for ShopDesk
#[derive(Error, Debug)]
pub enum ShopDeskError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Remote source error: {0}")]
    Remote(#[from] RemoteFetchError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: i64 },

    #[error("Category {category_id} is used by {product_count} product(s)")]
    CategoryInUse { category_id: i64, product_count: usize },

    #[error("Product {product_id} is out of stock (quantity {quantity})")]
    OutOfStock { product_id: i64, quantity: i64 },

    #[error("Import failed: {0}")]
    Import(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Remote mirror fetch errors
#[derive(Error, Debug)]
pub enum RemoteFetchError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed body from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Result type alias for ShopDesk operations
pub type Result<T> = std::result::Result<T, ShopDeskError>;

impl ShopDeskError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            ShopDeskError::Storage(_) => true,
            ShopDeskError::Redis(_) => true,
            ShopDeskError::Telegram(_) => true,
            ShopDeskError::Remote(_) => true,
            ShopDeskError::Config(_) => false,
            ShopDeskError::ProductNotFound { .. } => false,
            ShopDeskError::CategoryInUse { .. } => false,
            ShopDeskError::OutOfStock { .. } => false,
            ShopDeskError::Import(_) => false,
            ShopDeskError::Http(_) => true,
            ShopDeskError::Serialization(_) => false,
            ShopDeskError::Io(_) => true,
            ShopDeskError::UrlParse(_) => false,
            ShopDeskError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ShopDeskError::Config(_) => ErrorSeverity::Critical,
            ShopDeskError::Storage(_) => ErrorSeverity::Critical,
            ShopDeskError::Remote(_) => ErrorSeverity::Warning,
            ShopDeskError::CategoryInUse { .. } => ErrorSeverity::Warning,
            ShopDeskError::OutOfStock { .. } => ErrorSeverity::Warning,
            ShopDeskError::Import(_) => ErrorSeverity::Warning,
            ShopDeskError::ProductNotFound { .. } => ErrorSeverity::Info,
            ShopDeskError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_errors_are_warnings() {
        let err = ShopDeskError::CategoryInUse { category_id: 1, product_count: 2 };
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Category 1 is used by 2 product(s)");
    }

    #[test]
    fn test_remote_errors_are_recoverable() {
        let err: ShopDeskError = RemoteFetchError::Status {
            url: "https://example.com/orders.json".to_string(),
            status: 404,
        }.into();
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert!(err.to_string().contains("HTTP 404"));
    }
}
