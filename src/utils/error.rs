use crate::utils::output::OutputStyle;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),
}

/// Result type alias for consistent error handling across the application
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Fatal errors abort the whole run; everything else only fails the current date.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Configuration(_) | AppError::Auth(_))
    }
}

pub fn report_error(err: &AppError) {
    match err {
        AppError::Configuration(msg) => {
            eprintln!("⚙️  {}", OutputStyle::error(&format!("Configuration: {}", msg)));
        }
        AppError::Auth(msg) => {
            eprintln!("🔒 {}", OutputStyle::error(&format!("Authentication: {}", msg)));
        }
        AppError::Remote(msg) => {
            eprintln!("🌐 {}", OutputStyle::error(&format!("Remote: {}", msg)));
        }
        AppError::Schema(msg) => {
            eprintln!("⚠️  {}", OutputStyle::warning(&format!("Schema: {}", msg)));
        }
        AppError::Filesystem(msg) => {
            eprintln!("❌ {}", OutputStyle::error(msg));
        }
    }
}
