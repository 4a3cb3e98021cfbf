use crate::error::{AppError, Result};

/// Default target ACOS threshold (%). Rows at or above it are flagged by the
/// high-ACOS rule; ≥, not >, so a row exactly at the target triggers.
pub const DEFAULT_TARGET_ACOS: f64 = 30.0;

/// Default minimum spend ($) for the spend-without-sales rule.
pub const DEFAULT_MIN_SPEND: f64 = 10.0;

/// Default maximum sales ($) for the spend-without-sales rule.
pub const DEFAULT_MAX_SALES: f64 = 0.0;

/// Platform floor for ad group default bids ($). Bids below this are
/// rejected by ad-group validation before any bulk file is generated.
pub const MIN_DEFAULT_BID: f64 = 0.02;

/// Page-size bounds for the search-term browse endpoint.
pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MIN_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 200;

/// Sanitized campaign names in download filenames are capped at this length.
pub const MAX_FILENAME_STEM: usize = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub api_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
        })
    }
}
