use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported file type: {0}. Please upload CSV or XLSX files.")]
    UnsupportedFileType(String),

    #[error("Failed to parse file: {0}")]
    ParseFailure(String),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid ad group configuration: {}", .0.join("; "))]
    InvalidAdGroups(Vec<String>),

    #[error("Session not found. Please upload a file first.")]
    SessionNotFound,

    #[error("No analysis results found. Please run search term analysis first.")]
    ResultsNotFound,

    #[error("No items selected for export")]
    EmptySelection,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Spreadsheet write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Upload error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::UnsupportedFileType(_)
            | AppError::ParseFailure(_)
            | AppError::MissingColumns(_)
            | AppError::InvalidAdGroups(_)
            | AppError::EmptySelection => StatusCode::BAD_REQUEST,
            AppError::SessionNotFound | AppError::ResultsNotFound => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Xlsx(_)
            | AppError::Csv(_)
            | AppError::Multipart(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
