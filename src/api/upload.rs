use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::api::routes::ApiState;
use crate::error::{AppError, Result};
use crate::report::{self, meta};
use crate::types::DateRange;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct UploadResponse {
    pub session_id: String,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub date_range: DateRange,
    pub campaigns: Vec<String>,
    pub message: String,
}

/// Validation outcome reported as data: structural problems are the answer
/// here, not a failed request.
#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub row_count: usize,
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidateResponse {
    fn rejected(error: String) -> Self {
        Self {
            valid: false,
            row_count: 0,
            columns: Vec::new(),
            missing_columns: Vec::new(),
            error: Some(error),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field.bytes().await?;
            return Ok((filename, bytes.to_vec()));
        }
    }
    Err(AppError::ParseFailure(
        "multipart request carried no file field".to_string(),
    ))
}

/// Upload a search term report (CSV or XLSX). Returns a session id for
/// subsequent analysis and export calls.
pub async fn upload_search_term_report(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let (filename, bytes) = read_upload(&mut multipart).await?;
    let table = report::parse_bytes(&bytes, &filename)?;
    let normalized = report::normalize_report(table)?;

    let row_count = normalized.rows.len();
    let date_range = meta::date_range(&normalized.rows);
    let campaigns = meta::unique_campaigns(&normalized.rows);
    let columns = normalized.columns;
    let session_id = state.store.insert_report(normalized.rows);

    info!("Uploaded {filename}: {row_count} rows, session {session_id}");

    Ok(Json(UploadResponse {
        session_id,
        row_count,
        columns,
        date_range,
        campaigns,
        message: format!("Successfully uploaded {filename} with {row_count} rows"),
    }))
}

/// Check a file's structure without storing anything.
pub async fn validate_report(mut multipart: Multipart) -> Result<Json<ValidateResponse>> {
    let (filename, bytes) = read_upload(&mut multipart).await?;

    let table = match report::parse_bytes(&bytes, &filename) {
        Ok(table) => table,
        Err(err) => return Ok(Json(ValidateResponse::rejected(err.to_string()))),
    };

    let row_count = table.rows.len();
    match report::normalize_report(table) {
        Ok(normalized) => Ok(Json(ValidateResponse {
            valid: true,
            row_count,
            columns: normalized.columns,
            missing_columns: Vec::new(),
            error: None,
        })),
        Err(AppError::MissingColumns(missing)) => Ok(Json(ValidateResponse {
            valid: false,
            row_count,
            columns: Vec::new(),
            missing_columns: missing,
            error: Some("Missing required columns".to_string()),
        })),
        Err(err) => Err(err),
    }
}

pub async fn delete_session(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Json<serde_json::Value> {
    state.store.remove(&session_id);
    info!("Deleted session {session_id}");
    Json(serde_json::json!({ "message": "Session deleted" }))
}
