use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::api::routes::ApiState;
use crate::bulk::{auto_campaign_document, manual_campaign_document, negatives_document};
use crate::bulk::{AutoCampaignConfig, ManualCampaignConfig};
use crate::config::MAX_FILENAME_STEM;
use crate::error::{AppError, Result};
use crate::types::{FlaggedTerm, NegativeMatchType};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct NegativeExportRequest {
    pub session_id: String,
    /// Empty means "everything the analysis flagged".
    #[serde(default)]
    pub selected_ids: Vec<usize>,
    #[serde(default)]
    pub use_negative_phrase: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn selected_results(state: &ApiState, request: &NegativeExportRequest) -> Result<Vec<FlaggedTerm>> {
    let results = state.store.results(&request.session_id)?;
    if request.selected_ids.is_empty() {
        Ok(results.as_ref().clone())
    } else {
        Ok(results
            .iter()
            .filter(|r| request.selected_ids.contains(&r.id))
            .cloned()
            .collect())
    }
}

fn xlsx_response(bytes: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn sanitize_filename_stem(name: &str) -> String {
    name.replace([' ', '/'], "_")
        .chars()
        .take(MAX_FILENAME_STEM)
        .collect()
}

fn today_stamp() -> String {
    chrono::Local::now().date_naive().format("%Y%m%d").to_string()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Render the selected flagged terms into the negatives bulk workbook.
pub async fn export_negatives(
    State(state): State<ApiState>,
    Json(request): Json<NegativeExportRequest>,
) -> Result<Response> {
    let selected = selected_results(&state, &request)?;
    if selected.is_empty() {
        return Err(AppError::EmptySelection);
    }

    let document = negatives_document(&selected, request.use_negative_phrase);
    let bytes = document.to_xlsx_bytes()?;
    info!(
        "Negatives export for session {}: {} items, {} sheet(s)",
        request.session_id,
        selected.len(),
        document.sheets.len(),
    );

    let filename = format!("negative_keywords_{}.xlsx", today_stamp());
    Ok(xlsx_response(bytes, &filename))
}

/// The keyword/ASIN split the export would produce, without a file.
pub async fn preview_negatives(
    State(state): State<ApiState>,
    Json(request): Json<NegativeExportRequest>,
) -> Result<Json<serde_json::Value>> {
    let selected = selected_results(&state, &request)?;
    let (asins, keywords): (Vec<&FlaggedTerm>, Vec<&FlaggedTerm>) =
        selected.iter().partition(|r| r.is_asin);

    let match_type = NegativeMatchType::keyword_preference(request.use_negative_phrase);
    Ok(Json(serde_json::json!({
        "total": selected.len(),
        "negative_keywords": { "count": keywords.len(), "items": keywords },
        "negative_asins": { "count": asins.len(), "items": asins },
        "match_type": match_type,
    })))
}

/// Validate every ad group, then render the auto-campaign bulk workbook.
pub async fn export_auto_campaign(Json(config): Json<AutoCampaignConfig>) -> Result<Response> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(AppError::InvalidAdGroups(errors));
    }

    let document = auto_campaign_document(&config);
    let bytes = document.to_xlsx_bytes()?;
    info!(
        "Auto campaign export: {} ({} ad groups)",
        config.campaign_name,
        config.ad_groups.len(),
    );

    let filename = format!(
        "auto_campaign_{}_{}.xlsx",
        sanitize_filename_stem(&config.campaign_name),
        today_stamp(),
    );
    Ok(xlsx_response(bytes, &filename))
}

/// Validate every ad group, then render the manual-campaign bulksheet.
pub async fn export_manual_campaign(Json(config): Json<ManualCampaignConfig>) -> Result<Response> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(AppError::InvalidAdGroups(errors));
    }

    let document = manual_campaign_document(&config);
    let bytes = document.to_xlsx_bytes()?;
    info!(
        "Manual campaign export: {} ({} ad groups)",
        config.campaign_name,
        config.ad_groups.len(),
    );

    let filename = format!(
        "manual_campaign_{}_{}.xlsx",
        sanitize_filename_stem(&config.campaign_name),
        today_stamp(),
    );
    Ok(xlsx_response(bytes, &filename))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
