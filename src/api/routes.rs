use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::api::{analysis, export, upload};
use crate::state::SessionStore;

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<SessionStore>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/upload/search-term-report", post(upload::upload_search_term_report))
        .route("/upload/validate", post(upload::validate_report))
        .route("/upload/session/:session_id", delete(upload::delete_session))
        .route("/analysis/kpis/:session_id", get(analysis::get_kpis))
        .route("/analysis/campaigns/:session_id", get(analysis::get_campaign_metrics))
        .route("/analysis/monthly/:session_id", get(analysis::get_monthly_data))
        .route("/analysis/filters/:session_id", get(analysis::get_filter_options))
        .route("/analysis/search-terms/:session_id", post(analysis::analyze_search_terms))
        .route(
            "/analysis/search-terms/:session_id/data",
            get(analysis::get_search_terms_data),
        )
        .route("/export/negatives", post(export::export_negatives))
        .route("/export/negatives/preview", post(export::preview_negatives))
        .route("/export/auto-campaign", post(export::export_auto_campaign))
        .route("/export/manual-campaign", post(export::export_manual_campaign))
        .with_state(state)
}
