use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{metrics, rules};
use crate::api::routes::ApiState;
use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::error::Result;
use crate::report::meta;
use crate::types::{
    AnalysisConfig, CampaignMetrics, DateRange, FlaggedTerm, KpiSummary, MonthlyPoint,
    SearchTermRow,
};

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct KpiQuery {
    pub campaign: Option<String>,
    pub ad_group: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct CampaignQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct MonthlyQuery {
    pub campaign: Option<String>,
}

#[derive(Deserialize)]
pub struct BrowseQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub campaign: Option<String>,
    pub ad_group: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct FilterOptions {
    pub campaigns: Vec<String>,
    pub ad_groups: Vec<String>,
    pub portfolios: Vec<String>,
    pub date_range: DateRange,
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub total_flagged: usize,
    pub negative_keywords: usize,
    pub negative_asins: usize,
    pub results: Vec<FlaggedTerm>,
}

#[derive(Serialize)]
pub struct BrowsePage {
    pub data: Vec<SearchTermRow>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

// ---------------------------------------------------------------------------
// Row filtering — applied by this caller layer, not inside the core
// ---------------------------------------------------------------------------

fn filter_rows(
    rows: &[SearchTermRow],
    campaign: Option<&str>,
    ad_group: Option<&str>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Vec<SearchTermRow> {
    rows.iter()
        .filter(|row| {
            campaign.map_or(true, |c| row.campaign_name == c)
                && ad_group.map_or(true, |a| row.ad_group_name == a)
                // Date bounds only match rows that actually carry a date.
                && start_date.map_or(true, |s| row.date.map_or(false, |d| d >= s))
                && end_date.map_or(true, |e| row.date.map_or(false, |d| d <= e))
        })
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn get_kpis(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
    Query(params): Query<KpiQuery>,
) -> Result<Json<KpiSummary>> {
    let rows = state.store.report(&session_id)?;
    let filtered = filter_rows(
        &rows,
        params.campaign.as_deref(),
        params.ad_group.as_deref(),
        params.start_date,
        params.end_date,
    );
    Ok(Json(metrics::kpi_summary(&filtered)))
}

pub async fn get_campaign_metrics(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
    Query(params): Query<CampaignQuery>,
) -> Result<Json<Vec<CampaignMetrics>>> {
    let rows = state.store.report(&session_id)?;
    let filtered = filter_rows(&rows, None, None, params.start_date, params.end_date);
    Ok(Json(metrics::campaign_metrics(&filtered)))
}

pub async fn get_monthly_data(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
    Query(params): Query<MonthlyQuery>,
) -> Result<Json<Vec<MonthlyPoint>>> {
    let rows = state.store.report(&session_id)?;
    let filtered = filter_rows(&rows, params.campaign.as_deref(), None, None, None);
    Ok(Json(metrics::monthly_series(&filtered)))
}

pub async fn get_filter_options(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Result<Json<FilterOptions>> {
    let rows = state.store.report(&session_id)?;
    Ok(Json(FilterOptions {
        campaigns: meta::unique_campaigns(&rows),
        ad_groups: meta::unique_ad_groups(&rows),
        portfolios: meta::unique_portfolios(&rows),
        date_range: meta::date_range(&rows),
    }))
}

/// Run the rule engine over a session's report and cache the flagged set
/// for export.
pub async fn analyze_search_terms(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
    Json(config): Json<AnalysisConfig>,
) -> Result<Json<AnalysisResponse>> {
    let rows = state.store.report(&session_id)?;
    let results = rules::analyze(&rows, &config);

    let negative_asins = results.iter().filter(|r| r.is_asin).count();
    let negative_keywords = results.len() - negative_asins;
    info!(
        "Analysis for session {session_id}: {} of {} rows flagged ({negative_keywords} keywords, {negative_asins} ASINs)",
        results.len(),
        rows.len(),
    );

    state.store.store_results(&session_id, results.clone());

    Ok(Json(AnalysisResponse {
        total_flagged: results.len(),
        negative_keywords,
        negative_asins,
        results,
    }))
}

/// Paginated browse over the normalized rows, with optional filtering and
/// single-column sort.
pub async fn get_search_terms_data(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
    Query(params): Query<BrowseQuery>,
) -> Result<Json<BrowsePage>> {
    let rows = state.store.report(&session_id)?;
    let mut filtered = filter_rows(
        &rows,
        params.campaign.as_deref(),
        params.ad_group.as_deref(),
        None,
        None,
    );

    if let Some(sort_by) = params.sort_by.as_deref() {
        let ascending = params.sort_order.as_deref() == Some("asc");
        sort_rows(&mut filtered, sort_by, ascending);
    }

    let page = params.page.unwrap_or(1).max(1);
    let page_size = params
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);

    let total = filtered.len();
    let total_pages = total.div_ceil(page_size);
    let start = (page - 1) * page_size;
    let data: Vec<SearchTermRow> = filtered
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();

    Ok(Json(BrowsePage {
        data,
        total,
        page,
        page_size,
        total_pages,
    }))
}

/// Sort on a fixed column set; unknown keys leave the order untouched.
/// Absent ratios sort below any reported value.
fn sort_rows(rows: &mut [SearchTermRow], sort_by: &str, ascending: bool) {
    const NUMERIC_KEYS: &[&str] = &[
        "impressions",
        "clicks",
        "spend",
        "sales",
        "orders",
        "units",
        "cpc",
        "acos",
        "roas",
        "ctr",
        "conversion rate",
        "conversion_rate",
    ];

    let key = sort_by.trim().to_lowercase();

    let float_key = |row: &SearchTermRow| -> f64 {
        match key.as_str() {
            "impressions" => row.impressions as f64,
            "clicks" => row.clicks as f64,
            "spend" => row.spend,
            "sales" => row.sales,
            "orders" => row.orders as f64,
            "units" => row.units as f64,
            "cpc" => row.cpc,
            "acos" => row.acos.unwrap_or(f64::NEG_INFINITY),
            "roas" => row.roas.unwrap_or(f64::NEG_INFINITY),
            "ctr" => row.ctr.unwrap_or(f64::NEG_INFINITY),
            _ => row.conversion_rate.unwrap_or(f64::NEG_INFINITY),
        }
    };

    match key.as_str() {
        "date" => rows.sort_by_key(|r| r.date),
        "campaign name" | "campaign_name" => {
            rows.sort_by(|a, b| a.campaign_name.cmp(&b.campaign_name))
        }
        "ad group name" | "ad_group_name" => {
            rows.sort_by(|a, b| a.ad_group_name.cmp(&b.ad_group_name))
        }
        "customer search term" | "customer_search_term" => {
            rows.sort_by(|a, b| a.customer_search_term.cmp(&b.customer_search_term))
        }
        k if NUMERIC_KEYS.contains(&k) => {
            rows.sort_by(|a, b| {
                float_key(a)
                    .partial_cmp(&float_key(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        _ => return, // unknown sort key — leave the order untouched
    }

    if !ascending {
        rows.reverse();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn row(campaign: &str, date: Option<(i32, u32, u32)>, spend: f64) -> SearchTermRow {
        SearchTermRow {
            date: date.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            campaign_name: campaign.to_string(),
            ad_group_name: "Group".to_string(),
            portfolio: None,
            targeting: String::new(),
            match_type: "broad".to_string(),
            customer_search_term: "term".to_string(),
            impressions: 0,
            clicks: 0,
            spend,
            sales: 0.0,
            orders: 0,
            units: 0,
            cpc: 0.0,
            acos: None,
            roas: None,
            ctr: None,
            conversion_rate: None,
        }
    }

    #[test]
    fn filters_compose_and_dateless_rows_fail_date_bounds() {
        let rows = vec![
            row("A", Some((2024, 1, 10)), 1.0),
            row("A", None, 2.0),
            row("B", Some((2024, 2, 1)), 3.0),
        ];
        let filtered = filter_rows(
            &rows,
            Some("A"),
            None,
            NaiveDate::from_ymd_opt(2024, 1, 1),
            None,
        );
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].spend, 1.0);
    }

    #[test]
    fn sort_rows_orders_by_numeric_key() {
        let mut rows = vec![row("A", None, 5.0), row("B", None, 1.0), row("C", None, 3.0)];
        sort_rows(&mut rows, "Spend", false);
        let spends: Vec<f64> = rows.iter().map(|r| r.spend).collect();
        assert_eq!(spends, vec![5.0, 3.0, 1.0]);

        sort_rows(&mut rows, "spend", true);
        let spends: Vec<f64> = rows.iter().map(|r| r.spend).collect();
        assert_eq!(spends, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn unknown_sort_key_keeps_order() {
        let mut rows = vec![row("B", None, 2.0), row("A", None, 1.0)];
        sort_rows(&mut rows, "nonsense", true);
        assert_eq!(rows[0].campaign_name, "B");
    }
}
