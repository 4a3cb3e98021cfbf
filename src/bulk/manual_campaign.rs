//! Manual-campaign bulk file generation in the official Sponsored Products
//! bulksheet format: one wide fixed schema shared by every entity type,
//! entity-irrelevant fields blank.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bulk::auto_campaign::BiddingStrategy;
use crate::bulk::sheet::{money, BulkDocument, Sheet};
use crate::config::MIN_DEFAULT_BID;

pub const MANUAL_BULK_COLUMNS: &[&str] = &[
    "Product",
    "Entity",
    "Operation",
    "Campaign ID",
    "Ad Group ID",
    "Portfolio ID",
    "Ad ID",
    "Keyword ID",
    "Product Targeting ID",
    "Campaign Name",
    "Ad Group Name",
    "Start Date",
    "End Date",
    "Targeting Type",
    "State",
    "Daily Budget",
    "SKU",
    "ASIN (Informational only)",
    "Ad Group Default Bid",
    "Bid",
    "Keyword Text",
    "Match Type",
    "Bidding Strategy",
    "Placement",
    "Percentage",
];

pub const MANUAL_CAMPAIGN_SHEET: &str = "Sponsored Products Campaigns";

const PRODUCT_SPONSORED: &str = "Sponsored Products";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualKeyword {
    pub keyword: String,
    #[serde(default = "default_match_type")]
    pub match_type: String,
    #[serde(default)]
    pub bid: Option<f64>,
}

fn default_match_type() -> String {
    "exact".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualProductTarget {
    pub asin: String,
    #[serde(default)]
    pub bid: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualAdGroup {
    pub ad_group_name: String,
    pub default_bid: f64,
    #[serde(default)]
    pub skus: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<ManualKeyword>,
    #[serde(default)]
    pub product_targets: Vec<ManualProductTarget>,
}

impl ManualAdGroup {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.ad_group_name.trim().is_empty() {
            errors.push("Ad group name is required".to_string());
        }
        if self.default_bid < MIN_DEFAULT_BID {
            errors.push("Default bid must be at least $0.02".to_string());
        }
        errors
    }
}

/// Placement bid modifiers (%); each row is emitted only when its
/// percentage is positive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacementAdjustments {
    #[serde(default)]
    pub top_of_search: i64,
    #[serde(default)]
    pub product_pages: i64,
    #[serde(default)]
    pub rest_of_search: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualCampaignConfig {
    pub campaign_name: String,
    #[serde(default)]
    pub portfolio: Option<String>,
    pub daily_budget: f64,
    #[serde(default)]
    pub bidding_strategy: BiddingStrategy,
    pub start_date: NaiveDate,
    pub ad_groups: Vec<ManualAdGroup>,
    #[serde(default)]
    pub placement_bid_adjustment: Option<PlacementAdjustments>,
}

impl ManualCampaignConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut all = Vec::new();
        for (i, ad_group) in self.ad_groups.iter().enumerate() {
            for error in ad_group.validate() {
                all.push(format!("Ad Group {}: {error}", i + 1));
            }
        }
        all
    }
}

// ---------------------------------------------------------------------------
// Entity rows
// ---------------------------------------------------------------------------

/// One record in the 25-column bulksheet layout. Field order mirrors
/// MANUAL_BULK_COLUMNS exactly; `into_cells` is the single mapping point.
#[derive(Debug, Default)]
struct ManualRow {
    product: String,
    entity: String,
    operation: String,
    campaign_id: String,
    ad_group_id: String,
    portfolio_id: String,
    ad_id: String,
    keyword_id: String,
    product_targeting_id: String,
    campaign_name: String,
    ad_group_name: String,
    start_date: String,
    end_date: String,
    targeting_type: String,
    state: String,
    daily_budget: String,
    sku: String,
    asin_informational: String,
    ad_group_default_bid: String,
    bid: String,
    keyword_text: String,
    match_type: String,
    bidding_strategy: String,
    placement: String,
    percentage: String,
}

impl ManualRow {
    fn into_cells(self) -> Vec<String> {
        vec![
            self.product,
            self.entity,
            self.operation,
            self.campaign_id,
            self.ad_group_id,
            self.portfolio_id,
            self.ad_id,
            self.keyword_id,
            self.product_targeting_id,
            self.campaign_name,
            self.ad_group_name,
            self.start_date,
            self.end_date,
            self.targeting_type,
            self.state,
            self.daily_budget,
            self.sku,
            self.asin_informational,
            self.ad_group_default_bid,
            self.bid,
            self.keyword_text,
            self.match_type,
            self.bidding_strategy,
            self.placement,
            self.percentage,
        ]
    }
}

/// Positive bid overrides render; zero/absent stays blank so the ad group
/// default applies downstream.
fn bid_cell(bid: Option<f64>) -> String {
    bid.filter(|b| *b > 0.0).map(money).unwrap_or_default()
}

fn campaign_row(config: &ManualCampaignConfig) -> Vec<String> {
    ManualRow {
        product: PRODUCT_SPONSORED.to_string(),
        entity: "Campaign".to_string(),
        operation: "Create".to_string(),
        // New campaigns have no platform ID yet; the name doubles as the
        // temporary ID that child rows reference.
        campaign_id: config.campaign_name.clone(),
        portfolio_id: config.portfolio.clone().unwrap_or_default(),
        campaign_name: config.campaign_name.clone(),
        start_date: config.start_date.format("%Y%m%d").to_string(),
        targeting_type: "Manual".to_string(),
        state: "enabled".to_string(),
        daily_budget: money(config.daily_budget),
        bidding_strategy: config.bidding_strategy.to_string(),
        ..ManualRow::default()
    }
    .into_cells()
}

fn bidding_adjustment_row(campaign_name: &str, placement: &str, percentage: i64) -> Vec<String> {
    ManualRow {
        product: PRODUCT_SPONSORED.to_string(),
        entity: "Bidding Adjustment".to_string(),
        operation: "Create".to_string(),
        campaign_id: campaign_name.to_string(),
        campaign_name: campaign_name.to_string(),
        placement: placement.to_string(),
        percentage: percentage.to_string(),
        ..ManualRow::default()
    }
    .into_cells()
}

fn ad_group_row(campaign_name: &str, ad_group: &ManualAdGroup) -> Vec<String> {
    ManualRow {
        product: PRODUCT_SPONSORED.to_string(),
        entity: "Ad Group".to_string(),
        operation: "Create".to_string(),
        campaign_id: campaign_name.to_string(),
        ad_group_id: ad_group.ad_group_name.clone(),
        campaign_name: campaign_name.to_string(),
        ad_group_name: ad_group.ad_group_name.clone(),
        state: "enabled".to_string(),
        ad_group_default_bid: money(ad_group.default_bid),
        ..ManualRow::default()
    }
    .into_cells()
}

fn product_ad_row(campaign_name: &str, ad_group_name: &str, sku: &str) -> Vec<String> {
    ManualRow {
        product: PRODUCT_SPONSORED.to_string(),
        entity: "Product Ad".to_string(),
        operation: "Create".to_string(),
        campaign_id: campaign_name.to_string(),
        ad_group_id: ad_group_name.to_string(),
        campaign_name: campaign_name.to_string(),
        ad_group_name: ad_group_name.to_string(),
        state: "enabled".to_string(),
        sku: sku.to_string(),
        ..ManualRow::default()
    }
    .into_cells()
}

fn keyword_row(campaign_name: &str, ad_group_name: &str, keyword: &ManualKeyword) -> Vec<String> {
    ManualRow {
        product: PRODUCT_SPONSORED.to_string(),
        entity: "Keyword".to_string(),
        operation: "Create".to_string(),
        campaign_id: campaign_name.to_string(),
        ad_group_id: ad_group_name.to_string(),
        campaign_name: campaign_name.to_string(),
        ad_group_name: ad_group_name.to_string(),
        state: "enabled".to_string(),
        bid: bid_cell(keyword.bid),
        keyword_text: keyword.keyword.clone(),
        match_type: keyword.match_type.clone(),
        ..ManualRow::default()
    }
    .into_cells()
}

fn product_target_row(
    campaign_name: &str,
    ad_group_name: &str,
    target: &ManualProductTarget,
) -> Vec<String> {
    ManualRow {
        product: PRODUCT_SPONSORED.to_string(),
        entity: "Product Targeting".to_string(),
        operation: "Create".to_string(),
        campaign_id: campaign_name.to_string(),
        ad_group_id: ad_group_name.to_string(),
        product_targeting_id: format!("asin=\"{}\"", target.asin),
        campaign_name: campaign_name.to_string(),
        ad_group_name: ad_group_name.to_string(),
        state: "enabled".to_string(),
        bid: bid_cell(target.bid),
        ..ManualRow::default()
    }
    .into_cells()
}

/// Render the full manual campaign into the single-sheet bulksheet document:
/// campaign, optional placement adjustments, then per ad group its product
/// ads, keywords, and product targets.
pub fn manual_campaign_document(config: &ManualCampaignConfig) -> BulkDocument {
    let mut sheet = Sheet::new(MANUAL_CAMPAIGN_SHEET, MANUAL_BULK_COLUMNS);
    let campaign = config.campaign_name.as_str();

    sheet.push(campaign_row(config));

    if let Some(placements) = &config.placement_bid_adjustment {
        if placements.top_of_search > 0 {
            sheet.push(bidding_adjustment_row(
                campaign,
                "Placement Top",
                placements.top_of_search,
            ));
        }
        if placements.product_pages > 0 {
            sheet.push(bidding_adjustment_row(
                campaign,
                "Placement Product Page",
                placements.product_pages,
            ));
        }
        if placements.rest_of_search > 0 {
            sheet.push(bidding_adjustment_row(
                campaign,
                "Placement Rest Of Search",
                placements.rest_of_search,
            ));
        }
    }

    for ad_group in &config.ad_groups {
        sheet.push(ad_group_row(campaign, ad_group));

        for sku in &config_skus(ad_group) {
            sheet.push(product_ad_row(campaign, &ad_group.ad_group_name, sku));
        }
        for keyword in &ad_group.keywords {
            if !keyword.keyword.trim().is_empty() {
                sheet.push(keyword_row(campaign, &ad_group.ad_group_name, keyword));
            }
        }
        for target in &ad_group.product_targets {
            if !target.asin.trim().is_empty() {
                sheet.push(product_target_row(campaign, &ad_group.ad_group_name, target));
            }
        }
    }

    BulkDocument {
        sheets: vec![sheet],
    }
}

fn config_skus(ad_group: &ManualAdGroup) -> Vec<String> {
    ad_group
        .skus
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
