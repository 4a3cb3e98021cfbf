//! Auto-campaign bulk file generation: one campaign row, then per ad group
//! an ad-group row followed by one row per enabled auto-targeting type.
//! All record types share one wide fixed column schema.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bulk::sheet::{money, BulkDocument, Sheet};
use crate::config::MIN_DEFAULT_BID;

pub const AUTO_CAMPAIGN_COLUMNS: &[&str] = &[
    "Record Type",
    "Campaign ID",
    "Campaign Name",
    "Campaign State",
    "Campaign Daily Budget",
    "Portfolio ID",
    "Campaign Start Date",
    "Campaign End Date",
    "Campaign Targeting Type",
    "Campaign Bidding Strategy",
    "Ad Group ID",
    "Ad Group Name",
    "Ad Group State",
    "Ad Group Default Bid",
    "Targeting ID",
    "Targeting Expression",
    "Targeting Expression State",
    "Targeting Expression Bid",
    "Operation",
];

pub const AUTO_CAMPAIGN_SHEET: &str = "Sponsored Products";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiddingStrategy {
    #[serde(rename = "dynamic bids - down only")]
    DynamicDown,
    #[serde(rename = "dynamic bids - up and down")]
    DynamicUpDown,
    #[serde(rename = "fixed bids")]
    Fixed,
}

impl Default for BiddingStrategy {
    fn default() -> Self {
        BiddingStrategy::DynamicDown
    }
}

impl std::fmt::Display for BiddingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BiddingStrategy::DynamicDown => "dynamic bids - down only",
            BiddingStrategy::DynamicUpDown => "dynamic bids - up and down",
            BiddingStrategy::Fixed => "fixed bids",
        };
        write!(f, "{s}")
    }
}

/// The four auto-targeting expression types, in the platform's fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoTargetingType {
    CloseMatch,
    LooseMatch,
    Substitutes,
    Complements,
}

impl std::fmt::Display for AutoTargetingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AutoTargetingType::CloseMatch => "close-match",
            AutoTargetingType::LooseMatch => "loose-match",
            AutoTargetingType::Substitutes => "substitutes",
            AutoTargetingType::Complements => "complements",
        };
        write!(f, "{s}")
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoAdGroup {
    pub ad_group_name: String,
    pub default_bid: f64,
    #[serde(default = "default_true")]
    pub close_match: bool,
    #[serde(default)]
    pub close_match_bid: Option<f64>,
    #[serde(default = "default_true")]
    pub loose_match: bool,
    #[serde(default)]
    pub loose_match_bid: Option<f64>,
    #[serde(default = "default_true")]
    pub substitutes: bool,
    #[serde(default)]
    pub substitutes_bid: Option<f64>,
    #[serde(default = "default_true")]
    pub complements: bool,
    #[serde(default)]
    pub complements_bid: Option<f64>,
}

impl AutoAdGroup {
    /// Enabled targeting types with their bid overrides, in fixed order.
    pub fn enabled_targets(&self) -> Vec<(AutoTargetingType, Option<f64>)> {
        let mut targets = Vec::new();
        if self.close_match {
            targets.push((AutoTargetingType::CloseMatch, self.close_match_bid));
        }
        if self.loose_match {
            targets.push((AutoTargetingType::LooseMatch, self.loose_match_bid));
        }
        if self.substitutes {
            targets.push((AutoTargetingType::Substitutes, self.substitutes_bid));
        }
        if self.complements {
            targets.push((AutoTargetingType::Complements, self.complements_bid));
        }
        targets
    }

    /// Every violation, accumulated rather than failing on the first.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.ad_group_name.trim().is_empty() {
            errors.push("Ad group name is required".to_string());
        }
        if self.default_bid < MIN_DEFAULT_BID {
            errors.push("Default bid must be at least $0.02".to_string());
        }
        if !(self.close_match || self.loose_match || self.substitutes || self.complements) {
            errors.push("At least one targeting type must be enabled".to_string());
        }
        errors
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoCampaignConfig {
    pub campaign_name: String,
    #[serde(default)]
    pub portfolio: Option<String>,
    pub daily_budget: f64,
    #[serde(default)]
    pub bidding_strategy: BiddingStrategy,
    pub start_date: NaiveDate,
    pub ad_groups: Vec<AutoAdGroup>,
}

impl AutoCampaignConfig {
    /// All ad-group violations, each prefixed with its 1-based position.
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

/// One record in the shared 19-column layout. Field order mirrors
/// AUTO_CAMPAIGN_COLUMNS exactly; `into_cells` is the single place the
/// mapping lives.
#[derive(Debug, Default)]
struct AutoRow {
    record_type: String,
    campaign_id: String,
    campaign_name: String,
    campaign_state: String,
    campaign_daily_budget: String,
    portfolio_id: String,
    campaign_start_date: String,
    campaign_end_date: String,
    campaign_targeting_type: String,
    campaign_bidding_strategy: String,
    ad_group_id: String,
    ad_group_name: String,
    ad_group_state: String,
    ad_group_default_bid: String,
    targeting_id: String,
    targeting_expression: String,
    targeting_expression_state: String,
    targeting_expression_bid: String,
    operation: String,
}

impl AutoRow {
    fn into_cells(self) -> Vec<String> {
        vec![
            self.record_type,
            self.campaign_id,
            self.campaign_name,
            self.campaign_state,
            self.campaign_daily_budget,
            self.portfolio_id,
            self.campaign_start_date,
            self.campaign_end_date,
            self.campaign_targeting_type,
            self.campaign_bidding_strategy,
            self.ad_group_id,
            self.ad_group_name,
            self.ad_group_state,
            self.ad_group_default_bid,
            self.targeting_id,
            self.targeting_expression,
            self.targeting_expression_state,
            self.targeting_expression_bid,
            self.operation,
        ]
    }
}

fn campaign_row(config: &AutoCampaignConfig) -> Vec<String> {
    AutoRow {
        record_type: "Campaign".to_string(),
        campaign_name: config.campaign_name.clone(),
        campaign_state: "Enabled".to_string(),
        campaign_daily_budget: money(config.daily_budget),
        campaign_start_date: config.start_date.format("%Y%m%d").to_string(),
        campaign_targeting_type: "Auto".to_string(),
        campaign_bidding_strategy: config.bidding_strategy.to_string(),
        operation: "Create".to_string(),
        ..AutoRow::default()
    }
    .into_cells()
}

fn ad_group_row(campaign_name: &str, ad_group: &AutoAdGroup) -> Vec<String> {
    AutoRow {
        record_type: "Ad Group".to_string(),
        campaign_name: campaign_name.to_string(),
        ad_group_name: ad_group.ad_group_name.clone(),
        ad_group_state: "Enabled".to_string(),
        ad_group_default_bid: money(ad_group.default_bid),
        operation: "Create".to_string(),
        ..AutoRow::default()
    }
    .into_cells()
}

fn targeting_row(
    campaign_name: &str,
    ad_group_name: &str,
    target: AutoTargetingType,
    bid: Option<f64>,
) -> Vec<String> {
    AutoRow {
        record_type: "Product Targeting".to_string(),
        campaign_name: campaign_name.to_string(),
        ad_group_name: ad_group_name.to_string(),
        targeting_expression: format!("auto-targeting={target}"),
        targeting_expression_state: "Enabled".to_string(),
        // Blank without a positive override: the ad group default applies
        // at the platform level, not here.
        targeting_expression_bid: bid.filter(|b| *b > 0.0).map(money).unwrap_or_default(),
        operation: "Create".to_string(),
        ..AutoRow::default()
    }
    .into_cells()
}

/// Render the full campaign into the single-sheet auto bulk document.
pub fn auto_campaign_document(config: &AutoCampaignConfig) -> BulkDocument {
    let mut sheet = Sheet::new(AUTO_CAMPAIGN_SHEET, AUTO_CAMPAIGN_COLUMNS);

    sheet.push(campaign_row(config));
    for ad_group in &config.ad_groups {
        sheet.push(ad_group_row(&config.campaign_name, ad_group));
        for (target, bid) in ad_group.enabled_targets() {
            sheet.push(targeting_row(
                &config.campaign_name,
                &ad_group.ad_group_name,
                target,
                bid,
            ));
        }
    }

    BulkDocument {
        sheets: vec![sheet],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ad_group(name: &str) -> AutoAdGroup {
        AutoAdGroup {
            ad_group_name: name.to_string(),
            default_bid: 0.75,
            close_match: true,
            close_match_bid: None,
            loose_match: true,
            loose_match_bid: None,
            substitutes: true,
            substitutes_bid: None,
            complements: true,
            complements_bid: None,
        }
    }

    fn config(ad_groups: Vec<AutoAdGroup>) -> AutoCampaignConfig {
        AutoCampaignConfig {
            campaign_name: "Auto Launch".to_string(),
            portfolio: None,
            daily_budget: 25.0,
            bidding_strategy: BiddingStrategy::default(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            ad_groups,
        }
    }

    #[test]
    fn row_count_is_one_plus_groups_plus_enabled_targets() {
        let mut partial = ad_group("Partial");
        partial.substitutes = false;
        partial.complements = false;
        let cfg = config(vec![ad_group("Full"), partial]);

        let doc = auto_campaign_document(&cfg);
        let sheet = &doc.sheets[0];
        assert_eq!(sheet.name, AUTO_CAMPAIGN_SHEET);
        // 1 campaign + 2 ad groups + (4 + 2) targeting rows
        assert_eq!(sheet.rows.len(), 9);
        assert!(sheet.rows.iter().all(|r| r.len() == AUTO_CAMPAIGN_COLUMNS.len()));
    }

    #[test]
    fn campaign_row_carries_campaign_fields_only() {
        let doc = auto_campaign_document(&config(vec![ad_group("G")]));
        let row = &doc.sheets[0].rows[0];
        assert_eq!(row[0], "Campaign");
        assert_eq!(row[2], "Auto Launch");
        assert_eq!(row[3], "Enabled");
        assert_eq!(row[4], "25");
        assert_eq!(row[6], "20240601");
        assert_eq!(row[8], "Auto");
        assert_eq!(row[9], "dynamic bids - down only");
        assert_eq!(row[11], ""); // no ad group fields on a campaign row
        assert_eq!(row[18], "Create");
    }

    #[test]
    fn targeting_rows_follow_their_ad_group_in_fixed_order() {
        let mut group = ad_group("G");
        group.loose_match = false;
        group.close_match_bid = Some(0.9);
        let doc = auto_campaign_document(&config(vec![group]));
        let rows = &doc.sheets[0].rows;

        assert_eq!(rows[1][0], "Ad Group");
        assert_eq!(rows[1][13], "0.75");
        assert_eq!(rows[2][15], "auto-targeting=close-match");
        assert_eq!(rows[2][17], "0.9");
        assert_eq!(rows[3][15], "auto-targeting=substitutes");
        assert_eq!(rows[3][17], ""); // no override → blank bid
        assert_eq!(rows[4][15], "auto-targeting=complements");
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let bad = AutoAdGroup {
            ad_group_name: String::new(),
            default_bid: 0.01,
            close_match: false,
            close_match_bid: None,
            loose_match: false,
            loose_match_bid: None,
            substitutes: false,
            substitutes_bid: None,
            complements: false,
            complements_bid: None,
        };
        let errors = bad.validate();
        assert_eq!(errors.len(), 3);

        // Bid too low + nothing enabled, name present: exactly two messages.
        let mut two = bad.clone();
        two.ad_group_name = "Named".to_string();
        let errors = two.validate();
        assert_eq!(
            errors,
            vec![
                "Default bid must be at least $0.02".to_string(),
                "At least one targeting type must be enabled".to_string(),
            ]
        );
    }

    #[test]
    fn campaign_validation_prefixes_ad_group_position() {
        let mut bad = ad_group("");
        bad.default_bid = 0.01;
        let cfg = config(vec![ad_group("Fine"), bad]);
        let errors = cfg.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.starts_with("Ad Group 2: ")));
    }
}
