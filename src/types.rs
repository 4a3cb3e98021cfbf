use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_MAX_SALES, DEFAULT_MIN_SPEND, DEFAULT_TARGET_ACOS};

// ---------------------------------------------------------------------------
// Normalized report rows
// ---------------------------------------------------------------------------

/// One search-term-targeting observation after column normalization.
///
/// Count and currency fields are always present (absent cells were filled to
/// zero by the cleaner). Reported ratios stay optional: a report that omits
/// ACOS is different from one that reports 0%.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTermRow {
    pub date: Option<NaiveDate>,
    pub campaign_name: String,
    pub ad_group_name: String,
    pub portfolio: Option<String>,
    pub targeting: String,
    pub match_type: String,
    pub customer_search_term: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub sales: f64,
    pub orders: u64,
    pub units: u64,
    pub cpc: f64,
    pub acos: Option<f64>,
    pub roas: Option<f64>,
    pub ctr: Option<f64>,
    pub conversion_rate: Option<f64>,
}

// ---------------------------------------------------------------------------
// Analysis configuration
// ---------------------------------------------------------------------------

/// Immutable parameter set for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Target ACOS threshold (%).
    #[serde(default = "default_target_acos")]
    pub target_acos: f64,
    /// Minimum spend ($) for the spend-without-sales rule.
    #[serde(default = "default_min_spend")]
    pub min_spend: f64,
    /// Maximum sales ($) for the spend-without-sales rule.
    #[serde(default = "default_max_sales")]
    pub max_sales: f64,
    /// Suggest "Negative Phrase" instead of "Negative Exact" for keywords.
    #[serde(default)]
    pub use_negative_phrase: bool,
    /// Skip search terms containing any of `branded_terms`.
    #[serde(default)]
    pub exclude_branded: bool,
    #[serde(default)]
    pub branded_terms: Vec<String>,
    /// Declared for a converting-but-poor-ROAS surface; no rule consults it
    /// yet, pending product clarification.
    #[serde(default)]
    pub include_poor_roas: bool,
}

fn default_target_acos() -> f64 {
    DEFAULT_TARGET_ACOS
}

fn default_min_spend() -> f64 {
    DEFAULT_MIN_SPEND
}

fn default_max_sales() -> f64 {
    DEFAULT_MAX_SALES
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_acos: DEFAULT_TARGET_ACOS,
            min_spend: DEFAULT_MIN_SPEND,
            max_sales: DEFAULT_MAX_SALES,
            use_negative_phrase: false,
            exclude_branded: false,
            branded_terms: Vec::new(),
            include_poor_roas: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Flagging rules
// ---------------------------------------------------------------------------

/// Which rule flagged a search term. Exactly one per flagged row —
/// evaluation is first-match-wins in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    #[serde(rename = "High ACOS")]
    HighAcos,
    #[serde(rename = "Spend Without Sales")]
    SpendWithoutSales,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RuleKind::HighAcos => "High ACOS",
            RuleKind::SpendWithoutSales => "Spend Without Sales",
        };
        write!(f, "{s}")
    }
}

/// Suggested negative-match family for a flagged term. Derived from the
/// customer search term (not the targeting expression).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegativeMatchType {
    #[serde(rename = "Negative Exact")]
    Exact,
    #[serde(rename = "Negative Phrase")]
    Phrase,
    #[serde(rename = "Negative Product Targeting")]
    ProductTargeting,
}

impl NegativeMatchType {
    /// The keyword-family match type configured for a run.
    pub fn keyword_preference(use_negative_phrase: bool) -> Self {
        if use_negative_phrase {
            NegativeMatchType::Phrase
        } else {
            NegativeMatchType::Exact
        }
    }
}

impl std::fmt::Display for NegativeMatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NegativeMatchType::Exact => "Negative Exact",
            NegativeMatchType::Phrase => "Negative Phrase",
            NegativeMatchType::ProductTargeting => "Negative Product Targeting",
        };
        write!(f, "{s}")
    }
}

/// One flagged search term. `id` is the row's position in the uploaded
/// report and stays stable across export-time selection filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedTerm {
    pub id: usize,
    pub date: Option<NaiveDate>,
    pub campaign_name: String,
    pub ad_group_name: String,
    pub portfolio: Option<String>,
    pub targeting: String,
    pub match_type: String,
    pub customer_search_term: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub sales: f64,
    pub acos: Option<f64>,
    pub orders: u64,
    #[serde(rename = "rule_triggered")]
    pub rule: RuleKind,
    pub is_asin: bool,
    pub negative_match_type: NegativeMatchType,
    pub selected: bool,
}

// ---------------------------------------------------------------------------
// Aggregated metrics
// ---------------------------------------------------------------------------

/// KPI roll-up across a filtered row set. Derived ratios use safe division
/// (0 on a zero denominator) and are rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_sales: f64,
    pub ad_spend: f64,
    pub roas: f64,
    pub acos: f64,
    pub orders: u64,
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
    pub conversion_rate: f64,
    pub avg_cpc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignMetrics {
    pub campaign_name: String,
    /// First portfolio seen for the campaign in row order. Order-dependent
    /// when a campaign's rows span multiple portfolios.
    pub portfolio: Option<String>,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub sales: f64,
    pub orders: u64,
    pub acos: f64,
    pub roas: f64,
}

/// One year-month bucket of the sales/spend time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: String,
    pub sales: f64,
    pub spend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}
