//! The flagging rule engine. Rules evaluate in fixed priority order,
//! first match wins, and rows matching neither rule are dropped entirely.

use tracing::debug;

use crate::analysis::asin::is_asin;
use crate::types::{AnalysisConfig, FlaggedTerm, NegativeMatchType, RuleKind, SearchTermRow};

fn is_branded(search_term: &str, branded_terms: &[String]) -> bool {
    if branded_terms.is_empty() {
        return false;
    }
    let term = search_term.to_lowercase();
    branded_terms
        .iter()
        .any(|brand| term.contains(&brand.to_lowercase()))
}

/// High ACOS: ACOS present and non-zero, match type not exact, targeting
/// expression not an ASIN, ACOS at or above the target threshold.
fn high_acos(row: &SearchTermRow, config: &AnalysisConfig) -> bool {
    let Some(acos) = row.acos else {
        return false;
    };
    if acos == 0.0 {
        return false;
    }
    if row.match_type.to_lowercase().contains("exact") {
        return false;
    }
    if is_asin(&row.targeting) {
        return false;
    }
    acos >= config.target_acos
}

/// Spend Without Sales: match type not exact, targeting expression not an
/// ASIN, spend at or above the floor and sales at or below the cap.
/// Evaluated regardless of ACOS presence.
fn spend_without_sales(row: &SearchTermRow, config: &AnalysisConfig) -> bool {
    if row.match_type.to_lowercase().contains("exact") {
        return false;
    }
    if is_asin(&row.targeting) {
        return false;
    }
    row.spend >= config.min_spend && row.sales <= config.max_sales
}

/// Evaluate every row against the rule set. Result order preserves the
/// input order and `id` is the row's original position.
///
/// `config.include_poor_roas` is deliberately not consulted here.
pub fn analyze(rows: &[SearchTermRow], config: &AnalysisConfig) -> Vec<FlaggedTerm> {
    let mut flagged = Vec::new();

    for (id, row) in rows.iter().enumerate() {
        let search_term = row.customer_search_term.trim();
        if search_term.is_empty() {
            continue;
        }
        if config.exclude_branded && is_branded(search_term, &config.branded_terms) {
            debug!("Skipping branded search term: {search_term}");
            continue;
        }

        let rule = if high_acos(row, config) {
            RuleKind::HighAcos
        } else if spend_without_sales(row, config) {
            RuleKind::SpendWithoutSales
        } else {
            continue;
        };

        // Negative family comes from the customer search term, not the
        // targeting expression, and is independent of which rule fired.
        let term_is_asin = is_asin(&row.customer_search_term);
        let negative_match_type = if term_is_asin {
            NegativeMatchType::ProductTargeting
        } else {
            NegativeMatchType::keyword_preference(config.use_negative_phrase)
        };

        flagged.push(FlaggedTerm {
            id,
            date: row.date,
            campaign_name: row.campaign_name.clone(),
            ad_group_name: row.ad_group_name.clone(),
            portfolio: row.portfolio.clone(),
            targeting: row.targeting.clone(),
            match_type: row.match_type.clone(),
            customer_search_term: row.customer_search_term.clone(),
            impressions: row.impressions,
            clicks: row.clicks,
            spend: row.spend,
            sales: row.sales,
            acos: row.acos,
            orders: row.orders,
            rule,
            is_asin: term_is_asin,
            negative_match_type,
            selected: true,
        });
    }

    flagged
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
