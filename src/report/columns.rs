//! Header normalization: maps varied source-report spellings onto one
//! canonical schema. Unmatched headers pass through unchanged.

use super::parse::RawTable;

// ---------------------------------------------------------------------------
// Canonical column names
// ---------------------------------------------------------------------------

pub const COL_DATE: &str = "Date";
pub const COL_CAMPAIGN: &str = "Campaign Name";
pub const COL_AD_GROUP: &str = "Ad Group Name";
pub const COL_PORTFOLIO: &str = "Portfolio";
pub const COL_TARGETING: &str = "Targeting";
pub const COL_MATCH_TYPE: &str = "Match Type";
pub const COL_SEARCH_TERM: &str = "Customer Search Term";
pub const COL_IMPRESSIONS: &str = "Impressions";
pub const COL_CLICKS: &str = "Clicks";
pub const COL_SPEND: &str = "Spend";
pub const COL_SALES: &str = "Sales";
pub const COL_ORDERS: &str = "Orders";
pub const COL_UNITS: &str = "Units";
pub const COL_ACOS: &str = "ACOS";
pub const COL_ROAS: &str = "ROAS";
pub const COL_CTR: &str = "CTR";
pub const COL_CPC: &str = "CPC";
pub const COL_CONVERSION_RATE: &str = "Conversion Rate";

/// Source-report header variants, keyed by lower-cased trimmed spelling.
const COLUMN_SYNONYMS: &[(&str, &str)] = &[
    // Sales variations
    ("7 day total sales", COL_SALES),
    ("7 day total sales ($)", COL_SALES),
    ("total sales", COL_SALES),
    ("sales", COL_SALES),
    // ACOS variations
    ("total advertising cost of sales (acos)", COL_ACOS),
    ("acos", COL_ACOS),
    ("advertising cost of sales", COL_ACOS),
    // ROAS variations
    ("total return on advertising spend (roas)", COL_ROAS),
    ("roas", COL_ROAS),
    ("return on advertising spend", COL_ROAS),
    // Orders variations
    ("7 day total orders (#)", COL_ORDERS),
    ("7 day total orders", COL_ORDERS),
    ("orders", COL_ORDERS),
    // Units variations
    ("7 day total units (#)", COL_UNITS),
    ("7 day total units", COL_UNITS),
    ("units", COL_UNITS),
    // Conversion rate
    ("7 day conversion rate", COL_CONVERSION_RATE),
    ("conversion rate", COL_CONVERSION_RATE),
    // CPC variations
    ("cost per click (cpc)", COL_CPC),
    ("cpc", COL_CPC),
    ("average cpc", COL_CPC),
    // CTR variations
    ("click-thru rate (ctr)", COL_CTR),
    ("click-through rate", COL_CTR),
    ("ctr", COL_CTR),
    // Portfolio
    ("portfolio name", COL_PORTFOLIO),
    ("portfolio", COL_PORTFOLIO),
];

/// Columns that must be present after normalization for a report to be
/// accepted at all. Everything else degrades gracefully when absent.
pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_CAMPAIGN,
    COL_AD_GROUP,
    COL_TARGETING,
    COL_MATCH_TYPE,
    COL_SEARCH_TERM,
    COL_IMPRESSIONS,
    COL_CLICKS,
    COL_SPEND,
];

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

pub fn canonical_header(header: &str) -> String {
    let key = header.trim().to_lowercase();
    COLUMN_SYNONYMS
        .iter()
        .find(|(variant, _)| *variant == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| header.to_string())
}

pub fn normalize_headers(table: &mut RawTable) {
    for header in &mut table.headers {
        *header = canonical_header(header);
    }
}

/// Ordered list of required canonical columns absent from `headers`.
/// Matching is case/whitespace-insensitive so pre-normalization spellings
/// of the required set also count as present.
pub fn missing_required_columns(headers: &[String]) -> Vec<String> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| !lowered.iter().any(|h| h == &required.to_lowercase()))
        .map(|required| required.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_map_to_canonical_names() {
        assert_eq!(canonical_header("7 Day Total Sales ($)"), COL_SALES);
        assert_eq!(
            canonical_header("Total Advertising Cost of Sales (ACOS)"),
            COL_ACOS
        );
        assert_eq!(canonical_header("  acos  "), COL_ACOS);
        assert_eq!(canonical_header("Click-Thru Rate (CTR)"), COL_CTR);
        assert_eq!(canonical_header("Portfolio name"), COL_PORTFOLIO);
    }

    #[test]
    fn unmatched_headers_pass_through() {
        assert_eq!(canonical_header("Campaign Name"), "Campaign Name");
        assert_eq!(canonical_header("Some Custom Column"), "Some Custom Column");
    }

    #[test]
    fn missing_columns_listed_in_required_order() {
        let headers = vec![
            "Campaign Name".to_string(),
            "Targeting".to_string(),
            "Clicks".to_string(),
        ];
        let missing = missing_required_columns(&headers);
        assert_eq!(
            missing,
            vec![
                COL_AD_GROUP.to_string(),
                COL_MATCH_TYPE.to_string(),
                COL_SEARCH_TERM.to_string(),
                COL_IMPRESSIONS.to_string(),
                COL_SPEND.to_string(),
            ]
        );
    }

    #[test]
    fn required_match_ignores_case_and_whitespace() {
        let headers: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .map(|c| format!("  {}  ", c.to_uppercase()))
            .collect();
        assert!(missing_required_columns(&headers).is_empty());
    }
}
