//! Negative keyword / negative product-target bulk file generation.
//! Flagged terms partition by their is-ASIN flag into two disjoint sheets.

use crate::bulk::sheet::{sheet_to_csv_bytes, BulkDocument, Sheet};
use crate::error::Result;
use crate::types::{FlaggedTerm, NegativeMatchType};

pub const NEGATIVE_KEYWORD_COLUMNS: &[&str] = &[
    "Record Type",
    "Campaign ID",
    "Campaign Name",
    "Ad Group ID",
    "Ad Group Name",
    "Portfolio ID",
    "Keyword",
    "Match Type",
    "Operation",
    "Status",
];

pub const NEGATIVE_PRODUCT_COLUMNS: &[&str] = &[
    "Record Type",
    "Campaign ID",
    "Campaign Name",
    "Ad Group ID",
    "Ad Group Name",
    "Portfolio ID",
    "Product Targeting Expression",
    "Operation",
    "Status",
];

/// Single-sheet CSV layout: keyword and product columns unioned, rows
/// interleaved in selection order.
pub const NEGATIVE_CSV_COLUMNS: &[&str] = &[
    "Record Type",
    "Campaign Name",
    "Ad Group Name",
    "Keyword",
    "Match Type",
    "Product Targeting Expression",
    "Operation",
    "Status",
];

pub const NEGATIVE_KEYWORDS_SHEET: &str = "Negative Keywords";
pub const NEGATIVE_PRODUCTS_SHEET: &str = "Negative Products";

/// The platform's product-targeting syntax; ASINs always upload upper-cased.
fn asin_expression(search_term: &str) -> String {
    format!("asin=\"{}\"", search_term.to_uppercase())
}

fn keyword_row(item: &FlaggedTerm, match_type: NegativeMatchType) -> Vec<String> {
    vec![
        "Keyword".to_string(),
        String::new(), // Campaign ID
        item.campaign_name.clone(),
        String::new(), // Ad Group ID
        item.ad_group_name.clone(),
        String::new(), // Portfolio ID
        item.customer_search_term.clone(),
        match_type.to_string(),
        "Create".to_string(),
        "Enabled".to_string(),
    ]
}

fn product_row(item: &FlaggedTerm) -> Vec<String> {
    vec![
        "Product Targeting".to_string(),
        String::new(), // Campaign ID
        item.campaign_name.clone(),
        String::new(), // Ad Group ID
        item.ad_group_name.clone(),
        String::new(), // Portfolio ID
        asin_expression(&item.customer_search_term),
        "Create".to_string(),
        "Enabled".to_string(),
    ]
}

/// Build the negatives workbook. The keyword match type is the single
/// configured value applied uniformly to every keyword row in the batch.
/// With nothing to emit, the document still carries a headers-only keyword
/// sheet — never an empty workbook.
pub fn negatives_document(items: &[FlaggedTerm], use_negative_phrase: bool) -> BulkDocument {
    let match_type = NegativeMatchType::keyword_preference(use_negative_phrase);

    let mut keywords = Sheet::new(NEGATIVE_KEYWORDS_SHEET, NEGATIVE_KEYWORD_COLUMNS);
    let mut products = Sheet::new(NEGATIVE_PRODUCTS_SHEET, NEGATIVE_PRODUCT_COLUMNS);
    for item in items {
        if item.is_asin {
            products.push(product_row(item));
        } else {
            keywords.push(keyword_row(item, match_type));
        }
    }

    let mut document = BulkDocument::default();
    if !keywords.is_empty() {
        document.sheets.push(keywords);
    }
    if !products.is_empty() {
        document.sheets.push(products);
    }
    if document.sheets.is_empty() {
        document
            .sheets
            .push(Sheet::new(NEGATIVE_KEYWORDS_SHEET, NEGATIVE_KEYWORD_COLUMNS));
    }
    document
}

/// Flat CSV rendition of the same partition decision, one interleaved
/// record stream in selection order.
pub fn negatives_csv(items: &[FlaggedTerm], use_negative_phrase: bool) -> Result<Vec<u8>> {
    let match_type = NegativeMatchType::keyword_preference(use_negative_phrase);
    let mut sheet = Sheet::new(NEGATIVE_KEYWORDS_SHEET, NEGATIVE_CSV_COLUMNS);
    for item in items {
        if item.is_asin {
            sheet.push(vec![
                "Product Targeting".to_string(),
                item.campaign_name.clone(),
                item.ad_group_name.clone(),
                String::new(), // Keyword
                String::new(), // Match Type
                asin_expression(&item.customer_search_term),
                "Create".to_string(),
                "Enabled".to_string(),
            ]);
        } else {
            sheet.push(vec![
                "Keyword".to_string(),
                item.campaign_name.clone(),
                item.ad_group_name.clone(),
                item.customer_search_term.clone(),
                match_type.to_string(),
                String::new(), // Product Targeting Expression
                "Create".to_string(),
                "Enabled".to_string(),
            ]);
        }
    }
    sheet_to_csv_bytes(&sheet)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
