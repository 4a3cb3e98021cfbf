//! Cell-level cleaning and typed row construction. Value-level problems
//! never error: counts and currency degrade to zero, reported ratios and
//! dates degrade to absent.

use chrono::{NaiveDate, NaiveDateTime};

use super::columns::{self, missing_required_columns, normalize_headers};
use super::parse::{CellValue, RawTable};
use crate::error::{AppError, Result};
use crate::types::SearchTermRow;

static EMPTY_CELL: CellValue = CellValue::Empty;

// ---------------------------------------------------------------------------
// Cell cleaners
// ---------------------------------------------------------------------------

/// Counts: thousands separators stripped, fractional values truncated toward
/// zero (integer conversion, not rounding). Unparseable → 0.
pub fn clean_integer(cell: &CellValue) -> u64 {
    match cell {
        CellValue::Empty => 0,
        CellValue::Number(n) => n.trunc().max(0.0) as u64,
        CellValue::Text(s) => s
            .replace(',', "")
            .trim()
            .parse::<f64>()
            .map(|n| n.trunc().max(0.0) as u64)
            .unwrap_or(0),
    }
}

/// Currency: leading symbol and thousands separators stripped.
/// Missing/unparseable → 0.0.
pub fn clean_currency(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Empty => 0.0,
        CellValue::Number(n) => *n,
        CellValue::Text(s) => s
            .replace('$', "")
            .replace(',', "")
            .trim()
            .parse::<f64>()
            .unwrap_or(0.0),
    }
}

/// Percentages: trailing "%" and thousands separators stripped. Missing or
/// unparseable values stay absent — never coerced to zero.
pub fn clean_percentage(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Empty => None,
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => {
            let stripped = s.replace('%', "").replace(',', "");
            let trimmed = stripped.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
    }
}

/// Dates: tolerant multi-format parse; anything unparseable is absent, not
/// an error.
pub fn clean_date(cell: &CellValue) -> Option<NaiveDate> {
    let text = match cell {
        CellValue::Text(s) => s.trim(),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y%m%d", "%b %d, %Y"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    // Spreadsheet datetime cells arrive as "YYYY-MM-DD HH:MM:SS" text.
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

pub fn clean_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Number(n) => {
            if n.fract() == 0.0 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
    }
}

fn clean_optional_text(cell: &CellValue) -> Option<String> {
    let text = clean_text(cell);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// ---------------------------------------------------------------------------
// Report normalization
// ---------------------------------------------------------------------------

/// A cleaned report: the canonical header list plus fully-typed rows.
#[derive(Debug, Clone)]
pub struct NormalizedReport {
    pub columns: Vec<String>,
    pub rows: Vec<SearchTermRow>,
}

/// Normalize headers, check the required column set, and clean every row.
/// Only structural problems (missing columns) are an error; every missing
/// canonical name is reported, not just the first.
pub fn normalize_report(mut table: RawTable) -> Result<NormalizedReport> {
    normalize_headers(&mut table);
    let missing = missing_required_columns(&table.headers);
    if !missing.is_empty() {
        return Err(AppError::MissingColumns(missing));
    }
    let index = ColumnIndex::resolve(&table.headers);
    let rows = table.rows.iter().map(|row| index.build_row(row)).collect();
    Ok(NormalizedReport {
        columns: table.headers,
        rows,
    })
}

/// Positions of canonical columns, resolved once per report so row cleaning
/// is straight indexing.
struct ColumnIndex {
    date: Option<usize>,
    campaign: Option<usize>,
    ad_group: Option<usize>,
    portfolio: Option<usize>,
    targeting: Option<usize>,
    match_type: Option<usize>,
    search_term: Option<usize>,
    impressions: Option<usize>,
    clicks: Option<usize>,
    spend: Option<usize>,
    sales: Option<usize>,
    orders: Option<usize>,
    units: Option<usize>,
    cpc: Option<usize>,
    acos: Option<usize>,
    roas: Option<usize>,
    ctr: Option<usize>,
    conversion_rate: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Self {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        Self {
            date: find(columns::COL_DATE),
            campaign: find(columns::COL_CAMPAIGN),
            ad_group: find(columns::COL_AD_GROUP),
            portfolio: find(columns::COL_PORTFOLIO),
            targeting: find(columns::COL_TARGETING),
            match_type: find(columns::COL_MATCH_TYPE),
            search_term: find(columns::COL_SEARCH_TERM),
            impressions: find(columns::COL_IMPRESSIONS),
            clicks: find(columns::COL_CLICKS),
            spend: find(columns::COL_SPEND),
            sales: find(columns::COL_SALES),
            orders: find(columns::COL_ORDERS),
            units: find(columns::COL_UNITS),
            cpc: find(columns::COL_CPC),
            acos: find(columns::COL_ACOS),
            roas: find(columns::COL_ROAS),
            ctr: find(columns::COL_CTR),
            conversion_rate: find(columns::COL_CONVERSION_RATE),
        }
    }

    fn cell<'a>(&self, row: &'a [CellValue], position: Option<usize>) -> &'a CellValue {
        position.and_then(|i| row.get(i)).unwrap_or(&EMPTY_CELL)
    }

    fn build_row(&self, row: &[CellValue]) -> SearchTermRow {
        SearchTermRow {
            date: clean_date(self.cell(row, self.date)),
            campaign_name: clean_text(self.cell(row, self.campaign)),
            ad_group_name: clean_text(self.cell(row, self.ad_group)),
            portfolio: clean_optional_text(self.cell(row, self.portfolio)),
            targeting: clean_text(self.cell(row, self.targeting)),
            match_type: clean_text(self.cell(row, self.match_type)),
            customer_search_term: clean_text(self.cell(row, self.search_term)),
            impressions: clean_integer(self.cell(row, self.impressions)),
            clicks: clean_integer(self.cell(row, self.clicks)),
            spend: clean_currency(self.cell(row, self.spend)),
            sales: clean_currency(self.cell(row, self.sales)),
            orders: clean_integer(self.cell(row, self.orders)),
            units: clean_integer(self.cell(row, self.units)),
            cpc: clean_currency(self.cell(row, self.cpc)),
            acos: clean_percentage(self.cell(row, self.acos)),
            roas: clean_percentage(self.cell(row, self.roas)),
            ctr: clean_percentage(self.cell(row, self.ctr)),
            conversion_rate: clean_percentage(self.cell(row, self.conversion_rate)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn integers_truncate_toward_zero() {
        assert_eq!(clean_integer(&text("1,234")), 1234);
        assert_eq!(clean_integer(&text("12.9")), 12);
        assert_eq!(clean_integer(&CellValue::Number(7.99)), 7);
        assert_eq!(clean_integer(&text("garbage")), 0);
        assert_eq!(clean_integer(&CellValue::Empty), 0);
    }

    #[test]
    fn currency_strips_symbol_and_separators() {
        assert_eq!(clean_currency(&text("$1,234.56")), 1234.56);
        assert_eq!(clean_currency(&text(" $0.99 ")), 0.99);
        assert_eq!(clean_currency(&text("n/a")), 0.0);
        assert_eq!(clean_currency(&CellValue::Empty), 0.0);
    }

    #[test]
    fn percentages_preserve_absent_as_none() {
        assert_eq!(clean_percentage(&text("34.5%")), Some(34.5));
        assert_eq!(clean_percentage(&text("1,200%")), Some(1200.0));
        assert_eq!(clean_percentage(&text("0")), Some(0.0));
        assert_eq!(clean_percentage(&CellValue::Empty), None);
        assert_eq!(clean_percentage(&text("bad")), None);
    }

    #[test]
    fn dates_parse_common_formats_and_degrade_to_none() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(clean_date(&text("2024-01-15")), Some(expected));
        assert_eq!(clean_date(&text("01/15/2024")), Some(expected));
        assert_eq!(clean_date(&text("20240115")), Some(expected));
        assert_eq!(clean_date(&text("2024-01-15 00:00:00")), Some(expected));
        assert_eq!(clean_date(&text("not a date")), None);
        assert_eq!(clean_date(&CellValue::Empty), None);
    }

    fn minimal_table() -> RawTable {
        RawTable {
            headers: vec![
                "Campaign Name".into(),
                "Ad Group Name".into(),
                "Targeting".into(),
                "Match Type".into(),
                "Customer Search Term".into(),
                "Impressions".into(),
                "Clicks".into(),
                "Spend".into(),
                "7 Day Total Sales ($)".into(),
                "ACOS".into(),
            ],
            rows: vec![vec![
                text("Camp"),
                text("Group"),
                text("widget"),
                text("broad"),
                text("blue widget"),
                text("1,000"),
                text("25"),
                text("$12.50"),
                CellValue::Empty,
                CellValue::Empty,
            ]],
        }
    }

    #[test]
    fn normalize_report_fills_counts_and_keeps_ratios_absent() {
        let report = normalize_report(minimal_table()).unwrap();
        assert!(report.columns.contains(&"Sales".to_string()));
        let row = &report.rows[0];
        assert_eq!(row.impressions, 1000);
        assert_eq!(row.spend, 12.5);
        // Absent currency fills to zero; absent percentage stays absent.
        assert_eq!(row.sales, 0.0);
        assert_eq!(row.acos, None);
    }

    #[test]
    fn normalize_report_lists_every_missing_column() {
        let table = RawTable {
            headers: vec!["Campaign Name".into(), "Clicks".into()],
            rows: vec![],
        };
        let err = normalize_report(table).unwrap_err();
        match err {
            AppError::MissingColumns(missing) => {
                assert_eq!(
                    missing,
                    vec![
                        "Ad Group Name".to_string(),
                        "Targeting".to_string(),
                        "Match Type".to_string(),
                        "Customer Search Term".to_string(),
                        "Impressions".to_string(),
                        "Spend".to_string(),
                    ]
                );
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }
}
