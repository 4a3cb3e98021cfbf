//! Report metadata for the filters endpoint: date coverage and the unique
//! campaign / ad group / portfolio values, in first-seen order.

use crate::types::{DateRange, SearchTermRow};

pub fn date_range(rows: &[SearchTermRow]) -> DateRange {
    let mut start = None;
    let mut end = None;
    for date in rows.iter().filter_map(|r| r.date) {
        start = Some(match start {
            Some(s) if s <= date => s,
            _ => date,
        });
        end = Some(match end {
            Some(e) if e >= date => e,
            _ => date,
        });
    }
    DateRange { start, end }
}

fn unique_non_empty<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if !trimmed.is_empty() && !seen.iter().any(|s| s == trimmed) {
            seen.push(trimmed.to_string());
        }
    }
    seen
}

pub fn unique_campaigns(rows: &[SearchTermRow]) -> Vec<String> {
    unique_non_empty(rows.iter().map(|r| r.campaign_name.as_str()))
}

pub fn unique_ad_groups(rows: &[SearchTermRow]) -> Vec<String> {
    unique_non_empty(rows.iter().map(|r| r.ad_group_name.as_str()))
}

pub fn unique_portfolios(rows: &[SearchTermRow]) -> Vec<String> {
    unique_non_empty(rows.iter().filter_map(|r| r.portfolio.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(campaign: &str, portfolio: Option<&str>, date: Option<(i32, u32, u32)>) -> SearchTermRow {
        SearchTermRow {
            date: date.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            campaign_name: campaign.to_string(),
            ad_group_name: "Group".to_string(),
            portfolio: portfolio.map(str::to_string),
            targeting: String::new(),
            match_type: String::new(),
            customer_search_term: String::new(),
            impressions: 0,
            clicks: 0,
            spend: 0.0,
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
    fn date_range_spans_present_dates_only() {
        let rows = vec![
            row("A", None, Some((2024, 3, 10))),
            row("A", None, None),
            row("B", None, Some((2024, 1, 2))),
        ];
        let range = date_range(&rows);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 3, 10));
    }

    #[test]
    fn date_range_empty_when_no_dates() {
        let rows = vec![row("A", None, None)];
        let range = date_range(&rows);
        assert_eq!(range.start, None);
        assert_eq!(range.end, None);
    }

    #[test]
    fn uniques_keep_first_seen_order_and_drop_blanks() {
        let rows = vec![
            row("B", Some("P2"), None),
            row("A", None, None),
            row("B", Some(""), None),
            row("A", Some("P1"), None),
        ];
        assert_eq!(unique_campaigns(&rows), vec!["B", "A"]);
        assert_eq!(unique_portfolios(&rows), vec!["P2", "P1"]);
    }
}
