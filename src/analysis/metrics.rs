//! KPI, campaign, and monthly roll-ups over normalized rows. Derived ratios
//! use safe division and a 2-decimal presentation rounding contract.

use std::collections::BTreeMap;

use crate::types::{CampaignMetrics, KpiSummary, MonthlyPoint, SearchTermRow};

/// Presentation rounding for derived ratios — not an internal precision.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Zero denominator yields zero, never an error or infinity.
fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn kpi_summary(rows: &[SearchTermRow]) -> KpiSummary {
    let total_sales: f64 = rows.iter().map(|r| r.sales).sum();
    let ad_spend: f64 = rows.iter().map(|r| r.spend).sum();
    let orders: u64 = rows.iter().map(|r| r.orders).sum();
    let impressions: u64 = rows.iter().map(|r| r.impressions).sum();
    let clicks: u64 = rows.iter().map(|r| r.clicks).sum();

    KpiSummary {
        total_sales: round2(total_sales),
        ad_spend: round2(ad_spend),
        roas: round2(safe_div(total_sales, ad_spend)),
        acos: round2(safe_div(ad_spend, total_sales) * 100.0),
        orders,
        impressions,
        clicks,
        ctr: round2(safe_div(clicks as f64, impressions as f64) * 100.0),
        conversion_rate: round2(safe_div(orders as f64, clicks as f64) * 100.0),
        avg_cpc: round2(safe_div(ad_spend, clicks as f64)),
    }
}

#[derive(Default)]
struct CampaignAccumulator {
    portfolio: Option<String>,
    impressions: u64,
    clicks: u64,
    spend: f64,
    sales: f64,
    orders: u64,
}

/// Per-campaign roll-up, ordered by campaign name. The portfolio is the
/// first non-empty value seen in row order.
pub fn campaign_metrics(rows: &[SearchTermRow]) -> Vec<CampaignMetrics> {
    let mut grouped: BTreeMap<String, CampaignAccumulator> = BTreeMap::new();

    for row in rows {
        let acc = grouped.entry(row.campaign_name.clone()).or_default();
        acc.impressions += row.impressions;
        acc.clicks += row.clicks;
        acc.spend += row.spend;
        acc.sales += row.sales;
        acc.orders += row.orders;
        if acc.portfolio.is_none() {
            acc.portfolio = row.portfolio.clone();
        }
    }

    grouped
        .into_iter()
        .map(|(campaign_name, acc)| CampaignMetrics {
            campaign_name,
            portfolio: acc.portfolio,
            impressions: acc.impressions,
            clicks: acc.clicks,
            spend: round2(acc.spend),
            sales: round2(acc.sales),
            orders: acc.orders,
            acos: round2(safe_div(acc.spend, acc.sales) * 100.0),
            roas: round2(safe_div(acc.sales, acc.spend)),
        })
        .collect()
}

/// Year-month sales/spend series, ascending by "YYYY-MM" label. Rows with
/// no date are excluded from the grouping entirely.
pub fn monthly_series(rows: &[SearchTermRow]) -> Vec<MonthlyPoint> {
    use chrono::Datelike;

    let mut grouped: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();
    for row in rows {
        let Some(date) = row.date else {
            continue;
        };
        let bucket = grouped.entry((date.year(), date.month())).or_default();
        bucket.0 += row.sales;
        bucket.1 += row.spend;
    }

    grouped
        .into_iter()
        .map(|((year, month), (sales, spend))| MonthlyPoint {
            month: format!("{year:04}-{month:02}"),
            sales: round2(sales),
            spend: round2(spend),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(campaign: &str, spend: f64, sales: f64) -> SearchTermRow {
        SearchTermRow {
            date: None,
            campaign_name: campaign.to_string(),
            ad_group_name: "Group".to_string(),
            portfolio: None,
            targeting: String::new(),
            match_type: "broad".to_string(),
            customer_search_term: "term".to_string(),
            impressions: 0,
            clicks: 0,
            spend,
            sales,
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
    fn kpis_sum_and_derive_with_rounding() {
        let mut a = row("A", 10.0, 40.0);
        a.impressions = 1000;
        a.clicks = 30;
        a.orders = 4;
        let mut b = row("A", 5.0, 20.0);
        b.impressions = 500;
        b.clicks = 15;
        b.orders = 2;

        let kpis = kpi_summary(&[a, b]);
        assert_eq!(kpis.total_sales, 60.0);
        assert_eq!(kpis.ad_spend, 15.0);
        assert_eq!(kpis.roas, 4.0);
        assert_eq!(kpis.acos, 25.0);
        assert_eq!(kpis.ctr, 3.0);
        assert_eq!(kpis.conversion_rate, 13.33);
        assert_eq!(kpis.avg_cpc, 0.33);
    }

    #[test]
    fn kpi_safe_division_yields_zero() {
        let r = row("A", 100.0, 0.0); // spend with no sales, no impressions
        let kpis = kpi_summary(&[r]);
        assert_eq!(kpis.acos, 0.0);
        assert_eq!(kpis.roas, 0.0);
        assert_eq!(kpis.ctr, 0.0);
        assert_eq!(kpis.conversion_rate, 0.0);
        assert_eq!(kpis.avg_cpc, 0.0);
    }

    #[test]
    fn empty_row_set_is_all_zeros() {
        let kpis = kpi_summary(&[]);
        assert_eq!(kpis.total_sales, 0.0);
        assert_eq!(kpis.impressions, 0);
        assert_eq!(kpis.acos, 0.0);
    }

    #[test]
    fn campaigns_group_sorted_with_first_seen_portfolio() {
        let mut b1 = row("Beta", 10.0, 20.0);
        b1.portfolio = None;
        let mut a1 = row("Alpha", 5.0, 0.0);
        a1.portfolio = Some("P-main".to_string());
        let mut b2 = row("Beta", 10.0, 30.0);
        b2.portfolio = Some("P-late".to_string());

        let metrics = campaign_metrics(&[b1, a1, b2]);
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].campaign_name, "Alpha");
        assert_eq!(metrics[0].portfolio.as_deref(), Some("P-main"));
        assert_eq!(metrics[0].acos, 0.0); // no sales → safe division
        assert_eq!(metrics[1].campaign_name, "Beta");
        // First non-empty value wins even though the first row had none.
        assert_eq!(metrics[1].portfolio.as_deref(), Some("P-late"));
        assert_eq!(metrics[1].spend, 20.0);
        assert_eq!(metrics[1].sales, 50.0);
        assert_eq!(metrics[1].acos, 40.0);
        assert_eq!(metrics[1].roas, 2.5);
    }

    #[test]
    fn monthly_buckets_by_year_month_ascending() {
        let mut jan_a = row("A", 1.0, 10.0);
        jan_a.date = NaiveDate::from_ymd_opt(2024, 1, 15);
        let mut jan_b = row("A", 2.0, 20.0);
        jan_b.date = NaiveDate::from_ymd_opt(2024, 1, 20);
        let mut dec = row("A", 4.0, 40.0);
        dec.date = NaiveDate::from_ymd_opt(2023, 12, 1);
        let undated = row("A", 99.0, 99.0);

        let series = monthly_series(&[jan_a, jan_b, dec, undated]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].month, "2023-12");
        assert_eq!(series[1].month, "2024-01");
        assert_eq!(series[1].sales, 30.0);
        assert_eq!(series[1].spend, 3.0);
    }
}
