use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::types::{FlaggedTerm, SearchTermRow};

/// Process-lifetime session state: uploaded report rows keyed by an opaque
/// UUID, and analysis results under a derived key per session. Entries live
/// until explicitly removed — expiry is the caller's concern.
///
/// DashMap's sharded locking serializes concurrent access per key, so two
/// requests racing on one session each see a consistent snapshot. Handlers
/// receive `Arc` snapshots and never mutate stored rows in place.
pub struct SessionStore {
    reports: DashMap<String, Arc<Vec<SearchTermRow>>>,
    results: DashMap<String, Arc<Vec<FlaggedTerm>>>,
}

impl SessionStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store an uploaded report and mint its session id.
    pub fn insert_report(&self, rows: Vec<SearchTermRow>) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.reports.insert(session_id.clone(), Arc::new(rows));
        session_id
    }

    pub fn report(&self, session_id: &str) -> Result<Arc<Vec<SearchTermRow>>> {
        self.reports
            .get(session_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(AppError::SessionNotFound)
    }

    /// Replace the analysis results derived from a session's report.
    pub fn store_results(&self, session_id: &str, results: Vec<FlaggedTerm>) {
        self.results.insert(session_id.to_string(), Arc::new(results));
    }

    pub fn results(&self, session_id: &str) -> Result<Arc<Vec<FlaggedTerm>>> {
        self.results
            .get(session_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(AppError::ResultsNotFound)
    }

    /// Remove a session's report and any derived results.
    pub fn remove(&self, session_id: &str) {
        self.reports.remove(session_id);
        self.results.remove(session_id);
    }

    pub fn session_count(&self) -> usize {
        self.reports.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            reports: DashMap::new(),
            results: DashMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NegativeMatchType, RuleKind};

    fn sample_row() -> SearchTermRow {
        SearchTermRow {
            date: None,
            campaign_name: "Camp".to_string(),
            ad_group_name: "Group".to_string(),
            portfolio: None,
            targeting: "widget".to_string(),
            match_type: "broad".to_string(),
            customer_search_term: "blue widget".to_string(),
            impressions: 10,
            clicks: 1,
            spend: 1.0,
            sales: 0.0,
            orders: 0,
            units: 0,
            cpc: 1.0,
            acos: None,
            roas: None,
            ctr: None,
            conversion_rate: None,
        }
    }

    fn sample_result() -> FlaggedTerm {
        FlaggedTerm {
            id: 0,
            date: None,
            campaign_name: "Camp".to_string(),
            ad_group_name: "Group".to_string(),
            portfolio: None,
            targeting: "widget".to_string(),
            match_type: "broad".to_string(),
            customer_search_term: "blue widget".to_string(),
            impressions: 10,
            clicks: 1,
            spend: 15.0,
            sales: 0.0,
            acos: None,
            orders: 0,
            rule: RuleKind::SpendWithoutSales,
            is_asin: false,
            negative_match_type: NegativeMatchType::Exact,
            selected: true,
        }
    }

    #[test]
    fn insert_and_fetch_report_round_trips() {
        let store = SessionStore::new();
        let id = store.insert_report(vec![sample_row()]);
        let rows = store.report(&id).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(store.session_count(), 1);
    }

    #[test]
    fn unknown_session_is_a_distinct_not_found() {
        let store = SessionStore::new();
        assert!(matches!(
            store.report("missing").unwrap_err(),
            AppError::SessionNotFound
        ));
        assert!(matches!(
            store.results("missing").unwrap_err(),
            AppError::ResultsNotFound
        ));
    }

    #[test]
    fn results_are_stored_under_the_session_and_removed_with_it() {
        let store = SessionStore::new();
        let id = store.insert_report(vec![sample_row()]);
        store.store_results(&id, vec![sample_result()]);
        assert_eq!(store.results(&id).unwrap().len(), 1);

        store.remove(&id);
        assert!(store.report(&id).is_err());
        assert!(store.results(&id).is_err());
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn sessions_get_unique_ids() {
        let store = SessionStore::new();
        let a = store.insert_report(vec![]);
        let b = store.insert_report(vec![]);
        assert_ne!(a, b);
        assert_eq!(store.session_count(), 2);
    }
}
