//! Row matching
//!
//! A row matches a `ReportQuery` iff every present filter field holds.
//! Absent fields impose no constraint, so a query carrying only the
//! mandatory `account_id` matches every row for that account.

use crate::dataset::ChargeRow;

use super::config::TagMatchMode;
use super::params::ReportQuery;

impl ReportQuery {
    /// Check whether a row satisfies every present filter
    pub fn matches(&self, row: &ChargeRow, tag_match: TagMatchMode) -> bool {
        if row.account_id != self.account_id {
            return false;
        }
        if let Some(sub) = &self.subscription_id {
            if row.subscription_id != *sub {
                return false;
            }
        }
        if let Some(db) = &self.database_id {
            if row.database_id.as_deref() != Some(db.as_str()) {
                return false;
            }
        }
        // Plan names are matched case-insensitively; the source data
        // mixes "Pro" and "pro".
        if let Some(plan) = &self.plan_type {
            if !row.plan_type.eq_ignore_ascii_case(plan) {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if row.region != *region {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if row.start_date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if row.end_date > end {
                return false;
            }
        }
        if let Some(tag) = &self.tag1 {
            if !row_has_tag(row, tag, tag_match) {
                return false;
            }
        }
        if let Some(tag) = &self.tag2 {
            if !row_has_tag(row, tag, tag_match) {
                return false;
            }
        }
        true
    }
}

/// Whether any of the row's tag cells satisfies the filter.
///
/// Stored tag cells hold `tagname:tagvalue`; the filter is compared
/// against the tag-value component (the whole cell when no `:` is
/// present). A row with no tag cells never matches a tag filter.
fn row_has_tag(row: &ChargeRow, filter: &str, mode: TagMatchMode) -> bool {
    row.tags.values().any(|stored| {
        let value = match stored.split_once(':') {
            Some((_, v)) => v,
            None => stored.as_str(),
        };
        match mode {
            TagMatchMode::Exact => value == filter,
            TagMatchMode::Substring => value.contains(filter),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::query::QueryConfig;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_row() -> ChargeRow {
        let mut tags = BTreeMap::new();
        tags.insert("key1:value".to_string(), "colorname:blue".to_string());
        tags.insert("key2:value".to_string(), "env:prod".to_string());
        ChargeRow {
            account_id: "12345".to_string(),
            subscription_id: "999".to_string(),
            database_id: Some("42".to_string()),
            cluster_name: "cache-prod".to_string(),
            plan_type: "Pro".to_string(),
            region: "us-east-1".to_string(),
            start_date: d("2024-01-01"),
            end_date: d("2024-01-31"),
            charge_type: Some("Shards".to_string()),
            billing_unit_type: Some("shard".to_string()),
            quantity: Some(2.0),
            price_per_hour: Some(0.11),
            hours: Some(744.0),
            subtotal: Some(163.68),
            discount: Some(0.0),
            total_cost: Some(163.68),
            tags,
        }
    }

    fn base_query() -> ReportQuery {
        let config = QueryConfig::default();
        let params = [("account_id".to_string(), "12345".to_string())]
            .into_iter()
            .collect();
        ReportQuery::parse(&params, &config).unwrap()
    }

    #[test]
    fn test_account_only_query_matches() {
        let row = sample_row();
        assert!(base_query().matches(&row, TagMatchMode::Substring));

        let mut other_account = base_query();
        other_account.account_id = "99999".to_string();
        assert!(!other_account.matches(&row, TagMatchMode::Substring));
    }

    #[test]
    fn test_exact_equality_filters() {
        let row = sample_row();

        let mut q = base_query();
        q.subscription_id = Some("999".to_string());
        q.database_id = Some("42".to_string());
        q.region = Some("us-east-1".to_string());
        assert!(q.matches(&row, TagMatchMode::Substring));

        q.region = Some("eu-west-1".to_string());
        assert!(!q.matches(&row, TagMatchMode::Substring));
    }

    #[test]
    fn test_plan_type_case_insensitive() {
        let row = sample_row();
        let mut q = base_query();
        q.plan_type = Some("pro".to_string());
        assert!(q.matches(&row, TagMatchMode::Substring));
        q.plan_type = Some("Flex".to_string());
        assert!(!q.matches(&row, TagMatchMode::Substring));
    }

    #[test]
    fn test_database_id_filter_on_absent_cell() {
        let mut row = sample_row();
        row.database_id = None;
        let mut q = base_query();
        q.database_id = Some("42".to_string());
        assert!(!q.matches(&row, TagMatchMode::Substring));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let row = sample_row();
        let mut q = base_query();

        q.start_date = Some(d("2024-01-01"));
        q.end_date = Some(d("2024-01-31"));
        assert!(q.matches(&row, TagMatchMode::Substring));

        q.start_date = Some(d("2024-01-02"));
        assert!(!q.matches(&row, TagMatchMode::Substring));

        q.start_date = None;
        q.end_date = Some(d("2024-01-30"));
        assert!(!q.matches(&row, TagMatchMode::Substring));
    }

    #[test]
    fn test_tag_filter_matches_value_component() {
        let row = sample_row();
        let mut q = base_query();

        q.tag1 = Some("blue".to_string());
        assert!(q.matches(&row, TagMatchMode::Substring));
        assert!(q.matches(&row, TagMatchMode::Exact));

        // Substring mode accepts a fragment; exact mode does not.
        q.tag1 = Some("blu".to_string());
        assert!(q.matches(&row, TagMatchMode::Substring));
        assert!(!q.matches(&row, TagMatchMode::Exact));

        // The tag name component is not searched.
        q.tag1 = Some("colorname".to_string());
        assert!(!q.matches(&row, TagMatchMode::Exact));
    }

    #[test]
    fn test_either_tag_filter_scans_all_tag_columns() {
        let row = sample_row();
        let mut q = base_query();

        // tag2 may match the key1:value column and vice versa.
        q.tag2 = Some("blue".to_string());
        assert!(q.matches(&row, TagMatchMode::Substring));

        q.tag2 = None;
        q.tag1 = Some("prod".to_string());
        assert!(q.matches(&row, TagMatchMode::Substring));
    }

    #[test]
    fn test_untagged_row_never_matches_tag_filter() {
        let mut row = sample_row();
        row.tags.clear();
        let mut q = base_query();
        q.tag1 = Some("blue".to_string());
        assert!(!q.matches(&row, TagMatchMode::Substring));
    }
}
