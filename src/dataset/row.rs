//! Charge row model
//!
//! One CSV record, parsed into its semantic types. Rows are immutable
//! for the lifetime of the dataset snapshot.

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// One usage/charge record from the dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRow {
    /// Owning account (normalized numeric string)
    pub account_id: String,

    /// Subscription/cluster id (normalized numeric string)
    pub subscription_id: String,

    /// Database id, absent for cluster-level charges
    pub database_id: Option<String>,

    pub cluster_name: String,
    pub plan_type: String,
    pub region: String,

    /// Usage period covered by this charge
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    // Charge attributes pass through to the response verbatim.
    pub charge_type: Option<String>,
    pub billing_unit_type: Option<String>,
    pub quantity: Option<f64>,
    pub price_per_hour: Option<f64>,
    pub hours: Option<f64>,
    pub subtotal: Option<f64>,
    pub discount: Option<f64>,
    pub total_cost: Option<f64>,

    /// Non-empty tag cells, keyed by tag column name (`keyN:value`),
    /// each holding a `tagname:tagvalue` string.
    pub tags: BTreeMap<String, String>,
}
