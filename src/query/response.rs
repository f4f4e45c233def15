//! Response shaping types
//!
//! Serializable records for the usage-cost-report payload. Built per
//! request during shaping and serialized immediately; absent charge
//! fields and empty tag maps are omitted from the JSON.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::ChargeRow;

/// One charge line within a subscription group
#[derive(Debug, Clone, Serialize)]
pub struct Charge {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_unit_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_hour: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,

    /// Tag column name → stored `tagname:tagvalue` string
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl From<&ChargeRow> for Charge {
    /// Charge attributes are copied verbatim; no recomputation or
    /// rounding happens during shaping.
    fn from(row: &ChargeRow) -> Self {
        Self {
            charge_type: row.charge_type.clone(),
            billing_unit_type: row.billing_unit_type.clone(),
            quantity: row.quantity,
            price_per_hour: row.price_per_hour,
            hours: row.hours,
            subtotal: row.subtotal,
            discount: row.discount,
            total_cost: row.total_cost,
            tags: row.tags.clone(),
        }
    }
}

/// Subscription-level grouping of matching charge rows
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub subscription_id: String,
    pub cluster_name: String,
    pub plan_type: String,
    pub region: String,
    pub start_date: String,
    pub end_date: String,
    pub charges: Vec<Charge>,
}

impl UsageReport {
    /// Start a group from its first row
    pub fn from_first_row(row: &ChargeRow) -> Self {
        Self {
            subscription_id: row.subscription_id.clone(),
            cluster_name: row.cluster_name.clone(),
            plan_type: row.plan_type.clone(),
            region: row.region.clone(),
            start_date: row.start_date.format("%Y-%m-%d").to_string(),
            end_date: row.end_date.format("%Y-%m-%d").to_string(),
            charges: Vec::new(),
        }
    }
}

/// Final success payload
#[derive(Debug, Clone, Serialize)]
pub struct UsageReportResponse {
    pub data: Vec<UsageReport>,

    /// Count of matching charge rows across all groups
    pub total_rows: usize,
}

impl UsageReportResponse {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total_rows: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_omitted() {
        let charge = Charge {
            charge_type: Some("Shards".to_string()),
            billing_unit_type: None,
            quantity: Some(2.0),
            price_per_hour: None,
            hours: None,
            subtotal: None,
            discount: None,
            total_cost: Some(163.68),
            tags: BTreeMap::new(),
        };

        let json = serde_json::to_value(&charge).unwrap();
        assert_eq!(json["charge_type"], "Shards");
        assert_eq!(json["total_cost"], 163.68);
        assert!(json.get("discount").is_none());
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn test_empty_response_shape() {
        let json = serde_json::to_value(UsageReportResponse::empty()).unwrap();
        assert_eq!(json["total_rows"], 0);
        assert_eq!(json["data"], serde_json::json!([]));
    }
}
