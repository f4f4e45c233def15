//! CSV schema introspection
//!
//! Locates the required columns by their source header names and
//! discovers the dynamically-named tag columns. Built once per load;
//! row parsing afterwards is pure index lookups.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use csv::StringRecord;
use regex::Regex;

use super::errors::{DatasetError, DatasetResult};
use super::row::ChargeRow;

// Source column names as written by the billing export.
const COL_ACCOUNT_ID: &str = "Account id";
const COL_SUBSCRIPTION_ID: &str = "Cluster id";
const COL_DATABASE_ID: &str = "Database id";
const COL_CLUSTER_NAME: &str = "Cluster name";
const COL_PLAN_TYPE: &str = "Plan Type";
const COL_REGION: &str = "Region";
const COL_START_DATE: &str = "Start date";
const COL_END_DATE: &str = "End date";
const COL_CHARGE_TYPE: &str = "Charge Type";
const COL_BILLING_UNIT_TYPE: &str = "Billing Unit Type";
const COL_QUANTITY: &str = "Billing Unit quantity";
const COL_PRICE_PER_HOUR: &str = "Billing Unit price/hr";
const COL_HOURS: &str = "Hours";
const COL_SUBTOTAL: &str = "Subtotal";
const COL_DISCOUNT: &str = "Discount";
const COL_TOTAL_COST: &str = "Total Cost $";

/// Tag columns are named `keyN:value` with N a positive integer.
static TAG_COLUMN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^key[1-9][0-9]*:value$").unwrap());

/// Whether a header name denotes a tag column
pub fn is_tag_column(name: &str) -> bool {
    TAG_COLUMN_RE.is_match(name)
}

/// Resolved column positions for one CSV file
#[derive(Debug, Clone)]
pub struct TableSchema {
    account_id: usize,
    subscription_id: usize,
    database_id: usize,
    cluster_name: usize,
    plan_type: usize,
    region: usize,
    start_date: usize,
    end_date: usize,
    charge_type: usize,
    billing_unit_type: usize,
    quantity: usize,
    price_per_hour: usize,
    hours: usize,
    subtotal: usize,
    discount: usize,
    total_cost: usize,

    /// Tag columns in header order: (position, column name)
    tag_columns: Vec<(usize, String)>,
}

impl TableSchema {
    /// Resolve the schema from a header record
    pub fn from_headers(headers: &StringRecord) -> DatasetResult<Self> {
        let find = |name: &'static str| -> DatasetResult<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(DatasetError::MissingColumn(name))
        };

        let tag_columns = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| is_tag_column(h.trim()))
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect();

        Ok(Self {
            account_id: find(COL_ACCOUNT_ID)?,
            subscription_id: find(COL_SUBSCRIPTION_ID)?,
            database_id: find(COL_DATABASE_ID)?,
            cluster_name: find(COL_CLUSTER_NAME)?,
            plan_type: find(COL_PLAN_TYPE)?,
            region: find(COL_REGION)?,
            start_date: find(COL_START_DATE)?,
            end_date: find(COL_END_DATE)?,
            charge_type: find(COL_CHARGE_TYPE)?,
            billing_unit_type: find(COL_BILLING_UNIT_TYPE)?,
            quantity: find(COL_QUANTITY)?,
            price_per_hour: find(COL_PRICE_PER_HOUR)?,
            hours: find(COL_HOURS)?,
            subtotal: find(COL_SUBTOTAL)?,
            discount: find(COL_DISCOUNT)?,
            total_cost: find(COL_TOTAL_COST)?,
            tag_columns,
        })
    }

    /// Discovered tag column names, in header order
    pub fn tag_column_names(&self) -> Vec<String> {
        self.tag_columns.iter().map(|(_, n)| n.clone()).collect()
    }

    /// Parse one record into a typed row
    pub fn parse_row(&self, line: u64, record: &StringRecord) -> DatasetResult<ChargeRow> {
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let mut tags = BTreeMap::new();
        for (idx, name) in &self.tag_columns {
            let value = cell(*idx);
            if !value.is_empty() {
                tags.insert(name.clone(), value.to_string());
            }
        }

        Ok(ChargeRow {
            account_id: required_id(line, COL_ACCOUNT_ID, cell(self.account_id))?,
            subscription_id: required_id(line, COL_SUBSCRIPTION_ID, cell(self.subscription_id))?,
            database_id: normalize_id(cell(self.database_id)),
            cluster_name: cell(self.cluster_name).to_string(),
            plan_type: cell(self.plan_type).to_string(),
            region: cell(self.region).to_string(),
            start_date: date(line, COL_START_DATE, cell(self.start_date))?,
            end_date: date(line, COL_END_DATE, cell(self.end_date))?,
            charge_type: optional_text(cell(self.charge_type)),
            billing_unit_type: optional_text(cell(self.billing_unit_type)),
            quantity: decimal(line, COL_QUANTITY, cell(self.quantity))?,
            price_per_hour: decimal(line, COL_PRICE_PER_HOUR, cell(self.price_per_hour))?,
            hours: decimal(line, COL_HOURS, cell(self.hours))?,
            subtotal: decimal(line, COL_SUBTOTAL, cell(self.subtotal))?,
            discount: decimal(line, COL_DISCOUNT, cell(self.discount))?,
            total_cost: decimal(line, COL_TOTAL_COST, cell(self.total_cost))?,
            tags,
        })
    }
}

fn invalid_cell(line: u64, column: &str, value: &str) -> DatasetError {
    DatasetError::InvalidCell {
        line,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn required_id(line: u64, column: &str, value: &str) -> DatasetResult<String> {
    normalize_id(value).ok_or_else(|| invalid_cell(line, column, value))
}

fn date(line: u64, column: &str, value: &str) -> DatasetResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid_cell(line, column, value))
}

fn decimal(line: u64, column: &str, value: &str) -> DatasetResult<Option<f64>> {
    if value.is_empty() || is_absent_marker(value) {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        // NaN/inf cells are treated as absent, like the export's own
        // N/A markers.
        Ok(_) => Ok(None),
        Err(_) => Err(invalid_cell(line, column, value)),
    }
}

fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() || is_absent_marker(value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Markers the billing export writes for missing values
fn is_absent_marker(value: &str) -> bool {
    matches!(value, "N/A" | "n/a" | "NaN" | "nan" | "null")
}

/// Normalize an id cell to a digits-only string.
///
/// The export writes float-typed id columns as `"123.0"`; strip a
/// fractional part that is all zeros. Anything non-numeric (including
/// absent markers) normalizes to `None`.
fn normalize_id(value: &str) -> Option<String> {
    if value.is_empty() || is_absent_marker(value) {
        return None;
    }
    let (int_part, frac_part) = match value.split_once('.') {
        Some((i, f)) => (i, f),
        None => (value, ""),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if !frac_part.is_empty() && !frac_part.bytes().all(|b| b == b'0') {
        return None;
    }
    Some(int_part.to_string())
}
