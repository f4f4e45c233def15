//! Request parameter validation
//!
//! Turns the raw string parameter bag from the transport layer into a
//! normalized, validated `ReportQuery` (the Filter Set). Each field is
//! checked independently against its own rule; unrecognized keys are
//! ignored and empty values are treated as absent.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::config::QueryConfig;
use super::errors::{QueryError, QueryResult};

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// Normalized, validated query constraints for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    /// Mandatory; every row must belong to this account
    pub account_id: String,

    pub subscription_id: Option<String>,
    pub database_id: Option<String>,
    pub plan_type: Option<String>,

    /// Usage must start on or after this date
    pub start_date: Option<NaiveDate>,

    /// Usage must end on or before this date
    pub end_date: Option<NaiveDate>,

    pub region: Option<String>,
    pub tag1: Option<String>,
    pub tag2: Option<String>,

    /// Active row-limit ceiling for this request
    pub limit: usize,
}

impl ReportQuery {
    /// Validate the raw parameter bag against the configured rules.
    ///
    /// Pure function of its inputs; fails with the first field-specific
    /// error encountered, mandatory-field check first.
    pub fn parse(params: &HashMap<String, String>, config: &QueryConfig) -> QueryResult<Self> {
        let get = |key: &str| -> Option<&str> {
            params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
        };

        let account_id = get("account_id")
            .ok_or(QueryError::MissingRequiredParameter("account_id"))
            .and_then(|v| numeric(v, "account_id"))?;

        let subscription_id = get("subscription_id")
            .map(|v| numeric(v, "subscription_id"))
            .transpose()?;
        let database_id = get("database_id")
            .map(|v| numeric(v, "database_id"))
            .transpose()?;

        let start_date = get("start_date").map(|v| date(v, "start_date")).transpose()?;
        let end_date = get("end_date").map(|v| date(v, "end_date")).transpose()?;

        // No cross-field ordering check between start_date and
        // end_date; an inverted range simply matches nothing.

        let limit = match get("limit") {
            Some(v) if config.allow_client_limit => parse_limit(v, config.max_rows_limit)?,
            _ => config.default_row_limit,
        };

        Ok(Self {
            account_id,
            subscription_id,
            database_id,
            plan_type: get("plan_type").map(str::to_string),
            start_date,
            end_date,
            region: get("region").map(str::to_string),
            tag1: get("tag1").map(str::to_string),
            tag2: get("tag2").map(str::to_string),
            limit,
        })
    }
}

fn numeric(value: &str, field: &'static str) -> QueryResult<String> {
    if DIGITS_RE.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(QueryError::InvalidNumericFormat(field))
    }
}

fn date(value: &str, field: &'static str) -> QueryResult<NaiveDate> {
    if !DATE_RE.is_match(value) {
        return Err(QueryError::InvalidDateFormat(field));
    }
    // The pattern gates the shape; chrono rejects impossible calendar
    // dates like 2024-13-01.
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| QueryError::InvalidDateFormat(field))
}

fn parse_limit(value: &str, max: usize) -> QueryResult<usize> {
    let parsed: i64 = value
        .parse()
        .map_err(|_| QueryError::InvalidLimitValue { max })?;
    if parsed < 1 || parsed > max as i64 {
        return Err(QueryError::InvalidLimitValue { max });
    }
    Ok(parsed as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_account_id_mandatory() {
        let config = QueryConfig::default();

        let err = ReportQuery::parse(&bag(&[]), &config).unwrap_err();
        assert_eq!(err, QueryError::MissingRequiredParameter("account_id"));

        // Empty string counts as absent.
        let err = ReportQuery::parse(&bag(&[("account_id", "  ")]), &config).unwrap_err();
        assert_eq!(err, QueryError::MissingRequiredParameter("account_id"));
    }

    #[test]
    fn test_numeric_fields_reject_non_digits() {
        let config = QueryConfig::default();

        for bad in ["abc", "12a45", "12 45", "-1", "1.5", "１２３"] {
            let err = ReportQuery::parse(&bag(&[("account_id", bad)]), &config).unwrap_err();
            assert_eq!(err, QueryError::InvalidNumericFormat("account_id"), "{bad}");
        }

        let err = ReportQuery::parse(
            &bag(&[("account_id", "12345"), ("subscription_id", "99x")]),
            &config,
        )
        .unwrap_err();
        assert_eq!(err, QueryError::InvalidNumericFormat("subscription_id"));

        let err = ReportQuery::parse(
            &bag(&[("account_id", "12345"), ("database_id", "one")]),
            &config,
        )
        .unwrap_err();
        assert_eq!(err, QueryError::InvalidNumericFormat("database_id"));
    }

    #[test]
    fn test_date_fields_reject_bad_formats() {
        let config = QueryConfig::default();

        for bad in [
            "2024-13-01", // month 13
            "2024-02-30", // day 30 in February
            "2024-1-1",   // not zero-padded
            "01-01-2024",
            "2024/01/01",
            "yesterday",
        ] {
            let err = ReportQuery::parse(
                &bag(&[("account_id", "12345"), ("start_date", bad)]),
                &config,
            )
            .unwrap_err();
            assert_eq!(err, QueryError::InvalidDateFormat("start_date"), "{bad}");
        }

        let err = ReportQuery::parse(
            &bag(&[("account_id", "12345"), ("end_date", "2024-00-10")]),
            &config,
        )
        .unwrap_err();
        assert_eq!(err, QueryError::InvalidDateFormat("end_date"));
    }

    #[test]
    fn test_valid_dates_normalize() {
        let config = QueryConfig::default();
        let query = ReportQuery::parse(
            &bag(&[
                ("account_id", "12345"),
                ("start_date", "2024-01-01"),
                ("end_date", "2024-02-29"), // leap day
            ]),
            &config,
        )
        .unwrap();
        assert_eq!(
            query.start_date,
            Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert_eq!(
            query.end_date,
            Some(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
    }

    #[test]
    fn test_limit_bounds() {
        let config = QueryConfig::default();

        for bad in ["0", "-3", "101", "ten", "2.5", ""] {
            let params = if bad.is_empty() {
                bag(&[("account_id", "12345")])
            } else {
                bag(&[("account_id", "12345"), ("limit", bad)])
            };
            let result = ReportQuery::parse(&params, &config);
            if bad.is_empty() {
                // Absent limit defaults rather than failing.
                assert_eq!(result.unwrap().limit, config.default_row_limit);
            } else {
                assert_eq!(
                    result.unwrap_err(),
                    QueryError::InvalidLimitValue { max: 100 },
                    "{bad}"
                );
            }
        }

        for good in [1usize, 10, 100] {
            let query = ReportQuery::parse(
                &bag(&[("account_id", "12345"), ("limit", &good.to_string())]),
                &config,
            )
            .unwrap();
            assert_eq!(query.limit, good);
        }
    }

    #[test]
    fn test_client_limit_ignored_when_disabled() {
        let config = QueryConfig {
            allow_client_limit: false,
            ..QueryConfig::default()
        };
        let query = ReportQuery::parse(
            &bag(&[("account_id", "12345"), ("limit", "50")]),
            &config,
        )
        .unwrap();
        assert_eq!(query.limit, config.default_row_limit);

        // Even an invalid limit is ignored in this mode.
        let query = ReportQuery::parse(
            &bag(&[("account_id", "12345"), ("limit", "nope")]),
            &config,
        )
        .unwrap();
        assert_eq!(query.limit, config.default_row_limit);
    }

    #[test]
    fn test_freeform_fields_pass_through() {
        let config = QueryConfig::default();
        let query = ReportQuery::parse(
            &bag(&[
                ("account_id", "12345"),
                ("plan_type", "Pro"),
                ("region", "us-east-1"),
                ("tag1", "blue"),
                ("tag2", "prod"),
                ("unknown", "ignored"),
            ]),
            &config,
        )
        .unwrap();
        assert_eq!(query.plan_type.as_deref(), Some("Pro"));
        assert_eq!(query.region.as_deref(), Some("us-east-1"));
        assert_eq!(query.tag1.as_deref(), Some("blue"));
        assert_eq!(query.tag2.as_deref(), Some("prod"));
        assert_eq!(query.subscription_id, None);
    }
}
