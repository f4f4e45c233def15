//! CSV loading
//!
//! Reads the billing export into a `Dataset` snapshot, and provides
//! the structural consistency check used by `costreport check`.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use super::errors::{DatasetError, DatasetResult};
use super::schema::TableSchema;
use super::Dataset;

/// Load the dataset from a CSV file on disk
pub fn load_path(path: &Path) -> DatasetResult<Dataset> {
    load_from(ReaderBuilder::new().from_path(path)?)
}

/// Load the dataset from any CSV source
pub fn load_reader<R: Read>(reader: R) -> DatasetResult<Dataset> {
    load_from(ReaderBuilder::new().from_reader(reader))
}

fn load_from<R: Read>(mut rdr: csv::Reader<R>) -> DatasetResult<Dataset> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() || (headers.len() == 1 && headers[0].trim().is_empty()) {
        return Err(DatasetError::Empty);
    }

    let schema = TableSchema::from_headers(&headers)?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        rows.push(schema.parse_row(line, &record)?);
    }

    Ok(Dataset {
        rows,
        tag_columns: schema.tag_column_names(),
    })
}

/// Result of a structural consistency scan
#[derive(Debug)]
pub struct ConsistencyReport {
    /// Field count of the header row
    pub expected_fields: usize,

    /// Rows whose field count differs: (line number, fields found)
    pub inconsistent: Vec<(u64, usize)>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.inconsistent.is_empty()
    }
}

/// Scan a CSV source for rows whose field count differs from the
/// header's, without parsing cell contents.
pub fn check_consistency<R: Read>(reader: R) -> DatasetResult<ConsistencyReport> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut records = rdr.records();
    let header = match records.next() {
        Some(record) => record?,
        None => return Err(DatasetError::Empty),
    };
    let expected_fields = header.len();

    let mut inconsistent = Vec::new();
    for record in records {
        let record = record?;
        if record.len() != expected_fields {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            inconsistent.push((line, record.len()));
        }
    }

    Ok(ConsistencyReport {
        expected_fields,
        inconsistent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Account id,Cluster id,Database id,Cluster name,Plan Type,Region,\
Start date,End date,Charge Type,Billing Unit Type,Billing Unit quantity,\
Billing Unit price/hr,Hours,Subtotal,Discount,Total Cost $,key1:value,key2:value";

    fn sample_csv() -> String {
        format!(
            "{HEADER}\n\
12345,999,178658.0,cache-prod,Pro,us-east-1,2024-01-01,2024-01-31,Shards,shard,2,0.11,744,163.68,0,163.68,colorname:blue,env:prod\n\
12345,999,,cache-prod,Pro,us-east-1,2024-01-01,2024-01-31,Storage,GB,50,0.02,744,7.44,,7.44,,\n"
        )
    }

    #[test]
    fn test_load_discovers_tag_columns() {
        let dataset = load_reader(sample_csv().as_bytes()).unwrap();
        assert_eq!(dataset.tag_columns, vec!["key1:value", "key2:value"]);
    }

    #[test]
    fn test_load_parses_rows() {
        let dataset = load_reader(sample_csv().as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);

        let first = &dataset.rows[0];
        assert_eq!(first.account_id, "12345");
        assert_eq!(first.subscription_id, "999");
        // Float-typed id cells normalize to digit strings.
        assert_eq!(first.database_id.as_deref(), Some("178658"));
        assert_eq!(first.tags["key1:value"], "colorname:blue");
        assert_eq!(first.tags["key2:value"], "env:prod");

        let second = &dataset.rows[1];
        assert_eq!(second.database_id, None);
        assert!(second.tags.is_empty());
        assert_eq!(second.discount, None);
    }

    #[test]
    fn test_load_rejects_bad_date() {
        let csv = format!(
            "{HEADER}\n\
12345,999,,c,Pro,us-east-1,2024-13-01,2024-01-31,Shards,shard,2,0.11,744,163.68,0,163.68,,\n"
        );
        let err = load_reader(csv.as_bytes()).unwrap_err();
        match err {
            DatasetError::InvalidCell { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "Start date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_required_column() {
        let err = load_reader("Account id,Cluster id\n1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(_)));
    }

    #[test]
    fn test_consistency_check_flags_short_rows() {
        let csv = "a,b,c\n1,2,3\n1,2\n1,2,3,4\n";
        let report = check_consistency(csv.as_bytes()).unwrap();
        assert_eq!(report.expected_fields, 3);
        assert_eq!(report.inconsistent, vec![(3, 2), (4, 4)]);
        assert!(!report.is_consistent());
    }

    #[test]
    fn test_consistency_check_clean_file() {
        let report = check_consistency(sample_csv().as_bytes()).unwrap();
        assert!(report.is_consistent());
    }
}
