// Result Table
// Trace x configuration matrix of metrics, plus its JSON persistence

use crate::error::{ServiceError, ServiceResult};
use crate::execution::models::JobOutcome;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

type Row = BTreeMap<String, Option<f64>>;

/// Final metrics of a sweep, keyed by trace name then configuration id.
///
/// Rows are ordered by trace name and columns follow the configured order.
/// Every (trace, configuration) pair of the sweep has a cell; `None` marks a
/// job that produced no metric.
///
/// Serializes as a nested JSON object:
///
/// ```json
/// {
///   "t1.gz": { "cfgA": 1.0, "cfgB": null }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    configurations: Vec<String>,
    rows: BTreeMap<String, Row>,
}

impl ResultTable {
    /// Fold outcomes into a table.
    ///
    /// Every pair of `configurations` x `trace_names` is seeded as absent
    /// first, so a lost outcome still leaves a cell. Outcomes are merged by
    /// key, so their order does not matter. Two traces with the same file
    /// name in different directories share a row; the later outcome wins.
    pub fn aggregate(
        outcomes: &[JobOutcome],
        configurations: &[String],
        trace_names: &[String],
    ) -> Self {
        let mut table = Self {
            configurations: configurations.to_vec(),
            rows: BTreeMap::new(),
        };

        for trace in trace_names {
            let row = table.rows.entry(trace.clone()).or_default();
            for configuration in configurations {
                row.insert(configuration.clone(), None);
            }
        }

        for outcome in outcomes {
            table.insert(
                outcome.job.trace_name(),
                &outcome.job.configuration,
                outcome.value(),
            );
        }

        table
    }

    fn insert(&mut self, trace: String, configuration: &str, value: Option<f64>) {
        if !self.configurations.iter().any(|c| c == configuration) {
            tracing::debug!(configuration, "outcome for unlisted configuration, adding column");
            self.configurations.push(configuration.to_string());
        }
        self.rows
            .entry(trace)
            .or_default()
            .insert(configuration.to_string(), value);
    }

    /// Column order
    pub fn configurations(&self) -> &[String] {
        &self.configurations
    }

    /// Row order
    pub fn trace_names(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Cells of each row, in column order
    pub fn rows(&self) -> impl Iterator<Item = (&str, Vec<Option<f64>>)> {
        self.rows.iter().map(move |(trace, row)| {
            let cells = self
                .configurations
                .iter()
                .map(|c| row.get(c).copied().flatten())
                .collect();
            (trace.as_str(), cells)
        })
    }

    /// `None` if the pair is not in the table, `Some(None)` if the metric is absent
    pub fn get(&self, trace: &str, configuration: &str) -> Option<Option<f64>> {
        self.rows.get(trace)?.get(configuration).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of cells holding a metric
    pub fn present_count(&self) -> usize {
        self.rows
            .values()
            .flat_map(|row| row.values())
            .filter(|v| v.is_some())
            .count()
    }

    /// Number of cells without a metric
    pub fn absent_count(&self) -> usize {
        self.rows
            .values()
            .flat_map(|row| row.values())
            .filter(|v| v.is_none())
            .count()
    }

    /// Write the table as indented JSON, replacing any existing file
    pub fn save(&self, path: impl AsRef<Path>) -> ServiceResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ServiceError::ReportWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a table written by [`ResultTable::save`]
    pub fn load(path: impl AsRef<Path>) -> ServiceResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ServiceError::ReportRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ServiceError::ReportParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

struct OrderedRow<'a> {
    configurations: &'a [String],
    row: &'a Row,
}

impl Serialize for OrderedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.row.len()))?;
        for configuration in self.configurations {
            if let Some(value) = self.row.get(configuration) {
                map.serialize_entry(configuration, value)?;
            }
        }
        map.end()
    }
}

impl Serialize for ResultTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (trace, row) in &self.rows {
            map.serialize_entry(
                trace,
                &OrderedRow {
                    configurations: &self.configurations,
                    row,
                },
            )?;
        }
        map.end()
    }
}

/// A row as it appears in the file, keeping key order
struct RowEntries(Vec<(String, Option<f64>)>);

impl<'de> Deserialize<'de> for RowEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = RowEntries;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a mapping of configuration id to number or null")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<RowEntries, M::Error> {
                let mut entries = Vec::new();
                while let Some((configuration, value)) = map.next_entry::<String, Option<f64>>()? {
                    entries.push((configuration, value));
                }
                Ok(RowEntries(entries))
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

impl<'de> Deserialize<'de> for ResultTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = ResultTable;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a mapping of trace name to configuration results")
            }

            // Column order is the order configurations first appear in the file
            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<ResultTable, M::Error> {
                let mut table = ResultTable::default();
                while let Some((trace, RowEntries(entries))) =
                    map.next_entry::<String, RowEntries>()?
                {
                    if table.rows.contains_key(&trace) {
                        return Err(de::Error::custom(format!("duplicate trace '{}'", trace)));
                    }
                    table.rows.insert(trace.clone(), Row::new());
                    for (configuration, value) in entries {
                        table.insert(trace.clone(), &configuration, value);
                    }
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::execution::models::{AbsenceReason, Job};
    use std::time::Duration;

    fn outcome(config: &str, trace: &str, metric: Option<f64>) -> JobOutcome {
        JobOutcome::new(
            Job::new(config, trace),
            metric.ok_or(AbsenceReason::MetricNotFound),
            Duration::ZERO,
        )
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> ResultTable {
        let outcomes = vec![
            outcome("cfgB", "traces/t2.gz", None),
            outcome("cfgA", "traces/t1.gz", Some(1.0)),
            outcome("cfgB", "traces/t1.gz", None),
            outcome("cfgA", "traces/t2.gz", Some(1.0)),
        ];
        ResultTable::aggregate(
            &outcomes,
            &strings(&["cfgA", "cfgB"]),
            &strings(&["t1.gz", "t2.gz"]),
        )
    }

    #[test]
    fn test_aggregate_complete() {
        let table = sample();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("t1.gz", "cfgA"), Some(Some(1.0)));
        assert_eq!(table.get("t1.gz", "cfgB"), Some(None));
        assert_eq!(table.get("t2.gz", "cfgA"), Some(Some(1.0)));
        assert_eq!(table.get("t2.gz", "cfgB"), Some(None));
        assert_eq!(table.get("t3.gz", "cfgA"), None);
        assert_eq!(table.present_count(), 2);
        assert_eq!(table.absent_count(), 2);
    }

    #[test]
    fn test_aggregate_missing_outcome_still_has_cell() {
        let outcomes = vec![outcome("cfgA", "t1.gz", Some(0.5))];
        let table = ResultTable::aggregate(
            &outcomes,
            &strings(&["cfgA", "cfgB"]),
            &strings(&["t1.gz", "t2.gz"]),
        );

        for trace in ["t1.gz", "t2.gz"] {
            for config in ["cfgA", "cfgB"] {
                assert!(table.get(trace, config).is_some());
            }
        }
        assert_eq!(table.get("t2.gz", "cfgB"), Some(None));
    }

    #[test]
    fn test_aggregate_order_independent() {
        let mut outcomes = vec![
            outcome("a", "x/t1.gz", Some(0.1)),
            outcome("a", "x/t2.gz", None),
            outcome("b", "x/t1.gz", Some(0.3)),
            outcome("b", "x/t2.gz", Some(0.4)),
        ];
        let configs = strings(&["a", "b"]);
        let traces = strings(&["t1.gz", "t2.gz"]);

        let forward = ResultTable::aggregate(&outcomes, &configs, &traces);
        outcomes.reverse();
        let backward = ResultTable::aggregate(&outcomes, &configs, &traces);
        outcomes.swap(0, 2);
        let shuffled = ResultTable::aggregate(&outcomes, &configs, &traces);

        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_rows_follow_column_order() {
        let outcomes = vec![
            outcome("z-last", "t1.gz", Some(2.0)),
            outcome("a-first", "t1.gz", Some(1.0)),
        ];
        let table = ResultTable::aggregate(
            &outcomes,
            &strings(&["z-last", "a-first"]),
            &strings(&["t1.gz"]),
        );

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows, vec![("t1.gz", vec![Some(2.0), Some(1.0)])]);
    }

    #[test]
    fn test_rows_sorted_by_name() {
        let table = ResultTable::aggregate(
            &[],
            &strings(&["a"]),
            &strings(&["mcf.xz", "bfs.gz", "cc.gz"]),
        );

        let names: Vec<_> = table.trace_names().collect();
        assert_eq!(names, vec!["bfs.gz", "cc.gz", "mcf.xz"]);
    }

    #[test]
    fn test_display_name_collision_overwrites() {
        let outcomes = vec![
            outcome("a", "GAP/same.gz", Some(1.0)),
            outcome("a", "charlie/same.gz", Some(2.0)),
        ];
        let table = ResultTable::aggregate(&outcomes, &strings(&["a"]), &strings(&["same.gz"]));

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("same.gz", "a"), Some(Some(2.0)));
    }

    #[test]
    fn test_empty_sweep() {
        let table = ResultTable::aggregate(&[], &[], &[]);
        assert!(table.is_empty());
        assert_eq!(serde_json::to_string(&table).unwrap(), "{}");
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string_pretty(&sample()).unwrap();

        let expected = r#"{
  "t1.gz": {
    "cfgA": 1.0,
    "cfgB": null
  },
  "t2.gz": {
    "cfgA": 1.0,
    "cfgB": null
  }
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_json_keeps_column_order() {
        let table = ResultTable::aggregate(
            &[],
            &strings(&["zeta", "alpha"]),
            &strings(&["t1.gz"]),
        );

        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"t1.gz":{"zeta":null,"alpha":null}}"#);

        let back: ResultTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.configurations(), &["zeta".to_string(), "alpha".to_string()]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab_results.json");
        fs::write(&path, "stale contents").unwrap();

        let table = sample();
        table.save(&path).unwrap();
        let loaded = ResultTable::load(&path).unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn test_load_rejects_wrong_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"t1.gz": {"cfgA": "fast"}}"#).unwrap();

        let err = ResultTable::load(&path).unwrap_err();
        assert!(matches!(err, ServiceError::ReportParse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ResultTable::load("/nonexistent/lab_results.json").unwrap_err();
        assert!(matches!(err, ServiceError::ReportRead { .. }));
    }
}
