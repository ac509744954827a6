// Metric Extraction
// Pulls the cumulative IPC figure out of simulator stdout

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Label the simulator prints in front of the final IPC figure
pub const IPC_LABEL: &str = "CPU 0 cumulative IPC: ";

static IPC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"CPU 0 cumulative IPC: ([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)")
        .expect("IPC pattern is a valid regex")
});

/// Which report to use when the label appears more than once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionPolicy {
    /// First occurrence in the output
    #[default]
    First,
    /// Last occurrence (the final cumulative report of multi-phase runs)
    Last,
}

/// Scans captured output for the IPC line
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricExtractor {
    policy: ExtractionPolicy,
}

impl MetricExtractor {
    pub fn new(policy: ExtractionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ExtractionPolicy {
        self.policy
    }

    /// Return the IPC figure, or `None` when no usable match exists
    pub fn extract(&self, output: &str) -> Option<f64> {
        let mut values = IPC_LINE
            .captures_iter(output)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str());

        let raw = match self.policy {
            ExtractionPolicy::First => values.next(),
            ExtractionPolicy::Last => values.last(),
        }?;

        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTI_PHASE: &str = r#"
Warmup complete CPU 0 instructions: 10000001 cycles: 4211234
CPU 0 cumulative IPC: 0.8123 instructions: 25000000 cycles: 30776511
Region of interest statistics
CPU 0 cumulative IPC: 1.2345 instructions: 50000000 cycles: 40502237
"#;

    #[test]
    fn test_extract_simple() {
        let extractor = MetricExtractor::default();
        assert_eq!(
            extractor.extract("CPU 0 cumulative IPC: 1.2345"),
            Some(1.2345)
        );
    }

    #[test]
    fn test_overflow_is_absent() {
        let extractor = MetricExtractor::default();
        assert_eq!(extractor.extract("CPU 0 cumulative IPC: 1e999"), None);
    }

    #[test]
    fn test_extract_missing_label() {
        let extractor = MetricExtractor::default();
        assert_eq!(extractor.extract("simulation finished\nno stats\n"), None);
        assert_eq!(extractor.extract(""), None);
    }

    #[test]
    fn test_extract_label_without_number() {
        let extractor = MetricExtractor::default();
        assert_eq!(extractor.extract("CPU 0 cumulative IPC: nan"), None);
    }

    #[test]
    fn test_extract_first_by_default() {
        let extractor = MetricExtractor::default();
        assert_eq!(extractor.policy(), ExtractionPolicy::First);
        assert_eq!(extractor.extract(MULTI_PHASE), Some(0.8123));
    }

    #[test]
    fn test_extract_last() {
        let extractor = MetricExtractor::new(ExtractionPolicy::Last);
        assert_eq!(extractor.extract(MULTI_PHASE), Some(1.2345));
    }

    #[test]
    fn test_extract_integer_and_exponent() {
        let extractor = MetricExtractor::default();
        assert_eq!(extractor.extract("CPU 0 cumulative IPC: 2"), Some(2.0));
        assert_eq!(
            extractor.extract("CPU 0 cumulative IPC: 1.5e-1 trailing"),
            Some(0.15)
        );
    }

    #[test]
    fn test_extract_ignores_other_cpus() {
        let extractor = MetricExtractor::default();
        let output = "CPU 1 cumulative IPC: 9.9\nCPU 0 cumulative IPC: 0.5\n";
        assert_eq!(extractor.extract(output), Some(0.5));
    }

    #[test]
    fn test_policy_serde() {
        let policy: ExtractionPolicy = serde_yaml::from_str("last").unwrap();
        assert_eq!(policy, ExtractionPolicy::Last);
        assert_eq!(serde_json::to_string(&ExtractionPolicy::First).unwrap(), "\"first\"");
    }
}
