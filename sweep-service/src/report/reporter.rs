// Result Reporter
// Renders a result table as fixed-width text, JSON or Markdown

use crate::error::ServiceResult;
use crate::report::table::ResultTable;

use std::fmt;

/// Marker printed for a cell without a metric
pub const ABSENT_MARKER: &str = "N/A";

/// Output format for result reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Fixed-width console table
    #[default]
    Table,
    /// Pretty-printed JSON, same shape as the saved record
    Json,
    /// GitHub-flavoured Markdown table
    Markdown,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Table => write!(f, "table"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" | "terminal" => Ok(ReportFormat::Table),
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            _ => Err(format!(
                "Unknown report format '{}'. Valid formats: table, json, markdown",
                s
            )),
        }
    }
}

/// Column widths of the fixed-width table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub trace_width: usize,
    pub column_width: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            trace_width: 40,
            column_width: 20,
        }
    }
}

/// Formats a cell: four decimals, or the absent marker
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => ABSENT_MARKER.to_string(),
    }
}

/// Result reporter that generates output in various formats
pub struct ResultReporter;

impl ResultReporter {
    /// Generate a report in the specified format
    pub fn report(table: &ResultTable, format: ReportFormat) -> ServiceResult<String> {
        match format {
            ReportFormat::Table => Ok(Self::to_table(table, TableLayout::default())),
            ReportFormat::Json => Self::to_json(table),
            ReportFormat::Markdown => Ok(Self::to_markdown(table)),
        }
    }

    /// Fixed-width table: header, dashed rule, one line per trace.
    ///
    /// Cells are left-justified and padded, never truncated.
    pub fn to_table(table: &ResultTable, layout: TableLayout) -> String {
        let mut header = format!("{:<width$}", "Trace", width = layout.trace_width);
        for configuration in table.configurations() {
            header.push_str(&format!(
                "{:<width$}",
                configuration,
                width = layout.column_width
            ));
        }

        let mut out = String::new();
        out.push_str(&header);
        out.push('\n');
        out.push_str(&"-".repeat(header.chars().count()));
        out.push('\n');

        for (trace, cells) in table.rows() {
            out.push_str(&format!("{:<width$}", trace, width = layout.trace_width));
            for cell in cells {
                out.push_str(&format!(
                    "{:<width$}",
                    format_metric(cell),
                    width = layout.column_width
                ));
            }
            out.push('\n');
        }

        out
    }

    /// Indented JSON, identical to what [`ResultTable::save`] writes
    pub fn to_json(table: &ResultTable) -> ServiceResult<String> {
        Ok(serde_json::to_string_pretty(table)?)
    }

    /// Markdown table
    pub fn to_markdown(table: &ResultTable) -> String {
        let mut out = String::from("| Trace |");
        for configuration in table.configurations() {
            out.push_str(&format!(" {} |", markdown_escape(configuration)));
        }
        out.push('\n');

        out.push_str("|---|");
        for _ in table.configurations() {
            out.push_str("---:|");
        }
        out.push('\n');

        for (trace, cells) in table.rows() {
            out.push_str(&format!("| {} |", markdown_escape(trace)));
            for cell in cells {
                out.push_str(&format!(" {} |", format_metric(cell)));
            }
            out.push('\n');
        }

        out
    }
}

fn markdown_escape(s: &str) -> String {
    s.replace('|', "\\|")
}
