// Trace Discovery
// Finds workload trace files in the configured directories

use std::path::{Path, PathBuf};

use glob::{glob, Pattern};

/// Enumerates trace files by directory and file suffix
#[derive(Debug, Clone)]
pub struct TraceDiscovery {
    dirs: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl TraceDiscovery {
    /// Create a discovery over `dirs`, matching any of `extensions`.
    ///
    /// Extensions may be written as `gz`, `.gz` or `*.gz`.
    pub fn new<D, E>(dirs: D, extensions: E) -> Self
    where
        D: IntoIterator,
        D::Item: Into<PathBuf>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
            extensions: extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Return every matching regular file, sorted by path.
    ///
    /// Missing directories contribute nothing; the sweep goes on with
    /// whatever was found elsewhere.
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut traces = Vec::new();

        for dir in &self.dirs {
            if !dir.is_dir() {
                tracing::warn!(dir = %dir.display(), "trace directory not found, skipping");
                continue;
            }

            let found_before = traces.len();
            for ext in &self.extensions {
                traces.extend(self.match_in(dir, ext));
            }

            if traces.len() == found_before {
                tracing::warn!(dir = %dir.display(), "no traces found in directory");
            }
        }

        traces.sort();
        traces.dedup();
        traces
    }

    fn match_in(&self, dir: &Path, ext: &str) -> Vec<PathBuf> {
        let pattern = format!(
            "{}/*.{}",
            Pattern::escape(&dir.to_string_lossy()),
            Pattern::escape(ext)
        );

        let entries = match glob(&pattern) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(%pattern, error = %e, "invalid trace pattern");
                return Vec::new();
            }
        };

        entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(error = %e, "unreadable trace entry");
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect()
    }
}

/// Strip glob and dot prefixes: `*.gz` and `.gz` both become `gz`
fn normalize_extension(ext: &str) -> String {
    ext.trim()
        .trim_start_matches('*')
        .trim_start_matches('.')
        .to_string()
}

/// Name shown in the report for a trace: its final path component
pub fn trace_display_name(trace: &Path) -> String {
    trace
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| trace.to_string_lossy().into_owned())
}
