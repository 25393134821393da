use std::path::Path;

use tracing::{debug, info};
use crate::image_pipeline::common::error::{CorrectionError, Result};

/// Named numeric parameters parsed from `name=value` text.
///
/// Entries keep file order. Duplicate names are all retained and lookups
/// resolve to the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    entries: Vec<(String, f64)>,
}

impl ConfigStore {
    /// Parses config text.
    ///
    /// All whitespace is stripped from each line before it is interpreted.
    /// Blank lines and lines starting with `#` are skipped. A line without
    /// `=`, with an empty name or value, or whose value is not a finite float
    /// is a `ConfigParse` error carrying its 1-based line number.
    pub fn parse(source: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (idx, raw) in source.lines().enumerate() {
            let line: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_no = idx + 1;
            let parse_error = |reason: String| CorrectionError::ConfigParse { line: line_no, reason };

            let (name, value) = line
                .split_once('=')
                .ok_or_else(|| parse_error(format!("expected name=value, got '{}'", line)))?;
            if name.is_empty() {
                return Err(parse_error("missing parameter name".to_string()));
            }
            if value.is_empty() {
                return Err(parse_error(format!("missing value for '{}'", name)));
            }
            let value: f64 = value
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite())
                .ok_or_else(|| parse_error(format!("value '{}' for '{}' is not a finite number", value, name)))?;
            debug!(name, value, "config parameter");
            entries.push((name.to_string(), value));
        }
        Ok(Self { entries })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Reading config file");
        let text = std::fs::read_to_string(path)
            .map_err(|e| CorrectionError::InputRead(format!("{}: {}", path.display(), e)))?;
        let store = Self::parse(&text)?;
        info!(parameters = store.len(), "Config loaded");
        Ok(store)
    }

    /// Value of the first entry called `name`.
    pub fn lookup(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|(n, _)| n == name).map(|&(_, v)| v)
    }

    /// Like [`lookup`](Self::lookup) but an absent name reads as `0.0`.
    pub fn get(&self, name: &str) -> f64 {
        self.lookup(name).unwrap_or(0.0)
    }

    pub fn require(&self, name: &str) -> Result<f64> {
        self.lookup(name)
            .ok_or_else(|| CorrectionError::MissingParameter(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
