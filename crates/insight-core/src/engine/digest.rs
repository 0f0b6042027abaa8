//! Built-in digest engine
//!
//! Checks that every data source is present and readable, counts its records,
//! and renders a Markdown digest of the brief. `deep` mode also lists the
//! fields seen in each source's records.

use super::AnalysisEngine;
use crate::error::EngineError;
use crate::paths::resolve;
use crate::types::Memory;
use async_trait::async_trait;
use insight_brief::{Brief, DataSources, UNKNOWN};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Supported analysis depths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisMode {
    Quick,
    Deep,
}

impl AnalysisMode {
    /// Parse a brief's mode
    ///
    /// # Errors
    /// `EngineError::InvalidBrief` for anything but `quick` or `deep`.
    pub fn parse(mode: &str) -> Result<Self, EngineError> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "deep" => Ok(Self::Deep),
            other => Err(EngineError::InvalidBrief(format!(
                "Unsupported mode '{other}'; expected 'quick' or 'deep'"
            ))),
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Quick => "Quick",
            Self::Deep => "Deep",
        }
    }
}

/// Reference engine shipped with the gateway
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestEngine;

impl DigestEngine {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnalysisEngine for DigestEngine {
    async fn run_analysis(
        &self,
        brief: &Brief,
        memory: &Memory,
        root_dir: &Path,
    ) -> Result<String, EngineError> {
        let mode = AnalysisMode::parse(&brief.mode().unwrap_or_default())?;
        let sources = brief
            .data_sources()
            .filter(|sources| !sources.is_empty())
            .ok_or_else(|| EngineError::InvalidBrief("Brief names no data sources".to_string()))?;
        let prior_runs = memory
            .get("runs")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);

        let header = DigestHeader::from_brief(brief, mode);
        let root = root_dir.to_path_buf();

        tokio::task::spawn_blocking(move || -> Result<String, EngineError> {
            let summaries = summarize_sources(&sources, &root, mode)?;
            Ok(render(&header, &summaries, prior_runs))
        })
        .await
        .map_err(|e| EngineError::Failed(format!("analysis task aborted: {e}")))?
    }
}

struct DigestHeader {
    mode: AnalysisMode,
    business_goal: String,
    subject: String,
    scope_type: String,
    marketplaces: String,
    region: String,
    timeframe: String,
}

impl DigestHeader {
    fn from_brief(brief: &Brief, mode: AnalysisMode) -> Self {
        let empty = Map::new();
        let scope = brief.scope().unwrap_or(&empty);
        let text = |key: &str| {
            scope
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN)
                .to_string()
        };
        let marketplaces = scope
            .get("marketplaces")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .filter(|joined| !joined.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        Self {
            mode,
            business_goal: brief.business_goal().unwrap_or_default(),
            subject: text("category_or_product"),
            scope_type: text("scope_type"),
            marketplaces,
            region: text("region"),
            timeframe: text("timeframe"),
        }
    }
}

struct SourceSummary {
    name: String,
    path: PathBuf,
    records: usize,
    fields: BTreeSet<String>,
}

fn summarize_sources(
    sources: &DataSources,
    root: &Path,
    mode: AnalysisMode,
) -> Result<Vec<SourceSummary>, EngineError> {
    sources
        .iter()
        .map(|(name, entry)| {
            let relative = entry.path().ok_or_else(|| {
                EngineError::InvalidBrief(format!("Data source '{name}' has no path"))
            })?;
            let path = resolve(relative, root);
            if !path.is_file() {
                return Err(EngineError::SourceNotFound(format!(
                    "Data source '{name}' not found: {}",
                    path.display()
                )));
            }

            let raw = std::fs::read(&path)
                .map_err(|e| EngineError::Failed(format!("reading {}: {e}", path.display())))?;
            let value: Value = serde_json::from_slice(&raw).map_err(|e| {
                EngineError::InvalidBrief(format!("Data source '{name}' is not valid JSON: {e}"))
            })?;

            let (records, fields) = inspect(&value, mode);
            Ok(SourceSummary {
                name: name.to_string(),
                path,
                records,
                fields,
            })
        })
        .collect()
}

fn inspect(value: &Value, mode: AnalysisMode) -> (usize, BTreeSet<String>) {
    let records: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    };

    let fields = match mode {
        AnalysisMode::Quick => BTreeSet::new(),
        AnalysisMode::Deep => records
            .iter()
            .filter_map(|record| record.as_object())
            .flat_map(|record| record.keys().cloned())
            .collect(),
    };

    (records.len(), fields)
}

fn render(header: &DigestHeader, sources: &[SourceSummary], prior_runs: usize) -> String {
    let mut lines = vec![
        format!("# {} Analysis: {}", header.mode.title(), header.subject),
        String::new(),
        format!("**Business goal:** {}", header.business_goal),
        String::new(),
        "## Scope".to_string(),
        format!("- Type: {}", header.scope_type),
        format!("- Marketplaces: {}", header.marketplaces),
        format!("- Region: {}", header.region),
        format!("- Timeframe: {}", header.timeframe),
        String::new(),
        "## Sources".to_string(),
    ];
    for source in sources {
        lines.push(format!(
            "- {}: {} record(s) ({})",
            source.name,
            source.records,
            source.path.display()
        ));
        if !source.fields.is_empty() {
            let fields: Vec<_> = source.fields.iter().map(String::as_str).collect();
            lines.push(format!("  - fields: {}", fields.join(", ")));
        }
    }
    lines.push(String::new());
    lines.push("## Memory".to_string());
    lines.push(format!("{prior_runs} prior run(s) on record."));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn brief(value: Value) -> Brief {
        serde_json::from_value::<Brief>(value).unwrap().normalized()
    }

    fn write(dir: &Path, name: &str, value: &Value) {
        std::fs::write(dir.join(name), serde_json::to_vec(value).unwrap()).unwrap();
    }

    #[test]
    fn mode_parsing() {
        assert_eq!(AnalysisMode::parse("Quick").unwrap(), AnalysisMode::Quick);
        assert_eq!(AnalysisMode::parse(" deep ").unwrap(), AnalysisMode::Deep);
        assert!(matches!(
            AnalysisMode::parse("exhaustive"),
            Err(EngineError::InvalidBrief(_))
        ));
    }

    #[tokio::test]
    async fn digest_counts_records() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "catalog.json", &json!([{"sku": "A"}, {"sku": "B"}]));
        write(dir.path(), "reviews.json", &json!([{"stars": 5, "text": "ok"}]));

        let b = brief(json!({
            "mode": "deep",
            "business_goal": "grow",
            "scope": "wireless earbuds",
            "marketplaces": ["Amazon"],
            "data_sources": ["catalog.json", "reviews.json"],
        }));
        let memory = Memory::new(json!({"runs": [{}, {}]}).as_object().cloned().unwrap());

        let report = DigestEngine::new()
            .run_analysis(&b, &memory, dir.path())
            .await
            .unwrap();

        assert!(report.starts_with("# Deep Analysis: wireless earbuds"));
        assert!(report.contains("- catalog: 2 record(s)"));
        assert!(report.contains("- reviews: 1 record(s)"));
        assert!(report.contains("fields: stars, text"));
        assert!(report.contains("- Marketplaces: Amazon"));
        assert!(report.contains("2 prior run(s) on record."));
    }

    #[tokio::test]
    async fn missing_source_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let b = brief(json!({
            "mode": "quick",
            "business_goal": "grow",
            "data_sources": {"catalog": "catalog.json"},
        }));

        let err = DigestEngine::new()
            .run_analysis(&b, &Memory::default(), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::SourceNotFound(ref msg) if msg.contains("catalog")));
    }

    #[tokio::test]
    async fn unsupported_mode_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let b = brief(json!({"mode": "slow", "business_goal": "grow", "data_sources": ["c.json"]}));

        let err = DigestEngine::new()
            .run_analysis(&b, &Memory::default(), dir.path())
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn empty_sources_are_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let b = brief(json!({"mode": "quick", "business_goal": "grow"}));

        let err = DigestEngine::new()
            .run_analysis(&b, &Memory::default(), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidBrief(_)));
    }

    #[tokio::test]
    async fn malformed_source_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("catalog.json"), "nope").unwrap();
        let b = brief(json!({"mode": "quick", "business_goal": "grow", "data_sources": ["catalog.json"]}));

        let err = DigestEngine::new()
            .run_analysis(&b, &Memory::default(), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidBrief(ref msg) if msg.contains("not valid JSON")));
    }

    #[test]
    fn report_layout() {
        let header = DigestHeader {
            mode: AnalysisMode::Deep,
            business_goal: "grow".to_string(),
            subject: "earbuds".to_string(),
            scope_type: "Category".to_string(),
            marketplaces: "Amazon, Flipkart".to_string(),
            region: "India".to_string(),
            timeframe: "Q3".to_string(),
        };
        let sources = [SourceSummary {
            name: "catalog".to_string(),
            path: PathBuf::from("/data/catalog.json"),
            records: 3,
            fields: ["price", "sku"].into_iter().map(String::from).collect(),
        }];

        let expected = "\
# Deep Analysis: earbuds

**Business goal:** grow

## Scope
- Type: Category
- Marketplaces: Amazon, Flipkart
- Region: India
- Timeframe: Q3

## Sources
- catalog: 3 record(s) (/data/catalog.json)
  - fields: price, sku

## Memory
0 prior run(s) on record.
";
        assert_eq!(render(&header, &sources, 0), expected);
    }
}
