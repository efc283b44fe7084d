//! Emitter configuration.
//!
//! Loaded from a YAML file such as:
//!
//! ```yaml
//! output: messages.ndjson
//! overrides:
//!   SpecFlow_Messages_TestRunStartedTimeOverride: "2020-01-01T00:00:00Z"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cuke_emit_proto::override_keys;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::MapOverrides;

/// Errors from loading configuration or parsing override assignments.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown override key '{0}'")]
    InvalidOverrideKey(String),

    #[error("expected KEY=VALUE, got '{0}'")]
    InvalidAssignment(String),
}

/// File-based settings for the emitter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmitConfig {
    /// Where envelopes are appended; stdout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Override values keyed by override name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, String>,
}

impl EmitConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_yaml(&content)
    }

    /// Parses YAML and rejects unknown override keys.
    pub fn parse_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty file is a valid, empty config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.overrides.keys().find(|key| !override_keys::is_known(key)) {
            Some(key) => Err(ConfigError::InvalidOverrideKey(key.clone())),
            None => Ok(()),
        }
    }

    pub fn override_provider(&self) -> MapOverrides {
        self.overrides.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }
}

/// Parses a `KEY=VALUE` override assignment.
///
/// The value may itself contain `=`; only the first one separates.
pub fn parse_override_assignment(assignment: &str) -> Result<(String, String), ConfigError> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidAssignment(assignment.to_string()))?;
    let key = key.trim();
    if !override_keys::is_known(key) {
        return Err(ConfigError::InvalidOverrideKey(key.to_string()));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuke_emit_proto::OverrideProvider;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
output: out/messages.ndjson
overrides:
  SpecFlow_Messages_TestRunStartedTimeOverride: "2020-01-01T00:00:00+02:00"
  SpecFlow_Messages_TestCaseStartedPickleIdOverride: 0f8fad5b-d9cb-469f-a165-70867728950e
"#;
        let config = EmitConfig::parse_yaml(yaml).unwrap();
        assert_eq!(config.output, Some(PathBuf::from("out/messages.ndjson")));
        assert_eq!(config.overrides.len(), 2);

        let provider = config.override_provider();
        assert_eq!(
            provider.get(override_keys::TEST_RUN_STARTED_TIME).as_deref(),
            Some("2020-01-01T00:00:00+02:00")
        );
        assert_eq!(
            provider.get(override_keys::TEST_CASE_STARTED_PICKLE_ID).as_deref(),
            Some("0f8fad5b-d9cb-469f-a165-70867728950e")
        );
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(EmitConfig::parse_yaml("").unwrap(), EmitConfig::default());
        assert_eq!(EmitConfig::parse_yaml("output: x.ndjson\n").unwrap().overrides.len(), 0);
    }

    #[test]
    fn test_unknown_override_key_rejected() {
        let yaml = "overrides:\n  SpecFlow_Messages_TestRunFinishedTimeOverride: now\n";
        match EmitConfig::parse_yaml(yaml) {
            Err(ConfigError::InvalidOverrideKey(key)) => {
                assert_eq!(key, "SpecFlow_Messages_TestRunFinishedTimeOverride");
            }
            other => panic!("Expected InvalidOverrideKey, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(matches!(
            EmitConfig::parse_yaml("outptu: typo.ndjson\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cuke-emit.yml");
        std::fs::write(&path, "output: events.ndjson\n").unwrap();

        let config = EmitConfig::from_file(&path).unwrap();
        assert_eq!(config.output, Some(PathBuf::from("events.ndjson")));
    }

    #[test]
    fn test_from_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = EmitConfig::from_file(&dir.path().join("missing.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("missing.yml"));
    }

    #[test]
    fn test_parse_override_assignment() {
        let (key, value) = parse_override_assignment(
            "SpecFlow_Messages_TestCaseFinishedTimeOverride=2020-01-01T00:00:00+02:00",
        )
        .unwrap();
        assert_eq!(key, override_keys::TEST_CASE_FINISHED_TIME);
        assert_eq!(value, "2020-01-01T00:00:00+02:00");

        let (_, value) =
            parse_override_assignment("SpecFlow_Messages_TestRunStartedTimeOverride=a=b").unwrap();
        assert_eq!(value, "a=b");
    }

    #[test]
    fn test_parse_override_assignment_errors() {
        assert!(matches!(
            parse_override_assignment("no-equals-sign"),
            Err(ConfigError::InvalidAssignment(_))
        ));
        assert!(matches!(
            parse_override_assignment("PATH=/usr/bin"),
            Err(ConfigError::InvalidOverrideKey(_))
        ));
    }
}
