//! Compiler configuration, loaded from YAML
//!
//! Every field has a default, so a partial file (or no file at all) is valid.

use crate::graph::ConceptId;
use crate::store::PatternId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// SNOMED CT "Role group (attribute)"
pub const DEFAULT_ROLE_GROUP_MARKER: ConceptId = ConceptId::new(609_096_000);

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The concept ids the walker treats specially
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    /// Role type whose ROLE vertices open a role group
    pub role_group_marker: ConceptId,
    /// The only supported ROLE operator
    pub existential_operator: ConceptId,
}

impl Default for Vocabulary {
    fn default() -> Self {
        CompilerConfig::default().vocabulary()
    }
}

/// Configuration for batch and incremental compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub role_group_marker: ConceptId,
    pub existential_operator: ConceptId,
    /// Pattern whose semantics hold the stated definitions
    pub stated_axiom_pattern: PatternId,
    /// Report progress every this many processed semantics
    pub progress_interval: usize,
    /// Compile semantics in parallel during batch runs
    pub parallel: bool,
    /// Fail a batch run if an active concept ends with no definitions
    pub strict_definitions: bool,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            role_group_marker: DEFAULT_ROLE_GROUP_MARKER,
            existential_operator: ConceptId::new(1),
            stated_axiom_pattern: PatternId::new(1),
            progress_interval: 100,
            parallel: true,
            strict_definitions: false,
            log_level: "info".to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary {
            role_group_marker: self.role_group_marker,
            existential_operator: self.existential_operator,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_strict_definitions(mut self, strict: bool) -> Self {
        self.strict_definitions = strict;
        self
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Load `path` if given, else the default location if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/taxon/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taxon").join("config.yaml"))
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.progress_interval == 0 {
            return Err(ConfigError::Invalid(
                "progress_interval must be greater than zero".to_string(),
            ));
        }
        if self.role_group_marker == self.existential_operator {
            return Err(ConfigError::Invalid(format!(
                "role_group_marker and existential_operator are both {}",
                self.role_group_marker
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = CompilerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.progress_interval, 100);
        assert!(config.parallel);
        assert!(!config.strict_definitions);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = CompilerConfig::from_yaml("parallel: false\nexistential_operator: 55\n").unwrap();
        assert!(!config.parallel);
        assert_eq!(config.existential_operator, ConceptId::new(55));
        assert_eq!(config.role_group_marker, DEFAULT_ROLE_GROUP_MARKER);
    }

    #[test]
    fn zero_progress_interval_is_invalid() {
        let err = CompilerConfig::from_yaml("progress_interval: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn clashing_marker_and_operator_is_invalid() {
        let err = CompilerConfig::from_yaml("role_group_marker: 5\nexistential_operator: 5").unwrap_err();
        assert!(err.to_string().contains("both 5"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "stated_axiom_pattern: 77\nstrict_definitions: true").unwrap();

        let config = CompilerConfig::load(file.path()).unwrap();
        assert_eq!(config.stated_axiom_pattern, PatternId::new(77));
        assert!(config.strict_definitions);
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = CompilerConfig::load_or_default(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
