use crate::error::ConfigError;
use crate::resolve::{Resolver, RuleSet};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Resolver settings, usually loaded from a JSON file
///
/// ```json
/// { "rule_set": "legacy2018", "deny_moves": true }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub rule_set: RuleSet,
    /// Report every `move` outcome in a batch as a finding
    pub deny_moves: bool,
}

impl ResolverConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&content, &path.display().to_string())?;
        debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|source| ConfigError::Invalid {
            path: origin.to_string(),
            source,
        })
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.rule_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = ResolverConfig::from_json("{}").unwrap();
        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.resolver().rule_set(), RuleSet::Modern);
    }

    #[test]
    fn test_parse_all_fields() {
        let config =
            ResolverConfig::from_json(r#"{"rule_set": "legacy2018", "deny_moves": true}"#).unwrap();
        assert_eq!(config.rule_set, RuleSet::Legacy2018);
        assert!(config.deny_moves);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = ResolverConfig::from_json(r#"{"edition": 2015}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_unknown_rule_set_rejected() {
        assert!(ResolverConfig::from_json(r#"{"rule_set": "nightly"}"#).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"deny_moves": true}}"#).unwrap();
        let config = ResolverConfig::from_file(file.path()).unwrap();
        assert!(config.deny_moves);
        assert_eq!(config.rule_set, RuleSet::Modern);
    }

    #[test]
    fn test_missing_file() {
        let err = ResolverConfig::from_file(Path::new("/nonexistent/iterown.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
