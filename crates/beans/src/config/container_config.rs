use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

use crate::config::validation::{parse_flag, ConfigValidator, IdentifierValidator, LengthValidator};
use crate::config::{ConfigError, ConfigSource};

pub const ENV_NAME: &str = "ELIF_BEANS_NAME";
pub const ENV_ALLOW_CIRCULAR_REFERENCES: &str = "ELIF_BEANS_ALLOW_CIRCULAR_REFERENCES";
pub const ENV_ALLOW_OVERRIDING: &str = "ELIF_BEANS_ALLOW_OVERRIDING";
pub const ENV_DEFAULT_LAZY_INIT: &str = "ELIF_BEANS_DEFAULT_LAZY_INIT";

const DEFAULT_NAME: &str = "application";

/// Container-wide switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Display name used in log output
    pub name: String,
    /// Register raw singletons before injection so circular references resolve
    pub allow_circular_references: bool,
    /// Allow a definition to replace an existing one with the same name
    pub allow_bean_definition_overriding: bool,
    /// Lazy-init value for definitions that don't set one
    pub default_lazy_init: bool,
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            allow_circular_references: true,
            allow_bean_definition_overriding: true,
            default_lazy_init: false,
        }
    }

    /// Configuration that rejects circular references and definition overrides
    pub fn strict() -> Self {
        Self {
            allow_circular_references: false,
            allow_bean_definition_overriding: false,
            ..Self::new()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Load configuration from `ELIF_BEANS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Ok(name) = env::var(ENV_NAME) {
            config.name = name;
        }

        if let Ok(value) = env::var(ENV_ALLOW_CIRCULAR_REFERENCES) {
            config.allow_circular_references = parse_flag("allow_circular_references", &value)?;
        }

        if let Ok(value) = env::var(ENV_ALLOW_OVERRIDING) {
            config.allow_bean_definition_overriding =
                parse_flag("allow_bean_definition_overriding", &value)?;
        }

        if let Ok(value) = env::var(ENV_DEFAULT_LAZY_INIT) {
            config.default_lazy_init = parse_flag("default_lazy_init", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document; missing fields take their defaults
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::missing_required(
                "name",
                format!("Set {} or provide a container name", ENV_NAME),
            ));
        }
        LengthValidator::range(1, 64).validate("name", &self.name)?;
        IdentifierValidator.validate("name", &self.name)?;
        Ok(())
    }

    /// Report which environment variables contributed to the current values
    pub fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let source_of = |var: &str, default: &str| {
            if env::var(var).is_ok() {
                ConfigSource::EnvVar(var.to_string())
            } else {
                ConfigSource::Default(default.to_string())
            }
        };

        let mut sources = HashMap::new();
        sources.insert("name".to_string(), source_of(ENV_NAME, DEFAULT_NAME));
        sources.insert(
            "allow_circular_references".to_string(),
            source_of(ENV_ALLOW_CIRCULAR_REFERENCES, "true"),
        );
        sources.insert(
            "allow_bean_definition_overriding".to_string(),
            source_of(ENV_ALLOW_OVERRIDING, "true"),
        );
        sources.insert(
            "default_lazy_init".to_string(),
            source_of(ENV_DEFAULT_LAZY_INIT, "false"),
        );
        sources
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self::new()
    }
}
