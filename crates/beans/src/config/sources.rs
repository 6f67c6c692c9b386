use std::fmt;

/// Where a container setting came from, as reported by `ContainerConfig::config_sources`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from the named `ELIF_BEANS_*` variable
    EnvVar(String),
    /// Built-in default, rendered as text
    Default(String),
}

impl ConfigSource {
    pub fn is_env_var(&self) -> bool {
        matches!(self, ConfigSource::EnvVar(_))
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ConfigSource::Default(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::EnvVar(var) => write!(f, "environment variable {}", var),
            ConfigSource::Default(value) => write!(f, "default ({})", value),
        }
    }
}
