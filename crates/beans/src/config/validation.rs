use thiserror::Error;

/// Errors raised while loading or validating a container configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired { field: String, hint: String },

    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Create a missing required field error
    pub fn missing_required(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingRequired {
            field: field.into(),
            hint: hint.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }
}

/// Trait for validating configuration values
pub trait ConfigValidator<T: ?Sized> {
    /// Validate a configuration value
    fn validate(&self, field: &str, value: &T) -> Result<(), ConfigError>;
}

/// String length validator
pub struct LengthValidator {
    pub min_length: usize,
    pub max_length: Option<usize>,
}

impl LengthValidator {
    pub fn range(min_length: usize, max_length: usize) -> Self {
        Self {
            min_length,
            max_length: Some(max_length),
        }
    }
}

impl ConfigValidator<str> for LengthValidator {
    fn validate(&self, field: &str, value: &str) -> Result<(), ConfigError> {
        if value.len() < self.min_length {
            return Err(ConfigError::invalid_value(
                field,
                value,
                format!("string with at least {} characters", self.min_length),
            ));
        }

        if let Some(max_length) = self.max_length {
            if value.len() > max_length {
                return Err(ConfigError::invalid_value(
                    field,
                    value,
                    format!("string with at most {} characters", max_length),
                ));
            }
        }

        Ok(())
    }
}

/// Rejects identifiers containing whitespace or control characters
pub struct IdentifierValidator;

impl ConfigValidator<str> for IdentifierValidator {
    fn validate(&self, field: &str, value: &str) -> Result<(), ConfigError> {
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ConfigError::invalid_value(
                field,
                value,
                "identifier without whitespace",
            ));
        }
        Ok(())
    }
}

/// Parse a boolean flag the way env-based configuration spells it
pub fn parse_flag(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::invalid_value(
            field,
            value,
            "true/false, yes/no, on/off or 1/0",
        )),
    }
}
