pub mod container_config;
pub mod sources;
pub mod validation;

pub use container_config::ContainerConfig;
pub use sources::ConfigSource;
pub use validation::ConfigError;
