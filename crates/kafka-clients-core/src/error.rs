//! Domain error types for the Kafka client configuration resolver.
//!
//! Uses `thiserror` for ergonomic error definitions with proper context.

use thiserror::Error;

use crate::config::SecurityProtocol;

/// Errors related to configuration parsing and validation.
///
/// Every variant is fatal at startup: a misconfiguration cannot be fixed by retrying.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The security protocol is known to Kafka but has no builder family.
    #[error("unsupported security protocol {protocol}: only {supported} security protocols are supported")]
    UnsupportedSecurityProtocol {
        protocol: SecurityProtocol,
        supported: String,
    },

    /// The security protocol token is not a Kafka security protocol at all.
    #[error("unknown security protocol '{value}': expected one of {supported}")]
    UnknownSecurityProtocol { value: String, supported: String },

    /// A field required by the selected security protocol is absent.
    #[error("{field} is required when security-protocol is {protocol}")]
    MissingRequiredField {
        field: &'static str,
        protocol: SecurityProtocol,
    },

    /// A store password was configured without the store it unlocks.
    #[error("{password_field} is set but {location_field} is not")]
    PasswordWithoutLocation {
        password_field: &'static str,
        location_field: &'static str,
    },

    /// A configured TLS store file does not exist.
    #[error("{field} '{path}' does not exist")]
    StoreNotFound { field: &'static str, path: String },

    /// No broker nodes were configured.
    #[error("at least one Kafka node must be configured")]
    NoNodes,

    /// Invalid address format.
    #[error("invalid address format: {0} (expected 'host:port')")]
    InvalidAddress(String),

    /// A numeric property could not be parsed.
    #[error("invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    /// A `kafka.` property that this resolver does not recognize.
    #[error("unknown configuration property: {0}")]
    UnknownProperty(String),

    /// A properties line without a `=` or `:` separator.
    #[error("malformed property on line {line}: '{content}'")]
    MalformedProperty { line: usize, content: String },

    /// A resolved property has no librdkafka equivalent.
    #[error("{key} cannot be handed to librdkafka: {reason}")]
    Untranslatable { key: &'static str, reason: &'static str },

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Errors surfaced while wiring client configuration builders.
#[derive(Error, Debug)]
pub enum ClientsError {
    /// Operator-facing configuration problem.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A validated security protocol matched no builder family.
    ///
    /// This indicates a logic defect, never a user error.
    #[error("invariant violation: no client builder family matches validated security protocol {protocol}")]
    InvariantViolation { protocol: SecurityProtocol },
}

/// Result type alias for wiring operations.
pub type Result<T> = std::result::Result<T, ClientsError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
