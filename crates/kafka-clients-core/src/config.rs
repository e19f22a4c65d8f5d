//! Configuration types for the Kafka client configuration resolver.
//!
//! Configuration is loaded from YAML files (or flat catalog properties) and
//! validated before any client builder is constructed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::properties::MASK;

/// Root configuration for the resolver.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ClientsConfig {
    /// Broker connectivity shared by every client role.
    pub kafka: KafkaConfig,

    /// Declared transport security.
    #[serde(default)]
    pub security: KafkaSecurityConfig,

    /// TLS stores, used by the SSL family and the schema registry family.
    #[serde(default)]
    pub ssl: KafkaSslConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Kafka cluster connection parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct KafkaConfig {
    /// Broker addresses in `host:port` form.
    pub nodes: Vec<String>,

    /// Producer acknowledgment level: `all`, `-1`, `0` or `1`.
    #[serde(default = "default_acks")]
    pub acks: String,

    /// Producer compression codec.
    #[serde(default = "default_compression_type")]
    pub compression_type: String,

    /// Consumer socket receive buffer in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: u64,

    /// Prefix for the per-session `client.id`.
    ///
    /// When unset, the session identifier is used on its own.
    #[serde(default)]
    pub client_id_prefix: Option<String>,
}

/// Security protocol for Kafka connections.
///
/// All four protocols known to Kafka parse; only [`SecurityProtocol::SUPPORTED`]
/// pass [`KafkaSecurityConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum SecurityProtocol {
    /// Plain TCP without encryption or authentication.
    #[default]
    Plaintext,
    /// TLS encryption without SASL authentication.
    Ssl,
    /// SASL authentication without TLS encryption.
    SaslPlaintext,
    /// TLS encryption with SASL authentication.
    SaslSsl,
}

impl SecurityProtocol {
    /// Protocols that have a client builder family.
    pub const SUPPORTED: [Self; 3] = [Self::Plaintext, Self::Ssl, Self::SaslPlaintext];

    const ALL: [Self; 4] = [Self::Plaintext, Self::Ssl, Self::SaslPlaintext, Self::SaslSsl];

    /// The Kafka protocol name, as used for `security.protocol`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plaintext => "PLAINTEXT",
            Self::Ssl => "SSL",
            Self::SaslPlaintext => "SASL_PLAINTEXT",
            Self::SaslSsl => "SASL_SSL",
        }
    }

    /// Check if a builder family exists for this protocol.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        Self::SUPPORTED.contains(self)
    }

    /// Check if TLS is required for this protocol.
    #[must_use]
    pub fn requires_tls(&self) -> bool {
        matches!(self, Self::Ssl | Self::SaslSsl)
    }

    /// Check if SASL is required for this protocol.
    #[must_use]
    pub fn requires_sasl(&self) -> bool {
        matches!(self, Self::SaslPlaintext | Self::SaslSsl)
    }

    /// Comma-separated names of the supported protocols, for error messages.
    #[must_use]
    pub fn supported_names() -> String {
        join_names(&Self::SUPPORTED)
    }
}

fn join_names(protocols: &[SecurityProtocol]) -> String {
    protocols
        .iter()
        .map(SecurityProtocol::name)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for SecurityProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SecurityProtocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|protocol| protocol.name() == s)
            .ok_or_else(|| ConfigError::UnknownSecurityProtocol {
                value: s.to_string(),
                supported: Self::supported_names(),
            })
    }
}

impl TryFrom<String> for SecurityProtocol {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Declared security mode and SASL credentials.
///
/// This is the unvalidated form; call [`KafkaSecurityConfig::validate`] to
/// obtain a [`ValidatedSecurityConfig`] that the factory selector accepts.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct KafkaSecurityConfig {
    /// Kafka communication security protocol.
    #[serde(default)]
    pub security_protocol: SecurityProtocol,

    /// Kafka communication SASL mechanism, e.g. `PLAIN` or `SCRAM-SHA-512`.
    #[serde(default)]
    pub sasl_mechanism: Option<String>,

    /// Kafka communication SASL JAAS config.
    /// Supports environment variable expansion: "${KAFKA_PASSWORD}"
    #[serde(default)]
    pub sasl_jaas_config: Option<String>,
}

impl fmt::Debug for KafkaSecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KafkaSecurityConfig")
            .field("security_protocol", &self.security_protocol)
            .field("sasl_mechanism", &self.sasl_mechanism)
            .field("sasl_jaas_config", &mask(&self.sasl_jaas_config))
            .finish()
    }
}

/// Masks a secret for `Debug` output, keeping whether it was set.
fn mask(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| MASK)
}

impl KafkaSecurityConfig {
    /// Validate the declared security protocol.
    ///
    /// SASL credentials are checked later, when the SASL builders are
    /// constructed, so that the error names the missing field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedSecurityProtocol`] unless the protocol
    /// is `PLAINTEXT`, `SSL` or `SASL_PLAINTEXT`.
    pub fn validate(self) -> ConfigResult<ValidatedSecurityConfig> {
        if !self.security_protocol.is_supported() {
            return Err(ConfigError::UnsupportedSecurityProtocol {
                protocol: self.security_protocol,
                supported: SecurityProtocol::supported_names(),
            });
        }
        Ok(ValidatedSecurityConfig { inner: self })
    }
}

/// A security configuration whose protocol is known to be supported.
///
/// Immutable; shared read-only by every builder.
#[derive(Debug, Clone)]
pub struct ValidatedSecurityConfig {
    inner: KafkaSecurityConfig,
}

impl ValidatedSecurityConfig {
    #[must_use]
    pub fn security_protocol(&self) -> SecurityProtocol {
        self.inner.security_protocol
    }

    #[must_use]
    pub fn sasl_mechanism(&self) -> Option<&str> {
        self.inner.sasl_mechanism.as_deref()
    }

    /// Get the JAAS config with environment variables expanded.
    #[must_use]
    pub fn sasl_jaas_config(&self) -> Option<String> {
        self.inner.sasl_jaas_config.as_deref().map(expand_env_vars)
    }
}

/// Key and trust store format. Parsing ignores case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum StoreType {
    #[default]
    Jks,
    Pkcs12,
    Pem,
}

impl StoreType {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jks => "JKS",
            Self::Pkcs12 => "PKCS12",
            Self::Pem => "PEM",
        }
    }
}

impl FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "JKS" => Ok(Self::Jks),
            "PKCS12" => Ok(Self::Pkcs12),
            "PEM" => Ok(Self::Pem),
            _ => Err(format!("unknown store type '{s}': expected JKS, PKCS12 or PEM")),
        }
    }
}

impl TryFrom<String> for StoreType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Whether clients verify the broker hostname against its certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EndpointIdentificationAlgorithm {
    #[default]
    Https,
    Disabled,
}

impl EndpointIdentificationAlgorithm {
    /// Value for `ssl.endpoint.identification.algorithm`; empty disables the check.
    #[must_use]
    pub fn value(&self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Disabled => "",
        }
    }
}

impl FromStr for EndpointIdentificationAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "https" => Ok(Self::Https),
            "disabled" => Ok(Self::Disabled),
            _ => Err(format!(
                "unknown endpoint identification algorithm '{s}': expected https or disabled"
            )),
        }
    }
}

impl TryFrom<String> for EndpointIdentificationAlgorithm {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// TLS store configuration for broker connections.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct KafkaSslConfig {
    /// Path to the client key store.
    #[serde(default)]
    pub keystore_location: Option<PathBuf>,

    /// Key store password.
    /// Supports environment variable expansion.
    #[serde(default)]
    pub keystore_password: Option<String>,

    #[serde(default)]
    pub keystore_type: StoreType,

    /// Path to the trust store used to verify brokers.
    #[serde(default)]
    pub truststore_location: Option<PathBuf>,

    /// Trust store password.
    /// Supports environment variable expansion.
    #[serde(default)]
    pub truststore_password: Option<String>,

    #[serde(default)]
    pub truststore_type: StoreType,

    /// Password of the private key inside the key store.
    /// Supports environment variable expansion.
    #[serde(default)]
    pub key_password: Option<String>,

    #[serde(default)]
    pub endpoint_identification_algorithm: EndpointIdentificationAlgorithm,
}

impl fmt::Debug for KafkaSslConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KafkaSslConfig")
            .field("keystore_location", &self.keystore_location)
            .field("keystore_password", &mask(&self.keystore_password))
            .field("keystore_type", &self.keystore_type)
            .field("truststore_location", &self.truststore_location)
            .field("truststore_password", &mask(&self.truststore_password))
            .field("truststore_type", &self.truststore_type)
            .field("key_password", &mask(&self.key_password))
            .field(
                "endpoint_identification_algorithm",
                &self.endpoint_identification_algorithm,
            )
            .finish()
    }
}

impl KafkaSslConfig {
    /// Validate store settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a store password is set without the store location
    /// - a configured store file does not exist
    pub fn validate(&self) -> ConfigResult<()> {
        check_store(
            self.keystore_location.as_deref(),
            self.keystore_password.is_some(),
            "ssl.keystore.location",
            "ssl.keystore.password",
        )?;
        check_store(
            self.truststore_location.as_deref(),
            self.truststore_password.is_some(),
            "ssl.truststore.location",
            "ssl.truststore.password",
        )?;
        if self.key_password.is_some() && self.keystore_location.is_none() {
            return Err(ConfigError::PasswordWithoutLocation {
                password_field: "ssl.key.password",
                location_field: "ssl.keystore.location",
            });
        }
        Ok(())
    }
}

fn check_store(
    location: Option<&Path>,
    has_password: bool,
    location_field: &'static str,
    password_field: &'static str,
) -> ConfigResult<()> {
    match location {
        None if has_password => Err(ConfigError::PasswordWithoutLocation {
            password_field,
            location_field,
        }),
        Some(path) if !path.is_file() => Err(ConfigError::StoreNotFound {
            field: location_field,
            path: path.display().to_string(),
        }),
        _ => Ok(()),
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output logs in JSON format (for production).
    #[serde(default)]
    pub json: bool,
}

/// Expand environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of the environment variable `VAR_NAME`.
/// If the variable is not set, replaces with an empty string.
pub(crate) fn expand_env_vars(s: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN
        .get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));
    re.replace_all(s, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_default()
    })
    .to_string()
}

// Default value functions

fn default_acks() -> String {
    "all".to_string()
}

fn default_compression_type() -> String {
    "none".to_string()
}

fn default_buffer_size() -> u64 {
    64 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            acks: default_acks(),
            compression_type: default_compression_type(),
            buffer_size: default_buffer_size(),
            client_id_prefix: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl KafkaConfig {
    /// Validate broker connectivity settings.
    ///
    /// # Errors
    ///
    /// Returns an error if no nodes are configured or a node is not `host:port`.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.nodes.is_empty() {
            return Err(ConfigError::NoNodes);
        }
        for node in &self.nodes {
            parse_host_port(node)?;
        }
        Ok(())
    }

    /// Broker list for `bootstrap.servers`, duplicates removed, order kept.
    #[must_use]
    pub fn bootstrap_servers(&self) -> String {
        let mut seen: Vec<&str> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let node = node.trim();
            if !seen.contains(&node) {
                seen.push(node);
            }
        }
        seen.join(",")
    }
}

/// Split a `host:port` address.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidAddress`] if the port is missing or not a valid port.
pub fn parse_host_port(addr: &str) -> ConfigResult<(String, u16)> {
    let addr = addr.trim();
    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| ConfigError::InvalidAddress(addr.to_string()))?;
    if host.is_empty() {
        return Err(ConfigError::InvalidAddress(addr.to_string()));
    }
    let port: u16 = port
        .parse()
        .map_err(|_| ConfigError::InvalidAddress(addr.to_string()))?;
    Ok((host.to_string(), port))
}

// Configuration loading and validation

impl ClientsConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if
    /// validation fails.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = read_config(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn from_str(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a flat catalog properties file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a `kafka.` property is
    /// unknown or malformed, or validation fails.
    pub fn from_properties_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = read_config(path.as_ref())?;
        Self::from_properties_str(&content)
    }

    /// Load configuration from flat catalog properties text.
    ///
    /// Blank lines and lines starting with `#` or `!` are skipped. A line
    /// ending in an unescaped `\` continues on the next line, whose leading
    /// whitespace is dropped. Keys outside the `kafka.` namespace belong to
    /// other components and are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a line is malformed, a `kafka.` property is
    /// unknown or has an invalid value, or validation fails.
    pub fn from_properties_str(content: &str) -> ConfigResult<Self> {
        let mut pairs = Vec::new();
        for (line, entry) in logical_lines(content) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (key, value) = entry
                .split_once(['=', ':'])
                .ok_or_else(|| ConfigError::MalformedProperty {
                    line,
                    content: entry.to_string(),
                })?;
            pairs.push((key.trim().to_string(), value.trim().to_string()));
        }
        Self::from_properties(pairs)
    }

    /// Build configuration from `kafka.*` key-value pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a `kafka.` property is unknown or has an invalid
    /// value, or validation fails.
    pub fn from_properties<I, K, V>(properties: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in properties {
            let key = key.as_ref();
            let Some(name) = key.strip_prefix("kafka.") else {
                continue;
            };
            config.apply_property(key, name, value.into())?;
        }
        config.validate()?;
        Ok(config)
    }

    fn apply_property(&mut self, key: &str, name: &str, value: String) -> ConfigResult<()> {
        match name {
            "nodes" => {
                self.kafka.nodes = value
                    .split(',')
                    .map(str::trim)
                    .filter(|node| !node.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "acks" => self.kafka.acks = value,
            "compression-type" => self.kafka.compression_type = value,
            "buffer-size" => {
                self.kafka.buffer_size = parse_value(key, &value, "a size in bytes")?;
            }
            "client-id-prefix" => self.kafka.client_id_prefix = Some(value),
            "security-protocol" => self.security.security_protocol = value.parse()?,
            "sasl-mechanism" => self.security.sasl_mechanism = Some(value),
            "sasl-jaas-config" => self.security.sasl_jaas_config = Some(value),
            "ssl.keystore.location" => self.ssl.keystore_location = Some(PathBuf::from(value)),
            "ssl.keystore.password" => self.ssl.keystore_password = Some(value),
            "ssl.keystore.type" => {
                self.ssl.keystore_type = parse_value(key, &value, "JKS, PKCS12 or PEM")?;
            }
            "ssl.truststore.location" => {
                self.ssl.truststore_location = Some(PathBuf::from(value));
            }
            "ssl.truststore.password" => self.ssl.truststore_password = Some(value),
            "ssl.truststore.type" => {
                self.ssl.truststore_type = parse_value(key, &value, "JKS, PKCS12 or PEM")?;
            }
            "ssl.key.password" => self.ssl.key_password = Some(value),
            "ssl.endpoint-identification-algorithm" => {
                self.ssl.endpoint_identification_algorithm =
                    parse_value(key, &value, "https or disabled")?;
            }
            _ => return Err(ConfigError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }

    /// Validate connectivity and TLS store settings.
    ///
    /// The security protocol is validated separately by
    /// [`KafkaSecurityConfig::validate`] when the factories are wired.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation check fails.
    pub fn validate(&self) -> ConfigResult<()> {
        self.kafka.validate()?;
        self.ssl.validate()
    }
}

fn read_config(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Join continuation lines, returning each logical line with the number of
/// the physical line it starts on. Comments are only recognised at the start
/// of a logical line.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;
    for (index, raw) in content.lines().enumerate() {
        let text = raw.trim_start();
        let (start, mut joined) = match pending.take() {
            Some(partial) => partial,
            None if text.is_empty() || text.starts_with('#') || text.starts_with('!') => continue,
            None => (index + 1, String::new()),
        };
        match text.strip_suffix('\\') {
            Some(head) if continues(text) => {
                joined.push_str(head);
                pending = Some((start, joined));
            }
            _ => {
                joined.push_str(text);
                lines.push((start, joined));
            }
        }
    }
    // a trailing backslash on the last line has nothing to join
    lines.extend(pending);
    lines
}

/// An odd run of trailing backslashes ends in an unescaped one.
fn continues(line: &str) -> bool {
    line.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

fn parse_value<T: FromStr>(key: &str, value: &str, expected: &'static str) -> ConfigResult<T> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_supported_protocols_validate() {
        for protocol in SecurityProtocol::SUPPORTED {
            let config = KafkaSecurityConfig {
                security_protocol: protocol,
                ..Default::default()
            };
            let validated = config.validate().unwrap();
            assert_eq!(validated.security_protocol(), protocol);
        }
    }

    #[test]
    fn test_sasl_ssl_rejected() {
        let config = KafkaSecurityConfig {
            security_protocol: SecurityProtocol::SaslSsl,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedSecurityProtocol {
                protocol: SecurityProtocol::SaslSsl,
                ..
            }
        ));
        assert!(err.to_string().contains("PLAINTEXT, SSL, SASL_PLAINTEXT"));
    }

    #[test]
    fn test_unknown_protocol_token() {
        for token in ["TLS", "plaintext", "", "SASL_SCRAM"] {
            let result = token.parse::<SecurityProtocol>();
            assert!(
                matches!(result, Err(ConfigError::UnknownSecurityProtocol { .. })),
                "{token:?} should not parse"
            );
        }
    }

    #[test]
    fn test_protocol_names_round_trip() {
        for protocol in SecurityProtocol::ALL {
            assert_eq!(protocol.name().parse::<SecurityProtocol>().unwrap(), protocol);
        }
    }

    #[test]
    fn test_security_protocol_methods() {
        assert!(!SecurityProtocol::Plaintext.requires_tls());
        assert!(!SecurityProtocol::Plaintext.requires_sasl());
        assert!(SecurityProtocol::Ssl.requires_tls());
        assert!(!SecurityProtocol::Ssl.requires_sasl());
        assert!(!SecurityProtocol::SaslPlaintext.requires_tls());
        assert!(SecurityProtocol::SaslPlaintext.requires_sasl());
        assert!(!SecurityProtocol::SaslSsl.is_supported());
    }

    #[test]
    fn test_from_yaml_string() {
        let yaml = r"
kafka:
  nodes:
    - 'broker-1:9092'
    - 'broker-2:9092'
security:
  security-protocol: SASL_PLAINTEXT
  sasl-mechanism: PLAIN
  sasl-jaas-config: 'login-module required;'
";
        let config = ClientsConfig::from_str(yaml).unwrap();
        assert_eq!(config.kafka.bootstrap_servers(), "broker-1:9092,broker-2:9092");
        assert_eq!(
            config.security.security_protocol,
            SecurityProtocol::SaslPlaintext
        );
        assert_eq!(config.security.sasl_mechanism.as_deref(), Some("PLAIN"));
    }

    #[test]
    fn test_default_values_applied() {
        let yaml = r"
kafka:
  nodes: ['localhost:9092']
";
        let config = ClientsConfig::from_str(yaml).unwrap();
        assert_eq!(config.kafka.acks, "all");
        assert_eq!(config.kafka.compression_type, "none");
        assert_eq!(config.kafka.buffer_size, 65536);
        assert_eq!(config.security.security_protocol, SecurityProtocol::Plaintext);
        assert_eq!(config.ssl.keystore_type, StoreType::Jks);
        assert_eq!(
            config.ssl.endpoint_identification_algorithm,
            EndpointIdentificationAlgorithm::Https
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_yaml_unknown_protocol_is_parse_error() {
        let yaml = r"
kafka:
  nodes: ['localhost:9092']
security:
  security-protocol: TLS
";
        let err = ClientsConfig::from_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().contains("unknown security protocol 'TLS'"));
    }

    #[test]
    fn test_empty_nodes_rejected() {
        let err = ClientsConfig::from_str("kafka:\n  nodes: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::NoNodes));
    }

    #[test]
    fn test_invalid_node_address() {
        for node in ["localhost", ":9092", "localhost:port", "localhost:70000"] {
            let config = KafkaConfig {
                nodes: vec![node.to_string()],
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidAddress(_))),
                "{node} should be rejected"
            );
        }
    }

    #[test]
    fn test_bootstrap_servers_deduplicates() {
        let config = KafkaConfig {
            nodes: vec![
                "b:9092".to_string(),
                "a:9092".to_string(),
                " b:9092".to_string(),
            ],
            ..Default::default()
        };
        assert_eq!(config.bootstrap_servers(), "b:9092,a:9092");
    }

    #[test]
    fn test_keystore_password_without_location() {
        let ssl = KafkaSslConfig {
            keystore_password: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ssl.validate(),
            Err(ConfigError::PasswordWithoutLocation {
                password_field: "ssl.keystore.password",
                ..
            })
        ));
    }

    #[test]
    fn test_key_password_without_keystore() {
        let ssl = KafkaSslConfig {
            key_password: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ssl.validate(),
            Err(ConfigError::PasswordWithoutLocation {
                password_field: "ssl.key.password",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_truststore_file() {
        let ssl = KafkaSslConfig {
            truststore_location: Some(PathBuf::from("/nonexistent/truststore.jks")),
            ..Default::default()
        };
        assert!(matches!(
            ssl.validate(),
            Err(ConfigError::StoreNotFound {
                field: "ssl.truststore.location",
                ..
            })
        ));
    }

    #[test]
    fn test_existing_store_file() {
        let store = NamedTempFile::new().unwrap();
        let ssl = KafkaSslConfig {
            truststore_location: Some(store.path().to_path_buf()),
            truststore_password: Some("changeit".to_string()),
            ..Default::default()
        };
        assert!(ssl.validate().is_ok());
    }

    #[test]
    fn test_from_properties_str() {
        let properties = r"
# catalog
connector.name=kafka
kafka.nodes=broker-1:9092, broker-2:9092
kafka.acks=1
kafka.compression-type=lz4
kafka.buffer-size=131072
kafka.security-protocol=SSL
kafka.ssl.endpoint-identification-algorithm=disabled
kafka.ssl.keystore.type=pkcs12
";
        let config = ClientsConfig::from_properties_str(properties).unwrap();
        assert_eq!(config.kafka.nodes, vec!["broker-1:9092", "broker-2:9092"]);
        assert_eq!(config.kafka.acks, "1");
        assert_eq!(config.kafka.compression_type, "lz4");
        assert_eq!(config.kafka.buffer_size, 131_072);
        assert_eq!(config.security.security_protocol, SecurityProtocol::Ssl);
        assert_eq!(config.ssl.keystore_type, StoreType::Pkcs12);
        assert_eq!(
            config.ssl.endpoint_identification_algorithm,
            EndpointIdentificationAlgorithm::Disabled
        );
    }

    #[test]
    fn test_properties_unknown_kafka_key() {
        let err =
            ClientsConfig::from_properties([("kafka.nodes", "a:9092"), ("kafka.bogus", "x")])
                .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProperty(key) if key == "kafka.bogus"));
    }

    #[test]
    fn test_properties_invalid_values() {
        let err = ClientsConfig::from_properties([
            ("kafka.nodes", "a:9092"),
            ("kafka.buffer-size", "64kB"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = ClientsConfig::from_properties([
            ("kafka.nodes", "a:9092"),
            ("kafka.security-protocol", "ssl"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSecurityProtocol { .. }));
    }

    #[test]
    fn test_properties_malformed_line() {
        let err = ClientsConfig::from_properties_str("kafka.nodes=a:9092\njunk\n").unwrap_err();
        assert!(matches!(err, ConfigError::MalformedProperty { line: 2, .. }));
    }

    #[test]
    fn test_properties_continuation_lines() {
        let properties = r#"
kafka.nodes=broker-1:9092,\
    broker-2:9092
kafka.security-protocol=SASL_PLAINTEXT
kafka.sasl-mechanism=PLAIN
kafka.sasl-jaas-config=PlainLoginModule required \
    username="u" \
    password="p";
"#;
        let config = ClientsConfig::from_properties_str(properties).unwrap();
        assert_eq!(config.kafka.nodes, vec!["broker-1:9092", "broker-2:9092"]);
        assert_eq!(
            config.security.sasl_jaas_config.as_deref(),
            Some(r#"PlainLoginModule required username="u" password="p";"#)
        );
    }

    #[test]
    fn test_properties_escaped_backslash_does_not_continue() {
        let joined = logical_lines("a=x\\\\\nb=y\n");
        assert_eq!(
            joined,
            vec![(1, "a=x\\\\".to_string()), (2, "b=y".to_string())]
        );
    }

    #[test]
    fn test_properties_malformed_continued_line() {
        let err = ClientsConfig::from_properties_str("kafka.nodes=a:9092\n\njunk \\\n  more\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MalformedProperty { line: 3, content } if content == "junk more"
        ));
    }

    #[test]
    fn test_yaml_store_and_endpoint_ignore_case() {
        let yaml = r"
kafka:
  nodes: ['localhost:9092']
ssl:
  keystore-type: pkcs12
  truststore-type: Pem
  endpoint-identification-algorithm: DISABLED
";
        let config = ClientsConfig::from_str(yaml).unwrap();
        assert_eq!(config.ssl.keystore_type, StoreType::Pkcs12);
        assert_eq!(config.ssl.truststore_type, StoreType::Pem);
        assert_eq!(
            config.ssl.endpoint_identification_algorithm,
            EndpointIdentificationAlgorithm::Disabled
        );

        let err = ClientsConfig::from_str(&yaml.replace("pkcs12", "p12")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().contains("unknown store type 'p12'"));
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        for yaml in [
            "kafka:\n  nodes: ['localhost:9092']\nsecurity:\n  security_protocol: SSL\n",
            "kafka:\n  nodes: ['localhost:9092']\n  compresion-type: lz4\n",
            "kafka:\n  nodes: ['localhost:9092']\nssl:\n  keystore-pasword: secret\n",
            "kafka:\n  nodes: ['localhost:9092']\nlogging:\n  format: json\n",
            "kafka:\n  nodes: ['localhost:9092']\nschema-registry: {}\n",
        ] {
            let err = ClientsConfig::from_str(yaml).unwrap_err();
            assert!(
                matches!(err, ConfigError::ParseError(_)),
                "{yaml:?} should be rejected"
            );
            assert!(err.to_string().contains("unknown field"), "{err}");
        }
    }

    #[test]
    fn test_debug_masks_secrets() {
        let security = KafkaSecurityConfig {
            security_protocol: SecurityProtocol::SaslPlaintext,
            sasl_mechanism: Some("PLAIN".to_string()),
            sasl_jaas_config: Some("PlainLoginModule required password=\"hunter2\";".to_string()),
        };
        let ssl = KafkaSslConfig {
            keystore_password: Some("ks-secret".to_string()),
            truststore_password: Some("ts-secret".to_string()),
            key_password: Some("key-secret".to_string()),
            ..Default::default()
        };
        let config = ClientsConfig {
            security: security.clone(),
            ssl,
            ..Default::default()
        };

        for output in [
            format!("{config:?}"),
            format!("{security:#?}"),
            format!("{:?}", security.validate().unwrap()),
        ] {
            for secret in ["hunter2", "ks-secret", "ts-secret", "key-secret"] {
                assert!(!output.contains(secret), "{secret} leaked: {output}");
            }
        }
        assert!(format!("{config:?}").contains("PLAIN"));
        assert!(format!("{config:?}").contains("******"));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "kafka:").unwrap();
        writeln!(file, "  nodes: ['localhost:9092']").unwrap();
        file.flush().unwrap();

        let config = ClientsConfig::from_file(file.path()).unwrap();
        assert_eq!(config.kafka.nodes, vec!["localhost:9092"]);
    }

    #[test]
    fn test_from_missing_file() {
        let err = ClientsConfig::from_file("/nonexistent/clients.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("TEST_CLIENTS_JAAS_PASS", "my-password");

        let validated = KafkaSecurityConfig {
            security_protocol: SecurityProtocol::SaslPlaintext,
            sasl_mechanism: Some("PLAIN".to_string()),
            sasl_jaas_config: Some("password=\"${TEST_CLIENTS_JAAS_PASS}\";".to_string()),
        }
        .validate()
        .unwrap();

        assert_eq!(
            validated.sasl_jaas_config().as_deref(),
            Some("password=\"my-password\";")
        );

        std::env::remove_var("TEST_CLIENTS_JAAS_PASS");
    }

    #[test]
    fn test_env_var_expansion_missing_var() {
        assert_eq!(expand_env_vars("${NONEXISTENT_CLIENTS_VAR}-x"), "-x");
        assert_eq!(expand_env_vars("literal"), "literal");
    }
}
