use std::fmt;

use crate::config::{expand_env_vars, KafkaSslConfig, SecurityProtocol, ValidatedSecurityConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::properties::{keys, PropertySet, MASK};
use crate::protocol::ProtocolProfile;

/// Security mode of a builder, with the data that mode contributes.
#[derive(Clone, PartialEq, Eq)]
pub enum SecuritySettings {
    Plaintext,
    /// Precomputed store and endpoint identification keys.
    Ssl { properties: PropertySet },
    SaslPlaintext {
        mechanism: String,
        jaas_config: String,
    },
}

impl SecuritySettings {
    /// Settings for the property groups named by `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] when the profile needs SASL
    /// and the mechanism or JAAS config is absent or blank.
    pub fn for_profile(
        profile: &ProtocolProfile,
        security: &ValidatedSecurityConfig,
        ssl: &KafkaSslConfig,
    ) -> ConfigResult<Self> {
        if profile.sasl_properties {
            Self::sasl_plaintext(security)
        } else if profile.ssl_properties {
            Ok(Self::ssl(ssl))
        } else {
            Ok(Self::Plaintext)
        }
    }

    /// TLS settings from the store configuration.
    #[must_use]
    pub fn ssl(config: &KafkaSslConfig) -> Self {
        let mut properties = PropertySet::new();
        if let Some(location) = &config.keystore_location {
            properties
                .set(keys::SSL_KEYSTORE_LOCATION, location.display().to_string())
                .set(keys::SSL_KEYSTORE_TYPE, config.keystore_type.name());
        }
        if let Some(password) = &config.keystore_password {
            properties.set(keys::SSL_KEYSTORE_PASSWORD, expand_env_vars(password));
        }
        if let Some(location) = &config.truststore_location {
            properties
                .set(keys::SSL_TRUSTSTORE_LOCATION, location.display().to_string())
                .set(keys::SSL_TRUSTSTORE_TYPE, config.truststore_type.name());
        }
        if let Some(password) = &config.truststore_password {
            properties.set(keys::SSL_TRUSTSTORE_PASSWORD, expand_env_vars(password));
        }
        if let Some(password) = &config.key_password {
            properties.set(keys::SSL_KEY_PASSWORD, expand_env_vars(password));
        }
        properties.set(
            keys::SSL_ENDPOINT_IDENTIFICATION_ALGORITHM,
            config.endpoint_identification_algorithm.value(),
        );
        Self::Ssl { properties }
    }

    /// SASL settings, checking both credentials are present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] naming the first absent field.
    pub fn sasl_plaintext(security: &ValidatedSecurityConfig) -> ConfigResult<Self> {
        let mechanism = non_blank(security.sasl_mechanism().map(str::to_string))
            .ok_or(ConfigError::MissingRequiredField {
                field: "sasl-mechanism",
                protocol: SecurityProtocol::SaslPlaintext,
            })?;
        let jaas_config = non_blank(security.sasl_jaas_config()).ok_or(
            ConfigError::MissingRequiredField {
                field: "sasl-jaas-config",
                protocol: SecurityProtocol::SaslPlaintext,
            },
        )?;
        Ok(Self::SaslPlaintext {
            mechanism,
            jaas_config,
        })
    }

    #[must_use]
    pub fn protocol(&self) -> SecurityProtocol {
        match self {
            Self::Plaintext => SecurityProtocol::Plaintext,
            Self::Ssl { .. } => SecurityProtocol::Ssl,
            Self::SaslPlaintext { .. } => SecurityProtocol::SaslPlaintext,
        }
    }

    /// Add `security.protocol` and the mode's keys.
    pub(crate) fn apply(&self, properties: &mut PropertySet) {
        properties.set(keys::SECURITY_PROTOCOL, self.protocol().name());
        match self {
            Self::Plaintext => {}
            Self::Ssl { properties: ssl } => properties.extend_from(ssl),
            Self::SaslPlaintext {
                mechanism,
                jaas_config,
            } => {
                properties
                    .set(keys::SASL_MECHANISM, mechanism.as_str())
                    .set(keys::SASL_JAAS_CONFIG, jaas_config.as_str());
            }
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl fmt::Debug for SecuritySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plaintext => f.write_str("Plaintext"),
            Self::Ssl { properties } => f.debug_struct("Ssl").field("properties", properties).finish(),
            Self::SaslPlaintext { mechanism, .. } => f
                .debug_struct("SaslPlaintext")
                .field("mechanism", mechanism)
                .field("jaas_config", &MASK)
                .finish_non_exhaustive(),
        }
    }
}
