//! Translation of resolved property sets into librdkafka configuration.
//!
//! The builders emit the Java client's key names. librdkafka shares most of
//! them but has no serializer classes, no JAAS configs and no JKS stores, so
//! those keys are rewritten or dropped before a set reaches the C library.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::StoreType;
use crate::error::{ConfigError, ConfigResult};
use crate::properties::{keys, PropertySet};

/// Rewrite a resolved property set with librdkafka key names.
///
/// - serializer and deserializer classes are dropped; librdkafka hands out raw bytes
/// - `receive.buffer.bytes` becomes `socket.receive.buffer.bytes`
/// - `sasl.jaas.config` becomes `sasl.username` and `sasl.password`
/// - a PEM trust store becomes `ssl.ca.location`
/// - a PEM key store becomes `ssl.certificate.location` and `ssl.key.location`;
///   a PKCS12 key store keeps its location and password
/// - a disabled endpoint identification becomes `none`
///
/// Every other key is copied unchanged.
///
/// # Errors
///
/// Returns [`ConfigError::Untranslatable`] for a JKS store or a JAAS config
/// without quoted `username` and `password` options.
pub fn translate(properties: &PropertySet) -> ConfigResult<PropertySet> {
    let keystore = store_type(properties, keys::SSL_KEYSTORE_TYPE);
    let truststore = store_type(properties, keys::SSL_TRUSTSTORE_TYPE);

    let mut translated = PropertySet::new();
    for (key, value) in properties {
        match key {
            keys::KEY_SERIALIZER
            | keys::VALUE_SERIALIZER
            | keys::KEY_DESERIALIZER
            | keys::VALUE_DESERIALIZER
            | keys::SSL_KEYSTORE_TYPE
            | keys::SSL_TRUSTSTORE_TYPE
            | keys::SSL_TRUSTSTORE_PASSWORD => {}
            keys::RECEIVE_BUFFER_BYTES => {
                translated.set(keys::SOCKET_RECEIVE_BUFFER_BYTES, value);
            }
            keys::SASL_JAAS_CONFIG => {
                let (username, password) = jaas_credentials(value)?;
                translated
                    .set(keys::SASL_USERNAME, username)
                    .set(keys::SASL_PASSWORD, password);
            }
            keys::SSL_TRUSTSTORE_LOCATION => {
                if truststore != StoreType::Pem {
                    return Err(ConfigError::Untranslatable {
                        key: keys::SSL_TRUSTSTORE_LOCATION,
                        reason: "only PEM trust stores are supported",
                    });
                }
                translated.set(keys::SSL_CA_LOCATION, value);
            }
            keys::SSL_KEYSTORE_LOCATION => match keystore {
                StoreType::Pkcs12 => {
                    translated.set(keys::SSL_KEYSTORE_LOCATION, value);
                }
                StoreType::Pem => {
                    translated
                        .set(keys::SSL_CERTIFICATE_LOCATION, value)
                        .set(keys::SSL_KEY_LOCATION, value);
                }
                StoreType::Jks => {
                    return Err(ConfigError::Untranslatable {
                        key: keys::SSL_KEYSTORE_LOCATION,
                        reason: "only PKCS12 and PEM key stores are supported",
                    });
                }
            },
            // PEM keys are unlocked with ssl.key.password alone
            keys::SSL_KEYSTORE_PASSWORD => {
                if keystore == StoreType::Pkcs12 {
                    translated.set(keys::SSL_KEYSTORE_PASSWORD, value);
                }
            }
            keys::SSL_ENDPOINT_IDENTIFICATION_ALGORITHM => {
                let algorithm = if value.is_empty() { "none" } else { value };
                translated.set(keys::SSL_ENDPOINT_IDENTIFICATION_ALGORITHM, algorithm);
            }
            _ => {
                translated.set(key, value);
            }
        }
    }
    Ok(translated)
}

fn store_type(properties: &PropertySet, key: &str) -> StoreType {
    properties
        .get(key)
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

/// Pull the `username="..."` and `password="..."` options out of a JAAS config.
fn jaas_credentials(jaas_config: &str) -> ConfigResult<(&str, &str)> {
    static OPTION: OnceLock<Regex> = OnceLock::new();
    let re = OPTION
        .get_or_init(|| Regex::new(r#"\b(username|password)\s*=\s*"([^"]*)""#).expect("valid regex"));

    let mut username = None;
    let mut password = None;
    for caps in re.captures_iter(jaas_config) {
        let value = caps.get(2).map(|m| m.as_str());
        match &caps[1] {
            "username" => username = value,
            _ => password = value,
        }
    }

    username.zip(password).ok_or(ConfigError::Untranslatable {
        key: keys::SASL_JAAS_CONFIG,
        reason: "expected quoted username and password options",
    })
}

#[cfg(feature = "rdkafka")]
impl TryFrom<&PropertySet> for rdkafka::config::ClientConfig {
    type Error = ConfigError;

    fn try_from(properties: &PropertySet) -> ConfigResult<Self> {
        let mut config = rdkafka::config::ClientConfig::new();
        for (key, value) in &translate(properties)? {
            config.set(key, value);
        }
        Ok(config)
    }
}
