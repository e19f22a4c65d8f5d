//! Finished client configurations.
//!
//! A [`PropertySet`] is the flat string map handed to the Kafka client
//! library. Keys are kept sorted so that rendered output is stable.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Kafka client configuration keys produced by the builders.
pub mod keys {
    pub const BOOTSTRAP_SERVERS: &str = "bootstrap.servers";
    pub const SECURITY_PROTOCOL: &str = "security.protocol";
    pub const CLIENT_ID: &str = "client.id";

    pub const KEY_SERIALIZER: &str = "key.serializer";
    pub const VALUE_SERIALIZER: &str = "value.serializer";
    pub const ACKS: &str = "acks";
    pub const LINGER_MS: &str = "linger.ms";
    pub const COMPRESSION_TYPE: &str = "compression.type";

    pub const KEY_DESERIALIZER: &str = "key.deserializer";
    pub const VALUE_DESERIALIZER: &str = "value.deserializer";
    pub const ENABLE_AUTO_COMMIT: &str = "enable.auto.commit";
    pub const RECEIVE_BUFFER_BYTES: &str = "receive.buffer.bytes";

    pub const SASL_MECHANISM: &str = "sasl.mechanism";
    pub const SASL_JAAS_CONFIG: &str = "sasl.jaas.config";

    pub const SSL_KEYSTORE_LOCATION: &str = "ssl.keystore.location";
    pub const SSL_KEYSTORE_PASSWORD: &str = "ssl.keystore.password";
    pub const SSL_KEYSTORE_TYPE: &str = "ssl.keystore.type";
    pub const SSL_TRUSTSTORE_LOCATION: &str = "ssl.truststore.location";
    pub const SSL_TRUSTSTORE_PASSWORD: &str = "ssl.truststore.password";
    pub const SSL_TRUSTSTORE_TYPE: &str = "ssl.truststore.type";
    pub const SSL_KEY_PASSWORD: &str = "ssl.key.password";
    pub const SSL_ENDPOINT_IDENTIFICATION_ALGORITHM: &str = "ssl.endpoint.identification.algorithm";

    // librdkafka names with no Java client counterpart
    pub const SASL_USERNAME: &str = "sasl.username";
    pub const SASL_PASSWORD: &str = "sasl.password";
    pub const SSL_CA_LOCATION: &str = "ssl.ca.location";
    pub const SSL_CERTIFICATE_LOCATION: &str = "ssl.certificate.location";
    pub const SSL_KEY_LOCATION: &str = "ssl.key.location";
    pub const SOCKET_RECEIVE_BUFFER_BYTES: &str = "socket.receive.buffer.bytes";

    /// Keys whose values must never be logged or printed unmasked.
    pub const SECRETS: [&str; 5] = [
        SASL_JAAS_CONFIG,
        SASL_PASSWORD,
        SSL_KEYSTORE_PASSWORD,
        SSL_TRUSTSTORE_PASSWORD,
        SSL_KEY_PASSWORD,
    ];
}

/// Raw-bytes serializer used for both producer keys and values.
pub const BYTE_ARRAY_SERIALIZER: &str = "org.apache.kafka.common.serialization.ByteArraySerializer";

/// Raw-bytes deserializer used for both consumer keys and values.
pub const BYTE_ARRAY_DESERIALIZER: &str =
    "org.apache.kafka.common.serialization.ByteArrayDeserializer";

/// Producer batching delay in milliseconds.
pub const LINGER_MS: u64 = 5;

pub(crate) const MASK: &str = "******";

/// An ordered, flat client configuration.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertySet {
    entries: BTreeMap<String, String>,
}

impl PropertySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property. A second write to the same key replaces the first.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every entry of `other` into this set, replacing existing keys.
    pub fn extend_from(&mut self, other: &PropertySet) {
        self.entries
            .extend(other.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// A copy with secret values replaced by a mask, safe to log or print.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(k, v)| {
                let value = if is_secret(k) { MASK.to_string() } else { v.clone() };
                (k.clone(), value)
            })
            .collect();
        Self { entries }
    }
}

fn is_secret(key: &str) -> bool {
    keys::SECRETS.contains(&key)
}

/// Debug output masks secrets.
impl fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.redacted().entries.iter()).finish()
    }
}

/// Renders `key=value` lines, the Java properties layout. Secrets are not masked;
/// call [`PropertySet::redacted`] first when the output is shown to people.
impl fmt::Display for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertySet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (key, value) in iter {
            set.set(key, value);
        }
        set
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut set = PropertySet::new();
        set.set(keys::ACKS, "1").set(keys::ACKS, "all");
        assert_eq!(set.get(keys::ACKS), Some("all"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_iteration_is_key_ordered() {
        let set: PropertySet = [("b", "2"), ("a", "1"), ("c", "3")].into_iter().collect();
        let keys: Vec<&str> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_redacted_masks_secrets_only() {
        let set: PropertySet = [
            (keys::SASL_JAAS_CONFIG, "password=hunter2"),
            (keys::SSL_KEY_PASSWORD, "hunter2"),
            (keys::SASL_MECHANISM, "PLAIN"),
        ]
        .into_iter()
        .collect();

        let redacted = set.redacted();
        assert_eq!(redacted.get(keys::SASL_JAAS_CONFIG), Some("******"));
        assert_eq!(redacted.get(keys::SSL_KEY_PASSWORD), Some("******"));
        assert_eq!(redacted.get(keys::SASL_MECHANISM), Some("PLAIN"));
        // original untouched
        assert_eq!(set.get(keys::SSL_KEY_PASSWORD), Some("hunter2"));
    }

    #[test]
    fn test_debug_never_prints_secrets() {
        let set: PropertySet = [(keys::SSL_TRUSTSTORE_PASSWORD, "hunter2")]
            .into_iter()
            .collect();
        let debug = format!("{set:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("ssl.truststore.password"));
    }

    #[test]
    fn test_display_properties_layout() {
        let set: PropertySet = [(keys::LINGER_MS, "5"), (keys::ACKS, "all")]
            .into_iter()
            .collect();
        assert_eq!(set.to_string(), "acks=all\nlinger.ms=5\n");
    }
}
