use tracing::debug;

use super::{ClientConfigBuilder, ClientContext, ClientRole, ResolvedProperties, SecuritySettings};
use crate::config::{KafkaConfig, SecurityProtocol};
use crate::properties::{keys, PropertySet, BYTE_ARRAY_SERIALIZER, LINGER_MS};

/// Builds producer configurations: raw-bytes serializers, the configured
/// acknowledgment level and compression codec, and a short fixed linger.
#[derive(Debug, Clone)]
pub struct ProducerConfigBuilder {
    security: SecuritySettings,
    resolved: ResolvedProperties,
}

impl ProducerConfigBuilder {
    #[must_use]
    pub fn new(kafka: &KafkaConfig, security: SecuritySettings) -> Self {
        let resolved = ResolvedProperties::build(kafka, &security, |properties| {
            properties
                .set(keys::KEY_SERIALIZER, BYTE_ARRAY_SERIALIZER)
                .set(keys::VALUE_SERIALIZER, BYTE_ARRAY_SERIALIZER)
                .set(keys::ACKS, kafka.acks.as_str())
                .set(keys::LINGER_MS, LINGER_MS.to_string())
                .set(keys::COMPRESSION_TYPE, kafka.compression_type.as_str());
        });
        debug!(
            role = %ClientRole::Producer,
            protocol = %security.protocol(),
            keys = resolved.len(),
            "client config builder constructed"
        );
        Self { security, resolved }
    }

    #[must_use]
    pub fn security(&self) -> &SecuritySettings {
        &self.security
    }
}

impl ClientConfigBuilder for ProducerConfigBuilder {
    fn role(&self) -> ClientRole {
        ClientRole::Producer
    }

    fn security_protocol(&self) -> SecurityProtocol {
        self.security.protocol()
    }

    fn configure(&self, context: &ClientContext) -> PropertySet {
        self.resolved.configure(context)
    }
}
