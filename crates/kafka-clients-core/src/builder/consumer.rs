use tracing::debug;

use super::{ClientConfigBuilder, ClientContext, ClientRole, ResolvedProperties, SecuritySettings};
use crate::config::{KafkaConfig, SecurityProtocol};
use crate::properties::{keys, PropertySet, BYTE_ARRAY_DESERIALIZER};

/// Builds consumer configurations.
///
/// Offsets are tracked by the caller, so auto commit is always off.
#[derive(Debug, Clone)]
pub struct ConsumerConfigBuilder {
    security: SecuritySettings,
    resolved: ResolvedProperties,
}

impl ConsumerConfigBuilder {
    #[must_use]
    pub fn new(kafka: &KafkaConfig, security: SecuritySettings) -> Self {
        let resolved = ResolvedProperties::build(kafka, &security, |properties| {
            properties
                .set(keys::KEY_DESERIALIZER, BYTE_ARRAY_DESERIALIZER)
                .set(keys::VALUE_DESERIALIZER, BYTE_ARRAY_DESERIALIZER)
                .set(keys::RECEIVE_BUFFER_BYTES, kafka.buffer_size.to_string())
                .set(keys::ENABLE_AUTO_COMMIT, "false");
        });
        debug!(
            role = %ClientRole::Consumer,
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

impl ClientConfigBuilder for ConsumerConfigBuilder {
    fn role(&self) -> ClientRole {
        ClientRole::Consumer
    }

    fn security_protocol(&self) -> SecurityProtocol {
        self.security.protocol()
    }

    fn configure(&self, context: &ClientContext) -> PropertySet {
        self.resolved.configure(context)
    }
}
