use tracing::debug;

use super::{ClientConfigBuilder, ClientContext, ClientRole, ResolvedProperties, SecuritySettings};
use crate::config::{KafkaConfig, SecurityProtocol};
use crate::properties::PropertySet;

/// Builds admin client configurations: broker list and security only.
#[derive(Debug, Clone)]
pub struct AdminConfigBuilder {
    security: SecuritySettings,
    resolved: ResolvedProperties,
}

impl AdminConfigBuilder {
    #[must_use]
    pub fn new(kafka: &KafkaConfig, security: SecuritySettings) -> Self {
        let resolved = ResolvedProperties::build(kafka, &security, |_| {});
        debug!(
            role = %ClientRole::Admin,
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

impl ClientConfigBuilder for AdminConfigBuilder {
    fn role(&self) -> ClientRole {
        ClientRole::Admin
    }

    fn security_protocol(&self) -> SecurityProtocol {
        self.security.protocol()
    }

    fn configure(&self, context: &ClientContext) -> PropertySet {
        self.resolved.configure(context)
    }
}
