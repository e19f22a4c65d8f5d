//! Client configuration builders.
//!
//! One builder per client role. Each builder captures the connection
//! parameters and a mode-tagged [`SecuritySettings`] at construction time and
//! precomputes its [`PropertySet`]; [`ClientConfigBuilder::configure`] only
//! adds the per-call attribution key.
//!
//! | Role     | Role keys                                                     |
//! |----------|---------------------------------------------------------------|
//! | producer | serializers, `acks`, `linger.ms`, `compression.type`          |
//! | consumer | deserializers, `enable.auto.commit`, `receive.buffer.bytes`   |
//! | admin    | none                                                          |
//!
//! Every role also carries `bootstrap.servers`, `security.protocol` and the
//! keys contributed by its security mode.

mod admin;
mod consumer;
mod producer;
mod security;

use std::fmt;

use crate::config::{KafkaConfig, SecurityProtocol};
use crate::properties::{keys, PropertySet};

pub use admin::AdminConfigBuilder;
pub use consumer::ConsumerConfigBuilder;
pub use producer::ProducerConfigBuilder;
pub use security::SecuritySettings;

/// The kind of Kafka client a configuration is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientRole {
    Producer,
    Consumer,
    Admin,
}

impl ClientRole {
    pub const ALL: [Self; 3] = [Self::Producer, Self::Consumer, Self::Admin];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Producer => "producer",
            Self::Consumer => "consumer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for ClientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transient per-call information about who is creating a client.
///
/// Only used for attribution; it never changes the shape of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    session_id: Option<String>,
}

impl ClientContext {
    /// Context for a session (a query id, a user session token, ...).
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        Self {
            session_id: (!session_id.is_empty()).then_some(session_id),
        }
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }
}

/// Produces finished client configurations for one role under one security mode.
///
/// Implementations are immutable after construction and safe to share across
/// threads; `configure` takes `&self` and needs no locking.
pub trait ClientConfigBuilder: Send + Sync + fmt::Debug {
    fn role(&self) -> ClientRole;

    fn security_protocol(&self) -> SecurityProtocol;

    /// Build the configuration for one client.
    fn configure(&self, context: &ClientContext) -> PropertySet;
}

/// Precomputed properties shared by every role builder.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedProperties {
    base: PropertySet,
    client_id_prefix: Option<String>,
}

impl ResolvedProperties {
    /// Start a role configuration with the broker list, then let the role add
    /// its keys, then apply the security mode.
    pub(crate) fn build(
        kafka: &KafkaConfig,
        security: &SecuritySettings,
        role_keys: impl FnOnce(&mut PropertySet),
    ) -> Self {
        let mut base = PropertySet::new();
        base.set(keys::BOOTSTRAP_SERVERS, kafka.bootstrap_servers());
        role_keys(&mut base);
        security.apply(&mut base);
        Self {
            base,
            client_id_prefix: kafka.client_id_prefix.clone(),
        }
    }

    pub(crate) fn configure(&self, context: &ClientContext) -> PropertySet {
        let mut properties = self.base.clone();
        if let Some(client_id) = self.client_id(context) {
            properties.set(keys::CLIENT_ID, client_id);
        }
        properties
    }

    pub(crate) fn len(&self) -> usize {
        self.base.len()
    }

    fn client_id(&self, context: &ClientContext) -> Option<String> {
        match (self.client_id_prefix.as_deref(), context.session_id()) {
            (Some(prefix), Some(session)) => Some(format!("{prefix}-{session}")),
            (Some(prefix), None) => Some(prefix.to_string()),
            (None, Some(session)) => Some(session.to_string()),
            (None, None) => None,
        }
    }
}
