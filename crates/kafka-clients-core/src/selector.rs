//! Builder family selection and wiring.
//!
//! Wiring walks a fixed sequence of states, each a distinct type:
//!
//! 1. [`KafkaSecurityConfig`] - loaded, not yet checked
//! 2. [`ValidatedSecurityConfig`] - protocol is supported
//! 3. [`FamilySelection`] - the primary protocol profile is chosen
//! 4. [`ClientFactories`] - every builder is constructed; terminal
//!
//! Each step consumes the previous state, so there is no way back. The
//! resulting [`ClientFactories`] is immutable and cheap to clone; the host
//! builds it once at startup and shares it.
//!
//! [`KafkaSecurityConfig`]: crate::config::KafkaSecurityConfig

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::builder::{
    AdminConfigBuilder, ClientConfigBuilder, ClientRole, ConsumerConfigBuilder,
    ProducerConfigBuilder, SecuritySettings,
};
use crate::config::{
    ClientsConfig, KafkaConfig, KafkaSslConfig, SecurityProtocol, ValidatedSecurityConfig,
};
use crate::error::{ClientsError, Result};
use crate::protocol::ProtocolProfile;

/// Lookup key for a builder family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyKey {
    /// The family driven by the declared security protocol.
    Primary,
    /// The always-present TLS family used by the schema registry client.
    SchemaRegistryTls,
}

impl FamilyKey {
    pub const ALL: [Self; 2] = [Self::Primary, Self::SchemaRegistryTls];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::SchemaRegistryTls => "schema-registry-tls",
        }
    }
}

impl fmt::Display for FamilyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FamilyKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown builder family '{s}': expected primary or schema-registry-tls"))
    }
}

/// Producer, consumer and admin builders for one security protocol.
#[derive(Debug, Clone)]
pub struct BuilderFamily {
    protocol: SecurityProtocol,
    producer: Arc<ProducerConfigBuilder>,
    consumer: Arc<ConsumerConfigBuilder>,
    admin: Arc<AdminConfigBuilder>,
}

impl BuilderFamily {
    /// Construct all three role builders with the same security settings.
    #[must_use]
    pub fn new(kafka: &KafkaConfig, security: SecuritySettings) -> Self {
        Self {
            protocol: security.protocol(),
            producer: Arc::new(ProducerConfigBuilder::new(kafka, security.clone())),
            consumer: Arc::new(ConsumerConfigBuilder::new(kafka, security.clone())),
            admin: Arc::new(AdminConfigBuilder::new(kafka, security)),
        }
    }

    #[must_use]
    pub fn protocol(&self) -> SecurityProtocol {
        self.protocol
    }

    #[must_use]
    pub fn producer(&self) -> &Arc<ProducerConfigBuilder> {
        &self.producer
    }

    #[must_use]
    pub fn consumer(&self) -> &Arc<ConsumerConfigBuilder> {
        &self.consumer
    }

    #[must_use]
    pub fn admin(&self) -> &Arc<AdminConfigBuilder> {
        &self.admin
    }

    /// The builder for a role, for hosts that dispatch on role at runtime.
    #[must_use]
    pub fn builder(&self, role: ClientRole) -> Arc<dyn ClientConfigBuilder> {
        match role {
            ClientRole::Producer => self.producer.clone(),
            ClientRole::Consumer => self.consumer.clone(),
            ClientRole::Admin => self.admin.clone(),
        }
    }
}

/// Chooses the primary builder family from the validated security protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactorySelector;

impl FactorySelector {
    /// Pick the primary family for a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientsError::InvariantViolation`] if the protocol has no
    /// family, which validation should have made impossible.
    pub fn select(&self, security: ValidatedSecurityConfig) -> Result<FamilySelection> {
        let primary = profile_for(security.security_protocol())?;
        info!(
            protocol = %primary.protocol,
            "selected primary client builder family"
        );
        Ok(FamilySelection { security, primary })
    }
}

fn profile_for(protocol: SecurityProtocol) -> Result<ProtocolProfile> {
    ProtocolProfile::for_protocol(protocol).ok_or(ClientsError::InvariantViolation { protocol })
}

/// A chosen primary profile whose builders are not yet constructed.
#[derive(Debug, Clone)]
pub struct FamilySelection {
    security: ValidatedSecurityConfig,
    primary: ProtocolProfile,
}

impl FamilySelection {
    #[must_use]
    pub fn primary_profile(&self) -> ProtocolProfile {
        self.primary
    }

    /// Construct the primary family and the schema registry TLS family.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the primary protocol needs a field
    /// that is missing, such as the SASL mechanism.
    pub fn build(self, kafka: &KafkaConfig, ssl: &KafkaSslConfig) -> Result<ClientFactories> {
        let primary_security = SecuritySettings::for_profile(&self.primary, &self.security, ssl)?;
        let primary = BuilderFamily::new(kafka, primary_security);

        let schema_registry_tls = BuilderFamily::new(kafka, SecuritySettings::ssl(ssl));
        info!(
            primary = %primary.protocol(),
            schema_registry = %schema_registry_tls.protocol(),
            "client builder families ready"
        );

        Ok(ClientFactories {
            primary,
            schema_registry_tls,
        })
    }
}

/// The wired builder families, held side by side and addressed by [`FamilyKey`].
#[derive(Debug, Clone)]
pub struct ClientFactories {
    primary: BuilderFamily,
    schema_registry_tls: BuilderFamily,
}

impl ClientFactories {
    /// Run the full wiring sequence for a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the security protocol
    /// is unsupported, or a field required by the protocol is missing.
    pub fn from_config(config: &ClientsConfig) -> Result<Self> {
        config.validate()?;
        let security = config.security.clone().validate()?;
        FactorySelector
            .select(security)?
            .build(&config.kafka, &config.ssl)
    }

    #[must_use]
    pub fn primary(&self) -> &BuilderFamily {
        &self.primary
    }

    #[must_use]
    pub fn schema_registry_tls(&self) -> &BuilderFamily {
        &self.schema_registry_tls
    }

    #[must_use]
    pub fn family(&self, key: FamilyKey) -> &BuilderFamily {
        match key {
            FamilyKey::Primary => &self.primary,
            FamilyKey::SchemaRegistryTls => &self.schema_registry_tls,
        }
    }
}
