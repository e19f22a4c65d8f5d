//! Kafka Client Configuration Core Library
//!
//! This library resolves the Kafka client configuration for a declared
//! transport security protocol. Given broker connectivity and a security mode
//! (`PLAINTEXT`, `SSL` or `SASL_PLAINTEXT`) it wires one family of
//! configuration builders for producers, consumers and admin clients, plus a
//! TLS-only family for the schema registry client.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Domain-specific error types
//! - [`protocol`] - Which property groups each security protocol uses
//! - [`properties`] - The finished, flat client configuration
//! - [`librdkafka`] - Key translation for the librdkafka client library
//! - [`builder`] - Per-role configuration builders
//! - [`selector`] - Builder family selection and wiring
//!
//! # Example
//!
//! ```rust,ignore
//! use kafka_clients_core::{ClientContext, ClientFactories, ClientsConfig};
//! use kafka_clients_core::builder::ClientConfigBuilder;
//!
//! let config = ClientsConfig::from_file("clients.yaml")?;
//! let factories = ClientFactories::from_config(&config)?;
//!
//! let producer = factories.primary().producer().configure(&ClientContext::new("query-42"));
//! let registry = factories.schema_registry_tls().consumer().configure(&ClientContext::default());
//! ```

#![forbid(unsafe_code)]

pub mod builder;
pub mod config;
pub mod error;
pub mod librdkafka;
pub mod properties;
pub mod protocol;
pub mod selector;

// Re-export commonly used types
pub use builder::{ClientConfigBuilder, ClientContext, ClientRole, SecuritySettings};
pub use config::{
    ClientsConfig, KafkaConfig, KafkaSecurityConfig, KafkaSslConfig, SecurityProtocol,
    ValidatedSecurityConfig,
};
pub use error::{ClientsError, ConfigError, ConfigResult, Result};
pub use properties::PropertySet;
pub use protocol::ProtocolProfile;
pub use selector::{BuilderFamily, ClientFactories, FactorySelector, FamilyKey, FamilySelection};
