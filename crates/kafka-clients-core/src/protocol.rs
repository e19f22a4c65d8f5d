//! Per-protocol description of which configuration groups apply.

use crate::config::SecurityProtocol;

/// Which property groups a security protocol contributes to a client configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolProfile {
    pub protocol: SecurityProtocol,
    /// Key/trust store and endpoint identification keys.
    pub ssl_properties: bool,
    /// `sasl.mechanism` and `sasl.jaas.config`.
    pub sasl_properties: bool,
}

impl ProtocolProfile {
    pub const PLAINTEXT: Self = Self {
        protocol: SecurityProtocol::Plaintext,
        ssl_properties: false,
        sasl_properties: false,
    };

    pub const SSL: Self = Self {
        protocol: SecurityProtocol::Ssl,
        ssl_properties: true,
        sasl_properties: false,
    };

    pub const SASL_PLAINTEXT: Self = Self {
        protocol: SecurityProtocol::SaslPlaintext,
        ssl_properties: false,
        sasl_properties: true,
    };

    /// Profile for a protocol with a builder family, `None` otherwise.
    #[must_use]
    pub fn for_protocol(protocol: SecurityProtocol) -> Option<Self> {
        match protocol {
            SecurityProtocol::Plaintext => Some(Self::PLAINTEXT),
            SecurityProtocol::Ssl => Some(Self::SSL),
            SecurityProtocol::SaslPlaintext => Some(Self::SASL_PLAINTEXT),
            SecurityProtocol::SaslSsl => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_protocol_has_profile() {
        for protocol in SecurityProtocol::SUPPORTED {
            let profile = ProtocolProfile::for_protocol(protocol).unwrap();
            assert_eq!(profile.protocol, protocol);
            assert_eq!(profile.ssl_properties, protocol.requires_tls());
            assert_eq!(profile.sasl_properties, protocol.requires_sasl());
        }
    }

    #[test]
    fn test_sasl_ssl_has_no_profile() {
        assert!(ProtocolProfile::for_protocol(SecurityProtocol::SaslSsl).is_none());
    }
}
