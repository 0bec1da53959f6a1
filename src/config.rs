//! Caller-supplied negotiation parameters.

use crate::crypto::random::DEFAULT_RANDOM_LEN;
use crate::crypto::suite::CipherSuite;
use crate::error::{HandshakeError, Result};
use crate::protocol::message::ProtocolVersion;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_ID_LEN: usize = 16;
pub const DEFAULT_PRE_MASTER_SECRET_LEN: usize = 48;

/// Negotiation parameters shared by both roles of a session.
///
/// Lengths are in raw bytes; their hex renderings are twice as long.
///
/// 会话双方共享的协商参数。长度以原始字节计。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandshakeConfig {
    /// Client preference order, highest first. May be empty here; sending a
    /// hello with no suites is rejected by the initiator.
    pub cipher_suites: Vec<CipherSuite>,
    pub protocol_version: ProtocolVersion,
    pub nonce_len: usize,
    pub session_id_len: usize,
    pub pre_master_secret_len: usize,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            cipher_suites: CipherSuite::ALL.to_vec(),
            protocol_version: ProtocolVersion::default(),
            nonce_len: DEFAULT_RANDOM_LEN,
            session_id_len: DEFAULT_SESSION_ID_LEN,
            pre_master_secret_len: DEFAULT_PRE_MASTER_SECRET_LEN,
        }
    }
}

impl HandshakeConfig {
    pub fn builder() -> HandshakeConfigBuilder {
        HandshakeConfigBuilder::new()
    }

    /// Loads a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every length is positive.
    pub fn validate(&self) -> Result<()> {
        for (name, len) in [
            ("nonce_len", self.nonce_len),
            ("session_id_len", self.session_id_len),
            ("pre_master_secret_len", self.pre_master_secret_len),
        ] {
            if len == 0 {
                return Err(HandshakeError::InvalidArgument(format!(
                    "{name} must be positive"
                )));
            }
        }
        Ok(())
    }
}

/// A builder for [`HandshakeConfig`], starting from the defaults.
///
/// 用于构建 [`HandshakeConfig`] 的构建器，以默认值为起点。
#[derive(Debug, Default)]
pub struct HandshakeConfigBuilder {
    config: HandshakeConfig,
}

impl HandshakeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cipher_suites(mut self, suites: impl IntoIterator<Item = CipherSuite>) -> Self {
        self.config.cipher_suites = suites.into_iter().collect();
        self
    }

    pub fn protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.config.protocol_version = version;
        self
    }

    pub fn nonce_len(mut self, len: usize) -> Self {
        self.config.nonce_len = len;
        self
    }

    pub fn session_id_len(mut self, len: usize) -> Self {
        self.config.session_id_len = len;
        self
    }

    pub fn pre_master_secret_len(mut self, len: usize) -> Self {
        self.config.pre_master_secret_len = len;
        self
    }

    /// Builds the configuration, rejecting zero lengths.
    pub fn build(self) -> Result<HandshakeConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_handshake() {
        let config = HandshakeConfig::default();
        assert_eq!(config.cipher_suites, CipherSuite::ALL.to_vec());
        assert_eq!(config.protocol_version, ProtocolVersion::Tls13);
        assert_eq!(
            (config.nonce_len, config.session_id_len, config.pre_master_secret_len),
            (32, 16, 48)
        );
    }

    #[test]
    fn builder_rejects_zero_lengths() {
        assert!(matches!(
            HandshakeConfig::builder().nonce_len(0).build(),
            Err(HandshakeError::InvalidArgument(_))
        ));
        assert!(HandshakeConfig::builder().session_id_len(0).build().is_err());
        assert!(HandshakeConfig::builder().pre_master_secret_len(0).build().is_err());
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() -> Result<()> {
        let config = HandshakeConfig::from_json(
            r#"{ "cipher_suites": ["TLS_AES_256_GCM_SHA384"], "protocol_version": "TLS 1.2 (Legacy)" }"#,
        )?;
        assert_eq!(config.cipher_suites, vec![CipherSuite::TLS_AES_256_GCM_SHA384]);
        assert_eq!(config.protocol_version, ProtocolVersion::Tls12);
        assert_eq!(config.nonce_len, 32);

        assert!(HandshakeConfig::from_json(r#"{ "nonce_len": 0 }"#).is_err());
        assert!(matches!(
            HandshakeConfig::from_json("not json"),
            Err(HandshakeError::SerializationError(_))
        ));
        Ok(())
    }
}
