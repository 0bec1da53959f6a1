//! Implements the client side (initiator) of the handshake.
//! 实现握手的客户端（发起方）。

use crate::config::HandshakeConfig;
use crate::crypto::random;
use crate::crypto::suite::CipherSuite;
use crate::error::{HandshakeError, Result};
use crate::protocol::message::{ClientHello, PreMasterSecret, ProtocolVersion};
use log::debug;

/// The client-side negotiation role.
///
/// Owns its nonce, session identifier and offered suites. Each call to
/// [`send_hello`](Self::send_hello) is a fresh attempt with fresh random values.
///
/// 客户端协商角色。
///
/// 持有自己的随机数、会话标识符和提供的密码套件。
/// 每次调用 [`send_hello`](Self::send_hello) 都是一次使用新随机值的全新尝试。
#[derive(Debug, Clone)]
pub struct Initiator {
    /// The nonce of the most recent hello.
    ///
    /// 最近一次 hello 使用的随机数。
    chosen_nonce: Option<String>,
    /// The session identifier of the most recent hello.
    ///
    /// 最近一次 hello 使用的会话标识符。
    session_id: Option<String>,
    /// Suites to offer, highest preference first.
    ///
    /// 要提供的密码套件，优先级从高到低。
    offered_cipher_suites: Vec<CipherSuite>,
    protocol_version: ProtocolVersion,
    nonce_len: usize,
    session_id_len: usize,
    pre_master_secret_len: usize,
}

impl Initiator {
    /// Creates an initiator from a configuration, rejecting zero lengths.
    pub fn new(config: &HandshakeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: &HandshakeConfig) -> Self {
        Self {
            chosen_nonce: None,
            session_id: None,
            offered_cipher_suites: config.cipher_suites.clone(),
            protocol_version: config.protocol_version,
            nonce_len: config.nonce_len,
            session_id_len: config.session_id_len,
            pre_master_secret_len: config.pre_master_secret_len,
        }
    }

    /// Replaces the preference list used by the next hello.
    pub fn set_offered_cipher_suites(&mut self, suites: impl IntoIterator<Item = CipherSuite>) {
        self.offered_cipher_suites = suites.into_iter().collect();
    }

    pub fn offered_cipher_suites(&self) -> &[CipherSuite] {
        &self.offered_cipher_suites
    }

    pub fn protocol_version(&self) -> ProtocolVersion {
        self.protocol_version
    }

    pub fn chosen_nonce(&self) -> Option<&str> {
        self.chosen_nonce.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Builds a `ClientHello` with a fresh nonce and session identifier.
    ///
    /// Fails with [`HandshakeError::InvalidState`] when no suites are configured,
    /// leaving the initiator untouched.
    ///
    /// 使用新的随机数和会话标识符构建 `ClientHello`。
    ///
    /// 未配置任何密码套件时返回 [`HandshakeError::InvalidState`]，发起方状态保持不变。
    pub fn send_hello(&mut self) -> Result<ClientHello> {
        if self.offered_cipher_suites.is_empty() {
            return Err(HandshakeError::InvalidState(
                "initiator has no cipher suites to offer".into(),
            ));
        }

        let nonce = random::generate(self.nonce_len)?;
        let session_id = random::generate(self.session_id_len)?;

        let hello = ClientHello::new(
            self.protocol_version,
            nonce.clone(),
            session_id.clone(),
            self.offered_cipher_suites.clone(),
        );

        debug!(
            "ClientHello: session {session_id}, offering {} suite(s)",
            self.offered_cipher_suites.len()
        );
        self.chosen_nonce = Some(nonce);
        self.session_id = Some(session_id);

        Ok(hello)
    }

    /// Draws a fresh pre-master secret for the client key exchange.
    ///
    /// Ordering against the server hello is enforced by the session, not here.
    pub fn compute_pre_master_secret(&self) -> Result<PreMasterSecret> {
        let secret = PreMasterSecret::new(random::generate(self.pre_master_secret_len)?);
        debug!("ClientKeyExchange: pre-master secret {secret:?}");
        Ok(secret)
    }

    /// Forgets the values of the last hello.
    pub(crate) fn clear(&mut self) {
        self.chosen_nonce = None;
        self.session_id = None;
    }
}

impl Default for Initiator {
    fn default() -> Self {
        Self::from_validated(&HandshakeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_uses_configured_lengths() -> Result<()> {
        let config = HandshakeConfig::builder()
            .nonce_len(8)
            .session_id_len(4)
            .pre_master_secret_len(12)
            .build()?;
        let mut initiator = Initiator::new(&config)?;

        let hello = initiator.send_hello()?;
        assert_eq!(hello.client_nonce().len(), 16);
        assert_eq!(hello.session_id().len(), 8);
        assert_eq!(initiator.compute_pre_master_secret()?.as_hex().len(), 24);
        Ok(())
    }

    #[test]
    fn state_records_the_last_hello() -> Result<()> {
        let mut initiator = Initiator::default();
        assert!(initiator.chosen_nonce().is_none());

        let hello = initiator.send_hello()?;
        assert_eq!(initiator.chosen_nonce(), Some(hello.client_nonce()));
        assert_eq!(initiator.session_id(), Some(hello.session_id()));

        initiator.clear();
        assert!(initiator.session_id().is_none());
        Ok(())
    }

    #[test]
    fn empty_suite_list_is_invalid_state_without_mutation() -> Result<()> {
        let mut initiator = Initiator::default();
        let first = initiator.send_hello()?;

        initiator.set_offered_cipher_suites(Vec::new());
        assert!(matches!(
            initiator.send_hello(),
            Err(HandshakeError::InvalidState(_))
        ));
        assert_eq!(initiator.chosen_nonce(), Some(first.client_nonce()));
        Ok(())
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = HandshakeConfig {
            session_id_len: 0,
            ..HandshakeConfig::default()
        };
        assert!(matches!(
            Initiator::new(&config),
            Err(HandshakeError::InvalidArgument(_))
        ));
    }
}
