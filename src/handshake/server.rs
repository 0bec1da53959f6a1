//! Implements the server side (responder) of the handshake.
//! 实现握手的服务器端（响应方）。

use crate::crypto::certificate::Certificate;
use crate::crypto::random;
use crate::crypto::suite::{CipherSuite, CipherSuiteSelector};
use crate::error::{HandshakeError, Result};
use crate::protocol::message::{ClientHello, MessageType, ProtocolVersion, ServerHello};
use log::{debug, warn};
use std::sync::Arc;

mod builder;

pub use builder::ResponderBuilder;

/// The server-side negotiation role.
///
/// Consumes a [`ClientHello`] and answers with a [`ServerHello`]. The
/// responder keeps the values of its last answer for inspection.
///
/// 服务器端协商角色。
///
/// 接收 [`ClientHello`] 并以 [`ServerHello`] 回应。响应方会保留最近一次回应的值以供查看。
#[derive(Debug, Clone)]
pub struct Responder {
    chosen_nonce: Option<String>,
    selected_cipher_suite: Option<CipherSuite>,
    certificate: Option<Certificate>,
    protocol_version: ProtocolVersion,
    nonce_len: usize,
    /// Chooses a suite out of the client's offer.
    ///
    /// 从客户端的提供中选择一个套件。
    selector: Arc<dyn CipherSuiteSelector>,
    /// When set, presented instead of issuing a certificate per hello.
    fixed_certificate: Option<Certificate>,
}

impl Responder {
    pub fn builder() -> ResponderBuilder {
        ResponderBuilder::new()
    }

    pub fn chosen_nonce(&self) -> Option<&str> {
        self.chosen_nonce.as_deref()
    }

    pub fn selected_cipher_suite(&self) -> Option<CipherSuite> {
        self.selected_cipher_suite
    }

    pub fn certificate(&self) -> Option<&Certificate> {
        self.certificate.as_ref()
    }

    pub fn protocol_version(&self) -> ProtocolVersion {
        self.protocol_version
    }

    /// Processes a `ClientHello` and composes the `ServerHello`.
    ///
    /// A structurally malformed hello (wrong message type, empty or non-hex
    /// random fields, no suites) is rejected with [`HandshakeError::InvalidInput`]
    /// and the responder is left untouched.
    ///
    /// 处理 `ClientHello` 并组装 `ServerHello`。
    ///
    /// 结构错误的 hello 将以 [`HandshakeError::InvalidInput`] 拒绝，响应方状态保持不变。
    pub fn receive_hello(&mut self, hello: ClientHello) -> Result<ServerHello> {
        if let Err(err) = check_structure(&hello) {
            warn!("rejecting malformed ClientHello: {err}");
            return Err(err);
        }

        let selected = self
            .selector
            .select(hello.offered_cipher_suites())
            .filter(|suite| hello.offered_cipher_suites().contains(suite))
            .ok_or_else(|| {
                HandshakeError::InvalidInput("no acceptable cipher suite offered".into())
            })?;

        let nonce = random::generate(self.nonce_len)?;
        let certificate = match &self.fixed_certificate {
            Some(certificate) => certificate.clone(),
            None => Certificate::issue()?,
        };

        let server_hello = ServerHello::new(
            self.protocol_version,
            nonce.clone(),
            selected,
            certificate.clone(),
        );

        debug!("ServerHello: selected {selected} for session {}", hello.session_id());
        self.chosen_nonce = Some(nonce);
        self.selected_cipher_suite = Some(selected);
        self.certificate = Some(certificate);

        Ok(server_hello)
    }

    /// Forgets the values of the last answer.
    pub(crate) fn clear(&mut self) {
        self.chosen_nonce = None;
        self.selected_cipher_suite = None;
        self.certificate = None;
    }
}

/// Structural checks on a hello that may come from an untrusted peer.
fn check_structure(hello: &ClientHello) -> Result<()> {
    if hello.message_type() != MessageType::ClientHello {
        return Err(HandshakeError::InvalidInput(format!(
            "expected a client hello, got {:?}",
            hello.message_type()
        )));
    }
    for (field, value) in [
        ("client_nonce", hello.client_nonce()),
        ("session_id", hello.session_id()),
    ] {
        if value.is_empty() || hex::decode(value).is_err() {
            return Err(HandshakeError::InvalidInput(format!(
                "{field} is not a non-empty hex string"
            )));
        }
    }
    if hello.offered_cipher_suites().is_empty() {
        return Err(HandshakeError::InvalidInput(
            "client hello offers no cipher suites".into(),
        ));
    }
    Ok(())
}

impl Default for Responder {
    fn default() -> Self {
        Self {
            chosen_nonce: None,
            selected_cipher_suite: None,
            certificate: None,
            protocol_version: ProtocolVersion::default(),
            nonce_len: random::DEFAULT_RANDOM_LEN,
            selector: Arc::new(crate::crypto::suite::FirstOffered),
            fixed_certificate: None,
        }
    }
}
