//! Defines the artifacts exchanged during the simulated handshake.
//!
//! Every message is an immutable value: fields are only readable through
//! accessors. Serialization uses the field names and string-typed enums a
//! display layer expects.
//!
//! 定义模拟握手过程中交换的产物。
//!
//! 所有消息都是不可变值：字段只能通过访问器读取。

use crate::crypto::certificate::Certificate;
use crate::crypto::suite::CipherSuite;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "Client Hello")]
    ClientHello,
    #[serde(rename = "Server Hello")]
    ServerHello,
}

/// The protocol version a hello advertises.
///
/// 握手消息所声明的协议版本。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProtocolVersion {
    #[default]
    #[serde(rename = "TLS 1.3")]
    Tls13,
    #[serde(rename = "TLS 1.2 (Legacy)")]
    Tls12,
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::Tls13 => f.write_str("TLS 1.3"),
            ProtocolVersion::Tls12 => f.write_str("TLS 1.2 (Legacy)"),
        }
    }
}

/// Client -> Server: opens the handshake and advertises cipher suites.
///
/// 客户端 -> 服务器：发起握手并声明支持的密码套件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientHello {
    message_type: MessageType,
    protocol_version: ProtocolVersion,
    client_nonce: String,
    session_id: String,
    offered_cipher_suites: Vec<CipherSuite>,
}

impl ClientHello {
    /// Assembles a hello from raw parts without validating them.
    ///
    /// Used for hellos that do not come from an [`Initiator`](crate::handshake::client::Initiator),
    /// e.g. ones decoded from an untrusted peer.
    pub fn new(
        protocol_version: ProtocolVersion,
        client_nonce: String,
        session_id: String,
        offered_cipher_suites: Vec<CipherSuite>,
    ) -> Self {
        Self {
            message_type: MessageType::ClientHello,
            protocol_version,
            client_nonce,
            session_id,
            offered_cipher_suites,
        }
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn protocol_version(&self) -> ProtocolVersion {
        self.protocol_version
    }

    pub fn client_nonce(&self) -> &str {
        &self.client_nonce
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Offered suites, highest preference first.
    pub fn offered_cipher_suites(&self) -> &[CipherSuite] {
        &self.offered_cipher_suites
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Server -> Client: answers a [`ClientHello`] with the selected suite and a certificate.
///
/// Only a [`Responder`](crate::handshake::server::Responder) builds one.
///
/// 服务器 -> 客户端：以选定的密码套件和证书回应 [`ClientHello`]。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerHello {
    message_type: MessageType,
    protocol_version: ProtocolVersion,
    server_nonce: String,
    selected_cipher_suite: CipherSuite,
    certificate: Certificate,
}

impl ServerHello {
    pub(crate) fn new(
        protocol_version: ProtocolVersion,
        server_nonce: String,
        selected_cipher_suite: CipherSuite,
        certificate: Certificate,
    ) -> Self {
        Self {
            message_type: MessageType::ServerHello,
            protocol_version,
            server_nonce,
            selected_cipher_suite,
            certificate,
        }
    }

    pub fn message_type(&self) -> MessageType {
        self.message_type
    }

    pub fn protocol_version(&self) -> ProtocolVersion {
        self.protocol_version
    }

    pub fn server_nonce(&self) -> &str {
        &self.server_nonce
    }

    pub fn selected_cipher_suite(&self) -> CipherSuite {
        self.selected_cipher_suite
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The simulated pre-master secret sent during client key exchange.
///
/// `Debug` only shows a short prefix.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreMasterSecret(String);

impl PreMasterSecret {
    pub(crate) fn new(hex: String) -> Self {
        Self(hex)
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }

    /// The first `chars` characters, for display.
    pub fn preview(&self, chars: usize) -> &str {
        self.0
            .char_indices()
            .nth(chars)
            .map_or(&self.0[..], |(end, _)| &self.0[..end])
    }
}

impl fmt::Debug for PreMasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PreMasterSecret({}...)", self.preview(8))
    }
}

/// Any artifact that enters the handshake transcript.
#[derive(Debug, Clone, Serialize)]
pub enum HandshakeMessage<'a> {
    ClientHello(&'a ClientHello),
    ServerHello(&'a ServerHello),
    ClientKeyExchange(&'a PreMasterSecret),
}
