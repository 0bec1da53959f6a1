//! Defines the stages of the handshake session state machine.
//!
//! Each stage carries exactly the artifacts that exist at that point, so a
//! later stage can never be observed without the messages that lead to it.
//!
//! 定义握手会话状态机的各个阶段。
//!
//! 每个阶段只携带在该时刻已经存在的产物。

use crate::protocol::message::{ClientHello, PreMasterSecret, ServerHello};
use std::fmt;

/// The position of a session in its linear handshake progression.
///
/// 会话在其线性握手流程中的位置。
#[derive(Debug, Clone, Default)]
pub enum Stage {
    /// Stage 0: nothing has been exchanged.
    #[default]
    Idle,
    /// Stage 1: the initiator has sent its hello.
    ClientHelloSent { client_hello: ClientHello },
    /// Stage 2: the responder has answered.
    ServerHelloReceived {
        client_hello: ClientHello,
        server_hello: ServerHello,
    },
    /// Stage 3: client key exchange and change cipher spec.
    KeyExchanged {
        client_hello: ClientHello,
        server_hello: ServerHello,
        pre_master_secret: PreMasterSecret,
    },
    /// Stage 4: secure channel established.
    Established {
        client_hello: ClientHello,
        server_hello: ServerHello,
        pre_master_secret: PreMasterSecret,
    },
}

impl Stage {
    /// The numeric stage, 0 through 4.
    pub fn index(&self) -> u8 {
        match self {
            Stage::Idle => 0,
            Stage::ClientHelloSent { .. } => 1,
            Stage::ServerHelloReceived { .. } => 2,
            Stage::KeyExchanged { .. } => 3,
            Stage::Established { .. } => 4,
        }
    }

    pub fn client_hello(&self) -> Option<&ClientHello> {
        match self {
            Stage::Idle => None,
            Stage::ClientHelloSent { client_hello }
            | Stage::ServerHelloReceived { client_hello, .. }
            | Stage::KeyExchanged { client_hello, .. }
            | Stage::Established { client_hello, .. } => Some(client_hello),
        }
    }

    pub fn server_hello(&self) -> Option<&ServerHello> {
        match self {
            Stage::Idle | Stage::ClientHelloSent { .. } => None,
            Stage::ServerHelloReceived { server_hello, .. }
            | Stage::KeyExchanged { server_hello, .. }
            | Stage::Established { server_hello, .. } => Some(server_hello),
        }
    }

    pub fn pre_master_secret(&self) -> Option<&PreMasterSecret> {
        match self {
            Stage::KeyExchanged {
                pre_master_secret, ..
            }
            | Stage::Established {
                pre_master_secret, ..
            } => Some(pre_master_secret),
            _ => None,
        }
    }

    pub fn is_established(&self) -> bool {
        matches!(self, Stage::Established { .. })
    }
}

/// Coarse connection status for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Handshaking,
    Connected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Handshaking => f.write_str("Handshaking..."),
            ConnectionStatus::Connected => f.write_str("Connected"),
        }
    }
}

/// The external triggers that drive a handshake session.
///
/// 驱动握手会话的外部触发器。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Begin,
    Respond,
    ExchangeKeys,
    Finalize,
    SendSecureMessage,
}

impl Trigger {
    pub fn name(&self) -> &'static str {
        match self {
            Trigger::Begin => "begin",
            Trigger::Respond => "respond",
            Trigger::ExchangeKeys => "exchange_keys",
            Trigger::Finalize => "finalize",
            Trigger::SendSecureMessage => "send_secure_message",
        }
    }

    /// The only stage this trigger is valid from.
    pub fn source_stage(&self) -> u8 {
        match self {
            Trigger::Begin => 0,
            Trigger::Respond => 1,
            Trigger::ExchangeKeys => 2,
            Trigger::Finalize => 3,
            Trigger::SendSecureMessage => 4,
        }
    }
}

impl Stage {
    /// Whether `trigger` may fire from this stage.
    pub fn accepts(&self, trigger: Trigger) -> bool {
        self.index() == trigger.source_stage()
    }
}
