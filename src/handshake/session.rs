//! The handshake session: drives both roles through the fixed stage sequence.
//!
//! A session owns one [`Initiator`], one [`Responder`] and the artifacts they
//! produced. Every trigger first checks the current stage and only then
//! generates anything, so a rejected trigger leaves the session exactly as it
//! was.
//!
//! 握手会话：按固定的阶段顺序驱动双方角色。
//!
//! 每个触发器都先检查当前阶段，然后才生成产物，因此被拒绝的触发器不会改变会话。

use crate::config::HandshakeConfig;
use crate::crypto::display::simulate_encryption;
use crate::crypto::suite::CipherSuite;
use crate::error::{HandshakeError, Result};
use crate::handshake::client::Initiator;
use crate::handshake::server::Responder;
use crate::protocol::message::{ClientHello, HandshakeMessage, PreMasterSecret, ServerHello};
use crate::protocol::state::{ConnectionStatus, Stage, Trigger};
use crate::protocol::transcript::Transcript;
use log::{debug, info, warn};

const SERVER_ACK: &str = "I received your secure message!";

/// The artifact produced by one call to [`HandshakeSession::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    ClientHello(ClientHello),
    ServerHello(ServerHello),
    PreMasterSecret(PreMasterSecret),
    /// The channel is up, using this suite.
    Established(CipherSuite),
}

/// One application message sent over the established channel.
///
/// 通过已建立的通道发送的一条应用消息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecureExchange {
    pub plaintext: String,
    /// What an observer on the network would see.
    pub network_view: String,
    pub reply: String,
    pub cipher_suite: CipherSuite,
}

/// A single handshake attempt between an initiator and a responder.
///
/// The stage only ever moves 0 → 1 → 2 → 3 → 4, or back to 0 through
/// [`reset`](Self::reset). Sessions are independent values; use one per
/// concurrent attempt.
///
/// 发起方与响应方之间的一次握手尝试。
///
/// 阶段只会按 0 → 1 → 2 → 3 → 4 前进，或通过 [`reset`](Self::reset) 回到 0。
#[derive(Debug)]
pub struct HandshakeSession {
    stage: Stage,
    initiator: Initiator,
    responder: Responder,
    /// Running digest over every artifact of the current attempt.
    ///
    /// 当前尝试中所有产物的持续摘要。
    transcript: Transcript,
}

impl HandshakeSession {
    /// Creates a session whose roles share `config`.
    pub fn new(config: &HandshakeConfig) -> Result<Self> {
        let initiator = Initiator::new(config)?;
        let responder = Responder::builder().config(config).build()?;
        Self::with_roles(initiator, responder)
    }

    /// Creates a session from separately configured roles.
    ///
    /// Both roles must speak the same protocol version.
    ///
    /// 由分别配置的角色创建会话。双方必须使用相同的协议版本。
    pub fn with_roles(initiator: Initiator, responder: Responder) -> Result<Self> {
        if initiator.protocol_version() != responder.protocol_version() {
            return Err(HandshakeError::InvalidArgument(format!(
                "initiator speaks {} but responder speaks {}",
                initiator.protocol_version(),
                responder.protocol_version()
            )));
        }
        Ok(Self::from_parts(initiator, responder))
    }

    fn from_parts(initiator: Initiator, responder: Responder) -> Self {
        Self {
            stage: Stage::Idle,
            initiator,
            responder,
            transcript: Transcript::new(),
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The numeric stage, 0 through 4.
    pub fn stage_index(&self) -> u8 {
        self.stage.index()
    }

    pub fn status(&self) -> ConnectionStatus {
        if self.stage.is_established() {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Handshaking
        }
    }

    pub fn client_hello(&self) -> Option<&ClientHello> {
        self.stage.client_hello()
    }

    pub fn server_hello(&self) -> Option<&ServerHello> {
        self.stage.server_hello()
    }

    pub fn pre_master_secret(&self) -> Option<&PreMasterSecret> {
        self.stage.pre_master_secret()
    }

    /// The suite chosen by the responder, once its hello exists.
    pub fn negotiated_cipher_suite(&self) -> Option<CipherSuite> {
        self.server_hello().map(ServerHello::selected_cipher_suite)
    }

    pub fn initiator(&self) -> &Initiator {
        &self.initiator
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    /// Hex SHA-256 over the artifacts exchanged so far.
    pub fn transcript_hash(&self) -> String {
        self.transcript.current_hash_hex()
    }

    /// Changes the suites the initiator offers; applies from the next `begin`.
    pub fn set_cipher_suites(&mut self, suites: impl IntoIterator<Item = CipherSuite>) {
        self.initiator.set_offered_cipher_suites(suites);
    }

    /// Runs whichever trigger is next for the current stage.
    ///
    /// At stage 4 there is nothing left to advance and an
    /// [`HandshakeError::InvalidTransition`] is returned.
    ///
    /// 执行当前阶段对应的下一个触发器。
    pub fn advance(&mut self) -> Result<Artifact> {
        match self.stage {
            Stage::Idle => self.begin().map(Artifact::ClientHello),
            Stage::ClientHelloSent { .. } => self.respond().map(Artifact::ServerHello),
            Stage::ServerHelloReceived { .. } => {
                self.exchange_keys().map(Artifact::PreMasterSecret)
            }
            Stage::KeyExchanged { .. } => self.finalize().map(Artifact::Established),
            Stage::Established { .. } => {
                warn!("advance called on an established session");
                Err(HandshakeError::InvalidTransition {
                    trigger: "advance",
                    stage: self.stage.index(),
                })
            }
        }
    }

    /// Stage 0 → 1: the initiator sends its `ClientHello`.
    ///
    /// 阶段 0 → 1：发起方发送 `ClientHello`。
    pub fn begin(&mut self) -> Result<ClientHello> {
        self.ensure(Trigger::Begin)?;

        let client_hello = self.initiator.send_hello()?;
        let mut transcript = self.transcript.clone();
        transcript.update(&HandshakeMessage::ClientHello(&client_hello))?;

        self.commit(
            Stage::ClientHelloSent {
                client_hello: client_hello.clone(),
            },
            transcript,
        );
        Ok(client_hello)
    }

    /// Stage 1 → 2: the responder answers the stored `ClientHello`.
    ///
    /// 阶段 1 → 2：响应方回应已存储的 `ClientHello`。
    pub fn respond(&mut self) -> Result<ServerHello> {
        let client_hello = match &self.stage {
            Stage::ClientHelloSent { client_hello } => client_hello.clone(),
            _ => return Err(self.reject(Trigger::Respond)),
        };

        let server_hello = self.responder.receive_hello(client_hello.clone())?;
        let mut transcript = self.transcript.clone();
        transcript.update(&HandshakeMessage::ServerHello(&server_hello))?;

        self.commit(
            Stage::ServerHelloReceived {
                client_hello,
                server_hello: server_hello.clone(),
            },
            transcript,
        );
        Ok(server_hello)
    }

    /// Stage 2 → 3: client key exchange and change cipher spec.
    ///
    /// 阶段 2 → 3：客户端密钥交换与变更密码规范。
    pub fn exchange_keys(&mut self) -> Result<PreMasterSecret> {
        let (client_hello, server_hello) = match &self.stage {
            Stage::ServerHelloReceived {
                client_hello,
                server_hello,
            } => (client_hello.clone(), server_hello.clone()),
            _ => return Err(self.reject(Trigger::ExchangeKeys)),
        };

        let pre_master_secret = self.initiator.compute_pre_master_secret()?;
        let mut transcript = self.transcript.clone();
        transcript.update(&HandshakeMessage::ClientKeyExchange(&pre_master_secret))?;

        self.commit(
            Stage::KeyExchanged {
                client_hello,
                server_hello,
                pre_master_secret: pre_master_secret.clone(),
            },
            transcript,
        );
        Ok(pre_master_secret)
    }

    /// Stage 3 → 4: the secure channel is established.
    ///
    /// Returns the negotiated cipher suite.
    pub fn finalize(&mut self) -> Result<CipherSuite> {
        let (established, suite) = match &self.stage {
            Stage::KeyExchanged {
                client_hello,
                server_hello,
                pre_master_secret,
            } => (
                Stage::Established {
                    client_hello: client_hello.clone(),
                    server_hello: server_hello.clone(),
                    pre_master_secret: pre_master_secret.clone(),
                },
                server_hello.selected_cipher_suite(),
            ),
            _ => return Err(self.reject(Trigger::Finalize)),
        };

        let transcript = self.transcript.clone();
        self.commit(established, transcript);
        info!("secure channel established using {suite}");
        Ok(suite)
    }

    /// Sends application data over the established channel.
    ///
    /// Only valid at stage 4, and never changes the stage.
    ///
    /// 通过已建立的通道发送应用数据。仅在阶段 4 有效，且不会改变阶段。
    pub fn send_secure_message(&self, plaintext: &str) -> Result<SecureExchange> {
        let cipher_suite = match &self.stage {
            Stage::Established { server_hello, .. } => server_hello.selected_cipher_suite(),
            _ => return Err(self.reject(Trigger::SendSecureMessage)),
        };

        let network_view = simulate_encryption(plaintext);
        debug!("application data over {cipher_suite}: {network_view}");

        Ok(SecureExchange {
            plaintext: plaintext.to_owned(),
            network_view,
            reply: SERVER_ACK.to_owned(),
            cipher_suite,
        })
    }

    /// Returns to stage 0 from any stage, discarding every artifact.
    ///
    /// 从任意阶段回到阶段 0，并丢弃所有产物。
    pub fn reset(&mut self) {
        debug!("session reset from stage {}", self.stage.index());
        self.stage = Stage::Idle;
        self.transcript = Transcript::new();
        self.initiator.clear();
        self.responder.clear();
    }

    fn ensure(&self, trigger: Trigger) -> Result<()> {
        if self.stage.accepts(trigger) {
            Ok(())
        } else {
            Err(self.reject(trigger))
        }
    }

    fn reject(&self, trigger: Trigger) -> HandshakeError {
        let stage = self.stage.index();
        warn!("rejected `{}` at stage {stage}", trigger.name());
        HandshakeError::InvalidTransition {
            trigger: trigger.name(),
            stage,
        }
    }

    fn commit(&mut self, next: Stage, transcript: Transcript) {
        debug!("stage {} -> {}", self.stage.index(), next.index());
        self.stage = next;
        self.transcript = transcript;
    }
}

impl Default for HandshakeSession {
    fn default() -> Self {
        Self::from_parts(Initiator::default(), Responder::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::message::ProtocolVersion;

    fn at_stage(n: u8) -> Result<HandshakeSession> {
        let mut session = HandshakeSession::default();
        for _ in 0..n {
            session.advance()?;
        }
        assert_eq!(session.stage_index(), n);
        Ok(session)
    }

    fn snapshot(session: &HandshakeSession) -> (u8, Option<ClientHello>, Option<ServerHello>, String) {
        (
            session.stage_index(),
            session.client_hello().cloned(),
            session.server_hello().cloned(),
            session.transcript_hash(),
        )
    }

    fn fire(session: &mut HandshakeSession, trigger: Trigger) -> Result<()> {
        match trigger {
            Trigger::Begin => session.begin().map(drop),
            Trigger::Respond => session.respond().map(drop),
            Trigger::ExchangeKeys => session.exchange_keys().map(drop),
            Trigger::Finalize => session.finalize().map(drop),
            Trigger::SendSecureMessage => session.send_secure_message("ping").map(drop),
        }
    }

    #[test]
    fn out_of_order_triggers_leave_the_session_untouched() -> Result<()> {
        let _ = env_logger::try_init();
        let triggers = [
            Trigger::Begin,
            Trigger::Respond,
            Trigger::ExchangeKeys,
            Trigger::Finalize,
        ];

        for stage in 0..=4u8 {
            for trigger in triggers {
                if trigger.source_stage() == stage {
                    continue;
                }
                let mut session = at_stage(stage)?;
                let before = snapshot(&session);

                let result = fire(&mut session, trigger);
                assert!(
                    matches!(result, Err(HandshakeError::InvalidTransition { stage: s, .. }) if s == stage),
                    "{trigger:?} should be rejected at stage {stage}"
                );
                assert_eq!(snapshot(&session), before);
            }
        }
        Ok(())
    }

    #[test]
    fn rejected_trigger_does_not_mutate() -> Result<()> {
        let mut session = at_stage(2)?;
        let before = snapshot(&session);

        assert!(session.begin().is_err());
        assert!(session.respond().is_err());
        assert!(session.finalize().is_err());
        assert!(session.send_secure_message("hi").is_err());
        assert_eq!(snapshot(&session), before);
        Ok(())
    }

    #[test]
    fn advance_walks_the_stages_in_order() -> Result<()> {
        let mut session = HandshakeSession::default();

        assert!(matches!(session.advance()?, Artifact::ClientHello(_)));
        assert!(matches!(session.advance()?, Artifact::ServerHello(_)));
        assert!(matches!(session.advance()?, Artifact::PreMasterSecret(_)));
        assert_eq!(
            session.advance()?,
            Artifact::Established(CipherSuite::TLS_AES_128_GCM_SHA256)
        );
        assert!(matches!(
            session.advance(),
            Err(HandshakeError::InvalidTransition { trigger: "advance", stage: 4 })
        ));
        assert_eq!(session.status(), ConnectionStatus::Connected);
        Ok(())
    }

    #[test]
    fn reset_from_every_stage_returns_to_idle() -> Result<()> {
        for stage in 0..=4 {
            let mut session = at_stage(stage)?;
            session.reset();

            assert_eq!(session.stage_index(), 0);
            assert!(session.client_hello().is_none());
            assert!(session.server_hello().is_none());
            assert!(session.pre_master_secret().is_none());
            assert!(session.initiator().chosen_nonce().is_none());
            assert!(session.responder().certificate().is_none());
            assert_eq!(session.transcript_hash(), Transcript::new().current_hash_hex());
        }
        Ok(())
    }

    #[test]
    fn secure_message_keeps_the_stage() -> Result<()> {
        let mut session = at_stage(4)?;
        let exchange = session.send_secure_message("hello server")?;

        assert_eq!(exchange.plaintext, "hello server");
        assert_eq!(exchange.network_view, simulate_encryption("hello server"));
        assert_eq!(exchange.reply, SERVER_ACK);
        assert_eq!(exchange.cipher_suite, CipherSuite::TLS_AES_128_GCM_SHA256);
        session.send_secure_message("again")?;
        assert_eq!(session.stage_index(), 4);
        Ok(())
    }

    #[test]
    fn transcript_grows_with_each_artifact() -> Result<()> {
        let mut session = HandshakeSession::default();
        let mut seen = vec![session.transcript_hash()];
        for _ in 0..3 {
            session.advance()?;
            let hash = session.transcript_hash();
            assert!(!seen.contains(&hash));
            seen.push(hash);
        }
        session.finalize()?;
        assert_eq!(session.transcript_hash(), seen[3]);
        Ok(())
    }

    #[test]
    fn roles_must_share_a_protocol_version() -> Result<()> {
        let legacy = HandshakeConfig::builder()
            .protocol_version(ProtocolVersion::Tls12)
            .build()?;
        let initiator = Initiator::new(&legacy)?;

        assert!(matches!(
            HandshakeSession::with_roles(initiator.clone(), Responder::default()),
            Err(HandshakeError::InvalidArgument(_))
        ));

        let responder = Responder::builder().config(&legacy).build()?;
        let mut session = HandshakeSession::with_roles(initiator, responder)?;
        assert_eq!(session.begin()?.protocol_version(), ProtocolVersion::Tls12);
        assert_eq!(session.respond()?.protocol_version(), ProtocolVersion::Tls12);
        Ok(())
    }

    #[test]
    fn empty_suite_list_fails_begin_and_stays_idle() {
        let mut session = HandshakeSession::default();
        session.set_cipher_suites(Vec::new());

        assert!(matches!(session.begin(), Err(HandshakeError::InvalidState(_))));
        assert_eq!(session.stage_index(), 0);
        assert!(session.client_hello().is_none());
    }
}
