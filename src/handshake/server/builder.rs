use super::Responder;
use crate::config::HandshakeConfig;
use crate::crypto::certificate::Certificate;
use crate::crypto::suite::{CipherSuiteSelector, FirstOffered};
use crate::error::Result;
use crate::protocol::message::ProtocolVersion;
use std::sync::Arc;

/// A builder for creating a [`Responder`].
///
/// Every field has a default: TLS 1.3, 32-byte nonces, first-offered suite
/// selection and a freshly issued certificate per hello.
///
/// 用于创建 [`Responder`] 的构建器。
///
/// 所有字段都有默认值：TLS 1.3、32 字节随机数、优先选择客户端首选套件，
/// 以及每次 hello 签发新证书。
#[derive(Debug)]
pub struct ResponderBuilder {
    config: HandshakeConfig,
    selector: Arc<dyn CipherSuiteSelector>,
    certificate: Option<Certificate>,
}

impl ResponderBuilder {
    pub fn new() -> Self {
        Self {
            config: HandshakeConfig::default(),
            selector: Arc::new(FirstOffered),
            certificate: None,
        }
    }

    /// Takes the protocol version and nonce length from a session configuration.
    ///
    /// 从会话配置中获取协议版本与随机数长度。
    pub fn config(mut self, config: &HandshakeConfig) -> Self {
        self.config = config.clone();
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

    /// Replaces the suite selection policy.
    ///
    /// 替换密码套件的选择策略。
    pub fn selector(mut self, selector: impl CipherSuiteSelector + 'static) -> Self {
        self.selector = Arc::new(selector);
        self
    }

    /// Presents this certificate on every hello instead of issuing a new one.
    ///
    /// 在每次 hello 中使用此证书，而不是签发新证书。
    pub fn certificate(mut self, certificate: Certificate) -> Self {
        self.certificate = Some(certificate);
        self
    }

    /// Builds the `Responder`.
    ///
    /// Returns an error if the nonce length is zero.
    ///
    /// 构建 `Responder`。如果随机数长度为零，则返回错误。
    pub fn build(self) -> Result<Responder> {
        self.config.validate()?;

        Ok(Responder {
            chosen_nonce: None,
            selected_cipher_suite: None,
            certificate: None,
            protocol_version: self.config.protocol_version,
            nonce_len: self.config.nonce_len,
            selector: self.selector,
            fixed_certificate: self.certificate,
        })
    }
}

impl Default for ResponderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
