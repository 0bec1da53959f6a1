//! Manages the hashing of the handshake transcript.
//!
//! Every artifact is serialized to JSON and fed into a running SHA-256, so two
//! sessions that exchanged the same artifacts report the same digest.
//!
//! 管理握手记录的哈希计算。
//!
//! 每个产物先序列化为 JSON，再输入到持续的 SHA-256 中。
use crate::error::Result;
use crate::protocol::message::HandshakeMessage;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct Transcript {
    hasher: Sha256,
    messages: usize,
}

impl Transcript {
    /// Creates a new, empty transcript.
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
            messages: 0,
        }
    }

    /// Updates the transcript with a handshake message.
    ///
    /// 使用握手消息更新握手记录。
    pub fn update(&mut self, message: &HandshakeMessage<'_>) -> Result<()> {
        let bytes = serde_json::to_vec(message)?;
        self.hasher.update(&bytes);
        self.messages += 1;
        Ok(())
    }

    /// Returns the current hash without consuming the transcript.
    ///
    /// 返回当前的哈希值，而不会消耗握手记录。
    pub fn current_hash(&self) -> Vec<u8> {
        self.hasher.clone().finalize().to_vec()
    }

    pub fn current_hash_hex(&self) -> String {
        hex::encode(self.current_hash())
    }

    /// Number of messages absorbed so far.
    pub fn len(&self) -> usize {
        self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages == 0
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
