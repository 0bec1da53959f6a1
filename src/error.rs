use thiserror::Error;

/// An error raised when a caller breaks a local handshake contract.
///
/// Every variant is detected synchronously, before any state is mutated.
///
/// 调用方违反本地握手约定时产生的错误。
///
/// 所有错误均在修改状态之前同步检测。
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// A length was zero, or a required list was empty.
    ///
    /// 长度为零，或必需的列表为空。
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A role object was used before its precondition artifact existed.
    ///
    /// 角色对象在其前置条件产物存在之前被调用。
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A session trigger was invoked from the wrong stage.
    ///
    /// 会话触发器在错误的阶段被调用。
    #[error("trigger `{trigger}` is not valid at stage {stage}")]
    InvalidTransition { trigger: &'static str, stage: u8 },

    /// The responder received a structurally malformed message.
    ///
    /// 响应方收到了结构错误的消息。
    #[error("received an invalid message: {0}")]
    InvalidInput(String),

    #[error("serialization or deserialization failed: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HandshakeError>;
