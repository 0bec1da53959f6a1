//! Random value generation for nonces, session identifiers and secrets.
//!
//! This is the only source of entropy in the crate. Values are drawn from the
//! operating system CSPRNG and rendered as lowercase hexadecimal text.
//!
//! 随机值生成，用于随机数、会话标识符与密钥。
//!
//! 这是本 crate 中唯一的熵源。数值取自操作系统的 CSPRNG，并以小写十六进制文本呈现。

use crate::error::{HandshakeError, Result};
use log::trace;
use rand::RngCore;
use rand::rngs::OsRng;

/// Default number of random bytes drawn by [`generate_default`].
pub const DEFAULT_RANDOM_LEN: usize = 32;

/// Draws `len` random bytes and returns them hex encoded.
///
/// The returned string is always exactly `2 * len` characters long.
/// A `len` of zero is a caller error.
///
/// 抽取 `len` 个随机字节并以十六进制编码返回。
///
/// 返回的字符串长度恒为 `2 * len`。`len` 为零属于调用方错误。
pub fn generate(len: usize) -> Result<String> {
    if len == 0 {
        return Err(HandshakeError::InvalidArgument(
            "random value length must be positive".into(),
        ));
    }

    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    trace!("drew {len} random bytes");

    Ok(hex::encode(bytes))
}

/// Same as [`generate`] with [`DEFAULT_RANDOM_LEN`] bytes.
pub fn generate_default() -> Result<String> {
    generate(DEFAULT_RANDOM_LEN)
}
