//! Cipher-suite identifiers and the responder's selection policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of cipher suites a peer may offer.
///
/// Serialized as the IANA-style identifier string.
///
/// 对端可提供的密码套件的封闭集合。
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherSuite {
    TLS_AES_128_GCM_SHA256,
    TLS_AES_256_GCM_SHA384,
    TLS_CHACHA20_POLY1305_SHA256,
}

impl CipherSuite {
    /// Every known suite in default client preference order.
    pub const ALL: [CipherSuite; 3] = [
        CipherSuite::TLS_AES_128_GCM_SHA256,
        CipherSuite::TLS_AES_256_GCM_SHA384,
        CipherSuite::TLS_CHACHA20_POLY1305_SHA256,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CipherSuite::TLS_AES_128_GCM_SHA256 => "TLS_AES_128_GCM_SHA256",
            CipherSuite::TLS_AES_256_GCM_SHA384 => "TLS_AES_256_GCM_SHA384",
            CipherSuite::TLS_CHACHA20_POLY1305_SHA256 => "TLS_CHACHA20_POLY1305_SHA256",
        }
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherSuite {
    type Err = crate::error::HandshakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CipherSuite::ALL
            .into_iter()
            .find(|suite| suite.as_str() == s)
            .ok_or_else(|| {
                crate::error::HandshakeError::InvalidArgument(format!("unknown cipher suite `{s}`"))
            })
    }
}

/// Chooses one suite out of a client's offered list.
///
/// Implementations receive a non-empty list; the caller rejects empty offers
/// before selection.
///
/// 从客户端提供的列表中选出一个密码套件。
///
/// 实现方收到的列表保证非空；空列表在选择之前即被调用方拒绝。
pub trait CipherSuiteSelector: fmt::Debug + Send + Sync {
    fn select(&self, offered: &[CipherSuite]) -> Option<CipherSuite>;
}

/// The default policy: the client's first preference always wins.
///
/// This trusts client ordering outright and ignores any server preference.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstOffered;

impl CipherSuiteSelector for FirstOffered {
    fn select(&self, offered: &[CipherSuite]) -> Option<CipherSuite> {
        offered.first().copied()
    }
}
