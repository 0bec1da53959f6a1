//! A simulated server certificate.
//!
//! The certificate is an opaque, PEM-like block of random key material. It is
//! cheap to issue and is never validated.

use crate::crypto::random;
use crate::error::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

const PEM_BEGIN: &str = "-----BEGIN CERTIFICATE-----";
const PEM_END: &str = "-----END CERTIFICATE-----";
/// Roughly the size of a DER encoded RSA-2048 public key.
const KEY_MATERIAL_LEN: usize = 270;
const LINE_WIDTH: usize = 64;

/// An opaque, serializable certificate artifact.
///
/// 不透明、可序列化的证书产物。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Certificate(String);

impl Certificate {
    /// Issues a fresh certificate wrapping newly drawn key material.
    ///
    /// 签发一个包含新生成密钥材料的证书。
    pub fn issue() -> Result<Self> {
        let material = random::generate(KEY_MATERIAL_LEN)?;

        let mut pem = String::with_capacity(material.len() + material.len() / LINE_WIDTH + 64);
        pem.push_str(PEM_BEGIN);
        pem.push('\n');
        // hex output is ASCII, so byte chunks are char boundaries
        for line in material.as_bytes().chunks(LINE_WIDTH) {
            pem.push_str(&String::from_utf8_lossy(line));
            pem.push('\n');
        }
        pem.push_str(PEM_END);

        let certificate = Self(pem);
        debug!("issued simulated certificate {}", certificate.fingerprint());
        Ok(certificate)
    }

    /// Wraps existing text as a certificate without inspecting it.
    pub fn from_pem(pem: impl Into<String>) -> Self {
        Self(pem.into())
    }

    pub fn as_pem(&self) -> &str {
        &self.0
    }

    /// SHA-256 over the certificate text, hex encoded.
    ///
    /// 证书文本的 SHA-256 指纹（十六进制）。
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_certificate_is_pem_shaped() -> Result<()> {
        let cert = Certificate::issue()?;
        let lines: Vec<&str> = cert.as_pem().lines().collect();

        assert_eq!(lines.first(), Some(&PEM_BEGIN));
        assert_eq!(lines.last(), Some(&PEM_END));
        let body: String = lines[1..lines.len() - 1].concat();
        assert_eq!(body.len(), KEY_MATERIAL_LEN * 2);
        assert!(lines[1..lines.len() - 1].iter().all(|l| l.len() <= LINE_WIDTH));
        Ok(())
    }

    #[test]
    fn each_issue_is_unique() -> Result<()> {
        let a = Certificate::issue()?;
        let b = Certificate::issue()?;
        assert_ne!(a, b);
        assert_ne!(a.fingerprint(), b.fingerprint());
        Ok(())
    }

    #[test]
    fn fingerprint_is_stable() {
        let cert = Certificate::from_pem("fixed");
        assert_eq!(cert.fingerprint(), cert.clone().fingerprint());
        assert_eq!(cert.fingerprint().len(), 64);
    }
}
