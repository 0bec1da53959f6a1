//! Display-only rendering of application data as it would appear on the wire.
//!
//! Nothing here encrypts anything. The output only has to be deterministic and
//! must never show the plaintext in clear.

const PREFIX: &str = "ENCRYPTED[";
const SUFFIX: &str = "...]";
const VISIBLE_HEX_CHARS: usize = 20;

/// Renders `plaintext` as an obfuscated, bounded-length network view.
///
/// 将明文渲染为有界长度的混淆“网络视图”。
pub fn simulate_encryption(plaintext: &str) -> String {
    let encoded = hex::encode(plaintext.as_bytes());
    let visible = &encoded[..encoded.len().min(VISIBLE_HEX_CHARS)];
    format!("{PREFIX}{visible}{SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_expected_rendering() {
        assert_eq!(simulate_encryption("hi"), "ENCRYPTED[6869...]");
        assert_eq!(
            simulate_encryption("hello, secure world"),
            "ENCRYPTED[68656c6c6f2c20736563...]"
        );
    }

    #[test]
    fn is_deterministic_and_never_the_input() {
        for input in ["", "a", "ENCRYPTED[...]", "a much longer message than twenty chars"] {
            let view = simulate_encryption(input);
            assert_eq!(view, simulate_encryption(input));
            assert_ne!(view, input);
            assert!(view.len() <= PREFIX.len() + VISIBLE_HEX_CHARS + SUFFIX.len());
        }
    }
}
