use crate::error::SecretError;

/// Server-held HMAC key used to sign and verify tokens.
///
/// Loaded once at process start and never mutated; clones share nothing
/// mutable, so it can be handed to any number of workers.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, SecretError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(SecretError::Empty);
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

impl TryFrom<String> for SigningSecret {
    type Error = SecretError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value.into_bytes())
    }
}

impl TryFrom<&str> for SigningSecret {
    type Error = SecretError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_is_rejected() {
        assert_eq!(SigningSecret::new(Vec::new()), Err(SecretError::Empty));
        assert_eq!(SigningSecret::try_from(""), Err(SecretError::Empty));
    }

    #[test]
    fn debug_does_not_leak_key_material() {
        let secret = SigningSecret::try_from("hunter2").unwrap();
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("hunter2"));
    }
}
