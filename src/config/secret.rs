// file: src/config/secret.rs
// version: 1.0.0
// guid: c9e5a0d3-4b72-4e18-b6f1-8a03d7c25e91

//! Opaque secret handle for credential-typed configuration values

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder rendered wherever a secret would otherwise appear
pub const REDACTED: &str = "[secret]";

/// An opaque secret value (platform password, VPN auth key, tunnel secret).
///
/// The wrapped value never reaches logs, `Debug` output, or serialized
/// deployment documents; every textual rendering is `[secret]`. The real
/// value is only reachable through [`Secret::expose`], for the in-memory
/// handoff to the orchestration engine.
#[derive(Clone)]
pub struct Secret(SecretString);

impl Secret {
    /// Wrap a sensitive value
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::new(value.into()))
    }

    /// Access the underlying value for engine handoff
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", REDACTED)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let s = Secret::new("tskey-auth-abc123");
        assert_eq!(format!("{:?}", s), "Secret([secret])");
        assert_eq!(format!("{}", s), "[secret]");
    }

    #[test]
    fn test_serialize_is_redacted() {
        let s = Secret::new("hunter2");
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "\"[secret]\"");
    }

    #[test]
    fn test_expose_returns_value() {
        let s = Secret::new("hunter2");
        assert_eq!(s.expose(), "hunter2");
    }
}
