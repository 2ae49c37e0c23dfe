// file: src/spec/provider.rs
// version: 1.0.0
// guid: 92c5f1e8-4da6-4073-b5c9-e8107a3bd254

//! Platform provider connection specification

use crate::config::{ConfigResolver, Secret};
use crate::Result;
use serde::Serialize;

/// Connection block for the virtualization platform provider.
///
/// Credentials are required with no default; the `insecure` TLS flag falls
/// back to the deployment's security posture when unset.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSpec {
    pub endpoint: String,
    pub username: String,
    pub password: Secret,
    pub insecure: bool,
}

impl ProviderSpec {
    /// Resolve the provider block from stack configuration
    pub fn from_resolver(resolver: &ConfigResolver) -> Result<Self> {
        let insecure = match resolver.get_bool("proxmox", "insecure")? {
            Some(flag) => flag,
            None => resolver.posture().insecure_default(),
        };

        Ok(Self {
            endpoint: resolver.require("proxmox", "endpoint")?.to_string(),
            username: resolver.require("proxmox", "username")?.to_string(),
            password: resolver.require_secret("proxmox", "password")?,
            insecure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(extra: &str) -> String {
        format!(
            r#"
config:
  proxmox:endpoint: https://pve.example:8006
  proxmox:username: root@pam
  proxmox:password:
    secure: supersecret
{}"#,
            extra
        )
    }

    #[test]
    fn test_strict_posture_rejects_unverified_tls_by_default() {
        let resolver = ConfigResolver::from_yaml_str(&stack("  posture: strict\n")).unwrap();
        let provider = ProviderSpec::from_resolver(&resolver).unwrap();
        assert!(!provider.insecure);
    }

    #[test]
    fn test_permissive_posture_allows_unverified_tls_by_default() {
        let resolver = ConfigResolver::from_yaml_str(&stack("  posture: permissive\n")).unwrap();
        let provider = ProviderSpec::from_resolver(&resolver).unwrap();
        assert!(provider.insecure);
    }

    #[test]
    fn test_explicit_flag_beats_posture_default() {
        let resolver =
            ConfigResolver::from_yaml_str(&stack("  posture: permissive\n  proxmox:insecure: false\n"))
                .unwrap();
        let provider = ProviderSpec::from_resolver(&resolver).unwrap();
        assert!(!provider.insecure);
    }

    #[test]
    fn test_missing_credentials_fatal() {
        let resolver = ConfigResolver::from_yaml_str("config:\n  bridge: vmbr0\n").unwrap();
        let err = ProviderSpec::from_resolver(&resolver).unwrap_err();
        assert!(err.to_string().contains("proxmox:endpoint"));
    }

    #[test]
    fn test_password_redacted_in_output() {
        let resolver = ConfigResolver::from_yaml_str(&stack("")).unwrap();
        let provider = ProviderSpec::from_resolver(&resolver).unwrap();
        let json = serde_json::to_string(&provider).unwrap();
        assert!(!json.contains("supersecret"));
        assert!(json.contains("[secret]"));
    }
}
