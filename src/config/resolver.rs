// file: src/config/resolver.rs
// version: 1.0.0
// guid: 1d7f3a58-2c90-4b6e-a4d2-95e1b08c76f4

//! Per-stack configuration resolution with environment variable substitution

use super::{secret::Secret, SecurityPosture};
use crate::{DeployError, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Raw stack file shape: a flat map of namespaced keys to values
#[derive(Debug, Deserialize)]
struct StackFile {
    config: BTreeMap<String, ConfigEntry>,
}

/// A single stack configuration entry, either secret-typed or plain
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConfigEntry {
    Secure { secure: String },
    Plain(serde_yaml::Value),
}

/// A resolved configuration value
#[derive(Debug, Clone)]
enum ResolvedValue {
    Plain(String),
    Secret(Secret),
}

/// Namespaced key/value configuration resolver for one deployment stack.
///
/// Keys are addressed as `namespace:key` (`vms:gw:cpu`, `proxmox:endpoint`);
/// an empty namespace addresses the top-level bucket (`storagePool`,
/// `bridge`, `posture`). Secret-typed entries are only reachable through
/// [`ConfigResolver::require_secret`] / [`ConfigResolver::get_secret`].
#[derive(Debug)]
pub struct ConfigResolver {
    values: BTreeMap<String, ResolvedValue>,
    posture: SecurityPosture,
    env_vars: HashMap<String, String>,
}

impl ConfigResolver {
    /// Load a stack configuration file (YAML)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            DeployError::config(format!(
                "Failed to read stack file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a stack configuration document from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let mut resolver = Self {
            values: BTreeMap::new(),
            posture: SecurityPosture::Strict,
            env_vars: std::env::vars().collect(),
        };

        let expanded = resolver.expand_env_vars(content)?;
        let stack: StackFile = serde_yaml::from_str(&expanded)?;

        for (key, entry) in stack.config {
            let value = match entry {
                ConfigEntry::Secure { secure } => ResolvedValue::Secret(Secret::new(secure)),
                ConfigEntry::Plain(value) => ResolvedValue::Plain(yaml_scalar(&key, &value)?),
            };
            resolver.values.insert(key, value);
        }

        let posture = match resolver.get("", "posture") {
            Some(raw) => SecurityPosture::from_str(raw)?,
            None => SecurityPosture::Strict,
        };
        resolver.posture = posture;

        Ok(resolver)
    }

    /// The security posture selected for this stack (default: strict)
    pub fn posture(&self) -> SecurityPosture {
        self.posture
    }

    /// Look up a plain value; secret-typed entries are not returned here
    pub fn get(&self, namespace: &str, key: &str) -> Option<&str> {
        match self.values.get(&full_key(namespace, key)) {
            Some(ResolvedValue::Plain(value)) => Some(value.as_str()),
            Some(ResolvedValue::Secret(_)) | None => None,
        }
    }

    /// Look up a plain value with a documented fallback default
    pub fn get_or<'a>(&'a self, namespace: &str, key: &str, default: &'a str) -> &'a str {
        self.get(namespace, key).unwrap_or(default)
    }

    /// Look up an optional boolean value
    pub fn get_bool(&self, namespace: &str, key: &str) -> Result<Option<bool>> {
        match self.get(namespace, key) {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(other) => Err(DeployError::config(format!(
                "Expected true or false for {}: got {}",
                full_key(namespace, key),
                other
            ))),
        }
    }

    /// Look up a required plain value; absence is fatal
    pub fn require(&self, namespace: &str, key: &str) -> Result<&str> {
        self.get(namespace, key)
            .ok_or_else(|| DeployError::missing_config(full_key(namespace, key)))
    }

    /// Look up a required integer value; absence or a non-numeric value is fatal
    pub fn require_number(&self, namespace: &str, key: &str) -> Result<u32> {
        let raw = self.require(namespace, key)?;
        raw.parse::<u32>().map_err(|_| {
            DeployError::config(format!(
                "Expected a number for {}: got {}",
                full_key(namespace, key),
                raw
            ))
        })
    }

    /// Look up an optional secret value.
    ///
    /// Plain entries are accepted with a warning so operators notice the
    /// value is not marked `secure` in the stack file.
    pub fn get_secret(&self, namespace: &str, key: &str) -> Option<Secret> {
        match self.values.get(&full_key(namespace, key)) {
            Some(ResolvedValue::Secret(secret)) => Some(secret.clone()),
            Some(ResolvedValue::Plain(value)) => {
                warn!(
                    "Config key {} is used as a secret but not marked secure in the stack file",
                    full_key(namespace, key)
                );
                Some(Secret::new(value.clone()))
            }
            None => None,
        }
    }

    /// Look up a required secret value; absence is fatal
    pub fn require_secret(&self, namespace: &str, key: &str) -> Result<Secret> {
        self.get_secret(namespace, key)
            .ok_or_else(|| DeployError::missing_config(full_key(namespace, key)))
    }

    /// Iterate top-level keys with the given prefix (used for override parsing)
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.values
            .keys()
            .filter(move |k| k.starts_with(prefix))
            .map(String::as_str)
    }

    /// Expand `${VAR}` environment references in stack file content
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| DeployError::config(format!("Invalid regex pattern: {}", e)))?;

        let mut result = content.to_string();
        let mut missing_vars = Vec::new();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];

            if let Some(value) = self.env_vars.get(var_name) {
                result = result.replace(placeholder, value);
            } else {
                missing_vars.push(var_name.to_string());
            }
        }

        if !missing_vars.is_empty() {
            return Err(DeployError::config(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(result)
    }
}

/// Join a namespace and key into the stack file's flat key form
fn full_key(namespace: &str, key: &str) -> String {
    if namespace.is_empty() {
        key.to_string()
    } else {
        format!("{}:{}", namespace, key)
    }
}

/// Normalize a plain YAML scalar to its string form
fn yaml_scalar(key: &str, value: &serde_yaml::Value) -> Result<String> {
    match value {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(DeployError::config(format!(
            "Unsupported value type for config key {}",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STACK: &str = r#"
config:
  proxmox:endpoint: https://pve.example:8006
  proxmox:username: root@pam
  proxmox:password:
    secure: supersecret
  vms:gw:cpu: 2
  vms:gw:memory: 4096
  storagePool: local-zfs
  posture: permissive
"#;

    #[test]
    fn test_plain_and_namespaced_lookup() {
        let resolver = ConfigResolver::from_yaml_str(STACK).unwrap();
        assert_eq!(
            resolver.get("proxmox", "endpoint"),
            Some("https://pve.example:8006")
        );
        assert_eq!(resolver.get("", "storagePool"), Some("local-zfs"));
        assert_eq!(resolver.get_or("", "bridge", "vmbr0"), "vmbr0");
    }

    #[test]
    fn test_require_number() {
        let resolver = ConfigResolver::from_yaml_str(STACK).unwrap();
        assert_eq!(resolver.require_number("vms", "gw:cpu").unwrap(), 2);
        assert_eq!(resolver.require_number("vms", "gw:memory").unwrap(), 4096);

        let err = resolver.require_number("vms", "gw:diskSize").unwrap_err();
        assert!(err.to_string().contains("vms:gw:diskSize"));
    }

    #[test]
    fn test_non_numeric_sizing_is_fatal() {
        let stack = "config:\n  vms:gw:cpu: lots\n";
        let resolver = ConfigResolver::from_yaml_str(stack).unwrap();
        let err = resolver.require_number("vms", "gw:cpu").unwrap_err();
        assert!(err.to_string().contains("vms:gw:cpu"));
    }

    #[test]
    fn test_secret_is_not_reachable_as_plain() {
        let resolver = ConfigResolver::from_yaml_str(STACK).unwrap();
        assert_eq!(resolver.get("proxmox", "password"), None);

        let secret = resolver.require_secret("proxmox", "password").unwrap();
        assert_eq!(secret.expose(), "supersecret");
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let resolver = ConfigResolver::from_yaml_str(STACK).unwrap();
        let err = resolver.require_secret("tailscale", "authKey").unwrap_err();
        assert!(err.to_string().contains("tailscale:authKey"));
    }

    #[test]
    fn test_posture_selection() {
        let resolver = ConfigResolver::from_yaml_str(STACK).unwrap();
        assert_eq!(resolver.posture(), SecurityPosture::Permissive);

        let strict = ConfigResolver::from_yaml_str("config:\n  bridge: vmbr0\n").unwrap();
        assert_eq!(strict.posture(), SecurityPosture::Strict);
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("HOMELAB_TEST_POOL", "tank");
        let stack = "config:\n  storagePool: ${HOMELAB_TEST_POOL}\n";
        let resolver = ConfigResolver::from_yaml_str(stack).unwrap();
        assert_eq!(resolver.get("", "storagePool"), Some("tank"));
    }

    #[test]
    fn test_missing_env_var() {
        let stack = "config:\n  storagePool: ${HOMELAB_TEST_UNSET_VAR}\n";
        let result = ConfigResolver::from_yaml_str(stack);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Missing environment variables"));
    }
}
