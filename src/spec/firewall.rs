// file: src/spec/firewall.rs
// version: 1.0.0
// guid: 6f24b9c1-0e37-48da-85b2-f91a4d07e6c3

//! Host firewall ruleset specification
//!
//! Rules are evaluated in declaration order. The ruleset is deny-by-default:
//! validation requires the final rule to be an unconditional DROP, and any
//! rule declared after a terminal DROP is unreachable and rejected.

use crate::{DeployError, Result};
use serde::{Deserialize, Serialize};

const ANY_CIDR: &str = "0.0.0.0/0";
/// Tailscale CGNAT range
const TAILSCALE_CIDR: &str = "100.64.0.0/10";

/// Rule action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleAction {
    #[serde(rename = "ACCEPT")]
    Accept,
    #[serde(rename = "DROP")]
    Drop,
}

/// Traffic direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "in")]
    In,
    #[serde(rename = "out")]
    Out,
}

/// One ordered firewall rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirewallRule {
    pub action: RuleAction,
    pub direction: Direction,
    pub source: String,
    pub dest: String,
    pub proto: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dport: Option<String>,
    pub comment: String,
}

impl FirewallRule {
    /// Accept inbound TCP to the given port spec from anywhere
    pub fn accept_in_tcp(dport: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            action: RuleAction::Accept,
            direction: Direction::In,
            source: ANY_CIDR.to_string(),
            dest: ANY_CIDR.to_string(),
            proto: "tcp".to_string(),
            dport: Some(dport.into()),
            comment: comment.into(),
        }
    }

    /// Accept all inbound traffic from a source range
    pub fn accept_in_from(source: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            action: RuleAction::Accept,
            direction: Direction::In,
            source: source.into(),
            dest: ANY_CIDR.to_string(),
            proto: "any".to_string(),
            dport: None,
            comment: comment.into(),
        }
    }

    /// The unconditional deny that must terminate every ruleset
    pub fn terminal_drop() -> Self {
        Self {
            action: RuleAction::Drop,
            direction: Direction::In,
            source: ANY_CIDR.to_string(),
            dest: ANY_CIDR.to_string(),
            proto: "any".to_string(),
            dport: None,
            comment: "Default drop rule".to_string(),
        }
    }

    /// Whether this rule drops all traffic unconditionally
    pub fn is_terminal_drop(&self) -> bool {
        self.action == RuleAction::Drop
            && self.source == ANY_CIDR
            && self.dest == ANY_CIDR
            && self.proto == "any"
            && self.dport.is_none()
    }
}

/// Host firewall resource specification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallSpec {
    pub node_name: String,
    pub rules: Vec<FirewallRule>,
    pub enabled: bool,
}

impl FirewallSpec {
    /// The fixed homelab ruleset: SSH, web, Tailscale mesh, then deny all
    pub fn homelab(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            rules: vec![
                FirewallRule::accept_in_tcp("22", "SSH access"),
                FirewallRule::accept_in_tcp("80,443", "Web access"),
                FirewallRule::accept_in_from(TAILSCALE_CIDR, "Tailscale access"),
                FirewallRule::terminal_drop(),
            ],
            enabled: true,
        }
    }

    /// Structural guarantee: the ruleset must end with the unconditional DROP
    /// and carry no unreachable rules after one.
    pub fn validate(&self) -> Result<()> {
        let last = self.rules.last().ok_or_else(|| {
            DeployError::validation("Firewall ruleset cannot be empty".to_string())
        })?;

        if !last.is_terminal_drop() {
            return Err(DeployError::validation(
                "Firewall ruleset must end with an unconditional DROP".to_string(),
            ));
        }

        for (i, rule) in self.rules.iter().enumerate() {
            if rule.is_terminal_drop() && i != self.rules.len() - 1 {
                return Err(DeployError::validation(format!(
                    "Firewall rule {} follows a terminal DROP and is unreachable",
                    i + 1
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homelab_ruleset_shape() {
        let fw = FirewallSpec::homelab("r240");
        assert!(fw.enabled);
        assert_eq!(fw.rules.len(), 4);
        assert_eq!(fw.rules[0].dport.as_deref(), Some("22"));
        assert_eq!(fw.rules[1].dport.as_deref(), Some("80,443"));
        assert_eq!(fw.rules[2].source, "100.64.0.0/10");
        assert!(fw.rules[3].is_terminal_drop());
        assert!(fw.validate().is_ok());
    }

    #[test]
    fn test_missing_terminal_drop_rejected() {
        let mut fw = FirewallSpec::homelab("r240");
        fw.rules.pop();
        let err = fw.validate().unwrap_err();
        assert!(err.to_string().contains("unconditional DROP"));
    }

    #[test]
    fn test_rule_after_terminal_drop_rejected() {
        let mut fw = FirewallSpec::homelab("r240");
        fw.rules
            .push(FirewallRule::accept_in_tcp("8080", "Dead rule"));
        let err = fw.validate().unwrap_err();
        assert!(err.to_string().contains("unreachable"));
    }

    #[test]
    fn test_empty_ruleset_rejected() {
        let fw = FirewallSpec {
            node_name: "r240".to_string(),
            rules: vec![],
            enabled: true,
        };
        assert!(fw.validate().is_err());
    }

    #[test]
    fn test_action_serialization() {
        let fw = FirewallSpec::homelab("r240");
        let json = serde_json::to_value(&fw).unwrap();
        assert_eq!(json["rules"][0]["action"], "ACCEPT");
        assert_eq!(json["rules"][3]["action"], "DROP");
        assert_eq!(json["rules"][0]["direction"], "in");
    }
}
