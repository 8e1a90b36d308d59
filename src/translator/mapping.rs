use serde::{Deserialize, Serialize};
use thiserror::Error;

/// PAN token → KQL token pairs, applied in this order.
///
/// Every key carries delimiting whitespace so that no key matches inside
/// another key or inside a replacement.
const DEFAULT_MAPPINGS: [(&str, &str); 20] = [
    (" eq ", " == "),
    (" in ", " == "),
    (" neq ", " != "),
    (" notin ", " != "),
    ("rule ", "Rule "),
    ("action ", "DeviceAction "),
    ("addr.src ", "SourceIP "),
    ("addr.dst ", "DestinationIP "),
    ("port.src ", "SourcePort "),
    ("port.dst ", "DestinationPort "),
    ("user.src ", "SourceUserName "),
    ("zone.src ", "SourceZone "),
    ("zone.dst ", "DestinationZone "),
    ("session_end_reason ", "reason "),
    ("proto ", "Protocol "),
    ("app ", "ApplicationProtocol "),
    ("subtype ", "DeviceEventClassID "),
    ("natsrc ", "SourceTranslatedAddress "),
    ("natdst ", "DestinationTranslatedAddress "),
    ("device_name ", "DeviceName "),
];

/// Errors raised when a mapping table would not reach a fixed point in one pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("Mapping rule #{index} has an empty source token")]
    EmptySource { index: usize },

    #[error("Mapping source {source_token:?} also matches inside source {other:?}")]
    OverlappingSource { source_token: String, other: String },

    #[error("Mapping source {source_token:?} also matches inside replacement {target:?}")]
    SourceInTarget { source_token: String, target: String },
}

/// A single token substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRule {
    pub source: String,
    pub target: String,
}

impl MappingRule {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// The built-in PAN → KQL field and operator vocabulary
pub fn default_rules() -> Vec<MappingRule> {
    DEFAULT_MAPPINGS
        .iter()
        .map(|(source, target)| MappingRule::new(*source, *target))
        .collect()
}

/// Validated, immutable, ordered field/operator vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTable {
    rules: Vec<MappingRule>,
}

impl Default for MappingTable {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl MappingTable {
    /// Build a table, rejecting rule sets where one rule could re-trigger
    /// another: a source inside another source, or inside any replacement.
    pub fn new(rules: Vec<MappingRule>) -> Result<Self, MappingError> {
        for (index, rule) in rules.iter().enumerate() {
            if rule.source.is_empty() {
                return Err(MappingError::EmptySource { index });
            }

            for (other_index, other) in rules.iter().enumerate() {
                if other_index != index && other.source.contains(&rule.source) {
                    return Err(MappingError::OverlappingSource {
                        source_token: rule.source.clone(),
                        other: other.source.clone(),
                    });
                }
                if other.target.contains(&rule.source) {
                    return Err(MappingError::SourceInTarget {
                        source_token: rule.source.clone(),
                        target: other.target.clone(),
                    });
                }
            }
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Replace every occurrence of every source token, position-independent
    pub fn apply(&self, query: &str) -> String {
        let mut out = query.to_string();
        for rule in &self.rules {
            if out.contains(&rule.source) {
                out = out.replace(&rule.source, &rule.target);
            }
        }
        out
    }
}
