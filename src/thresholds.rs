use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::record::Tier;

/// Sample-size gates shared by every tier. Both cutoffs are exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gates {
    /// `total` must exceed this before any ratio is trusted.
    pub min_total: f64,
    /// `wrong + hint` must exceed this for the hint quality rules.
    pub min_wrong_plus_hint: f64,
}

impl Default for Gates {
    fn default() -> Self {
        Self {
            min_total: 19.0,
            min_wrong_plus_hint: 9.0,
        }
    }
}

/// Joint cutoff for suggesting a higher difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaiseRule {
    /// wrong/total must be strictly above this
    pub wrong_above: f64,
    /// right/total must be strictly below this
    pub right_below: f64,
}

/// Cutoffs for a single difficulty tier.
///
/// Paired rules split one ratio into two bands: `many_hints` is the exclusive
/// lower bound for "needs many hints" and the inclusive upper bound for
/// "needs some hints", which starts above `some_hints`. The hint quality rules
/// mirror this with the ratio falling: below `hint_very_poor` is very poor,
/// `[hint_very_poor, hint_somewhat_poor)` is somewhat poor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRules {
    pub many_hints: f64,
    pub some_hints: f64,
    pub hint_very_poor: f64,
    pub hint_somewhat_poor: f64,
    pub model_very_poor: f64,
    pub model_somewhat_poor: f64,
    #[serde(default)]
    pub raise: Option<RaiseRule>,
}

/// Complete rule configuration: gates plus one cutoff row per tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    #[serde(default)]
    pub gates: Gates,
    pub tiers: BTreeMap<Tier, TierRules>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        let tiers = BTreeMap::from([
            (
                Tier::One,
                TierRules {
                    many_hints: 0.4,
                    some_hints: 0.2,
                    hint_very_poor: 0.4,
                    hint_somewhat_poor: 0.8,
                    model_very_poor: 0.5,
                    model_somewhat_poor: 0.35,
                    raise: Some(RaiseRule {
                        wrong_above: 0.3,
                        right_below: 0.5,
                    }),
                },
            ),
            (
                Tier::Two,
                TierRules {
                    many_hints: 0.566,
                    some_hints: 0.283,
                    hint_very_poor: 0.3,
                    hint_somewhat_poor: 0.6,
                    model_very_poor: 0.5,
                    model_somewhat_poor: 0.35,
                    raise: Some(RaiseRule {
                        wrong_above: 0.6,
                        right_below: 0.3,
                    }),
                },
            ),
            (
                Tier::Three,
                TierRules {
                    many_hints: 0.693,
                    some_hints: 0.346,
                    hint_very_poor: 0.2,
                    hint_somewhat_poor: 0.4,
                    model_very_poor: 0.5,
                    model_somewhat_poor: 0.35,
                    raise: Some(RaiseRule {
                        wrong_above: 0.9,
                        right_below: 0.1,
                    }),
                },
            ),
            (
                Tier::Four,
                TierRules {
                    many_hints: 0.8,
                    some_hints: 0.4,
                    hint_very_poor: 0.1,
                    hint_somewhat_poor: 0.2,
                    model_very_poor: 0.5,
                    model_somewhat_poor: 0.35,
                    // no tier above four
                    raise: None,
                },
            ),
        ]);

        Self {
            gates: Gates::default(),
            tiers,
        }
    }
}

impl ThresholdTable {
    pub fn rules(&self, tier: Tier) -> Option<&TierRules> {
        self.tiers.get(&tier)
    }

    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_table_covers_all_tiers() {
        let table = ThresholdTable::default();
        for tier in Tier::ALL {
            assert!(table.rules(tier).is_some(), "missing tier {tier}");
        }
        assert!(table.rules(Tier::Four).unwrap().raise.is_none());
        assert_eq!(table.gates.min_total, 19.0);
    }

    #[test]
    fn json_roundtrip_keeps_tier_keys() {
        let table = ThresholdTable::default();
        let json = table.to_json_pretty().unwrap();
        assert!(json.contains("\"1\""));
        assert!(json.contains("\"4\""));
        assert_eq!(ThresholdTable::from_json(&json).unwrap(), table);
    }

    #[test]
    fn gates_default_when_omitted() {
        let json = r#"{
            "tiers": {
                "2": {
                    "many_hints": 0.5,
                    "some_hints": 0.25,
                    "hint_very_poor": 0.3,
                    "hint_somewhat_poor": 0.6,
                    "model_very_poor": 0.5,
                    "model_somewhat_poor": 0.35
                }
            }
        }"#;
        let table = ThresholdTable::from_json(json).unwrap();
        assert_eq!(table.gates, Gates::default());
        assert!(table.rules(Tier::One).is_none());
        assert_eq!(table.rules(Tier::Two).unwrap().many_hints, 0.5);
        assert!(table.rules(Tier::Two).unwrap().raise.is_none());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("thresholds.json");
        let table = ThresholdTable::default();
        fs::write(&path, table.to_json_pretty().unwrap()).unwrap();
        assert_eq!(ThresholdTable::from_path(&path).unwrap(), table);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(ThresholdTable::from_path(dir.path().join("nope.json")).is_err());
    }
}
