use serde::{Deserialize, Serialize};

/// Difficulty tier of an exercise. Only tiers 1 through 4 have thresholds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    strum_macros::Display,
)]
pub enum Tier {
    #[serde(rename = "1")]
    #[strum(serialize = "1")]
    One,
    #[serde(rename = "2")]
    #[strum(serialize = "2")]
    Two,
    #[serde(rename = "3")]
    #[strum(serialize = "3")]
    Three,
    #[serde(rename = "4")]
    #[strum(serialize = "4")]
    Four,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::One, Tier::Two, Tier::Three, Tier::Four];

    /// Map a raw difficulty value onto a tier. Non-integral, out of range
    /// and `NaN` values have no tier.
    pub fn from_difficulty(difficulty: f64) -> Option<Tier> {
        if difficulty == 1.0 {
            Some(Tier::One)
        } else if difficulty == 2.0 {
            Some(Tier::Two)
        } else if difficulty == 3.0 {
            Some(Tier::Three)
        } else if difficulty == 4.0 {
            Some(Tier::Four)
        } else {
            None
        }
    }
}

/// One exercise-performance row.
///
/// Numeric fields stay `f64` so that unparsable cells can be carried as
/// `NaN` and rejected by the rule gates instead of failing the whole file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    pub exercise: String,
    pub difficulty: f64,
    pub no_of_hint: f64,
    pub percent_hint: f64,
    pub percent_wrong: f64,
    pub total: f64,
    pub wrong: f64,
    pub right: f64,
    pub hint: f64,
    pub not_understood: f64,
}

impl Record {
    pub fn tier(&self) -> Option<Tier> {
        Tier::from_difficulty(self.difficulty)
    }

    pub fn has_exercise(&self) -> bool {
        !self.exercise.is_empty()
    }
}
