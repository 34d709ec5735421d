use std::fmt;

use serde::Serialize;

use crate::{record::Record, rules, thresholds::ThresholdTable};

/// Diagnostic categories, declared in grid display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "Tosi huono vihje")]
    HintVeryPoor,
    #[serde(rename = "Semi huono vihje")]
    HintSomewhatPoor,
    #[serde(rename = "Tarvitsee kovasti vihjeitä")]
    NeedsManyHints,
    #[serde(rename = "Tarvitsee semisti vihjeitä")]
    NeedsSomeHints,
    #[serde(rename = "Tosi huono mallivastaus")]
    ModelAnswerVeryPoor,
    #[serde(rename = "Semi huono mallivastaus")]
    ModelAnswerSomewhatPoor,
    #[serde(rename = "Nosta vaikeustasoa yhdellä")]
    RaiseDifficulty,
    #[serde(rename = "Laske vaikeustasoa yhdellä")]
    LowerDifficulty,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::HintVeryPoor,
        Category::HintSomewhatPoor,
        Category::NeedsManyHints,
        Category::NeedsSomeHints,
        Category::ModelAnswerVeryPoor,
        Category::ModelAnswerSomewhatPoor,
        Category::RaiseDifficulty,
        Category::LowerDifficulty,
    ];

    /// Grid heading shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Category::HintVeryPoor => "Tosi huono vihje",
            Category::HintSomewhatPoor => "Semi huono vihje",
            Category::NeedsManyHints => "Tarvitsee kovasti vihjeitä",
            Category::NeedsSomeHints => "Tarvitsee semisti vihjeitä",
            Category::ModelAnswerVeryPoor => "Tosi huono mallivastaus",
            Category::ModelAnswerSomewhatPoor => "Semi huono mallivastaus",
            Category::RaiseDifficulty => "Nosta vaikeustasoa yhdellä",
            Category::LowerDifficulty => "Laske vaikeustasoa yhdellä",
        }
    }

    /// Stable ASCII identifier
    pub fn key(&self) -> &'static str {
        match self {
            Category::HintVeryPoor => "hint_very_poor",
            Category::HintSomewhatPoor => "hint_somewhat_poor",
            Category::NeedsManyHints => "needs_many_hints",
            Category::NeedsSomeHints => "needs_some_hints",
            Category::ModelAnswerVeryPoor => "model_answer_very_poor",
            Category::ModelAnswerSomewhatPoor => "model_answer_somewhat_poor",
            Category::RaiseDifficulty => "raise_difficulty",
            Category::LowerDifficulty => "lower_difficulty",
        }
    }

    pub fn matches(&self, record: &Record, table: &ThresholdTable) -> bool {
        match self {
            Category::HintVeryPoor => rules::hint_very_poor(record, table),
            Category::HintSomewhatPoor => rules::hint_somewhat_poor(record, table),
            Category::NeedsManyHints => rules::needs_many_hints(record, table),
            Category::NeedsSomeHints => rules::needs_some_hints(record, table),
            Category::ModelAnswerVeryPoor => rules::model_answer_very_poor(record, table),
            Category::ModelAnswerSomewhatPoor => rules::model_answer_somewhat_poor(record, table),
            Category::RaiseDifficulty => rules::raise_difficulty(record, table),
            Category::LowerDifficulty => rules::lower_difficulty(record, table),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
