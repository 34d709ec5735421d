//! Category predicates.
//!
//! Every predicate first applies its gate (enough data, usable denominator)
//! and then the tier-specific ratio test. All of them are total: `NaN`
//! cells, zero denominators and unknown tiers simply fail to match.

use crate::{
    record::Record,
    thresholds::{ThresholdTable, TierRules},
};

/// Plain division, `None` when the result would not be a finite number.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    let value = numerator / denominator;
    value.is_finite().then_some(value)
}

fn tier_rules<'t>(record: &Record, table: &'t ThresholdTable) -> Option<&'t TierRules> {
    record.tier().and_then(|tier| table.rules(tier))
}

fn enough_attempts(record: &Record, table: &ThresholdTable) -> bool {
    record.total > table.gates.min_total
}

/// wrong/total for exercises that were attempted without any hints available.
fn unhinted_wrong_ratio(record: &Record, table: &ThresholdTable) -> Option<f64> {
    if !record.has_exercise() || record.no_of_hint != 0.0 || !enough_attempts(record, table) {
        return None;
    }
    ratio(record.wrong, record.total)
}

/// percent_hint/percent_wrong for hinted exercises with enough failures to judge.
fn hint_effect_ratio(record: &Record, table: &ThresholdTable) -> Option<f64> {
    let gated = record.has_exercise()
        && record.no_of_hint > 0.0
        && record.percent_wrong.is_finite()
        && record.percent_wrong != 0.0
        && enough_attempts(record, table)
        && record.wrong + record.hint > table.gates.min_wrong_plus_hint;
    if !gated {
        return None;
    }
    ratio(record.percent_hint, record.percent_wrong)
}

fn not_understood_ratio(record: &Record, table: &ThresholdTable) -> Option<f64> {
    let gated = record.wrong > 0.0 && enough_attempts(record, table);
    if !gated {
        return None;
    }
    ratio(record.not_understood, record.wrong)
}

pub fn needs_many_hints(record: &Record, table: &ThresholdTable) -> bool {
    match (tier_rules(record, table), unhinted_wrong_ratio(record, table)) {
        (Some(rules), Some(r)) => r > rules.many_hints,
        _ => false,
    }
}

pub fn needs_some_hints(record: &Record, table: &ThresholdTable) -> bool {
    match (tier_rules(record, table), unhinted_wrong_ratio(record, table)) {
        (Some(rules), Some(r)) => r > rules.some_hints && r <= rules.many_hints,
        _ => false,
    }
}

pub fn hint_very_poor(record: &Record, table: &ThresholdTable) -> bool {
    match (tier_rules(record, table), hint_effect_ratio(record, table)) {
        (Some(rules), Some(r)) => r < rules.hint_very_poor,
        _ => false,
    }
}

pub fn hint_somewhat_poor(record: &Record, table: &ThresholdTable) -> bool {
    match (tier_rules(record, table), hint_effect_ratio(record, table)) {
        (Some(rules), Some(r)) => r >= rules.hint_very_poor && r < rules.hint_somewhat_poor,
        _ => false,
    }
}

pub fn model_answer_very_poor(record: &Record, table: &ThresholdTable) -> bool {
    match (tier_rules(record, table), not_understood_ratio(record, table)) {
        (Some(rules), Some(r)) => r > rules.model_very_poor,
        _ => false,
    }
}

pub fn model_answer_somewhat_poor(record: &Record, table: &ThresholdTable) -> bool {
    match (tier_rules(record, table), not_understood_ratio(record, table)) {
        (Some(rules), Some(r)) => r > rules.model_somewhat_poor,
        _ => false,
    }
}

pub fn raise_difficulty(record: &Record, table: &ThresholdTable) -> bool {
    let Some(raise) = tier_rules(record, table).and_then(|rules| rules.raise) else {
        return false;
    };
    if !enough_attempts(record, table) {
        return false;
    }
    match (
        ratio(record.wrong, record.total),
        ratio(record.right, record.total),
    ) {
        (Some(wrong), Some(right)) => wrong > raise.wrong_above && right < raise.right_below,
        _ => false,
    }
}

/// No rule has been defined for lowering difficulty yet; the column is
/// always empty.
pub fn lower_difficulty(_record: &Record, _table: &ThresholdTable) -> bool {
    false
}
