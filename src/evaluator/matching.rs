use crate::parser::ast::{ColUnit, ValUnit};

/// Columns compare by identity, or by base name when the same column name
/// is reached through different tables.
pub(crate) fn col_units_match(predicted: &ColUnit, gold: &ColUnit) -> bool {
    predicted.agg == gold.agg
        && predicted.distinct == gold.distinct
        && (predicted.column == gold.column || predicted.column.base_name() == gold.column.base_name())
}

pub(crate) fn val_units_match(predicted: &ValUnit, gold: &ValUnit) -> bool {
    if predicted.op != gold.op || !col_units_match(&predicted.left, &gold.left) {
        return false;
    }
    match (&predicted.right, &gold.right) {
        (Some(p), Some(g)) => col_units_match(p, g),
        (None, None) => true,
        _ => false,
    }
}

/// Greedy first-match counting: each predicted unit consumes the first
/// remaining gold unit it matches.
pub(crate) fn count_matches<P, G>(predicted: &[P], gold: &[G], matches: impl Fn(&P, &G) -> bool) -> usize {
    let mut remaining: Vec<&G> = gold.iter().collect();
    let mut matched = 0;

    for unit in predicted {
        if let Some(index) = remaining.iter().position(|candidate| matches(unit, *candidate)) {
            remaining.remove(index);
            matched += 1;
        }
    }

    matched
}
