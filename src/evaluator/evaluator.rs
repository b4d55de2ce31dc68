use crate::{
    evaluator::{
        ClauseCategory, Hardness, PartialMatch, PartialScore, SqlKeyword,
        matching::{count_matches, val_units_match},
    },
    parser::ast::{LogicOp, SetOp, SqlQuery},
};

/// Clause-level comparison of a predicted query against a gold query.
///
/// Both trees must come from the same schema (and the same foreign-key
/// rewrite, if any), since columns compare by canonical identifier.
pub struct Evaluator;

impl Evaluator {
    pub fn partial_match(predicted: &SqlQuery, gold: &SqlQuery) -> PartialMatch {
        let mut partial = PartialMatch::default();

        let (select, select_no_agg) = Self::score_select(predicted, gold);
        partial.insert(ClauseCategory::Select, select);
        partial.insert(ClauseCategory::SelectNoAgg, select_no_agg);

        let (r#where, where_no_op) = Self::score_where(predicted, gold);
        partial.insert(ClauseCategory::Where, r#where);
        partial.insert(ClauseCategory::WhereNoOp, where_no_op);

        partial.insert(ClauseCategory::GroupNoHaving, Self::score_group(predicted, gold));
        partial.insert(ClauseCategory::Group, Self::score_having(predicted, gold));
        partial.insert(ClauseCategory::Order, Self::score_order(predicted, gold));
        partial.insert(ClauseCategory::AndOr, Self::score_and_or(predicted, gold));
        partial.insert(ClauseCategory::Iuen, Self::score_set_operations(predicted, gold));
        partial.insert(ClauseCategory::Keywords, Self::score_keywords(predicted, gold));

        partial
    }

    pub fn exact_match(predicted: &SqlQuery, gold: &SqlQuery) -> bool {
        Self::partial_match(predicted, gold).is_exact()
    }

    pub fn hardness(query: &SqlQuery) -> Hardness {
        Hardness::classify(query)
    }

    fn score_select(predicted: &SqlQuery, gold: &SqlQuery) -> (PartialScore, PartialScore) {
        let (p, g) = (&predicted.select.items, &gold.select.items);

        let matched = count_matches(p, g, |p, g| p.agg == g.agg && val_units_match(&p.val_unit, &g.val_unit));
        let matched_no_agg = count_matches(p, g, |p, g| val_units_match(&p.val_unit, &g.val_unit));

        (
            PartialScore::from_counts(g.len(), p.len(), matched),
            PartialScore::from_counts(g.len(), p.len(), matched_no_agg),
        )
    }

    fn score_where(predicted: &SqlQuery, gold: &SqlQuery) -> (PartialScore, PartialScore) {
        let (p, g) = (&predicted.r#where.units, &gold.r#where.units);

        if p.is_empty() && g.is_empty() {
            return (PartialScore::both_empty(), PartialScore::both_empty());
        }
        if p.is_empty() || g.is_empty() {
            let missing = PartialScore::from_counts(g.len(), p.len(), 0);
            return (missing, missing);
        }

        let matched = count_matches(p, g, |p, g| p == g);
        let matched_no_op = count_matches(p, g, |p, g| p.val_unit == g.val_unit);

        (
            PartialScore::from_counts(g.len(), p.len(), matched),
            PartialScore::from_counts(g.len(), p.len(), matched_no_op),
        )
    }

    fn score_group(predicted: &SqlQuery, gold: &SqlQuery) -> PartialScore {
        let p: Vec<&str> = predicted.group_by.iter().map(|c| c.column.base_name()).collect();
        let g: Vec<&str> = gold.group_by.iter().map(|c| c.column.base_name()).collect();
        let matched = count_matches(&p, &g, |p, g| p == g);
        PartialScore::from_counts(g.len(), p.len(), matched)
    }

    /// Grouping together with HAVING, all or nothing.
    fn score_having(predicted: &SqlQuery, gold: &SqlQuery) -> PartialScore {
        let predicted_total = usize::from(!predicted.group_by.is_empty());
        let gold_total = usize::from(!gold.group_by.is_empty());

        let same_columns = predicted.group_by.len() == gold.group_by.len()
            && predicted.group_by.iter().zip(gold.group_by.iter()).all(|(p, g)| p.column == g.column);
        let matched = predicted_total == 1
            && gold_total == 1
            && same_columns
            && predicted.having == gold.having;

        PartialScore::from_counts(gold_total, predicted_total, usize::from(matched))
    }

    fn score_order(predicted: &SqlQuery, gold: &SqlQuery) -> PartialScore {
        let (p, g) = (&predicted.order_by, &gold.order_by);
        let matched = p.is_some() && p == g;
        PartialScore::from_counts(usize::from(g.is_some()), usize::from(p.is_some()), usize::from(matched))
    }

    fn score_and_or(predicted: &SqlQuery, gold: &SqlQuery) -> PartialScore {
        let p = Self::connectives(predicted);
        let g = Self::connectives(gold);
        let matched = if p == g { p.len() } else { 0 };
        PartialScore::from_counts(g.len(), p.len(), matched)
    }

    /// Connectives of join, filter and having predicates, then of every
    /// nested query in the same order.
    fn connectives(query: &SqlQuery) -> Vec<LogicOp> {
        let mut connectives: Vec<LogicOp> = query
            .from
            .conditions
            .connectives
            .iter()
            .chain(query.r#where.connectives.iter())
            .chain(query.having.connectives.iter())
            .copied()
            .collect();
        for nested in query.nested_queries() {
            connectives.extend(Self::connectives(nested));
        }
        connectives
    }

    fn score_set_operations(predicted: &SqlQuery, gold: &SqlQuery) -> PartialScore {
        let (mut predicted_total, mut gold_total, mut matched) = (0, 0, 0);

        for op in [SetOp::Intersect, SetOp::Except, SetOp::Union] {
            let p = predicted.set_query(op);
            let g = gold.set_query(op);
            predicted_total += usize::from(p.is_some());
            gold_total += usize::from(g.is_some());
            if let (Some(p), Some(g)) = (p, g) {
                matched += usize::from(Self::exact_match(p, g));
            }
        }

        PartialScore::from_counts(gold_total, predicted_total, matched)
    }

    fn score_keywords(predicted: &SqlQuery, gold: &SqlQuery) -> PartialScore {
        let p = SqlKeyword::collect(predicted);
        let g = SqlKeyword::collect(gold);
        let matched = p.intersection(&g).count();
        PartialScore::from_counts(g.len(), p.len(), matched)
    }
}
