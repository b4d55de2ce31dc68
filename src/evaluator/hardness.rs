use serde::{Deserialize, Serialize};

use crate::parser::ast::{SqlQuery, WhereOp};

/// Structural difficulty of a (gold) query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hardness {
    Easy,
    Medium,
    Hard,
    Extra,
}

impl Hardness {
    pub const ALL: [Hardness; 4] = [Hardness::Easy, Hardness::Medium, Hardness::Hard, Hardness::Extra];

    pub fn classify(query: &SqlQuery) -> Self {
        let c1 = Self::component1(query);
        let c2 = Self::component2(query);
        let others = Self::others(query);

        if c1 <= 1 && others == 0 && c2 == 0 {
            Hardness::Easy
        } else if (others <= 2 && c1 <= 1 && c2 == 0) || (c1 <= 2 && others < 2 && c2 == 0) {
            Hardness::Medium
        } else if (others <= 2 && c1 <= 2 && c2 <= 1)
            || (c1 <= 3 && others <= 2 && c2 == 0)
            || (c1 <= 1 && others == 0 && c2 <= 1)
        {
            Hardness::Hard
        } else {
            Hardness::Extra
        }
    }

    /// Filter, grouping, ordering, extra joined tables, OR and LIKE.
    fn component1(query: &SqlQuery) -> usize {
        let mut count = 0;
        if !query.r#where.is_empty() {
            count += 1;
        }
        if !query.group_by.is_empty() {
            count += 1;
        }
        if query.order_by.is_some() {
            count += 1;
        }
        count += query.from.table_units.len().saturating_sub(1);
        if query.from.conditions.has_or() || query.r#where.has_or() || query.having.has_or() {
            count += 1;
        }
        if query.r#where.has_op(WhereOp::Like) {
            count += 1;
        }
        count
    }

    fn component2(query: &SqlQuery) -> usize {
        usize::from(query.set_operation.is_some())
    }

    /// Set operations plus subqueries used inside WHERE or HAVING.
    fn others(query: &SqlQuery) -> usize {
        let mut count = Self::component2(query);
        if query.r#where.subqueries().next().is_some() {
            count += 1;
        }
        if query.having.subqueries().next().is_some() {
            count += 1;
        }
        count
    }
}

impl std::fmt::Display for Hardness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hardness::Easy => write!(f, "easy"),
            Hardness::Medium => write!(f, "medium"),
            Hardness::Hard => write!(f, "hard"),
            Hardness::Extra => write!(f, "extra"),
        }
    }
}

impl TryFrom<&str> for Hardness {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "easy" => Ok(Hardness::Easy),
            "medium" => Ok(Hardness::Medium),
            "hard" => Ok(Hardness::Hard),
            "extra" => Ok(Hardness::Extra),
            _ => Err(format!("Invalid hardness level: '{}'", value)),
        }
    }
}
