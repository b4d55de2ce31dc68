use std::collections::BTreeSet;

use crate::parser::ast::{CondUnit, OrderDirection, SetOp, SqlQuery, WhereOp};

/// Structural keywords present in a query, compared as sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SqlKeyword {
    Where,
    Group,
    Having,
    Order,
    Asc,
    Desc,
    Intersect,
    Union,
    Except,
    Or,
    Not,
    In,
    Like,
}

impl SqlKeyword {
    /// Keywords of the top-level query; nested queries are not searched.
    pub fn collect(query: &SqlQuery) -> BTreeSet<SqlKeyword> {
        let mut keywords = BTreeSet::new();

        if !query.r#where.is_empty() {
            keywords.insert(SqlKeyword::Where);
        }
        if !query.group_by.is_empty() {
            keywords.insert(SqlKeyword::Group);
        }
        if !query.having.is_empty() {
            keywords.insert(SqlKeyword::Having);
        }
        if let Some(order) = &query.order_by {
            keywords.insert(SqlKeyword::Order);
            keywords.insert(match order.direction {
                OrderDirection::Asc => SqlKeyword::Asc,
                OrderDirection::Desc => SqlKeyword::Desc,
            });
        }
        if let Some(set) = &query.set_operation {
            keywords.insert(match set.op {
                SetOp::Intersect => SqlKeyword::Intersect,
                SetOp::Union => SqlKeyword::Union,
                SetOp::Except => SqlKeyword::Except,
            });
        }

        let conditions = [&query.from.conditions, &query.r#where, &query.having];
        if conditions.iter().any(|c| c.has_or()) {
            keywords.insert(SqlKeyword::Or);
        }

        let units: Vec<&CondUnit> = conditions.iter().flat_map(|c| c.units.iter()).collect();
        if units.iter().any(|u| u.negated) {
            keywords.insert(SqlKeyword::Not);
        }
        if units.iter().any(|u| u.op == WhereOp::In) {
            keywords.insert(SqlKeyword::In);
        }
        if units.iter().any(|u| u.op == WhereOp::Like) {
            keywords.insert(SqlKeyword::Like);
        }

        keywords
    }
}

impl std::fmt::Display for SqlKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SqlKeyword::Where => "where",
            SqlKeyword::Group => "group",
            SqlKeyword::Having => "having",
            SqlKeyword::Order => "order",
            SqlKeyword::Asc => "asc",
            SqlKeyword::Desc => "desc",
            SqlKeyword::Intersect => "intersect",
            SqlKeyword::Union => "union",
            SqlKeyword::Except => "except",
            SqlKeyword::Or => "or",
            SqlKeyword::Not => "not",
            SqlKeyword::In => "in",
            SqlKeyword::Like => "like",
        };
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::{evaluator::SqlKeyword, parser::parse_sql, schema::Schema};

    fn keywords(sql: &str) -> BTreeSet<SqlKeyword> {
        let schema = Schema::build([
            ("patients", vec!["subject_id", "gender", "dob"]),
            ("admissions", vec!["hadm_id", "subject_id", "admission_type"]),
        ])
        .expect("Failed to build schema");
        let query = parse_sql(sql, &schema).expect("Failed to parse");
        SqlKeyword::collect(&query)
    }

    #[test]
    pub fn test_plain_select_has_no_keywords() {
        assert!(keywords("SELECT gender FROM patients").is_empty());
    }

    #[test]
    pub fn test_clause_keywords() {
        let found = keywords(
            "SELECT gender, count(*) FROM patients WHERE gender LIKE 'F%' OR subject_id NOT IN (1, 2) \
             GROUP BY gender HAVING count(*) > 1 ORDER BY gender DESC",
        );
        let expected: BTreeSet<SqlKeyword> = [
            SqlKeyword::Where,
            SqlKeyword::Group,
            SqlKeyword::Having,
            SqlKeyword::Order,
            SqlKeyword::Desc,
            SqlKeyword::Or,
            SqlKeyword::Not,
            SqlKeyword::In,
            SqlKeyword::Like,
        ]
        .into_iter()
        .collect();
        assert_eq!(found, expected);
    }

    #[test]
    pub fn test_set_operation_keyword() {
        let found = keywords("SELECT subject_id FROM patients MINUS SELECT subject_id FROM admissions");
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![SqlKeyword::Except]);
    }
}
