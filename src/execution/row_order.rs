use std::cmp::Ordering;

use serde_json::Value;

/// Total order over result rows, used to compare row multisets regardless
/// of the order the database returned them in.
pub struct RowOrder;

impl RowOrder {
    // NULLS LAST; mixed types order by type rank
    pub fn cmp_values(a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Number(x), Value::Number(y)) => {
                let ax = x.as_f64().unwrap_or(f64::NAN);
                let by = y.as_f64().unwrap_or(f64::NAN);
                // 1 and 1.0 are different cells; keep them apart deterministically
                ax.total_cmp(&by).then_with(|| x.to_string().cmp(&y.to_string()))
            }
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => a.to_string().cmp(&b.to_string()),
            (lhs, rhs) => Self::type_rank(lhs).cmp(&Self::type_rank(rhs)),
        }
    }

    /// Lexicographic over cells, shorter rows first on a common prefix.
    pub fn cmp_rows(a: &[Value], b: &[Value]) -> Ordering {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| Self::cmp_values(x, y))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    }

    pub fn sorted(rows: &[Vec<Value>]) -> Vec<&Vec<Value>> {
        let mut sorted: Vec<&Vec<Value>> = rows.iter().collect();
        sorted.sort_by(|a, b| Self::cmp_rows(a, b));
        sorted
    }

    /// Same rows, ignoring order. Cells compare with `Value` equality.
    pub fn same_rows(a: &[Vec<Value>], b: &[Vec<Value>]) -> bool {
        a.len() == b.len() && Self::sorted(a) == Self::sorted(b)
    }

    fn type_rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0, Value::Bool(_) => 1, Value::Number(_) => 2, Value::String(_) => 3,
            Value::Array(_) => 4, Value::Object(_) => 5
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering::*;

    use serde_json::json;

    use super::RowOrder;

    #[test]
    pub fn test_nulls_sort_last() {
        assert_eq!(RowOrder::cmp_values(&json!(null), &json!(1)), Greater);
        assert_eq!(RowOrder::cmp_values(&json!("a"), &json!(null)), Less);
        assert_eq!(RowOrder::cmp_values(&json!(null), &json!(null)), Equal);
    }

    #[test]
    pub fn test_mixed_types_use_rank() {
        assert_eq!(RowOrder::cmp_values(&json!(true), &json!(0)), Less);
        assert_eq!(RowOrder::cmp_values(&json!("1"), &json!(1)), Greater);
        assert_eq!(RowOrder::cmp_values(&json!(2), &json!(10)), Less);
    }

    #[test]
    pub fn test_rows_compare_lexicographically() {
        assert_eq!(RowOrder::cmp_rows(&[json!(1), json!("b")], &[json!(1), json!("a")]), Greater);
        assert_eq!(RowOrder::cmp_rows(&[json!(1)], &[json!(1), json!("a")]), Less);
    }

    #[test]
    pub fn test_same_rows_ignores_order() {
        let a = vec![vec![json!(1), json!("F")], vec![json!(2), json!(null)], vec![json!(1), json!("F")]];
        let b = vec![vec![json!(2), json!(null)], vec![json!(1), json!("F")], vec![json!(1), json!("F")]];
        assert!(RowOrder::same_rows(&a, &b));
    }

    #[test]
    pub fn test_same_rows_is_multiset_and_type_sensitive() {
        let a = vec![vec![json!(1)], vec![json!(1)], vec![json!(2)]];
        let b = vec![vec![json!(1)], vec![json!(2)], vec![json!(2)]];
        assert!(!RowOrder::same_rows(&a, &b));
        assert!(!RowOrder::same_rows(&[vec![json!(1)]], &[vec![json!(1.0)]]));
        assert!(RowOrder::same_rows(&[vec![json!(1)], vec![json!(1.0)]], &[vec![json!(1.0)], vec![json!(1)]]));
    }
}
