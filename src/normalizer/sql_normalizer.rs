use once_cell::sync::Lazy;
use regex::Regex;

static ROWNUM_AFTER_AND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+AND\s+ROWNUM\s*<=?\s*\d+\b").expect("valid rownum pattern")
});

static ROWNUM_BEFORE_AND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bROWNUM\s*<=?\s*\d+\s+AND\s+").expect("valid rownum pattern")
});

static ROWNUM_ALONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\s*\bWHERE\s+ROWNUM\s*<=?\s*\d+(\s*\)|\s+(?:GROUP|ORDER|HAVING|UNION|INTERSECT|EXCEPT|MINUS|LIMIT|FETCH)\b|\s*$)",
    )
    .expect("valid rownum pattern")
});

static DANGLING_WHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+WHERE\s*$").expect("valid where pattern"));

/// Canonical text form used to compare and cache queries.
///
/// Upper-cases, drops statement terminators and collapses whitespace outside
/// quoted literals, and removes
/// `ROWNUM <= N` pagination predicates, whether alone in a WHERE clause,
/// joined with AND, or closing a wrapping sub-select. The rest of the filter
/// is left as written. Applying it twice changes nothing.
pub fn normalize_for_comparison(sql: &str) -> String {
    let text = sql.trim();
    if text.is_empty() {
        return String::new();
    }

    let mut text = collapse_outside_quotes(&text.to_uppercase());

    loop {
        let stripped = strip_pagination(&text);
        if stripped == text {
            break;
        }
        text = stripped;
    }

    collapse_outside_quotes(&text)
}

/// Replaces each run of whitespace and `;` terminators by one space and
/// trims the ends. Quoted spans are copied unchanged.
fn collapse_outside_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut pending_space = false;

    for c in text.chars() {
        match quote {
            Some(q) => {
                out.push(c);
                if c == q {
                    quote = None;
                }
            }
            None if c.is_whitespace() || c == ';' => pending_space = true,
            None => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                if c == '\'' || c == '"' {
                    quote = Some(c);
                }
                out.push(c);
            }
        }
    }

    out
}

fn strip_pagination(text: &str) -> String {
    let text = ROWNUM_AFTER_AND.replace_all(text, "");
    let text = ROWNUM_BEFORE_AND.replace_all(&text, "");
    let text = ROWNUM_ALONE.replace_all(&text, "${1}");
    DANGLING_WHERE.replace_all(&text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::normalizer::normalize_for_comparison;

    #[test]
    pub fn test_basic_normalization() {
        assert_eq!(normalize_for_comparison("  select *\n from  patients ;; "), "SELECT * FROM PATIENTS");
        assert_eq!(normalize_for_comparison("   "), "");
    }

    #[test]
    pub fn test_rownum_alone() {
        assert_eq!(normalize_for_comparison("SELECT * FROM patients WHERE rownum <= 5"), "SELECT * FROM PATIENTS");
        assert_eq!(
            normalize_for_comparison("SELECT gender FROM patients WHERE ROWNUM <= 10 ORDER BY dob"),
            "SELECT GENDER FROM PATIENTS ORDER BY DOB"
        );
    }

    #[test]
    pub fn test_rownum_conjoined() {
        assert_eq!(
            normalize_for_comparison("SELECT * FROM patients WHERE gender = 'F' AND rownum <= 5 AND dob > 1"),
            "SELECT * FROM PATIENTS WHERE GENDER = 'F' AND DOB > 1"
        );
        assert_eq!(
            normalize_for_comparison("SELECT * FROM patients WHERE rownum <= 5 AND gender = 'F'"),
            "SELECT * FROM PATIENTS WHERE GENDER = 'F'"
        );
    }

    #[test]
    pub fn test_rownum_wrapping_subselect() {
        assert_eq!(
            normalize_for_comparison("SELECT * FROM (SELECT drug FROM prescriptions ORDER BY drug) WHERE ROWNUM <= 3"),
            "SELECT * FROM (SELECT DRUG FROM PRESCRIPTIONS ORDER BY DRUG)"
        );
        assert_eq!(
            normalize_for_comparison("SELECT * FROM (SELECT drug FROM prescriptions WHERE rownum <= 3)"),
            "SELECT * FROM (SELECT DRUG FROM PRESCRIPTIONS)"
        );
    }

    #[test]
    pub fn test_or_with_rownum_is_kept() {
        let text = normalize_for_comparison("select a from t where b = 1 or rownum <= 2");
        assert_eq!(text, "SELECT A FROM T WHERE B = 1 OR ROWNUM <= 2");
    }

    #[test]
    pub fn test_terminators_inside_literals_are_kept() {
        let with_semicolon = normalize_for_comparison("select a from t where b = 'x;y';");
        let with_space = normalize_for_comparison("select a from t where b = 'x y'");
        assert_eq!(with_semicolon, "SELECT A FROM T WHERE B = 'X;Y'");
        assert_eq!(with_space, "SELECT A FROM T WHERE B = 'X Y'");
        assert_ne!(with_semicolon, with_space);
    }

    #[test]
    pub fn test_whitespace_inside_literals_is_kept() {
        assert_eq!(
            normalize_for_comparison("select a  from t where b = 'x  y' ; ;"),
            "SELECT A FROM T WHERE B = 'X  Y'"
        );
        assert_eq!(normalize_for_comparison("select 'it''s ;' from t"), "SELECT 'IT''S ;' FROM T");
    }

    const FRAGMENTS: [&str; 16] = [
        "select", "*", "from", "t", "where", "rownum", "<=", "<", "5", "and", "or", "(", ")", ";", "order by x", "\n\t",
    ];

    proptest! {
        #[test]
        fn test_normalization_is_idempotent(parts in prop::collection::vec(prop::sample::select(FRAGMENTS.to_vec()), 0..16), spaces in prop::collection::vec(0usize..3, 16)) {
            let text: String = parts
                .iter()
                .zip(spaces.iter())
                .map(|(part, n)| format!("{}{}", part, " ".repeat(*n)))
                .collect();
            let once = normalize_for_comparison(&text);
            prop_assert_eq!(normalize_for_comparison(&once), once);
        }
    }
}
