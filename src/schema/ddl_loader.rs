use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{Schema, SchemaError};

static CREATE_TABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bCREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?([\w."$#]+)\s*\("#)
        .expect("valid CREATE TABLE pattern")
});

const CONSTRAINT_WORDS: [&str; 7] = ["constraint", "primary", "foreign", "unique", "check", "key", "index"];

impl Schema {
    /// Build a schema from `CREATE TABLE` statements. Constraint entries are
    /// skipped and schema prefixes (`owner.table`) dropped.
    pub fn from_ddl(ddl: &str) -> Result<Self, SchemaError> {
        let mut tables: Vec<(String, Vec<String>)> = vec![];

        for captures in CREATE_TABLE.captures_iter(ddl) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let name = unquote(name.as_str());
            let table = name.rsplit('.').next().unwrap_or(&name).to_string();

            let body = balanced_body(&ddl[whole.end()..]);
            let columns = split_top_level(body)
                .into_iter()
                .filter_map(column_name)
                .collect();

            tables.push((table, columns));
        }

        Schema::build(tables)
    }
}

fn unquote(name: &str) -> String {
    name.replace(['"', '`'], "")
}

/// Text up to the parenthesis closing the one just before `rest`.
fn balanced_body(rest: &str) -> &str {
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return &rest[..i];
                }
            }
            _ => {}
        }
    }
    rest
}

fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = vec![];
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

fn column_name(definition: &str) -> Option<String> {
    let first = definition.split_whitespace().next()?;
    let name = unquote(first).to_lowercase();
    if name.is_empty() || CONSTRAINT_WORDS.contains(&name.as_str()) {
        return None;
    }
    Some(name)
}
