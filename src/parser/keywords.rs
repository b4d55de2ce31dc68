pub const CLAUSE_KEYWORDS: [&str; 10] = [
    "select", "from", "where", "group", "having", "order", "limit", "intersect", "union", "except",
];

pub const JOIN_KEYWORDS: [&str; 3] = ["join", "on", "as"];

pub const JOIN_MODIFIERS: [&str; 7] = ["inner", "left", "right", "full", "outer", "cross", "natural"];

pub const WHERE_OPS: [&str; 13] = [
    "not", "between", "=", ">", "<", ">=", "<=", "!=", "in", "like", "is", "exists", IS_NOT_NULL,
];

pub const UNIT_OPS: [&str; 4] = ["-", "+", "*", "/"];

pub const AGG_OPS: [&str; 5] = ["max", "min", "count", "sum", "avg"];

pub const COND_OPS: [&str; 2] = ["and", "or"];

pub const SET_OPS: [&str; 3] = ["intersect", "union", "except"];

pub const ORDER_OPS: [&str; 2] = ["asc", "desc"];

pub const IS_NOT_NULL: &str = "is not null";

pub fn is_clause_keyword(text: &str) -> bool {
    CLAUSE_KEYWORDS.contains(&text)
}

pub fn is_reserved(text: &str) -> bool {
    CLAUSE_KEYWORDS.contains(&text)
        || JOIN_KEYWORDS.contains(&text)
        || JOIN_MODIFIERS.contains(&text)
        || WHERE_OPS.contains(&text)
        || COND_OPS.contains(&text)
        || ORDER_OPS.contains(&text)
        || matches!(text, "by" | "distinct" | "null" | "all" | "nulls")
}
