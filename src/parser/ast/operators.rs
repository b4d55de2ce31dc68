use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggOp {
    #[default]
    None,
    Max,
    Min,
    Count,
    Sum,
    Avg,
}

impl TryFrom<&str> for AggOp {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "max" => Ok(AggOp::Max),
            "min" => Ok(AggOp::Min),
            "count" => Ok(AggOp::Count),
            "sum" => Ok(AggOp::Sum),
            "avg" => Ok(AggOp::Avg),
            _ => Err(format!("Invalid aggregate function: '{}'", value)),
        }
    }
}

impl fmt::Display for AggOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AggOp::None => "none",
            AggOp::Max => "max",
            AggOp::Min => "min",
            AggOp::Count => "count",
            AggOp::Sum => "sum",
            AggOp::Avg => "avg",
        };
        write!(f, "{}", text)
    }
}

/// Arithmetic joining the two column units of a value unit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitOp {
    #[default]
    None,
    Minus,
    Plus,
    Times,
    Divide,
}

impl TryFrom<&str> for UnitOp {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "-" => Ok(UnitOp::Minus),
            "+" => Ok(UnitOp::Plus),
            "*" => Ok(UnitOp::Times),
            "/" => Ok(UnitOp::Divide),
            _ => Err(format!("Invalid arithmetic operator: '{}'", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WhereOp {
    Between,
    Eq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    NotEq,
    In,
    Like,
    Is,
    Exists,
    IsNotNull,
}

impl TryFrom<&str> for WhereOp {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "between" => Ok(WhereOp::Between),
            "=" => Ok(WhereOp::Eq),
            ">" => Ok(WhereOp::Gt),
            "<" => Ok(WhereOp::Lt),
            ">=" => Ok(WhereOp::GtEq),
            "<=" => Ok(WhereOp::LtEq),
            "!=" | "<>" => Ok(WhereOp::NotEq),
            "in" => Ok(WhereOp::In),
            "like" => Ok(WhereOp::Like),
            "is" => Ok(WhereOp::Is),
            "exists" => Ok(WhereOp::Exists),
            "is not null" => Ok(WhereOp::IsNotNull),
            _ => Err(format!("Invalid comparison operator: '{}'", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicOp {
    And,
    Or,
}

impl TryFrom<&str> for LogicOp {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "and" => Ok(LogicOp::And),
            "or" => Ok(LogicOp::Or),
            _ => Err(format!("Invalid logical connective: '{}'", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOp {
    Intersect,
    Union,
    Except,
}

impl SetOp {
    pub const ALL: [SetOp; 3] = [SetOp::Intersect, SetOp::Union, SetOp::Except];
}

impl TryFrom<&str> for SetOp {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "intersect" => Ok(SetOp::Intersect),
            "union" => Ok(SetOp::Union),
            "except" | "minus" => Ok(SetOp::Except),
            _ => Err(format!("Invalid set operation: '{}'", value)),
        }
    }
}

impl fmt::Display for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetOp::Intersect => write!(f, "intersect"),
            SetOp::Union => write!(f, "union"),
            SetOp::Except => write!(f, "except"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "asc"),
            OrderDirection::Desc => write!(f, "desc"),
        }
    }
}
