use serde::{Deserialize, Serialize};

/// Independently scored part of a query comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClauseCategory {
    #[serde(rename = "select")]
    Select,
    #[serde(rename = "select(no AGG)")]
    SelectNoAgg,
    #[serde(rename = "where")]
    Where,
    #[serde(rename = "where(no OP)")]
    WhereNoOp,
    #[serde(rename = "group(no Having)")]
    GroupNoHaving,
    #[serde(rename = "group")]
    Group,
    #[serde(rename = "order")]
    Order,
    #[serde(rename = "and/or")]
    AndOr,
    #[serde(rename = "IUEN")]
    Iuen,
    #[serde(rename = "keywords")]
    Keywords,
}

impl ClauseCategory {
    pub const ALL: [ClauseCategory; 10] = [
        ClauseCategory::Select,
        ClauseCategory::SelectNoAgg,
        ClauseCategory::Where,
        ClauseCategory::WhereNoOp,
        ClauseCategory::GroupNoHaving,
        ClauseCategory::Group,
        ClauseCategory::Order,
        ClauseCategory::AndOr,
        ClauseCategory::Iuen,
        ClauseCategory::Keywords,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ClauseCategory::Select => "select",
            ClauseCategory::SelectNoAgg => "select(no AGG)",
            ClauseCategory::Where => "where",
            ClauseCategory::WhereNoOp => "where(no OP)",
            ClauseCategory::GroupNoHaving => "group(no Having)",
            ClauseCategory::Group => "group",
            ClauseCategory::Order => "order",
            ClauseCategory::AndOr => "and/or",
            ClauseCategory::Iuen => "IUEN",
            ClauseCategory::Keywords => "keywords",
        }
    }
}

impl std::fmt::Display for ClauseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<&str> for ClauseCategory {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ClauseCategory::ALL
            .into_iter()
            .find(|category| category.label() == value)
            .ok_or_else(|| format!("Invalid clause category: '{}'", value))
    }
}
