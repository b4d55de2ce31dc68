use std::{fmt, sync::Arc};

use serde::{Serialize, Serializer};

/// Token that names every column of the tables in scope.
pub const ALL_COLUMNS_MARKER: &str = "*";

/// Dialect pseudo column used for row-number pagination.
pub const ROWNUM_MARKER: &str = "rownum";

const ALL_COLUMNS_ID: &str = "__all__";
const ROWNUM_ID: &str = "__rownum__";

/// Stable name of a table, a `table.column` pair or one of the two markers.
///
/// Identifiers are handed out by the [`Schema`](crate::schema::Schema) and
/// share their text, so cloning one is a reference count bump.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalId(Arc<str>);

impl CanonicalId {
    pub(crate) fn all_columns() -> Self {
        Self(Arc::from(ALL_COLUMNS_ID))
    }

    pub(crate) fn rownum() -> Self {
        Self(Arc::from(ROWNUM_ID))
    }

    pub(crate) fn table(table: &str) -> Self {
        Self(Arc::from(format!("__{table}__")))
    }

    pub(crate) fn column(table: &str, column: &str) -> Self {
        Self(Arc::from(format!("__{table}.{column}__")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_all_columns(&self) -> bool {
        &*self.0 == ALL_COLUMNS_ID
    }

    pub fn is_rownum(&self) -> bool {
        &*self.0 == ROWNUM_ID
    }

    fn inner(&self) -> &str {
        self.0
            .strip_prefix("__")
            .and_then(|s| s.strip_suffix("__"))
            .unwrap_or(&self.0)
    }

    /// Column name without its table qualification. The all-columns marker
    /// yields `*`.
    pub fn base_name(&self) -> &str {
        if self.is_all_columns() {
            return ALL_COLUMNS_MARKER;
        }
        let inner = self.inner();
        match inner.split_once('.') {
            Some((_, column)) => column,
            None => inner,
        }
    }

    /// Owning table, when this identifier names a column.
    pub fn table_name(&self) -> Option<&str> {
        self.inner().split_once('.').map(|(table, _)| table)
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalId({})", self.0)
    }
}

impl Serialize for CanonicalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
