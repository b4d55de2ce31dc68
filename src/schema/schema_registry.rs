use indexmap::IndexMap;

use crate::{
    execution::Database,
    schema::{ALL_COLUMNS_MARKER, CanonicalId, ROWNUM_MARKER, SchemaError},
};

#[derive(Debug, Clone)]
struct TableEntry {
    id: CanonicalId,
    columns: IndexMap<String, CanonicalId>,
}

/// Read-only registry of the tables and columns queries are resolved against.
///
/// Table and column names are stored lower-cased and keep their declaration
/// order, which is also the order unqualified columns are searched in.
#[derive(Debug, Clone)]
pub struct Schema {
    tables: IndexMap<String, TableEntry>,
    all_columns: CanonicalId,
    rownum: CanonicalId,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            tables: IndexMap::new(),
            all_columns: CanonicalId::all_columns(),
            rownum: CanonicalId::rownum(),
        }
    }
}

impl Schema {
    /// Build a schema from `(table, columns)` pairs.
    pub fn build<I, T, C, S>(table_columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (T, C)>,
        T: AsRef<str>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut schema = Schema::default();

        for (table, columns) in table_columns {
            let table = table.as_ref().trim().to_lowercase();
            let id = CanonicalId::table(&table);
            if table == ALL_COLUMNS_MARKER || table == ROWNUM_MARKER || id == schema.all_columns || id == schema.rownum {
                return Err(SchemaError::ReservedTableName(table));
            }
            if schema.tables.contains_key(&table) {
                return Err(SchemaError::DuplicateTable(table));
            }

            let mut entry = TableEntry {
                id,
                columns: IndexMap::new(),
            };
            for column in columns {
                let column = column.as_ref().trim().to_lowercase();
                if entry.columns.contains_key(&column) {
                    return Err(SchemaError::DuplicateColumn { table, column });
                }
                let id = CanonicalId::column(&table, &column);
                entry.columns.insert(column, id);
            }

            schema.tables.insert(table, entry);
        }

        Ok(schema)
    }

    /// Build the schema from the database collaborator's introspection.
    pub fn from_database<D: Database + ?Sized>(db: &D) -> Result<Self, SchemaError> {
        let table_columns = db
            .table_columns()
            .map_err(|e| SchemaError::Introspection(e.to_string()))?;
        Self::build(table_columns)
    }

    pub fn resolve(&self, table: &str, column: &str) -> Result<CanonicalId, SchemaError> {
        let table = table.to_lowercase();
        let column = column.to_lowercase();
        self.tables
            .get(&table)
            .and_then(|entry| entry.columns.get(&column))
            .cloned()
            .ok_or(SchemaError::UnresolvedColumn { table, column })
    }

    pub fn resolve_table(&self, table: &str) -> Result<CanonicalId, SchemaError> {
        let table = table.to_lowercase();
        self.tables
            .get(&table)
            .map(|entry| entry.id.clone())
            .ok_or(SchemaError::UnresolvedTable(table))
    }

    pub fn resolve_all(&self) -> CanonicalId {
        self.all_columns.clone()
    }

    pub fn rownum(&self) -> CanonicalId {
        self.rownum.clone()
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn columns(&self, table: &str) -> Option<impl Iterator<Item = &str>> {
        self.tables
            .get(table)
            .map(|entry| entry.columns.keys().map(String::as_str))
    }

    /// First table in `tables` (in order) that declares `column`.
    pub fn find_in(&self, tables: &[String], column: &str) -> Option<CanonicalId> {
        tables
            .iter()
            .filter_map(|table| self.tables.get(table))
            .find_map(|entry| entry.columns.get(column).cloned())
    }

    /// First table of the whole schema (in declaration order) that declares `column`.
    pub fn find_anywhere(&self, column: &str) -> Option<CanonicalId> {
        self.tables
            .values()
            .find_map(|entry| entry.columns.get(column).cloned())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
