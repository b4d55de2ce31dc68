use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    parser::ast::SqlQuery,
    schema::{CanonicalId, Schema, SchemaError},
};

/// A `table.column -> ref_table.ref_column` link reported by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
}

impl ForeignKey {
    pub fn new(table: &str, column: &str, ref_table: &str, ref_column: &str) -> Self {
        Self {
            table: table.to_string(),
            column: column.to_string(),
            ref_table: ref_table.to_string(),
            ref_column: ref_column.to_string(),
        }
    }
}

/// Groups columns linked by foreign keys and maps each member to one
/// representative, so `a.subject_id` and `b.subject_id` compare as the same
/// column after [`ForeignKeyMap::canonicalize`].
#[derive(Debug, Clone, Default)]
pub struct ForeignKeyMap {
    representatives: HashMap<CanonicalId, CanonicalId>,
}

impl ForeignKeyMap {
    pub fn build(schema: &Schema, foreign_keys: &[ForeignKey]) -> Result<Self, SchemaError> {
        let mut parents: HashMap<CanonicalId, CanonicalId> = HashMap::new();

        for fk in foreign_keys {
            let child = schema.resolve(&fk.table, &fk.column)?;
            let parent = schema.resolve(&fk.ref_table, &fk.ref_column)?;

            let child_root = Self::find_root(&mut parents, child);
            let parent_root = Self::find_root(&mut parents, parent);
            if child_root == parent_root {
                continue;
            }
            // the smallest identifier of a group stays its root
            if child_root < parent_root {
                parents.insert(parent_root, child_root);
            } else {
                parents.insert(child_root, parent_root);
            }
        }

        let members: Vec<CanonicalId> = parents.keys().cloned().collect();
        let mut representatives = HashMap::new();
        for member in members {
            let root = Self::find_root(&mut parents, member.clone());
            if root != member {
                representatives.insert(member, root);
            }
        }

        Ok(Self { representatives })
    }

    fn find_root(parents: &mut HashMap<CanonicalId, CanonicalId>, id: CanonicalId) -> CanonicalId {
        let mut current = id;
        while let Some(parent) = parents.get(&current) {
            if *parent == current {
                break;
            }
            current = parent.clone();
        }
        parents.entry(current.clone()).or_insert_with(|| current.clone());
        current
    }

    pub fn representative<'a>(&'a self, id: &'a CanonicalId) -> &'a CanonicalId {
        self.representatives.get(id).unwrap_or(id)
    }

    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }

    /// Rewrite every column identifier of `query` (nested queries included)
    /// to its group representative.
    pub fn canonicalize(&self, query: &mut SqlQuery) {
        if self.is_empty() {
            return;
        }
        query.visit_columns_mut(&mut |id| {
            if let Some(representative) = self.representatives.get(id) {
                *id = representative.clone();
            }
        });
    }
}
