use indexmap::IndexMap;

use crate::{
    parser::{JOIN_MODIFIERS, ParseError, Token, is_clause_keyword, is_reserved},
    schema::Schema,
};

/// Alias (or table) name -> table name, discovered in a pre-pass over the
/// whole statement. Every schema table maps to itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    aliases: IndexMap<String, String>,
}

/// Table part of a possibly owner-qualified name (`owner.table`).
pub fn table_part(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

impl AliasMap {
    pub fn scan(tokens: &[Token], schema: &Schema) -> Result<Self, ParseError> {
        let mut map = AliasMap::default();
        let is_table = |token: &Token| token.is_word() && schema.has_table(table_part(&token.text));
        let is_alias = |token: &Token| token.is_word() && !is_reserved(&token.text);

        // explicit `table AS alias`
        for i in 1..tokens.len().saturating_sub(1) {
            if tokens[i].is("as") && is_table(&tokens[i - 1]) && is_alias(&tokens[i + 1]) {
                map.record(schema, &tokens[i + 1], table_part(&tokens[i - 1].text), i + 1)?;
            }
        }

        // implicit `table alias` right after FROM or inside its join list
        let from_positions = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is("from"))
            .map(|(i, _)| i);
        for from in from_positions {
            let mut i = from + 1;
            while i + 1 < tokens.len() {
                let current = &tokens[i];
                if current.is_word() && is_clause_keyword(&current.text) {
                    break;
                }
                let next = &tokens[i + 1];
                let closes_item = tokens.get(i + 2).is_none_or(|t| {
                    t.is_any(&[",", ")", ";", "on", "join"])
                        || (t.is_word() && (is_clause_keyword(&t.text) || JOIN_MODIFIERS.contains(&t.text.as_str())))
                });
                if is_table(current) && is_alias(next) && closes_item {
                    map.record(schema, next, table_part(&current.text), i + 1)?;
                    i += 2;
                } else {
                    i += 1;
                }
            }
        }

        for table in schema.tables() {
            map.aliases.insert(table.to_string(), table.to_string());
        }

        Ok(map)
    }

    fn record(&mut self, schema: &Schema, alias: &Token, table: &str, position: usize) -> Result<(), ParseError> {
        if alias.text != table && schema.has_table(&alias.text) {
            return ParseError::at("alias shadows an existing table name", position, Some(alias)).err();
        }
        self.aliases.insert(alias.text.clone(), table.to_string());
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn is_alias_of(&self, name: &str, table: &str) -> bool {
        self.resolve(name) == Some(table)
    }
}
