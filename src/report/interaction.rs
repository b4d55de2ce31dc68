use serde::{Deserialize, Serialize};

use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionTurn {
    pub predicted: String,
    pub gold: String,
    /// Database the gold query belongs to.
    pub db: String,
}

/// A sequence of turns evaluated together, like one conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub turns: Vec<InteractionTurn>,
}

impl Interaction {
    /// Pair up gold and predicted listings. Each non-blank line is a turn
    /// (`sql<TAB>db` for gold, `sql` for predictions); blank lines separate
    /// interactions. Extra turns on either side are ignored.
    pub fn parse_pair(gold: &str, predicted: &str) -> Vec<Interaction> {
        let gold = Self::blocks(gold);
        let predicted = Self::blocks(predicted);

        gold.into_iter()
            .zip(predicted)
            .map(|(gold, predicted)| {
                let turns = gold
                    .into_iter()
                    .zip(predicted)
                    .map(|(gold, predicted)| {
                        let mut fields = gold.split('\t');
                        let gold_sql = fields.next().unwrap_or_default().trim().to_string();
                        let db = fields.next().unwrap_or_default().trim().to_string();
                        let predicted_sql = predicted.split('\t').next().unwrap_or_default().trim().to_string();
                        InteractionTurn { predicted: predicted_sql, gold: gold_sql, db }
                    })
                    .collect();
                Interaction { turns }
            })
            .collect()
    }

    /// Turns of a session that carry a gold query.
    pub fn from_session(session: &Session, db: &str) -> Self {
        let turns = session
            .turns
            .iter()
            .filter_map(|turn| {
                let gold = turn.gold_sql.as_ref()?;
                Some(InteractionTurn { predicted: turn.predicted_sql.clone(), gold: gold.clone(), db: db.to_string() })
            })
            .collect();
        Interaction { turns }
    }

    fn blocks(text: &str) -> Vec<Vec<&str>> {
        let mut blocks = vec![];
        let mut current = vec![];
        for line in text.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
            } else {
                current.push(line.trim());
            }
        }
        if !current.is_empty() {
            blocks.push(current);
        }
        blocks
    }
}
