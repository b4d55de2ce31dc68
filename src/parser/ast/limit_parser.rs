use crate::parser::{QueryParser, TokenKind};

pub struct LimitParser;

impl LimitParser {
    /// `LIMIT n`. A non-numeric limit counts as 1.
    pub fn parse(parser: &mut QueryParser) -> Option<u64> {
        if !parser.current_is("limit") {
            return None;
        }
        parser.next();

        let limit = parser
            .current()
            .filter(|t| t.kind == TokenKind::Number)
            .and_then(|t| t.text.parse::<f64>().ok())
            .map(|n| n.max(0.0) as u64)
            .unwrap_or(1);
        if !parser.at_clause_end() {
            parser.next();
        }
        Some(limit)
    }
}
