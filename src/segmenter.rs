//! Clause segmentation. Walks the token stream once, tracking paren depth,
//! and cuts the statement into ordered clause blocks at depth-zero boundary
//! keywords. Subqueries are detected here (a parenthesized group with its own
//! depth-zero SELECT and FROM) and recursed into by the renderer.

use crate::token::{KeywordKind, Token, TokenKind};

/// Structural kind of a clause block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    /// Tokens before the first boundary keyword (e.g. `INSERT INTO t`).
    Leading,
    Select,
    From,
    Where,
    GroupBy,
    OrderBy,
    Having,
    /// LIMIT or OFFSET; rendered inline with its operand.
    Limit,
    Join,
    SetOp,
}

/// One clause: its boundary keyword (None for a leading block) and the body
/// tokens up to the next depth-zero boundary.
#[derive(Debug)]
pub struct Clause<'a> {
    pub kind: ClauseKind,
    pub keyword: Option<&'a Token>,
    pub body: &'a [Token],
}

/// Partition a token stream into ordered clauses. Boundary keywords are only
/// honored at paren depth zero, so a subquery's clauses stay inside its
/// enclosing clause body. Clause order always matches input order.
pub fn segment(tokens: &[Token]) -> Vec<Clause<'_>> {
    let mut clauses = Vec::new();
    let mut depth: usize = 0;
    let mut block_start = 0;
    let mut current: Option<(usize, &Token)> = None;

    for (i, tok) in tokens.iter().enumerate() {
        match tok.kind {
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && tok.kind.is_clause_boundary() {
            match current {
                Some((kw_idx, kw)) => clauses.push(Clause {
                    kind: clause_kind(kw),
                    keyword: Some(kw),
                    body: &tokens[kw_idx + 1..i],
                }),
                None => {
                    if i > block_start {
                        clauses.push(Clause {
                            kind: ClauseKind::Leading,
                            keyword: None,
                            body: &tokens[block_start..i],
                        });
                    }
                }
            }
            current = Some((i, tok));
        }
    }

    match current {
        Some((kw_idx, kw)) => clauses.push(Clause {
            kind: clause_kind(kw),
            keyword: Some(kw),
            body: &tokens[kw_idx + 1..],
        }),
        None => {
            if tokens.len() > block_start {
                clauses.push(Clause {
                    kind: ClauseKind::Leading,
                    keyword: None,
                    body: tokens,
                });
            }
        }
    }

    clauses
}

fn clause_kind(kw: &Token) -> ClauseKind {
    match kw.kind {
        TokenKind::Keyword(KeywordKind::Join) => ClauseKind::Join,
        TokenKind::Keyword(KeywordKind::SetOp) => ClauseKind::SetOp,
        _ => match kw.text.as_str() {
            "SELECT" => ClauseKind::Select,
            "FROM" => ClauseKind::From,
            "WHERE" => ClauseKind::Where,
            "GROUP BY" => ClauseKind::GroupBy,
            "ORDER BY" => ClauseKind::OrderBy,
            "HAVING" => ClauseKind::Having,
            _ => ClauseKind::Limit,
        },
    }
}

/// True if the tokens form a statement the renderer can reflow: a depth-zero
/// SELECT followed (eventually) by a depth-zero FROM. Anything else degrades
/// to pass-through.
pub fn is_statement(tokens: &[Token]) -> bool {
    let mut depth: usize = 0;
    let mut saw_select = false;
    for tok in tokens {
        match tok.kind {
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 {
            if tok.is_keyword_text("SELECT") {
                saw_select = true;
            } else if saw_select && tok.is_keyword_text("FROM") {
                return true;
            }
        }
    }
    false
}

/// Index of the ParenClose matching the ParenOpen at `open_idx`, or None if
/// the parens are unbalanced.
pub fn find_matching_paren(tokens: &[Token], open_idx: usize) -> Option<usize> {
    debug_assert_eq!(tokens[open_idx].kind, TokenKind::ParenOpen);
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(open_idx) {
        match tok.kind {
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn keywords_of(sql: &str) -> Vec<String> {
        let tokens = tokenize(sql);
        segment(&tokens)
            .iter()
            .map(|c| {
                c.keyword
                    .map(|k| k.text.clone())
                    .unwrap_or_else(|| "<leading>".to_string())
            })
            .collect()
    }

    #[test]
    fn test_basic_clause_order() {
        assert_eq!(
            keywords_of("select a from t where x = 1 group by a order by a"),
            vec!["SELECT", "FROM", "WHERE", "GROUP BY", "ORDER BY"]
        );
    }

    #[test]
    fn test_subquery_clauses_stay_nested() {
        let tokens = tokenize("select * from (select id from t) as sub");
        let clauses = segment(&tokens);
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[1].kind, ClauseKind::From);
        // The inner SELECT and FROM are part of the outer FROM body.
        assert!(clauses[1].body.iter().any(|t| t.is_keyword_text("SELECT")));
    }

    #[test]
    fn test_join_and_set_op_boundaries() {
        assert_eq!(
            keywords_of("select a from t left join u on t.id = u.id union all select b from v"),
            vec!["SELECT", "FROM", "LEFT JOIN", "UNION ALL", "SELECT", "FROM"]
        );
    }

    #[test]
    fn test_leading_block() {
        let tokens = tokenize("insert into t select a from u");
        let clauses = segment(&tokens);
        assert_eq!(clauses[0].kind, ClauseKind::Leading);
        assert_eq!(clauses[0].body.len(), 3);
        assert_eq!(clauses[1].kind, ClauseKind::Select);
    }

    #[test]
    fn test_statement_detection() {
        assert!(is_statement(&tokenize("select a from t")));
        assert!(!is_statement(&tokenize("select 1")));
        assert!(!is_statement(&tokenize("update t set a = 1")));
        // SELECT/FROM only inside parens does not make a statement.
        assert!(!is_statement(&tokenize("(select a from t)")));
    }

    #[test]
    fn test_find_matching_paren() {
        let tokens = tokenize("f(a, (b), c) + (d");
        assert_eq!(find_matching_paren(&tokens, 1), Some(9));
        assert_eq!(find_matching_paren(&tokens, 4), Some(6));
        // Unbalanced trailing paren.
        let open = tokens.len() - 2;
        assert_eq!(find_matching_paren(&tokens, open), None);
    }

    #[test]
    fn test_limit_clause_kind() {
        let tokens = tokenize("select a from t limit 10");
        let clauses = segment(&tokens);
        assert_eq!(clauses.last().unwrap().kind, ClauseKind::Limit);
    }
}
