//! Splitting clause bodies into expressions and predicates. All split points
//! are depth-zero relative to the body being split; commas inside function
//! calls or inline subqueries never cut an expression.

use crate::token::{KeywordKind, Token, TokenKind};

/// Split a list-bearing clause body on depth-zero commas. A trailing or
/// doubled comma yields an empty part; the caller sees the slot and can
/// degrade the whole list rather than lose the comma token.
pub fn split_on_commas(body: &[Token]) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;

    for (i, tok) in body.iter().enumerate() {
        match tok.kind {
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => depth = depth.saturating_sub(1),
            TokenKind::Comma if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if !body.is_empty() {
        parts.push(&body[start..]);
    }
    parts
}

/// One AND/OR-connected predicate: the connective that introduced it (None
/// for the first) and its tokens.
#[derive(Debug)]
pub struct Predicate<'a> {
    pub connective: Option<&'a Token>,
    pub tokens: &'a [Token],
}

/// Split a condition on depth-zero AND/OR connectives. The AND belonging to
/// a depth-zero `BETWEEN x AND y` is part of its predicate, not a split
/// point.
pub fn split_predicates(body: &[Token]) -> Vec<Predicate<'_>> {
    let mut predicates = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;
    let mut connective: Option<&Token> = None;
    let mut between_pending = false;

    for (i, tok) in body.iter().enumerate() {
        match tok.kind {
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth != 0 {
            continue;
        }
        if tok.is_keyword_text("BETWEEN") {
            between_pending = true;
        } else if tok.is_keyword(KeywordKind::And) && between_pending {
            between_pending = false;
        } else if tok.is_keyword(KeywordKind::And) || tok.is_keyword(KeywordKind::Or) {
            if i > start {
                predicates.push(Predicate {
                    connective,
                    tokens: &body[start..i],
                });
            }
            connective = Some(tok);
            start = i + 1;
        }
    }
    if start < body.len() {
        predicates.push(Predicate {
            connective,
            tokens: &body[start..],
        });
    }
    predicates
}

/// Split an expression into `(lhs, Some(rhs))` on its last depth-zero AS, or
/// `(expr, None)` when there is no usable alias pattern (including a
/// malformed trailing AS, which degrades to verbatim output).
pub fn split_alias(expr: &[Token]) -> (&[Token], Option<&[Token]>) {
    let mut depth: usize = 0;
    let mut as_idx: Option<usize> = None;

    for (i, tok) in expr.iter().enumerate() {
        match tok.kind {
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && tok.is_keyword(KeywordKind::As) {
            as_idx = Some(i);
        }
    }

    match as_idx {
        Some(i) if i > 0 && i + 1 < expr.len() => (&expr[..i], Some(&expr[i + 1..])),
        _ => (expr, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn comma_parts(sql: &str) -> Vec<usize> {
        let tokens = tokenize(sql);
        split_on_commas(&tokens).iter().map(|p| p.len()).collect()
    }

    #[test]
    fn test_split_on_depth_zero_commas() {
        // `f(a, b) AS c, d` splits into exactly two expressions.
        let tokens = tokenize("f(a, b) as c, d");
        let parts = split_on_commas(&tokens);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 8);
        assert_eq!(parts[1].len(), 1);
    }

    #[test]
    fn test_comma_inside_subquery_not_split() {
        assert_eq!(comma_parts("(select a, b from t), c").len(), 2);
    }

    #[test]
    fn test_no_commas_yields_single_part() {
        assert_eq!(comma_parts("a + b").len(), 1);
    }

    #[test]
    fn test_trailing_comma_keeps_empty_slot() {
        let tokens = tokenize("a, b,");
        let parts = split_on_commas(&tokens);
        assert_eq!(parts.len(), 3);
        assert!(parts[2].is_empty());
    }

    #[test]
    fn test_doubled_comma_keeps_empty_slot() {
        let tokens = tokenize("a,, b");
        let parts = split_on_commas(&tokens);
        assert_eq!(parts.len(), 3);
        assert!(parts[1].is_empty());
    }

    #[test]
    fn test_split_predicates_on_and_or() {
        let tokens = tokenize("x = 1 and y = 2 or z = 3");
        let preds = split_predicates(&tokens);
        assert_eq!(preds.len(), 3);
        assert!(preds[0].connective.is_none());
        assert_eq!(preds[1].connective.unwrap().text, "AND");
        assert_eq!(preds[2].connective.unwrap().text, "OR");
    }

    #[test]
    fn test_between_and_is_not_a_split_point() {
        let tokens = tokenize("x between 1 and 10 and y = 2");
        let preds = split_predicates(&tokens);
        assert_eq!(preds.len(), 2);
        assert_eq!(preds[0].tokens.len(), 5);
        assert_eq!(preds[1].connective.unwrap().text, "AND");
    }

    #[test]
    fn test_and_inside_parens_not_split() {
        let tokens = tokenize("(x = 1 and y = 2) or z = 3");
        let preds = split_predicates(&tokens);
        assert_eq!(preds.len(), 2);
    }

    #[test]
    fn test_split_alias() {
        let tokens = tokenize("sum(x) as total");
        let (lhs, rhs) = split_alias(&tokens);
        assert_eq!(lhs.len(), 4);
        assert_eq!(rhs.unwrap()[0].text, "total");
    }

    #[test]
    fn test_cast_as_inside_parens_is_not_an_alias() {
        let tokens = tokenize("cast(x as int)");
        let (_, rhs) = split_alias(&tokens);
        assert!(rhs.is_none());
    }

    #[test]
    fn test_malformed_trailing_as_degrades() {
        let tokens = tokenize("a as");
        let (lhs, rhs) = split_alias(&tokens);
        assert!(rhs.is_none());
        assert_eq!(lhs.len(), 2);
    }
}
