//! Keyword-casing normalization used on its own for pass-through spans: the
//! original layout is preserved byte-for-byte except that each recognized
//! keyword is rewritten to its canonical uppercase spelling. String literals,
//! quoted names, and comments are single tokens and come through verbatim.

use crate::token::{Token, TokenKind};

/// Rebuild `src` with keywords canonicalized in place. Inter-token
/// whitespace is copied from the source, so this is layout-preserving; the
/// only non-whitespace change a multi-word keyword can introduce is the
/// single space of its canonical spelling.
pub fn normalize_keywords(src: &str, tokens: &[Token]) -> String {
    let mut out = String::with_capacity(src.len());
    let mut prev_end = 0;

    for tok in tokens {
        out.push_str(&src[prev_end..tok.spos]);
        match tok.kind {
            TokenKind::Keyword(_) => out.push_str(&tok.text),
            _ => out.push_str(&src[tok.spos..tok.epos]),
        }
        prev_end = tok.epos;
    }
    out.push_str(&src[prev_end..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn normalize(src: &str) -> String {
        normalize_keywords(src, &tokenize(src))
    }

    #[test]
    fn test_keywords_uppercased_in_place() {
        assert_eq!(
            normalize("select a\n  from t"),
            "SELECT a\n  FROM t"
        );
    }

    #[test]
    fn test_layout_preserved() {
        assert_eq!(
            normalize("update   t\nset a = 1  where b = 2"),
            "UPDATE   t\nSET a = 1  WHERE b = 2"
        );
    }

    #[test]
    fn test_literal_contents_untouched() {
        assert_eq!(
            normalize("where name = 'select  from'"),
            "WHERE name = 'select  from'"
        );
        assert_eq!(normalize("select \"from\" from t"), "SELECT \"from\" FROM t");
    }

    #[test]
    fn test_comment_contents_untouched() {
        assert_eq!(
            normalize("select a -- from here\nfrom t"),
            "SELECT a -- from here\nFROM t"
        );
    }

    #[test]
    fn test_identifier_containing_keyword_untouched() {
        assert_eq!(normalize("select ordering from t"), "SELECT ordering FROM t");
    }

    #[test]
    fn test_multi_word_keyword_canonicalized() {
        // Interior whitespace of a multi-word keyword collapses to the
        // canonical single space; everything around it is preserved.
        assert_eq!(normalize("a group   by b"), "a GROUP BY b");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
    }
}
