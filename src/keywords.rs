//! Static keyword tables. Single-word keywords live in a phf map; multi-word
//! keywords are phrases matched as a unit by the lexer, longest phrase first,
//! so that `ORDER BY` is never cut at `ORDER` and `LEFT OUTER JOIN` wins over
//! `OUTER JOIN`.

use phf::phf_map;

use crate::token::KeywordKind;

/// Lowercase single-word keyword -> structural kind.
/// Bare `group`, `order`, `outer` etc. are deliberately absent: they are only
/// keywords as part of a multi-word phrase, and a lone occurrence is an
/// identifier.
pub static SINGLE_WORD: phf::Map<&'static str, KeywordKind> = phf_map! {
    "select" => KeywordKind::ClauseStart,
    "from" => KeywordKind::ClauseStart,
    "where" => KeywordKind::ClauseStart,
    "having" => KeywordKind::ClauseStart,
    "limit" => KeywordKind::ClauseStart,
    "offset" => KeywordKind::ClauseStart,
    "join" => KeywordKind::Join,
    "union" => KeywordKind::SetOp,
    "except" => KeywordKind::SetOp,
    "intersect" => KeywordKind::SetOp,
    "on" => KeywordKind::On,
    "as" => KeywordKind::As,
    "and" => KeywordKind::And,
    "or" => KeywordKind::Or,
    "not" => KeywordKind::Other,
    "in" => KeywordKind::Other,
    "is" => KeywordKind::Other,
    "null" => KeywordKind::Other,
    "distinct" => KeywordKind::Other,
    "all" => KeywordKind::Other,
    "between" => KeywordKind::Other,
    "like" => KeywordKind::Other,
    "exists" => KeywordKind::Other,
    "case" => KeywordKind::Other,
    "when" => KeywordKind::Other,
    "then" => KeywordKind::Other,
    "else" => KeywordKind::Other,
    "end" => KeywordKind::Other,
    "insert" => KeywordKind::Other,
    "into" => KeywordKind::Other,
    "values" => KeywordKind::Other,
    "update" => KeywordKind::Other,
    "set" => KeywordKind::Other,
    "delete" => KeywordKind::Other,
    "escape" => KeywordKind::Other,
    "asc" => KeywordKind::Other,
    "desc" => KeywordKind::Other,
    "over" => KeywordKind::Other,
};

/// Multi-word keyword phrases: (lowercase words, canonical text, kind).
/// Ordered longest-first; the lexer takes the first full match, so three-word
/// join variants shadow their two-word suffixes and prefixes.
pub static MULTI_WORD: &[(&[&str], &str, KeywordKind)] = &[
    (
        &["left", "outer", "join"],
        "LEFT OUTER JOIN",
        KeywordKind::Join,
    ),
    (
        &["right", "outer", "join"],
        "RIGHT OUTER JOIN",
        KeywordKind::Join,
    ),
    (
        &["full", "outer", "join"],
        "FULL OUTER JOIN",
        KeywordKind::Join,
    ),
    (&["group", "by"], "GROUP BY", KeywordKind::ClauseStart),
    (&["order", "by"], "ORDER BY", KeywordKind::ClauseStart),
    (&["partition", "by"], "PARTITION BY", KeywordKind::Other),
    (&["union", "all"], "UNION ALL", KeywordKind::SetOp),
    (&["inner", "join"], "INNER JOIN", KeywordKind::Join),
    (&["left", "join"], "LEFT JOIN", KeywordKind::Join),
    (&["right", "join"], "RIGHT JOIN", KeywordKind::Join),
    (&["full", "join"], "FULL JOIN", KeywordKind::Join),
    (&["cross", "join"], "CROSS JOIN", KeywordKind::Join),
    (&["outer", "join"], "OUTER JOIN", KeywordKind::Join),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word_lookup() {
        assert_eq!(SINGLE_WORD.get("select"), Some(&KeywordKind::ClauseStart));
        assert_eq!(SINGLE_WORD.get("join"), Some(&KeywordKind::Join));
        assert_eq!(SINGLE_WORD.get("union"), Some(&KeywordKind::SetOp));
        assert_eq!(SINGLE_WORD.get("as"), Some(&KeywordKind::As));
        assert!(SINGLE_WORD.get("ordering").is_none());
    }

    #[test]
    fn test_phrase_constituents_are_not_single_keywords() {
        // `order` and `group` only exist inside their phrases.
        assert!(SINGLE_WORD.get("order").is_none());
        assert!(SINGLE_WORD.get("group").is_none());
        assert!(SINGLE_WORD.get("by").is_none());
        assert!(SINGLE_WORD.get("outer").is_none());
    }

    #[test]
    fn test_phrases_ordered_longest_first() {
        let mut prev = usize::MAX;
        for (words, canonical, _) in MULTI_WORD {
            assert!(words.len() <= prev, "{canonical} out of order");
            prev = words.len();
        }
    }

    #[test]
    fn test_canonical_text_matches_words() {
        for (words, canonical, _) in MULTI_WORD {
            let joined = words.join(" ").to_uppercase();
            assert_eq!(&joined, canonical);
        }
    }
}
