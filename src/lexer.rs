//! One-pass tokenizer. The whole pipeline works off this token stream;
//! nothing downstream ever re-scans raw text, which is what keeps keyword
//! matching boundary-anchored and string literals inviolable.

use memchr::{memchr, memchr2};

use crate::keywords::{MULTI_WORD, SINGLE_WORD};
use crate::token::{Token, TokenKind};

/// Tokenize a SQL string. Whitespace is not tokenized; each token records
/// its byte span so the original text (including the whitespace between
/// tokens) can be reconstructed for pass-through rendering.
pub fn tokenize(src: &str) -> Vec<Token> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        match b {
            b'\'' => {
                let end = scan_quoted(bytes, i);
                tokens.push(Token::new(TokenKind::StringLiteral, &src[i..end], i, end));
                i = end;
            }
            b'"' => {
                let end = scan_quoted(bytes, i);
                tokens.push(Token::new(TokenKind::QuotedName, &src[i..end], i, end));
                i = end;
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                let end = match memchr(b'\n', &bytes[i..]) {
                    Some(off) => i + off,
                    None => bytes.len(),
                };
                tokens.push(Token::new(TokenKind::LineComment, &src[i..end], i, end));
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = scan_block_comment(bytes, i);
                tokens.push(Token::new(TokenKind::BlockComment, &src[i..end], i, end));
                i = end;
            }
            b'(' => {
                tokens.push(Token::new(TokenKind::ParenOpen, "(", i, i + 1));
                i += 1;
            }
            b')' => {
                tokens.push(Token::new(TokenKind::ParenClose, ")", i, i + 1));
                i += 1;
            }
            b',' => {
                tokens.push(Token::new(TokenKind::Comma, ",", i, i + 1));
                i += 1;
            }
            b';' => {
                tokens.push(Token::new(TokenKind::Semicolon, ";", i, i + 1));
                i += 1;
            }
            b'?' => {
                tokens.push(Token::new(TokenKind::Placeholder, "?", i, i + 1));
                i += 1;
            }
            b'.' => {
                tokens.push(Token::new(TokenKind::Dot, ".", i, i + 1));
                i += 1;
            }
            b'0'..=b'9' => {
                let end = i + scan_number(&bytes[i..]);
                tokens.push(Token::new(TokenKind::Number, &src[i..end], i, end));
                i = end;
            }
            _ if is_word_start(b) => {
                let (token, end) = lex_word(src, bytes, i);
                tokens.push(token);
                i = end;
            }
            _ => {
                let len = scan_operator(&bytes[i..]);
                tokens.push(Token::new(TokenKind::Operator, &src[i..i + len], i, i + len));
                i += len;
            }
        }
    }

    tokens
}

/// Lex a word starting at `i`: a multi-word keyword phrase, a single-word
/// keyword, or a plain name. Phrase matching is greedy across whitespace and
/// longest-first, so `ORDER BY` is one token and `ORDERING` is untouched.
fn lex_word(src: &str, bytes: &[u8], i: usize) -> (Token, usize) {
    let word_end = i + scan_word(&bytes[i..]);
    let lower = src[i..word_end].to_ascii_lowercase();

    for (words, canonical, kind) in MULTI_WORD {
        if words[0] != lower {
            continue;
        }
        if let Some(phrase_end) = match_phrase_rest(src, bytes, word_end, &words[1..]) {
            return (
                Token::new(TokenKind::Keyword(*kind), canonical, i, phrase_end),
                phrase_end,
            );
        }
    }

    if let Some(kind) = SINGLE_WORD.get(lower.as_str()) {
        let canonical = lower.to_ascii_uppercase();
        return (
            Token::new(TokenKind::Keyword(*kind), &canonical, i, word_end),
            word_end,
        );
    }

    (
        Token::new(TokenKind::Name, &src[i..word_end], i, word_end),
        word_end,
    )
}

/// Try to match the remaining words of a phrase after position `pos`.
/// Each word must be separated by at least one whitespace byte and must end
/// at a word boundary. Returns the end position of the last word on success.
fn match_phrase_rest(src: &str, bytes: &[u8], mut pos: usize, rest: &[&str]) -> Option<usize> {
    for expected in rest {
        let ws_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos == ws_start {
            return None;
        }
        let len = scan_word(&bytes[pos..]);
        if len == 0 || !src[pos..pos + len].eq_ignore_ascii_case(expected) {
            return None;
        }
        pos += len;
    }
    Some(pos)
}

#[inline]
fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

/// Byte length of the word (identifier characters) at the start of `bytes`.
#[inline]
fn scan_word(bytes: &[u8]) -> usize {
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80 {
            i += 1;
        } else {
            break;
        }
    }
    i
}

/// Scan a quoted span starting at `i` (which points at `'` or `"`).
/// Handles doubled-quote escapes (`''`) and backslash escapes. An
/// unterminated span runs to end of input rather than failing.
fn scan_quoted(bytes: &[u8], i: usize) -> usize {
    let quote = bytes[i];
    let mut j = i + 1;
    while j < bytes.len() {
        match memchr2(quote, b'\\', &bytes[j..]) {
            Some(off) => {
                let at = j + off;
                if bytes[at] == b'\\' {
                    j = at + 2;
                } else if bytes.get(at + 1) == Some(&quote) {
                    j = at + 2;
                } else {
                    return at + 1;
                }
            }
            None => return bytes.len(),
        }
    }
    j.min(bytes.len())
}

/// Scan a `/* ... */` comment starting at `i`. Unterminated comments run to
/// end of input.
fn scan_block_comment(bytes: &[u8], i: usize) -> usize {
    let mut j = i + 2;
    while j + 1 < bytes.len() {
        match memchr(b'*', &bytes[j..]) {
            Some(off) => {
                let at = j + off;
                if bytes.get(at + 1) == Some(&b'/') {
                    return at + 2;
                }
                j = at + 1;
            }
            None => return bytes.len(),
        }
    }
    bytes.len()
}

/// Byte length of the number at the start of `bytes`. Handles hex literals
/// and decimals with a fractional part and scientific notation.
fn scan_number(bytes: &[u8]) -> usize {
    if bytes.len() > 2 && bytes[0] == b'0' && (bytes[1] | 0x20) == b'x' {
        let mut i = 2;
        while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
            i += 1;
        }
        return i;
    }

    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > i + 1 {
            i = j;
        }
    }
    if i < bytes.len() && (bytes[i] | 0x20) == b'e' {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let digits_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > digits_start {
            i = j;
        }
    }
    i
}

const TWO_CHAR_OPERATORS: &[&[u8]] = &[b"<=", b">=", b"<>", b"!=", b"||", b"::", b":="];

/// Byte length of the operator at the start of `bytes` (1 or 2).
fn scan_operator(bytes: &[u8]) -> usize {
    if bytes.len() >= 2 && TWO_CHAR_OPERATORS.contains(&&bytes[..2]) {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::KeywordKind;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).into_iter().map(|t| t.kind).collect()
    }

    fn texts(src: &str) -> Vec<String> {
        tokenize(src).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_simple_select() {
        assert_eq!(
            texts("select a from t"),
            vec!["SELECT", "a", "FROM", "t"]
        );
        assert_eq!(
            kinds("select a from t"),
            vec![
                TokenKind::Keyword(KeywordKind::ClauseStart),
                TokenKind::Name,
                TokenKind::Keyword(KeywordKind::ClauseStart),
                TokenKind::Name,
            ]
        );
    }

    #[test]
    fn test_multi_word_keyword_is_one_token() {
        let toks = tokenize("group by a order   by b");
        assert_eq!(toks[0].text, "GROUP BY");
        assert_eq!(toks[0].kind, TokenKind::Keyword(KeywordKind::ClauseStart));
        assert_eq!(toks[2].text, "ORDER BY");
    }

    #[test]
    fn test_longest_join_variant_wins() {
        let toks = tokenize("left outer join t");
        assert_eq!(toks[0].text, "LEFT OUTER JOIN");
        assert_eq!(toks[0].kind, TokenKind::Keyword(KeywordKind::Join));
        assert_eq!(toks[1].text, "t");
    }

    #[test]
    fn test_union_all_vs_union() {
        let toks = tokenize("union all");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].text, "UNION ALL");

        let toks = tokenize("union select");
        assert_eq!(toks[0].text, "UNION");
        assert_eq!(toks[0].kind, TokenKind::Keyword(KeywordKind::SetOp));
    }

    #[test]
    fn test_keyword_not_matched_inside_identifier() {
        let toks = tokenize("ordering selection group");
        assert!(toks.iter().all(|t| t.kind == TokenKind::Name));
        assert_eq!(toks[0].text, "ordering");
        // `group` without `by` is an identifier, not a keyword.
        assert_eq!(toks[2].text, "group");
    }

    #[test]
    fn test_string_literal_is_verbatim() {
        let toks = tokenize("where name = 'select  from'");
        let lit = toks.last().unwrap();
        assert_eq!(lit.kind, TokenKind::StringLiteral);
        assert_eq!(lit.text, "'select  from'");
    }

    #[test]
    fn test_doubled_quote_escape() {
        let toks = tokenize("'it''s fine' x");
        assert_eq!(toks[0].text, "'it''s fine'");
        assert_eq!(toks[1].text, "x");
    }

    #[test]
    fn test_unterminated_literal_runs_to_end() {
        let toks = tokenize("select 'oops");
        assert_eq!(toks[1].kind, TokenKind::StringLiteral);
        assert_eq!(toks[1].text, "'oops");
    }

    #[test]
    fn test_comments() {
        let toks = tokenize("select a -- trailing\nfrom t");
        assert_eq!(toks[2].kind, TokenKind::LineComment);
        assert_eq!(toks[2].text, "-- trailing");
        assert_eq!(toks[3].text, "FROM");

        let toks = tokenize("select /* a, b */ c");
        assert_eq!(toks[1].kind, TokenKind::BlockComment);
        assert_eq!(toks[1].text, "/* a, b */");
    }

    #[test]
    fn test_punctuation_and_operators() {
        assert_eq!(
            kinds("f(a, b) >= 1.5"),
            vec![
                TokenKind::Name,
                TokenKind::ParenOpen,
                TokenKind::Name,
                TokenKind::Comma,
                TokenKind::Name,
                TokenKind::ParenClose,
                TokenKind::Operator,
                TokenKind::Number,
            ]
        );
        let toks = tokenize("a.b <> c");
        assert_eq!(toks[1].kind, TokenKind::Dot);
        assert_eq!(toks[3].text, "<>");
    }

    #[test]
    fn test_placeholder_token() {
        let toks = tokenize("where a = ?");
        assert_eq!(toks.last().unwrap().kind, TokenKind::Placeholder);
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(texts("1 2.5 0x1f 1e10 3.0e-2"), vec!["1", "2.5", "0x1f", "1e10", "3.0e-2"]);
    }

    #[test]
    fn test_spans_cover_source_words() {
        let src = "select  a  from  t";
        for tok in tokenize(src) {
            if tok.kind == TokenKind::Name {
                assert_eq!(&src[tok.spos..tok.epos], tok.text);
            }
        }
    }
}
