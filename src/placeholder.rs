//! Ordered `?`-placeholder substitution, the companion step to the
//! beautifier. Values come from an angle-bracket list (`<Val1> <Val2>`), and
//! each `?` outside string literals and comments is replaced with the next
//! value in order. The cursor is an explicit index threaded through the
//! scan; there is no shared mutable state.

use memchr::memchr;

use crate::error::{Result, SqltidyError};

/// Extract values from a raw inserts string: the contents of each `<...>`
/// pair, in order. Text outside angle brackets is ignored.
pub fn parse_inserts(raw: &str) -> Vec<String> {
    let bytes = raw.as_bytes();
    let mut values = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let Some(open) = memchr(b'<', &bytes[i..]) else {
            break;
        };
        let start = i + open + 1;
        let Some(close) = memchr(b'>', &bytes[start..]) else {
            break;
        };
        values.push(raw[start..start + close].to_string());
        i = start + close + 1;
    }
    values
}

/// Replace each `?` in `sql` with the next value, single-quoted, skipping
/// `?` inside string literals, quoted names, and comments. Errors if the
/// statement has more `?` markers than there are values; surplus values are
/// ignored.
pub fn substitute(sql: &str, values: &[String]) -> Result<String> {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut cursor = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            q @ (b'\'' | b'"') => i = copy_quoted(sql, bytes, i, q, &mut out),
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                let end = memchr(b'\n', &bytes[i..]).map_or(bytes.len(), |off| i + off);
                out.push_str(&sql[i..end]);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = find_block_comment_end(bytes, i);
                out.push_str(&sql[i..end]);
                i = end;
            }
            b'?' => {
                let value = values.get(cursor).ok_or_else(|| {
                    SqltidyError::Placeholder(format!(
                        "more `?` placeholders than insert values ({} provided)",
                        values.len()
                    ))
                })?;
                out.push('\'');
                out.push_str(&value.replace('\'', "''"));
                out.push('\'');
                cursor += 1;
                i += 1;
            }
            b if b < 0x80 => {
                out.push(b as char);
                i += 1;
            }
            _ => {
                let ch_len = sql[i..].chars().next().map_or(1, |c| c.len_utf8());
                out.push_str(&sql[i..i + ch_len]);
                i += ch_len;
            }
        }
    }
    Ok(out)
}

fn copy_quoted(sql: &str, bytes: &[u8], start: usize, quote: u8, out: &mut String) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 2;
        } else if b == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
            } else {
                i += 1;
                break;
            }
        } else {
            i += 1;
        }
    }
    let end = i.min(bytes.len());
    out.push_str(&sql[start..end]);
    end
}

fn find_block_comment_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}
