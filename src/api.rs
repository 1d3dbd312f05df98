use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use crate::lexer::tokenize;
use crate::mode::Mode;
use crate::normalizer::normalize_keywords;
use crate::renderer::Renderer;
use crate::report::{FileResult, FileStatus, Report};
use crate::token::TokenKind;
use crate::whitespace::canonicalize;

/// Diagnostic comment prefixed to the untouched input when the pipeline hits
/// an unrecoverable internal fault.
pub const FAILURE_MARKER: &str = "-- sqltidy: reformatting failed; original statement follows";

/// Beautify a SQL string. This never fails: structural ambiguity degrades to
/// a keyword-normalized pass-through of the affected span, and any internal
/// fault returns the original input behind a one-line diagnostic comment.
pub fn beautify(source: &str, mode: &Mode) -> String {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| beautify_inner(source, mode)));
    match outcome {
        Ok(text) => text,
        Err(_) => format!("{}\n{}", FAILURE_MARKER, source),
    }
}

/// The five stages in fixed order: normalize -> segment (with subquery
/// recursion) -> split -> render -> canonicalize. Stages 2-4 operate on the
/// token stream inside the renderer; stage 1 stands alone only on the
/// pass-through path, where layout must be preserved.
fn beautify_inner(source: &str, mode: &Mode) -> String {
    let tokens = tokenize(source);

    // A `--` comment owns the rest of its physical line, so reflowing would
    // change what it comments out. Keep the original layout in that case.
    let reflowable = !tokens.iter().any(|t| t.kind == TokenKind::LineComment);

    let text = if reflowable {
        match Renderer::new(mode.indent_width).render_statement(&tokens, 0) {
            Some(block) => block,
            None => normalize_keywords(source, &tokens),
        }
    } else {
        normalize_keywords(source, &tokens)
    };

    canonicalize(&text)
}

/// Verify that formatting preserved content: the output must lex to the same
/// token stream as the input (same kinds, same case-folded text).
pub fn tokens_equivalent(original: &str, formatted: &str) -> bool {
    let a = tokenize(original);
    let b = tokenize(formatted);
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| {
        x.kind == y.kind && normalized_text(&x.text) == normalized_text(&y.text)
    })
}

fn normalized_text(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the beautifier over a collection of files and directories.
pub fn run(files: &[PathBuf], mode: &Mode) -> Report {
    let mut report = Report::new();
    for path in get_matching_paths(files, mode) {
        report.add(format_file(&path, mode));
    }
    report
}

fn format_file(path: &Path, mode: &Mode) -> FileResult {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => return FileResult::error(path, format!("read error: {}", e)),
    };

    let formatted = beautify(&source, mode);

    if mode.should_safety_check() && !tokens_equivalent(&source, &formatted) {
        return FileResult::error(
            path,
            "content changed during reformatting; file left untouched".to_string(),
        );
    }

    if source == formatted {
        return FileResult::new(path, FileStatus::Unchanged);
    }

    if mode.check || mode.diff {
        if mode.diff {
            print_diff(path, &source, &formatted);
        }
        return FileResult::new(path, FileStatus::Changed);
    }

    match std::fs::write(path, &formatted) {
        Ok(()) => FileResult::new(path, FileStatus::Changed),
        Err(e) => FileResult::error(path, format!("write error: {}", e)),
    }
}

/// All SQL files reachable from the given paths, deduplicated and sorted.
pub fn get_matching_paths(paths: &[PathBuf], mode: &Mode) -> Vec<PathBuf> {
    let extensions = mode.sql_extensions();
    let mut found = HashSet::new();

    for path in paths {
        if path.is_file() {
            if is_sql_file(path, extensions) {
                found.insert(path.clone());
            }
        } else if path.is_dir() {
            collect_sql_files(path, extensions, &mode.exclude, &mut found);
        }
    }

    let mut sorted: Vec<PathBuf> = found.into_iter().collect();
    sorted.sort();
    sorted
}

fn is_sql_file(path: &Path, extensions: &[&str]) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    extensions.iter().any(|ext| {
        name.len() > ext.len() + 1 && name.ends_with(ext) && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
    })
}

fn collect_sql_files(
    dir: &Path,
    extensions: &[&str],
    exclude: &[String],
    found: &mut HashSet<PathBuf>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if name.starts_with('.') {
            continue;
        }
        if exclude.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(&name))
                .unwrap_or(false)
        }) {
            continue;
        }

        if path.is_dir() {
            collect_sql_files(&path, extensions, exclude, found);
        } else if is_sql_file(&path, extensions) {
            found.insert(path);
        }
    }
}

fn print_diff(path: &Path, original: &str, formatted: &str) {
    use similar::{ChangeTag, TextDiff};

    eprintln!("--- {}", path.display());
    eprintln!("+++ {}", path.display());

    let diff = TextDiff::from_lines(original, formatted);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        eprint!("{}{}", sign, change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_beautify_simple_select() {
        let out = beautify("select a, b from t", &Mode::default());
        assert_eq!(out, "SELECT\n  a,\n  b\nFROM\n  t\n");
    }

    #[test]
    fn test_beautify_is_idempotent() {
        let mode = Mode::default();
        let once = beautify(
            "select a as x, bb as yy from t join u on u.id = t.id and u.x = 1",
            &mode,
        );
        assert_eq!(beautify(&once, &mode), once);
    }

    #[test]
    fn test_select_without_from_passes_through() {
        assert_eq!(beautify("select 1", &Mode::default()), "SELECT 1\n");
    }

    #[test]
    fn test_line_comment_forces_passthrough() {
        let out = beautify("select a -- keep me\nfrom t", &Mode::default());
        assert_eq!(out, "SELECT a -- keep me\nFROM t\n");
    }

    #[test]
    fn test_comment_passthrough_still_tidies_spacing() {
        // An apostrophe inside the comment must not suppress canonicalization
        // of the lines after it.
        let out = beautify("select a  -- don't reorder\nfrom   t   \n", &Mode::default());
        assert_eq!(out, "SELECT a -- don't reorder\nFROM t\n");
    }

    #[test]
    fn test_trailing_comma_preserved() {
        let source = "select a, b, from t";
        let out = beautify(source, &Mode::default());
        assert_eq!(out, "SELECT\n  a, b,\nFROM\n  t\n");
        assert!(tokens_equivalent(source, &out));
    }

    #[test]
    fn test_doubled_comma_preserved() {
        let source = "select a,, b from t";
        let out = beautify(source, &Mode::default());
        assert!(tokens_equivalent(source, &out));
    }

    #[test]
    fn test_broken_input_yields_output() {
        let out = beautify("select a from (t where", &Mode::default());
        assert!(!out.is_empty());
    }

    #[test]
    fn test_tokens_equivalent() {
        assert!(tokens_equivalent("select a from t", "SELECT\n  a\nFROM\n  t\n"));
        assert!(!tokens_equivalent("select a from t", "select b from t"));
        assert!(!tokens_equivalent("select a from t", "select a from t where 1"));
    }

    #[test]
    fn test_content_preserved_through_beautify() {
        let source = "select f(a, b) as c, d from t where x = 'It''s  ok' and y > 2";
        let out = beautify(source, &Mode::default());
        assert!(tokens_equivalent(source, &out));
    }

    #[test]
    fn test_is_sql_file() {
        let extensions = &["sql", "ddl", "dml"];
        assert!(is_sql_file(Path::new("query.sql"), extensions));
        assert!(is_sql_file(Path::new("SCHEMA.DDL"), extensions));
        assert!(!is_sql_file(Path::new("query.py"), extensions));
        assert!(!is_sql_file(Path::new("sql"), extensions));
    }
}
