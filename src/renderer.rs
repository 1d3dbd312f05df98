//! Layout rendering: clause keywords on their own lines, alias-aligned
//! expression lists, indented join conditions, and blank-line-separated set
//! operators. Subqueries are rendered bottom-up by recursing through
//! `render_statement` one indent level deeper.

use crate::segmenter::{find_matching_paren, is_statement, segment, Clause, ClauseKind};
use crate::splitter::{split_alias, split_on_commas, split_predicates};
use crate::token::{KeywordKind, Token, TokenKind};

pub struct Renderer {
    indent_width: usize,
}

impl Renderer {
    pub fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }

    fn indent(&self, level: usize) -> String {
        " ".repeat(self.indent_width * level)
    }

    /// Render a full statement at the given indent level. Returns None when
    /// the tokens are not a reflowable statement (no depth-zero SELECT/FROM
    /// pair); the caller then passes the span through unchanged.
    pub fn render_statement(&self, tokens: &[Token], level: usize) -> Option<String> {
        if !is_statement(tokens) {
            return None;
        }

        let mut lines: Vec<String> = Vec::new();
        for clause in segment(tokens) {
            self.render_clause(&clause, level, &mut lines);
        }
        Some(lines.join("\n"))
    }

    fn render_clause(&self, clause: &Clause<'_>, level: usize, lines: &mut Vec<String>) {
        match clause.kind {
            ClauseKind::Leading => {
                lines.push(format!(
                    "{}{}",
                    self.indent(level),
                    self.render_value(clause.body, level)
                ));
            }
            ClauseKind::Select => self.render_select(clause, level, lines),
            ClauseKind::From => {
                lines.push(format!("{}{}", self.indent(level), keyword_text(clause)));
                self.render_list(clause.body, level, false, lines);
            }
            ClauseKind::GroupBy | ClauseKind::OrderBy => {
                lines.push(format!("{}{}", self.indent(level), keyword_text(clause)));
                self.render_list(clause.body, level, true, lines);
            }
            ClauseKind::Where | ClauseKind::Having => {
                lines.push(format!("{}{}", self.indent(level), keyword_text(clause)));
                for pred in split_predicates(clause.body) {
                    let value = self.render_value(pred.tokens, level + 1);
                    match pred.connective {
                        Some(conn) => lines.push(format!(
                            "{}{} {}",
                            self.indent(level + 1),
                            conn.text,
                            value
                        )),
                        None => lines.push(format!("{}{}", self.indent(level + 1), value)),
                    }
                }
            }
            ClauseKind::Limit => {
                let mut line = format!("{}{}", self.indent(level), keyword_text(clause));
                if !clause.body.is_empty() {
                    line.push(' ');
                    line.push_str(&self.render_value(clause.body, level));
                }
                lines.push(line);
            }
            ClauseKind::Join => self.render_join(clause, level, lines),
            ClauseKind::SetOp => {
                lines.push(String::new());
                lines.push(format!("{}{}", self.indent(level), keyword_text(clause)));
                lines.push(String::new());
                if !clause.body.is_empty() {
                    lines.push(format!(
                        "{}{}",
                        self.indent(level),
                        self.render_value(clause.body, level)
                    ));
                }
            }
        }
    }

    fn render_select(&self, clause: &Clause<'_>, level: usize, lines: &mut Vec<String>) {
        let mut keyword_line = format!("{}{}", self.indent(level), keyword_text(clause));
        let mut body = clause.body;
        if let Some(first) = body.first() {
            if first.is_keyword_text("DISTINCT") || first.is_keyword_text("ALL") {
                keyword_line.push(' ');
                keyword_line.push_str(&first.text);
                body = &body[1..];
            }
        }
        lines.push(keyword_line);
        self.render_list(body, level, true, lines);
    }

    /// Render a comma-separated expression list, one expression per line,
    /// trailing commas on all lines but the last. With `align`, pad every
    /// single-line aliased expression so all AS markers share a column.
    /// A malformed list (a trailing or doubled comma leaves an empty slot)
    /// is emitted verbatim on one line so no comma token is lost.
    fn render_list(&self, body: &[Token], level: usize, align: bool, lines: &mut Vec<String>) {
        enum Item {
            Aliased { lhs: String, rhs: String },
            Plain(String),
        }

        let exprs = split_on_commas(body);
        if exprs.iter().any(|e| e.is_empty()) {
            lines.push(format!(
                "{}{}",
                self.indent(level + 1),
                self.render_value(body, level + 1)
            ));
            return;
        }

        let mut items = Vec::with_capacity(exprs.len());
        let mut max_lhs = 0;

        for expr in &exprs {
            let (lhs, rhs) = if align {
                split_alias(expr)
            } else {
                (*expr, None)
            };
            match rhs {
                Some(rhs_tokens) => {
                    let lhs_str = self.render_value(lhs, level + 1);
                    let rhs_str = self.render_value(rhs_tokens, level + 1);
                    if lhs_str.contains('\n') {
                        // Multi-line lhs (a subquery) cannot be column-aligned.
                        items.push(Item::Plain(format!("{lhs_str} AS {rhs_str}")));
                    } else {
                        // Width is in characters, to match Display padding.
                        max_lhs = max_lhs.max(lhs_str.chars().count());
                        items.push(Item::Aliased {
                            lhs: lhs_str,
                            rhs: rhs_str,
                        });
                    }
                }
                None => items.push(Item::Plain(self.render_value(expr, level + 1))),
            }
        }

        let count = items.len();
        for (i, item) in items.into_iter().enumerate() {
            let mut line = match item {
                Item::Aliased { lhs, rhs } => {
                    format!("{}{:<width$} AS {}", self.indent(level + 1), lhs, rhs, width = max_lhs)
                }
                Item::Plain(text) => format!("{}{}", self.indent(level + 1), text),
            };
            if i + 1 < count {
                line.push(',');
            }
            lines.push(line);
        }
    }

    /// `<JOIN-TYPE> <table>`, then `ON <pred>`, then each further connective
    /// predicate one level deeper than ON.
    fn render_join(&self, clause: &Clause<'_>, level: usize, lines: &mut Vec<String>) {
        let on_idx = depth_zero_on(clause.body);

        let (table, condition) = match on_idx {
            Some(i) => (&clause.body[..i], Some(&clause.body[i + 1..])),
            None => (clause.body, None),
        };

        let mut head = format!("{}{}", self.indent(level), keyword_text(clause));
        if !table.is_empty() {
            head.push(' ');
            head.push_str(&self.render_value(table, level));
        }
        lines.push(head);

        if let Some(condition) = condition {
            for pred in split_predicates(condition) {
                let value = self.render_value(pred.tokens, level + 1);
                match pred.connective {
                    Some(conn) => lines.push(format!(
                        "{}{} {}",
                        self.indent(level + 2),
                        conn.text,
                        value
                    )),
                    None => lines.push(format!("{}ON {}", self.indent(level + 1), value)),
                }
            }
        }
    }

    /// Flatten tokens into one canonical-spaced span. A parenthesized group
    /// that is itself a statement is rendered as a nested block with the
    /// closing paren on its own line at this value's level.
    pub fn render_value(&self, tokens: &[Token], level: usize) -> String {
        let mut out = String::new();
        let mut prev: Option<&Token> = None;
        let mut glue_sign = false;
        let mut i = 0;

        while i < tokens.len() {
            let tok = &tokens[i];
            if tok.kind == TokenKind::ParenOpen {
                if let Some(close) = find_matching_paren(tokens, i) {
                    let inner = &tokens[i + 1..close];
                    if let Some(block) = self.render_statement(inner, level + 1) {
                        push_token(&mut out, prev, tok, glue_sign);
                        glue_sign = false;
                        out.push('\n');
                        out.push_str(&block);
                        out.push('\n');
                        out.push_str(&self.indent(level));
                        out.push(')');
                        prev = Some(&tokens[close]);
                        i = close + 1;
                        continue;
                    }
                }
            }
            // Two adjacent minus tokens must not fuse into a `--` comment.
            let glue =
                glue_sign && !(tok.text == "-" && prev.is_some_and(|p| p.text == "-"));
            push_token(&mut out, prev, tok, glue);
            glue_sign = is_unary_sign(prev, tok);
            prev = Some(tok);
            i += 1;
        }
        out
    }
}

fn keyword_text<'a>(clause: &'a Clause<'_>) -> &'a str {
    clause.keyword.map(|k| k.text.as_str()).unwrap_or("")
}

/// Index of the first depth-zero ON keyword in a join body.
fn depth_zero_on(body: &[Token]) -> Option<usize> {
    let mut depth: usize = 0;
    for (i, tok) in body.iter().enumerate() {
        match tok.kind {
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && tok.is_keyword(KeywordKind::On) {
            return Some(i);
        }
    }
    None
}

fn push_token(out: &mut String, prev: Option<&Token>, tok: &Token, glue: bool) {
    if !glue && needs_space(prev, tok) {
        out.push(' ');
    }
    out.push_str(&tok.text);
}

/// True when `tok` is a `-` or `+` acting as a sign on the next token: at the
/// start of a value, or right after an operator, comma, open paren, or
/// keyword.
fn is_unary_sign(prev: Option<&Token>, tok: &Token) -> bool {
    if tok.kind != TokenKind::Operator || !matches!(tok.text.as_str(), "-" | "+") {
        return false;
    }
    match prev {
        None => true,
        Some(p) => matches!(
            p.kind,
            TokenKind::Operator | TokenKind::Comma | TokenKind::ParenOpen | TokenKind::Keyword(_)
        ),
    }
}

fn needs_space(prev: Option<&Token>, tok: &Token) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    if prev.kind.glues_to_next() || prev.text == "::" {
        return false;
    }
    if tok.kind.is_never_preceded_by_space() || tok.text == "::" {
        return false;
    }
    // Function call: `count(` not `count (`.
    if tok.kind == TokenKind::ParenOpen
        && matches!(prev.kind, TokenKind::Name | TokenKind::QuotedName)
    {
        return false;
    }
    true
}
