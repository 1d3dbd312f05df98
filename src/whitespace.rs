//! Whitespace canonicalization, the final stage. Collapses interior runs of
//! spaces, trims trailing space, and caps blank-line runs — while never
//! touching quoted spans and comments (whose spacing is content) or
//! alignment lines (whose padding spaces are intentional). Idempotent.

/// Tracks whether scanning is inside a quoted span or a block comment,
/// across lines. A `--` comment never crosses a line, so it needs no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanState {
    Outside,
    Quote(u8),
    Comment,
}

/// Canonicalize whitespace in fully rendered text:
/// - collapse runs of two or more spaces to one, except inside quotes or
///   comments and on lines carrying an ` AS ` alignment marker;
/// - preserve leading indentation;
/// - trim trailing spaces from each line (unless the line ends mid-span);
/// - collapse three or more consecutive blank lines to exactly one;
/// - end non-empty output with exactly one trailing newline.
pub fn canonicalize(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut in_span: Vec<bool> = Vec::new();
    let mut state = SpanState::Outside;

    for line in text.split('\n') {
        in_span.push(state != SpanState::Outside);
        let (processed, next_state) = process_line(line, state);
        state = next_state;
        lines.push(processed);
    }

    let mut out: Vec<&str> = Vec::new();
    let mut blank_run = 0usize;
    for (i, line) in lines.iter().enumerate() {
        let is_blank = line.is_empty() && !in_span[i];
        if is_blank {
            blank_run += 1;
            continue;
        }
        if blank_run > 0 && !out.is_empty() {
            // Runs of three or more blanks collapse to one; shorter runs stay.
            let keep = if blank_run >= 3 { 1 } else { blank_run };
            for _ in 0..keep {
                out.push("");
            }
        }
        blank_run = 0;
        out.push(line);
    }

    if out.is_empty() {
        return String::new();
    }
    let mut result = out.join("\n");
    result.push('\n');
    result
}

/// Process one line: collapse interior space runs outside quotes and
/// comments, preserve leading indent, and trim trailing space. Returns the
/// processed line and the span state at the line's end. Alignment lines
/// (containing ` AS ` outside quotes) are copied as-is apart from
/// trailing-space trimming.
fn process_line(line: &str, start_state: SpanState) -> (String, SpanState) {
    let end_state = scan_span_state(line, start_state);

    // Lines that begin inside a literal or block comment are content.
    if start_state != SpanState::Outside {
        return (line.to_string(), end_state);
    }

    let protected = has_alignment_marker(line);
    let body = if end_state == SpanState::Outside {
        line.trim_end_matches([' ', '\t', '\r'])
    } else {
        line
    };

    if protected {
        return (body.to_string(), end_state);
    }

    let mut out = String::with_capacity(body.len());
    let mut state = SpanState::Outside;
    let mut chars = body.char_indices().peekable();

    // Leading indentation is preserved untouched.
    while matches!(chars.peek(), Some((_, ' '))) {
        out.push(' ');
        chars.next();
    }

    while let Some((pos, c)) = chars.next() {
        match state {
            SpanState::Outside => {
                if c == '-' && matches!(chars.peek(), Some((_, '-'))) {
                    // A line comment owns the rest of the line.
                    out.push_str(&body[pos..]);
                    break;
                }
                if c == '/' && matches!(chars.peek(), Some((_, '*'))) {
                    out.push_str("/*");
                    chars.next();
                    state = SpanState::Comment;
                } else if c == ' ' {
                    out.push(' ');
                    while matches!(chars.peek(), Some((_, ' '))) {
                        chars.next();
                    }
                } else {
                    if c == '\'' || c == '"' {
                        state = SpanState::Quote(c as u8);
                    }
                    out.push(c);
                }
            }
            SpanState::Quote(q) => {
                let q = q as char;
                out.push(c);
                if c == q {
                    if chars.peek().map(|&(_, n)| n) == Some(q) {
                        out.push(q);
                        chars.next();
                    } else {
                        state = SpanState::Outside;
                    }
                } else if c == '\\' {
                    if let Some((_, escaped)) = chars.next() {
                        out.push(escaped);
                    }
                }
            }
            SpanState::Comment => {
                out.push(c);
                if c == '*' && matches!(chars.peek(), Some((_, '/'))) {
                    out.push('/');
                    chars.next();
                    state = SpanState::Outside;
                }
            }
        }
    }

    (out, end_state)
}

/// Span state after scanning the whole line from `start_state`.
fn scan_span_state(line: &str, start_state: SpanState) -> SpanState {
    let bytes = line.as_bytes();
    let mut state = start_state;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match state {
            SpanState::Outside => {
                if b == b'-' && bytes.get(i + 1) == Some(&b'-') {
                    // The rest of the line is a comment; it ends with the line.
                    return SpanState::Outside;
                }
                if b == b'/' && bytes.get(i + 1) == Some(&b'*') {
                    state = SpanState::Comment;
                    i += 1;
                } else if b == b'\'' || b == b'"' {
                    state = SpanState::Quote(b);
                }
            }
            SpanState::Quote(q) => {
                if b == q {
                    if bytes.get(i + 1) == Some(&q) {
                        i += 1;
                    } else {
                        state = SpanState::Outside;
                    }
                } else if b == b'\\' {
                    i += 1;
                }
            }
            SpanState::Comment => {
                if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    state = SpanState::Outside;
                    i += 1;
                }
            }
        }
        i += 1;
    }
    state
}

/// True if the line contains a ` AS ` marker outside quotes and comments.
fn has_alignment_marker(line: &str) -> bool {
    let bytes = line.as_bytes();
    let mut state = SpanState::Outside;
    let mut i = 0;
    while i + 3 < bytes.len() {
        let b = bytes[i];
        match state {
            SpanState::Outside => {
                if &bytes[i..i + 4] == b" AS " {
                    return true;
                }
                if b == b'-' && bytes[i + 1] == b'-' {
                    return false;
                }
                if b == b'/' && bytes[i + 1] == b'*' {
                    state = SpanState::Comment;
                    i += 1;
                } else if b == b'\'' || b == b'"' {
                    state = SpanState::Quote(b);
                }
            }
            SpanState::Quote(q) => {
                if b == q && bytes.get(i + 1) != Some(&q) {
                    state = SpanState::Outside;
                } else if b == q || b == b'\\' {
                    i += 1;
                }
            }
            SpanState::Comment => {
                if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    state = SpanState::Outside;
                    i += 1;
                }
            }
        }
        i += 1;
    }
    false
}
