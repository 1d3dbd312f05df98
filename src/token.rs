/// Position in source string (byte offset).
pub type Pos = usize;

/// Role a recognized keyword plays in clause structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    /// Starts a new clause at depth zero: SELECT, FROM, WHERE, GROUP BY, ...
    ClauseStart,
    /// A join variant: JOIN, LEFT JOIN, FULL OUTER JOIN, ...
    Join,
    /// A set operator: UNION, UNION ALL, EXCEPT, INTERSECT.
    SetOp,
    On,
    As,
    And,
    Or,
    /// Recognized and uppercased, but structurally inert: NOT, NULL, CASE, ...
    Other,
}

/// All token types produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(KeywordKind),
    Name,
    /// Double-quoted identifier, delimiters included.
    QuotedName,
    /// Single-quoted literal, delimiters included.
    StringLiteral,
    Number,
    /// `--` comment, up to but not including the newline.
    LineComment,
    /// `/* ... */` comment, delimiters included.
    BlockComment,
    ParenOpen,
    ParenClose,
    Comma,
    Dot,
    Semicolon,
    /// A bare `?` marker; the beautifier carries it through untouched.
    Placeholder,
    Operator,
}

impl TokenKind {
    /// True for keywords that end the previous clause and start a new one
    /// when they occur at nesting depth zero.
    pub fn is_clause_boundary(self) -> bool {
        matches!(
            self,
            Self::Keyword(KeywordKind::ClauseStart)
                | Self::Keyword(KeywordKind::Join)
                | Self::Keyword(KeywordKind::SetOp)
        )
    }

    /// Tokens whose text must pass through the pipeline byte-for-byte.
    pub fn is_verbatim(self) -> bool {
        matches!(
            self,
            Self::QuotedName | Self::StringLiteral | Self::LineComment | Self::BlockComment
        )
    }

    /// Tokens that never have a space before them when rendering.
    pub fn is_never_preceded_by_space(self) -> bool {
        matches!(
            self,
            Self::Comma | Self::ParenClose | Self::Semicolon | Self::Dot
        )
    }

    /// Tokens that glue to whatever follows them (no trailing space).
    pub fn glues_to_next(self) -> bool {
        matches!(self, Self::ParenOpen | Self::Dot)
    }
}

/// An immutable token. For keywords, `text` holds the canonical uppercase
/// spelling (multi-word keywords single-spaced); for everything else it is
/// the raw source slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub spos: Pos,
    pub epos: Pos,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str, spos: Pos, epos: Pos) -> Self {
        Self {
            kind,
            text: text.to_string(),
            spos,
            epos,
        }
    }

    pub fn is_keyword(&self, kind: KeywordKind) -> bool {
        self.kind == TokenKind::Keyword(kind)
    }

    /// True if this is the given keyword, compared by canonical text.
    pub fn is_keyword_text(&self, canonical: &str) -> bool {
        matches!(self.kind, TokenKind::Keyword(_)) && self.text == canonical
    }
}
