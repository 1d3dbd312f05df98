use serde::Deserialize;

/// Mode holds all beautifier configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Mode {
    /// Spaces per indent level.
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    #[serde(default)]
    pub check: bool,

    #[serde(default)]
    pub diff: bool,

    /// Skip the content-equivalence safety check when writing files.
    #[serde(default)]
    pub fast: bool,

    /// Glob patterns to exclude during file discovery.
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub quiet: bool,
}

fn default_indent_width() -> usize {
    2
}

impl Mode {
    /// Whether the equivalence safety check should run before writing.
    pub fn should_safety_check(&self) -> bool {
        !self.fast && !self.check && !self.diff
    }

    /// SQL file extensions to process.
    pub fn sql_extensions(&self) -> &[&str] {
        &["sql", "ddl", "dml"]
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self {
            indent_width: 2,
            check: false,
            diff: false,
            fast: false,
            exclude: Vec::new(),
            verbose: false,
            quiet: false,
        }
    }
}
