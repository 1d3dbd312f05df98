use thiserror::Error;

/// User-facing errors. The beautify pipeline itself never surfaces an error;
/// these cover the configuration, file, and placeholder-substitution
/// surfaces around it.
#[derive(Error, Debug)]
pub enum SqltidyError {
    #[error("sqltidy config error: {0}")]
    Config(String),

    #[error("sqltidy placeholder error: {0}")]
    Placeholder(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SqltidyError>;
