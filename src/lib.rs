pub mod api;
pub mod config;
pub mod error;
pub mod keywords;
pub mod lexer;
pub mod mode;
pub mod normalizer;
pub mod placeholder;
pub mod renderer;
pub mod report;
pub mod segmenter;
pub mod splitter;
pub mod token;
pub mod whitespace;

// Re-export the main public API
pub use api::{beautify, get_matching_paths, run, tokens_equivalent};
pub use config::load_config;
pub use error::{Result, SqltidyError};
pub use mode::Mode;
pub use placeholder::{parse_inserts, substitute};
