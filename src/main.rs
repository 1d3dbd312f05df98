use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use sqltidy::mode::Mode;

/// sqltidy - a SQL beautifier.
/// Uppercases keywords, reflows clauses, and aligns column aliases.
#[derive(Parser, Debug)]
#[command(name = "sqltidy", version, about)]
struct Cli {
    /// Files or directories to beautify. Use "-" to read from stdin.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Spaces per indent level (overrides config; default 2).
    #[arg(short = 'i', long)]
    indent: Option<usize>,

    /// Check formatting without writing changes.
    #[arg(long)]
    check: bool,

    /// Show formatting diff.
    #[arg(long)]
    diff: bool,

    /// Skip the content-equivalence safety check (faster).
    #[arg(long)]
    fast: bool,

    /// Glob patterns to exclude.
    #[arg(long)]
    exclude: Vec<String>,

    /// Raw insert values (e.g. "<Val1> <Val2>") used to replace `?`
    /// placeholders before beautifying. Only valid with stdin input.
    #[arg(long)]
    inserts: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long)]
    quiet: bool,

    /// Path to config file (sqltidy.toml or pyproject.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let is_stdin = cli.files.len() == 1 && cli.files[0].to_string_lossy() == "-";

    let base_mode = match sqltidy::load_config(&cli.files, cli.config.as_deref()) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };

    let mode = Mode {
        indent_width: cli.indent.unwrap_or(base_mode.indent_width),
        check: cli.check,
        diff: cli.diff,
        fast: cli.fast,
        exclude: if cli.exclude.is_empty() {
            base_mode.exclude
        } else {
            cli.exclude
        },
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    if is_stdin {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;

        if let Some(raw) = cli.inserts.as_deref() {
            let values = sqltidy::parse_inserts(raw);
            source = match sqltidy::substitute(&source, &values) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(2);
                }
            };
        }

        print!("{}", sqltidy::beautify(&source, &mode));
        return Ok(());
    }

    if cli.inserts.is_some() {
        eprintln!("Error: --inserts is only valid with stdin input (\"-\")");
        std::process::exit(2);
    }

    let report = sqltidy::run(&cli.files, &mode);

    if !mode.quiet {
        if mode.verbose {
            print_verbose_results(&report);
        }
        eprintln!("{}", report.summary());
    }

    report.print_errors();

    if report.has_errors() {
        std::process::exit(2);
    } else if mode.check && report.has_changes() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_verbose_results(report: &sqltidy::report::Report) {
    for result in &report.results {
        match result.status {
            sqltidy::report::FileStatus::Changed => {
                eprintln!("reformatted {}", result.path.display());
            }
            sqltidy::report::FileStatus::Error => {
                eprintln!(
                    "error: {}: {}",
                    result.path.display(),
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            sqltidy::report::FileStatus::Unchanged => {}
        }
    }
}
