//! # convostats CLI
//!
//! Command-line front end for the convostats library.

use std::io::{self, IsTerminal, Write};
use std::process;

use chrono::Utc;
use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use convostats::StatsError;
use convostats::cli::Args;
use convostats::core::Analyzer;
use convostats::scanner::{ScanReport, Scanner};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(&args);

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the `-v` level.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), StatsError> {
    let scanner = Scanner::with_config(args.scanner_config());
    let report = if args.utc {
        let analyzer = Analyzer::new()
            .with_timezone(Utc)
            .with_config(scanner.config().analyzer.clone());
        scanner.with_analyzer(analyzer).scan_with_report(&args.folder)?
    } else {
        scanner.scan_with_report(&args.folder)?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        print_summaries(&mut out, &report, args)?;
    }
    Ok(())
}

fn print_summaries(out: &mut impl Write, report: &ScanReport, args: &Args) -> io::Result<()> {
    for stats in &report.conversations {
        write!(out, "{stats}")?;

        let top = match args.min_len {
            Some(min_len) => stats.top_words_with_min_len(args.top, min_len),
            None => stats.top_n_words(args.top),
        };
        if !top.is_empty() {
            let words: Vec<String> = top
                .iter()
                .map(|(word, count)| format!("{word} ({count})"))
                .collect();
            writeln!(out, "Top words: {}", words.join(", "))?;
        }
        writeln!(out)?;
    }

    if !report.skipped.is_empty() {
        writeln!(
            out,
            "Skipped {} conversation(s).",
            report.skipped.len()
        )?;
    }
    Ok(())
}
