//! C-minus front end command line
//!
//! Usage:
//!   cminus [OPTIONS] <FILE>
//!
//! Examples:
//!   cminus prog.cm                       # Scan, parse and check
//!   cminus --emit=table prog.cm          # Print the LL(1) table as CSV
//!   cminus --emit=simplified prog.cm     # Print the grammar without unit productions
//!   cminus --grammar my.grammar prog.cm  # Use another grammar
//!   cminus --tui prog.cm                 # Step through the parse

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cminus::config::{AnalyzerConfig, TRACE_MEMORY_LIMIT};
use cminus::errors::CompileError;
use cminus::lexer::scan;
use cminus::pipeline::Frontend;
use cminus::snapshot::Trace;
use cminus::ui::App;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Scanner, LL(1) table generator and checking parser for C-minus
#[derive(Parser, Debug)]
#[command(name = "cminus")]
#[command(version)]
#[command(about = "LL(1) front end for the C-minus language", long_about = None)]
struct Cli {
    /// Source file to check
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Grammar file (defaults to the bundled C-minus grammar)
    #[arg(short, long, value_name = "FILE")]
    grammar: Option<PathBuf>,

    /// What to print
    #[arg(long, default_value = "check")]
    emit: EmitKind,

    /// Also write the parse table as CSV to this file
    #[arg(long, value_name = "FILE")]
    table_csv: Option<PathBuf>,

    /// Fixed FOLLOW sweeps and last-wins table conflicts
    #[arg(long)]
    compat: bool,

    /// Step through the parse in a terminal viewer
    #[arg(long)]
    tui: bool,

    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress warnings)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EmitKind {
    /// Accept or reject the program
    Check,
    /// Token stream with literal tables
    Tokens,
    /// FIRST, FOLLOW and FIRST+ sets of the grammar
    Sets,
    /// Parse table as CSV
    Table,
    /// Symbol table after a successful parse
    Symbols,
    /// Grammar with unit productions inlined
    Simplified,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let config = if cli.compat {
        AnalyzerConfig::compat()
    } else {
        AnalyzerConfig::default()
    };
    debug!("analyzer config: {:?}", config);

    // The grammar is built before the source is touched
    info!("Building parse table...");
    let frontend = match &cli.grammar {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read grammar file: {:?}", path))?;
            Frontend::new(&text, &config)
        }
        None => Frontend::with_default_grammar(&config),
    }
    .context("Failed to build the parse table")?;

    if let Some(path) = &cli.table_csv {
        let csv = frontend.analysis().table.to_csv(frontend.grammar());
        fs::write(path, csv).with_context(|| format!("Failed to write table: {:?}", path))?;
        info!("Wrote parse table to {:?}", path);
    }

    match cli.emit {
        EmitKind::Sets => {
            print!("{}", frontend.analysis().render_sets(frontend.grammar()));
            return Ok(());
        }
        EmitKind::Simplified => {
            print!("{}", frontend.grammar().remove_unit_productions().to_text());
            return Ok(());
        }
        EmitKind::Table => {
            print!("{}", frontend.analysis().table.to_csv(frontend.grammar()));
            return Ok(());
        }
        _ => {}
    }

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read input file: {:?}", cli.input))?;

    if cli.tui {
        return run_viewer(&frontend, source);
    }

    match cli.emit {
        EmitKind::Tokens => {
            let scanned = scan(&source)?;
            for token in &scanned.tokens {
                println!(
                    "{:>4}  {:<12} {}",
                    token.line,
                    format!("{:?}", token.kind),
                    scanned.lexeme(token)
                );
            }
            println!();
            for (i, n) in scanned.numbers.iter().enumerate() {
                println!("NUM {:>3}  {}", i + 1, n);
            }
            for (i, id) in scanned.identifiers.iter().enumerate() {
                println!("ID  {:>3}  {}", i + 1, id);
            }
        }
        EmitKind::Symbols => {
            let outcome = frontend.check(&source)?;
            for (i, entry) in outcome.symbols.entries().iter().enumerate() {
                println!("{:>3}  {:<16} {}", i + 1, entry.name, entry.role);
            }
        }
        _ => {
            let outcome = frontend.check(&source)?;
            println!(
                "{}: OK ({} tokens, {} identifiers)",
                cli.input.display(),
                outcome.scan.tokens.len(),
                outcome.symbols.len()
            );
        }
    }

    Ok(())
}

/// Record the parse and open the viewer. Parse errors are shown in the
/// viewer; scan errors abort before it opens.
fn run_viewer(frontend: &Frontend, source: String) -> Result<()> {
    let mut trace = Trace::new(TRACE_MEMORY_LIMIT);
    let failure = match frontend.check_traced(&source, &mut trace) {
        Ok(_) => None,
        Err(CompileError::Parse(e)) => Some(e),
        Err(e) => return Err(e.into()),
    };
    info!("Recorded {} steps", trace.len());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        trace,
        source,
        frontend.grammar().terminals().to_vec(),
        failure,
    );
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("Trace viewer failed")
}
