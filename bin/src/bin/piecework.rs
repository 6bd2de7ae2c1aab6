use std::io::{self, Write};

use clap::Parser;
use piecework_bin::{
    cli::{self, Cli},
    script,
};
use piecework_log::LogConfig;

fn main() {
    let cli = Cli::parse();

    let _log_guard = piecework_log::init(LogConfig {
        log_file_path: cli.log_file.clone(),
    })
    .unwrap_or_else(|e| {
        eprintln!("Error: Failed to initialize logging: {e}");
        std::process::exit(1);
    });

    if let Err(e) = run(cli) {
        eprintln!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let document = cli::read_document(cli.input.as_deref())?;
    tracing::info!(
        "loaded document: {} chars, {} edits",
        document.chars().count(),
        cli.edits.len()
    );

    let outcome = script::run(&document, &cli.edits)?;

    let mut stdout = io::stdout().lock();
    for read in &outcome.reads {
        writeln!(stdout, "{read}")?;
    }
    write!(stdout, "{}", outcome.table)?;
    stdout.flush()?;

    if cli.pieces {
        for piece in outcome.table.pieces() {
            eprintln!(
                "{:?} {} {}",
                piece.source(),
                piece.offset(),
                piece.length()
            );
        }
    }
    Ok(())
}
