use std::io::Write;

use clap::Parser;
use tracing::Level;

mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    let mut io = commands::Io {
        cwd: std::env::current_dir()?,
        stdin: &mut stdin,
        stdout: &mut stdout,
    };
    let format = cli.format;
    match commands::run_command(cli, &mut io) {
        Err(err) if format == cli::OutputFormat::Json => {
            commands::report_error(&err, io.stdout)?;
            io.stdout.flush()?;
            std::process::exit(1);
        }
        result => result,
    }
}
