use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use got_sdk::{hash_only, ErrorCategory, Got, HashOptions, InitOptions, ObjectId, SdkError};
use serde::Serialize;

use crate::cli::*;

/// Process-level inputs a command may touch.
pub struct Io<'a> {
    pub cwd: PathBuf,
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
}

pub fn run_command(cli: Cli, io: &mut Io<'_>) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(args, format, io),
        Command::HashObject(args) => cmd_hash_object(args, format, io),
        Command::CatFile(args) => cmd_cat_file(args, format, io),
    }
}

#[derive(Serialize)]
struct InitReport<'a> {
    path: &'a Path,
    branch: &'a str,
}

fn cmd_init(args: InitArgs, format: OutputFormat, io: &mut Io<'_>) -> anyhow::Result<()> {
    let path = match args.path {
        Some(p) => io.cwd.join(p),
        None => io.cwd.clone(),
    };
    let mut options = InitOptions::default();
    if let Some(branch) = args.initial_branch {
        options.default_branch = branch;
    }
    let got = Got::init_with(&path, &options)?;
    let got_dir = got.repository().got_dir();

    match format {
        OutputFormat::Text => writeln!(
            io.stdout,
            "{} Initialized empty got repository in {}",
            "✓".green().bold(),
            got_dir.display().to_string().bold()
        )?,
        OutputFormat::Json => write_json(
            io.stdout,
            &InitReport {
                path: got_dir,
                branch: &options.default_branch,
            },
        )?,
    }
    Ok(())
}

#[derive(Serialize)]
struct HashReport<'a> {
    id: ObjectId,
    kind: &'a str,
    written: bool,
}

fn cmd_hash_object(args: HashObjectArgs, format: OutputFormat, io: &mut Io<'_>) -> anyhow::Result<()> {
    let payload = match &args.file {
        Some(file) if !args.stdin => {
            let path = io.cwd.join(file);
            std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?
        }
        _ => {
            let mut buf = Vec::new();
            io.stdin.read_to_end(&mut buf).context("reading standard input")?;
            buf
        }
    };

    let options = HashOptions::new(args.kind).write(args.write);
    let id = if options.write {
        Got::discover(&io.cwd)?.hash_object(&payload, &options)?
    } else {
        hash_only(&options.kind, &payload)?
    };

    match format {
        OutputFormat::Text => writeln!(io.stdout, "{id}")?,
        OutputFormat::Json => write_json(
            io.stdout,
            &HashReport {
                id,
                kind: &options.kind,
                written: options.write,
            },
        )?,
    }
    Ok(())
}

#[derive(Serialize)]
struct CatReport<'a> {
    id: ObjectId,
    kind: &'a str,
    size: usize,
    content: String,
}

fn cmd_cat_file(args: CatFileArgs, format: OutputFormat, io: &mut Io<'_>) -> anyhow::Result<()> {
    let got = Got::discover(&io.cwd)?;
    let id = got.resolve(&args.object)?;
    let payload = got.cat_file(&args.object, &args.kind)?;

    match format {
        OutputFormat::Text => io.stdout.write_all(&payload)?,
        OutputFormat::Json => write_json(
            io.stdout,
            &CatReport {
                id,
                kind: &args.kind,
                size: payload.len(),
                content: String::from_utf8_lossy(&payload).into_owned(),
            },
        )?,
    }
    Ok(())
}

#[derive(Serialize)]
struct ErrorReport {
    error: String,
    category: Option<ErrorCategory>,
}

/// Print a failed command as JSON, tagged with its category when the
/// failure came from the SDK.
pub fn report_error(err: &anyhow::Error, out: &mut dyn Write) -> anyhow::Result<()> {
    let category = err.downcast_ref::<SdkError>().map(SdkError::category);
    write_json(
        out,
        &ErrorReport {
            error: format!("{err:#}"),
            category,
        },
    )
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
