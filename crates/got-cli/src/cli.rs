use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "got",
    about = "got: a content-addressed object store with git-style loose objects",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an empty got repository
    Init(InitArgs),
    /// Compute an object ID and optionally store the object
    HashObject(HashObjectArgs),
    /// Print the payload of a stored object
    CatFile(CatFileArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory)
    pub path: Option<PathBuf>,
    /// Branch name written into HEAD
    #[arg(short = 'b', long, value_name = "NAME")]
    pub initial_branch: Option<String>,
}

#[derive(Args)]
pub struct HashObjectArgs {
    /// Object kind
    #[arg(short = 't', long = "type", value_name = "KIND", default_value = "blob")]
    pub kind: String,
    /// Store the object in the repository
    #[arg(short, long)]
    pub write: bool,
    /// Read the payload from standard input
    #[arg(long, conflicts_with = "file")]
    pub stdin: bool,
    /// Read the payload from a file
    #[arg(required_unless_present = "stdin")]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct CatFileArgs {
    /// Expected object kind
    pub kind: String,
    /// Full object ID
    pub object: String,
}
