use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "hashfs",
    about = "Snapshot a directory into a content-addressed store and serve it by hash",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Blob store directory
    #[arg(long, global = true, env = "HASHFS_STORE")]
    pub store: Option<PathBuf>,

    /// TOML server configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve a snapshot over HTTP
    Serve(ServeArgs),
    /// Snapshot a path once and print its wrapper hash
    #[command(external_subcommand)]
    Encode(Vec<String>),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to snapshot, or the hash of an existing root
    #[arg(short, long, default_value = ".")]
    pub file: String,
    #[arg(short, long)]
    pub port: Option<u16>,
    /// Listener name, sent as the `server` header
    #[arg(short, long)]
    pub name: Option<String>,
    /// Reject paths that do not resolve instead of listing the nearest directory
    #[arg(long)]
    pub strict: bool,
}
