use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use hashfs_resolve::DescentPolicy;
use hashfs_server::{HashfsServer, ServerConfig};
use hashfs_snapshot::Encoder;
use hashfs_store::{FsBlobStore, ObjectCodec};
use hashfs_types::{parse_exact_hash, ContentHash};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_toml_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(store) = cli.store {
        config.store_root = store;
    }

    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::Encode(args) => cmd_encode(config, args).await,
    }
}

async fn cmd_serve(config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    let config = apply_serve_args(config, &args);

    let store = Arc::new(open_store(&config).await?);
    let root = match parse_exact_hash(&args.file) {
        Some(hash) => hash,
        None => snapshot(&ObjectCodec::new(store.clone()), Path::new(&args.file)).await?,
    };

    println!(
        "{} {} serving {} on {}",
        "✓".green().bold(),
        config.name.bold(),
        root.to_string().yellow(),
        format!("http://{}/", config.bind_addr).blue()
    );
    HashfsServer::new(config, store, root).serve().await?;
    Ok(())
}

async fn cmd_encode(config: ServerConfig, args: Vec<String>) -> anyhow::Result<()> {
    let [path] = args.as_slice() else {
        bail!("expected exactly one path to encode, got {}", args.len());
    };
    let store = open_store(&config).await?;
    let root = snapshot(&ObjectCodec::new(Arc::new(store)), Path::new(path)).await?;
    println!("{root}");
    Ok(())
}

fn apply_serve_args(mut config: ServerConfig, args: &ServeArgs) -> ServerConfig {
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(name) = &args.name {
        config.name = name.clone();
    }
    if args.strict {
        config.descent = DescentPolicy::Strict;
    }
    config
}

async fn open_store(config: &ServerConfig) -> anyhow::Result<FsBlobStore> {
    FsBlobStore::open(&config.store_root)
        .await
        .with_context(|| format!("opening store at {}", config.store_root.display()))
}

async fn snapshot(codec: &ObjectCodec, path: &Path) -> anyhow::Result<ContentHash> {
    let root = Encoder::new(codec.clone())
        .encode_wrapped_hash(path)
        .await
        .with_context(|| format!("snapshotting {}", path.display()))?;
    tracing::info!(path = %path.display(), %root, "snapshot complete");
    Ok(root)
}
