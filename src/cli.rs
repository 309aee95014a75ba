//! # secretsctl
//!
//! Command-line interface for inspecting mounted secret volumes.
//!
//! ## Usage
//!
//! ```bash
//! # List secrets and their keys (values are never printed)
//! secretsctl list --root /etc/secrets
//!
//! # Write one value to stdout
//! secretsctl get service password
//!
//! # Dump the whole volume as JSON, values base64-encoded
//! secretsctl dump --base64
//! ```
//!
//! The root defaults to `$SECRETS_ROOT`, then `/etc/secrets`.

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use mounted_secrets::{observability, Key, LoaderConfig, SecretName, Secrets};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "secretsctl")]
#[command(about = "Inspect Kubernetes secret volumes mounted into a pod", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory the secret volumes are mounted under
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Log every visited entry
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List secrets and their keys
    List,
    /// Write a single value to stdout
    Get {
        /// Secret name
        secret: String,
        /// Key within the secret
        key: String,
    },
    /// Print every secret as JSON
    Dump {
        /// Encode values as base64 instead of UTF-8 text
        #[arg(long)]
        base64: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init_tracing(cli.verbose);

    let config = LoaderConfig::from_env().with_root_override(cli.root);
    let secrets = mounted_secrets::walk(&config.root).with_context(|| {
        format!(
            "Failed to load mounted secrets from {}",
            config.root.display()
        )
    })?;
    info!(
        root = %config.root.display(),
        secrets = secrets.len(),
        "Loaded mounted secrets"
    );

    let mut stdout = io::stdout().lock();
    match cli.command {
        Commands::List => list(&secrets, &mut stdout)?,
        Commands::Get { secret, key } => {
            let Some(value) = secrets.value(&secret, &key) else {
                if secrets.contains_secret(&secret) {
                    bail!("Key '{key}' not found in secret '{secret}'");
                }
                bail!("Secret '{secret}' not found");
            };
            stdout
                .write_all(value.as_bytes())
                .context("Failed to write value")?;
        }
        Commands::Dump { base64 } => dump(&secrets, base64, &mut stdout)?,
    }
    stdout.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn list(secrets: &Secrets, out: &mut impl Write) -> Result<()> {
    let sorted: BTreeMap<&SecretName, Vec<&Key>> = secrets
        .iter()
        .map(|(name, data)| {
            let mut keys: Vec<&Key> = data.keys().collect();
            keys.sort();
            (name, keys)
        })
        .collect();

    for (name, keys) in sorted {
        writeln!(out, "{name} ({} keys)", keys.len())?;
        for key in keys {
            writeln!(out, "  {key}")?;
        }
    }
    Ok(())
}

fn dump(secrets: &Secrets, base64: bool, out: &mut impl Write) -> Result<()> {
    let sorted: BTreeMap<&SecretName, BTreeMap<&Key, String>> = secrets
        .iter()
        .map(|(name, data)| {
            let values = data
                .iter()
                .map(|(key, value)| {
                    let rendered = if base64 {
                        STANDARD.encode(value.as_bytes())
                    } else {
                        value.to_string_lossy().into_owned()
                    };
                    (key, rendered)
                })
                .collect();
            (name, values)
        })
        .collect();

    serde_json::to_writer_pretty(&mut *out, &sorted).context("Failed to serialize secrets")?;
    writeln!(out)?;
    Ok(())
}
