//! `weir` — one-shot transformer from a legacy register extract to target
//! licence aggregates.
//!
//! # Usage
//!
//! ```
//! weir extract.json                  # aggregates as JSON on stdout
//! weir extract.json -o licences.json # ... or to a file
//! ```
//!
//! A licence that fails to assemble (missing party or address lookup, no
//! usable start date) is logged and skipped; the rest of the batch proceeds.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::{debug, info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
  name = "weir",
  about = "Transform a legacy licence-register extract into target aggregates"
)]
struct Cli {
  /// Path to the extract JSON document.
  input: PathBuf,

  /// Write the aggregates here instead of stdout.
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Pretty-print the output JSON.
  #[arg(long)]
  pretty: bool,
}

fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let raw = std::fs::read_to_string(&cli.input)
    .with_context(|| format!("reading extract {}", cli.input.display()))?;
  let grouped = weir_extract::parse(&raw).context("parsing extract")?;
  if grouped.orphan_rows > 0 {
    warn!(
      orphans = grouped.orphan_rows,
      "extract rows referenced licences or accounts not in the extract"
    );
  }

  let mut licences = Vec::with_capacity(grouped.records.len());
  let mut failed = 0usize;
  for records in &grouped.records {
    match weir_core::licence::assemble(records, &grouped.context) {
      Ok(licence) => {
        for document in &licence.documents {
          debug!(
            document = %document.external_id,
            status = %document.status,
            "assembled document"
          );
          for role in &document.roles {
            debug!(
              document = %document.external_id,
              role = %role.kind,
              "attached role"
            );
          }
        }
        for entry in &licence.addresses {
          debug!(
            licence = %licence.number,
            purpose = %entry.purpose,
            address = %entry.address.external_id,
            "address history entry"
          );
        }
        licences.push(licence);
      }
      Err(err) => {
        failed += 1;
        warn!(
          licence = %records.licence.licence_number,
          %err,
          "skipping licence"
        );
      }
    }
  }
  info!(assembled = licences.len(), failed, "transform complete");

  let json = if cli.pretty {
    serde_json::to_string_pretty(&licences)?
  } else {
    serde_json::to_string(&licences)?
  };
  match &cli.output {
    Some(path) => std::fs::write(path, json)
      .with_context(|| format!("writing {}", path.display()))?,
    None => println!("{json}"),
  }
  Ok(())
}
