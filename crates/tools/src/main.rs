use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use trek_core::journal_file::load_journal_from_file;
use trek_core::replay::replay_to_end;
use trek_core::{InputJournal, ReplayResult, Rules};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the journal to replay (JSON, or JSONL with --jsonl)
    #[arg(short, long)]
    journal: PathBuf,
    /// Treat the journal as a hash-chained JSONL file
    #[arg(long)]
    jsonl: bool,
    /// Optional TOML file overriding the default game rules
    #[arg(short, long)]
    rules: Option<PathBuf>,
    /// Emit the result as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ReplaySummary {
    outcome: String,
    snapshot_hash: String,
    final_level: u32,
    moves_applied: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rules = match &args.rules {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read rules file: {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("failed to parse rules file: {}", path.display()))?
        }
        None => Rules::default(),
    };

    let journal: InputJournal = if args.jsonl {
        load_journal_from_file(&args.journal)
            .map_err(|error| anyhow::anyhow!("failed to load JSONL journal: {error}"))?
            .journal
    } else {
        let raw = fs::read_to_string(&args.journal)
            .with_context(|| format!("failed to read journal file: {}", args.journal.display()))?;
        serde_json::from_str(&raw).context("failed to deserialize journal JSON")?
    };

    log::info!("replaying {} inputs for seed {}", journal.inputs.len(), journal.seed);
    let result: ReplayResult = replay_to_end(&rules, &journal)
        .map_err(|error| anyhow::anyhow!("replay failed during execution: {error:?}"))?;

    let summary = ReplaySummary {
        outcome: format!("{:?}", result.outcome),
        snapshot_hash: format!("0x{:016x}", result.final_snapshot_hash),
        final_level: result.final_level,
        moves_applied: result.moves_applied,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Replay complete.");
        println!("Outcome: {}", summary.outcome);
        println!("Final level: {}", summary.final_level);
        println!("Moves applied: {}", summary.moves_applied);
        println!("Snapshot hash: {}", summary.snapshot_hash);
    }

    Ok(())
}
