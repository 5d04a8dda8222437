//! Replays recorded rounds through every threshold profile.
//!
//! The input is a CSV with an `id,number` header. Profiles run in parallel;
//! one report line per profile is printed, or JSON with `--json`.

use anyhow::{Context, Result};
use clap::Parser;
use roundcast::application::backtest::{BacktestReport, Backtester};
use roundcast::domain::config::{EngineConfig, EngineOverrides, ThresholdProfile};
use roundcast::domain::prediction::Tier;
use roundcast::domain::round::Round;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{Level, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay recorded rounds through the prediction engine", long_about = None)]
struct Args {
    /// CSV file with `id,number` columns
    #[arg(short, long)]
    input: PathBuf,

    /// Comma-separated profiles to compare
    #[arg(short, long, default_value = "standard,strict")]
    profiles: String,

    /// Optional TOML file applied on top of every profile
    #[arg(long)]
    engine_config: Option<PathBuf>,

    /// Rounds kept in history during replay
    #[arg(long, default_value = "1000")]
    history_cap: usize,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct CsvRound {
    id: String,
    number: String,
}

fn read_rounds(path: &Path) -> Result<Vec<Round>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut rounds = Vec::new();
    for (line, record) in reader.deserialize::<CsvRound>().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV record {}", line + 1))?;
        match Round::from_raw(&record.id, &record.number) {
            Ok(round) => rounds.push(round),
            Err(e) => warn!("Skipping CSV record {}: {}", line + 1, e),
        }
    }
    Ok(rounds)
}

fn parse_profiles(s: &str) -> Result<Vec<ThresholdProfile>> {
    s.split(',')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<ThresholdProfile>())
        .collect()
}

fn load_overrides(path: Option<&Path>) -> Result<EngineOverrides> {
    let Some(path) = path else {
        return Ok(EngineOverrides::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_report(report: &BacktestReport) {
    let win_rate = report
        .win_rate
        .map(|rate| format!("{:.2}%", rate * 100.0))
        .unwrap_or_else(|| "n/a".to_string());
    println!(
        "{:<10} rounds={:<6} bets={:<6} wins={:<6} losses={:<6} win_rate={:<8} max_loss_streak={}",
        report.label,
        report.rounds,
        report.actionable(),
        report.wins,
        report.losses,
        win_rate,
        report.max_consecutive_losses
    );
    let tiers: Vec<String> = Tier::ALL
        .iter()
        .filter(|tier| report.tier_count(**tier) > 0)
        .map(|tier| format!("{}={}", tier, report.tier_count(*tier)))
        .collect();
    println!("           {}", tiers.join(" "));
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let args = Args::parse();

    let rounds = read_rounds(&args.input)?;
    info!("Loaded {} rounds from {}", rounds.len(), args.input.display());

    let overrides = load_overrides(args.engine_config.as_deref())?;
    let profiles = parse_profiles(&args.profiles)?
        .into_iter()
        .map(|profile| -> Result<(String, EngineConfig)> {
            let config = EngineConfig::for_profile(profile)
                .with_overrides(&overrides)
                .with_context(|| format!("Invalid engine configuration for {}", profile))?;
            Ok((profile.to_string(), config))
        })
        .collect::<Result<Vec<_>>>()?;

    let reports = Backtester::run_profiles(&rounds, &profiles, args.history_cap);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }
    Ok(())
}
