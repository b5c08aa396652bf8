use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use maturitylens_lib::commands::settings::{
    init_settings, load_settings_file, load_workspace_settings, EffectiveSettings,
};
use maturitylens_lib::commands::snapshot::{load_snapshot, load_snapshot_file, save_snapshot_file};
use maturitylens_lib::{score_snapshot, ScoringReport};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "maturitylens")]
#[command(about = "MaturityLens - score repository developer maturity against reference tiers", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a local checkout or a JSON snapshot file
    Score {
        /// Repository directory or snapshot file
        path: PathBuf,

        /// Treat PATH as a JSON snapshot file
        #[arg(long)]
        snapshot: bool,

        /// Settings file (defaults to <path>/.maturity/settings.json when present)
        #[arg(short, long, env = "MATURITYLENS_CONFIG")]
        config: Option<PathBuf>,

        /// Number of roadmap items
        #[arg(long)]
        top: Option<usize>,

        /// Also write the snapshot that was scored
        #[arg(long)]
        save_snapshot: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "pretty")]
        output: OutputFormat,
    },

    /// List the configured tiers
    Tiers {
        #[arg(short, long, env = "MATURITYLENS_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Write default settings into a workspace
    InitConfig {
        workspace: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Score {
            path,
            snapshot: from_snapshot,
            config,
            top,
            save_snapshot,
            output,
        } => {
            let settings = resolve_settings(config.as_deref(), Some(&path))?;
            let mut scoring = settings.config;
            if let Some(top) = top {
                scoring = scoring.with_top_n(top);
            }

            let snapshot = if from_snapshot {
                load_snapshot_file(&path)
            } else {
                load_snapshot(&path, settings.commit_history_limit)
            }
            .with_context(|| format!("Failed to load snapshot from {}", path.display()))?;
            if let Some(out) = save_snapshot {
                save_snapshot_file(&out, &snapshot)
                    .with_context(|| format!("Failed to write snapshot to {}", out.display()))?;
            }

            let report = score_snapshot(&snapshot, &scoring).context("Scoring failed")?;
            match output {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Pretty => print_report(&report),
            }
        }
        Commands::Tiers { config } => {
            let settings = resolve_settings(config.as_deref(), None)?;
            for tier in settings.config.catalog().tiers() {
                let values: Vec<String> = tier
                    .centroid
                    .values()
                    .iter()
                    .map(|v| format!("{v:.2}"))
                    .collect();
                println!(
                    "{:<14} rank {:<3} [{}] {}",
                    tier.name,
                    tier.rank,
                    values.join(", "),
                    tier.label.as_deref().unwrap_or("")
                );
            }
        }
        Commands::InitConfig { workspace } => {
            let path = init_settings(&workspace)
                .with_context(|| format!("Failed to initialize settings in {}", workspace.display()))?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn resolve_settings(explicit: Option<&Path>, target: Option<&Path>) -> Result<EffectiveSettings> {
    if let Some(path) = explicit {
        return load_settings_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()));
    }
    match target {
        Some(dir) if dir.is_dir() => load_workspace_settings(dir)
            .with_context(|| format!("Failed to load workspace settings for {}", dir.display())),
        _ => Ok(EffectiveSettings::default()),
    }
}

fn print_report(report: &ScoringReport) {
    println!("Score: {}/100", report.overall_score);
    println!("Tier:  {} ({}% match)", report.matched_tier, report.similarity_percent);
    println!();

    println!("Signals:");
    for signal in &report.signals {
        let marker = if signal.degraded { " (degraded)" } else { "" };
        println!(
            "  {:<24} {:.2}{}",
            signal.name.display_name(),
            signal.normalized,
            marker
        );
        for detail in &signal.details {
            println!("      {detail}");
        }
    }
    println!();

    println!("Similarity:");
    for (tier, similarity) in &report.similarity.per_tier {
        println!("  {tier:<14} {similarity:.3}");
    }
    println!();

    println!("Gaps vs {}:", report.gaps.target_tier);
    for gap in &report.gaps.entries {
        println!(
            "  {:<24} {:.2} -> {:.2}  deficit {:.2}",
            gap.dimension.display_name(),
            gap.repo_value,
            gap.tier_target,
            gap.deficit
        );
    }
    println!();

    println!("{}", report.summary.text);
    if report.roadmap.is_empty() {
        println!("Roadmap: nothing to improve against {}.", report.gaps.target_tier);
    } else {
        println!("Roadmap:");
        for (i, item) in report.roadmap.iter().enumerate() {
            println!("  {}. {}", i + 1, item.suggestion_text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_accepts_snapshot_flag() {
        let cli = Cli::try_parse_from(["maturitylens", "score", "replay.json", "--snapshot", "--top", "2"]).unwrap();
        match cli.command {
            Commands::Score { path, snapshot, top, .. } => {
                assert_eq!(path, PathBuf::from("replay.json"));
                assert!(snapshot);
                assert_eq!(top, Some(2));
            }
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn score_defaults_to_path_sniffing() {
        let cli = Cli::try_parse_from(["maturitylens", "score", "."]).unwrap();
        assert!(matches!(cli.command, Commands::Score { snapshot: false, .. }));
    }
}
