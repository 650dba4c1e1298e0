use specialty_canon::filter::{month_to_iso, ClaimFilter, Selection};
use specialty_canon::ingestion::{load_claims_file, ClaimRecord};
use specialty_canon::summary::{
    monthly_totals, summarize_by_payer, summarize_by_service_category, summarize_by_specialty,
    GroupTotal,
};
use specialty_canon::{CanonConfig, Canonicalization, Canonicalizer};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "specialty-canon")]
#[command(about = "Collapse noisy claim specialty labels into a canonical set")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ClapArgs)]
struct EngineArgs {
    /// JSON configuration file (missing fields keep their defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum label length for fuzzy comparison
    #[arg(long)]
    min_length: Option<usize>,

    /// Similarity score (0-100) a pair must exceed to merge
    #[arg(long)]
    threshold: Option<u8>,

    /// Candidates considered per label
    #[arg(long)]
    top_k: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Canonicalize the CLAIM_SPECIALTY column and print both merge maps
    Canonicalize {
        /// Claims CSV file
        csv_file: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Canonicalize, filter, and print paid amounts grouped by specialty, category, payer and month
    Summary {
        /// Claims CSV file
        csv_file: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,

        /// Period start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Period end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Keep only these payers (repeatable)
        #[arg(long = "payer")]
        payers: Vec<String>,

        /// Keep only these service categories (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Keep only these canonical specialties (repeatable)
        #[arg(long = "specialty")]
        specialties: Vec<String>,

        /// Also list the selected claim rows
        #[arg(long)]
        rows: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Canonicalize { csv_file, engine, json } => run_canonicalize(csv_file, engine, json),
        Commands::Summary {
            csv_file,
            engine,
            start,
            end,
            payers,
            categories,
            specialties,
            rows,
            json,
        } => {
            let filter = ClaimFilter::new()
                .with_period(start.as_deref(), end.as_deref())?
                .with_payers(Selection::from_values(payers))
                .with_service_categories(Selection::from_values(categories))
                .with_specialties(Selection::from_values(specialties));
            run_summary(csv_file, engine, filter, rows, json)
        }
    }
}

fn build_config(engine: &EngineArgs) -> Result<CanonConfig> {
    let mut config = match &engine.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            CanonConfig::load(path)?
        }
        None => CanonConfig::default(),
    };
    if let Some(min_length) = engine.min_length {
        config = config.with_min_length(min_length);
    }
    if let Some(threshold) = engine.threshold {
        config = config.with_match_threshold(threshold);
    }
    if let Some(top_k) = engine.top_k {
        config = config.with_top_k(top_k);
    }
    config.validate()?;
    Ok(config)
}

fn canonicalize_file(csv_file: &Path, engine: &EngineArgs) -> Result<Canonicalization<ClaimRecord>> {
    let config = build_config(engine)?;
    let canonicalizer = Canonicalizer::new(&config)?;
    let ingested = load_claims_file(csv_file)
        .with_context(|| format!("Failed to load claims from {:?}", csv_file))?;
    Ok(canonicalizer.canonicalize(ingested.records))
}

fn run_canonicalize(csv_file: PathBuf, engine: EngineArgs, json: bool) -> Result<()> {
    let result = canonicalize_file(&csv_file, &engine)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!(" CANONICAL SPECIALTY LABELS ({})", result.canonical_labels.len());
    println!("{}", "=".repeat(80));
    for label in &result.canonical_labels {
        println!("   {}", label);
    }

    println!("\n Synonym merges ({}):", result.synonym_map.len());
    for (minor, major) in result.synonym_map.iter() {
        println!("   {} -> {}", minor, major);
    }

    println!("\n Substring absorptions ({}):", result.substring_map.len());
    for (minor, major) in result.substring_map.iter() {
        println!("   {} -> {}", minor, major);
    }

    if result.dropped_rows > 0 {
        println!("\n Rows dropped with empty labels: {}", result.dropped_rows);
    }
    Ok(())
}

fn print_groups(title: &str, column: &str, groups: &[GroupTotal]) {
    println!("\n {}", title);
    println!("   {:<50} {:>15} {:>8}", column, "SUM", "COUNT");
    for group in groups {
        println!("   {:<50} {:>15.2} {:>8}", group.key, group.sum, group.count);
    }
}

fn run_summary(
    csv_file: PathBuf,
    engine: EngineArgs,
    filter: ClaimFilter,
    show_rows: bool,
    json: bool,
) -> Result<()> {
    let result = canonicalize_file(&csv_file, &engine)?;
    let selected = filter.apply(&result.rows);
    info!("{} of {} rows selected", selected.len(), result.rows.len());

    let by_specialty = summarize_by_specialty(selected.iter().copied());
    let by_category = summarize_by_service_category(selected.iter().copied());
    let by_payer = summarize_by_payer(selected.iter().copied());
    let by_month = monthly_totals(selected.iter().copied());

    if json {
        let mut output = json!({
            "by_specialty": by_specialty,
            "by_service_category": by_category,
            "by_payer": by_payer,
            "by_month": by_month,
        });
        if show_rows {
            output["rows"] = serde_json::to_value(&selected)?;
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!(" PAID AMOUNTS BY CLAIM SPECIALTY");
    println!("{}", "=".repeat(80));
    println!("   {:<50} {:>15} {:>8}", "CLAIM_SPECIALTY", "SUM", "COUNT");
    for row in &by_specialty {
        println!("   {:<50} {:>15.2} {:>8}", row.claim_specialty, row.sum, row.count);
    }

    println!("\n PAID AMOUNTS BY MONTH");
    println!("   {:<12} {:>15} {:>8}", "MONTH", "SUM", "COUNT");
    for row in &by_month {
        let month = month_to_iso(row.month).unwrap_or_else(|_| row.month.to_string());
        println!("   {:<12} {:>15.2} {:>8}", month, row.sum, row.count);
    }

    print_groups("PAID AMOUNTS BY SERVICE CATEGORY", "SERVICE_CATEGORY", &by_category);
    print_groups("PAID AMOUNTS BY PAYER", "PAYER", &by_payer);

    if show_rows {
        println!("\n SELECTED CLAIMS ({})", selected.len());
        println!(
            "   {:<8} {:<20} {:<40} {:<15} {:>12}",
            "MONTH", "SERVICE_CATEGORY", "CLAIM_SPECIALTY", "PAYER", "PAID_AMOUNT"
        );
        for record in &selected {
            println!(
                "   {:<8} {:<20} {:<40} {:<15} {:>12.2}",
                record.month, record.service_category, record.claim_specialty, record.payer, record.paid_amount
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_args(threshold: Option<u8>) -> EngineArgs {
        EngineArgs {
            config: None,
            min_length: Some(4),
            threshold,
            top_k: None,
        }
    }

    #[test]
    fn test_build_config_applies_overrides() {
        let config = build_config(&engine_args(Some(85))).unwrap();
        assert_eq!(config.match_threshold, 85);
        assert_eq!(config.min_length, 4);
        assert_eq!(config.top_k, 3);
    }

    #[test]
    fn test_build_config_accepts_out_of_range_threshold() {
        let config = build_config(&engine_args(Some(200))).unwrap();
        assert_eq!(config.match_threshold, 200);
    }

    #[test]
    fn test_summary_flags_parse() {
        let args = Args::try_parse_from([
            "specialty-canon", "summary", "claims.csv", "--payer", "Payer F", "--rows", "--threshold", "85",
        ])
        .unwrap();
        match args.command {
            Commands::Summary { rows, payers, engine, .. } => {
                assert!(rows);
                assert_eq!(payers, vec!["Payer F"]);
                assert_eq!(engine.threshold, Some(85));
            }
            _ => panic!("expected summary command"),
        }
    }
}
