//! Combogen CLI — quote lookup and buy-plan generation.
//!
//! Commands:
//! - `quote` — fetch and print current prices from Yahoo Finance
//! - `plan` — compute every affordable purchase combination for a budget
//!   and print the best ones, optionally saving JSON/CSV artifacts

mod config;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use combogen_core::data::{QuoteError, QuoteProvider, YahooQuotes};
use combogen_core::domain::{dollars_to_cents, format_cents, Cents, Combination, Instrument};
use combogen_core::engine::{rank, CombinationSearch, SearchSpace, SpaceSummary};

use config::{InstrumentConfig, PlanConfig};

#[derive(Parser)]
#[command(
    name = "combogen",
    about = "Combogen CLI — affordable stock combination planner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print current prices from Yahoo Finance.
    Quote {
        /// Symbols to look up (e.g., SPY QQQ AAPL).
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Compute and rank every affordable combination of purchase quantities.
    Plan {
        /// Symbols to include (alternative to --config).
        symbols: Vec<String>,

        /// Cash budget in dollars (required without --config).
        #[arg(long)]
        cash: Option<f64>,

        /// Target allocation weight, repeatable: --weight AAPL=60.
        #[arg(long = "weight")]
        weights: Vec<String>,

        /// Manual price override, repeatable: --price MSFT=410.50.
        #[arg(long = "price")]
        prices: Vec<String>,

        /// How many combinations to show. Defaults to 20.
        #[arg(long)]
        top: Option<usize>,

        /// Offline mode: no network access; every symbol needs a price.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Drop symbols the provider cannot resolve instead of failing.
        #[arg(long, default_value_t = false)]
        drop_missing: bool,

        /// TOML plan file (mutually exclusive with inline symbols).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for plan.json / plan.csv artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Quote { symbols } => run_quote(symbols),
        Commands::Plan {
            symbols,
            cash,
            weights,
            prices,
            top,
            offline,
            drop_missing,
            config,
            output_dir,
        } => run_plan(
            symbols,
            cash,
            weights,
            prices,
            top,
            offline,
            drop_missing,
            config,
            output_dir,
        ),
    }
}

fn run_quote(symbols: Vec<String>) -> Result<()> {
    let provider = YahooQuotes::new();
    let mut failed = 0;

    for (symbol, result) in provider.fetch_quotes(&symbols) {
        match result {
            Ok(quote) => {
                let as_of = quote
                    .as_of
                    .map(|t| format!(" (as of {})", t.format("%Y-%m-%d %H:%M UTC")))
                    .unwrap_or_default();
                println!("{}: ${:.2}{as_of}", quote.symbol, quote.price);
            }
            Err(e) => {
                eprintln!("FAIL: {symbol}: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_plan(
    symbols: Vec<String>,
    cash: Option<f64>,
    weights: Vec<String>,
    prices: Vec<String>,
    top: Option<usize>,
    offline: bool,
    drop_missing: bool,
    config_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    // Validate mutually exclusive options
    if config_path.is_some() && !symbols.is_empty() {
        bail!("--config and inline symbols are mutually exclusive");
    }

    let plan = if let Some(path) = config_path {
        PlanConfig::from_file(&path)?
    } else {
        if symbols.is_empty() {
            bail!("no symbols given — pass them inline or via --config");
        }
        let cash = cash.context("--cash is required without --config")?;
        let weight_map = config::parse_weights(&weights)?;
        let price_map = config::parse_prices(&prices)?;
        inline_plan(symbols, cash, weight_map, price_map)
    };

    let top = top.unwrap_or(plan.top);
    let cash_cents = dollars_to_cents(plan.cash)
        .with_context(|| format!("invalid cash amount: {}", plan.cash))?;

    println!("Loading current prices...");
    let instruments = resolve_instruments(&plan.instruments, offline, drop_missing)?;
    if instruments.is_empty() {
        bail!("no instruments left to plan with");
    }

    println!();
    println!("Loaded:");
    for instrument in &instruments {
        println!("  {instrument}");
    }

    let space = SearchSpace::new(instruments, cash_cents)?;
    let summary = space.summary();

    println!();
    println!("Max quantity of each:");
    for mq in &summary.max_quantities {
        println!("  {}: {}", mq.symbol, mq.quantity);
    }
    println!();
    println!("Total combinations: {}", summary.total_combinations);
    println!(
        "Spend band: ${} < cost <= ${}",
        format_cents(space.spend_band_floor()),
        format_cents(space.cash_cents())
    );

    println!();
    println!("Crunching numbers...");
    let survivors = CombinationSearch::new(&space).run();
    if survivors.is_empty() {
        println!("Not enough cash for a good combination.");
        return Ok(());
    }

    let ranked = rank(survivors, space.cash_cents(), top);
    let weighted = space
        .instruments()
        .iter()
        .any(|i| i.target_weight().is_some());

    println!();
    println!("Buy one of these quantities:");
    print_table(&ranked, &space, weighted);

    if let Some(dir) = output_dir {
        let artifact = build_artifact(&ranked, &space, summary, weighted);
        save_artifacts(&dir, &artifact)?;
        println!();
        println!("Artifacts saved to: {}", dir.display());
    }

    Ok(())
}

/// Assemble a PlanConfig from inline flags.
fn inline_plan(
    symbols: Vec<String>,
    cash: f64,
    weights: BTreeMap<String, u8>,
    prices: BTreeMap<String, f64>,
) -> PlanConfig {
    let mut seen = Vec::new();
    let mut instruments = Vec::new();
    for symbol in symbols {
        let symbol = symbol.trim().to_uppercase();
        if seen.contains(&symbol) {
            continue;
        }
        instruments.push(InstrumentConfig {
            weight: weights.get(&symbol).copied(),
            price: prices.get(&symbol).copied(),
            symbol: symbol.clone(),
        });
        seen.push(symbol);
    }
    PlanConfig {
        cash,
        top: 20,
        instruments,
    }
}

/// Resolve every instrument to a price: manual overrides win, the rest are
/// fetched from Yahoo Finance. Unresolved symbols fail the run unless
/// `drop_missing` is set.
fn resolve_instruments(
    entries: &[InstrumentConfig],
    offline: bool,
    drop_missing: bool,
) -> Result<Vec<Instrument>> {
    let needs_fetch: Vec<&InstrumentConfig> =
        entries.iter().filter(|e| e.price.is_none()).collect();
    if offline && !needs_fetch.is_empty() {
        let missing: Vec<&str> = needs_fetch.iter().map(|e| e.symbol.as_str()).collect();
        bail!(
            "offline mode, but no --price given for: {}",
            missing.join(", ")
        );
    }

    let provider = YahooQuotes::new();
    let mut instruments = Vec::new();
    let mut unresolved = Vec::new();

    for entry in entries {
        let price = match entry.price {
            Some(price) => price,
            None => match provider.fetch_quote(&entry.symbol) {
                Ok(quote) => quote.price,
                Err(QuoteError::SymbolNotFound { symbol }) => {
                    unresolved.push(symbol);
                    continue;
                }
                Err(e) => return Err(e).context(format!("failed to fetch {}", entry.symbol)),
            },
        };

        let instrument = match entry.weight {
            Some(weight) => Instrument::with_target_weight(&entry.symbol, price, weight)?,
            None => Instrument::new(&entry.symbol, price)?,
        };
        instruments.push(instrument);
    }

    if !unresolved.is_empty() {
        if drop_missing {
            eprintln!("Dropping unresolved symbols: {}", unresolved.join(", "));
        } else {
            bail!(
                "unresolved symbols: {} (re-run with --drop-missing to skip them)",
                unresolved.join(", ")
            );
        }
    }

    Ok(instruments)
}

fn print_table(ranked: &[Combination], space: &SearchSpace, weighted: bool) {
    let widths: Vec<usize> = space
        .instruments()
        .iter()
        .map(|i| i.symbol().len().max(5))
        .collect();

    let mut header = String::new();
    for (instrument, width) in space.instruments().iter().zip(widths.iter().copied()) {
        header.push_str(&format!("{:>width$}  ", instrument.symbol()));
    }
    if weighted {
        header.push_str(&format!("{:>5}  ", "Fit"));
    }
    header.push_str(&format!("{:>10}  {:>10}", "Change", "Cost"));
    println!("{header}");
    println!("{}", "-".repeat(header.len()));

    for combination in ranked {
        let mut row = String::new();
        for (holding, width) in combination.holdings().iter().zip(widths.iter().copied()) {
            row.push_str(&format!("{:>width$}  ", holding.quantity()));
        }
        let cost = combination.total_cost_cents();
        if weighted {
            row.push_str(&format!("{:>5}  ", combination.fit_score(space.cash_cents())));
        }
        row.push_str(&format!(
            "{:>10}  {:>10}",
            format!("${}", format_cents(space.cash_cents() - cost)),
            format!("${}", format_cents(cost))
        ));
        println!("{row}");
    }
}

#[derive(Serialize)]
struct PlanArtifact {
    generated_at: chrono::DateTime<chrono::Utc>,
    cash: f64,
    spend_band_floor: f64,
    summary: SpaceSummary,
    combinations: Vec<PlanRow>,
}

#[derive(Serialize)]
struct PlanRow {
    quantities: BTreeMap<String, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fit: Option<u32>,
    cost: f64,
    change: f64,
}

fn build_artifact(
    ranked: &[Combination],
    space: &SearchSpace,
    summary: SpaceSummary,
    weighted: bool,
) -> PlanArtifact {
    let cash = space.cash_cents();
    let combinations = ranked
        .iter()
        .map(|combination| {
            let cost = combination.total_cost_cents();
            PlanRow {
                quantities: combination
                    .holdings()
                    .iter()
                    .map(|h| (h.instrument().symbol().to_string(), h.quantity()))
                    .collect(),
                fit: weighted.then(|| combination.fit_score(cash)),
                cost: cents_to_dollars(cost),
                change: cents_to_dollars(cash - cost),
            }
        })
        .collect();

    PlanArtifact {
        generated_at: chrono::Utc::now(),
        cash: cents_to_dollars(cash),
        spend_band_floor: cents_to_dollars(space.spend_band_floor()),
        summary,
        combinations,
    }
}

fn cents_to_dollars(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// Save plan.json and plan.csv under `dir`.
fn save_artifacts(dir: &Path, artifact: &PlanArtifact) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let json = serde_json::to_string_pretty(artifact)?;
    std::fs::write(dir.join("plan.json"), json)?;

    let mut writer = csv::Writer::from_path(dir.join("plan.csv"))?;
    let symbols: Vec<&str> = artifact
        .summary
        .max_quantities
        .iter()
        .map(|mq| mq.symbol.as_str())
        .collect();
    let weighted = artifact.combinations.iter().any(|r| r.fit.is_some());

    let mut header: Vec<String> = symbols.iter().map(|s| s.to_string()).collect();
    if weighted {
        header.push("fit".into());
    }
    header.push("change".into());
    header.push("cost".into());
    writer.write_record(&header)?;

    for row in &artifact.combinations {
        let mut record: Vec<String> = symbols
            .iter()
            .map(|s| row.quantities.get(*s).copied().unwrap_or(0).to_string())
            .collect();
        if weighted {
            record.push(row.fit.unwrap_or(0).to_string());
        }
        record.push(format!("{:.2}", row.change));
        record.push(format!("{:.2}", row.cost));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}
