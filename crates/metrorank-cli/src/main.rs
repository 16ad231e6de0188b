//! metrorank: command-line front end for metrorank-core
//!
//! Usage examples
//! --------------
//!
//! - Build the city master list with the stock inputs
//!   $ metrorank cities
//!
//! - Rank every candidate with the global preset and print the CSV
//!   $ metrorank cities --all --preset global --stdout
//!
//! - Rank metropolitan airport systems
//!   $ metrorank metros --top 10
//!
//! - Run the strategy named in a configuration file
//!   $ metrorank --config metrorank.json rank
//!
//! - Print the AP-style list of a finished ranking
//!   $ metrorank ap-list -i data/2024-city-master.csv
//!
//! Logs go to stderr and honour `RUST_LOG`; results go to stdout.
mod args;

use crate::args::{CliArgs, Commands, OutputArgs};
use anyhow::{bail, Context};
use clap::Parser;
use metrorank_core::ap_style::ApStyle;
use metrorank_core::compile::{compile_file, write_json};
use metrorank_core::prelude::*;
use metrorank_core::validate::validate_file;
use metrorank_core::{CityRanking, MetroRankingRun};
use std::io;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const SUMMARY_TOP_COUNTRIES: usize = 10;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("metrorank=info,warn")),
        )
        .init();

    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => RankConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => RankConfig::default(),
    };

    match args.command {
        Commands::Cities {
            population,
            traffic,
            city_codes,
            intangible,
            pinned,
            no_pinned,
            target,
            all,
            preset,
            out,
        } => {
            let c = &mut config.cities;
            if !population.is_empty() {
                c.population = population;
            }
            if let Some(p) = traffic {
                c.traffic = p;
            }
            if city_codes.is_some() {
                c.city_codes = city_codes;
            }
            if intangible.is_some() {
                c.intangible = intangible;
            }
            if no_pinned {
                c.pinned = None;
            } else if pinned.is_some() {
                c.pinned = pinned;
            }
            if all {
                c.target_size = None;
            } else if target.is_some() {
                c.target_size = target;
            }
            if let Some(name) = preset {
                c.weights = WeightedSumPolicy::preset(&name)
                    .with_context(|| format!("unknown weight preset `{name}`"))?;
            }
            config.validate()?;

            let ranking = run_city_pipeline(&config.cities)?;
            log_merge_stats(&ranking);
            emit(&Ranking::Cities(ranking), &out, &config.cities.output)?;
        }

        Commands::Metros {
            airports,
            city_codes,
            top,
            out,
        } => {
            let m = &mut config.metros;
            if let Some(p) = airports {
                m.airports = p;
            }
            if let Some(p) = city_codes {
                m.city_codes = p;
            }
            if let Some(n) = top {
                m.report_top = n;
            }

            let run = run_metro_pipeline(&config.metros)?;
            if !out.stdout {
                print_metro_report(&run, config.metros.report_top);
            }
            emit(&Ranking::Metros(run), &out, &config.metros.output)?;
        }

        Commands::Rank { out } => {
            let ranking = run(&config)?;
            let default_output = match config.strategy {
                ScoreStrategy::WeightedSum => config.cities.output.clone(),
                ScoreStrategy::Component => config.metros.output.clone(),
            };
            emit(&ranking, &out, &default_output)?;
        }

        Commands::Find { query } => {
            config.cities.target_size = None;
            config.cities.pinned = None;
            let ranking = run_city_pipeline(&config.cities)?;
            let matches: Vec<_> = ranking
                .cities
                .iter()
                .enumerate()
                .filter(|(_, c)| c.name_contains(&query))
                .collect();
            if matches.is_empty() {
                println!("No cities found matching: {query}");
            } else {
                for (i, c) in matches {
                    println!(
                        "#{:<5} {} ({}, {}) score {}",
                        i + 1,
                        c.city,
                        c.country,
                        c.iso2.to_uppercase(),
                        c.final_score.unwrap_or_default()
                    );
                }
            }
        }

        Commands::ApList { input } => {
            let input = input.unwrap_or_else(|| config.cities.output.clone());
            let style = ApStyle::with_overrides(&config.ap_overrides);
            for line in style.format_file(&input)? {
                println!("{line}");
            }
        }

        Commands::Compile { input, output } => {
            let cities = compile_file(&input)?;
            write_json(&output, &cities)?;
            println!("Compiled {} cities to {}", cities.len(), output.display());
        }

        Commands::Validate { input } => {
            let issues = validate_file(&input)?;
            if !issues.is_empty() {
                println!("Validation errors found:");
                for issue in &issues {
                    println!("  {issue}");
                }
                bail!("{} validation issue(s) in {}", issues.len(), input.display());
            }
            println!("All cities validated successfully.");
        }

        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// Writes the CSV to stdout or a file. The summary is printed in file mode
/// only.
fn emit(ranking: &Ranking, out: &OutputArgs, default_output: &Path) -> anyhow::Result<()> {
    if out.stdout {
        ranking.write_csv(io::stdout().lock())?;
        return Ok(());
    }

    let path = out.output.as_deref().unwrap_or(default_output);
    ranking
        .write_to_path(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {} rows to {}", ranking.len(), path.display());
    print_summary(&ranking.summary());
    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("Summary:");
    println!("  Entries: {}", summary.entries);
    if let Some(s) = summary.scores {
        println!("  Score mean: {:.2}", s.mean);
        println!("  Score min: {:.2}", s.min);
        println!("  Score max: {:.2}", s.max);
    }
    println!("  Top countries:");
    for (country, count) in summary.top_countries(SUMMARY_TOP_COUNTRIES) {
        println!("    {country}: {count}");
    }
}

fn log_merge_stats(ranking: &CityRanking) {
    let s = &ranking.stats;
    tracing::info!(
        population_rows = s.population_rows,
        population_keys = s.population_keys,
        traffic_rows = s.traffic_rows,
        override_hits = s.traffic_override,
        direct = s.traffic_direct,
        indirect = s.traffic_indirect,
        supplementary = s.traffic_supplementary,
        traffic_dropped = s.traffic_dropped,
        candidates = s.candidates,
        "merge statistics"
    );
}

fn print_metro_report(run: &MetroRankingRun, top: usize) {
    println!(
        "Metro areas: {} ({} airports, {} city codes)",
        run.stats.metro_areas, run.stats.airports, run.stats.city_codes
    );
    for (i, m) in run.rankings.iter().take(top).enumerate() {
        println!(
            "{:>3}. {} ({}) [{}] total {:.1}",
            i + 1,
            m.name,
            m.country,
            m.metro_code,
            m.total_score
        );
        println!(
            "     aviation {:.1}  economic {:.1}  connectivity {:.1}",
            m.components.aviation, m.components.economic, m.components.connectivity
        );
        for a in &m.airports {
            let name = if a.name.is_empty() { "?" } else { a.name.as_str() };
            println!("     - {} {} ({})", a.code, name, a.kind);
        }
    }
}
