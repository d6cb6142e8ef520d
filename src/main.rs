use anyhow::{Context, Result};
use car_catalog::{run_session, CatalogLoader, DataQualityEngine, Severity};
use clap::Parser;
use log::{info, warn};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "car-catalog", version, about = "Filter, sort and print a merged car catalog")]
struct Args {
    /// Markup file with type, model and prices per car
    #[arg(long, default_value = "data/carsType.xml")]
    types: PathBuf,

    /// Delimited file with brand and release date per car, same order as --types
    #[arg(long, default_value = "data/CarsBrand.csv")]
    brands: PathBuf,

    /// Refuse to start when the two files have different row counts
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    println!("\n-------------------Car Catalog-------------------");

    // 1. Load both sources (fatal on any parse error)
    let catalog = CatalogLoader::new(&args.types, &args.brands)
        .strict(args.strict)
        .load()
        .with_context(|| {
            format!(
                "Failed to load catalog from {} and {}",
                args.types.display(),
                args.brands.display()
            )
        })?;
    info!("Loaded {} cars", catalog.len());

    // 2. Report what best-effort loading tolerated
    let engine = DataQualityEngine::new();
    let reports = engine.validate_batch(&catalog.cars);
    for report in &reports {
        for issue in report.issues().filter(|v| v.severity != Severity::Info) {
            warn!("car #{}: {}", report.index + 1, issue.message);
        }
    }
    info!("{}", engine.batch_summary(&reports).summary());

    // 3. Interactive session on the console
    let stdin = io::stdin();
    run_session(&catalog.cars, stdin.lock(), io::stdout()).context("Console session failed")?;

    Ok(())
}
