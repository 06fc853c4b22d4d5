use std::fs::File;
use std::io::{self, BufRead, BufReader};

use clap::Parser;
use tracing::{error, info};

use place_scraper::arena::RecordArena;
use place_scraper::config::Config;
use place_scraper::error::Result;
use place_scraper::{logging, output, runner};

#[derive(Parser)]
#[command(name = "place_scraper")]
#[command(about = "Place-listing scraper with contact and business-registry enrichment")]
#[command(version)]
struct Cli {
    /// Query file with one search per line, or "stdin"
    #[arg(long, default_value = "stdin")]
    input: String,

    /// Results file, or "stdout"
    #[arg(long, default_value = "stdout")]
    results: String,

    /// Write records as JSON instead of CSV
    #[arg(long)]
    json: bool,

    /// Search language code passed to the provider
    #[arg(long, default_value = "en")]
    lang: String,

    /// Mine each record's website for emails, social links and the tax id
    #[arg(long)]
    email: bool,

    /// Maximum number of fetches in flight
    #[arg(long, default_value_t = 4)]
    concurrency: usize,
}

fn open_input(input: &str) -> Result<Box<dyn BufRead>> {
    if input == "stdin" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    Ok(Box::new(BufReader::new(File::open(input)?)))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    let reader = open_input(&cli.input)?;
    let seeds = runner::seed_jobs(reader, &cli.lang, cli.email, &config.registry)?;
    if seeds.is_empty() {
        error!("no queries in {}", cli.input);
        println!("⚠️  No queries found in {}", cli.input);
        return Ok(());
    }

    println!("🔄 Running {} queries...", seeds.len());
    let arena = RecordArena::new();
    let summary = runner::run_jobs(seeds, &arena, &config.http, cli.concurrency).await?;
    let records = arena.into_records();

    println!("\n📊 Run results:");
    println!("   Jobs processed: {}", summary.jobs_processed);
    println!("   Records: {}", records.len());
    println!("   Errors: {}", summary.errors.len());
    if !summary.errors.is_empty() {
        println!("\n⚠️  Errors encountered:");
        for error in &summary.errors {
            println!("   - {}", error);
        }
    }

    let writer = output::open_destination(&cli.results)?;
    if cli.json {
        output::write_json(writer, &records)?;
    } else {
        output::write_csv(writer, &records)?;
    }
    info!("results written to {}", cli.results);
    if cli.results != "stdout" {
        println!("💾 Saved records to {}", cli.results);
    }

    Ok(())
}
