use anyhow::Result;

use football_etl::config::EtlConfig;
use football_etl::{logging, transform};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = EtlConfig::from_env();
    logging::init("transform", &config.log_dir)?;

    let summary = transform::run(&config)?;

    println!("Transform complete");
    println!(
        "Match rows: {} in / {} kept",
        summary.match_filter.rows_before, summary.match_filter.rows_after
    );
    println!("Enriched rows: {}", summary.enriched_rows);
    println!("Standings rows: {}", summary.standings_rows);
    println!("Team stats rows: {}", summary.team_stats_rows);
    Ok(())
}
