use anyhow::Result;

use football_etl::config::EtlConfig;
use football_etl::{extract, logging};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = EtlConfig::from_env();
    logging::init("extract", &config.log_dir)?;

    let summary = extract::run(&config)?;

    println!("Extract complete");
    println!("Files extracted: {}", summary.files_extracted);
    println!("Match rows: {}", summary.match_rows);
    println!("Team rows: {}", summary.team_rows);
    Ok(())
}
