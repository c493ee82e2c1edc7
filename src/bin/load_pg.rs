use anyhow::Result;

use football_etl::config::EtlConfig;
use football_etl::{logging, pg_load};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = EtlConfig::from_env();
    logging::init("load", &config.log_dir)?;

    let summary = pg_load::run(&config)?;

    println!("Load complete");
    println!("Rows read: {}", summary.rows_read);
    println!("Rows inserted: {}", summary.rows_inserted);
    Ok(())
}
