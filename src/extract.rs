use std::time::Instant;

use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing::info;

use crate::config::EtlConfig;
use crate::{archive, logging, sqlite_export};

#[derive(Debug, Clone, Serialize)]
pub struct ExtractSummary {
    pub files_extracted: usize,
    pub match_rows: usize,
    pub team_rows: usize,
}

/// Unzip the bundled archive, then export the Match and Team tables to csv.
/// Either input missing aborts the stage before anything is written.
pub fn run(config: &EtlConfig) -> Result<ExtractSummary> {
    let started = Instant::now();

    info!(archive = %config.archive_path.display(), "extracting archive");
    let files_extracted = archive::extract_zip(&config.archive_path, &config.data_dir)?;
    info!(files = files_extracted, "extraction complete");

    let export = sqlite_export::export_tables(&config.sqlite_path(), &config.data_dir)?;

    for path in [config.matches_csv(), config.teams_csv()] {
        if !path.exists() {
            return Err(anyhow!("expected csv missing after export: {}", path.display()));
        }
    }

    info!(
        elapsed = %logging::format_elapsed(started.elapsed()),
        "extract stage finished"
    );
    Ok(ExtractSummary {
        files_extracted,
        match_rows: export.match_rows,
        team_rows: export.team_rows,
    })
}
