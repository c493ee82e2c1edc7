use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::EtlConfig;
use crate::normalize::{self, MatchFilterSummary, TeamFilterSummary};
use crate::{join, logging, parquet_out, standings, table, team_stats};

#[derive(Debug, Clone, Serialize)]
pub struct TransformSummary {
    pub match_filter: MatchFilterSummary,
    pub team_filter: TeamFilterSummary,
    pub enriched_rows: usize,
    pub standings_rows: usize,
    pub team_stats_rows: usize,
}

/// Load → normalize → join → aggregate → write, in one pass. Each output
/// file lands atomically; a failure partway leaves earlier outputs intact
/// and later ones untouched.
pub fn run(config: &EtlConfig) -> Result<TransformSummary> {
    let started = Instant::now();

    let mut matches_raw = table::read_csv_table(&config.matches_csv())?;
    let mut teams_raw = table::read_csv_table(&config.teams_csv())?;
    info!(rows = matches_raw.rows.len(), "matches loaded");
    info!(rows = teams_raw.rows.len(), "teams loaded");

    normalize::normalize_headers(&mut matches_raw);
    normalize::normalize_headers(&mut teams_raw);
    table::check_required_columns(&matches_raw, normalize::REQUIRED_MATCH_COLUMNS, "match")?;
    table::check_required_columns(&teams_raw, normalize::REQUIRED_TEAM_COLUMNS, "team")?;

    let (match_records, match_filter) = normalize::normalize_matches(&matches_raw)?;
    info!(
        before = match_filter.rows_before,
        after = match_filter.rows_after,
        missing_ids = match_filter.dropped_missing_ids,
        unparseable = match_filter.dropped_unparseable,
        "match rows filtered"
    );

    let (team_records, team_filter) = normalize::normalize_teams(&teams_raw)?;
    if team_filter.duplicate_team_ids > 0 {
        warn!(
            duplicates = team_filter.duplicate_team_ids,
            "duplicate team_api_id rows ignored"
        );
    }

    let enriched = join::attach_team_names(&match_records, &team_records);
    info!(rows = enriched.len(), "final transformed dataset");

    let standings_rows = standings::compute_standings(&enriched);
    let team_stats_rows = team_stats::compute_team_stats(&enriched);

    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("create {}", config.output_dir.display()))?;
    parquet_out::write_enriched(&config.enriched_parquet(), &enriched)?;
    info!(path = %config.enriched_parquet().display(), "saved cleaned matches");
    parquet_out::write_standings(&config.standings_parquet(), &standings_rows)?;
    info!(path = %config.standings_parquet().display(), "saved league standings");
    parquet_out::write_team_stats(&config.team_stats_parquet(), &team_stats_rows)?;
    info!(path = %config.team_stats_parquet().display(), "saved team stats");

    info!(
        elapsed = %logging::format_elapsed(started.elapsed()),
        "transform stage finished"
    );

    Ok(TransformSummary {
        match_filter,
        team_filter,
        enriched_rows: enriched.len(),
        standings_rows: standings_rows.len(),
        team_stats_rows: team_stats_rows.len(),
    })
}
