use std::fs::File;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::RowAccessor;
use postgres::types::ToSql;
use postgres::{Client, NoTls};
use serde::Serialize;
use tracing::info;

use crate::config::EtlConfig;
use crate::logging;

pub const PAGE_SIZE: usize = 1000;

const COLUMNS: usize = 7;

#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_inserted: u64,
}

#[derive(Debug, Clone)]
struct MatchTeamsRow {
    match_api_id: i64,
    date: Option<NaiveDate>,
    season: String,
    home_team_name: Option<String>,
    away_team_name: Option<String>,
    home_team_goal: i64,
    away_team_goal: i64,
}

/// Read the enriched parquet back and bulk-insert it into `matches_teams`.
/// Conflicts on `match_api_id` are ignored, so re-loads are no-ops.
pub fn run(config: &EtlConfig) -> Result<LoadSummary> {
    let started = Instant::now();

    let parquet_path = config.enriched_parquet();
    let rows = read_enriched_rows(&parquet_path)?;
    info!(rows = rows.len(), path = %parquet_path.display(), "loaded rows from parquet");

    let mut client = Client::connect(&config.pg.conn_string(), NoTls).with_context(|| {
        format!("connect to postgres at {}:{}", config.pg.host, config.pg.port)
    })?;
    init_schema(&mut client)?;

    let rows_inserted = insert_rows(&mut client, &rows)?;
    info!(inserted = rows_inserted, "rows inserted into matches_teams");
    info!(
        elapsed = %logging::format_elapsed(started.elapsed()),
        "load stage finished"
    );

    Ok(LoadSummary {
        rows_read: rows.len(),
        rows_inserted,
    })
}

fn read_enriched_rows(path: &Path) -> Result<Vec<MatchTeamsRow>> {
    if !path.exists() {
        return Err(anyhow!("parquet file not found: {}", path.display()));
    }
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = SerializedFileReader::new(file).context("open parquet reader")?;
    let iter = reader.get_row_iter(None).context("iterate parquet rows")?;

    // Column indices mirror the schema written by the transform stage.
    let mut out = Vec::new();
    for row in iter {
        let row = row.context("decode parquet row")?;
        out.push(MatchTeamsRow {
            match_api_id: row.get_long(0).context("match_api_id column")?,
            season: row.get_string(1).context("season column")?.clone(),
            date: row
                .get_string(3)
                .ok()
                .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()),
            home_team_name: row.get_string(8).ok().cloned(),
            away_team_name: row.get_string(9).ok().cloned(),
            home_team_goal: row.get_long(6).context("home_team_goal column")?,
            away_team_goal: row.get_long(7).context("away_team_goal column")?,
        });
    }
    Ok(out)
}

fn init_schema(client: &mut Client) -> Result<()> {
    client
        .batch_execute(
            r#"
            CREATE TABLE IF NOT EXISTS matches_teams (
                match_api_id BIGINT PRIMARY KEY,
                date DATE NULL,
                season TEXT NOT NULL,
                home_team_name TEXT NULL,
                away_team_name TEXT NULL,
                home_team_goal BIGINT NOT NULL,
                away_team_goal BIGINT NOT NULL
            );
            "#,
        )
        .context("create matches_teams schema")?;
    Ok(())
}

fn insert_rows(client: &mut Client, rows: &[MatchTeamsRow]) -> Result<u64> {
    let mut tx = client.transaction().context("begin load transaction")?;
    let mut inserted = 0u64;
    for page in rows.chunks(PAGE_SIZE) {
        let query = build_insert_query(page.len());
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(page.len() * COLUMNS);
        for row in page {
            params.push(&row.match_api_id);
            params.push(&row.date);
            params.push(&row.season);
            params.push(&row.home_team_name);
            params.push(&row.away_team_name);
            params.push(&row.home_team_goal);
            params.push(&row.away_team_goal);
        }
        inserted += tx
            .execute(query.as_str(), &params)
            .context("insert matches_teams page")?;
    }
    tx.commit().context("commit load transaction")?;
    Ok(inserted)
}

fn build_insert_query(rows: usize) -> String {
    let mut query = String::from(
        "INSERT INTO matches_teams (match_api_id, date, season, home_team_name, \
         away_team_name, home_team_goal, away_team_goal) VALUES ",
    );
    for row in 0..rows {
        if row > 0 {
            query.push_str(", ");
        }
        query.push('(');
        for col in 0..COLUMNS {
            if col > 0 {
                query.push_str(", ");
            }
            query.push('$');
            query.push_str(&(row * COLUMNS + col + 1).to_string());
        }
        query.push(')');
    }
    query.push_str(" ON CONFLICT (match_api_id) DO NOTHING");
    query
}
