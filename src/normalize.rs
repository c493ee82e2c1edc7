use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::model::{MatchRecord, TeamRecord};
use crate::table::RawTable;

pub const REQUIRED_MATCH_COLUMNS: &[&str] = &[
    "match_api_id",
    "home_team_api_id",
    "away_team_api_id",
    "league_id",
    "season",
    "date",
    "home_team_goal",
    "away_team_goal",
];

pub const REQUIRED_TEAM_COLUMNS: &[&str] = &["team_api_id", "team_long_name"];

/// Lowercase, trim, and collapse whitespace runs to single underscores.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

pub fn normalize_headers(table: &mut RawTable) {
    for header in &mut table.headers {
        *header = normalize_column_name(header);
    }
}

/// Accepts the export's timestamp form and a bare date; anything else is a
/// null date, never an error.
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .map(|stamp| stamp.date())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok())
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchFilterSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub dropped_missing_ids: usize,
    pub dropped_unparseable: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamFilterSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub dropped_unparseable: usize,
    pub duplicate_team_ids: usize,
}

struct MatchColumns {
    match_api_id: usize,
    league_id: usize,
    season: usize,
    date: usize,
    home_team_api_id: usize,
    away_team_api_id: usize,
    home_team_goal: usize,
    away_team_goal: usize,
}

impl MatchColumns {
    fn resolve(table: &RawTable) -> Result<Self> {
        Ok(Self {
            match_api_id: column(table, "match_api_id")?,
            league_id: column(table, "league_id")?,
            season: column(table, "season")?,
            date: column(table, "date")?,
            home_team_api_id: column(table, "home_team_api_id")?,
            away_team_api_id: column(table, "away_team_api_id")?,
            home_team_goal: column(table, "home_team_goal")?,
            away_team_goal: column(table, "away_team_goal")?,
        })
    }
}

pub fn normalize_matches(table: &RawTable) -> Result<(Vec<MatchRecord>, MatchFilterSummary)> {
    let columns = MatchColumns::resolve(table)?;
    let mut summary = MatchFilterSummary {
        rows_before: table.rows.len(),
        ..MatchFilterSummary::default()
    };

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let match_id_raw = field(row, columns.match_api_id);
        let home_id_raw = field(row, columns.home_team_api_id);
        let away_id_raw = field(row, columns.away_team_api_id);
        if match_id_raw.trim().is_empty()
            || home_id_raw.trim().is_empty()
            || away_id_raw.trim().is_empty()
        {
            summary.dropped_missing_ids += 1;
            continue;
        }

        let parsed = (
            parse_int_field(match_id_raw),
            parse_int_field(home_id_raw),
            parse_int_field(away_id_raw),
            parse_int_field(field(row, columns.league_id)),
            parse_int_field(field(row, columns.home_team_goal)),
            parse_int_field(field(row, columns.away_team_goal)),
        );
        let (
            Some(match_api_id),
            Some(home_team_api_id),
            Some(away_team_api_id),
            Some(league_id),
            Some(home_team_goal),
            Some(away_team_goal),
        ) = parsed
        else {
            summary.dropped_unparseable += 1;
            continue;
        };

        records.push(MatchRecord {
            match_api_id,
            league_id,
            season: field(row, columns.season).trim().to_string(),
            date: parse_match_date(field(row, columns.date)),
            home_team_api_id,
            away_team_api_id,
            home_team_goal,
            away_team_goal,
        });
    }

    summary.rows_after = records.len();
    Ok((records, summary))
}

/// First occurrence wins on duplicate team ids.
pub fn normalize_teams(table: &RawTable) -> Result<(Vec<TeamRecord>, TeamFilterSummary)> {
    let id_column = column(table, "team_api_id")?;
    let name_column = column(table, "team_long_name")?;

    let mut summary = TeamFilterSummary {
        rows_before: table.rows.len(),
        ..TeamFilterSummary::default()
    };

    let mut seen = std::collections::HashSet::new();
    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let Some(team_api_id) = parse_int_field(field(row, id_column)) else {
            summary.dropped_unparseable += 1;
            continue;
        };
        let name = field(row, name_column).trim();
        if name.is_empty() {
            summary.dropped_unparseable += 1;
            continue;
        }
        if !seen.insert(team_api_id) {
            summary.duplicate_team_ids += 1;
            continue;
        }
        records.push(TeamRecord {
            team_api_id,
            team_long_name: name.to_string(),
        });
    }

    summary.rows_after = records.len();
    Ok((records, summary))
}

fn column(table: &RawTable, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| anyhow!("required column missing: {name}"))
}

fn field(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Integer fields may arrive float-rendered from the upstream export.
fn parse_int_field(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}
