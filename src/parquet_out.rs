use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use parquet::data_type::{ByteArray, ByteArrayType, DoubleType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::{SerializedFileWriter, SerializedRowGroupWriter};
use parquet::schema::parser::parse_message_type;

use crate::model::{EnrichedMatch, StandingsRow, TeamStatsRow};

const ENRICHED_SCHEMA: &str = "
message enriched_match {
    REQUIRED INT64 match_api_id;
    REQUIRED BYTE_ARRAY season (UTF8);
    REQUIRED INT64 league_id;
    OPTIONAL BYTE_ARRAY date (UTF8);
    REQUIRED INT64 home_team_api_id;
    REQUIRED INT64 away_team_api_id;
    REQUIRED INT64 home_team_goal;
    REQUIRED INT64 away_team_goal;
    OPTIONAL BYTE_ARRAY home_team_name (UTF8);
    OPTIONAL BYTE_ARRAY away_team_name (UTF8);
}
";

const STANDINGS_SCHEMA: &str = "
message league_standings {
    REQUIRED BYTE_ARRAY season (UTF8);
    REQUIRED INT64 league_id;
    REQUIRED INT64 team_api_id;
    REQUIRED INT64 matches_played;
    REQUIRED INT64 wins;
    REQUIRED INT64 draws;
    REQUIRED INT64 losses;
    REQUIRED INT64 goals_for;
    REQUIRED INT64 goals_against;
    REQUIRED INT64 points;
}
";

const TEAM_STATS_SCHEMA: &str = "
message team_stats {
    REQUIRED BYTE_ARRAY season (UTF8);
    REQUIRED INT64 team_api_id;
    REQUIRED DOUBLE avg_goals_scored;
    REQUIRED DOUBLE avg_goals_conceded;
}
";

/// Column order below must mirror the schema strings above; the writer hands
/// out columns strictly in schema order.
pub fn write_enriched(path: &Path, rows: &[EnrichedMatch]) -> Result<()> {
    let tmp = tmp_path(path);
    let mut writer = open_writer(&tmp, ENRICHED_SCHEMA)?;
    let mut group = writer.next_row_group().context("open row group")?;

    write_i64(&mut group, &collect_i64(rows, |row| row.match_api_id))?;
    write_str(&mut group, rows.iter().map(|row| row.season.as_str()))?;
    write_i64(&mut group, &collect_i64(rows, |row| row.league_id))?;
    write_opt_str(
        &mut group,
        rows.iter()
            .map(|row| row.date.map(|date| date.format("%Y-%m-%d").to_string())),
    )?;
    write_i64(&mut group, &collect_i64(rows, |row| row.home_team_api_id))?;
    write_i64(&mut group, &collect_i64(rows, |row| row.away_team_api_id))?;
    write_i64(&mut group, &collect_i64(rows, |row| row.home_team_goal))?;
    write_i64(&mut group, &collect_i64(rows, |row| row.away_team_goal))?;
    write_opt_str(&mut group, rows.iter().map(|row| row.home_team_name.clone()))?;
    write_opt_str(&mut group, rows.iter().map(|row| row.away_team_name.clone()))?;

    group.close().context("close row group")?;
    writer.close().context("close parquet writer")?;
    swap_into_place(&tmp, path)
}

pub fn write_standings(path: &Path, rows: &[StandingsRow]) -> Result<()> {
    let tmp = tmp_path(path);
    let mut writer = open_writer(&tmp, STANDINGS_SCHEMA)?;
    let mut group = writer.next_row_group().context("open row group")?;

    write_str(&mut group, rows.iter().map(|row| row.season.as_str()))?;
    write_i64(&mut group, &collect_i64(rows, |row| row.league_id))?;
    write_i64(&mut group, &collect_i64(rows, |row| row.team_api_id))?;
    write_i64(&mut group, &collect_i64(rows, |row| i64::from(row.matches_played)))?;
    write_i64(&mut group, &collect_i64(rows, |row| i64::from(row.wins)))?;
    write_i64(&mut group, &collect_i64(rows, |row| i64::from(row.draws)))?;
    write_i64(&mut group, &collect_i64(rows, |row| i64::from(row.losses)))?;
    write_i64(&mut group, &collect_i64(rows, |row| row.goals_for))?;
    write_i64(&mut group, &collect_i64(rows, |row| row.goals_against))?;
    write_i64(&mut group, &collect_i64(rows, |row| i64::from(row.points)))?;

    group.close().context("close row group")?;
    writer.close().context("close parquet writer")?;
    swap_into_place(&tmp, path)
}

pub fn write_team_stats(path: &Path, rows: &[TeamStatsRow]) -> Result<()> {
    let tmp = tmp_path(path);
    let mut writer = open_writer(&tmp, TEAM_STATS_SCHEMA)?;
    let mut group = writer.next_row_group().context("open row group")?;

    write_str(&mut group, rows.iter().map(|row| row.season.as_str()))?;
    write_i64(&mut group, &collect_i64(rows, |row| row.team_api_id))?;
    write_f64(&mut group, &rows.iter().map(|row| row.avg_goals_scored).collect::<Vec<_>>())?;
    write_f64(&mut group, &rows.iter().map(|row| row.avg_goals_conceded).collect::<Vec<_>>())?;

    group.close().context("close row group")?;
    writer.close().context("close parquet writer")?;
    swap_into_place(&tmp, path)
}

fn open_writer(path: &Path, schema: &str) -> Result<SerializedFileWriter<fs::File>> {
    let schema = Arc::new(parse_message_type(schema).context("parse parquet schema")?);
    let props = Arc::new(WriterProperties::builder().build());
    let file =
        fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    SerializedFileWriter::new(file, schema, props).context("open parquet writer")
}

fn collect_i64<T>(rows: &[T], value: impl Fn(&T) -> i64) -> Vec<i64> {
    rows.iter().map(value).collect()
}

fn write_i64(group: &mut SerializedRowGroupWriter<'_, fs::File>, values: &[i64]) -> Result<()> {
    let mut column = group
        .next_column()
        .context("advance parquet column")?
        .ok_or_else(|| anyhow!("parquet schema exhausted"))?;
    column
        .typed::<Int64Type>()
        .write_batch(values, None, None)
        .context("write int64 column")?;
    column.close().context("close column")?;
    Ok(())
}

fn write_f64(group: &mut SerializedRowGroupWriter<'_, fs::File>, values: &[f64]) -> Result<()> {
    let mut column = group
        .next_column()
        .context("advance parquet column")?
        .ok_or_else(|| anyhow!("parquet schema exhausted"))?;
    column
        .typed::<DoubleType>()
        .write_batch(values, None, None)
        .context("write double column")?;
    column.close().context("close column")?;
    Ok(())
}

fn write_str<'a>(
    group: &mut SerializedRowGroupWriter<'_, fs::File>,
    values: impl Iterator<Item = &'a str>,
) -> Result<()> {
    let encoded = values.map(ByteArray::from).collect::<Vec<_>>();
    let mut column = group
        .next_column()
        .context("advance parquet column")?
        .ok_or_else(|| anyhow!("parquet schema exhausted"))?;
    column
        .typed::<ByteArrayType>()
        .write_batch(&encoded, None, None)
        .context("write utf8 column")?;
    column.close().context("close column")?;
    Ok(())
}

fn write_opt_str(
    group: &mut SerializedRowGroupWriter<'_, fs::File>,
    values: impl Iterator<Item = Option<String>>,
) -> Result<()> {
    let mut def_levels = Vec::new();
    let mut encoded = Vec::new();
    for value in values {
        match value {
            Some(text) => {
                def_levels.push(1i16);
                encoded.push(ByteArray::from(text.as_str()));
            }
            None => def_levels.push(0i16),
        }
    }
    let mut column = group
        .next_column()
        .context("advance parquet column")?
        .ok_or_else(|| anyhow!("parquet schema exhausted"))?;
    column
        .typed::<ByteArrayType>()
        .write_batch(&encoded, Some(&def_levels), None)
        .context("write optional utf8 column")?;
    column.close().context("close column")?;
    Ok(())
}

fn tmp_path(path: &Path) -> std::path::PathBuf {
    path.with_extension("parquet.tmp")
}

fn swap_into_place(tmp: &Path, path: &Path) -> Result<()> {
    fs::rename(tmp, path).with_context(|| format!("swap {} into place", path.display()))
}
