use std::path::Path;

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use rusqlite::types::ValueRef;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub match_rows: usize,
    pub team_rows: usize,
}

/// Dump the Match and Team tables verbatim to csv files in `out_dir`.
/// NULL becomes an empty field; the header row carries the column names.
pub fn export_tables(db_path: &Path, out_dir: &Path) -> Result<ExportSummary> {
    if !db_path.exists() {
        return Err(anyhow!("database.sqlite not found at {}", db_path.display()));
    }
    let conn = Connection::open(db_path)
        .with_context(|| format!("open sqlite db {}", db_path.display()))?;

    let match_rows = dump_table(&conn, "Match", &out_dir.join("matches.csv"))?;
    info!(rows = match_rows, "matches.csv created");
    let team_rows = dump_table(&conn, "Team", &out_dir.join("teams.csv"))?;
    info!(rows = team_rows, "teams.csv created");

    Ok(ExportSummary {
        match_rows,
        team_rows,
    })
}

fn dump_table(conn: &Connection, table: &str, out_path: &Path) -> Result<usize> {
    let mut stmt = conn
        .prepare(&format!("SELECT * FROM \"{table}\""))
        .with_context(|| format!("prepare select from {table}"))?;
    let column_names = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>();

    let mut writer = csv::Writer::from_path(out_path)
        .with_context(|| format!("create {}", out_path.display()))?;
    writer
        .write_record(&column_names)
        .context("write csv header")?;

    let mut rows = stmt.query([]).with_context(|| format!("query {table}"))?;
    let mut count = 0usize;
    let mut record = Vec::with_capacity(column_names.len());
    while let Some(row) = rows.next().context("read sqlite row")? {
        record.clear();
        for index in 0..column_names.len() {
            record.push(render_value(row.get_ref(index).context("read sqlite value")?));
        }
        writer.write_record(&record).context("write csv record")?;
        count += 1;
    }
    writer.flush().context("flush csv")?;
    Ok(count)
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(number) => number.to_string(),
        ValueRef::Real(number) => number.to_string(),
        ValueRef::Text(text) => String::from_utf8_lossy(text).into_owned(),
        ValueRef::Blob(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::export_tables;

    #[test]
    fn export_tables_writes_both_csvs() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join("database.sqlite");
        {
            let conn = Connection::open(&db_path)?;
            conn.execute_batch(
                r#"
                CREATE TABLE "Match" (
                    match_api_id INTEGER,
                    league_id INTEGER,
                    season TEXT,
                    date TEXT,
                    home_team_api_id INTEGER,
                    away_team_api_id INTEGER,
                    home_team_goal INTEGER,
                    away_team_goal INTEGER
                );
                CREATE TABLE "Team" (
                    team_api_id INTEGER,
                    team_long_name TEXT
                );
                INSERT INTO "Match" VALUES
                    (1001, 1, '2015/2016', '2015-08-14 00:00:00', 10, 20, 2, 1),
                    (1002, 1, '2015/2016', NULL, 20, 10, 0, 3);
                INSERT INTO "Team" VALUES (10, 'Team One'), (20, 'Team Two');
                "#,
            )?;
        }

        let summary = export_tables(&db_path, dir.path())?;
        assert_eq!(summary.match_rows, 2);
        assert_eq!(summary.team_rows, 2);

        let matches = std::fs::read_to_string(dir.path().join("matches.csv"))?;
        let mut lines = matches.lines();
        assert!(lines.next().unwrap().starts_with("match_api_id,league_id,season"));
        assert!(matches.contains("1001,1,2015/2016,2015-08-14 00:00:00,10,20,2,1"));
        // NULL date renders as an empty field.
        assert!(matches.contains("1002,1,2015/2016,,20,10,0,3"));
        Ok(())
    }

    #[test]
    fn export_tables_missing_db_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_tables(&dir.path().join("database.sqlite"), dir.path()).unwrap_err();
        assert!(err.to_string().contains("database.sqlite not found"));
    }
}
