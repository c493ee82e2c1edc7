use std::path::Path;

use anyhow::{Context, Result, anyhow};

/// Raw columnar view of a CSV: one header vector, one string row per record.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }
}

pub fn read_csv_table(path: &Path) -> Result<RawTable> {
    if !path.exists() {
        return Err(anyhow!("input file not found: {}", path.display()));
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open csv {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read csv headers {}", path.display()))?
        .iter()
        .map(|header| header.to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read csv record {}", path.display()))?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }
    Ok(RawTable { headers, rows })
}

/// Schema contract: after header normalization every required column must be
/// present, otherwise the stage fails here instead of deep in aggregation.
pub fn check_required_columns(table: &RawTable, required: &[&str], label: &str) -> Result<()> {
    let missing = required
        .iter()
        .filter(|name| table.column_index(name).is_none())
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(anyhow!(
            "{label} table is missing required columns: {}",
            missing.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{RawTable, check_required_columns, read_csv_table};

    #[test]
    fn read_csv_table_keeps_headers_and_rows() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("teams.csv");
        let mut file = std::fs::File::create(&path)?;
        writeln!(file, "team_api_id,team_long_name")?;
        writeln!(file, "10,Team One")?;
        writeln!(file, "20,Team Two")?;
        drop(file);

        let table = read_csv_table(&path)?;
        assert_eq!(table.headers, vec!["team_api_id", "team_long_name"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["10", "Team One"]);
        Ok(())
    }

    #[test]
    fn read_csv_table_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_csv_table(&dir.path().join("absent.csv")).unwrap_err();
        assert!(err.to_string().contains("input file not found"));
    }

    #[test]
    fn check_required_columns_names_every_missing_column() {
        let table = RawTable {
            headers: vec!["season".to_string(), "league_id".to_string()],
            rows: Vec::new(),
        };
        let err =
            check_required_columns(&table, &["season", "home_team_goal", "date"], "match")
                .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("match table is missing required columns"));
        assert!(message.contains("home_team_goal"));
        assert!(message.contains("date"));
        assert!(!message.contains("season"));
    }
}
