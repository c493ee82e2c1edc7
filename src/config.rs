use std::env;
use std::path::PathBuf;

/// Everything a stage needs, resolved once from the environment and passed
/// in explicitly. Stages never read env vars themselves.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub archive_path: PathBuf,
    pub pg: PgConfig,
}

#[derive(Debug, Clone)]
pub struct PgConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl EtlConfig {
    pub fn from_env() -> Self {
        let data_dir = env_path("ETL_DATA_DIR", "extracted_data");
        let archive_path = env::var("ETL_ARCHIVE")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.join("soccer.zip"));
        Self {
            output_dir: env_path("ETL_OUTPUT_DIR", "parquet_output"),
            log_dir: env_path("ETL_LOG_DIR", "logs"),
            archive_path,
            data_dir,
            pg: PgConfig::from_env(),
        }
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("database.sqlite")
    }

    pub fn matches_csv(&self) -> PathBuf {
        self.data_dir.join("matches.csv")
    }

    pub fn teams_csv(&self) -> PathBuf {
        self.data_dir.join("teams.csv")
    }

    pub fn enriched_parquet(&self) -> PathBuf {
        self.output_dir.join("matches_cleaned.parquet")
    }

    pub fn standings_parquet(&self) -> PathBuf {
        self.output_dir.join("league_standings.parquet")
    }

    pub fn team_stats_parquet(&self) -> PathBuf {
        self.output_dir.join("team_stats.parquet")
    }

    pub fn run_report_path(&self) -> PathBuf {
        self.output_dir.join("run_report.json")
    }
}

impl PgConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("DB_HOST", "localhost"),
            port: env::var("DB_PORT")
                .ok()
                .and_then(|raw| raw.trim().parse::<u16>().ok())
                .unwrap_or(5432),
            dbname: env_or("DB_NAME", "football"),
            user: env_or("DB_USER", "football"),
            password: env_or("DB_PASSWORD", ""),
        }
    }

    pub fn conn_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.dbname, self.user, self.password
        )
    }
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw,
        _ => default.to_string(),
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    PathBuf::from(env_or(key, default))
}
